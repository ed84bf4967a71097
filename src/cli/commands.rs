use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Main CLI structure for the dsnap application
/// Uses clap's derive macros for automatic CLI generation
#[derive(Parser)]
#[command(author = "Kaipo Chen")]
#[command(version)] // Automatically uses version from Cargo.toml
#[command(about = "Device Snapshot CLI Tool - Collect an ordered, fault-tolerant snapshot of device attributes")]
#[command(long_about = "dsnap queries every device and environment attribute concurrently, \
bounds each query with a timeout, and prints one line per attribute in a fixed order. \
Attributes that fail or time out are shown with a fallback text instead of aborting the report.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Settings shared by every collecting command
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Settings file (TOML, YAML or JSON) layered over the built-in defaults
    #[arg(short, long, help = "Path to a collector settings file")]
    pub config: Option<PathBuf>,

    /// Allowance for each attribute in milliseconds
    #[arg(long, help = "Per-attribute timeout in milliseconds")]
    pub per_source_timeout_ms: Option<u64>,

    /// Allowance for the whole collection in milliseconds
    #[arg(long, help = "Overall collection timeout in milliseconds")]
    pub overall_timeout_ms: Option<u64>,
}

/// Available CLI commands for the dsnap application
#[derive(Subcommand)]
pub enum Commands {
    /// Collect a snapshot and print one line per attribute
    #[command(about = "Collect and display device attributes")]
    #[command(long_about = "Collects every cataloged attribute concurrently and prints them in catalog order.\n\n\
Examples:\n  \
dsnap show                                # Default timeouts\n  \
dsnap show --detailed                     # Add a collection report\n  \
dsnap show --per-source-timeout-ms 500    # Tighter per-attribute allowance")]
    Show {
        /// Append a report with failure reasons and the slowest attributes
        #[arg(short, long, help = "Show collection diagnostics")]
        detailed: bool,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Collect a snapshot and hand it to the JSON upload transport
    #[command(about = "Collect a snapshot and export it as an upload payload")]
    #[command(long_about = "Collects a snapshot and writes the upload payload (attribute map, collection time \
and degraded-attribute count) as JSON.\n\n\
Examples:\n  \
dsnap upload                              # Print payload to stdout\n  \
dsnap upload --output device.json --pretty")]
    Upload {
        /// Destination file; the payload is printed when omitted
        #[arg(short, long, help = "Write the payload to this file")]
        output: Option<PathBuf>,

        /// Indent the JSON output
        #[arg(long, help = "Pretty-print the JSON payload")]
        pretty: bool,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// List attribute ids in display order without collecting
    #[command(about = "List cataloged attributes")]
    Catalog,
}
