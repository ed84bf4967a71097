use log::debug;

use crate::attributes::AttributeSource;
use crate::config::CollectorSettings;

// Platform-specific attribute sources
// Each platform supplies the same attribute ids in the same order so the
// catalog layout does not depend on where the binary runs

/// Output parsers for the platform probes, compiled on every platform
pub mod parsing;

/// Cross-platform sources backed by sysinfo and if-addrs
pub mod system;

/// Linux sources read from sysfs and the user database
#[cfg(target_os = "linux")]
pub mod linux;

/// macOS sources queried through sysctl and pmset
#[cfg(target_os = "macos")]
pub mod macos;

/// Windows sources queried through wmic
#[cfg(target_os = "windows")]
pub mod windows;

/// Ids supplied by every platform implementation, in display order
pub const PLATFORM_ATTRIBUTE_IDS: [&str; 4] = ["Manufacturer", "Model", "BatteryLevel", "UserName"];

pub trait PlatformAttributes: Send + Sync {
    fn platform_name(&self) -> &'static str;
    fn sources(&self) -> Vec<AttributeSource>;
}

pub fn create_platform_attributes() -> Box<dyn PlatformAttributes> {
    #[cfg(target_os = "linux")]
    {
        Box::new(linux::LinuxAttributes::new())
    }

    #[cfg(target_os = "macos")]
    {
        Box::new(macos::MacOSAttributes::new())
    }

    #[cfg(target_os = "windows")]
    {
        Box::new(windows::WindowsAttributes::new())
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        Box::new(unsupported::UnsupportedAttributes)
    }
}

/// Builds the production catalog: cross-platform sources followed by the
/// platform's own, all using the configured fallback text
pub fn default_catalog(settings: &CollectorSettings) -> Vec<AttributeSource> {
    let platform = create_platform_attributes();
    let catalog: Vec<AttributeSource> = system::system_sources()
        .into_iter()
        .chain(platform.sources())
        .map(|source| source.with_fallback(settings.fallback_text.clone()))
        .collect();

    debug!(
        "Built default catalog for {} with {} attributes",
        platform.platform_name(),
        catalog.len()
    );
    catalog
}

/// Runs a probe command and returns its standard output
#[cfg(any(target_os = "macos", target_os = "windows"))]
async fn run_probe(program: &str, args: &[&str]) -> Result<String, crate::attributes::SourceError> {
    let output = tokio::process::Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await?;

    if !output.status.success() {
        return Err(crate::attributes::SourceError::query(format!(
            "{} exited with {}",
            program, output.status
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
mod unsupported {
    use super::PlatformAttributes;
    use crate::attributes::{AttributeSource, Formatter, RawValue, SourceError};

    pub struct UnsupportedAttributes;

    impl PlatformAttributes for UnsupportedAttributes {
        fn platform_name(&self) -> &'static str {
            std::env::consts::OS
        }

        fn sources(&self) -> Vec<AttributeSource> {
            let unsupported = |id: &'static str, formatter: Formatter| {
                AttributeSource::from_sync(id, formatter, move || {
                    Err(SourceError::unsupported(id.to_lowercase()))
                })
            };

            vec![
                unsupported("Manufacturer", Formatter::identity()),
                unsupported("Model", Formatter::identity()),
                unsupported("BatteryLevel", Formatter::percent()),
                AttributeSource::from_sync("UserName", Formatter::identity(), || {
                    Ok(std::env::var("USER").ok().map(RawValue::from))
                }),
            ]
        }
    }
}
