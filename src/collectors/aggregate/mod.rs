//! Attribute aggregation module
//!
//! Fans out to every source in a catalog, isolates per-source failures and
//! assembles an ordered, immutable snapshot.
//!
//! ## Module Organization
//!
//! - `collector`: `AttributeCollector` and the fan-out/fan-in collection logic
//! - `errors`: `ConfigurationError`, the only error a collection can return
//! - `slots`: write-once result buffer indexed by catalog position
//! - `validation`: catalog and timeout precondition checks
//! - `reporting`: collection reports and degradation assessment
//!
//! ## Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use device_snapshot::attributes::{AttributeSource, Formatter, RawValue};
//! use device_snapshot::collectors::aggregate::AttributeCollector;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = vec![AttributeSource::constant(
//!     "Version",
//!     Formatter::identity(),
//!     RawValue::from("1.0"),
//! )];
//! let collector = AttributeCollector::new(Duration::from_secs(1), Duration::from_secs(3))?;
//! let snapshot = collector.collect(&catalog).await?;
//! for line in snapshot.display_lines() {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod errors;
pub mod reporting;
pub mod slots;
pub mod validation;

pub use collector::{
    AttributeCollector, DEFAULT_OVERALL_TIMEOUT, DEFAULT_PER_SOURCE_TIMEOUT, collect,
};
pub use errors::ConfigurationError;
pub use reporting::{CollectionReport, DegradationLevel};

#[cfg(test)]
pub mod tests;
