pub mod aggregate;
pub mod platform;

pub use aggregate::{AttributeCollector, CollectionReport, ConfigurationError};
pub use platform::default_catalog;
