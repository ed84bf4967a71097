//! Error types for attribute collection
//!
//! Only configuration problems are errors at this level. Failures of
//! individual sources are absorbed into the snapshot as degraded entries.

use thiserror::Error;

/// A catalog or collector setting violates its preconditions
///
/// Surfaces before any fetch starts and fails the whole `collect` call.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("attribute catalog is empty")]
    EmptyCatalog,

    #[error("duplicate attribute id '{id}' at catalog positions {first} and {second}")]
    DuplicateId {
        id: String,
        first: usize,
        second: usize,
    },

    #[error("attribute id at catalog position {position} is blank")]
    BlankId { position: usize },

    #[error("invalid timeout configuration: {0}")]
    InvalidTimeout(String),

    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error("failed to load collector settings: {0}")]
    Settings(#[from] config::ConfigError),
}
