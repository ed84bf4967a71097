//! Attribute descriptors
//!
//! - `raw`: typed values returned by fetches
//! - `source`: the `AttributeSource` descriptor and the `AttributeFetch` seam
//! - `formatting`: total raw-value to display-text conversions
//! - `errors`: per-source fetch errors

pub mod errors;
pub mod formatting;
pub mod raw;
pub mod source;

pub use errors::SourceError;
pub use formatting::{DEFAULT_FALLBACK, FormatKind, Formatter};
pub use raw::RawValue;
pub use source::{AttributeFetch, AttributeSource, FetchResult};
