//! Upload boundary
//!
//! - `payload`: the stable serialized form of a snapshot
//! - `transport`: the `UploadTransport` seam and a JSON file transport

pub mod payload;
pub mod transport;

pub use payload::UploadPayload;
pub use transport::{JsonFileTransport, UploadTransport, upload_snapshot};
