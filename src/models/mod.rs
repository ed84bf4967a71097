pub mod snapshot;

pub use snapshot::{AttributeResult, AttributeState, Snapshot};
