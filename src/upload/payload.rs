//! Serialized form of a snapshot handed to upload transports

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Snapshot;

/// What an upload transport receives: the key-value view plus run metadata
///
/// Attributes are keyed in a sorted map, so repeated serialization of the
/// same snapshot yields byte-identical output and transports can retry
/// without re-collecting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadPayload {
    pub collected_at: DateTime<Utc>,
    pub failed_count: usize,
    pub attributes: BTreeMap<String, String>,
}

impl UploadPayload {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            collected_at: snapshot.collected_at(),
            failed_count: snapshot.failed_count(),
            attributes: snapshot.as_key_value_map(),
        }
    }

    /// Compact JSON rendering
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Indented JSON rendering for people to read
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&Snapshot> for UploadPayload {
    fn from(snapshot: &Snapshot) -> Self {
        Self::from_snapshot(snapshot)
    }
}
