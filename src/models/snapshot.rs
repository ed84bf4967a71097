//! Collection results and the immutable snapshot handed to consumers

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a single attribute settled during a collection run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AttributeState {
    /// The fetch resolved in time and its value was formatted
    Ok,
    /// The fetch returned an error
    Failed { reason: String },
    /// The fetch did not settle within its time allowance
    TimedOut,
}

impl AttributeState {
    pub fn is_ok(&self) -> bool {
        matches!(self, AttributeState::Ok)
    }
}

/// Result recorded for one cataloged attribute in one run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeResult {
    /// Catalog identifier of the attribute
    pub id: String,
    /// Settlement state
    pub state: AttributeState,
    /// Display text: the formatted value, or the fallback text when degraded
    pub display: String,
    /// Time between fetch start and settlement, diagnostic only
    pub raw_latency_ms: u64,
}

impl AttributeResult {
    pub fn ok(id: impl Into<String>, display: impl Into<String>, raw_latency_ms: u64) -> Self {
        Self {
            id: id.into(),
            state: AttributeState::Ok,
            display: display.into(),
            raw_latency_ms,
        }
    }

    pub fn failed(
        id: impl Into<String>,
        reason: impl Into<String>,
        fallback: impl Into<String>,
        raw_latency_ms: u64,
    ) -> Self {
        Self {
            id: id.into(),
            state: AttributeState::Failed {
                reason: reason.into(),
            },
            display: fallback.into(),
            raw_latency_ms,
        }
    }

    pub fn timed_out(
        id: impl Into<String>,
        fallback: impl Into<String>,
        raw_latency_ms: u64,
    ) -> Self {
        Self {
            id: id.into(),
            state: AttributeState::TimedOut,
            display: fallback.into(),
            raw_latency_ms,
        }
    }

    /// Renders the entry as a `"id: display"` line
    pub fn display_line(&self) -> String {
        format!("{}: {}", self.id, self.display)
    }
}

/// Immutable, fully ordered result of one collection run
///
/// Holds exactly one entry per cataloged attribute, in catalog order.
/// Readers may share it freely; a new run produces a new snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    collected_at: DateTime<Utc>,
    entries: Vec<AttributeResult>,
}

impl Snapshot {
    pub fn new(collected_at: DateTime<Utc>, entries: Vec<AttributeResult>) -> Self {
        Self {
            collected_at,
            entries,
        }
    }

    /// Time at which the collection run started
    pub fn collected_at(&self) -> DateTime<Utc> {
        self.collected_at
    }

    pub fn entries(&self) -> &[AttributeResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries that are not in the `Ok` state
    pub fn failed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| !entry.state.is_ok())
            .count()
    }

    /// True when at least one attribute failed or timed out
    pub fn is_degraded(&self) -> bool {
        self.failed_count() > 0
    }

    /// Looks up an entry by attribute id
    pub fn entry(&self, id: &str) -> Option<&AttributeResult> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Ordered `"id: display text"` lines, one per cataloged attribute
    pub fn display_lines(&self) -> Vec<String> {
        self.entries.iter().map(AttributeResult::display_line).collect()
    }

    /// Mapping of attribute id to display text
    pub fn as_key_value_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|entry| (entry.id.clone(), entry.display.clone()))
            .collect()
    }
}
