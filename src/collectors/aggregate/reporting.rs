//! Reporting and diagnostics for collection runs
//!
//! Summarises a snapshot into counts per state, the slowest sources and the
//! failure reasons, for display with `--detailed` and for log output.

use std::fmt;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::models::{AttributeState, Snapshot};

/// How badly a collection run was degraded by failing sources
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DegradationLevel {
    /// Every attribute resolved
    None,
    /// Some attributes degraded, most resolved
    Moderate,
    /// More attributes degraded than resolved
    Severe,
}

impl DegradationLevel {
    pub fn from_counts(failed: usize, total: usize) -> Self {
        if failed == 0 {
            DegradationLevel::None
        } else if failed > total.saturating_sub(failed) {
            DegradationLevel::Severe
        } else {
            DegradationLevel::Moderate
        }
    }
}

impl fmt::Display for DegradationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DegradationLevel::None => "none",
            DegradationLevel::Moderate => "moderate",
            DegradationLevel::Severe => "severe",
        };
        f.write_str(label)
    }
}

/// Latency of one source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceLatency {
    pub id: String,
    pub latency_ms: u64,
}

/// A degraded attribute and why it degraded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceFailure {
    pub id: String,
    pub reason: String,
}

/// Diagnostic summary of one collection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionReport {
    /// Timestamp when the collection started
    pub collected_at: DateTime<Utc>,
    /// Number of cataloged attributes
    pub total: usize,
    /// Attributes that resolved
    pub ok: usize,
    /// Attributes whose fetch returned an error
    pub failed: usize,
    /// Attributes that did not settle in time
    pub timed_out: usize,
    /// Overall degradation assessment
    pub degradation: DegradationLevel,
    /// Slowest sources, slowest first
    pub slowest: Vec<SourceLatency>,
    /// Degraded attributes in catalog order
    pub failures: Vec<SourceFailure>,
}

impl CollectionReport {
    /// Builds a report, keeping at most `slowest_limit` latency entries
    pub fn from_snapshot(snapshot: &Snapshot, slowest_limit: usize) -> Self {
        let mut ok = 0;
        let mut failed = 0;
        let mut timed_out = 0;
        let mut failures = Vec::new();

        for entry in snapshot.entries() {
            match &entry.state {
                AttributeState::Ok => ok += 1,
                AttributeState::Failed { reason } => {
                    failed += 1;
                    failures.push(SourceFailure {
                        id: entry.id.clone(),
                        reason: reason.clone(),
                    });
                }
                AttributeState::TimedOut => {
                    timed_out += 1;
                    failures.push(SourceFailure {
                        id: entry.id.clone(),
                        reason: "timed out".to_string(),
                    });
                }
            }
        }

        let mut slowest: Vec<SourceLatency> = snapshot
            .entries()
            .iter()
            .map(|entry| SourceLatency {
                id: entry.id.clone(),
                latency_ms: entry.raw_latency_ms,
            })
            .collect();
        // Stable sort keeps catalog order among equal latencies
        slowest.sort_by(|a, b| b.latency_ms.cmp(&a.latency_ms));
        slowest.truncate(slowest_limit);

        Self {
            collected_at: snapshot.collected_at(),
            total: snapshot.len(),
            ok,
            failed,
            timed_out,
            degradation: DegradationLevel::from_counts(failed + timed_out, snapshot.len()),
            slowest,
            failures,
        }
    }

    /// Human-readable report lines
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "Collected at: {}",
                self.collected_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            format!(
                "Attributes: {} total, {} ok, {} failed, {} timed out (degradation: {})",
                self.total, self.ok, self.failed, self.timed_out, self.degradation
            ),
        ];

        if !self.slowest.is_empty() {
            lines.push("Slowest sources:".to_string());
            lines.extend(
                self.slowest
                    .iter()
                    .map(|latency| format!("  {}: {}ms", latency.id, latency.latency_ms)),
            );
        }

        if !self.failures.is_empty() {
            lines.push("Degraded attributes:".to_string());
            lines.extend(
                self.failures
                    .iter()
                    .map(|failure| format!("  {}: {}", failure.id, failure.reason)),
            );
        }

        lines
    }

    /// Writes the report to the log
    pub fn log(&self) {
        if self.degradation == DegradationLevel::None {
            info!("Collection report: {} attributes, all ok", self.total);
        } else {
            warn!(
                "Collection report: {}/{} attributes degraded (degradation: {})",
                self.failed + self.timed_out,
                self.total,
                self.degradation
            );
            for failure in &self.failures {
                debug!("Degraded attribute '{}': {}", failure.id, failure.reason);
            }
        }
    }
}
