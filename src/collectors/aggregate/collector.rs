//! Core attribute collector implementation
//!
//! Fans out to every cataloged source concurrently, bounds each fetch and the
//! whole run with timeouts, and assembles an ordered [`Snapshot`] in which a
//! failing or slow source degrades only its own entry.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::Utc;
use log::{debug, error, info, trace, warn};
use tokio::time::timeout;

use crate::attributes::AttributeSource;
use crate::collectors::aggregate::errors::ConfigurationError;
use crate::collectors::aggregate::reporting::DegradationLevel;
use crate::collectors::aggregate::slots::ResultBuffer;
use crate::collectors::aggregate::validation::{validate_catalog, validate_timeouts};
use crate::config::CollectorSettings;
use crate::models::{AttributeResult, AttributeState, Snapshot};

/// Default time a single source may take before it is recorded as timed out
pub const DEFAULT_PER_SOURCE_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Default time a whole collection run may take
pub const DEFAULT_OVERALL_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Collects snapshots from a catalog of attribute sources
///
/// The collector holds no per-run state: every call to [`collect`] is
/// independent and may run concurrently with others.
///
/// [`collect`]: AttributeCollector::collect
#[derive(Debug)]
pub struct AttributeCollector {
    /// Allowance for each individual fetch
    per_source_timeout: Duration,
    /// Allowance for the run as a whole
    overall_timeout: Duration,
    /// Counter for total collections performed, used in log output
    collection_count: AtomicU64,
}

impl Default for AttributeCollector {
    fn default() -> Self {
        Self {
            per_source_timeout: DEFAULT_PER_SOURCE_TIMEOUT,
            overall_timeout: DEFAULT_OVERALL_TIMEOUT,
            collection_count: AtomicU64::new(0),
        }
    }
}

impl AttributeCollector {
    /// Creates a collector with explicit timeouts
    ///
    /// Fails when `per_source_timeout` is zero or `overall_timeout` is
    /// shorter than `per_source_timeout`.
    pub fn new(
        per_source_timeout: Duration,
        overall_timeout: Duration,
    ) -> Result<Self, ConfigurationError> {
        validate_timeouts(per_source_timeout, overall_timeout)?;
        Ok(Self {
            per_source_timeout,
            overall_timeout,
            collection_count: AtomicU64::new(0),
        })
    }

    /// Creates a collector from loaded settings
    pub fn from_settings(settings: &CollectorSettings) -> Result<Self, ConfigurationError> {
        Self::new(settings.per_source_timeout(), settings.overall_timeout())
    }

    pub fn per_source_timeout(&self) -> Duration {
        self.per_source_timeout
    }

    pub fn overall_timeout(&self) -> Duration {
        self.overall_timeout
    }

    /// Number of collection runs started by this collector
    pub fn collection_count(&self) -> u64 {
        self.collection_count.load(Ordering::Relaxed)
    }

    /// Collects one snapshot from the catalog
    ///
    /// Every source is fetched exactly once, concurrently with all others.
    /// The returned snapshot holds one entry per source in catalog order.
    /// Only a malformed catalog fails the call; it is detected before any
    /// fetch starts.
    pub async fn collect(
        &self,
        catalog: &[AttributeSource],
    ) -> Result<Snapshot, ConfigurationError> {
        validate_catalog(catalog)?;

        let run = self.collection_count.fetch_add(1, Ordering::Relaxed) + 1;
        let collected_at = Utc::now();
        let run_start = Instant::now();

        info!(
            "Starting attribute collection #{} at {} (sources={}, per_source_timeout={}ms, overall_timeout={}ms)",
            run,
            collected_at.format("%H:%M:%S%.3f"),
            catalog.len(),
            self.per_source_timeout.as_millis(),
            self.overall_timeout.as_millis()
        );

        let buffer = Arc::new(ResultBuffer::new(catalog));
        let mut handles = Vec::with_capacity(catalog.len());

        for (index, source) in catalog.iter().enumerate() {
            let buffer = Arc::clone(&buffer);
            let fetcher = source.fetcher();
            let formatter = source.formatter().clone();
            let id = source.id().to_string();
            let per_source_timeout = self.per_source_timeout;

            handles.push(tokio::spawn(async move {
                let started = Instant::now();
                let outcome = timeout(per_source_timeout, fetcher.fetch()).await;
                let latency_ms = elapsed_ms(started);

                // A fetch that blocks inside a single poll resolves past its
                // deadline without the timer firing; its value is discarded
                let outcome = match outcome {
                    Ok(_) if started.elapsed() >= per_source_timeout => None,
                    Ok(fetched) => Some(fetched),
                    Err(_) => None,
                };

                let result = match outcome {
                    Some(Ok(raw)) => {
                        let display = formatter.format(raw.as_ref());
                        trace!(
                            "Attribute '{}' resolved in {}ms for collection #{}: {}",
                            id, latency_ms, run, display
                        );
                        AttributeResult::ok(id, display, latency_ms)
                    }
                    Some(Err(source_error)) => {
                        warn!(
                            "Attribute '{}' failed after {}ms for collection #{}: {} - showing fallback",
                            id, latency_ms, run, source_error
                        );
                        AttributeResult::failed(
                            id,
                            source_error.to_string(),
                            formatter.fallback(),
                            latency_ms,
                        )
                    }
                    None => {
                        warn!(
                            "Attribute '{}' exceeded its {}ms allowance for collection #{} - showing fallback",
                            id,
                            per_source_timeout.as_millis(),
                            run
                        );
                        AttributeResult::timed_out(id, formatter.fallback(), latency_ms)
                    }
                };

                if !buffer.record(index, result) {
                    debug!(
                        "Discarding late result for catalog slot {} in collection #{}",
                        index, run
                    );
                }
            }));
        }

        let all_settled = timeout(self.overall_timeout, async {
            for (index, handle) in handles.iter_mut().enumerate() {
                if let Err(join_error) = handle.await {
                    if join_error.is_panic() {
                        error!(
                            "Fetch task for catalog slot {} panicked in collection #{}",
                            index, run
                        );
                        buffer.record_failure(index, "fetch task panicked", elapsed_ms(run_start));
                    }
                }
            }
        })
        .await;

        if all_settled.is_err() {
            let pending = buffer.pending_count();
            warn!(
                "Collection #{} reached its {}ms overall timeout with {} sources still pending - cancelling them",
                run,
                self.overall_timeout.as_millis(),
                pending
            );
            for handle in &handles {
                handle.abort();
            }
        }

        let entries = buffer.finish(elapsed_ms(run_start));
        let snapshot = Snapshot::new(collected_at, entries);
        log_collection_summary(run, &snapshot, elapsed_ms(run_start));

        Ok(snapshot)
    }
}

/// Collects one snapshot with the given timeouts
///
/// Convenience wrapper around [`AttributeCollector`] for one-off runs.
pub async fn collect(
    catalog: &[AttributeSource],
    per_source_timeout: Duration,
    overall_timeout: Duration,
) -> Result<Snapshot, ConfigurationError> {
    AttributeCollector::new(per_source_timeout, overall_timeout)?
        .collect(catalog)
        .await
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis().try_into().unwrap_or(u64::MAX)
}

fn log_collection_summary(run: u64, snapshot: &Snapshot, duration_ms: u64) {
    let total = snapshot.len();
    let failed = snapshot.failed_count();

    if failed == 0 {
        info!(
            "Attribute collection #{} completed successfully: {} attributes (duration: {}ms)",
            run, total, duration_ms
        );
        return;
    }

    let timed_out = snapshot
        .entries()
        .iter()
        .filter(|entry| entry.state == AttributeState::TimedOut)
        .count();

    warn!(
        "Attribute collection #{} completed with partial success: {}/{} attributes ok, {} failed, {} timed out (duration: {}ms, degradation_level: {})",
        run,
        total - failed,
        total,
        failed - timed_out,
        timed_out,
        duration_ms,
        DegradationLevel::from_counts(failed, total)
    );
}
