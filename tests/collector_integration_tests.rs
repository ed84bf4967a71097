use device_snapshot::attributes::{AttributeSource, Formatter, RawValue, SourceError};
use device_snapshot::collectors::aggregate::{AttributeCollector, ConfigurationError, collect};
use device_snapshot::models::AttributeState;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Integration tests for the attribute collector
/// These tests drive full collection runs against fake sources with
/// controlled latency and failure behaviour

fn delayed_source(id: &str, delay: Duration, value: &'static str) -> AttributeSource {
    AttributeSource::from_async(id, Formatter::identity(), move || async move {
        tokio::time::sleep(delay).await;
        Ok(Some(RawValue::from(value)))
    })
}

fn failing_source(id: &str) -> AttributeSource {
    AttributeSource::from_sync(id, Formatter::identity(), || {
        Err(SourceError::query("platform refused"))
    })
}

fn hanging_source(id: &str) -> AttributeSource {
    AttributeSource::from_async(id, Formatter::identity(), || async {
        std::future::pending::<()>().await;
        Ok(None)
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_end_to_end_battery_carrier_model_scenario() {
    let catalog = vec![
        AttributeSource::from_async("Battery", Formatter::percent(), || async {
            Ok(Some(RawValue::Number(0.76)))
        }),
        AttributeSource::from_async("Carrier", Formatter::identity(), || async {
            Err(SourceError::query("no SIM card"))
        }),
        AttributeSource::from_async("Model", Formatter::identity(), || async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(Some(RawValue::from("Pixel 8")))
        }),
    ];

    let snapshot = collect(&catalog, Duration::from_millis(100), Duration::from_millis(500))
        .await
        .expect("valid catalog must collect");

    assert_eq!(
        snapshot.display_lines(),
        vec!["Battery: 76%", "Carrier: N/A", "Model: N/A"]
    );
    assert_eq!(snapshot.failed_count(), 2);
    assert_eq!(snapshot.entries()[0].state, AttributeState::Ok);
    assert!(matches!(snapshot.entries()[1].state, AttributeState::Failed { .. }));
    assert_eq!(snapshot.entries()[2].state, AttributeState::TimedOut);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_snapshot_is_complete_regardless_of_failures() {
    let collector = AttributeCollector::new(Duration::from_millis(50), Duration::from_millis(200))
        .expect("valid timeouts");

    for failing in 0..=6 {
        let catalog: Vec<AttributeSource> = (0..6)
            .map(|index| {
                let id = format!("Attr{index}");
                if index < failing {
                    if index % 2 == 0 {
                        failing_source(&id)
                    } else {
                        hanging_source(&id)
                    }
                } else {
                    delayed_source(&id, Duration::from_millis(1), "ok")
                }
            })
            .collect();

        let snapshot = collector.collect(&catalog).await.expect("collection succeeds");
        assert_eq!(snapshot.len(), catalog.len(), "snapshot must hold one entry per source");
        assert_eq!(snapshot.failed_count(), failing);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_order_follows_catalog_not_completion() {
    // Later catalog entries resolve first
    let count = 8u64;
    let catalog: Vec<AttributeSource> = (0..count)
        .map(|index| {
            let delay = Duration::from_millis((count - index) * 15);
            delayed_source(&format!("Attr{index}"), delay, "value")
        })
        .collect();

    let snapshot = collect(&catalog, Duration::from_millis(500), Duration::from_secs(1))
        .await
        .expect("collection succeeds");

    let ids: Vec<&str> = snapshot.entries().iter().map(|entry| entry.id.as_str()).collect();
    let expected: Vec<String> = (0..count).map(|index| format!("Attr{index}")).collect();
    assert_eq!(ids, expected);

    // Completion really happened in reverse: the first entry waited longest
    let first = snapshot.entries().first().unwrap().raw_latency_ms;
    let last = snapshot.entries().last().unwrap().raw_latency_ms;
    assert!(first > last, "expected reverse completion, got {first}ms vs {last}ms");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sources_run_concurrently() {
    let catalog: Vec<AttributeSource> = (0..10)
        .map(|index| delayed_source(&format!("Attr{index}"), Duration::from_millis(100), "v"))
        .collect();

    let start = Instant::now();
    let snapshot = collect(&catalog, Duration::from_millis(500), Duration::from_secs(2))
        .await
        .expect("collection succeeds");
    let elapsed = start.elapsed();

    assert_eq!(snapshot.failed_count(), 0);
    // Ten sequential fetches would need a full second
    assert!(elapsed < Duration::from_millis(600), "collection took {elapsed:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_hanging_source_does_not_delay_others() {
    let catalog = vec![
        delayed_source("Brand", Duration::from_millis(5), "Acme"),
        hanging_source("Fingerprint"),
        delayed_source("Model", Duration::from_millis(10), "X1"),
    ];

    let start = Instant::now();
    let snapshot = collect(&catalog, Duration::from_millis(150), Duration::from_millis(400))
        .await
        .expect("collection succeeds");
    let elapsed = start.elapsed();

    assert!(elapsed < Duration::from_millis(400), "collection took {elapsed:?}");
    assert_eq!(
        snapshot.display_lines(),
        vec!["Brand: Acme", "Fingerprint: N/A", "Model: X1"]
    );
    assert_eq!(snapshot.entries()[1].state, AttributeState::TimedOut);
    assert!(snapshot.entries()[0].raw_latency_ms < 150);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overall_timeout_bounds_non_yielding_source() {
    // A synchronous probe that never yields cannot be interrupted by its own
    // timeout; the overall deadline still closes the run
    let catalog = vec![
        AttributeSource::from_sync("StuckProbe", Formatter::identity(), || {
            std::thread::sleep(Duration::from_millis(1_000));
            Ok(Some(RawValue::from("late")))
        }),
        delayed_source("Version", Duration::from_millis(1), "1.0"),
    ];

    let start = Instant::now();
    let snapshot = collect(&catalog, Duration::from_millis(50), Duration::from_millis(200))
        .await
        .expect("collection succeeds");
    let elapsed = start.elapsed();

    assert!(elapsed < Duration::from_millis(900), "collection took {elapsed:?}");
    assert_eq!(snapshot.entries()[0].state, AttributeState::TimedOut);
    assert_eq!(snapshot.entries()[0].display, "N/A");
    assert_eq!(snapshot.display_lines()[1], "Version: 1.0");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sync_fetch_past_its_deadline_is_timed_out() {
    // Finishes well inside the overall deadline but long after its own
    let catalog = vec![
        AttributeSource::from_sync("SlowSyncProbe", Formatter::identity(), || {
            std::thread::sleep(Duration::from_millis(300));
            Ok(Some(RawValue::from("late")))
        }),
        delayed_source("Version", Duration::from_millis(1), "1.0"),
    ];

    let snapshot = collect(&catalog, Duration::from_millis(50), Duration::from_secs(1))
        .await
        .expect("collection succeeds");

    assert_eq!(snapshot.entries()[0].state, AttributeState::TimedOut);
    assert_eq!(snapshot.entries()[0].display, "N/A");
    assert_eq!(snapshot.failed_count(), 1);
    assert_eq!(snapshot.display_lines(), vec!["SlowSyncProbe: N/A", "Version: 1.0"]);
}

#[tokio::test]
async fn test_fast_catalog_does_not_wait_for_overall_timeout() {
    let catalog = vec![
        AttributeSource::constant(
            "ApplicationName",
            Formatter::identity(),
            RawValue::from("dsnap"),
        ),
        AttributeSource::constant("ApiLevel", Formatter::identity(), RawValue::Number(34.0)),
    ];

    let start = Instant::now();
    let snapshot = collect(&catalog, Duration::from_secs(1), Duration::from_secs(5))
        .await
        .expect("collection succeeds");

    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(snapshot.display_lines(), vec!["ApplicationName: dsnap", "ApiLevel: 34"]);
}

#[tokio::test]
async fn test_configuration_errors_surface_immediately() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = {
        let calls = Arc::clone(&calls);
        move |id: &str| {
            let calls = Arc::clone(&calls);
            AttributeSource::from_sync(id, Formatter::identity(), move || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            })
        }
    };

    let empty = collect(&[], Duration::from_millis(10), Duration::from_millis(20)).await;
    assert!(matches!(empty, Err(ConfigurationError::EmptyCatalog)));

    let duplicated = vec![counted("Brand"), counted("Model"), counted("Brand")];
    let result = collect(&duplicated, Duration::from_millis(10), Duration::from_millis(20)).await;
    assert!(matches!(result, Err(ConfigurationError::DuplicateId { .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 0, "no fetch may start for a malformed catalog");

    let valid = vec![counted("Brand")];
    let result = collect(&valid, Duration::from_millis(20), Duration::from_millis(10)).await;
    assert!(matches!(result, Err(ConfigurationError::InvalidTimeout(_))));
}

#[tokio::test]
async fn test_repeated_collections_produce_independent_snapshots() {
    let counter = Arc::new(AtomicUsize::new(0));
    let catalog = vec![{
        let counter = Arc::clone(&counter);
        AttributeSource::from_sync("Counter", Formatter::identity(), move || {
            Ok(Some(RawValue::from(counter.fetch_add(1, Ordering::SeqCst) + 1)))
        })
    }];

    let collector = AttributeCollector::default();
    let first = collector.collect(&catalog).await.expect("collection succeeds");
    let second = collector.collect(&catalog).await.expect("collection succeeds");

    assert_eq!(first.display_lines(), vec!["Counter: 1"]);
    assert_eq!(second.display_lines(), vec!["Counter: 2"]);
    assert!(second.collected_at() >= first.collected_at());
}
