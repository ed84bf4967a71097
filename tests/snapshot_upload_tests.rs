use anyhow::Result;
use async_trait::async_trait;
use device_snapshot::attributes::{AttributeSource, Formatter, RawValue, SourceError};
use device_snapshot::collectors::aggregate::AttributeCollector;
use device_snapshot::presenter::{DeviceInfoPresenter, ViewState};
use device_snapshot::upload::{JsonFileTransport, UploadPayload, UploadTransport, upload_snapshot};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Integration tests for the snapshot consumers: presenter and upload boundary

/// Transport that records every payload and can fail on demand
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<String>>,
    fail_first: Mutex<bool>,
}

#[async_trait]
impl UploadTransport for RecordingTransport {
    async fn send(&self, payload: &UploadPayload) -> Result<()> {
        let mut fail_first = self.fail_first.lock().unwrap();
        if *fail_first {
            *fail_first = false;
            anyhow::bail!("simulated network outage");
        }
        self.sent.lock().unwrap().push(payload.to_json()?);
        Ok(())
    }
}

fn device_catalog() -> Vec<AttributeSource> {
    vec![
        AttributeSource::constant("Brand", Formatter::identity(), RawValue::from("Acme")),
        AttributeSource::constant(
            "TotalMemory",
            Formatter::megabytes(),
            RawValue::from(4_294_967_296u64),
        ),
        AttributeSource::from_sync("Carrier", Formatter::identity(), || {
            Err(SourceError::unsupported("telephony"))
        }),
        AttributeSource::constant(
            "SupportedAbis",
            Formatter::joined(),
            RawValue::List(vec!["arm64-v8a".to_string(), "armeabi-v7a".to_string()]),
        ),
    ]
}

fn collector() -> AttributeCollector {
    AttributeCollector::new(Duration::from_millis(200), Duration::from_millis(500))
        .expect("valid timeouts")
}

#[tokio::test]
async fn test_derivations_are_idempotent() {
    let snapshot = collector().collect(&device_catalog()).await.expect("collection succeeds");

    assert_eq!(snapshot.display_lines(), snapshot.display_lines());
    assert_eq!(snapshot.as_key_value_map(), snapshot.as_key_value_map());
    assert_eq!(
        snapshot.display_lines(),
        vec![
            "Brand: Acme",
            "TotalMemory: 4096.00 MB",
            "Carrier: N/A",
            "SupportedAbis: arm64-v8a, armeabi-v7a",
        ]
    );
}

#[tokio::test]
async fn test_payload_serialization_is_referentially_stable() {
    let snapshot = collector().collect(&device_catalog()).await.expect("collection succeeds");

    let first = UploadPayload::from_snapshot(&snapshot);
    let second = UploadPayload::from_snapshot(&snapshot);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    assert_eq!(first.failed_count, 1);
    assert_eq!(first.collected_at, snapshot.collected_at());
    assert_eq!(first.attributes, snapshot.as_key_value_map());
}

#[tokio::test]
async fn test_retry_sends_identical_payload() {
    let snapshot = collector().collect(&device_catalog()).await.expect("collection succeeds");
    let transport = RecordingTransport {
        fail_first: Mutex::new(true),
        ..RecordingTransport::default()
    };

    assert!(upload_snapshot(&snapshot, &transport).await.is_err());
    upload_snapshot(&snapshot, &transport).await.expect("retry succeeds");
    upload_snapshot(&snapshot, &transport).await.expect("second upload succeeds");

    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
}

#[tokio::test]
async fn test_json_file_transport_writes_payload() {
    let snapshot = collector().collect(&device_catalog()).await.expect("collection succeeds");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("device.json");

    let transport = JsonFileTransport::new(&path).pretty(true);
    upload_snapshot(&snapshot, &transport).await.expect("upload succeeds");

    let written = std::fs::read_to_string(&path).unwrap();
    let payload: UploadPayload = serde_json::from_str(&written).unwrap();
    assert_eq!(payload, UploadPayload::from_snapshot(&snapshot));
    assert!(written.contains('\n'), "pretty output should be indented");
}

#[tokio::test]
async fn test_json_file_transport_reports_unwritable_path() {
    let snapshot = collector().collect(&device_catalog()).await.expect("collection succeeds");
    let dir = tempfile::tempdir().unwrap();
    let transport = JsonFileTransport::new(dir.path().join("missing").join("device.json"));

    let error = upload_snapshot(&snapshot, &transport).await.unwrap_err();
    assert!(format!("{error:#}").contains("Failed to write upload payload"));
}

#[tokio::test]
async fn test_presenter_lifecycle() {
    let mut presenter = DeviceInfoPresenter::new(collector(), device_catalog());
    assert!(matches!(presenter.state(), ViewState::Idle));
    assert!(presenter.lines().is_empty());
    assert!(presenter.snapshot().is_none());

    let transport = RecordingTransport::default();
    assert!(presenter.upload(&transport).await.is_err(), "upload requires a snapshot");

    let first = presenter.refresh().await.expect("collection succeeds");
    assert_eq!(presenter.lines(), first.display_lines());
    assert_eq!(presenter.lines().len(), 4);

    presenter.upload(&transport).await.expect("upload succeeds");
    presenter.upload(&transport).await.expect("upload succeeds");
    {
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1], "uploads reuse the cached snapshot");
    }

    let second = presenter.refresh().await.expect("collection succeeds");
    assert!(!Arc::ptr_eq(&first, &second), "refresh produces a new snapshot");
    assert_eq!(first.display_lines(), second.display_lines());
}
