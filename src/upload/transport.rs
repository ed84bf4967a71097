//! Transport seam for uploading snapshots
//!
//! The collector performs no network I/O. Delivery, retry and authentication
//! belong to whatever implements [`UploadTransport`].

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;

use super::payload::UploadPayload;
use crate::models::Snapshot;

#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// Delivers one payload
    ///
    /// May be called again with the same payload after a failure.
    async fn send(&self, payload: &UploadPayload) -> Result<()>;
}

/// Writes the payload as JSON to a file
#[derive(Debug, Clone)]
pub struct JsonFileTransport {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileTransport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: false,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl UploadTransport for JsonFileTransport {
    async fn send(&self, payload: &UploadPayload) -> Result<()> {
        let json = if self.pretty {
            payload.to_json_pretty()
        } else {
            payload.to_json()
        }
        .context("Failed to serialize upload payload")?;

        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write upload payload to {}", self.path.display()))?;

        info!(
            "Wrote snapshot payload ({} attributes, {} degraded) to {}",
            payload.attributes.len(),
            payload.failed_count,
            self.path.display()
        );
        Ok(())
    }
}

/// Hands a snapshot to a transport
pub async fn upload_snapshot(snapshot: &Snapshot, transport: &dyn UploadTransport) -> Result<()> {
    let payload = UploadPayload::from_snapshot(snapshot);
    transport
        .send(&payload)
        .await
        .context("Snapshot upload failed")
}
