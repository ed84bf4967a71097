//! Device information presenter
//!
//! Binds the collector's output to a display list. Each refresh triggers a
//! fresh collection and replaces the cached snapshot; an upload hands the
//! cached snapshot to a transport without collecting again.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use log::info;

use crate::attributes::AttributeSource;
use crate::collectors::aggregate::{AttributeCollector, ConfigurationError};
use crate::models::Snapshot;
use crate::upload::{UploadTransport, upload_snapshot};

/// View state of the device information screen
#[derive(Debug, Clone, Default)]
pub enum ViewState {
    /// Nothing collected yet
    #[default]
    Idle,
    /// A snapshot is available for display and upload
    Ready(Arc<Snapshot>),
}

pub struct DeviceInfoPresenter {
    collector: AttributeCollector,
    catalog: Arc<[AttributeSource]>,
    state: ViewState,
}

impl DeviceInfoPresenter {
    pub fn new(collector: AttributeCollector, catalog: impl Into<Arc<[AttributeSource]>>) -> Self {
        Self {
            collector,
            catalog: catalog.into(),
            state: ViewState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Cached snapshot from the last refresh, if any
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        match &self.state {
            ViewState::Idle => None,
            ViewState::Ready(snapshot) => Some(Arc::clone(snapshot)),
        }
    }

    /// Collects a fresh snapshot and makes it the displayed one
    pub async fn refresh(&mut self) -> Result<Arc<Snapshot>, ConfigurationError> {
        let snapshot = Arc::new(self.collector.collect(&self.catalog).await?);
        self.state = ViewState::Ready(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Display lines of the cached snapshot; empty before the first refresh
    pub fn lines(&self) -> Vec<String> {
        match &self.state {
            ViewState::Idle => Vec::new(),
            ViewState::Ready(snapshot) => snapshot.display_lines(),
        }
    }

    /// Uploads the cached snapshot
    pub async fn upload(&self, transport: &dyn UploadTransport) -> Result<()> {
        let snapshot = self
            .snapshot()
            .ok_or_else(|| anyhow!("No device snapshot has been collected yet"))?;

        upload_snapshot(&snapshot, transport).await?;
        info!(
            "Uploaded device snapshot collected at {}",
            snapshot.collected_at().format("%Y-%m-%d %H:%M:%S UTC")
        );
        Ok(())
    }
}
