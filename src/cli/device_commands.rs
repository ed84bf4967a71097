use std::io::Write;

use anyhow::{Context, Result};
use log::debug;

use super::commands::SettingsArgs;
use crate::collectors::aggregate::{AttributeCollector, CollectionReport};
use crate::collectors::platform::default_catalog;
use crate::config::CollectorSettings;
use crate::presenter::DeviceInfoPresenter;
use crate::upload::{JsonFileTransport, UploadPayload};

/// Number of latency entries shown in the detailed report
const SLOWEST_SOURCES_SHOWN: usize = 5;

pub struct DeviceCommandHandler {
    settings: CollectorSettings,
}

impl DeviceCommandHandler {
    /// Resolves settings from file, environment and command-line overrides
    pub fn from_args(args: &SettingsArgs) -> Result<Self> {
        let settings = CollectorSettings::load(args.config.as_deref())
            .context("Failed to load collector settings")?
            .with_overrides(args.per_source_timeout_ms, args.overall_timeout_ms)
            .context("Invalid collector settings")?;

        debug!("Resolved collector settings: {:?}", settings);
        Ok(Self { settings })
    }

    pub fn with_settings(settings: CollectorSettings) -> Self {
        Self { settings }
    }

    fn presenter(&self) -> Result<DeviceInfoPresenter> {
        let collector = AttributeCollector::from_settings(&self.settings)
            .context("Invalid collector settings")?;
        Ok(DeviceInfoPresenter::new(collector, default_catalog(&self.settings)))
    }

    /// Collects a snapshot and writes its display lines
    pub async fn handle_show(&self, detailed: bool, out: &mut impl Write) -> Result<()> {
        let mut presenter = self.presenter()?;
        let snapshot = presenter
            .refresh()
            .await
            .context("Device attribute collection failed")?;

        writeln!(out, "Device Information")?;
        writeln!(out, "==================")?;
        for line in presenter.lines() {
            writeln!(out, "{line}")?;
        }

        if detailed {
            let report = CollectionReport::from_snapshot(&snapshot, SLOWEST_SOURCES_SHOWN);
            report.log();
            writeln!(out)?;
            for line in report.summary_lines() {
                writeln!(out, "{line}")?;
            }
        }

        Ok(())
    }

    /// Collects a snapshot and hands it to the JSON transport, or prints the
    /// payload when no output file is given
    pub async fn handle_upload(
        &self,
        output: Option<&std::path::Path>,
        pretty: bool,
        out: &mut impl Write,
    ) -> Result<()> {
        let mut presenter = self.presenter()?;
        let snapshot = presenter
            .refresh()
            .await
            .context("Device attribute collection failed")?;

        match output {
            Some(path) => {
                let transport = JsonFileTransport::new(path).pretty(pretty);
                presenter.upload(&transport).await?;
                writeln!(
                    out,
                    "Snapshot with {} attributes ({} degraded) written to {}",
                    snapshot.len(),
                    snapshot.failed_count(),
                    path.display()
                )?;
            }
            None => {
                let payload = UploadPayload::from_snapshot(&snapshot);
                let json = if pretty {
                    payload.to_json_pretty()
                } else {
                    payload.to_json()
                }
                .context("Failed to serialize upload payload")?;
                writeln!(out, "{json}")?;
            }
        }

        Ok(())
    }

    /// Writes the catalog ids in display order
    pub fn handle_catalog(&self, out: &mut impl Write) -> Result<()> {
        for (position, source) in default_catalog(&self.settings).iter().enumerate() {
            writeln!(out, "{:>2}. {}", position + 1, source.id())?;
        }
        Ok(())
    }
}
