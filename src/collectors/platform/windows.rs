use super::parsing::{parse_capacity_percent, parse_wmic_value};
use super::{PlatformAttributes, run_probe};
use crate::attributes::{AttributeSource, FetchResult, Formatter, RawValue};

pub struct WindowsAttributes;

impl WindowsAttributes {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformAttributes for WindowsAttributes {
    fn platform_name(&self) -> &'static str {
        "windows"
    }

    fn sources(&self) -> Vec<AttributeSource> {
        vec![
            AttributeSource::from_async("Manufacturer", Formatter::identity(), || {
                computer_system_field("Manufacturer")
            }),
            AttributeSource::from_async("Model", Formatter::identity(), || {
                computer_system_field("Model")
            }),
            AttributeSource::from_async("BatteryLevel", Formatter::percent(), battery_level),
            AttributeSource::from_sync("UserName", Formatter::identity(), || {
                Ok(std::env::var("USERNAME").ok().map(RawValue::from))
            }),
        ]
    }
}

async fn computer_system_field(field: &'static str) -> FetchResult {
    let output = run_probe("wmic", &["computersystem", "get", field, "/value"]).await?;
    Ok(parse_wmic_value(&output, field).map(RawValue::from))
}

/// Desktops without a battery report no value, which is shown as the fallback
async fn battery_level() -> FetchResult {
    let output = run_probe(
        "wmic",
        &["path", "Win32_Battery", "get", "EstimatedChargeRemaining", "/value"],
    )
    .await?;
    Ok(parse_wmic_value(&output, "EstimatedChargeRemaining")
        .and_then(|percent| parse_capacity_percent(&percent))
        .map(RawValue::Number))
}
