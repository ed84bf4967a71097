use super::parsing::{non_blank, parse_pmset_battery};
use super::{PlatformAttributes, run_probe};
use crate::attributes::{AttributeSource, FetchResult, Formatter, RawValue};

pub struct MacOSAttributes;

impl MacOSAttributes {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformAttributes for MacOSAttributes {
    fn platform_name(&self) -> &'static str {
        "macos"
    }

    fn sources(&self) -> Vec<AttributeSource> {
        vec![
            AttributeSource::constant(
                "Manufacturer",
                Formatter::identity(),
                RawValue::from("Apple"),
            ),
            AttributeSource::from_async("Model", Formatter::identity(), hardware_model),
            AttributeSource::from_async("BatteryLevel", Formatter::percent(), battery_level),
            AttributeSource::from_sync("UserName", Formatter::identity(), || {
                Ok(std::env::var("USER").ok().map(RawValue::from))
            }),
        ]
    }
}

async fn hardware_model() -> FetchResult {
    let output = run_probe("sysctl", &["-n", "hw.model"]).await?;
    Ok(non_blank(&output).map(RawValue::from))
}

async fn battery_level() -> FetchResult {
    let output = run_probe("pmset", &["-g", "batt"]).await?;
    Ok(parse_pmset_battery(&output).map(RawValue::Number))
}
