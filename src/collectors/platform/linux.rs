use std::io::ErrorKind;
use std::path::Path;

use log::{debug, trace};

use super::PlatformAttributes;
use super::parsing::{clean_dmi_value, non_blank, parse_capacity_percent};
use crate::attributes::{AttributeSource, FetchResult, Formatter, RawValue, SourceError};

const DMI_ROOT: &str = "/sys/class/dmi/id";
const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

pub struct LinuxAttributes;

impl LinuxAttributes {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformAttributes for LinuxAttributes {
    fn platform_name(&self) -> &'static str {
        "linux"
    }

    fn sources(&self) -> Vec<AttributeSource> {
        vec![
            AttributeSource::from_async("Manufacturer", Formatter::identity(), || {
                read_dmi_field("sys_vendor")
            }),
            AttributeSource::from_async("Model", Formatter::identity(), || {
                read_dmi_field("product_name")
            }),
            AttributeSource::from_async("BatteryLevel", Formatter::percent(), battery_level),
            AttributeSource::from_blocking("UserName", Formatter::identity(), user_name),
        ]
    }
}

/// Reads one DMI identity field; a missing file means the value is absent
async fn read_dmi_field(field: &'static str) -> FetchResult {
    let path = Path::new(DMI_ROOT).join(field);
    match tokio::fs::read_to_string(&path).await {
        Ok(text) => Ok(clean_dmi_value(&text).map(RawValue::from)),
        Err(error) if error.kind() == ErrorKind::NotFound => {
            debug!("DMI field {} not present on this system", path.display());
            Ok(None)
        }
        Err(error) => Err(error.into()),
    }
}

/// Reads the capacity of the first power supply of type `Battery`
async fn battery_level() -> FetchResult {
    let mut entries = match tokio::fs::read_dir(POWER_SUPPLY_ROOT).await {
        Ok(entries) => entries,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(error.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let supply = entry.path();
        let kind = match tokio::fs::read_to_string(supply.join("type")).await {
            Ok(kind) => kind,
            Err(_) => continue,
        };
        if non_blank(&kind).as_deref() != Some("Battery") {
            continue;
        }

        trace!("Reading battery capacity from {}", supply.display());
        let capacity = tokio::fs::read_to_string(supply.join("capacity")).await?;
        return parse_capacity_percent(&capacity)
            .map(|fraction| Some(RawValue::Number(fraction)))
            .ok_or_else(|| {
                SourceError::query(format!(
                    "unreadable battery capacity '{}'",
                    capacity.trim()
                ))
            });
    }

    Ok(None)
}

fn user_name() -> FetchResult {
    let uid = nix::unistd::getuid();
    let user = nix::unistd::User::from_uid(uid).map_err(|errno| {
        SourceError::query(format!("user lookup for uid {} failed: {}", uid, errno))
    })?;
    Ok(user.map(|user| RawValue::from(user.name)))
}
