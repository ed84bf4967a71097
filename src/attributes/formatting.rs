//! Formatting of raw attribute values into display text
//!
//! Every conversion that turns a raw value into something a person reads
//! (unit scaling, percentages, list joining, local times) lives here so that
//! fetch failures and formatting decisions can be tested independently.
//! A [`Formatter`] is total: absent, blank, non-finite or mismatched input
//! always yields its fallback text.

use std::borrow::Cow;

use chrono::{DateTime, Local, Utc};
use log::trace;
use serde::{Deserialize, Serialize};

use super::raw::RawValue;

/// Fallback text used when a formatter is not given its own
pub const DEFAULT_FALLBACK: &str = "N/A";

const MEGABYTE: f64 = 1024.0 * 1024.0;

/// Conversion applied by a [`Formatter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatKind {
    /// Natural rendering of whatever kind the value is
    Identity,
    /// Fraction in `0.0..=1.0` rendered as a rounded percentage
    Percent,
    /// Byte count rendered in megabytes with two decimals
    Megabytes,
    /// Byte count rendered with an automatically chosen unit
    Bytes,
    /// Millisecond count rendered as `"N ms"`
    Milliseconds,
    /// Second count rendered as a compact human duration
    Duration,
    /// Timestamp (or epoch milliseconds) rendered in local time
    LocalDateTime,
    /// List of strings joined with `", "`
    Joined,
    /// Boolean rendered as `Yes`/`No`
    YesNo,
}

/// Pure raw-value to display-text conversion with a per-source fallback
#[derive(Debug, Clone, PartialEq)]
pub struct Formatter {
    kind: FormatKind,
    fallback: Cow<'static, str>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::identity()
    }
}

impl Formatter {
    pub const fn new(kind: FormatKind) -> Self {
        Self {
            kind,
            fallback: Cow::Borrowed(DEFAULT_FALLBACK),
        }
    }

    pub const fn identity() -> Self {
        Self::new(FormatKind::Identity)
    }

    pub const fn percent() -> Self {
        Self::new(FormatKind::Percent)
    }

    pub const fn megabytes() -> Self {
        Self::new(FormatKind::Megabytes)
    }

    pub const fn bytes() -> Self {
        Self::new(FormatKind::Bytes)
    }

    pub const fn milliseconds() -> Self {
        Self::new(FormatKind::Milliseconds)
    }

    pub const fn duration() -> Self {
        Self::new(FormatKind::Duration)
    }

    pub const fn local_datetime() -> Self {
        Self::new(FormatKind::LocalDateTime)
    }

    pub const fn joined() -> Self {
        Self::new(FormatKind::Joined)
    }

    pub const fn yes_no() -> Self {
        Self::new(FormatKind::YesNo)
    }

    /// Replaces the fallback text shown for absent or failed values
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Cow::Owned(fallback.into());
        self
    }

    pub fn kind(&self) -> FormatKind {
        self.kind
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Formats a raw value, returning the fallback text when it is absent
    ///
    /// Blank text and empty lists count as absent. A value of a kind this
    /// formatter cannot render also yields the fallback instead of failing.
    pub fn format(&self, raw: Option<&RawValue>) -> String {
        let Some(raw) = raw.filter(|value| !value.is_blank()) else {
            return self.fallback.to_string();
        };

        match self.render(raw) {
            Some(text) => text,
            None => {
                trace!(
                    "Formatter {:?} cannot render {} value {:?} - using fallback '{}'",
                    self.kind,
                    raw.kind(),
                    raw,
                    self.fallback
                );
                self.fallback.to_string()
            }
        }
    }

    fn render(&self, raw: &RawValue) -> Option<String> {
        match (self.kind, raw) {
            (FormatKind::Identity, value) => Some(render_plain(value)),
            (FormatKind::Percent, RawValue::Number(fraction)) => finite(*fraction)
                .filter(|fraction| *fraction >= 0.0)
                .map(format_percent),
            (FormatKind::Megabytes, RawValue::Number(bytes)) => {
                finite(*bytes).map(format_megabytes)
            }
            (FormatKind::Bytes, RawValue::Number(bytes)) => finite(*bytes).map(format_bytes),
            (FormatKind::Milliseconds, RawValue::Number(millis)) => {
                finite(*millis).map(|millis| format!("{:.0} ms", millis))
            }
            (FormatKind::Duration, RawValue::Number(seconds)) => finite(*seconds)
                .filter(|seconds| *seconds >= 0.0)
                .map(|seconds| format_duration(seconds as u64)),
            (FormatKind::LocalDateTime, RawValue::Timestamp(timestamp)) => {
                Some(format_local_datetime(timestamp))
            }
            (FormatKind::LocalDateTime, RawValue::Number(epoch_millis)) => finite(*epoch_millis)
                .and_then(|millis| DateTime::from_timestamp_millis(millis as i64))
                .map(|timestamp| format_local_datetime(&timestamp)),
            (FormatKind::Joined, RawValue::List(items)) => Some(join_list(items)),
            (FormatKind::Joined, RawValue::Text(text)) => Some(text.clone()),
            (FormatKind::YesNo, RawValue::Flag(flag)) => {
                Some(if *flag { "Yes" } else { "No" }.to_string())
            }
            _ => None,
        }
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn render_plain(raw: &RawValue) -> String {
    match raw {
        RawValue::Text(text) => text.clone(),
        RawValue::Number(number) => number.to_string(),
        RawValue::List(items) => join_list(items),
        RawValue::Flag(flag) => flag.to_string(),
        RawValue::Timestamp(timestamp) => format_local_datetime(timestamp),
    }
}

/// Formats a fraction as a whole percentage
///
/// # Examples
///
/// ```
/// use device_snapshot::attributes::formatting::format_percent;
///
/// assert_eq!(format_percent(0.76), "76%");
/// assert_eq!(format_percent(1.0), "100%");
/// ```
pub fn format_percent(fraction: f64) -> String {
    format!("{}%", (fraction * 100.0).round() as i64)
}

/// Formats a byte count in megabytes with two decimals
///
/// # Examples
///
/// ```
/// use device_snapshot::attributes::formatting::format_megabytes;
///
/// assert_eq!(format_megabytes(1048576.0), "1.00 MB");
/// assert_eq!(format_megabytes(0.0), "0.00 MB");
/// ```
pub fn format_megabytes(bytes: f64) -> String {
    format!("{:.2} MB", bytes / MEGABYTE)
}

/// Formats byte values with appropriate units
///
/// Converts raw byte values into human-readable format with appropriate
/// unit prefixes (B, KB, MB, GB, TB).
///
/// # Arguments
///
/// * `bytes` - Byte count as a floating-point value
///
/// # Returns
///
/// A formatted string with the byte value and appropriate unit
///
/// # Examples
///
/// ```
/// use device_snapshot::attributes::formatting::format_bytes;
///
/// assert_eq!(format_bytes(0.0), "0 B");
/// assert_eq!(format_bytes(1024.0), "1.00 KB");
/// assert_eq!(format_bytes(1073741824.0), "1.00 GB");
/// ```
pub fn format_bytes(bytes: f64) -> String {
    const UNITS: &[&str] = &["KB", "MB", "GB", "TB"];

    if bytes < 1024.0 {
        return format!("{:.0} B", bytes);
    }

    let mut value = bytes / 1024.0;
    let mut unit_index = 0;
    while value >= 1024.0 && unit_index < UNITS.len() - 1 {
        value /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", value, UNITS[unit_index])
}

/// Formats a number of seconds as a compact duration such as `"2d 3h 4m"`
pub fn format_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Formats a UTC timestamp as a local date-time string
pub fn format_local_datetime(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Joins list items with `", "`, skipping blank items
pub fn join_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
