//! Raw attribute values as returned by a source before formatting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Typed value produced by an attribute fetch
///
/// Sources return one of these kinds; turning them into display text is the
/// formatter's job, never the fetch step's.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum RawValue {
    /// Free-form text such as a model name or OS version
    Text(String),
    /// Any numeric quantity (bytes, fractions, counts, epoch values)
    Number(f64),
    /// Ordered list of strings such as interface names or ABIs
    List(Vec<String>),
    /// Boolean capability flag
    Flag(bool),
    /// Point in time
    Timestamp(DateTime<Utc>),
}

impl RawValue {
    /// Short name of the value kind, used in log output
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Text(_) => "text",
            RawValue::Number(_) => "number",
            RawValue::List(_) => "list",
            RawValue::Flag(_) => "flag",
            RawValue::Timestamp(_) => "timestamp",
        }
    }

    /// Returns true when the value carries no information worth displaying
    ///
    /// Empty text and empty lists are treated the same as a missing value.
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Text(text) => text.trim().is_empty(),
            RawValue::List(items) => items.iter().all(|item| item.trim().is_empty()),
            _ => false,
        }
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<u64> for RawValue {
    fn from(value: u64) -> Self {
        RawValue::Number(value as f64)
    }
}

impl From<usize> for RawValue {
    fn from(value: usize) -> Self {
        RawValue::Number(value as f64)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Flag(value)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(value: Vec<String>) -> Self {
        RawValue::List(value)
    }
}

impl From<DateTime<Utc>> for RawValue {
    fn from(value: DateTime<Utc>) -> Self {
        RawValue::Timestamp(value)
    }
}
