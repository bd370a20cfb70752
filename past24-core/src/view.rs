use std::{convert::Infallible, fmt, str::FromStr};

use crate::model::{HourRecord, WeatherWindow};

/// Filter value that selects every record.
pub const ALL_CONDITIONS: &str = "All";

/// Condition filter selected in the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConditionFilter {
    #[default]
    All,
    /// Exact, case-sensitive condition label.
    Label(String),
}

impl ConditionFilter {
    pub fn matches(&self, record: &HourRecord) -> bool {
        match self {
            ConditionFilter::All => true,
            ConditionFilter::Label(label) => record.condition.label == *label,
        }
    }
}

impl FromStr for ConditionFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == ALL_CONDITIONS {
            ConditionFilter::All
        } else {
            ConditionFilter::Label(s.to_string())
        })
    }
}

impl From<&str> for ConditionFilter {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(filter) => filter,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for ConditionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionFilter::All => f.write_str(ALL_CONDITIONS),
            ConditionFilter::Label(label) => f.write_str(label),
        }
    }
}

/// Records matching `filter`, in window order.
pub fn filter_by_condition<'w>(
    window: &'w WeatherWindow,
    filter: &ConditionFilter,
) -> Vec<&'w HourRecord> {
    window.iter().filter(|r| filter.matches(r)).collect()
}

/// The record whose timestamp equals `timestamp` exactly.
///
/// `timestamp` must already be decoded; see [`decode_timestamp`].
pub fn find_by_timestamp<'w>(window: &'w WeatherWindow, timestamp: &str) -> Option<&'w HourRecord> {
    window.iter().find(|r| r.timestamp == timestamp)
}

/// Percent-decode a timestamp taken from a detail route.
///
/// Input that does not decode to UTF-8 is returned as-is.
pub fn decode_timestamp(encoded: &str) -> String {
    urlencoding::decode(encoded)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| encoded.to_string())
}

/// Percent-encode a timestamp for use in a detail route.
pub fn encode_timestamp(timestamp: &str) -> String {
    urlencoding::encode(timestamp).into_owned()
}
