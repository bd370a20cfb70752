use serde::{Deserialize, Serialize};

/// Categorical weather state paired with its icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub label: String,
    pub icon_url: String,
}

/// One weather observation for a specific hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourRecord {
    /// Local time as reported by the provider, `YYYY-MM-DD HH:MM`.
    pub timestamp: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_kph: f64,
    pub pressure_mb: f64,
    pub condition: Condition,
}

impl HourRecord {
    /// The `HH:MM` part of the timestamp, or the whole timestamp if it has no time part.
    pub fn time_of_day(&self) -> &str {
        self.timestamp
            .split_once(' ')
            .map(|(_, time)| time)
            .unwrap_or(&self.timestamp)
    }
}

/// Ordered sequence of hourly records covering the trailing 24 hours.
///
/// Built by [`crate::stitch::stitch`]; timestamps are unique and strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeatherWindow {
    records: Vec<HourRecord>,
}

impl WeatherWindow {
    pub const EMPTY: WeatherWindow = WeatherWindow {
        records: Vec::new(),
    };

    pub fn empty() -> Self {
        Self::EMPTY
    }

    pub(crate) fn from_ordered(records: Vec<HourRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[HourRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HourRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a WeatherWindow {
    type Item = &'a HourRecord;
    type IntoIter = std::slice::Iter<'a, HourRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
