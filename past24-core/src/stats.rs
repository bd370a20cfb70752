//! Summary statistics derived from a [`WeatherWindow`].
//!
//! Nothing here is cached: every value is recomputed from the window it is given.

use serde::Serialize;

use crate::model::{HourRecord, WeatherWindow};

/// Dominant condition reported for an empty window.
pub const NO_CONDITION: &str = "None";

/// Condition label → occurrence count, iterated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConditionFrequency {
    entries: Vec<(String, usize)>,
}

impl ConditionFrequency {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a HourRecord>) -> Self {
        let mut freq = Self::default();
        for record in records {
            freq.increment(&record.condition.label);
        }
        freq
    }

    fn increment(&mut self, label: &str) {
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((label.to_string(), 1)),
        }
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(l, c)| (l.as_str(), *c))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label with the highest count; ties go to the label seen first.
    pub fn dominant(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (label, count) in self.iter() {
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((label, count));
            }
        }
        best.map(|(label, _)| label)
    }
}

pub fn high_temp(window: &WeatherWindow) -> Option<f64> {
    window.iter().map(|r| r.temperature_c).reduce(f64::max)
}

pub fn low_temp(window: &WeatherWindow) -> Option<f64> {
    window.iter().map(|r| r.temperature_c).reduce(f64::min)
}

/// Most frequent condition label, or [`NO_CONDITION`] for an empty window.
pub fn dominant_condition(window: &WeatherWindow) -> String {
    ConditionFrequency::from_records(window)
        .dominant()
        .unwrap_or(NO_CONDITION)
        .to_string()
}

/// Distinct condition labels in first-seen order.
pub fn unique_conditions(window: &WeatherWindow) -> Vec<String> {
    ConditionFrequency::from_records(window)
        .labels()
        .map(str::to_owned)
        .collect()
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Fahrenheit with exactly one decimal place, e.g. `"32.0"`.
///
/// Uses Rust's fixed-point formatting, which rounds the binary value half-to-even.
pub fn format_fahrenheit(celsius: f64) -> String {
    format!("{:.1}", celsius_to_fahrenheit(celsius))
}

/// All window statistics computed in one pass over the condition labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowStats {
    pub high_temp_c: Option<f64>,
    pub low_temp_c: Option<f64>,
    pub dominant_condition: String,
    pub condition_frequency: ConditionFrequency,
}

impl WindowStats {
    pub fn from_window(window: &WeatherWindow) -> Self {
        let condition_frequency = ConditionFrequency::from_records(window);
        let dominant_condition = condition_frequency
            .dominant()
            .unwrap_or(NO_CONDITION)
            .to_string();

        Self {
            high_temp_c: high_temp(window),
            low_temp_c: low_temp(window),
            dominant_condition,
            condition_frequency,
        }
    }

    pub fn unique_conditions(&self) -> Vec<String> {
        self.condition_frequency.labels().map(str::to_owned).collect()
    }
}
