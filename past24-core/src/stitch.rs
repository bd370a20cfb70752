use crate::model::{HourRecord, WeatherWindow};

/// Length of a complete trailing window.
pub const WINDOW_HOURS: usize = 24;

/// Merge yesterday's records with today's observed hours into one trailing window.
///
/// Takes the last `24 - today.len()` hours of yesterday (none if today already
/// fills the window) followed by today. The result never exceeds
/// [`WINDOW_HOURS`] entries and its timestamps are strictly increasing; a record
/// that would repeat or go back in time relative to the previous one is dropped.
pub fn stitch(yesterday: &[HourRecord], today: &[HourRecord]) -> WeatherWindow {
    let today = &today[today.len().saturating_sub(WINDOW_HOURS)..];
    let from_yesterday = WINDOW_HOURS.saturating_sub(today.len());
    let yesterday = &yesterday[yesterday.len().saturating_sub(from_yesterday)..];

    let mut records: Vec<HourRecord> = Vec::with_capacity(yesterday.len() + today.len());
    for record in yesterday.iter().chain(today) {
        let advances = records
            .last()
            .is_none_or(|prev| prev.timestamp < record.timestamp);
        if advances {
            records.push(record.clone());
        }
    }

    WeatherWindow::from_ordered(records)
}
