use chrono::{DateTime, Days, Local, NaiveDate, TimeZone, Timelike};

/// Calendar dates and hour boundary needed to request the trailing 24 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub yesterday: NaiveDate,
    pub today: NaiveDate,
    /// Hour of day (0–23) at resolution time.
    pub current_hour: u32,
}

impl TimeWindow {
    /// Resolve the window for `now`, using the calendar of `now`'s own timezone.
    pub fn resolve<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let today = now.date_naive();
        // NaiveDate::MIN has no predecessor; nothing meaningful to fetch there anyway.
        let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);

        Self {
            yesterday,
            today,
            current_hour: now.hour(),
        }
    }

    pub fn now_local() -> Self {
        Self::resolve(&Local::now())
    }

    pub fn yesterday_str(&self) -> String {
        self.yesterday.format("%Y-%m-%d").to_string()
    }

    pub fn today_str(&self) -> String {
        self.today.format("%Y-%m-%d").to_string()
    }

    /// Number of today's hourly records observed so far.
    pub fn hours_elapsed_today(&self) -> usize {
        self.current_hour as usize + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn resolves_dates_and_hour() {
        let now = Utc.with_ymd_and_hms(2025, 4, 5, 9, 30, 0).unwrap();
        let tw = TimeWindow::resolve(&now);

        assert_eq!(tw.yesterday_str(), "2025-04-04");
        assert_eq!(tw.today_str(), "2025-04-05");
        assert_eq!(tw.current_hour, 9);
        assert_eq!(tw.hours_elapsed_today(), 10);
    }

    #[test]
    fn crosses_month_and_year_boundaries() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 5, 0).unwrap();
        let tw = TimeWindow::resolve(&now);

        assert_eq!(tw.yesterday_str(), "2024-12-31");
        assert_eq!(tw.today_str(), "2025-01-01");
        assert_eq!(tw.current_hour, 0);
    }

    #[test]
    fn uses_local_calendar_of_the_instant() {
        // 02:00 UTC on the 5th is still the 4th at UTC-6.
        let tz = FixedOffset::west_opt(6 * 3600).unwrap();
        let now = Utc
            .with_ymd_and_hms(2025, 4, 5, 2, 0, 0)
            .unwrap()
            .with_timezone(&tz);
        let tw = TimeWindow::resolve(&now);

        assert_eq!(tw.today_str(), "2025-04-04");
        assert_eq!(tw.yesterday_str(), "2025-04-03");
        assert_eq!(tw.current_hour, 20);
    }

    #[test]
    fn leap_day() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 0).unwrap();
        let tw = TimeWindow::resolve(&now);

        assert_eq!(tw.yesterday_str(), "2024-02-29");
        assert_eq!(tw.current_hour, 23);
    }
}
