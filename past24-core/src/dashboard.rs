//! Dashboard state: the selected city and filter plus the one authoritative window.
//!
//! A fetch cycle is split in three so that superseded fetches can be dropped:
//! [`Dashboard::begin_fetch`] hands out a [`FetchTicket`], [`run_fetch`] does the
//! network work, and [`Dashboard::complete`] publishes the result only if the
//! ticket is still the latest one.

use std::sync::Arc;

use log::{error, info, warn};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::{
    clock::TimeWindow,
    fetch::fetch_day_pair_cancellable,
    model::{HourRecord, WeatherWindow},
    provider::{FetchError, HistoryProvider},
    stats::{ConditionFrequency, WindowStats, format_fahrenheit},
    stitch::stitch,
    view::{ALL_CONDITIONS, ConditionFilter, decode_timestamp, filter_by_condition, find_by_timestamp},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DashboardState {
    #[default]
    Idle,
    /// A fetch is running; the last published window stays readable.
    Fetching { previous: WeatherWindow },
    Ready(WeatherWindow),
    /// Last fetch failed; the window is empty.
    Failed,
}

/// Handle for one in-flight fetch cycle.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    city: String,
    window: TimeWindow,
    cancel: CancellationToken,
}

impl FetchTicket {
    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of running a [`FetchTicket`].
#[derive(Debug)]
pub struct FetchOutcome {
    ticket: FetchTicket,
    result: Result<WeatherWindow, FetchError>,
}

/// What happened when an outcome was handed back to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Publish {
    Ready,
    Failed,
    /// A newer fetch was started; the outcome was dropped.
    Stale,
}

/// Fetch and stitch the window described by `ticket`.
pub async fn run_fetch<P>(provider: &P, ticket: FetchTicket) -> FetchOutcome
where
    P: HistoryProvider + ?Sized,
{
    let result = fetch_day_pair_cancellable(provider, &ticket.city, &ticket.window, &ticket.cancel)
        .await
        .map(|pair| stitch(&pair.yesterday, &pair.today));

    FetchOutcome { ticket, result }
}

/// High/low in Fahrenheit plus the dominant condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub high_f: Option<String>,
    pub low_f: Option<String>,
    pub dominant_condition: String,
}

/// One hour as shown on the detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView<'w> {
    pub record: &'w HourRecord,
    pub temperature_f: String,
    pub feels_like_f: String,
}

#[derive(Debug)]
pub struct Dashboard<P> {
    provider: Arc<P>,
    city: String,
    filter: ConditionFilter,
    state: DashboardState,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl<P: HistoryProvider> Dashboard<P> {
    pub fn new(provider: P, city: impl Into<String>) -> Self {
        Self {
            provider: Arc::new(provider),
            city: city.into(),
            filter: ConditionFilter::All,
            state: DashboardState::Idle,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn provider(&self) -> Arc<P> {
        Arc::clone(&self.provider)
    }

    /// Change city and fetch its trailing window for the current local time.
    pub async fn set_city(&mut self, city: impl Into<String>) -> Publish {
        let ticket = self.begin_fetch(city, TimeWindow::now_local());
        let outcome = run_fetch(self.provider.as_ref(), ticket).await;
        self.complete(outcome)
    }

    /// Re-fetch the current city.
    pub async fn refresh(&mut self) -> Publish {
        let city = self.city.clone();
        self.set_city(city).await
    }

    /// Start a fetch cycle: cancels any in-flight fetch and moves to `Fetching`.
    pub fn begin_fetch(&mut self, city: impl Into<String>, window: TimeWindow) -> FetchTicket {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        self.generation += 1;
        self.city = city.into();
        let previous = match std::mem::take(&mut self.state) {
            DashboardState::Ready(window) | DashboardState::Fetching { previous: window } => window,
            DashboardState::Idle | DashboardState::Failed => WeatherWindow::empty(),
        };
        self.state = DashboardState::Fetching { previous };

        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());

        FetchTicket {
            generation: self.generation,
            city: self.city.clone(),
            window,
            cancel,
        }
    }

    /// Publish a finished fetch unless a newer one has started since.
    pub fn complete(&mut self, outcome: FetchOutcome) -> Publish {
        let FetchOutcome { ticket, result } = outcome;

        if ticket.generation != self.generation || ticket.cancel.is_cancelled() {
            warn!(
                "discarding superseded fetch for {} (generation {}, current {})",
                ticket.city, ticket.generation, self.generation
            );
            return Publish::Stale;
        }

        self.in_flight = None;

        match result {
            Ok(window) => {
                info!("loaded {} hours for {}", window.len(), ticket.city);
                self.state = DashboardState::Ready(window);
                Publish::Ready
            }
            Err(err) => {
                error!("Failed to fetch weather data: {err}");
                self.state = DashboardState::Failed;
                Publish::Failed
            }
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.state, DashboardState::Fetching { .. })
    }

    pub fn filter(&self) -> &ConditionFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: ConditionFilter) {
        self.filter = filter;
    }

    /// Last published window; empty until a fetch succeeds and after one fails.
    pub fn window(&self) -> &WeatherWindow {
        static EMPTY: WeatherWindow = WeatherWindow::EMPTY;
        match &self.state {
            DashboardState::Ready(window) | DashboardState::Fetching { previous: window } => window,
            DashboardState::Idle | DashboardState::Failed => &EMPTY,
        }
    }

    pub fn stats(&self) -> WindowStats {
        WindowStats::from_window(self.window())
    }

    pub fn summary(&self) -> Summary {
        let stats = self.stats();
        Summary {
            high_f: stats.high_temp_c.map(format_fahrenheit),
            low_f: stats.low_temp_c.map(format_fahrenheit),
            dominant_condition: stats.dominant_condition,
        }
    }

    /// Values for the condition selector: `"All"` followed by each condition seen.
    pub fn filter_options(&self) -> Vec<String> {
        std::iter::once(ALL_CONDITIONS.to_string())
            .chain(self.stats().unique_conditions())
            .collect()
    }

    /// Filtered records, newest first.
    pub fn table_rows(&self) -> Vec<&HourRecord> {
        let mut rows = filter_by_condition(self.window(), &self.filter);
        rows.reverse();
        rows
    }

    /// `(timestamp, °C)` pairs in chronological order.
    pub fn temperature_series(&self) -> Vec<(&str, f64)> {
        self.window()
            .iter()
            .map(|r| (r.timestamp.as_str(), r.temperature_c))
            .collect()
    }

    pub fn condition_bars(&self) -> ConditionFrequency {
        ConditionFrequency::from_records(self.window())
    }

    /// Look up one hour by a possibly percent-encoded timestamp.
    pub fn detail(&self, timestamp: &str) -> Option<DetailView<'_>> {
        let decoded = decode_timestamp(timestamp);
        find_by_timestamp(self.window(), &decoded).map(|record| DetailView {
            record,
            temperature_f: format_fahrenheit(record.temperature_c),
            feels_like_f: format_fahrenheit(record.feels_like_c),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;

    use super::*;
    use crate::{
        fetch::testing::FakeProvider,
        model::fixtures::{day, record},
        stats::NO_CONDITION,
    };

    fn time_window(hour: u32) -> TimeWindow {
        TimeWindow {
            yesterday: NaiveDate::from_ymd_opt(2025, 4, 4).unwrap(),
            today: NaiveDate::from_ymd_opt(2025, 4, 5).unwrap(),
            current_hour: hour,
        }
    }

    fn austin_today() -> Vec<HourRecord> {
        let mut hours = day("2025-04-05");
        hours[3] = record("2025-04-05 03:00", -2.0, "Mist");
        hours[5] = record("2025-04-05 05:00", 30.0, "Mist");
        hours
    }

    fn provider() -> FakeProvider {
        let w = time_window(0);
        FakeProvider::default()
            .with_day("Austin", w.yesterday, day("2025-04-04"))
            .with_day("Austin", w.today, austin_today())
            .with_day("Paris", w.yesterday, day("2025-04-04"))
            .with_day("Paris", w.today, day("2025-04-05"))
            .failing_on("Nowhere", w.today)
    }

    async fn load(dash: &mut Dashboard<FakeProvider>, city: &str, hour: u32) -> Publish {
        let ticket = dash.begin_fetch(city, time_window(hour));
        let outcome = run_fetch(dash.provider().as_ref(), ticket).await;
        dash.complete(outcome)
    }

    #[test]
    fn starts_idle_and_empty() {
        let dash = Dashboard::new(provider(), "Austin");

        assert_eq!(dash.state(), &DashboardState::Idle);
        assert!(dash.window().is_empty());
        assert_eq!(dash.filter_options(), ["All"]);
        assert_eq!(dash.summary().dominant_condition, NO_CONDITION);
    }

    #[test]
    fn begin_fetch_moves_to_fetching_from_any_state() {
        let mut dash = Dashboard::new(provider(), "Austin");
        dash.begin_fetch("Paris", time_window(3));

        assert!(dash.is_fetching());
        assert_eq!(dash.city(), "Paris");
        assert!(dash.window().is_empty());
    }

    #[tokio::test]
    async fn previous_window_stays_visible_while_fetching() {
        let mut dash = Dashboard::new(provider(), "Austin");
        load(&mut dash, "Austin", 9).await;

        let _superseded = dash.begin_fetch("Paris", time_window(9));

        assert!(dash.is_fetching());
        assert_eq!(dash.window().len(), 24);
        assert_eq!(dash.stats().high_temp_c, Some(33.0));
        assert_eq!(dash.table_rows().len(), 24);

        // Restarting before the first fetch completes still keeps it.
        let ticket = dash.begin_fetch("Paris", time_window(9));
        assert_eq!(dash.window().len(), 24);

        let outcome = run_fetch(dash.provider().as_ref(), ticket).await;
        assert_eq!(dash.complete(outcome), Publish::Ready);
        assert!(dash.window().iter().all(|r| r.condition.label == "Sunny"));
    }

    #[tokio::test]
    async fn failure_after_fetching_clears_previous_window() {
        let mut dash = Dashboard::new(provider(), "Austin");
        load(&mut dash, "Austin", 9).await;

        let ticket = dash.begin_fetch("Nowhere", time_window(9));
        assert_eq!(dash.window().len(), 24);

        let outcome = run_fetch(dash.provider().as_ref(), ticket).await;
        assert_eq!(dash.complete(outcome), Publish::Failed);
        assert!(dash.window().is_empty());
    }

    #[tokio::test]
    async fn successful_fetch_publishes_full_window() {
        let mut dash = Dashboard::new(provider(), "Austin");

        assert_eq!(load(&mut dash, "Austin", 9).await, Publish::Ready);

        let w = dash.window();
        assert_eq!(w.len(), 24);
        assert_eq!(w.records()[0].timestamp, "2025-04-04 10:00");
        assert_eq!(w.records()[23].timestamp, "2025-04-05 09:00");
    }

    #[tokio::test]
    async fn summary_reports_fahrenheit_and_dominant() {
        let mut dash = Dashboard::new(provider(), "Austin");
        load(&mut dash, "Austin", 9).await;

        let summary = dash.summary();
        assert_eq!(summary.high_f.as_deref(), Some("91.4")); // 33 °C yesterday 23:00
        assert_eq!(summary.low_f.as_deref(), Some("28.4")); // -2 °C
        assert_eq!(summary.dominant_condition, "Sunny");
        assert_eq!(dash.filter_options(), ["All", "Sunny", "Mist"]);
    }

    #[tokio::test]
    async fn failure_resets_to_empty_window() {
        let mut dash = Dashboard::new(provider(), "Austin");
        load(&mut dash, "Austin", 9).await;
        assert!(!dash.window().is_empty());

        assert_eq!(load(&mut dash, "Nowhere", 9).await, Publish::Failed);

        assert_eq!(dash.state(), &DashboardState::Failed);
        assert!(dash.window().is_empty());

        let stats = dash.stats();
        assert_eq!(stats.high_temp_c, None);
        assert_eq!(stats.low_temp_c, None);
        assert_eq!(stats.dominant_condition, NO_CONDITION);
        assert!(dash.table_rows().is_empty());
    }

    #[tokio::test]
    async fn stale_outcome_is_discarded() {
        let mut dash = Dashboard::new(provider(), "Austin");

        let first = dash.begin_fetch("Austin", time_window(9));
        let second = dash.begin_fetch("Paris", time_window(9));

        let provider = dash.provider();
        let late = run_fetch(provider.as_ref(), first).await;
        let fresh = run_fetch(provider.as_ref(), second).await;

        assert_eq!(dash.complete(fresh), Publish::Ready);
        assert_eq!(dash.complete(late), Publish::Stale);

        assert_eq!(dash.city(), "Paris");
        assert!(dash.window().iter().all(|r| r.condition.label == "Sunny"));
    }

    #[tokio::test]
    async fn superseded_fetch_is_cancelled() {
        let slow = provider().delayed("Austin", Duration::from_secs(30));
        let mut dash = Dashboard::new(slow, "Austin");

        let first = dash.begin_fetch("Austin", time_window(9));
        let provider = dash.provider();
        let running = tokio::spawn(async move { run_fetch(provider.as_ref(), first).await });

        dash.begin_fetch("Paris", time_window(9));

        let outcome = running.await.expect("task joins");
        assert!(matches!(outcome.result, Err(FetchError::Cancelled { .. })));
        assert_eq!(dash.complete(outcome), Publish::Stale);
        assert!(dash.is_fetching());
    }

    #[tokio::test]
    async fn table_is_filtered_and_newest_first() {
        let mut dash = Dashboard::new(provider(), "Austin");
        load(&mut dash, "Austin", 9).await;

        dash.set_filter(ConditionFilter::Label("Mist".into()));
        let rows: Vec<_> = dash.table_rows().iter().map(|r| r.time_of_day()).collect();
        assert_eq!(rows, ["05:00", "03:00"]);

        dash.set_filter(ConditionFilter::All);
        let rows = dash.table_rows();
        assert_eq!(rows.len(), 24);
        assert_eq!(rows[0].timestamp, "2025-04-05 09:00");
    }

    #[tokio::test]
    async fn chart_feeds() {
        let mut dash = Dashboard::new(provider(), "Austin");
        load(&mut dash, "Austin", 9).await;

        let series = dash.temperature_series();
        assert_eq!(series.len(), 24);
        assert_eq!(series[0], ("2025-04-04 10:00", 20.0));

        let freq = dash.condition_bars();
        let bars: Vec<_> = freq.iter().collect();
        assert_eq!(bars, [("Sunny", 22), ("Mist", 2)]);
    }

    #[tokio::test]
    async fn detail_accepts_encoded_timestamp() {
        let mut dash = Dashboard::new(provider(), "Austin");
        load(&mut dash, "Austin", 9).await;

        let detail = dash.detail("2025-04-05%2003%3A00").expect("present");
        assert_eq!(detail.record.condition.label, "Mist");
        assert_eq!(detail.temperature_f, "28.4");
        assert_eq!(detail.feels_like_f, "26.6");

        assert!(dash.detail("2025-04-05 11:00").is_none());
    }

    #[tokio::test]
    async fn changing_filter_does_not_refetch() {
        let mut dash = Dashboard::new(provider(), "Austin");
        load(&mut dash, "Austin", 9).await;
        let calls = dash.provider().call_count();

        dash.set_filter("Mist".into());
        let _ = dash.table_rows();

        assert_eq!(dash.provider().call_count(), calls);
    }
}
