//! Two-day history fetch: yesterday in full, today up to the current hour.

use log::debug;
use tokio_util::sync::CancellationToken;

use crate::{
    clock::TimeWindow,
    model::HourRecord,
    provider::{FetchError, HistoryProvider},
};

/// Raw records for the two days that make up the trailing window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayPair {
    pub yesterday: Vec<HourRecord>,
    /// Only hours observed so far today.
    pub today: Vec<HourRecord>,
}

/// Request both days concurrently and wait for both.
///
/// Fails as a unit: if either request fails no records are returned.
pub async fn fetch_day_pair<P>(
    provider: &P,
    city: &str,
    window: &TimeWindow,
) -> Result<DayPair, FetchError>
where
    P: HistoryProvider + ?Sized,
{
    debug!(
        "fetching {city}: {} + {} up to hour {}",
        window.yesterday, window.today, window.current_hour
    );

    let (yesterday, mut today) = tokio::try_join!(
        provider.day_history(city, window.yesterday),
        provider.day_history(city, window.today),
    )?;

    today.truncate(window.hours_elapsed_today());

    Ok(DayPair { yesterday, today })
}

/// Like [`fetch_day_pair`], but gives up as soon as `cancel` fires.
pub async fn fetch_day_pair_cancellable<P>(
    provider: &P,
    city: &str,
    window: &TimeWindow,
    cancel: &CancellationToken,
) -> Result<DayPair, FetchError>
where
    P: HistoryProvider + ?Sized,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FetchError::Cancelled { city: city.to_string() }),
        res = fetch_day_pair(provider, city, window) => res,
    }
}
