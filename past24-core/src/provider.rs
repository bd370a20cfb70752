use crate::{Config, HourRecord, provider::weatherapi::WeatherApiProvider};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Debug;
use thiserror::Error;

pub mod weatherapi;

/// Any failure while fetching one day of history.
///
/// Callers treat every variant the same way; the distinction only feeds the log.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {city} on {date} failed: {source}")]
    Transport {
        city: String,
        date: NaiveDate,
        #[source]
        source: reqwest::Error,
    },

    #[error("provider returned status {status} for {city} on {date}: {body}")]
    Status {
        city: String,
        date: NaiveDate,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed provider response for {city} on {date}: {source}")]
    Malformed {
        city: String,
        date: NaiveDate,
        #[source]
        source: serde_json::Error,
    },

    #[error("provider response for {city} on {date} contained no forecastday data")]
    MissingDay { city: String, date: NaiveDate },

    #[error("fetch for {city} was superseded")]
    Cancelled { city: String },
}

/// Source of hourly history for one calendar day.
#[async_trait]
pub trait HistoryProvider: Send + Sync + Debug {
    /// All hourly records the provider has for `date`, in chronological order.
    async fn day_history(&self, city: &str, date: NaiveDate) -> Result<Vec<HourRecord>, FetchError>;
}

/// Construct the weatherapi.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<WeatherApiProvider> {
    let api_key = config.resolved_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
             Hint: run `past24 configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let provider = match config.base_url.as_deref() {
        Some(base_url) => WeatherApiProvider::with_base_url(api_key, base_url),
        None => WeatherApiProvider::new(api_key),
    };

    Ok(provider)
}
