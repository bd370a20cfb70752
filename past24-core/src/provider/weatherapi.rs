use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{Condition, HourRecord};

use super::{FetchError, HistoryProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl HistoryProvider for WeatherApiProvider {
    async fn day_history(&self, city: &str, date: NaiveDate) -> Result<Vec<HourRecord>, FetchError> {
        let url = format!("{}/history.json", self.base_url);
        let dt = date.format("%Y-%m-%d").to_string();

        debug!("GET {url} q={city} dt={dt}");

        let transport = |source: reqwest::Error| FetchError::Transport {
            city: city.to_string(),
            date,
            source,
        };

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", city), ("dt", dt.as_str())])
            .send()
            .await
            .map_err(transport)?;

        let status = res.status();
        let body = res.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(FetchError::Status {
                city: city.to_string(),
                date,
                status,
                body: truncate_body(&body),
            });
        }

        parse_history(&body, city, date)
    }
}

/// Parse a `history.json` body into hourly records.
pub fn parse_history(body: &str, city: &str, date: NaiveDate) -> Result<Vec<HourRecord>, FetchError> {
    let parsed: WaHistoryResponse =
        serde_json::from_str(body).map_err(|source| FetchError::Malformed {
            city: city.to_string(),
            date,
            source,
        })?;

    let day = parsed
        .forecast
        .forecastday
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::MissingDay {
            city: city.to_string(),
            date,
        })?;

    Ok(day.hour.into_iter().map(HourRecord::from).collect())
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaHistoryHour {
    time: String,
    temp_c: f64,
    feelslike_c: f64,
    humidity: u8,
    wind_kph: f64,
    pressure_mb: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaHistoryDay {
    hour: Vec<WaHistoryHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaHistoryDay>,
}

#[derive(Debug, Deserialize)]
struct WaHistoryResponse {
    forecast: WaForecast,
}

impl From<WaHistoryHour> for HourRecord {
    fn from(h: WaHistoryHour) -> Self {
        HourRecord {
            timestamp: h.time,
            temperature_c: h.temp_c,
            feels_like_c: h.feelslike_c,
            humidity_pct: h.humidity,
            wind_kph: h.wind_kph,
            pressure_mb: h.pressure_mb,
            condition: Condition {
                label: h.condition.text,
                icon_url: absolute_icon_url(h.condition.icon),
            },
        }
    }
}

/// weatherapi.com returns protocol-relative icon URLs (`//cdn.weatherapi.com/...`).
fn absolute_icon_url(icon: String) -> String {
    if icon.starts_with("//") {
        format!("https:{icon}")
    } else {
        icon
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
