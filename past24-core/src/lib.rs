//! Core library for the `past24` weather dashboard.
//!
//! This crate defines:
//! - Resolution of the trailing 24-hour time window
//! - The history provider abstraction and its weatherapi.com client
//! - Stitching two daily responses into one window
//! - Statistics, filtering and lookup over that window
//! - The dashboard state container that ties them together
//!
//! It is used by `past24-cli`, but can also be reused by other front ends.

pub mod clock;
pub mod config;
pub mod dashboard;
pub mod fetch;
pub mod model;
pub mod provider;
pub mod stats;
pub mod stitch;
pub mod view;

pub use clock::TimeWindow;
pub use config::Config;
pub use dashboard::{Dashboard, DashboardState, DetailView, Publish, Summary};
pub use fetch::{DayPair, fetch_day_pair};
pub use model::{Condition, HourRecord, WeatherWindow};
pub use provider::{FetchError, HistoryProvider, weatherapi::WeatherApiProvider};
pub use stats::{ConditionFrequency, WindowStats};
pub use stitch::stitch;
pub use view::ConditionFilter;
