use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use past24_core::{
    Config, ConditionFilter, Dashboard, Publish, WeatherApiProvider, provider::provider_from_config,
    view::ALL_CONDITIONS,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "past24", version, about = "Past 24 hours of weather for a city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weatherapi.com key and a default city.
    Configure,

    /// Show the dashboard for a city.
    Show {
        /// City name; falls back to the configured default.
        city: Option<String>,

        /// Only list hours with this exact condition label ("All" for every hour).
        #[arg(long, default_value = ALL_CONDITIONS)]
        condition: String,

        /// Print the stitched window as JSON instead of the dashboard.
        #[arg(long)]
        json: bool,
    },

    /// Show a single hour, e.g. `past24 detail --city Austin "2025-04-05 14:00"`.
    Detail {
        /// City name; falls back to the configured default.
        #[arg(long)]
        city: Option<String>,

        /// Timestamp `YYYY-MM-DD HH:MM`, optionally percent-encoded.
        timestamp: String,
    },

    /// Interactive dashboard: pick cities and filters until you quit.
    Watch {
        /// Initial city; falls back to the configured default.
        city: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                city,
                condition,
                json,
            } => {
                let (mut dash, config) = dashboard()?;
                let city = config.city_or_default(city.as_deref());
                dash.set_city(city).await;
                dash.set_filter(ConditionFilter::from(condition.as_str()));

                if json {
                    let body = serde_json::to_string_pretty(dash.window())
                        .context("Failed to serialize weather window")?;
                    println!("{body}");
                } else {
                    print!("{}", render::dashboard(&dash));
                }
                Ok(())
            }
            Command::Detail { city, timestamp } => {
                let (mut dash, config) = dashboard()?;
                dash.set_city(config.city_or_default(city.as_deref())).await;

                let view = dash.detail(&timestamp);
                print!("{}", render::detail(&timestamp, view.as_ref()));
                Ok(())
            }
            Command::Watch { city } => {
                let (mut dash, config) = dashboard()?;
                dash.set_city(config.city_or_default(city.as_deref())).await;
                watch(&mut dash).await
            }
        }
    }
}

fn dashboard() -> anyhow::Result<(Dashboard<WeatherApiProvider>, Config)> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    let dash = Dashboard::new(provider, config.city_or_default(None));
    Ok((dash, config))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("weatherapi.com API key:")
        .with_default(config.api_key.as_deref().unwrap_or_default())
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key);

    let city = Text::new("Default city:")
        .with_default(&config.city_or_default(None))
        .prompt()
        .context("Failed to read default city")?;
    config.set_default_city(city);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

const CHANGE_CITY: &str = "Change city";
const CHANGE_FILTER: &str = "Change condition filter";
const SHOW_DETAIL: &str = "Show hour details";
const REFRESH: &str = "Refresh";
const QUIT: &str = "Quit";

/// One-line notice for the user after a fetch, if it needs one.
fn fetch_notice(publish: Publish) -> Option<&'static str> {
    match publish {
        Publish::Failed => Some("Could not load weather data; showing no data."),
        Publish::Ready | Publish::Stale => None,
    }
}

async fn watch(dash: &mut Dashboard<WeatherApiProvider>) -> anyhow::Result<()> {
    loop {
        print!("{}", render::dashboard(dash));
        println!();

        let action = Select::new(
            "What next?",
            vec![CHANGE_CITY, CHANGE_FILTER, SHOW_DETAIL, REFRESH, QUIT],
        )
        .prompt()
        .context("Failed to read selection")?;

        match action {
            CHANGE_CITY => {
                let city = Text::new("City:").with_default(dash.city()).prompt()?;
                if let Some(notice) = fetch_notice(dash.set_city(city).await) {
                    println!("{notice}");
                }
            }
            CHANGE_FILTER => {
                let choice = Select::new("Condition:", dash.filter_options()).prompt()?;
                dash.set_filter(ConditionFilter::from(choice.as_str()));
            }
            SHOW_DETAIL => {
                let times: Vec<String> = dash
                    .table_rows()
                    .iter()
                    .map(|r| r.timestamp.clone())
                    .collect();
                if times.is_empty() {
                    println!("No hours to show.");
                    continue;
                }
                let ts = Select::new("Hour:", times).prompt()?;
                let view = dash.detail(&ts);
                println!();
                print!("{}", render::detail(&ts, view.as_ref()));
                println!();
            }
            REFRESH => {
                if let Some(notice) = fetch_notice(dash.refresh().await) {
                    println!("{notice}");
                }
            }
            _ => return Ok(()),
        }
    }
}
