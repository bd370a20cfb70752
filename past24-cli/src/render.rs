//! Plain-text rendering of the dashboard panels.

use past24_core::{
    ConditionFrequency, HistoryProvider, HourRecord,
    dashboard::{Dashboard, DetailView, Summary},
};

/// Block characters for temperature levels (8 levels).
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const BAR_WIDTH: usize = 24;

const NO_DATA: &str = "Loading or no data...\n";

pub fn dashboard<P: HistoryProvider>(dash: &Dashboard<P>) -> String {
    let mut out = format!("Past 24-Hour Weather for: {}\n\n", dash.city());

    if dash.window().is_empty() {
        out.push_str(NO_DATA);
        return out;
    }

    out.push_str(&summary(&dash.summary()));
    out.push_str(&format!(
        "\nFilter options: {}\nFilter: {}\n\n",
        dash.filter_options().join(", "),
        dash.filter(),
    ));

    let rows = dash.table_rows();
    if rows.is_empty() {
        out.push_str(NO_DATA);
    } else {
        out.push_str(&table(&rows));
    }

    let temps: Vec<f64> = dash.temperature_series().iter().map(|(_, t)| *t).collect();
    out.push_str(&format!("\nTemperature (°C): {}\n\nConditions:\n", sparkline(&temps)));
    out.push_str(&condition_bars(&dash.condition_bars()));

    out
}

pub fn summary(summary: &Summary) -> String {
    let dash = "-".to_string();
    format!(
        "Summary Stats (Last 24 Hours)\n\
         High Temp: {}°F\n\
         Low Temp: {}°F\n\
         Most Common Condition: {}\n",
        summary.high_f.as_ref().unwrap_or(&dash),
        summary.low_f.as_ref().unwrap_or(&dash),
        summary.dominant_condition,
    )
}

pub fn table(rows: &[&HourRecord]) -> String {
    let label_width = rows
        .iter()
        .map(|r| r.condition.label.chars().count())
        .max()
        .unwrap_or(0)
        .max("Condition".len());

    let header = format!("{:<5}  {:>9}  {:<label_width$}  Icon\n", "Time", "Temp (°C)", "Condition");
    rows.iter().fold(header, |mut out, r| {
        out.push_str(&format!(
            "{:<5}  {:>9.1}  {:<label_width$}  {}\n",
            r.time_of_day(),
            r.temperature_c,
            r.condition.label,
            r.condition.icon_url,
        ));
        out
    })
}

pub fn sparkline(values: &[f64]) -> String {
    let (Some(min), Some(max)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return String::new();
    };

    let span = max - min;
    values
        .iter()
        .map(|v| {
            let normalized = if span > 0.0 { (v - min) / span } else { 0.5 };
            let index = ((normalized * 7.0).round() as usize).min(7);
            BLOCKS[index]
        })
        .collect()
}

pub fn condition_bars(freq: &ConditionFrequency) -> String {
    let top = freq.iter().map(|(_, c)| c).max().unwrap_or(0);
    let label_width = freq.labels().map(|l| l.chars().count()).max().unwrap_or(0);

    freq.iter()
        .map(|(label, count)| {
            let len = if top == 0 { 0 } else { count * BAR_WIDTH / top };
            format!("  {label:<label_width$}  {} {count}\n", "█".repeat(len.max(1)))
        })
        .collect()
}

pub fn detail(timestamp: &str, view: Option<&DetailView<'_>>) -> String {
    let Some(view) = view else {
        return "Loading data or no data found for this time.\n".to_string();
    };

    let r = view.record;
    format!(
        "Weather Details for {timestamp}\n\
         Temperature: {}°F\n\
         Condition: {}\n\
         Feels Like: {}°F\n\
         Humidity: {}%\n\
         Wind Speed: {} kph\n\
         Pressure: {} mb\n\
         Icon: {}\n",
        view.temperature_f,
        r.condition.label,
        view.feels_like_f,
        r.humidity_pct,
        r.wind_kph,
        r.pressure_mb,
        r.condition.icon_url,
    )
}
