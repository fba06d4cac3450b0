//! Weather snapshot shown in the page header.
//!
//! Condition ids follow the OpenWeatherMap convention (2xx storm, 3xx drizzle,
//! 5xx rain, 6xx snow, 7xx fog, 800 clear, 80x clouds).  This module only maps
//! ids to icons and aggregates forecast samples; fetching lives in the display
//! crate.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Condition id for a clear sky.
pub const CLEAR_SKY: u16 = 800;

/// Location shown when the snapshot carries none.
pub const FALLBACK_LOCATION: &str = "Liège";

/// One hourly forecast slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    /// Display label such as `"14h"`.
    pub time: String,
    pub icon: String,
    pub temp_c: i32,
}

/// One day of the multi-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Short French day name (`"Lun"`, `"Mar"`, ...).
    pub day: String,
    pub icon: String,
    pub min_c: i32,
    pub max_c: i32,
}

/// Everything the weather widgets display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: String,
    pub temp_c: i32,
    pub condition: String,
    pub icon: String,
    pub condition_id: u16,
    pub hourly: Vec<HourlyForecast>,
    pub daily: Vec<DailyForecast>,
}

/// A raw forecast point, already converted to local time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastSample {
    pub at: NaiveDateTime,
    pub temp_c: f64,
    pub condition_id: u16,
}

/// Emoji for a condition id.
pub fn icon_for_condition(id: u16) -> &'static str {
    match id {
        200..=299 => "⛈️",
        300..=399 => "🌦️",
        500..=599 => "🌧️",
        600..=699 => "❄️",
        700..=799 => "🌫️",
        800 => "☀️",
        801 => "🌤️",
        802 => "⛅",
        803 | 804 => "☁️",
        _ => "☀️",
    }
}

const SVG_OPEN: &str = r#"<svg width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">"#;

const SVG_STORM: &str = r#"<path d="M19 16.9A5 5 0 0 0 18 7h-1.26a8 8 0 1 0-11.62 9"/><polyline points="13 11 9 17 15 17 11 23"/>"#;
const SVG_RAIN: &str = r#"<line x1="8" y1="19" x2="8" y2="21"/><line x1="8" y1="13" x2="8" y2="15"/><line x1="16" y1="19" x2="16" y2="21"/><line x1="16" y1="13" x2="16" y2="15"/><line x1="12" y1="21" x2="12" y2="23"/><line x1="12" y1="15" x2="12" y2="17"/><path d="M20 16.58A5 5 0 0 0 18 7h-1.26A8 8 0 1 0 4 15.25"/>"#;
const SVG_SNOW: &str = r#"<path d="M20 17.58A5 5 0 0 0 18 8h-1.26A8 8 0 1 0 4 16.25"/><line x1="8" y1="16" x2="8" y2="16"/><line x1="8" y1="20" x2="8" y2="20"/><line x1="12" y1="18" x2="12" y2="18"/><line x1="12" y1="22" x2="12" y2="22"/><line x1="16" y1="16" x2="16" y2="16"/><line x1="16" y1="20" x2="16" y2="20"/>"#;
const SVG_FOG: &str = r#"<path d="M5 20h14M5 16h14M5 12h14"/>"#;
const SVG_SUN: &str = r#"<circle cx="12" cy="12" r="5"/><line x1="12" y1="1" x2="12" y2="3"/><line x1="12" y1="21" x2="12" y2="23"/><line x1="4.22" y1="4.22" x2="5.64" y2="5.64"/><line x1="18.36" y1="18.36" x2="19.78" y2="19.78"/><line x1="1" y1="12" x2="3" y2="12"/><line x1="21" y1="12" x2="23" y2="12"/><line x1="4.22" y1="19.78" x2="5.64" y2="18.36"/><line x1="18.36" y1="5.64" x2="19.78" y2="4.22"/>"#;
const SVG_FEW_CLOUDS: &str = r#"<path d="M22 15a10 10 0 1 1-17.2-7"/><circle cx="12" cy="12" r="4"/><line x1="12" y1="1" x2="12" y2="3"/><line x1="5" y1="5" x2="6.5" y2="6.5"/><line x1="1" y1="12" x2="3" y2="12"/>"#;
const SVG_CLOUDS: &str = r#"<path d="M18 10h-1.26A8 8 0 1 0 9 20h9a5 5 0 0 0 0-10z"/>"#;

/// Outline SVG markup for a condition id, used by the Sandwich header.
pub fn svg_icon_for_condition(id: u16) -> String {
    let body = match id {
        200..=299 => SVG_STORM,
        300..=599 => SVG_RAIN,
        600..=699 => SVG_SNOW,
        700..=799 => SVG_FOG,
        801 => SVG_FEW_CLOUDS,
        802..=u16::MAX => SVG_CLOUDS,
        _ => SVG_SUN,
    };
    format!("{SVG_OPEN}{body}</svg>")
}

/// Background of the header weather widget for a snapshot.
pub fn widget_background(snapshot: &WeatherSnapshot) -> &'static str {
    let condition = snapshot.condition.to_lowercase();
    let icon = snapshot.icon.as_str();

    if condition.contains("pluie") || condition.contains("rain") || icon == "🌧️" {
        "linear-gradient(135deg, #4a5568 0%, #2d3748 100%)"
    } else if condition.contains("nuage")
        || condition.contains("cloud")
        || icon == "☁️"
        || icon == "⛅"
    {
        "linear-gradient(135deg, #718096 0%, #4a5568 100%)"
    } else if condition.contains("neige") || condition.contains("snow") || icon == "❄️" {
        "linear-gradient(135deg, #e2e8f0 0%, #cbd5e0 100%)"
    } else if icon == "⛈️" {
        "linear-gradient(135deg, #1e293b 0%, #0f172a 100%)"
    } else {
        "linear-gradient(135deg, #667eea 0%, #764ba2 100%)"
    }
}

/// Synthesised sunny snapshot used when no live data is available.
///
/// Hourly labels start at the hour after `current_hour` and are not wrapped
/// past midnight, matching the labels the board has always shown.
pub fn static_snapshot(current_hour: u32) -> WeatherSnapshot {
    let hourly = [("☀️", 20), ("🌤️", 21), ("⛅", 19), ("☁️", 18)]
        .iter()
        .zip(1u32..)
        .map(|((icon, temp), offset)| HourlyForecast {
            time: format!("{}h", current_hour + offset),
            icon: (*icon).to_string(),
            temp_c: *temp,
        })
        .collect();

    let daily = [
        ("Lun", "☀️", 12, 22),
        ("Mar", "🌤️", 13, 21),
        ("Mer", "⛅", 11, 19),
        ("Jeu", "🌧️", 10, 16),
        ("Ven", "☁️", 11, 18),
    ]
    .iter()
    .map(|(day, icon, min_c, max_c)| DailyForecast {
        day: (*day).to_string(),
        icon: (*icon).to_string(),
        min_c: *min_c,
        max_c: *max_c,
    })
    .collect();

    WeatherSnapshot {
        location: FALLBACK_LOCATION.to_string(),
        temp_c: 20,
        condition: "Ensoleillé".to_string(),
        icon: icon_for_condition(CLEAR_SKY).to_string(),
        condition_id: CLEAR_SKY,
        hourly,
        daily,
    }
}

/// First four forecast samples as hourly slots.
pub fn hourly_forecast(samples: &[ForecastSample]) -> Vec<HourlyForecast> {
    samples
        .iter()
        .take(4)
        .map(|s| HourlyForecast {
            time: format!("{}h", s.at.hour()),
            icon: icon_for_condition(s.condition_id).to_string(),
            temp_c: s.temp_c.round() as i32,
        })
        .collect()
}

/// Groups samples by local calendar day and summarises the first five days.
///
/// The icon comes from the rounded mean condition id of the day's samples.
pub fn daily_forecast(samples: &[ForecastSample]) -> Vec<DailyForecast> {
    let mut days: BTreeMap<NaiveDate, Vec<&ForecastSample>> = BTreeMap::new();
    for sample in samples {
        days.entry(sample.at.date()).or_default().push(sample);
    }

    days.into_iter()
        .take(5)
        .map(|(date, group)| {
            let count = group.len() as f64;
            let mean_id = group.iter().map(|s| f64::from(s.condition_id)).sum::<f64>() / count;
            let min = group.iter().map(|s| s.temp_c).fold(f64::INFINITY, f64::min);
            let max = group.iter().map(|s| s.temp_c).fold(f64::NEG_INFINITY, f64::max);
            DailyForecast {
                day: short_day_name(date.weekday()).to_string(),
                icon: icon_for_condition(mean_id.round() as u16).to_string(),
                min_c: min.round() as i32,
                max_c: max.round() as i32,
            }
        })
        .collect()
}

fn short_day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Lun",
        Weekday::Tue => "Mar",
        Weekday::Wed => "Mer",
        Weekday::Thu => "Jeu",
        Weekday::Fri => "Ven",
        Weekday::Sat => "Sam",
        Weekday::Sun => "Dim",
    }
}
