//! OpenWeatherMap weather provider with a disk cache.
//!
//! Lookup order for [`WeatherProvider::current`]:
//!
//! 1. A cached snapshot younger than the TTL is returned as is.
//! 2. Offline, or without an API key: the cached snapshot of any age, else
//!    the static fallback.
//! 3. Otherwise the current-conditions and 5-day forecast endpoints are
//!    fetched concurrently, summarised, cached, and returned.  Any failure
//!    falls back to the static snapshot.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Timelike, Utc};
use menu_core::domain::weather::{daily_forecast, hourly_forecast, icon_for_condition, ForecastSample};
use menu_core::{static_snapshot, WeatherSnapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::weather::WeatherProvider;

#[derive(Debug, Error)]
enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response carried no weather condition")]
    MissingCondition,
}

// ── OpenWeatherMap response shapes ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct OwmCondition {
    id: u16,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCurrent {
    #[serde(default)]
    name: String,
    main: OwmMain,
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    main: OwmMain,
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmForecast {
    list: Vec<OwmForecastItem>,
}

/// What the disk cache holds.
#[derive(Debug, Serialize, Deserialize)]
struct CachedWeather {
    fetched_at: DateTime<Utc>,
    snapshot: WeatherSnapshot,
}

/// Summarises the two API responses, converting timestamps with `tz`.
fn build_snapshot<Tz: TimeZone>(
    current: OwmCurrent,
    forecast: OwmForecast,
    tz: &Tz,
) -> Result<WeatherSnapshot, FetchError> {
    let condition = current.weather.first().ok_or(FetchError::MissingCondition)?;

    let samples: Vec<ForecastSample> = forecast
        .list
        .iter()
        .filter_map(|item| {
            let at = tz.timestamp_opt(item.dt, 0).single()?.naive_local();
            let condition_id = item.weather.first()?.id;
            Some(ForecastSample {
                at,
                temp_c: item.main.temp,
                condition_id,
            })
        })
        .collect();

    Ok(WeatherSnapshot {
        location: current.name,
        temp_c: current.main.temp.round() as i32,
        condition: condition.description.clone(),
        icon: icon_for_condition(condition.id).to_string(),
        condition_id: condition.id,
        hourly: hourly_forecast(&samples),
        daily: daily_forecast(&samples),
    })
}

// ── Provider ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OpenWeatherSettings {
    pub api_key: Option<String>,
    pub city: String,
    pub country: String,
    pub base_url: String,
    pub cache_ttl: Duration,
    pub timeout: Duration,
}

pub struct OpenWeatherProvider {
    settings: OpenWeatherSettings,
    cache_path: PathBuf,
    client: reqwest::Client,
}

impl OpenWeatherProvider {
    pub fn new(settings: OpenWeatherSettings, cache_path: impl Into<PathBuf>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("HTTP client configuration rejected, using defaults: {e}");
                reqwest::Client::new()
            });
        Self {
            settings,
            cache_path: cache_path.into(),
            client,
        }
    }

    fn api_key(&self) -> Option<&str> {
        self.settings.api_key.as_deref().filter(|k| !k.is_empty())
    }

    async fn read_cache(&self) -> Option<CachedWeather> {
        let bytes = tokio::fs::read(&self.cache_path).await.ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("ignoring unreadable weather cache: {e}");
                None
            }
        }
    }

    async fn write_cache(&self, snapshot: &WeatherSnapshot) {
        let entry = CachedWeather {
            fetched_at: Utc::now(),
            snapshot: snapshot.clone(),
        };
        let result = async {
            if let Some(dir) = self.cache_path.parent() {
                tokio::fs::create_dir_all(dir).await?;
            }
            let text = serde_json::to_vec(&entry).map_err(std::io::Error::other)?;
            tokio::fs::write(&self.cache_path, text).await
        }
        .await;
        if let Err(e) = result {
            warn!("could not write weather cache: {e}");
        }
    }

    fn is_fresh(&self, cached: &CachedWeather) -> bool {
        let age = Utc::now().signed_duration_since(cached.fetched_at);
        age.to_std().map(|a| a < self.settings.cache_ttl).unwrap_or(true)
    }

    async fn fetch(&self, api_key: &str) -> Result<WeatherSnapshot, FetchError> {
        let query = [
            ("q", format!("{},{}", self.settings.city, self.settings.country)),
            ("appid", api_key.to_string()),
            ("units", "metric".to_string()),
            ("lang", "fr".to_string()),
        ];
        let base = self.settings.base_url.trim_end_matches('/');

        let current = self.client.get(format!("{base}/weather")).query(&query).send();
        let forecast = self.client.get(format!("{base}/forecast")).query(&query).send();
        let (current, forecast) = tokio::try_join!(current, forecast)?;

        let current: OwmCurrent = current.error_for_status()?.json().await?;
        let forecast: OwmForecast = forecast.error_for_status()?.json().await?;
        build_snapshot(current, forecast, &Local)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, online: bool) -> WeatherSnapshot {
        let cached = self.read_cache().await;
        if let Some(entry) = cached.as_ref().filter(|c| self.is_fresh(c)) {
            debug!("weather served from cache");
            return entry.snapshot.clone();
        }

        let fallback = |cached: Option<CachedWeather>| {
            cached
                .map(|c| c.snapshot)
                .unwrap_or_else(|| static_snapshot(Local::now().hour()))
        };

        let Some(api_key) = self.api_key() else {
            return static_snapshot(Local::now().hour());
        };
        if !online {
            return fallback(cached);
        }

        match self.fetch(api_key).await {
            Ok(snapshot) => {
                self.write_cache(&snapshot).await;
                snapshot
            }
            Err(e) => {
                warn!("weather fetch failed, using fallback: {e}");
                static_snapshot(Local::now().hour())
            }
        }
    }
}
