//! TOML-based configuration persistence for the display engine.
//!
//! Reads and writes [`DisplayConfig`] to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\MenuBoard\config.toml`
//! - Linux:    `~/.config/menuboard/config.toml`
//! - macOS:    `~/Library/Application Support/MenuBoard/config.toml`
//!
//! Example:
//!
//! ```toml
//! [display]
//! source = "https://example.org/menu.json"
//! output = "/var/lib/menuboard/index.html"
//! touch_capable = true
//! viewport_width = 1080
//!
//! [weather]
//! api_key = "..."
//! city = "Brussels"
//! ```
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = "...")]`, so a config file only
//! needs the keys it wants to change, and a missing file yields
//! [`DisplayConfig::default()`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use menu_core::CarouselGeometry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::autoplay::AutoplayConfig;
use crate::application::display_service::DisplayOptions;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level display configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    #[serde(default)]
    pub display: DisplaySection,
    #[serde(default)]
    pub autoplay: AutoplaySection,
    #[serde(default)]
    pub weather: WeatherSection,
    #[serde(default)]
    pub network: NetworkSection,
}

/// Where the menu comes from and where the page goes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplaySection {
    /// File path or `http(s)://` URL of the menu document.
    #[serde(default = "default_source")]
    pub source: String,
    /// HTML file rewritten on every update.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Stylesheet linked from the generated page.
    #[serde(default = "default_stylesheet")]
    pub stylesheet: String,
    /// Directory holding the cached menu and weather.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Whether taps and swipes are honoured.
    #[serde(default)]
    pub touch_capable: bool,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Seconds between browser reloads of the generated page.
    #[serde(default = "default_page_refresh_secs")]
    pub page_refresh_secs: u32,
}

/// Autoplay timings, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutoplaySection {
    #[serde(default = "default_rotation_ms")]
    pub rotation_interval_ms: u64,
    #[serde(default = "default_carousel_settle_ms")]
    pub carousel_settle_ms: u64,
    #[serde(default = "default_carousel_ms")]
    pub carousel_interval_ms: u64,
    #[serde(default = "default_grace_ms")]
    pub manual_grace_ms: u64,
    #[serde(default = "default_visible_columns")]
    pub visible_columns: usize,
    #[serde(default = "default_rotation_min_width")]
    pub rotation_min_width: u32,
}

/// OpenWeatherMap settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSection {
    /// Without a key the widget shows static weather.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    #[serde(default = "default_weather_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_weather_ttl_secs")]
    pub refresh_secs: u64,
}

/// Connectivity probing and HTTP timeouts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkSection {
    /// `host:port` opened to decide whether the display is online.
    #[serde(default = "default_probe_address")]
    pub probe_address: String,
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_source() -> String {
    "menu.json".to_string()
}
fn default_output() -> PathBuf {
    PathBuf::from("menuboard.html")
}
fn default_stylesheet() -> String {
    "style.css".to_string()
}
fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join("menuboard-cache")
}
fn default_viewport_width() -> u32 {
    1920
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_page_refresh_secs() -> u32 {
    1
}
fn default_rotation_ms() -> u64 {
    15_000
}
fn default_carousel_settle_ms() -> u64 {
    1_000
}
fn default_carousel_ms() -> u64 {
    5_000
}
fn default_grace_ms() -> u64 {
    5_000
}
fn default_visible_columns() -> usize {
    4
}
fn default_rotation_min_width() -> u32 {
    769
}
fn default_city() -> String {
    "Brussels".to_string()
}
fn default_country() -> String {
    "BE".to_string()
}
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}
fn default_weather_ttl_secs() -> u64 {
    30 * 60
}
fn default_probe_address() -> String {
    "1.1.1.1:53".to_string()
}
fn default_probe_interval_secs() -> u64 {
    10
}
fn default_probe_timeout_ms() -> u64 {
    2_000
}
fn default_http_timeout_secs() -> u64 {
    10
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            source: default_source(),
            output: default_output(),
            stylesheet: default_stylesheet(),
            cache_dir: default_cache_dir(),
            touch_capable: false,
            viewport_width: default_viewport_width(),
            log_level: default_log_level(),
            page_refresh_secs: default_page_refresh_secs(),
        }
    }
}

impl Default for AutoplaySection {
    fn default() -> Self {
        Self {
            rotation_interval_ms: default_rotation_ms(),
            carousel_settle_ms: default_carousel_settle_ms(),
            carousel_interval_ms: default_carousel_ms(),
            manual_grace_ms: default_grace_ms(),
            visible_columns: default_visible_columns(),
            rotation_min_width: default_rotation_min_width(),
        }
    }
}

impl Default for WeatherSection {
    fn default() -> Self {
        Self {
            api_key: None,
            city: default_city(),
            country: default_country(),
            base_url: default_weather_base_url(),
            cache_ttl_secs: default_weather_ttl_secs(),
            refresh_secs: default_weather_ttl_secs(),
        }
    }
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            probe_address: default_probe_address(),
            probe_interval_secs: default_probe_interval_secs(),
            probe_timeout_ms: default_probe_timeout_ms(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

// ── Conversions into application settings ─────────────────────────────────────

impl DisplayConfig {
    pub fn autoplay_config(&self) -> AutoplayConfig {
        let a = &self.autoplay;
        AutoplayConfig {
            rotation_interval: Duration::from_millis(a.rotation_interval_ms),
            carousel_settle: Duration::from_millis(a.carousel_settle_ms),
            carousel_interval: Duration::from_millis(a.carousel_interval_ms),
            manual_grace: Duration::from_millis(a.manual_grace_ms),
            rotation_min_width: a.rotation_min_width,
            viewport_width: self.display.viewport_width,
            geometry: CarouselGeometry::new(a.visible_columns),
            ..AutoplayConfig::default()
        }
    }

    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            touch_capable: self.display.touch_capable,
            weather_refresh: Duration::from_secs(self.weather.refresh_secs.max(1)),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(platform_config_dir()
        .ok_or(ConfigError::NoPlatformConfigDir)?
        .join("config.toml"))
}

/// Loads the config from the default location.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<DisplayConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `DisplayConfig` from `path`, returning `DisplayConfig::default()` if
/// the file does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<DisplayConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DisplayConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &DisplayConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory including the `MenuBoard` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("MenuBoard"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("menuboard"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("MenuBoard"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("menuboard-config-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_display_config_default_has_expected_timings() {
        // Arrange / Act
        let cfg = DisplayConfig::default();

        // Assert
        assert_eq!(cfg.autoplay.rotation_interval_ms, 15_000);
        assert_eq!(cfg.autoplay.carousel_settle_ms, 1_000);
        assert_eq!(cfg.autoplay.carousel_interval_ms, 5_000);
        assert_eq!(cfg.autoplay.visible_columns, 4);
    }

    #[test]
    fn test_weather_section_default_has_no_key_and_brussels() {
        let cfg = WeatherSection::default();
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.city, "Brussels");
        assert_eq!(cfg.country, "BE");
        assert_eq!(cfg.cache_ttl_secs, 1800);
    }

    #[test]
    fn test_partial_toml_fills_in_defaults() {
        // Arrange
        let text = "[display]\ntouch_capable = true\n\n[weather]\ncity = \"Liège\"\n";

        // Act
        let cfg: DisplayConfig = toml::from_str(text).unwrap();

        // Assert
        assert!(cfg.display.touch_capable);
        assert_eq!(cfg.display.viewport_width, 1920);
        assert_eq!(cfg.weather.city, "Liège");
        assert_eq!(cfg.network, NetworkSection::default());
    }

    #[test]
    fn test_autoplay_config_conversion_uses_viewport_and_columns() {
        let mut cfg = DisplayConfig::default();
        cfg.display.viewport_width = 600;
        cfg.autoplay.visible_columns = 3;

        let autoplay = cfg.autoplay_config();

        assert_eq!(autoplay.viewport_width, 600);
        assert_eq!(autoplay.geometry, CarouselGeometry::new(3));
        assert!(!autoplay.rotation_enabled());
        assert_eq!(autoplay.rotation_interval, Duration::from_secs(15));
    }

    #[test]
    fn test_display_config_round_trips_through_toml() {
        // Arrange
        let mut cfg = DisplayConfig::default();
        cfg.weather.api_key = Some("secret".into());
        cfg.network.probe_interval_secs = 30;

        // Act
        let text = toml::to_string_pretty(&cfg).unwrap();
        let restored: DisplayConfig = toml::from_str(&text).unwrap();

        // Assert
        assert_eq!(cfg, restored);
    }

    #[test]
    fn test_load_config_from_missing_file_returns_default() {
        let dir = scratch_dir("missing");
        let cfg = load_config_from(&dir.join("config.toml")).unwrap();
        assert_eq!(cfg, DisplayConfig::default());
    }

    #[test]
    fn test_save_then_load_config() {
        // Arrange
        let dir = scratch_dir("save");
        let path = dir.join("nested").join("config.toml");
        let mut cfg = DisplayConfig::default();
        cfg.display.source = "https://example.org/menu.json".into();

        // Act
        save_config(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        // Assert
        assert_eq!(loaded, cfg);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let dir = scratch_dir("malformed");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[display\nsource = ").unwrap();

        let result = load_config_from(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
