//! Menu board display engine: entry point.
//!
//! Loads the weekly menu, renders it in the configured layout to an HTML file
//! that a kiosk browser shows full screen, and keeps that page alive: card
//! rotation or carousel sliding, a ticking clock with the open/closed
//! banner, weather, and an offline indicator that follows connectivity.
//!
//! # Usage
//!
//! ```text
//! menu-display [OPTIONS]
//!
//! Options:
//!   --config <PATH>          Config file [default: platform config dir]
//!   --source <PATH|URL>      Menu document location
//!   --output <PATH>          HTML file to (re)write
//!   --log-level <LEVEL>      error | warn | info | debug | trace
//!   --viewport-width <PX>    Width of the screen the page is shown on
//!   --touch                  Honour taps and swipes
//!   --no-stdin               Do not read control commands from stdin
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable              | Overrides          |
//! |-----------------------|--------------------|
//! | `MENUBOARD_CONFIG`    | `--config`         |
//! | `MENUBOARD_SOURCE`    | `[display] source` |
//! | `MENUBOARD_OUTPUT`    | `[display] output` |
//! | `MENUBOARD_LOG_LEVEL` | `[display] log_level` |
//! | `WEATHER_API_KEY`     | `[weather] api_key` |
//!
//! CLI args take precedence over environment variables, which take
//! precedence over the config file.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use menu_display::application::clock::{ClockService, SystemClock};
use menu_display::application::display_service::{DisplayEvent, DisplayService};
use menu_display::application::network_status::{spawn_connectivity_watch, Connectivity, ConnectivityProbe};
use menu_display::application::surface::spawn_surface_pump;
use menu_display::infrastructure::connectivity::TcpProbe;
use menu_display::infrastructure::control::spawn_control_reader;
use menu_display::infrastructure::loader::{CachingMenuLoader, MenuLocation};
use menu_display::infrastructure::storage::config::{load_config, load_config_from, DisplayConfig};
use menu_display::infrastructure::surface::HtmlFileSurface;
use menu_display::infrastructure::weather::{OpenWeatherProvider, OpenWeatherSettings};

const EVENT_QUEUE_DEPTH: usize = 32;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Restaurant menu board display engine.
#[derive(Debug, Parser)]
#[command(
    name = "menu-display",
    about = "Renders the weekly menu board and keeps it animated",
    version
)]
struct Cli {
    /// Config file to read instead of the platform default.
    #[arg(long, env = "MENUBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Menu document path or `http(s)://` URL.
    #[arg(long, env = "MENUBOARD_SOURCE")]
    source: Option<String>,

    /// HTML file rewritten on every update.
    #[arg(long, env = "MENUBOARD_OUTPUT")]
    output: Option<PathBuf>,

    #[arg(long, env = "MENUBOARD_LOG_LEVEL")]
    log_level: Option<String>,

    #[arg(long)]
    viewport_width: Option<u32>,

    /// Honour taps and swipes from the control channel.
    #[arg(long)]
    touch: bool,

    /// OpenWeatherMap API key.
    #[arg(long, env = "WEATHER_API_KEY", hide_env_values = true)]
    weather_api_key: Option<String>,

    #[arg(long)]
    no_stdin: bool,
}

impl Cli {
    /// Loads the config file and layers the CLI overrides on top.
    fn into_config(self) -> anyhow::Result<DisplayConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => load_config().context("failed to load config")?,
        };
        self.apply_to(&mut config);
        Ok(config)
    }

    fn apply_to(&self, config: &mut DisplayConfig) {
        if let Some(source) = &self.source {
            config.display.source = source.clone();
        }
        if let Some(output) = &self.output {
            config.display.output = output.clone();
        }
        if let Some(level) = &self.log_level {
            config.display.log_level = level.clone();
        }
        if let Some(width) = self.viewport_width {
            config.display.viewport_width = width;
        }
        if self.touch {
            config.display.touch_capable = true;
        }
        if let Some(key) = self.weather_api_key.as_ref().filter(|k| !k.is_empty()) {
            config.weather.api_key = Some(key.clone());
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// # What happens at startup
///
/// 1. The config is loaded and CLI overrides applied; logging starts at the
///    configured level unless `RUST_LOG` says otherwise.
/// 2. The surface pump is spawned around the HTML file surface.
/// 3. Loader, weather provider and probe are built; the first probe reading
///    seeds the network monitor.
/// 4. The connectivity watch, clock, stdin reader and Ctrl+C handler are
///    spawned; all of them feed the service's event queue or the pump.
/// 5. The menu is loaded once, then the service runs until shutdown.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let no_stdin = cli.no_stdin;
    let config = cli.into_config()?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.display.log_level)),
        )
        .init();

    info!(
        source = %config.display.source,
        output = %config.display.output.display(),
        "menu board display starting"
    );

    // ── Surface pump ──────────────────────────────────────────────────────────
    let surface = HtmlFileSurface::new(
        config.display.output.clone(),
        config.display.stylesheet.clone(),
        config.display.page_refresh_secs,
    );
    let (commands, pump) = spawn_surface_pump(Box::new(surface));

    // ── Collaborators ─────────────────────────────────────────────────────────
    let http_timeout = Duration::from_secs(config.network.http_timeout_secs);
    let loader = Arc::new(CachingMenuLoader::new(
        MenuLocation::parse(&config.display.source),
        config.display.cache_dir.join("menu"),
        http_timeout,
    ));
    let weather = Arc::new(OpenWeatherProvider::new(
        OpenWeatherSettings {
            api_key: config.weather.api_key.clone(),
            city: config.weather.city.clone(),
            country: config.weather.country.clone(),
            base_url: config.weather.base_url.clone(),
            cache_ttl: Duration::from_secs(config.weather.cache_ttl_secs),
            timeout: http_timeout,
        },
        config.display.cache_dir.join("weather.json"),
    ));
    let probe: Arc<dyn ConnectivityProbe> = Arc::new(TcpProbe::new(
        config.network.probe_address.clone(),
        Duration::from_millis(config.network.probe_timeout_ms),
    ));
    let initial = Connectivity::from_online(probe.is_online().await);
    info!(?initial, "initial connectivity");

    let mut service = DisplayService::new(
        loader,
        weather,
        commands.clone(),
        config.autoplay_config(),
        initial,
        config.display_options(),
    );

    // ── Event sources ─────────────────────────────────────────────────────────
    let (events_tx, events_rx) = mpsc::channel::<DisplayEvent>(EVENT_QUEUE_DEPTH);

    let (readings_tx, mut readings_rx) = mpsc::channel::<bool>(EVENT_QUEUE_DEPTH);
    let watch = spawn_connectivity_watch(
        probe,
        Duration::from_secs(config.network.probe_interval_secs.max(1)),
        readings_tx,
    );
    let forward_tx = events_tx.clone();
    let forwarder = tokio::spawn(async move {
        while let Some(online) = readings_rx.recv().await {
            if forward_tx.send(DisplayEvent::Connectivity(online)).await.is_err() {
                break;
            }
        }
    });

    let clock = ClockService::new(Arc::new(SystemClock), service.subscribe(), commands.clone()).spawn();

    let control = if no_stdin {
        None
    } else {
        Some(spawn_control_reader(tokio::io::stdin(), events_tx.clone()))
    };

    let shutdown_tx = events_tx.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                let _ = shutdown_tx.send(DisplayEvent::Shutdown).await;
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });
    drop(events_tx);

    // ── Main loop ─────────────────────────────────────────────────────────────
    if let Err(e) = service.reload().await {
        warn!("no menu to show yet, waiting for the source to come back: {e}");
    }
    let result = service.run(events_rx).await;

    watch.abort();
    forwarder.abort();
    clock.abort();
    if let Some(control) = control {
        control.abort();
    }
    drop(service);
    drop(commands);
    if let Err(e) = pump.await {
        warn!("surface pump ended abnormally: {e}");
    }

    result.context("display service failed")?;
    info!("menu board display stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
