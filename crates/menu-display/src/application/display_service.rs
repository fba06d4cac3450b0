//! DisplayService: the use case that keeps the board on screen.
//!
//! It loads the menu, selects a layout, mounts the page, starts the matching
//! autoplay loop, and then reacts to events: connectivity changes, taps,
//! swipes, pull-to-refresh, explicit reloads and periodic weather refreshes.
//!
//! # Event flow (for beginners)
//!
//! ```text
//!  probe / stdin / signals ──► DisplayEvent (mpsc) ──► DisplayService::run
//!                                                          │
//!                                  SurfaceCommand (mpsc) ◄─┘
//!                                          │
//!                                   surface pump task ──► DisplaySurface
//! ```
//!
//! The service never touches the surface directly; it only sends commands.
//! A failed reload leaves the page that is already mounted untouched.

use std::sync::Arc;
use std::time::Duration;

use menu_core::{render_page, DisplayType, LayoutSelector, MenuDocument, Patch, WeatherSnapshot};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

use crate::application::autoplay::{AutoplayConfig, AutoplayScheduler, AutoplayState};
use crate::application::clock::CurrentDocument;
use crate::application::gestures::{classify_swipe, is_pull_to_refresh};
use crate::application::menu_source::{LoadError, MenuLoader};
use crate::application::network_status::{Connectivity, NetworkStatusMonitor, Transition};
use crate::application::surface::SurfaceCommand;
use crate::application::weather::WeatherProvider;

/// Everything the event loop reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayEvent {
    /// A raw connectivity reading.
    Connectivity(bool),
    /// A card was tapped on a touch screen.
    CardTapped(usize),
    Swipe { start_x: f64, end_x: f64 },
    /// A downward pull of `distance` pixels.
    Pull { distance: f64, at_top: bool },
    Reload,
    Shutdown,
}

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The surface pump has stopped; nothing more can be shown.
    #[error("display surface closed")]
    SurfaceClosed,
}

/// Behaviour switches that are not about timing.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    /// Taps and swipes are only honoured on touch screens.
    pub touch_capable: bool,
    pub weather_refresh: Duration,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            touch_capable: false,
            weather_refresh: Duration::from_secs(30 * 60),
        }
    }
}

pub struct DisplayService {
    loader: Arc<dyn MenuLoader>,
    weather: Arc<dyn WeatherProvider>,
    commands: mpsc::Sender<SurfaceCommand>,
    scheduler: AutoplayScheduler,
    selector: LayoutSelector,
    network: NetworkStatusMonitor,
    document: watch::Sender<Option<Arc<MenuDocument>>>,
    options: DisplayOptions,
    showing: Option<DisplayType>,
    from_cache: bool,
}

impl DisplayService {
    pub fn new(
        loader: Arc<dyn MenuLoader>,
        weather: Arc<dyn WeatherProvider>,
        commands: mpsc::Sender<SurfaceCommand>,
        autoplay: AutoplayConfig,
        initial: Connectivity,
        options: DisplayOptions,
    ) -> Self {
        let selector = LayoutSelector::new(autoplay.geometry);
        let (document, _) = watch::channel(None);
        Self {
            loader,
            weather,
            scheduler: AutoplayScheduler::new(autoplay, commands.clone()),
            commands,
            selector,
            network: NetworkStatusMonitor::new(initial),
            document,
            options,
            showing: None,
            from_cache: false,
        }
    }

    /// A receiver that always holds the menu currently on screen.
    pub fn subscribe(&self) -> CurrentDocument {
        self.document.subscribe()
    }

    pub fn connectivity(&self) -> Connectivity {
        self.network.state()
    }

    pub fn autoplay_state(&self) -> AutoplayState {
        self.scheduler.state()
    }

    pub fn showing(&self) -> Option<DisplayType> {
        self.showing
    }

    // ── Entry points ─────────────────────────────────────────────────────────

    /// Builds and mounts the page for `document` and restarts autoplay.
    pub async fn render(&mut self, document: Arc<MenuDocument>) -> Result<(), DisplayError> {
        let weather = self.weather.current(self.network.state().is_online()).await;
        let layout = self.selector.select(&document);

        let mut page = render_page(&document, &layout, &weather);
        let offline = !self.network.state().is_online() || self.from_cache;
        if offline {
            if let Err(e) = page.apply(&Patch::OfflineIndicator { visible: true }) {
                warn!("offline indicator not rendered: {e}");
            }
        }

        self.send(SurfaceCommand::Mount(Box::new(page))).await?;
        self.document.send_replace(Some(Arc::clone(&document)));
        self.showing = Some(layout.display_type);
        self.scheduler.start(layout.autoplay_mode());

        info!(
            layout = ?layout.display_type,
            items = layout.item_count,
            version = document.version_or_default(),
            offline,
            "menu rendered"
        );
        Ok(())
    }

    /// Loads the menu and renders it.  On failure the current page stays.
    pub async fn reload(&mut self) -> Result<(), DisplayError> {
        let loaded = match self.loader.load().await {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("menu reload failed, keeping current page: {e}");
                return Err(e.into());
            }
        };
        self.from_cache = loaded.is_cached();
        self.render(loaded.document).await
    }

    /// Feeds one connectivity reading through the monitor.
    ///
    /// Going offline shows the indicator.  Coming back online hides it and
    /// reloads once.  Repeated identical readings do nothing.
    pub async fn on_connectivity_change(&mut self, online: bool) -> Result<Transition, DisplayError> {
        let transition = self.network.observe(online);
        match transition {
            Transition::Unchanged => {}
            Transition::WentOffline => {
                self.send(SurfaceCommand::Patch(Patch::OfflineIndicator { visible: true }))
                    .await?;
            }
            Transition::CameOnline => {
                self.send(SurfaceCommand::Patch(Patch::OfflineIndicator { visible: false }))
                    .await?;
                self.reload().await?;
            }
        }
        Ok(transition)
    }

    pub fn on_card_tap(&mut self, index: usize) {
        if !self.options.touch_capable {
            debug!(index, "tap ignored, display is not touch capable");
            return;
        }
        if self.showing != Some(DisplayType::Grid) {
            return;
        }
        self.scheduler.focus_manually(index);
    }

    pub async fn on_swipe(&mut self, start_x: f64, end_x: f64) {
        if !self.options.touch_capable {
            return;
        }
        let viewport = self.scheduler.config().viewport_width;
        if let Some(direction) = classify_swipe(start_x, end_x, viewport) {
            debug!(?direction, "swipe");
            self.scheduler.swipe(direction).await;
        }
    }

    pub async fn on_pull(&mut self, distance: f64, at_top: bool) -> Result<(), DisplayError> {
        if !is_pull_to_refresh(distance, at_top) {
            return Ok(());
        }
        info!("pull to refresh");
        self.reload().await
    }

    /// Fetches fresh weather and patches it into the header.
    pub async fn refresh_weather(&mut self) -> Result<WeatherSnapshot, DisplayError> {
        let snapshot = self.weather.current(self.network.state().is_online()).await;
        if self.showing.is_some() {
            self.send(SurfaceCommand::Patch(Patch::Weather(snapshot.clone())))
                .await?;
        }
        Ok(snapshot)
    }

    // ── Event loop ───────────────────────────────────────────────────────────

    /// Processes events until [`DisplayEvent::Shutdown`] or the sender side
    /// closes.  Load failures are logged and survived; a closed surface ends
    /// the loop with an error.
    pub async fn run(&mut self, mut events: mpsc::Receiver<DisplayEvent>) -> Result<(), DisplayError> {
        let period = self.options.weather_refresh;
        let mut weather_ticker = interval_at(Instant::now() + period, period);

        let result = loop {
            let outcome = tokio::select! {
                event = events.recv() => match event {
                    None | Some(DisplayEvent::Shutdown) => break Ok(()),
                    Some(event) => self.handle(event).await,
                },
                _ = weather_ticker.tick() => self.refresh_weather().await.map(|_| ()),
            };
            match outcome {
                Ok(()) | Err(DisplayError::Load(_)) => {}
                Err(e @ DisplayError::SurfaceClosed) => break Err(e),
            }
        };

        self.scheduler.stop();
        info!("display service stopped");
        result
    }

    async fn handle(&mut self, event: DisplayEvent) -> Result<(), DisplayError> {
        match event {
            DisplayEvent::Connectivity(online) => self.on_connectivity_change(online).await.map(|_| ()),
            DisplayEvent::CardTapped(index) => {
                self.on_card_tap(index);
                Ok(())
            }
            DisplayEvent::Swipe { start_x, end_x } => {
                self.on_swipe(start_x, end_x).await;
                Ok(())
            }
            DisplayEvent::Pull { distance, at_top } => self.on_pull(distance, at_top).await,
            DisplayEvent::Reload => self.reload().await,
            DisplayEvent::Shutdown => Ok(()),
        }
    }

    async fn send(&self, command: SurfaceCommand) -> Result<(), DisplayError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| DisplayError::SurfaceClosed)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
