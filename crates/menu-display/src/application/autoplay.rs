//! AutoplayScheduler: the per-layout animation loop.
//!
//! Grid layouts rotate the focused card, Carousel layouts slide one column at
//! a time, and Sandwich layouts stay still.  Whatever the layout, the
//! scheduler owns **at most one** running timer task: every start, manual
//! focus or stop cancels the previous task first, and cancelling when nothing
//! runs is a no-op.
//!
//! # How a timer is cancelled (for beginners)
//!
//! Each loop runs inside a `tokio::spawn`ed task.  The scheduler keeps the
//! task's [`JoinHandle`] in an `Option`.  Cancelling calls
//! [`JoinHandle::abort`] and sets the option back to `None`, so there is never
//! a stale handle that could be aborted twice or forgotten.  The settle delay
//! before the first carousel slide and the grace period after a manual tap
//! live inside the same task, so they are cancelled together with the
//! repeating part.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use menu_core::{AutoplayMode, CarouselGeometry, Patch};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

use crate::application::gestures::SwipeDirection;
use crate::application::surface::SurfaceCommand;

/// Timing and viewport settings for the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoplayConfig {
    /// Time between two card focus moves.
    pub rotation_interval: Duration,
    /// Delay between showing the carousel and its first slide period.
    pub carousel_settle: Duration,
    /// Time between two carousel slides.
    pub carousel_interval: Duration,
    /// Pause after a manual tap before rotation resumes.
    pub manual_grace: Duration,
    /// Rotation only runs on viewports at least this wide.
    pub rotation_min_width: u32,
    /// Swipes are only honoured on viewports at most this wide.
    pub swipe_max_width: u32,
    /// Width of the screen the board is shown on.
    pub viewport_width: u32,
    pub geometry: CarouselGeometry,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            rotation_interval: Duration::from_secs(15),
            carousel_settle: Duration::from_secs(1),
            carousel_interval: Duration::from_secs(5),
            manual_grace: Duration::from_secs(5),
            rotation_min_width: 769,
            swipe_max_width: 768,
            viewport_width: 1920,
            geometry: CarouselGeometry::default(),
        }
    }
}

impl AutoplayConfig {
    pub fn rotation_enabled(&self) -> bool {
        self.viewport_width >= self.rotation_min_width
    }

    pub fn swipe_enabled(&self) -> bool {
        self.viewport_width <= self.swipe_max_width
    }
}

/// Observable scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayState {
    Idle,
    RotatingCards { focus: usize },
    SlidingCarousel { position: usize },
}

/// Owns the single animation timer.
pub struct AutoplayScheduler {
    config: AutoplayConfig,
    commands: mpsc::Sender<SurfaceCommand>,
    mode: AutoplayMode,
    /// Focus index (rotation) or column position (carousel), shared with the
    /// timer task.
    progress: Arc<AtomicUsize>,
    timer: Option<JoinHandle<()>>,
}

impl AutoplayScheduler {
    pub fn new(config: AutoplayConfig, commands: mpsc::Sender<SurfaceCommand>) -> Self {
        Self {
            config,
            commands,
            mode: AutoplayMode::Idle,
            progress: Arc::new(AtomicUsize::new(0)),
            timer: None,
        }
    }

    pub fn config(&self) -> &AutoplayConfig {
        &self.config
    }

    /// Starts the loop for `mode`, cancelling any previous one first.
    pub fn start(&mut self, mode: AutoplayMode) {
        self.cancel_timer();
        self.mode = mode;
        self.progress.store(0, Ordering::SeqCst);

        match mode {
            AutoplayMode::Idle => {
                debug!("autoplay idle");
            }
            AutoplayMode::RotateCards { cards } => {
                if cards == 0 {
                    return;
                }
                if !self.config.rotation_enabled() {
                    debug!(
                        viewport = self.config.viewport_width,
                        "card rotation disabled on narrow viewport"
                    );
                    return;
                }
                info!(cards, "starting card rotation");
                let period = self.config.rotation_interval;
                self.timer = Some(tokio::spawn(rotate_cards(
                    self.commands.clone(),
                    Arc::clone(&self.progress),
                    cards,
                    0,
                    period,
                    period,
                )));
            }
            AutoplayMode::SlideCarousel { columns } => {
                info!(columns, "starting carousel");
                self.timer = Some(tokio::spawn(slide_carousel(
                    self.commands.clone(),
                    Arc::clone(&self.progress),
                    columns,
                    self.config.geometry,
                    self.config.carousel_settle + self.config.carousel_interval,
                    self.config.carousel_interval,
                )));
            }
        }
    }

    /// Cancels the running loop and returns to [`AutoplayState::Idle`].
    pub fn stop(&mut self) {
        self.cancel_timer();
        self.mode = AutoplayMode::Idle;
    }

    /// Focuses the tapped card, pauses rotation, and resumes it from that card
    /// after the grace period.  Ignored outside card rotation.
    pub fn focus_manually(&mut self, index: usize) {
        let AutoplayMode::RotateCards { cards } = self.mode else {
            debug!("manual focus ignored outside card rotation");
            return;
        };
        if index >= cards {
            debug!(index, cards, "manual focus index out of range");
            return;
        }

        self.cancel_timer();
        self.progress.store(index, Ordering::SeqCst);

        let resume = self.config.rotation_enabled();
        self.timer = Some(tokio::spawn(rotate_cards(
            self.commands.clone(),
            Arc::clone(&self.progress),
            cards,
            index,
            self.config.manual_grace,
            if resume {
                self.config.rotation_interval
            } else {
                Duration::ZERO
            },
        )));
    }

    /// Moves focus one card forward or back on narrow, touch-driven screens.
    pub async fn swipe(&self, direction: SwipeDirection) {
        let AutoplayMode::RotateCards { cards } = self.mode else {
            return;
        };
        if cards == 0 || !self.config.swipe_enabled() {
            return;
        }
        let current = self.progress.load(Ordering::SeqCst);
        let next = match direction {
            SwipeDirection::Next => (current + 1) % cards,
            SwipeDirection::Previous => (current + cards - 1) % cards,
        };
        self.progress.store(next, Ordering::SeqCst);
        let _ = self
            .commands
            .send(SurfaceCommand::Patch(Patch::FocusCard { index: next }))
            .await;
    }

    pub fn state(&self) -> AutoplayState {
        let progress = self.progress.load(Ordering::SeqCst);
        match self.mode {
            AutoplayMode::Idle => AutoplayState::Idle,
            AutoplayMode::RotateCards { .. } => AutoplayState::RotatingCards { focus: progress },
            AutoplayMode::SlideCarousel { .. } => AutoplayState::SlidingCarousel { position: progress },
        }
    }

    /// `true` while a timer task exists and has not finished.
    pub fn is_timer_active(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for AutoplayScheduler {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

// ── Timer tasks ───────────────────────────────────────────────────────────────

/// Focuses `start`, waits `first_delay`, then advances every `period`.
/// A zero `period` (or fewer than two cards) only focuses `start`.
async fn rotate_cards(
    commands: mpsc::Sender<SurfaceCommand>,
    progress: Arc<AtomicUsize>,
    cards: usize,
    start: usize,
    first_delay: Duration,
    period: Duration,
) {
    if send_focus(&commands, start).await.is_err() {
        return;
    }
    if cards < 2 || period.is_zero() {
        return;
    }

    let mut ticker = interval_at(Instant::now() + first_delay, period);
    loop {
        ticker.tick().await;
        let next = (progress.load(Ordering::SeqCst) + 1) % cards;
        progress.store(next, Ordering::SeqCst);
        if send_focus(&commands, next).await.is_err() {
            break;
        }
    }
}

/// Parks the carousel at position 0, then slides one column per `period`
/// after `first_delay`.
async fn slide_carousel(
    commands: mpsc::Sender<SurfaceCommand>,
    progress: Arc<AtomicUsize>,
    columns: usize,
    geometry: CarouselGeometry,
    first_delay: Duration,
    period: Duration,
) {
    if send_offset(&commands, &geometry, 0).await.is_err() {
        return;
    }
    if geometry.max_position(columns) == 0 {
        debug!(columns, "carousel fits on screen, not sliding");
        return;
    }

    let mut ticker = interval_at(Instant::now() + first_delay, period);
    loop {
        ticker.tick().await;
        let next = geometry.next_position(progress.load(Ordering::SeqCst), columns);
        progress.store(next, Ordering::SeqCst);
        debug!(position = next, max = geometry.max_position(columns), "carousel slide");
        if send_offset(&commands, &geometry, next).await.is_err() {
            break;
        }
    }
}

async fn send_focus(
    commands: &mpsc::Sender<SurfaceCommand>,
    index: usize,
) -> Result<(), mpsc::error::SendError<SurfaceCommand>> {
    commands
        .send(SurfaceCommand::Patch(Patch::FocusCard { index }))
        .await
}

async fn send_offset(
    commands: &mpsc::Sender<SurfaceCommand>,
    geometry: &CarouselGeometry,
    position: usize,
) -> Result<(), mpsc::error::SendError<SurfaceCommand>> {
    commands
        .send(SurfaceCommand::Patch(Patch::SlideCarousel {
            offset_percent: geometry.offset_percent(position),
        }))
        .await
}

// ── Tests ─────────────────────────────────────────────────────────────────────
