//! ClockService: the once-per-second clock and open/closed banner.
//!
//! Every tick produces a [`Patch::Clock`] carrying the formatted time and
//! date, followed by a [`Patch::Status`] computed from the current menu's
//! weekly hours.  The clock patch is applied to whichever clock elements the
//! mounted layout has (main header or sandwich header), so the service does
//! not need to know which layout is showing.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use menu_core::render::format::{format_clock, format_long_date};
use menu_core::{status_at, MenuDocument, Patch};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::application::surface::SurfaceCommand;

/// Source of the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The host's local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// The menu currently on screen, shared with the display service.
pub type CurrentDocument = watch::Receiver<Option<Arc<MenuDocument>>>;

pub struct ClockService {
    clock: Arc<dyn Clock>,
    document: CurrentDocument,
    commands: mpsc::Sender<SurfaceCommand>,
    period: Duration,
}

impl ClockService {
    pub fn new(
        clock: Arc<dyn Clock>,
        document: CurrentDocument,
        commands: mpsc::Sender<SurfaceCommand>,
    ) -> Self {
        Self {
            clock,
            document,
            commands,
            period: Duration::from_secs(1),
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// The patches for one tick.  Status is omitted until a menu is loaded.
    pub fn tick_patches(&self) -> Vec<Patch> {
        let now = self.clock.now();
        let mut patches = vec![Patch::Clock {
            time: format_clock(now),
            date: format_long_date(now.date()),
        }];
        if let Some(document) = self.document.borrow().as_ref() {
            patches.push(Patch::Status(status_at(&document.weekly_hours, now)));
        }
        patches
    }

    /// Runs the clock until the surface pump goes away.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.period);
            loop {
                ticker.tick().await;
                for patch in self.tick_patches() {
                    if self.commands.send(SurfaceCommand::Patch(patch)).await.is_err() {
                        debug!("clock stopping, surface closed");
                        return;
                    }
                }
            }
        })
    }
}
