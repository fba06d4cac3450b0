//! Display surface port and the pump task that owns it.
//!
//! Exactly one task touches the surface.  Timers, the clock and input
//! handlers never call it directly; they send a [`SurfaceCommand`] and the
//! pump applies commands strictly in arrival order.  This keeps the mounted
//! tree consistent without any locking.

use async_trait::async_trait;
use menu_core::{Patch, PatchError, RenderNode};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Commands queue depth between producers and the pump.
pub const SURFACE_QUEUE_DEPTH: usize = 64;

/// Errors a display surface can report.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// A patch arrived before any page was mounted.
    #[error("no page mounted yet")]
    NotMounted,

    /// The patch target is absent from the mounted tree.
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// Writing the rendered output failed.
    #[error("I/O error writing surface output: {0}")]
    Io(#[from] std::io::Error),
}

/// One unit of work for the surface pump.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    /// Replace the whole page.
    Mount(Box<RenderNode>),
    /// Update the mounted page in place.
    Patch(Patch),
}

/// Something that can show a page and apply incremental patches to it.
///
/// Infrastructure implementations write HTML for a kiosk browser; test
/// implementations record calls.
#[async_trait]
pub trait DisplaySurface: Send {
    /// Replaces the current page with `page`.
    async fn mount(&mut self, page: RenderNode) -> Result<(), SurfaceError>;

    /// Applies `patch` to the current page.
    async fn apply(&mut self, patch: &Patch) -> Result<(), SurfaceError>;
}

/// Spawns the pump task that owns `surface`.
///
/// Returns the command sender and the task handle.  The task exits once every
/// sender has been dropped.
pub fn spawn_surface_pump(
    mut surface: Box<dyn DisplaySurface>,
) -> (mpsc::Sender<SurfaceCommand>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<SurfaceCommand>(SURFACE_QUEUE_DEPTH);

    let handle = tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            let result = match command {
                SurfaceCommand::Mount(page) => surface.mount(*page).await,
                SurfaceCommand::Patch(patch) => surface.apply(&patch).await,
            };
            match result {
                Ok(()) => {}
                Err(SurfaceError::Patch(PatchError::RenderTargetMissing(target))) => {
                    debug!("patch skipped, render target missing: {target}");
                }
                Err(SurfaceError::NotMounted) => {
                    debug!("patch skipped, nothing mounted yet");
                }
                Err(e) => warn!("surface error: {e}"),
            }
        }
        info!("surface pump stopped");
    });

    (tx, handle)
}
