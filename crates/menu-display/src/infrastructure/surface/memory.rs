//! In-memory display surface.
//!
//! Records every mount and patch into a shared [`SurfaceRecord`] while also
//! keeping the patched tree, so tests can assert both on what was sent and on
//! what the page would look like.  Clones share the same record: hand one
//! clone to the pump and keep the other for assertions.
//!
//! # Usage in tests
//!
//! ```ignore
//! let surface = MemorySurface::new();
//! let (commands, _pump) = spawn_surface_pump(Box::new(surface.clone()));
//! // ... drive the display service ...
//! assert_eq!(surface.record().mounts.len(), 1);
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use menu_core::{Patch, PatchError, RenderNode};

use crate::application::surface::{DisplaySurface, SurfaceError};

/// Everything a [`MemorySurface`] has seen.
#[derive(Debug, Default, Clone)]
pub struct SurfaceRecord {
    /// Every mounted page, in order.
    pub mounts: Vec<RenderNode>,
    /// Every successfully applied patch, in order.
    pub patches: Vec<Patch>,
    /// The current tree with all patches applied.
    pub tree: Option<RenderNode>,
    /// Patches whose target was missing.
    pub skipped: Vec<Patch>,
}

#[derive(Debug, Default, Clone)]
pub struct MemorySurface {
    record: Arc<Mutex<SurfaceRecord>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks and returns the shared record.
    pub fn record(&self) -> MutexGuard<'_, SurfaceRecord> {
        self.record.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DisplaySurface for MemorySurface {
    async fn mount(&mut self, page: RenderNode) -> Result<(), SurfaceError> {
        let mut record = self.record();
        record.mounts.push(page.clone());
        record.tree = Some(page);
        Ok(())
    }

    async fn apply(&mut self, patch: &Patch) -> Result<(), SurfaceError> {
        let mut record = self.record();
        let tree = record.tree.as_mut().ok_or(SurfaceError::NotMounted)?;
        match tree.apply(patch) {
            Ok(()) => {
                record.patches.push(patch.clone());
                Ok(())
            }
            Err(e @ PatchError::RenderTargetMissing(_)) => {
                record.skipped.push(patch.clone());
                Err(e.into())
            }
        }
    }
}
