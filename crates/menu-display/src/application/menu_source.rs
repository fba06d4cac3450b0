//! Menu loading port.
//!
//! The display service asks a [`MenuLoader`] for the current document and
//! learns whether it came fresh from the source or from the local cache.
//! The concrete loader (file or HTTP, with a disk cache) lives in
//! `infrastructure::loader`.

use std::sync::Arc;

use async_trait::async_trait;
use menu_core::{DocumentError, MenuDocument};
use thiserror::Error;

/// Where a loaded document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSource {
    Fresh,
    /// The source failed and the last cached copy was used instead.
    Cached,
}

#[derive(Debug, Clone)]
pub struct LoadedMenu {
    pub document: Arc<MenuDocument>,
    pub source: MenuSource,
}

impl LoadedMenu {
    pub fn is_cached(&self) -> bool {
        self.source == MenuSource::Cached
    }
}

/// Errors when no document can be produced at all.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Fetching from the source failed and there was no cached copy.
    #[error("menu source unavailable and no cached copy: {0}")]
    Unavailable(String),

    /// The source answered but the document is invalid.
    #[error("menu document rejected: {0}")]
    Invalid(#[from] DocumentError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Produces the menu document to display.
#[async_trait]
pub trait MenuLoader: Send + Sync {
    async fn load(&self) -> Result<LoadedMenu, LoadError>;
}
