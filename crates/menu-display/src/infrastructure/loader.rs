//! Caching menu loader.
//!
//! Fetches the menu document from a file or an HTTP(S) URL, validates it, and
//! keeps the last good copy in a cache directory.  When the source fails the
//! cached copy is served instead and marked [`MenuSource::Cached`].
//!
//! # Cache layout
//!
//! ```text
//! <cache_dir>/menu.json   last good document
//! <cache_dir>/version     its version string
//! ```
//!
//! A fresh document whose version differs from the cached one clears the
//! whole directory before the new copy is written, so stale assets cached
//! alongside the menu never outlive the menu that referenced them.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use menu_core::{decode_menu, encode_menu, MenuDocument};
use tracing::{debug, info, warn};

use crate::application::menu_source::{LoadError, LoadedMenu, MenuLoader, MenuSource};

const CACHED_MENU_FILE: &str = "menu.json";
const CACHED_VERSION_FILE: &str = "version";

/// Where the menu document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuLocation {
    File(PathBuf),
    Url(String),
}

impl MenuLocation {
    /// `http://` and `https://` sources are URLs; everything else is a path.
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            Self::Url(source.to_string())
        } else {
            Self::File(PathBuf::from(source))
        }
    }
}

/// Why fetching from the source failed.
enum FetchFailure {
    Unreachable(String),
    Rejected(menu_core::DocumentError),
}

pub struct CachingMenuLoader {
    location: MenuLocation,
    cache_dir: PathBuf,
    client: reqwest::Client,
}

impl CachingMenuLoader {
    pub fn new(location: MenuLocation, cache_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("HTTP client configuration rejected, using defaults: {e}");
                reqwest::Client::new()
            });
        Self {
            location,
            cache_dir: cache_dir.into(),
            client,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    async fn fetch(&self) -> Result<MenuDocument, FetchFailure> {
        let bytes = match &self.location {
            MenuLocation::File(path) => tokio::fs::read(path)
                .await
                .map_err(|e| FetchFailure::Unreachable(format!("{}: {e}", path.display())))?,
            MenuLocation::Url(url) => {
                let stamp = Utc::now().timestamp_millis().to_string();
                let response = self
                    .client
                    .get(url)
                    .query(&[("v", stamp.as_str())])
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| FetchFailure::Unreachable(e.to_string()))?;
                response
                    .bytes()
                    .await
                    .map_err(|e| FetchFailure::Unreachable(e.to_string()))?
                    .to_vec()
            }
        };
        decode_menu(&bytes).map_err(FetchFailure::Rejected)
    }

    /// Clears the cache directory when `fresh_version` differs from the
    /// cached version.  Returns `true` when the cache was cleared.
    pub async fn invalidate_cache_on_version_change(
        &self,
        fresh_version: &str,
    ) -> Result<bool, LoadError> {
        let version_path = self.cache_dir.join(CACHED_VERSION_FILE);
        let cached = match tokio::fs::read_to_string(&version_path).await {
            Ok(v) => v.trim().to_string(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        if cached == fresh_version {
            return Ok(false);
        }

        info!(from = %cached, to = %fresh_version, "menu version changed, clearing cache");
        match tokio::fs::remove_dir_all(&self.cache_dir).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_cache(&self, document: &MenuDocument) -> Result<(), LoadError> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;
        let text = encode_menu(document)?;
        tokio::fs::write(self.cache_dir.join(CACHED_MENU_FILE), text).await?;
        tokio::fs::write(
            self.cache_dir.join(CACHED_VERSION_FILE),
            document.version_or_default(),
        )
        .await?;
        Ok(())
    }

    async fn read_cache(&self) -> Option<MenuDocument> {
        let path = self.cache_dir.join(CACHED_MENU_FILE);
        let bytes = tokio::fs::read(&path).await.ok()?;
        match decode_menu(&bytes) {
            Ok(document) => Some(document),
            Err(e) => {
                warn!("cached menu at {} is unusable: {e}", path.display());
                None
            }
        }
    }
}

#[async_trait]
impl MenuLoader for CachingMenuLoader {
    async fn load(&self) -> Result<LoadedMenu, LoadError> {
        let failure = match self.fetch().await {
            Ok(document) => {
                if let Err(e) = self
                    .invalidate_cache_on_version_change(document.version_or_default())
                    .await
                {
                    warn!("could not check cached menu version: {e}");
                }
                if let Err(e) = self.write_cache(&document).await {
                    warn!("could not write menu cache: {e}");
                }
                debug!(version = document.version_or_default(), "menu loaded from source");
                return Ok(LoadedMenu {
                    document: Arc::new(document),
                    source: MenuSource::Fresh,
                });
            }
            Err(failure) => failure,
        };

        match self.read_cache().await {
            Some(document) => {
                warn!("menu source failed, showing cached copy");
                Ok(LoadedMenu {
                    document: Arc::new(document),
                    source: MenuSource::Cached,
                })
            }
            None => Err(match failure {
                FetchFailure::Unreachable(reason) => LoadError::Unavailable(reason),
                FetchFailure::Rejected(e) => LoadError::Invalid(e),
            }),
        }
    }
}
