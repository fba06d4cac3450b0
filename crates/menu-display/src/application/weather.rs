//! Weather port.
//!
//! A provider always yields a snapshot: live data when it can, its cache
//! when that is still fresh, and a static fallback otherwise.  That keeps the
//! header widget populated even when the board runs offline.

use async_trait::async_trait;
use menu_core::WeatherSnapshot;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions and forecasts.  `online` tells the provider whether
    /// attempting a network fetch makes sense.
    async fn current(&self, online: bool) -> WeatherSnapshot;
}
