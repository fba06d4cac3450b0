//! Pure rendering: menu document in, virtual tree out.
//!
//! # How a frame is produced (for beginners)
//!
//! 1. [`layout::LayoutSelector::select`] looks at the document's display type
//!    and builds the menu container (`#plats-grid`) with one of three layouts:
//!    [`grid`], [`carousel`] or [`sandwich`].
//! 2. [`page::render_page`] wraps that container in the page shell: header
//!    with clock, status and weather, footer with the message ticker, and the
//!    offline indicator.
//! 3. From then on nothing is rebuilt.  Timers and events produce
//!    [`patch::Patch`] values that a display surface applies to the mounted
//!    tree.
//!
//! Every function in this module is deterministic and free of I/O, which is
//! what makes the layouts testable without a browser.

pub mod carousel;
pub mod format;
pub mod grid;
pub mod layout;
pub mod page;
pub mod patch;
pub mod sandwich;
pub mod tree;

/// Id of the menu container every layout replaces.
pub const MENU_CONTAINER_ID: &str = "plats-grid";
/// Class of a Grid card (focus rotation target).
pub const CARD_CLASS: &str = "plat-card";
/// Class added to the focused Grid card.
pub const FOCUSED_CLASS: &str = "focused";
/// Class of the sliding carousel container.
pub const CAROUSEL_CLASS: &str = "plats-carousel";
pub const CURRENT_TIME_ID: &str = "current-time";
pub const CURRENT_DATE_ID: &str = "current-date";
pub const SANDWICH_TIME_ID: &str = "sandwich-time";
pub const SANDWICH_DATE_ID: &str = "sandwich-date";
pub const SANDWICH_WEATHER_ID: &str = "sandwich-weather";
pub const STATUS_ID: &str = "status";
pub const OFFLINE_INDICATOR_ID: &str = "offline-indicator";
pub const WEATHER_WIDGET_CLASS: &str = "weather-widget";

/// Glyph shown when a dish has no image.
pub const IMAGE_PLACEHOLDER: &str = "🍽️";
/// Hides an image whose asset fails to load.
pub const HIDE_ON_ERROR: &str = "this.style.display='none'";
