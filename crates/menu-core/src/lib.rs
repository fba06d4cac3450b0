//! # menu-core
//!
//! Shared library for the menu board: the menu document model, its JSON
//! codec, and the pure rendering pipeline that turns a document into a
//! virtual tree.
//!
//! It has no timers, no network access and no filesystem access.  The
//! display engine (`menu-display`) and the companion editor (`menu-editor`)
//! both depend on it.
//!
//! # Architecture overview (for beginners)
//!
//! A restaurant publishes one JSON file per week describing its menu.  A
//! screen in the dining room loads that file and shows it in one of three
//! layouts: a grid of cards whose focus rotates, a carousel of columns that
//! slides sideways, or a static "sandwich" board.
//!
//! This crate defines:
//!
//! - **`domain`** – The [`MenuDocument`] and everything inside it, plus pure
//!   helpers for opening hours and weather icons.
//!
//! - **`render`** – [`LayoutSelector`] picks a layout and builds a
//!   [`RenderNode`] tree; [`Patch`] values describe later incremental updates
//!   (focus moved, carousel slid, clock ticked).

pub mod domain;
pub mod render;

pub use domain::codec::{decode_menu, encode_menu};
pub use domain::hours::{derive_status, status_at, OpenStatus};
pub use domain::menu::{
    Category, DayHours, DisplaySettings, DisplayType, Dish, DocumentError, MenuDocument, Message,
    Priority, Restaurant, Week, WeeklyHours,
};
pub use domain::weather::{static_snapshot, WeatherSnapshot};
pub use render::carousel::CarouselGeometry;
pub use render::layout::{select, AutoplayMode, LayoutSelector, RenderedLayout};
pub use render::page::render_page;
pub use render::patch::{Patch, PatchError};
pub use render::tree::RenderNode;
