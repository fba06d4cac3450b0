//! Application layer use cases for the display engine.
//!
//! # What is the "application" layer? (for beginners)
//!
//! The application layer sits between the pure rendering code in `menu-core`
//! and the infrastructure (files, HTTP, sockets, the kiosk surface).  Code in
//! here orchestrates timers and events but only talks to the outside world
//! through traits, so every use case can be driven from a test with fakes.
//!
//! # Sub-modules
//!
//! - **`surface`**        – The [`surface::DisplaySurface`] trait, the command
//!   type sent to it, and the single pump task that owns it.
//! - **`autoplay`**       – [`autoplay::AutoplayScheduler`]: card rotation and
//!   carousel sliding with exactly one live timer.
//! - **`clock`**          – [`clock::ClockService`]: the once-per-second clock
//!   and open/closed status.
//! - **`network_status`** – Online/offline transitions and the probe loop.
//! - **`gestures`**       – Swipe and pull-to-refresh recognition.
//! - **`menu_source`**    – The [`menu_source::MenuLoader`] port.
//! - **`weather`**        – The [`weather::WeatherProvider`] port.
//! - **`display_service`** – Ties everything together and runs the event loop.

pub mod autoplay;
pub mod clock;
pub mod display_service;
pub mod gestures;
pub mod menu_source;
pub mod network_status;
pub mod surface;
pub mod weather;
