//! Infrastructure layer for the display engine.
//!
//! Contains the outward-facing adapters: the menu loader (file or HTTP with a
//! disk cache), the OpenWeatherMap client, the TCP connectivity probe, the
//! display surfaces, the stdin control channel, and configuration storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `menu_core`, but MUST NOT be imported by the `application` layer.

pub mod connectivity;
pub mod control;
pub mod loader;
pub mod storage;
pub mod surface;
pub mod weather;
