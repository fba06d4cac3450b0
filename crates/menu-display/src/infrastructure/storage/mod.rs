//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML configuration from the
//! platform-appropriate directory, writes it back on request, and provides
//! defaults when no file exists yet (first run on a fresh kiosk).

pub mod config;
