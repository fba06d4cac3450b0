//! Domain entities for the menu board.
//!
//! Everything in here is plain data plus pure functions: no timers, no I/O,
//! no rendering.  The display and editor crates both build on these types.
//!
//! # What lives where (for beginners)
//!
//! - **`menu`** – the [`menu::MenuDocument`] itself and the types it is made of
//!   (dishes, messages, weekly hours, display settings).
//! - **`codec`** – turning JSON text into a validated document and back.
//! - **`hours`** – deriving the OPEN / CLOSED banner from weekly hours and the
//!   current wall-clock time.
//! - **`weather`** – the weather snapshot shown in the header, its icon tables
//!   and the static fallback used when no live data is available.

pub mod codec;
pub mod hours;
pub mod menu;
pub mod weather;
