//! Display surface adapters.
//!
//! - **`html`**   – [`html::HtmlFileSurface`]: keeps the tree in memory and
//!   rewrites an HTML file that a kiosk browser displays.
//! - **`memory`** – [`memory::MemorySurface`]: records every mount and patch
//!   for tests and dry runs.

pub mod html;
pub mod memory;

pub use html::HtmlFileSurface;
pub use memory::{MemorySurface, SurfaceRecord};
