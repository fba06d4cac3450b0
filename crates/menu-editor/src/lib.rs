//! menu-editor library entry point.
//!
//! - **`domain`** – Pure editing operations on a [`menu_core::MenuDocument`]
//!   draft and the reusable dish library.
//! - **`infrastructure`** – Reading and writing drafts and the library on
//!   disk.
//!
//! The `menu-editor` binary wraps both behind a small command-line interface.

pub mod domain;
pub mod infrastructure;

pub use domain::editing::{
    add_dish, default_draft, incomplete_dishes, normalize_import, remove_dish, set_display,
    validate_for_publish, DishFields, EditError,
};
pub use domain::library::{DishLibrary, LibraryEntry, LibraryError};
