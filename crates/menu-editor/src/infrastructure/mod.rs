//! Infrastructure layer for the editor: draft and library files.
//!
//! **Dependency rule**: this layer may depend on `domain` and `menu_core`,
//! but MUST NOT be imported by the `domain` layer.

pub mod files;
