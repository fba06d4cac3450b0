//! Editor domain: operations on a menu draft and on the dish library.
//!
//! Nothing in here touches the file system; the binary loads a draft, calls
//! one of these functions, and writes the result back.

pub mod editing;
pub mod library;
