//! Draft and library persistence.
//!
//! Drafts are written as pretty-printed menu JSON, the same format the
//! display engine loads.  The dish library lives in a single JSON array in
//! the platform data directory unless a path is given explicitly:
//! - Windows:  `%APPDATA%\MenuBoard\dish-library.json`
//! - Linux:    `~/.local/share/menuboard/dish-library.json`
//! - macOS:    `~/Library/Application Support/MenuBoard/dish-library.json`

use std::path::{Path, PathBuf};

use menu_core::MenuDocument;
use thiserror::Error;

use crate::domain::editing::{normalize_import, EditError};
use crate::domain::library::{DishLibrary, LibraryError};

const LIBRARY_FILE: &str = "dish-library.json";

#[derive(Debug, Error)]
pub enum FileError {
    #[error("could not determine platform data directory")]
    NoPlatformDataDir,

    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} already exists")]
    AlreadyExists { path: PathBuf },

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> FileError + '_ {
    move |source| FileError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Reads and normalises a draft.
pub fn read_draft(path: &Path) -> Result<MenuDocument, FileError> {
    let bytes = std::fs::read(path).map_err(io_error(path))?;
    Ok(normalize_import(&bytes)?)
}

/// Writes `draft`, creating parent directories.  With `overwrite` unset an
/// existing file is left alone.
pub fn write_draft(path: &Path, draft: &MenuDocument, overwrite: bool) -> Result<(), FileError> {
    if !overwrite && path.exists() {
        return Err(FileError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    write_text(path, &serde_json::to_string_pretty(draft)?)
}

/// Loads the library at `path`; a missing file is an empty library.
pub fn load_library(path: &Path) -> Result<DishLibrary, FileError> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let mut library = DishLibrary::new();
            library.import(&bytes)?;
            Ok(library)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DishLibrary::new()),
        Err(e) => Err(io_error(path)(e)),
    }
}

pub fn save_library(path: &Path, library: &DishLibrary) -> Result<(), FileError> {
    write_text(path, &serde_json::to_string_pretty(library)?)
}

pub fn write_text(path: &Path, text: &str) -> Result<(), FileError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(io_error(dir))?;
    }
    std::fs::write(path, text).map_err(io_error(path))
}

/// Default library location.
pub fn default_library_path() -> Result<PathBuf, FileError> {
    Ok(platform_data_dir()
        .ok_or(FileError::NoPlatformDataDir)?
        .join(LIBRARY_FILE))
}

fn platform_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("MenuBoard"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local").join("share"))
            })?;
        Some(base.join("menuboard"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("MenuBoard"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::editing::default_draft;
    use chrono::Utc;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("menuboard-editor-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_write_then_read_draft() {
        // Arrange
        let dir = scratch("draft");
        let path = dir.join("menu.json");

        // Act
        write_draft(&path, &default_draft(), false).unwrap();
        let draft = read_draft(&path).unwrap();

        // Assert
        assert_eq!(draft, default_draft());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_draft_refuses_to_overwrite() {
        let dir = scratch("overwrite");
        let path = dir.join("menu.json");
        write_draft(&path, &default_draft(), false).unwrap();

        let result = write_draft(&path, &default_draft(), false);

        assert!(matches!(result, Err(FileError::AlreadyExists { .. })));
        assert!(write_draft(&path, &default_draft(), true).is_ok());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_library_file_is_empty() {
        let dir = scratch("missing-library");
        let library = load_library(&dir.join(LIBRARY_FILE)).unwrap();
        assert!(library.is_empty());
    }

    #[test]
    fn test_save_then_load_library() {
        // Arrange
        let dir = scratch("library");
        let path = dir.join(LIBRARY_FILE);
        let mut draft = default_draft();
        draft.dishes[0].name = "Soupe".into();
        draft.dishes[0].price = 4.0;
        let mut library = DishLibrary::new();
        library.save(&draft.dishes[0], Utc::now()).unwrap();

        // Act
        save_library(&path, &library).unwrap();
        let loaded = load_library(&path).unwrap();

        // Assert
        assert_eq!(loaded, library);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
