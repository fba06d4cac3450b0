//! HTML file surface.
//!
//! Holds the mounted [`RenderNode`] tree, applies patches to it, and after
//! every change writes the whole document to a temporary file next to the
//! target before renaming it into place.  A browser polling the file never
//! sees a half-written page.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use menu_core::render::tree::escape;
use menu_core::{Patch, RenderNode};
use tracing::debug;

use crate::application::surface::{DisplaySurface, SurfaceError};

pub struct HtmlFileSurface {
    path: PathBuf,
    stylesheet: String,
    refresh_secs: u32,
    tree: Option<RenderNode>,
}

impl HtmlFileSurface {
    pub fn new(path: impl Into<PathBuf>, stylesheet: impl Into<String>, refresh_secs: u32) -> Self {
        Self {
            path: path.into(),
            stylesheet: stylesheet.into(),
            refresh_secs,
            tree: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The complete HTML document for `body`.
    pub fn document_html(&self, body: &RenderNode) -> String {
        let refresh = if self.refresh_secs > 0 {
            format!("<meta http-equiv=\"refresh\" content=\"{}\">\n", self.refresh_secs)
        } else {
            String::new()
        };
        format!(
            "<!DOCTYPE html>\n<html lang=\"fr\">\n<head>\n<meta charset=\"UTF-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
             {refresh}<title>Menu</title>\n<link rel=\"stylesheet\" href=\"{}\">\n</head>\n{}\n</html>\n",
            escape(&self.stylesheet),
            body.to_html()
        )
    }

    async fn flush(&self) -> Result<(), SurfaceError> {
        let Some(tree) = &self.tree else {
            return Err(SurfaceError::NotMounted);
        };
        let html = self.document_html(tree);

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, html).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), "page written");
        Ok(())
    }
}

#[async_trait]
impl DisplaySurface for HtmlFileSurface {
    async fn mount(&mut self, page: RenderNode) -> Result<(), SurfaceError> {
        self.tree = Some(page);
        self.flush().await
    }

    async fn apply(&mut self, patch: &Patch) -> Result<(), SurfaceError> {
        let tree = self.tree.as_mut().ok_or(SurfaceError::NotMounted)?;
        tree.apply(patch)?;
        self.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use menu_core::render::STATUS_ID;
    use menu_core::OpenStatus;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("menuboard-html-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn page() -> RenderNode {
        RenderNode::element("body").with_child(RenderNode::element("div").with_id(STATUS_ID))
    }

    #[tokio::test]
    async fn test_mount_writes_complete_document() {
        // Arrange
        let dir = scratch("mount");
        let mut surface = HtmlFileSurface::new(dir.join("index.html"), "style.css", 1);

        // Act
        surface.mount(page()).await.unwrap();

        // Assert
        let html = std::fs::read_to_string(dir.join("index.html")).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("href=\"style.css\""));
        assert!(html.contains("content=\"1\""));
        assert!(html.contains("<body>"));
        assert!(!dir.join("index.html.tmp").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_patch_before_mount_is_not_mounted() {
        let dir = scratch("unmounted");
        let mut surface = HtmlFileSurface::new(dir.join("index.html"), "style.css", 0);

        let result = surface.apply(&Patch::Status(OpenStatus::Open)).await;

        assert!(matches!(result, Err(SurfaceError::NotMounted)));
        assert!(!dir.join("index.html").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_patch_rewrites_file() {
        // Arrange
        let dir = scratch("patch");
        let mut surface = HtmlFileSurface::new(dir.join("index.html"), "style.css", 0);
        surface.mount(page()).await.unwrap();

        // Act
        surface.apply(&Patch::Status(OpenStatus::Open)).await.unwrap();

        // Assert
        let html = std::fs::read_to_string(dir.join("index.html")).unwrap();
        assert!(html.contains("OUVERT"));
        assert!(!html.contains("http-equiv"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_patch_with_missing_target_leaves_file_untouched() {
        let dir = scratch("missing");
        let mut surface = HtmlFileSurface::new(dir.join("index.html"), "style.css", 0);
        surface.mount(RenderNode::element("body")).await.unwrap();
        let before = std::fs::read_to_string(dir.join("index.html")).unwrap();

        let result = surface.apply(&Patch::FocusCard { index: 0 }).await;

        assert!(matches!(result, Err(SurfaceError::Patch(_))));
        assert_eq!(std::fs::read_to_string(dir.join("index.html")).unwrap(), before);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
