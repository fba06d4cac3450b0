//! Layout selection.

use crate::domain::menu::{DisplayType, MenuDocument};
use crate::render::carousel::{render_carousel, CarouselGeometry};
use crate::render::grid::render_grid;
use crate::render::sandwich::render_sandwich;
use crate::render::tree::RenderNode;

/// Which animation loop a rendered layout wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayMode {
    /// Static layout; no timer.
    Idle,
    /// Grid focus rotation across `cards` cards.
    RotateCards { cards: usize },
    /// Carousel slide across `columns` columns.
    SlideCarousel { columns: usize },
}

/// Output of [`LayoutSelector::select`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLayout {
    pub display_type: DisplayType,
    /// The complete `#plats-grid` container.  Mounting it replaces whatever
    /// the container held before.
    pub content: RenderNode,
    /// Cards (Grid), columns (Carousel) or dishes (Sandwich).
    pub item_count: usize,
}

impl RenderedLayout {
    pub fn autoplay_mode(&self) -> AutoplayMode {
        match self.display_type {
            DisplayType::Grid => AutoplayMode::RotateCards {
                cards: self.item_count,
            },
            DisplayType::Carousel => AutoplayMode::SlideCarousel {
                columns: self.item_count,
            },
            DisplayType::Sandwich => AutoplayMode::Idle,
        }
    }
}

/// Picks and builds the layout named by a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutSelector {
    pub geometry: CarouselGeometry,
}

impl LayoutSelector {
    pub fn new(geometry: CarouselGeometry) -> Self {
        Self { geometry }
    }

    /// Renders `document` with the layout its display type selects.
    pub fn select(&self, document: &MenuDocument) -> RenderedLayout {
        let display_type = document.display_type();
        let content = match display_type {
            DisplayType::Grid => render_grid(&document.dishes),
            DisplayType::Carousel => render_carousel(&document.dishes, &self.geometry),
            DisplayType::Sandwich => render_sandwich(document),
        };
        tracing::debug!(?display_type, dishes = document.dishes.len(), "layout selected");
        RenderedLayout {
            display_type,
            content,
            item_count: document.dishes.len(),
        }
    }
}

/// [`LayoutSelector::select`] with the default carousel geometry.
pub fn select(document: &MenuDocument) -> RenderedLayout {
    LayoutSelector::default().select(document)
}
