//! Carousel layout and its sliding geometry.
//!
//! The container shows `visible_columns` columns at once and moves one column
//! per step.  Position `p` maps to a horizontal offset of
//! `-(p * 100 / visible_columns)` percent; after the last full page the
//! position wraps back to `0`.

use crate::domain::menu::Dish;
use crate::render::format::{column_gradient, format_price};
use crate::render::tree::RenderNode;
use crate::render::{CAROUSEL_CLASS, HIDE_ON_ERROR, IMAGE_PLACEHOLDER, MENU_CONTAINER_ID};

/// Default number of columns on screen.
pub const DEFAULT_VISIBLE_COLUMNS: usize = 4;

/// How many columns are visible, and therefore how far one step moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselGeometry {
    pub visible_columns: usize,
}

impl Default for CarouselGeometry {
    fn default() -> Self {
        Self {
            visible_columns: DEFAULT_VISIBLE_COLUMNS,
        }
    }
}

impl CarouselGeometry {
    /// Zero is coerced to one column.
    pub fn new(visible_columns: usize) -> Self {
        Self {
            visible_columns: visible_columns.max(1),
        }
    }

    pub fn column_width_percent(&self) -> f64 {
        100.0 / self.visible_columns as f64
    }

    /// Horizontal offset, in percent of the container width, for `position`.
    pub fn offset_percent(&self, position: usize) -> f64 {
        0.0 - position as f64 * self.column_width_percent()
    }

    /// Last position at which the final page is fully visible.
    pub fn max_position(&self, total_columns: usize) -> usize {
        total_columns.saturating_sub(self.visible_columns)
    }

    /// Advances one column, wrapping to `0` past [`Self::max_position`].
    pub fn next_position(&self, position: usize, total_columns: usize) -> usize {
        let next = position + 1;
        if next > self.max_position(total_columns) {
            0
        } else {
            next
        }
    }
}

/// CSS transform for an offset produced by [`CarouselGeometry::offset_percent`].
pub fn translate_x(offset_percent: f64) -> String {
    format!("translateX({offset_percent}%)")
}

/// Builds the sliding `#plats-grid` container, parked at position 0.
pub fn render_carousel(dishes: &[Dish], geometry: &CarouselGeometry) -> RenderNode {
    let width = format!("{}%", geometry.column_width_percent());
    RenderNode::element("div")
        .with_id(MENU_CONTAINER_ID)
        .with_class(CAROUSEL_CLASS)
        .with_style("transform", &translate_x(geometry.offset_percent(0)))
        .with_children(dishes.iter().map(|d| dish_column(d, &width)))
}

fn dish_column(dish: &Dish, width: &str) -> RenderNode {
    let mut column = RenderNode::element("div")
        .with_class("column-card")
        .with_style("background", &column_gradient(&dish.background_color))
        .with_style("min-width", width)
        .with_style("padding", "2rem");

    if dish.has_image() {
        column = column.with_child(
            RenderNode::element("img")
                .with_class("column-image")
                .with_attr("src", &dish.image_path)
                .with_attr("alt", &dish.name)
                .with_attr("onerror", HIDE_ON_ERROR),
        );
    } else {
        column = column.with_child(
            RenderNode::element("div")
                .with_class("column-image-placeholder")
                .with_text(IMAGE_PLACEHOLDER),
        );
    }

    column.with_children([
        RenderNode::element("h2").with_class("column-title").with_text(&dish.name),
        RenderNode::element("div").with_class("column-divider"),
        RenderNode::element("p")
            .with_class("column-description")
            .with_text(&dish.description),
        RenderNode::element("div")
            .with_class("column-price")
            .with_text(format_price(dish.price)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_percent_is_quarter_steps_for_four_columns() {
        let geo = CarouselGeometry::default();
        assert_eq!(geo.offset_percent(0), 0.0);
        assert_eq!(geo.offset_percent(1), -25.0);
        assert_eq!(geo.offset_percent(6), -150.0);
    }

    #[test]
    fn test_offset_percent_follows_visible_columns() {
        assert_eq!(CarouselGeometry::new(5).offset_percent(2), -40.0);
    }

    #[test]
    fn test_next_position_cycles_ten_columns_through_seven_positions() {
        // Arrange
        let geo = CarouselGeometry::default();
        let mut position = 0;
        let mut seen = vec![position];

        // Act
        for _ in 0..7 {
            position = geo.next_position(position, 10);
            seen.push(position);
        }

        // Assert
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5, 6, 0]);
    }

    #[test]
    fn test_next_position_stays_at_zero_when_everything_fits() {
        let geo = CarouselGeometry::default();
        for total in 0..=4 {
            assert_eq!(geo.next_position(0, total), 0, "total {total}");
        }
    }

    #[test]
    fn test_new_coerces_zero_visible_columns() {
        assert_eq!(CarouselGeometry::new(0).visible_columns, 1);
    }

    #[test]
    fn test_translate_x_formats_without_trailing_zeros() {
        assert_eq!(translate_x(0.0), "translateX(0%)");
        assert_eq!(translate_x(-25.0), "translateX(-25%)");
    }

    #[test]
    fn test_render_carousel_one_column_per_dish_with_gradient() {
        // Arrange
        let dishes = vec![
            Dish { background_color: "#ff0000".into(), ..Dish::blank(1) },
            Dish::blank(2),
        ];

        // Act
        let node = render_carousel(&dishes, &CarouselGeometry::default());

        // Assert
        assert!(node.has_class(CAROUSEL_CLASS));
        let columns = node.all_by_class("column-card");
        assert_eq!(columns.len(), 2);
        assert!(columns[0].style_value("background").unwrap().contains("rgba(255, 0, 0, 0.25)"));
        assert_eq!(columns[1].style_value("min-width"), Some("25%"));
        assert_eq!(node.style_value("transform"), Some("translateX(0%)"));
    }

    #[test]
    fn test_render_carousel_placeholder_for_missing_image() {
        // Arrange
        let dishes = vec![
            Dish { image_path: "images/a.jpg".into(), ..Dish::blank(1) },
            Dish::blank(2),
        ];

        // Act
        let node = render_carousel(&dishes, &CarouselGeometry::default());

        // Assert
        let columns = node.all_by_class("column-card");
        assert!(columns[0].find_by_class("column-image").is_some());
        assert!(columns[0].find_by_class("column-image-placeholder").is_none());
        let placeholder = columns[1].find_by_class("column-image-placeholder").unwrap();
        assert_eq!(placeholder.text_content(), IMAGE_PLACEHOLDER);
    }
}
