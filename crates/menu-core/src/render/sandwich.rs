//! Sandwich layout: a static three-row board.
//!
//! Dishes are placed into four buckets.  Columns one and two each hold one
//! bucket; the third visual column is split between desserts (top) and
//! extras (bottom).

use crate::domain::menu::{Dish, MenuDocument};
use crate::domain::weather::{svg_icon_for_condition, WeatherSnapshot, CLEAR_SKY, FALLBACK_LOCATION};
use crate::render::format::{format_price, week_range};
use crate::render::tree::RenderNode;
use crate::render::{
    HIDE_ON_ERROR, IMAGE_PLACEHOLDER, MENU_CONTAINER_ID, SANDWICH_DATE_ID, SANDWICH_TIME_ID,
    SANDWICH_WEATHER_ID,
};

/// Bucket titles, in bucket order.
pub const BUCKET_TITLES: [&str; 4] = ["Nos Sandwichs", "Nos Spécialités", "Nos Desserts", "Extras"];

/// Footer text when the document has no message.
pub const DEFAULT_WELCOME: &str = "Bienvenue";

/// Bucket for the dish at `index`.
///
/// An explicit column wins (clamped to the last bucket).  Without one, dishes
/// cycle through the first three buckets only, so "Extras" is reachable solely
/// through an explicit column 4.
pub fn bucket_index(dish: &Dish, index: usize) -> usize {
    match dish.placement_column() {
        Some(column) => (usize::from(column) - 1).min(3),
        None => index % 3,
    }
}

/// Splits dishes into the four buckets, keeping document order within each.
pub fn assign_buckets(dishes: &[Dish]) -> [Vec<&Dish>; 4] {
    let mut buckets: [Vec<&Dish>; 4] = Default::default();
    for (index, dish) in dishes.iter().enumerate() {
        buckets[bucket_index(dish, index)].push(dish);
    }
    buckets
}

/// Builds the `#plats-grid` container for the Sandwich layout.
pub fn render_sandwich(document: &MenuDocument) -> RenderNode {
    let buckets = assign_buckets(&document.dishes);

    let body = RenderNode::element("div").with_class("sandwich-body").with_children([
        column(BUCKET_TITLES[0], &buckets[0]),
        column(BUCKET_TITLES[1], &buckets[1]),
        RenderNode::element("div")
            .with_class("sandwich-column sandwich-column-split")
            .with_children([
                section(BUCKET_TITLES[2], &buckets[2]),
                section(BUCKET_TITLES[3], &buckets[3]),
            ]),
    ]);

    RenderNode::element("div")
        .with_id(MENU_CONTAINER_ID)
        .with_class("sandwich-layout")
        .with_child(
            RenderNode::element("div")
                .with_class("sandwich-container")
                .with_children([header(document), body, footer(document)]),
        )
}

/// The compact weather block in the Sandwich header.
pub fn sandwich_weather(snapshot: Option<&WeatherSnapshot>) -> RenderNode {
    let (location, condition_id, temp) = match snapshot {
        Some(s) => (s.location.as_str(), s.condition_id, s.temp_c),
        None => (FALLBACK_LOCATION, CLEAR_SKY, 20),
    };
    RenderNode::element("div")
        .with_id(SANDWICH_WEATHER_ID)
        .with_class("sandwich-weather")
        .with_children([
            RenderNode::element("span")
                .with_class("weather-location")
                .with_text(format!("📍 {location}")),
            RenderNode::element("span")
                .with_class("weather-icon")
                .with_markup(svg_icon_for_condition(condition_id)),
            RenderNode::element("span")
                .with_class("weather-temp")
                .with_text(format!("{temp}°")),
        ])
}

fn header(document: &MenuDocument) -> RenderNode {
    let mut left = RenderNode::element("div").with_class("sandwich-header-left");
    if !document.restaurant.logo_path.is_empty() {
        left = left.with_child(
            RenderNode::element("img")
                .with_class("sandwich-logo")
                .with_attr("src", &document.restaurant.logo_path)
                .with_attr("alt", "Logo")
                .with_attr("onerror", HIDE_ON_ERROR),
        );
    }

    RenderNode::element("div").with_class("sandwich-header").with_children([
        left,
        RenderNode::element("div")
            .with_class("sandwich-header-center")
            .with_children([
                RenderNode::element("div")
                    .with_id(SANDWICH_TIME_ID)
                    .with_class("sandwich-time"),
                RenderNode::element("div")
                    .with_id(SANDWICH_DATE_ID)
                    .with_class("sandwich-date"),
            ]),
        RenderNode::element("div")
            .with_class("sandwich-header-right")
            .with_child(sandwich_weather(None)),
    ])
}

fn footer(document: &MenuDocument) -> RenderNode {
    let welcome = document
        .messages
        .first()
        .map(|m| m.text.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_WELCOME);

    RenderNode::element("div").with_class("sandwich-footer").with_child(
        RenderNode::element("div")
            .with_class("sandwich-footer-content")
            .with_children([
                RenderNode::element("span").with_text(welcome),
                RenderNode::element("span").with_text(week_range(&document.week)),
                RenderNode::element("span").with_text(&document.restaurant.email),
            ]),
    )
}

fn column(title: &str, dishes: &[&Dish]) -> RenderNode {
    RenderNode::element("div")
        .with_class("sandwich-column")
        .with_child(titled(title))
        .with_children(dishes.iter().map(|d| item(d)))
}

fn section(title: &str, dishes: &[&Dish]) -> RenderNode {
    RenderNode::element("div")
        .with_class("sandwich-section")
        .with_child(titled(title))
        .with_children(dishes.iter().map(|d| item(d)))
}

fn titled(title: &str) -> RenderNode {
    RenderNode::element("h2")
        .with_class("sandwich-column-title")
        .with_text(title)
}

fn item(dish: &Dish) -> RenderNode {
    let image = if dish.has_image() {
        RenderNode::element("img")
            .with_class("sandwich-item-image")
            .with_attr("src", &dish.image_path)
            .with_attr("alt", &dish.name)
            .with_attr("onerror", HIDE_ON_ERROR)
    } else {
        RenderNode::element("div")
            .with_class("sandwich-item-image-placeholder")
            .with_text(IMAGE_PLACEHOLDER)
    };

    RenderNode::element("div").with_class("sandwich-item").with_children([
        image,
        RenderNode::element("div")
            .with_class("sandwich-item-content")
            .with_children([
                RenderNode::element("div")
                    .with_class("sandwich-item-name")
                    .with_text(&dish.name),
                RenderNode::element("div")
                    .with_class("sandwich-item-description")
                    .with_text(&dish.description),
            ]),
        RenderNode::element("div")
            .with_class("sandwich-item-price")
            .with_text(format_price(dish.price)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::menu::{DisplaySettings, Message, Priority, Restaurant, Week, WeeklyHours};

    fn dish(id: u32, column: Option<u8>) -> Dish {
        Dish {
            name: format!("Plat {id}"),
            price: 5.0,
            column,
            ..Dish::blank(id)
        }
    }

    fn document(dishes: Vec<Dish>) -> MenuDocument {
        MenuDocument {
            version: None,
            display: DisplaySettings::default(),
            restaurant: Restaurant { email: "hello@example.be".into(), ..Restaurant::default() },
            week: Week { start_date: "2024-03-04".into(), end_date: "2024-03-08".into(), number: 10 },
            dishes,
            messages: Vec::new(),
            weekly_hours: WeeklyHours::lunch_service(),
        }
    }

    #[test]
    fn test_bucket_index_explicit_column_four_is_extras() {
        assert_eq!(bucket_index(&dish(1, Some(4)), 0), 3);
    }

    #[test]
    fn test_bucket_index_unset_uses_index_mod_three() {
        assert_eq!(bucket_index(&dish(6, None), 5), 2);
        assert_eq!(bucket_index(&dish(4, None), 3), 0);
    }

    #[test]
    fn test_bucket_index_clamps_out_of_range_column() {
        assert_eq!(bucket_index(&dish(1, Some(9)), 0), 3);
    }

    #[test]
    fn test_bucket_index_zero_column_is_automatic() {
        assert_eq!(bucket_index(&dish(2, Some(0)), 1), 1);
    }

    #[test]
    fn test_assign_buckets_preserves_relative_order() {
        // Arrange: ids 1 and 4 both land in bucket 0
        let dishes = vec![dish(1, None), dish(2, None), dish(3, None), dish(4, None), dish(5, Some(1))];

        // Act
        let buckets = assign_buckets(&dishes);

        // Assert
        let ids: Vec<u32> = buckets[0].iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 4, 5]);
        assert!(buckets[3].is_empty());
    }

    #[test]
    fn test_render_sandwich_has_three_visual_columns_and_four_titles() {
        let node = render_sandwich(&document(vec![dish(1, None), dish(2, Some(4))]));
        assert_eq!(node.all_by_class("sandwich-column").len(), 3);
        let titles: Vec<String> = node
            .all_by_class("sandwich-column-title")
            .iter()
            .map(|t| t.text_content())
            .collect();
        assert_eq!(titles, BUCKET_TITLES.map(String::from).to_vec());
    }

    #[test]
    fn test_render_sandwich_placeholder_for_missing_image() {
        let node = render_sandwich(&document(vec![dish(1, None)]));
        let placeholder = node.find_by_class("sandwich-item-image-placeholder").unwrap();
        assert_eq!(placeholder.text_content(), IMAGE_PLACEHOLDER);
        assert_eq!(node.find_by_class("sandwich-item-price").unwrap().text_content(), "5.00 €");
    }

    #[test]
    fn test_render_sandwich_footer_defaults_to_welcome() {
        let node = render_sandwich(&document(vec![dish(1, None)]));
        let footer = node.find_by_class("sandwich-footer-content").unwrap().text_content();
        assert!(footer.starts_with("Bienvenue"));
        assert!(footer.contains("Semaine 10 (04/03 - 08/03)"));
        assert!(footer.ends_with("hello@example.be"));
    }

    #[test]
    fn test_render_sandwich_footer_uses_first_message() {
        let mut doc = document(vec![dish(1, None)]);
        doc.messages.push(Message { text: "Promo du jour".into(), priority: Priority::High });
        let node = render_sandwich(&doc);
        assert!(node.text_content().contains("Promo du jour"));
    }

    #[test]
    fn test_render_sandwich_header_has_clock_and_weather_anchors() {
        let node = render_sandwich(&document(vec![dish(1, None)]));
        assert!(node.find_by_id(SANDWICH_TIME_ID).is_some());
        assert!(node.find_by_id(SANDWICH_DATE_ID).is_some());
        let weather = node.find_by_id(SANDWICH_WEATHER_ID).unwrap();
        assert!(weather.text_content().contains("Liège"));
        assert!(weather.text_content().contains("20°"));
    }
}
