//! Grid layout: one card per dish, in document order.

use crate::domain::menu::Dish;
use crate::render::format::format_price;
use crate::render::tree::RenderNode;
use crate::render::{CARD_CLASS, HIDE_ON_ERROR, IMAGE_PLACEHOLDER, MENU_CONTAINER_ID};

/// Builds the `#plats-grid` container holding every card.
pub fn render_grid(dishes: &[Dish]) -> RenderNode {
    RenderNode::element("div")
        .with_id(MENU_CONTAINER_ID)
        .with_class("plats-grid")
        .with_children(dishes.iter().enumerate().map(|(i, d)| dish_card(d, i)))
}

/// Builds a single card.  `data-index` lets a surface report taps back.
pub fn dish_card(dish: &Dish, index: usize) -> RenderNode {
    let mut card = RenderNode::element("div")
        .with_class(CARD_CLASS)
        .with_attr("data-index", &index.to_string());
    if dish.is_sold_out {
        card.add_class("epuise");
    }

    if dish.has_image() {
        card = card.with_child(
            RenderNode::element("img")
                .with_class("plat-image")
                .with_attr("src", &dish.image_path)
                .with_attr("alt", &dish.name)
                .with_attr("onerror", HIDE_ON_ERROR),
        );
    } else {
        card = card.with_child(
            RenderNode::element("div")
                .with_class("plat-image-placeholder")
                .with_text(IMAGE_PLACEHOLDER),
        );
    }

    card = card.with_child(
        RenderNode::element("div")
            .with_class("plat-header")
            .with_child(RenderNode::element("h2").with_class("plat-nom").with_text(&dish.name)),
    );

    card = card.with_child(RenderNode::element("div").with_class("badges").with_children(badges(dish)));

    card = card.with_child(
        RenderNode::element("p")
            .with_class("plat-description")
            .with_text(&dish.description),
    );

    let mut footer = RenderNode::element("div").with_class("plat-footer").with_child(
        RenderNode::element("div")
            .with_class("plat-prix")
            .with_text(format_price(dish.price)),
    );
    if !dish.allergens.is_empty() {
        footer = footer.with_child(
            RenderNode::element("div").with_class("allergenes").with_children(
                dish.allergens
                    .iter()
                    .map(|a| RenderNode::element("span").with_class("allergene").with_text(a)),
            ),
        );
    }

    card.with_child(footer)
}

fn badges(dish: &Dish) -> Vec<RenderNode> {
    let mut out = Vec::new();
    if dish.is_new {
        out.push(badge("NOUVEAU", "nouveau"));
    }
    if dish.is_sold_out {
        out.push(badge("ÉPUISÉ", "epuise"));
    }
    if dish.is_vegetarian() {
        out.push(badge("🌱 Végétarien", "vegetarien"));
    }
    out
}

fn badge(text: &str, kind: &str) -> RenderNode {
    RenderNode::element("span")
        .with_class("badge")
        .with_class(kind)
        .with_text(text)
}
