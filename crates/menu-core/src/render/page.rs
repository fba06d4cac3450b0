//! Page shell around the menu container.
//!
//! The shell is shared by every layout: a header with the restaurant name,
//! clock, open/closed status and weather widget; a footer with the week, the
//! contact line and the scrolling message ticker; and the offline indicator.
//! The Sandwich layout brings its own header inside the container as well.

use crate::domain::menu::{Message, MenuDocument};
use crate::domain::weather::{widget_background, WeatherSnapshot};
use crate::render::format::week_banner;
use crate::render::layout::RenderedLayout;
use crate::render::tree::RenderNode;
use crate::render::{
    CURRENT_DATE_ID, CURRENT_TIME_ID, HIDE_ON_ERROR, OFFLINE_INDICATOR_ID, STATUS_ID,
    WEATHER_WIDGET_CLASS,
};

/// Text of the offline indicator.
pub const OFFLINE_TEXT: &str = "📡 Mode hors ligne - Affichage du menu en cache";

/// Builds the full `<body>` for a rendered layout.
pub fn render_page(
    document: &MenuDocument,
    layout: &RenderedLayout,
    weather: &WeatherSnapshot,
) -> RenderNode {
    RenderNode::element("body")
        .with_class(&format!("affichage-{}", layout.display_type.code()))
        .with_style("background-color", &document.display.background_color)
        .with_children([
            header(document, weather),
            RenderNode::element("main")
                .with_class("main-content")
                .with_child(layout.content.clone()),
            footer(document),
            offline_indicator(false),
        ])
}

/// The header weather widget, background included.
pub fn weather_widget(snapshot: &WeatherSnapshot) -> RenderNode {
    let current = RenderNode::element("div").with_class("weather-current").with_children([
        RenderNode::element("span")
            .with_class("weather-location")
            .with_text(format!("📍 {}", snapshot.location)),
        RenderNode::element("span")
            .with_class("weather-icon")
            .with_text(&snapshot.icon),
        RenderNode::element("span")
            .with_class("weather-temp")
            .with_text(format!("{}°", snapshot.temp_c)),
        RenderNode::element("span")
            .with_class("weather-condition")
            .with_text(&snapshot.condition),
    ]);

    let hourly = RenderNode::element("div")
        .with_class("weather-hourly")
        .with_children(snapshot.hourly.iter().map(|h| {
            RenderNode::element("div").with_class("hourly-item").with_children([
                RenderNode::element("div").with_class("hourly-time").with_text(&h.time),
                RenderNode::element("div").with_class("hourly-icon").with_text(&h.icon),
                RenderNode::element("div")
                    .with_class("hourly-temp")
                    .with_text(format!("{}°", h.temp_c)),
            ])
        }));

    let daily = RenderNode::element("div")
        .with_class("weather-daily")
        .with_children(snapshot.daily.iter().map(|d| {
            RenderNode::element("div").with_class("daily-item").with_children([
                RenderNode::element("div").with_class("daily-day").with_text(&d.day),
                RenderNode::element("div").with_class("daily-icon").with_text(&d.icon),
                RenderNode::element("div").with_class("daily-temps").with_children([
                    RenderNode::element("span")
                        .with_class("daily-min")
                        .with_text(format!("{}°", d.min_c)),
                    RenderNode::element("span")
                        .with_class("daily-max")
                        .with_text(format!("{}°", d.max_c)),
                ]),
            ])
        }));

    RenderNode::element("div")
        .with_class(WEATHER_WIDGET_CLASS)
        .with_style("background", widget_background(snapshot))
        .with_children([current, hourly, daily])
}

/// The offline indicator element, shown or hidden.
pub fn offline_indicator(visible: bool) -> RenderNode {
    RenderNode::element("div")
        .with_id(OFFLINE_INDICATOR_ID)
        .with_class("offline-indicator")
        .with_style("display", if visible { "block" } else { "none" })
        .with_text(OFFLINE_TEXT)
}

/// Ticker items: the message list twice, for a seamless loop.
pub fn ticker_items(messages: &[Message]) -> Vec<RenderNode> {
    messages
        .iter()
        .chain(messages.iter())
        .map(|m| {
            RenderNode::element("span")
                .with_class("marquee-item")
                .with_class(m.priority.css_class())
                .with_text(&m.text)
        })
        .collect()
}

fn header(document: &MenuDocument, weather: &WeatherSnapshot) -> RenderNode {
    let mut brand = RenderNode::element("div").with_class("header-left");
    if !document.restaurant.logo_path.is_empty() {
        brand = brand.with_child(
            RenderNode::element("img")
                .with_class("logo")
                .with_attr("src", &document.restaurant.logo_path)
                .with_attr("alt", &document.restaurant.name)
                .with_attr("onerror", HIDE_ON_ERROR),
        );
    }
    brand = brand.with_child(
        RenderNode::element("h1")
            .with_class("restaurant-name")
            .with_text(&document.restaurant.name),
    );

    RenderNode::element("header").with_class("header").with_children([
        brand,
        RenderNode::element("div").with_class("header-center").with_children([
            RenderNode::element("div")
                .with_id(CURRENT_TIME_ID)
                .with_class("current-time"),
            RenderNode::element("div")
                .with_id(CURRENT_DATE_ID)
                .with_class("current-date"),
            RenderNode::element("div").with_id(STATUS_ID).with_class("status"),
        ]),
        RenderNode::element("div")
            .with_class("header-right")
            .with_child(weather_widget(weather)),
    ])
}

fn footer(document: &MenuDocument) -> RenderNode {
    let contact = format!(
        "📞 {} | 📧 {}",
        document.restaurant.phone, document.restaurant.email
    );
    RenderNode::element("footer").with_class("footer").with_children([
        RenderNode::element("div")
            .with_id("week-info")
            .with_class("week-info")
            .with_text(week_banner(&document.week)),
        RenderNode::element("div")
            .with_id("contact-info")
            .with_class("contact-info")
            .with_text(contact),
        RenderNode::element("div").with_class("marquee-container").with_child(
            RenderNode::element("div")
                .with_id("marquee")
                .with_class("marquee")
                .with_children(ticker_items(&document.messages)),
        ),
    ])
}
