//! Incremental updates to a mounted render tree.
//!
//! A [`Patch`] names *what* changed (focus moved, carousel slid, clock
//! ticked, ...).  [`RenderNode::apply`] knows *where* in the tree that lives.
//! A missing target is reported as [`PatchError::RenderTargetMissing`]; the
//! caller logs it and carries on.

use thiserror::Error;

use crate::domain::hours::OpenStatus;
use crate::domain::weather::WeatherSnapshot;
use crate::render::carousel::translate_x;
use crate::render::page::{offline_indicator, weather_widget};
use crate::render::sandwich::sandwich_weather;
use crate::render::tree::RenderNode;
use crate::render::{
    CARD_CLASS, CAROUSEL_CLASS, CURRENT_DATE_ID, CURRENT_TIME_ID, FOCUSED_CLASS,
    OFFLINE_INDICATOR_ID, SANDWICH_DATE_ID, SANDWICH_TIME_ID, SANDWICH_WEATHER_ID, STATUS_ID,
    WEATHER_WIDGET_CLASS,
};

/// Errors raised while applying a patch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    /// The element the patch updates is not in the mounted tree.
    #[error("render target missing: {0}")]
    RenderTargetMissing(&'static str),
}

/// One incremental update.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// Mark the Grid card at `index` as focused and unfocus the others.
    FocusCard { index: usize },
    /// Move the carousel container to a new horizontal offset.
    SlideCarousel { offset_percent: f64 },
    /// New clock text for every clock element present.
    Clock { time: String, date: String },
    /// New open/closed banner.
    Status(OpenStatus),
    OfflineIndicator { visible: bool },
    Weather(WeatherSnapshot),
}

impl RenderNode {
    /// Applies `patch` to this tree.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::RenderTargetMissing`] when none of the elements
    /// the patch targets exist.
    pub fn apply(&mut self, patch: &Patch) -> Result<(), PatchError> {
        match patch {
            Patch::FocusCard { index } => {
                let visited = self.for_each_by_class_mut(CARD_CLASS, |i, card| {
                    if i == *index {
                        card.add_class(FOCUSED_CLASS);
                    } else {
                        card.remove_class(FOCUSED_CLASS);
                    }
                });
                if visited == 0 {
                    return Err(PatchError::RenderTargetMissing(CARD_CLASS));
                }
            }
            Patch::SlideCarousel { offset_percent } => {
                let carousel = self
                    .find_by_class_mut(CAROUSEL_CLASS)
                    .ok_or(PatchError::RenderTargetMissing(CAROUSEL_CLASS))?;
                carousel.set_style("transform", &translate_x(*offset_percent));
            }
            Patch::Clock { time, date } => {
                let mut found = false;
                for (id, text) in [
                    (CURRENT_TIME_ID, time),
                    (CURRENT_DATE_ID, date),
                    (SANDWICH_TIME_ID, time),
                    (SANDWICH_DATE_ID, date),
                ] {
                    if let Some(node) = self.find_by_id_mut(id) {
                        node.text = Some(text.clone());
                        found = true;
                    }
                }
                if !found {
                    return Err(PatchError::RenderTargetMissing(CURRENT_TIME_ID));
                }
            }
            Patch::Status(status) => {
                let node = self
                    .find_by_id_mut(STATUS_ID)
                    .ok_or(PatchError::RenderTargetMissing(STATUS_ID))?;
                node.text = Some(status.label().to_string());
                node.set_classes(status.css_class());
            }
            Patch::OfflineIndicator { visible } => {
                let node = self
                    .find_by_id_mut(OFFLINE_INDICATOR_ID)
                    .ok_or(PatchError::RenderTargetMissing(OFFLINE_INDICATOR_ID))?;
                *node = offline_indicator(*visible);
            }
            Patch::Weather(snapshot) => {
                let mut found = false;
                if let Some(node) = self.find_by_class_mut(WEATHER_WIDGET_CLASS) {
                    *node = weather_widget(snapshot);
                    found = true;
                }
                if let Some(node) = self.find_by_id_mut(SANDWICH_WEATHER_ID) {
                    *node = sandwich_weather(Some(snapshot));
                    found = true;
                }
                if !found {
                    return Err(PatchError::RenderTargetMissing(WEATHER_WIDGET_CLASS));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::weather::static_snapshot;
    use crate::render::grid::render_grid;
    use crate::domain::menu::Dish;

    fn grid_of(n: u32) -> RenderNode {
        render_grid(&(1..=n).map(Dish::blank).collect::<Vec<_>>())
    }

    fn focused_indices(tree: &RenderNode) -> Vec<usize> {
        tree.all_by_class(CARD_CLASS)
            .iter()
            .enumerate()
            .filter(|(_, c)| c.has_class(FOCUSED_CLASS))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_focus_card_moves_focus_exclusively() {
        // Arrange
        let mut tree = grid_of(3);
        tree.apply(&Patch::FocusCard { index: 0 }).unwrap();

        // Act
        tree.apply(&Patch::FocusCard { index: 2 }).unwrap();

        // Assert
        assert_eq!(focused_indices(&tree), vec![2]);
    }

    #[test]
    fn test_focus_card_without_cards_is_target_missing() {
        let mut tree = RenderNode::element("div");
        assert_eq!(
            tree.apply(&Patch::FocusCard { index: 0 }),
            Err(PatchError::RenderTargetMissing(CARD_CLASS))
        );
    }

    #[test]
    fn test_slide_carousel_sets_transform() {
        let mut tree = RenderNode::element("div").with_class(CAROUSEL_CLASS);
        tree.apply(&Patch::SlideCarousel { offset_percent: -50.0 }).unwrap();
        assert_eq!(tree.style_value("transform"), Some("translateX(-50%)"));
    }

    #[test]
    fn test_clock_updates_every_present_clock_element() {
        // Arrange: only the Sandwich clock exists
        let mut tree = RenderNode::element("div").with_children([
            RenderNode::element("div").with_id(SANDWICH_TIME_ID),
            RenderNode::element("div").with_id(SANDWICH_DATE_ID),
        ]);

        // Act
        tree.apply(&Patch::Clock { time: "12:00:00".into(), date: "lundi 4 mars 2024".into() })
            .unwrap();

        // Assert
        assert_eq!(tree.find_by_id(SANDWICH_TIME_ID).unwrap().text_content(), "12:00:00");
        assert_eq!(tree.find_by_id(SANDWICH_DATE_ID).unwrap().text_content(), "lundi 4 mars 2024");
    }

    #[test]
    fn test_status_replaces_text_and_classes() {
        let mut tree = RenderNode::element("div").with_id(STATUS_ID).with_class("status ouvert");
        tree.apply(&Patch::Status(OpenStatus::Closed)).unwrap();
        assert_eq!(tree.text_content(), "FERMÉ");
        assert_eq!(tree.classes, vec!["status".to_string(), "ferme".to_string()]);
    }

    #[test]
    fn test_status_without_element_is_target_missing() {
        let mut tree = RenderNode::element("div");
        assert_eq!(
            tree.apply(&Patch::Status(OpenStatus::Open)),
            Err(PatchError::RenderTargetMissing(STATUS_ID))
        );
    }

    #[test]
    fn test_offline_indicator_toggles_display() {
        let mut tree = RenderNode::element("body").with_child(offline_indicator(false));
        tree.apply(&Patch::OfflineIndicator { visible: true }).unwrap();
        let node = tree.find_by_id(OFFLINE_INDICATOR_ID).unwrap();
        assert_eq!(node.style_value("display"), Some("block"));
    }

    #[test]
    fn test_weather_replaces_both_widgets() {
        // Arrange
        let mut tree = RenderNode::element("body").with_children([
            weather_widget(&static_snapshot(9)),
            sandwich_weather(None),
        ]);
        let mut snap = static_snapshot(9);
        snap.location = "Namur".into();
        snap.temp_c = 7;

        // Act
        tree.apply(&Patch::Weather(snap)).unwrap();

        // Assert
        assert!(tree.find_by_class(WEATHER_WIDGET_CLASS).unwrap().text_content().contains("Namur"));
        assert!(tree.find_by_id(SANDWICH_WEATHER_ID).unwrap().text_content().contains("7°"));
    }
}
