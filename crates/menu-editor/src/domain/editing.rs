//! Operations on a menu draft.
//!
//! A draft is a [`MenuDocument`] that may still be incomplete: dishes without
//! a name or a price are allowed while editing and only rejected by
//! [`validate_for_publish`].  Dish ids are kept dense (`1..=N`) so that
//! "dish 3" always means the third dish in the list.

use std::collections::BTreeSet;

use menu_core::domain::menu::DEFAULT_BACKGROUND;
use menu_core::{
    Category, DisplaySettings, DisplayType, Dish, DocumentError, MenuDocument, Message, Priority,
    Restaurant, Week, WeeklyHours,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    /// A draft must keep at least one dish.
    #[error("a menu needs at least one dish")]
    LastDish,

    #[error("no dish with id {id} (the menu has {count})")]
    NoSuchDish { id: u32, count: usize },

    /// Dishes still missing a name, a description or a positive price.
    #[error("incomplete dishes: {0:?}")]
    Incomplete(Vec<u32>),

    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The imported file is not shaped like a menu.
    #[error("invalid menu structure: {0}")]
    InvalidStructure(String),
}

/// The draft a new week starts from: one blank dish, weekday lunch service
/// and the standing ticker messages.
pub fn default_draft() -> MenuDocument {
    let mut draft = MenuDocument::with_dishes(vec![Dish::blank(1)]);
    draft.display = DisplaySettings::default();
    draft.restaurant = Restaurant {
        name: "Traiteur Maxime".into(),
        logo_path: "assets/logo.png".into(),
        phone: "+32 2 123 45 67".into(),
        email: "contact@traiteurmaxime.be".into(),
    };
    draft.week = Week {
        start_date: "2025-10-07".into(),
        end_date: "2025-10-13".into(),
        number: 41,
    };
    draft.messages = vec![
        Message {
            text: "📱 Commandez par SMS au +32 2 123 45 67".into(),
            priority: Priority::High,
        },
        Message {
            text: "🚚 Livraison gratuite dès 30€".into(),
            priority: Priority::Normal,
        },
        Message {
            text: "⏰ Commandez avant 10h pour le midi".into(),
            priority: Priority::Normal,
        },
    ];
    draft.weekly_hours = WeeklyHours::lunch_service();
    draft
}

/// Optional values for a newly added dish.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DishFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<Category>,
    pub column: Option<u8>,
    pub tags: Vec<String>,
    pub allergens: Vec<String>,
    pub image_path: Option<String>,
    pub is_new: bool,
}

/// Appends a dish with the next dense id and returns that id.
pub fn add_dish(draft: &mut MenuDocument, fields: DishFields) -> u32 {
    let id = next_id(draft);
    let mut dish = Dish::blank(id);
    if let Some(name) = fields.name {
        dish.name = name;
    }
    if let Some(description) = fields.description {
        dish.description = description;
    }
    if let Some(price) = fields.price {
        dish.price = price;
    }
    if let Some(category) = fields.category {
        dish.category = category;
    }
    if let Some(image) = fields.image_path {
        dish.image_path = image;
    }
    dish.column = fields.column;
    dish.tags = fields.tags.into_iter().collect::<BTreeSet<_>>();
    dish.allergens = fields.allergens;
    dish.is_new = fields.is_new;

    draft.dishes.push(dish);
    debug!(id, "dish added");
    id
}

/// Removes dish `id` and renumbers the rest to stay dense.
///
/// # Errors
///
/// [`EditError::LastDish`] when only one dish is left, and
/// [`EditError::NoSuchDish`] for an unknown id.
pub fn remove_dish(draft: &mut MenuDocument, id: u32) -> Result<Dish, EditError> {
    if draft.dishes.len() <= 1 {
        return Err(EditError::LastDish);
    }
    let position = draft
        .dishes
        .iter()
        .position(|d| d.id == id)
        .ok_or(EditError::NoSuchDish {
            id,
            count: draft.dishes.len(),
        })?;

    let removed = draft.dishes.remove(position);
    renumber(draft);
    Ok(removed)
}

pub fn set_display(draft: &mut MenuDocument, display_type: DisplayType) {
    draft.display.display_type = display_type;
}

/// Ids of dishes that are not ready to publish.
pub fn incomplete_dishes(draft: &MenuDocument) -> Vec<u32> {
    draft
        .dishes
        .iter()
        .filter(|d| !d.is_complete())
        .map(|d| d.id)
        .collect()
}

/// Full check before a draft goes live: structural invariants, an entry for
/// every weekday, then completeness of every dish.
///
/// # Errors
///
/// The first structural violation, [`DocumentError::MissingWeekday`], or
/// [`EditError::Incomplete`].
pub fn validate_for_publish(draft: &MenuDocument) -> Result<(), EditError> {
    draft.validate()?;
    if let Some(day) = draft.weekly_hours.first_missing_day() {
        return Err(DocumentError::MissingWeekday(day).into());
    }
    let incomplete = incomplete_dishes(draft);
    if !incomplete.is_empty() {
        return Err(EditError::Incomplete(incomplete));
    }
    Ok(())
}

/// Parses a menu file for editing, filling in what older files omit:
/// dishes without an image get `""`, dishes without a background get white,
/// and a missing `affichage` block becomes the Grid default.
///
/// # Errors
///
/// [`EditError::InvalidStructure`] when the JSON is malformed or has no
/// `plats` array.
pub fn normalize_import(input: &[u8]) -> Result<MenuDocument, EditError> {
    let mut value: Value =
        serde_json::from_slice(input).map_err(|e| EditError::InvalidStructure(e.to_string()))?;

    let root = value
        .as_object_mut()
        .ok_or_else(|| EditError::InvalidStructure("top level is not an object".into()))?;

    let dishes = root
        .get_mut("plats")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| EditError::InvalidStructure("missing \"plats\" array".into()))?;
    for dish in dishes.iter_mut().filter_map(Value::as_object_mut) {
        if !is_truthy(dish.get("image")) {
            dish.insert("image".into(), json!(""));
        }
        if !is_truthy(dish.get("bgColor")) {
            dish.insert("bgColor".into(), json!(DEFAULT_BACKGROUND));
        }
    }

    if !is_truthy(root.get("affichage")) {
        root.insert(
            "affichage".into(),
            json!({ "type": DisplayType::Grid.code(), "bgColor": DEFAULT_BACKGROUND }),
        );
    }

    serde_json::from_value(value).map_err(|e| EditError::InvalidStructure(e.to_string()))
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn next_id(draft: &MenuDocument) -> u32 {
    u32::try_from(draft.dishes.len()).map_or(u32::MAX, |n| n.saturating_add(1))
}

fn renumber(draft: &mut MenuDocument) {
    for (id, dish) in (1u32..).zip(draft.dishes.iter_mut()) {
        dish.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use menu_core::DayHours;

    fn complete_dish(id: u32) -> Dish {
        Dish {
            name: format!("Plat {id}"),
            description: "Fait maison".into(),
            price: 8.5,
            ..Dish::blank(id)
        }
    }

    #[test]
    fn test_default_draft_has_one_blank_dish_and_lunch_hours() {
        // Arrange / Act
        let draft = default_draft();

        // Assert
        assert_eq!(draft.dishes.len(), 1);
        assert_eq!(draft.dishes[0].id, 1);
        assert!(!draft.dishes[0].is_complete());
        assert_eq!(draft.messages.len(), 3);
        assert_eq!(draft.messages[0].priority, Priority::High);
        assert_eq!(draft.weekly_hours.len(), 7);
        assert!(draft.weekly_hours.get("dimanche").unwrap().closed);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_add_dish_uses_next_dense_id() {
        let mut draft = default_draft();

        let id = add_dish(
            &mut draft,
            DishFields {
                name: Some("Lasagne".into()),
                price: Some(11.0),
                tags: vec!["vegetarien".into()],
                ..DishFields::default()
            },
        );

        assert_eq!(id, 2);
        let dish = &draft.dishes[1];
        assert_eq!(dish.name, "Lasagne");
        assert_eq!(dish.background_color, DEFAULT_BACKGROUND);
        assert!(dish.is_vegetarian());
    }

    #[test]
    fn test_remove_dish_renumbers_remaining_dishes() {
        // Arrange
        let mut draft = MenuDocument::with_dishes((1..=4).map(complete_dish).collect());

        // Act
        let removed = remove_dish(&mut draft, 2).unwrap();

        // Assert
        assert_eq!(removed.name, "Plat 2");
        let ids: Vec<u32> = draft.dishes.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(draft.dishes[1].name, "Plat 3");
    }

    #[test]
    fn test_remove_last_dish_is_refused() {
        let mut draft = default_draft();
        assert_eq!(remove_dish(&mut draft, 1), Err(EditError::LastDish));
        assert_eq!(draft.dishes.len(), 1);
    }

    #[test]
    fn test_remove_unknown_dish_is_an_error() {
        let mut draft = MenuDocument::with_dishes((1..=2).map(complete_dish).collect());
        assert_eq!(
            remove_dish(&mut draft, 9),
            Err(EditError::NoSuchDish { id: 9, count: 2 })
        );
    }

    #[test]
    fn test_set_display_changes_layout() {
        let mut draft = default_draft();
        set_display(&mut draft, DisplayType::Sandwich);
        assert_eq!(draft.display_type(), DisplayType::Sandwich);
    }

    #[test]
    fn test_validate_for_publish_lists_incomplete_dishes() {
        // Arrange
        let mut draft = default_draft();
        draft.dishes = vec![complete_dish(1), Dish::blank(2), complete_dish(3)];
        draft.dishes[2].price = 0.0;

        // Act
        let result = validate_for_publish(&draft);

        // Assert
        assert_eq!(result, Err(EditError::Incomplete(vec![2, 3])));
    }

    #[test]
    fn test_validate_for_publish_reports_structural_errors_first() {
        let mut draft = default_draft();
        draft.dishes = vec![complete_dish(1), complete_dish(1)];
        assert_eq!(
            validate_for_publish(&draft),
            Err(EditError::Document(DocumentError::DuplicateId(1)))
        );
    }

    #[test]
    fn test_validate_for_publish_requires_every_weekday() {
        // Arrange
        let mut draft = default_draft();
        draft.dishes = vec![complete_dish(1)];
        draft.weekly_hours = WeeklyHours::default();
        draft.weekly_hours.set("lundi", DayHours::open("11:30", "14:30"));

        // Act
        let result = validate_for_publish(&draft);

        // Assert
        assert_eq!(
            result,
            Err(EditError::Document(DocumentError::MissingWeekday("mardi")))
        );
    }

    #[test]
    fn test_normalize_import_fills_missing_fields() {
        // Arrange: no affichage, one dish with an empty bgColor and no image
        let input = br#"{ "plats": [ { "id": 1, "nom": "Soupe", "bgColor": "" } ] }"#;

        // Act
        let draft = normalize_import(input).unwrap();

        // Assert
        assert_eq!(draft.display_type(), DisplayType::Grid);
        assert_eq!(draft.dishes[0].image_path, "");
        assert_eq!(draft.dishes[0].background_color, DEFAULT_BACKGROUND);
    }

    #[test]
    fn test_normalize_import_keeps_existing_values() {
        let input = br##"{ "affichage": { "type": "2" },
                          "plats": [ { "id": 1, "image": "img/a.jpg", "bgColor": "#ff0000" } ] }"##;

        let draft = normalize_import(input).unwrap();

        assert_eq!(draft.display_type(), DisplayType::Carousel);
        assert_eq!(draft.dishes[0].image_path, "img/a.jpg");
        assert_eq!(draft.dishes[0].background_color, "#ff0000");
    }

    #[test]
    fn test_normalize_import_rejects_missing_dish_array() {
        assert!(matches!(
            normalize_import(br#"{ "plats": {} }"#),
            Err(EditError::InvalidStructure(_))
        ));
        assert!(matches!(
            normalize_import(b"[1, 2]"),
            Err(EditError::InvalidStructure(_))
        ));
    }
}
