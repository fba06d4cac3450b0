//! JSON codec for [`MenuDocument`].
//!
//! Decoding always runs [`MenuDocument::validate`], so a document returned by
//! [`decode_menu`] is safe to hand to the layout selector.

use crate::domain::menu::{DocumentError, MenuDocument};

/// Parses and validates a menu document from raw JSON bytes.
///
/// # Errors
///
/// Returns [`DocumentError::Json`] when the bytes are not a menu document, or
/// the first violated invariant otherwise.
///
/// # Examples
///
/// ```rust
/// use menu_core::{decode_menu, DisplayType};
///
/// let json = br#"{
///     "affichage": { "type": "2" },
///     "plats": [ { "id": 1, "nom": "Soupe", "prix": 4.5 } ],
///     "horaires": {
///         "lundi": { "ferme": true }, "mardi": { "ferme": true },
///         "mercredi": { "ferme": true }, "jeudi": { "ferme": true },
///         "vendredi": { "ferme": true }, "samedi": { "ferme": true },
///         "dimanche": { "ferme": true }
///     }
/// }"#;
/// let doc = decode_menu(json).unwrap();
/// assert_eq!(doc.display_type(), DisplayType::Carousel);
/// ```
pub fn decode_menu(input: &[u8]) -> Result<MenuDocument, DocumentError> {
    let document: MenuDocument =
        serde_json::from_slice(input).map_err(|e| DocumentError::Json(e.to_string()))?;
    document.validate()?;
    Ok(document)
}

/// Serialises a document as pretty-printed JSON, validating it first.
///
/// # Errors
///
/// Returns the first violated invariant, or [`DocumentError::Json`] if
/// serialisation itself fails.
pub fn encode_menu(document: &MenuDocument) -> Result<String, DocumentError> {
    document.validate()?;
    serde_json::to_string_pretty(document).map_err(|e| DocumentError::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::menu::{Category, DisplayType, Priority};

    const SAMPLE: &str = r##"{
        "version": "1.4.0",
        "affichage": { "type": "3", "bgColor": "#fdf6e3" },
        "restaurant": { "nom": "Traiteur Maxime", "logo": "images/logo.png",
                        "telephone": "04 123 45 67", "email": "contact@example.be" },
        "semaine": { "debut": "2024-03-04", "fin": "2024-03-08", "numero": 10 },
        "plats": [
            { "id": 1, "nom": "Club poulet", "description": "Pain, poulet, curry",
              "prix": 6.5, "categorie": "plat", "tags": ["vegetarien"],
              "allergenes": ["gluten"], "image": "images/club.jpg",
              "bgColor": "#e9c46a", "colonne": 1, "nouveau": true, "epuise": false },
            { "id": 2, "nom": "Tiramisu", "description": "Mascarpone",
              "prix": 4, "categorie": "dessert", "colonne": null }
        ],
        "messages": [ { "texte": "Bon appétit", "priorite": "haute" } ],
        "horaires": {
            "lundi": { "ouverture": "11:30", "fermeture": "14:30" },
            "mardi": { "ouverture": "11:30", "fermeture": "14:30" },
            "mercredi": { "ouverture": "11:30", "fermeture": "14:30" },
            "jeudi": { "ouverture": "11:30", "fermeture": "14:30" },
            "vendredi": { "ouverture": "11:30", "fermeture": "14:30" },
            "samedi": { "ferme": true },
            "dimanche": { "ferme": true }
        }
    }"##;

    #[test]
    fn test_decode_menu_reads_full_document() {
        // Act
        let doc = decode_menu(SAMPLE.as_bytes()).expect("sample must decode");

        // Assert
        assert_eq!(doc.display_type(), DisplayType::Sandwich);
        assert_eq!(doc.display.background_color, "#fdf6e3");
        assert_eq!(doc.restaurant.name, "Traiteur Maxime");
        assert_eq!(doc.week.number, 10);
        assert_eq!(doc.dishes.len(), 2);
        assert_eq!(doc.dishes[0].placement_column(), Some(1));
        assert!(doc.dishes[0].is_vegetarian());
        assert_eq!(doc.dishes[1].category, Category::Dessert);
        assert_eq!(doc.dishes[1].price, 4.0);
        assert_eq!(doc.messages[0].priority, Priority::High);
        assert!(doc.weekly_hours.get("dimanche").unwrap().closed);
    }

    #[test]
    fn test_decode_menu_rejects_missing_dish_list() {
        let err = decode_menu(br#"{"affichage": {"type": "1"}}"#).unwrap_err();
        assert!(matches!(err, DocumentError::Json(_)));
    }

    #[test]
    fn test_decode_menu_rejects_non_json() {
        let err = decode_menu(b"<html>offline</html>").unwrap_err();
        assert!(matches!(err, DocumentError::Json(_)));
    }

    #[test]
    fn test_decode_menu_accepts_document_without_hours() {
        // Arrange
        let json = br#"{"affichage":{"type":"1"},"plats":[{"id":1,"nom":"Soupe","prix":4.5}]}"#;

        // Act
        let doc = decode_menu(json).expect("hours are optional");

        // Assert
        assert!(doc.weekly_hours.is_empty());
        assert_eq!(doc.dishes[0].name, "Soupe");
    }

    #[test]
    fn test_decode_menu_accepts_week_with_a_missing_day() {
        // Arrange
        let json = SAMPLE.replace(r#""dimanche": { "ferme": true }"#, r#""extra": { "ferme": true }"#);

        // Act
        let doc = decode_menu(json.as_bytes()).expect("a missing day leaves the status blank");

        // Assert
        assert!(doc.weekly_hours.get("dimanche").is_none());
        assert_eq!(doc.weekly_hours.first_missing_day(), Some("dimanche"));
    }

    #[test]
    fn test_decode_menu_reads_blank_week_number_as_zero() {
        let json = SAMPLE.replace(r#""numero": 10"#, r#""numero": null"#);
        let doc = decode_menu(json.as_bytes()).expect("blank week number is tolerated");
        assert_eq!(doc.week.number, 0);
    }

    #[test]
    fn test_decode_menu_runs_validation() {
        let json = SAMPLE.replace(r#""id": 2"#, r#""id": 1"#);
        let err = decode_menu(json.as_bytes()).unwrap_err();
        assert_eq!(err, DocumentError::DuplicateId(1));
    }

    #[test]
    fn test_encode_menu_preserves_wire_keys() {
        // Arrange
        let doc = decode_menu(SAMPLE.as_bytes()).unwrap();

        // Act
        let json = encode_menu(&doc).unwrap();

        // Assert: the French keys survive so the editor and display agree
        for key in ["\"affichage\"", "\"plats\"", "\"horaires\"", "\"prix\"", "\"colonne\""] {
            assert!(json.contains(key), "missing {key}");
        }
        assert_eq!(decode_menu(json.as_bytes()).unwrap(), doc);
    }
}
