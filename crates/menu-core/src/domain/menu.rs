//! Menu document domain entity.
//!
//! A [`MenuDocument`] is the complete description of what the menu board
//! shows: the restaurant, the week, the ordered list of dishes, the ticker
//! messages and the weekly opening hours.  It is loaded once per render cycle
//! and replaced wholesale on reload; nothing in the display engine mutates it.
//!
//! # Wire format (for beginners)
//!
//! The document travels as JSON.  Its keys are the ones the menu editor has
//! always written, so field names on the wire are French while the Rust names
//! are English.  The mapping is done with `#[serde(rename = "...")]`:
//!
//! ```json
//! {
//!   "affichage": { "type": "2", "bgColor": "#ffffff" },
//!   "plats": [ { "id": 1, "nom": "Croque", "prix": 7.5, "categorie": "plat" } ],
//!   "horaires": { "lundi": { "ouverture": "11:30", "fermeture": "14:30" } }
//! }
//! ```
//!
//! Almost every field has a serde default so that older documents missing
//! newer fields still load.  The only required key is `plats`.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Background color used when a dish or the display block does not set one.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Version reported for documents that carry no `version` field.
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Weekday keys of the `horaires` map, Monday first.
pub const WEEKDAY_KEYS: [&str; 7] = [
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
];

/// Validation failures for a decoded menu document.
#[derive(Debug, Error, PartialEq)]
pub enum DocumentError {
    /// The document has no dishes at all.
    #[error("menu must contain at least one dish")]
    NoDishes,

    /// A dish id is zero.
    #[error("dish at position {index} has a non-positive id")]
    NonPositiveId { index: usize },

    /// Two dishes share the same id.
    #[error("duplicate dish id: {0}")]
    DuplicateId(u32),

    /// A price is negative or not a finite number.
    #[error("dish {id} has an invalid price")]
    InvalidPrice { id: u32 },

    /// An image field carries inline binary data instead of a path.
    #[error("dish {id} embeds image data; only relative image paths are allowed")]
    InlineImageData { id: u32 },

    /// The weekly hours map lacks an entry for the given day.
    #[error("weekly hours are missing an entry for {0}")]
    MissingWeekday(&'static str),

    /// The JSON text could not be parsed into a document.
    #[error("malformed menu JSON: {0}")]
    Json(String),
}

// ── Display type ──────────────────────────────────────────────────────────────

/// Which of the three layouts renders the document.
///
/// On the wire this is the string code `"1"`, `"2"` or `"3"`.  Anything else
/// (a missing field, `null`, an unknown code, a number) selects [`DisplayType::Grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayType {
    /// One card per dish with focus rotation.
    #[default]
    Grid,
    /// One column per dish, sliding sideways.
    Carousel,
    /// Static three-row board with placement buckets.
    Sandwich,
}

impl DisplayType {
    /// Parses a wire code, falling back to `Grid` for anything unrecognised.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "2" => DisplayType::Carousel,
            "3" => DisplayType::Sandwich,
            _ => DisplayType::Grid,
        }
    }

    /// Returns the wire code for this display type.
    pub fn code(self) -> &'static str {
        match self {
            DisplayType::Grid => "1",
            DisplayType::Carousel => "2",
            DisplayType::Sandwich => "3",
        }
    }
}

impl Serialize for DisplayType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for DisplayType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawCode {
            Text(String),
            Number(i64),
            Other(serde::de::IgnoredAny),
        }

        Ok(match RawCode::deserialize(deserializer)? {
            RawCode::Text(code) => DisplayType::from_code(&code),
            RawCode::Number(n) => DisplayType::from_code(&n.to_string()),
            RawCode::Other(_) => DisplayType::Grid,
        })
    }
}

/// The `affichage` block: layout selector plus page background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(rename = "type", default)]
    pub display_type: DisplayType,
    #[serde(rename = "bgColor", default = "default_background")]
    pub background_color: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            display_type: DisplayType::Grid,
            background_color: default_background(),
        }
    }
}

// ── Metadata ──────────────────────────────────────────────────────────────────

/// Display-only restaurant details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(rename = "nom", default)]
    pub name: String,
    #[serde(rename = "logo", default)]
    pub logo_path: String,
    #[serde(rename = "telephone", default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// The week the menu applies to.  Dates are ISO `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Week {
    #[serde(rename = "debut", default)]
    pub start_date: String,
    #[serde(rename = "fin", default)]
    pub end_date: String,
    /// ISO week number; `0` when the editor left it blank.
    #[serde(rename = "numero", default, deserialize_with = "lenient_week_number")]
    pub number: u32,
}

/// Accepts a number, a numeric string, or `null` (a blank editor field).
/// Anything unusable reads as week `0`.
fn lenient_week_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawNumber {
        Integer(u64),
        Float(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match RawNumber::deserialize(deserializer)? {
        RawNumber::Integer(n) => u32::try_from(n).unwrap_or(0),
        RawNumber::Float(f) if f.is_finite() && f >= 0.0 && f <= f64::from(u32::MAX) => f as u32,
        RawNumber::Text(text) => text.trim().parse().unwrap_or(0),
        RawNumber::Float(_) | RawNumber::Other(_) => 0,
    })
}

/// Ticker message priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "haute", alias = "high")]
    High,
    #[default]
    #[serde(rename = "normale", alias = "normal")]
    Normal,
}

impl Priority {
    /// CSS class used for ticker items of this priority.
    pub fn css_class(self) -> &'static str {
        match self {
            Priority::High => "haute",
            Priority::Normal => "normale",
        }
    }
}

/// One ticker message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "texte")]
    pub text: String,
    #[serde(rename = "priorite", default)]
    pub priority: Priority,
}

// ── Dishes ────────────────────────────────────────────────────────────────────

/// Course a dish belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "entree", alias = "starter")]
    Starter,
    #[default]
    #[serde(rename = "plat", alias = "main")]
    Main,
    #[serde(rename = "dessert")]
    Dessert,
}

/// A single menu line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: u32,
    #[serde(rename = "nom", default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "prix", default)]
    pub price: f64,
    #[serde(rename = "categorie", default)]
    pub category: Category,
    /// Explicit Sandwich column (1–4).  `None` means automatic placement.
    #[serde(rename = "colonne", default)]
    pub column: Option<u8>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(rename = "allergenes", default)]
    pub allergens: Vec<String>,
    /// Relative path to the dish photo, or empty for a placeholder.
    #[serde(rename = "image", default)]
    pub image_path: String,
    #[serde(rename = "bgColor", default = "default_background")]
    pub background_color: String,
    #[serde(rename = "nouveau", default)]
    pub is_new: bool,
    #[serde(rename = "epuise", default)]
    pub is_sold_out: bool,
}

impl Dish {
    /// Creates an empty dish with the given id and all defaults applied.
    pub fn blank(id: u32) -> Self {
        Self {
            id,
            name: String::new(),
            description: String::new(),
            price: 0.0,
            category: Category::Main,
            column: None,
            tags: BTreeSet::new(),
            allergens: Vec::new(),
            image_path: String::new(),
            background_color: default_background(),
            is_new: false,
            is_sold_out: false,
        }
    }

    /// A dish is complete when it has a name, a description and a positive price.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.description.trim().is_empty() && self.price > 0.0
    }

    /// Returns the explicit Sandwich column, treating `0` like "unset".
    pub fn placement_column(&self) -> Option<u8> {
        self.column.filter(|c| *c > 0)
    }

    pub fn has_image(&self) -> bool {
        !self.image_path.trim().is_empty()
    }

    pub fn is_vegetarian(&self) -> bool {
        self.tags.contains("vegetarien") || self.tags.contains("vegetarian")
    }
}

// ── Opening hours ─────────────────────────────────────────────────────────────

/// Opening hours for one weekday.
///
/// Either `closed` is set, or both `opens_at` and `closes_at` hold `HH:MM`
/// strings.  Entries with neither are tolerated and yield a blank status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayHours {
    #[serde(rename = "ferme", default, skip_serializing_if = "is_false")]
    pub closed: bool,
    #[serde(rename = "ouverture", default, skip_serializing_if = "Option::is_none")]
    pub opens_at: Option<String>,
    #[serde(rename = "fermeture", default, skip_serializing_if = "Option::is_none")]
    pub closes_at: Option<String>,
}

impl DayHours {
    pub fn closed() -> Self {
        Self {
            closed: true,
            opens_at: None,
            closes_at: None,
        }
    }

    pub fn open(opens_at: &str, closes_at: &str) -> Self {
        Self {
            closed: false,
            opens_at: Some(opens_at.to_string()),
            closes_at: Some(closes_at.to_string()),
        }
    }
}

/// Weekday name → opening hours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyHours(BTreeMap<String, DayHours>);

impl WeeklyHours {
    /// Monday–Friday 11:30–14:30, closed at the weekend.
    pub fn lunch_service() -> Self {
        let mut hours = Self::default();
        for key in &WEEKDAY_KEYS[..5] {
            hours.set(key, DayHours::open("11:30", "14:30"));
        }
        hours.set("samedi", DayHours::closed());
        hours.set("dimanche", DayHours::closed());
        hours
    }

    pub fn set(&mut self, day: &str, hours: DayHours) {
        self.0.insert(day.to_string(), hours);
    }

    pub fn get(&self, day: &str) -> Option<&DayHours> {
        self.0.get(day)
    }

    /// Looks up the entry for a calendar weekday.
    pub fn for_weekday(&self, weekday: Weekday) -> Option<&DayHours> {
        self.get(weekday_key(weekday))
    }

    /// Returns the first weekday key with no entry, if any.
    pub fn first_missing_day(&self) -> Option<&'static str> {
        WEEKDAY_KEYS.iter().copied().find(|k| !self.0.contains_key(*k))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Maps a chrono weekday to its `horaires` key.
pub fn weekday_key(weekday: Weekday) -> &'static str {
    WEEKDAY_KEYS[weekday.num_days_from_monday() as usize]
}

// ── The document ──────────────────────────────────────────────────────────────

/// The complete menu board document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuDocument {
    /// Content version; a change invalidates the display's local cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "affichage", default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub restaurant: Restaurant,
    #[serde(rename = "semaine", default)]
    pub week: Week,
    #[serde(rename = "plats")]
    pub dishes: Vec<Dish>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(rename = "horaires", default)]
    pub weekly_hours: WeeklyHours,
}

impl MenuDocument {
    /// A document holding only `dishes`, everything else defaulted.
    pub fn with_dishes(dishes: Vec<Dish>) -> Self {
        Self {
            version: None,
            display: DisplaySettings::default(),
            restaurant: Restaurant::default(),
            week: Week::default(),
            dishes,
            messages: Vec::new(),
            weekly_hours: WeeklyHours::default(),
        }
    }

    pub fn display_type(&self) -> DisplayType {
        self.display.display_type
    }

    /// Returns the document version, or [`DEFAULT_VERSION`] when absent.
    pub fn version_or_default(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_VERSION)
    }

    /// Checks the structural invariants every rendered document must hold.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant: no dishes, a zero or duplicate
    /// id, a negative price, or inline image data.  Incomplete weekly hours
    /// are accepted; the status banner stays blank for days without an entry.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.dishes.is_empty() {
            return Err(DocumentError::NoDishes);
        }

        let mut seen = HashSet::with_capacity(self.dishes.len());
        for (index, dish) in self.dishes.iter().enumerate() {
            if dish.id == 0 {
                return Err(DocumentError::NonPositiveId { index });
            }
            if !seen.insert(dish.id) {
                return Err(DocumentError::DuplicateId(dish.id));
            }
            if !dish.price.is_finite() || dish.price < 0.0 {
                return Err(DocumentError::InvalidPrice { id: dish.id });
            }
            if dish.image_path.trim_start().starts_with("data:") {
                return Err(DocumentError::InlineImageData { id: dish.id });
            }
        }

        Ok(())
    }
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

fn is_false(value: &bool) -> bool {
    !*value
}

// ── Tests ─────────────────────────────────────────────────────────────────────
