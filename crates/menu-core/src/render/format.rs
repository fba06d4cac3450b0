//! Text and color formatting shared by every layout.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};

use crate::domain::menu::Week;

/// `7` → `"7.00 €"`, `7.5` → `"7.50 €"`.
pub fn format_price(price: f64) -> String {
    format!("{price:.2} €")
}

/// ISO `YYYY-MM-DD` → `dd/mm`.  Unparseable input is returned unchanged.
pub fn format_short_date(iso: &str) -> String {
    match NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d") {
        Ok(date) => format!("{:02}/{:02}", date.day(), date.month()),
        Err(_) => iso.to_string(),
    }
}

/// `"Menu de la semaine N (dd/mm - dd/mm)"` for the default footer.
pub fn week_banner(week: &Week) -> String {
    format!(
        "Menu de la semaine {} ({} - {})",
        week.number,
        format_short_date(&week.start_date),
        format_short_date(&week.end_date)
    )
}

/// `"Semaine N (dd/mm - dd/mm)"` for the Sandwich footer; empty when the week
/// number is unset.
pub fn week_range(week: &Week) -> String {
    if week.number == 0 {
        return String::new();
    }
    let start = if week.start_date.is_empty() {
        String::new()
    } else {
        format_short_date(&week.start_date)
    };
    let end = if week.end_date.is_empty() {
        String::new()
    } else {
        format_short_date(&week.end_date)
    };
    format!("Semaine {} ({} - {})", week.number, start, end)
}

/// `HH:MM:SS`, zero padded.
pub fn format_clock(now: NaiveDateTime) -> String {
    format!("{:02}:{:02}:{:02}", now.hour(), now.minute(), now.second())
}

/// French long-form date, e.g. `"lundi 4 mars 2024"`.
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{} {} {} {}",
        french_weekday(date.weekday()),
        date.day(),
        french_month(date.month()),
        date.year()
    )
}

fn french_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "lundi",
        Weekday::Tue => "mardi",
        Weekday::Wed => "mercredi",
        Weekday::Thu => "jeudi",
        Weekday::Fri => "vendredi",
        Weekday::Sat => "samedi",
        Weekday::Sun => "dimanche",
    }
}

fn french_month(month: u32) -> &'static str {
    const MONTHS: [&str; 12] = [
        "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
        "octobre", "novembre", "décembre",
    ];
    MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

// ── Colors ────────────────────────────────────────────────────────────────────

/// An 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    /// Parses `#rrggbb` (the `#` is optional).  Anything else is `None`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Rgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

/// Diagonal translucent gradient used behind carousel columns.
///
/// Malformed colors fall back to white.
pub fn column_gradient(hex: &str) -> String {
    let Rgb { r, g, b } = Rgb::from_hex(hex).unwrap_or(Rgb::WHITE);
    format!(
        "linear-gradient(135deg, rgba({r}, {g}, {b}, 0.25) 0%, rgba({r}, {g}, {b}, 0.05) 70%, rgba(255, 255, 255, 0) 100%)"
    )
}
