//! Open / closed status derived from weekly hours.
//!
//! The comparison is purely lexical on zero-padded `HH:MM` strings, which is
//! the same as comparing minutes since midnight as long as both sides are
//! well formed.  Both bounds are inclusive.

use chrono::{NaiveDateTime, Timelike, Weekday};

use crate::domain::menu::WeeklyHours;

/// What the status banner shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenStatus {
    Open,
    Closed,
    /// No usable entry for today; the banner is left blank.
    Unknown,
}

impl OpenStatus {
    /// Banner text.
    pub fn label(self) -> &'static str {
        match self {
            OpenStatus::Open => "OUVERT",
            OpenStatus::Closed => "FERMÉ",
            OpenStatus::Unknown => "",
        }
    }

    /// Full class attribute of the status element.
    pub fn css_class(self) -> &'static str {
        match self {
            OpenStatus::Open => "status ouvert",
            OpenStatus::Closed => "status ferme",
            OpenStatus::Unknown => "status",
        }
    }
}

/// Derives the status for `weekday` at wall-clock time `hhmm` (`"HH:MM"`).
pub fn derive_status(hours: &WeeklyHours, weekday: Weekday, hhmm: &str) -> OpenStatus {
    let Some(today) = hours.for_weekday(weekday) else {
        return OpenStatus::Unknown;
    };
    if today.closed {
        return OpenStatus::Closed;
    }
    match (today.opens_at.as_deref(), today.closes_at.as_deref()) {
        (Some(opens), Some(closes)) if is_hhmm(opens) && is_hhmm(closes) => {
            if opens <= hhmm && hhmm <= closes {
                OpenStatus::Open
            } else {
                OpenStatus::Closed
            }
        }
        _ => OpenStatus::Unknown,
    }
}

/// Convenience wrapper over [`derive_status`] for a local timestamp.
pub fn status_at(hours: &WeeklyHours, now: NaiveDateTime) -> OpenStatus {
    use chrono::Datelike;
    let hhmm = format!("{:02}:{:02}", now.hour(), now.minute());
    derive_status(hours, now.weekday(), &hhmm)
}

fn is_hhmm(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 5
        && bytes[2] == b':'
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes[3..].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::menu::DayHours;
    use chrono::NaiveDate;

    fn monday_lunch() -> WeeklyHours {
        let mut hours = WeeklyHours::default();
        hours.set("lundi", DayHours::open("11:30", "14:30"));
        hours.set("dimanche", DayHours::closed());
        hours
    }

    #[test]
    fn test_derive_status_open_inside_window() {
        assert_eq!(derive_status(&monday_lunch(), Weekday::Mon, "12:00"), OpenStatus::Open);
    }

    #[test]
    fn test_derive_status_closed_after_window() {
        assert_eq!(derive_status(&monday_lunch(), Weekday::Mon, "15:00"), OpenStatus::Closed);
    }

    #[test]
    fn test_derive_status_bounds_are_inclusive() {
        let hours = monday_lunch();
        assert_eq!(derive_status(&hours, Weekday::Mon, "11:30"), OpenStatus::Open);
        assert_eq!(derive_status(&hours, Weekday::Mon, "14:30"), OpenStatus::Open);
        assert_eq!(derive_status(&hours, Weekday::Mon, "11:29"), OpenStatus::Closed);
    }

    #[test]
    fn test_derive_status_closed_day_is_closed_at_any_time() {
        for t in ["00:00", "12:00", "23:59"] {
            assert_eq!(derive_status(&monday_lunch(), Weekday::Sun, t), OpenStatus::Closed);
        }
    }

    #[test]
    fn test_derive_status_missing_day_is_unknown() {
        assert_eq!(derive_status(&monday_lunch(), Weekday::Wed, "12:00"), OpenStatus::Unknown);
    }

    #[test]
    fn test_derive_status_malformed_entry_is_unknown() {
        // Arrange: opening time only, and a garbled closing time
        let mut hours = WeeklyHours::default();
        hours.set("mardi", DayHours { closed: false, opens_at: Some("11:30".into()), closes_at: None });
        hours.set("jeudi", DayHours::open("11:30", "2pm"));

        // Assert
        assert_eq!(derive_status(&hours, Weekday::Tue, "12:00"), OpenStatus::Unknown);
        assert_eq!(derive_status(&hours, Weekday::Thu, "12:00"), OpenStatus::Unknown);
    }

    #[test]
    fn test_status_at_uses_local_weekday_and_minutes() {
        // 2024-03-04 is a Monday
        let noon = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_hms_opt(12, 0, 59).unwrap();
        assert_eq!(status_at(&monday_lunch(), noon), OpenStatus::Open);
    }

    #[test]
    fn test_open_status_labels_and_classes() {
        assert_eq!(OpenStatus::Open.label(), "OUVERT");
        assert_eq!(OpenStatus::Closed.css_class(), "status ferme");
        assert_eq!(OpenStatus::Unknown.label(), "");
    }
}
