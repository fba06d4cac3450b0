//! Touch gesture recognition.
//!
//! Pure functions over raw coordinates.  The display service feeds them the
//! start and end points reported by the touch layer and acts on the result.

/// Minimum horizontal travel, in pixels, for a swipe.
pub const SWIPE_THRESHOLD_PX: f64 = 50.0;

/// Minimum downward pull, in pixels, that triggers a reload.
pub const PULL_TO_REFRESH_PX: f64 = 100.0;

/// Widest viewport on which swipes are recognised.
pub const SWIPE_MAX_VIEWPORT: u32 = 768;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Next,
    Previous,
}

/// Classifies a horizontal swipe from `start_x` to `end_x`.
///
/// Moving the finger leftwards (start greater than end) means "next".
/// Returns `None` for short moves and on viewports wider than
/// [`SWIPE_MAX_VIEWPORT`].
pub fn classify_swipe(start_x: f64, end_x: f64, viewport_width: u32) -> Option<SwipeDirection> {
    if viewport_width > SWIPE_MAX_VIEWPORT {
        return None;
    }
    let diff = start_x - end_x;
    if diff.abs() <= SWIPE_THRESHOLD_PX {
        return None;
    }
    if diff > 0.0 {
        Some(SwipeDirection::Next)
    } else {
        Some(SwipeDirection::Previous)
    }
}

/// `true` when a pull of `distance` pixels, started with the page scrolled
/// to the top, should reload the menu.
pub fn is_pull_to_refresh(distance: f64, at_top: bool) -> bool {
    at_top && distance > PULL_TO_REFRESH_PX
}
