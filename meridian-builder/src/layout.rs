//! Viewport placement for floating panels (calendar popup, select menus).
use serde::{Deserialize, Serialize};

pub const CALENDAR_GAP: f64 = 10.0;
pub const CALENDAR_PAD: f64 = 12.0;
pub const MENU_GAP: f64 = 8.0;
pub const MENU_MARGIN: f64 = 12.0;
pub const MENU_MIN_HEIGHT: f64 = 140.0;
pub const MENU_FLIP_THRESHOLD: f64 = 180.0;
/// Viewports at or below this width show the calendar as a modal.
pub const MODAL_MAX_WIDTH: f64 = 860.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Whether the calendar should open as a modal instead of a popup.
#[must_use]
pub fn calendar_is_modal(coarse_pointer: bool, viewport_width: f64) -> bool {
    coarse_pointer || viewport_width <= MODAL_MAX_WIDTH
}

/// Top-left corner for the calendar popup: below the anchor, shifted to stay
/// inside the viewport, flipped above the anchor when it would overflow the
/// bottom edge.
#[must_use]
pub fn calendar_position(anchor: Rect, popup: Size, viewport: Size) -> (f64, f64) {
    let mut left = anchor.left;
    let mut top = anchor.bottom() + CALENDAR_GAP;

    if left + popup.width > viewport.width - CALENDAR_PAD {
        left = CALENDAR_PAD.max(viewport.width - popup.width - CALENDAR_PAD);
    }
    if top + popup.height > viewport.height - CALENDAR_PAD {
        top = anchor.top - popup.height - CALENDAR_GAP;
    }
    if top < CALENDAR_PAD {
        top = CALENDAR_PAD;
    }
    (left.round(), top.round())
}

/// Where a select menu goes relative to its button.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MenuPlacement {
    pub left: f64,
    pub width: f64,
    /// Set when the menu opens downwards.
    pub top: Option<f64>,
    /// Set when the menu opens upwards (distance from the viewport bottom).
    pub bottom: Option<f64>,
    pub max_height: f64,
    pub opens_up: bool,
}

/// Horizontal extent of a menu under `button`.
#[must_use]
pub fn menu_extent(button: Rect, viewport: Size) -> (f64, f64) {
    let width = button.width.min(viewport.width - MENU_MARGIN * 2.0);
    let left = button
        .left
        .max(MENU_MARGIN)
        .min(MENU_MARGIN.max(viewport.width - MENU_MARGIN - width));
    (left, width)
}

/// Place a menu of measured height `menu_height` under or above `button`.
#[must_use]
pub fn menu_placement(button: Rect, menu_height: f64, viewport: Size) -> MenuPlacement {
    let (left, width) = menu_extent(button, viewport);
    let space_below = viewport.height - button.bottom() - MENU_GAP - MENU_MARGIN;
    let space_above = button.top - MENU_GAP - MENU_MARGIN;

    let opens_up = (menu_height > space_below && space_above > space_below)
        || (space_below < MENU_FLIP_THRESHOLD && space_above > MENU_FLIP_THRESHOLD);

    if opens_up {
        MenuPlacement {
            left,
            width,
            top: None,
            bottom: Some(viewport.height - button.top + MENU_GAP),
            max_height: MENU_MIN_HEIGHT.max(space_above),
            opens_up,
        }
    } else {
        MenuPlacement {
            left,
            width,
            top: Some(button.bottom() + MENU_GAP),
            bottom: None,
            max_height: MENU_MIN_HEIGHT.max(space_below),
            opens_up,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size {
        width: 1280.0,
        height: 800.0,
    };

    #[test]
    fn calendar_opens_below_anchor() {
        let anchor = Rect::new(100.0, 200.0, 240.0, 40.0);
        let popup = Size {
            width: 320.0,
            height: 360.0,
        };
        assert_eq!(calendar_position(anchor, popup, VIEWPORT), (100.0, 250.0));
    }

    #[test]
    fn calendar_shifts_left_and_flips_up() {
        let anchor = Rect::new(1100.0, 600.0, 160.0, 40.0);
        let popup = Size {
            width: 320.0,
            height: 360.0,
        };
        let (left, top) = calendar_position(anchor, popup, VIEWPORT);
        assert_eq!(left, 1280.0 - 320.0 - 12.0);
        assert_eq!(top, 600.0 - 360.0 - 10.0);
    }

    #[test]
    fn calendar_never_goes_above_padding() {
        let anchor = Rect::new(10.0, 100.0, 100.0, 40.0);
        let popup = Size {
            width: 320.0,
            height: 700.0,
        };
        let (_, top) = calendar_position(anchor, popup, VIEWPORT);
        assert_eq!(top, CALENDAR_PAD);
    }

    #[test]
    fn modal_mode_on_touch_or_narrow() {
        assert!(calendar_is_modal(true, 1400.0));
        assert!(calendar_is_modal(false, 860.0));
        assert!(!calendar_is_modal(false, 861.0));
    }

    #[test]
    fn menu_opens_down_with_room() {
        let button = Rect::new(40.0, 100.0, 280.0, 44.0);
        let p = menu_placement(button, 200.0, VIEWPORT);
        assert!(!p.opens_up);
        assert_eq!(p.top, Some(152.0));
        assert_eq!(p.max_height, 800.0 - 144.0 - 8.0 - 12.0);
        assert_eq!(p.width, 280.0);
    }

    #[test]
    fn menu_flips_up_near_bottom() {
        let button = Rect::new(40.0, 680.0, 280.0, 44.0);
        let p = menu_placement(button, 200.0, VIEWPORT);
        assert!(p.opens_up);
        assert_eq!(p.bottom, Some(800.0 - 680.0 + 8.0));
        assert_eq!(p.top, None);
    }

    #[test]
    fn menu_width_and_left_respect_margins() {
        let narrow = Size {
            width: 300.0,
            height: 600.0,
        };
        let button = Rect::new(-20.0, 10.0, 400.0, 40.0);
        let (left, width) = menu_extent(button, narrow);
        assert_eq!(width, 276.0);
        assert_eq!(left, 12.0);
    }
}
