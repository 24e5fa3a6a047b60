//! Floating-panel placement and rendering.
//!
//! The combobox asks for a panel with `{ active, use_portal }` and a desired
//! size; this module decides where it goes. With `use_portal` the panel may
//! use the whole frame, otherwise it is confined to the area the host gave
//! the component.

use ratatui::layout::Rect;
use ratatui::widgets::{Block, Clear};
use ratatui::Frame;

/// Placement request for a floating panel anchored to a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overlay {
    pub active: bool,
    pub use_portal: bool,
}

impl Overlay {
    pub fn new(active: bool, use_portal: bool) -> Self {
        Self { active, use_portal }
    }

    /// Compute the panel rectangle.
    ///
    /// The panel starts at the anchor's top-left corner and is at least as
    /// wide as the anchor. When it would overflow the bottom of the bounds
    /// it is flipped to end at the anchor's bottom edge instead. Returns
    /// `None` when inactive or when there is no room at all.
    pub fn place(&self, anchor: Rect, width: u16, height: u16, local: Rect, frame: Rect) -> Option<Rect> {
        if !self.active {
            return None;
        }
        let bounds = if self.use_portal { frame } else { local };
        let anchor = anchor.intersection(bounds);
        if anchor.is_empty() || bounds.is_empty() {
            return None;
        }

        let width = width.max(anchor.width).min(bounds.right() - anchor.x);
        let below = bounds.bottom() - anchor.y;
        let above = anchor.bottom() - bounds.y;

        let (y, height) = if height <= below || below >= above {
            (anchor.y, height.min(below))
        } else {
            let height = height.min(above);
            (anchor.bottom() - height, height)
        };

        if width == 0 || height == 0 {
            return None;
        }
        Some(Rect::new(anchor.x, y, width, height))
    }
}

/// Clear the overlay area and optionally render a block border.
///
/// Returns the inner area (after block padding, if any).
pub fn render_overlay(frame: &mut Frame, area: Rect, block: Option<&Block>) -> Rect {
    frame.render_widget(Clear, area);
    if let Some(block) = block {
        let inner = block.inner(area);
        frame.render_widget(block.clone(), area);
        inner
    } else {
        area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Rect = Rect::new(0, 0, 80, 24);

    #[test]
    fn inactive_places_nothing() {
        let overlay = Overlay::new(false, false);
        assert_eq!(overlay.place(Rect::new(0, 0, 10, 1), 10, 5, FRAME, FRAME), None);
    }

    #[test]
    fn covers_anchor_and_grows_down() {
        let overlay = Overlay::new(true, false);
        let anchor = Rect::new(4, 2, 20, 1);
        let placed = overlay.place(anchor, 10, 6, FRAME, FRAME).unwrap();
        assert_eq!(placed, Rect::new(4, 2, 20, 6));
    }

    #[test]
    fn widens_past_anchor_within_bounds() {
        let overlay = Overlay::new(true, false);
        let anchor = Rect::new(70, 0, 5, 1);
        let placed = overlay.place(anchor, 30, 3, FRAME, FRAME).unwrap();
        assert_eq!(placed.width, 10);
    }

    #[test]
    fn flips_up_when_no_room_below() {
        let overlay = Overlay::new(true, false);
        let anchor = Rect::new(0, 20, 10, 1);
        let placed = overlay.place(anchor, 10, 8, FRAME, FRAME).unwrap();
        assert_eq!(placed, Rect::new(0, 13, 10, 8));
    }

    #[test]
    fn local_bounds_clip_without_portal() {
        let local = Rect::new(0, 0, 20, 3);
        let anchor = Rect::new(0, 0, 20, 1);

        let clipped = Overlay::new(true, false).place(anchor, 20, 8, local, FRAME).unwrap();
        assert_eq!(clipped.height, 3);

        let portal = Overlay::new(true, true).place(anchor, 20, 8, local, FRAME).unwrap();
        assert_eq!(portal.height, 8);
    }
}
