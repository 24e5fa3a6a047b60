//! Highlight navigation over the flattened item list.
//!
//! `Highlight` tracks an optional cursor and a scroll offset for a list of
//! `count` rows, `visible` of which fit on screen. The cursor is `None`
//! whenever nothing is highlighted, and is never out of range.

/// A directional navigation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    cursor: Option<usize>,
    offset: usize,
    count: usize,
    visible: usize,
}

impl Highlight {
    pub fn new(count: usize, visible: usize) -> Self {
        Self {
            cursor: None,
            offset: 0,
            count,
            visible,
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Reset the list length, clamping the cursor into range (or clearing
    /// it when the list is empty).
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        if self.count == 0 {
            self.cursor = None;
            self.offset = 0;
        } else if let Some(c) = self.cursor {
            if c >= self.count {
                self.cursor = Some(self.count - 1);
            }
        }
        self.clamp_offset();
        self.ensure_visible();
    }

    pub fn set_visible(&mut self, visible: usize) {
        self.visible = visible;
        self.ensure_visible();
    }

    /// Move the cursor. Next/prev wrap at the ends; an empty list is a no-op.
    /// With nothing highlighted, next lands on the first row and prev on the
    /// last.
    pub fn step(&mut self, direction: Direction) {
        if self.count == 0 {
            return;
        }
        let last = self.count - 1;
        self.cursor = Some(match (direction, self.cursor) {
            (Direction::Next, Some(c)) if c < last => c + 1,
            (Direction::Next, _) => 0,
            (Direction::Prev, Some(c)) if c > 0 => c - 1,
            (Direction::Prev, _) => last,
            (Direction::First, _) => 0,
            (Direction::Last, _) => last,
        });
        self.ensure_visible();
    }

    /// Highlight `index`, clamped into range. No-op on an empty list.
    pub fn select(&mut self, index: usize) {
        if self.count == 0 {
            return;
        }
        self.cursor = Some(index.min(self.count - 1));
        self.ensure_visible();
    }

    /// Clear the cursor and scroll back to the top.
    pub fn reset(&mut self) {
        self.cursor = None;
        self.offset = 0;
    }

    fn clamp_offset(&mut self) {
        let max_offset = self.count.saturating_sub(self.visible);
        self.offset = self.offset.min(max_offset);
    }

    fn ensure_visible(&mut self) {
        let Some(cursor) = self.cursor else {
            return;
        };
        if self.visible == 0 {
            return;
        }
        if cursor < self.offset {
            self.offset = cursor;
        } else if cursor >= self.offset + self.visible {
            self.offset = cursor + 1 - self.visible;
        }
    }
}
