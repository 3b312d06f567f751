use std::ops::Range;

/// Slots moved by the strip's prev/next buttons.
pub const SCROLL_STEP: usize = 3;

/// Visible window over the thumbnail strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailStrip {
    total: usize,
    visible: usize,
    offset: usize,
}

impl ThumbnailStrip {
    pub fn new(total: usize, visible: usize) -> Self {
        Self {
            total,
            visible: visible.max(1),
            offset: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn visible_range(&self) -> Range<usize> {
        self.offset..(self.offset + self.visible).min(self.total)
    }

    fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.visible)
    }

    /// Centres `index` in the window, clamped to the ends of the strip.
    pub fn scroll_into_view(&mut self, index: usize) {
        if index >= self.total {
            return;
        }
        self.offset = index.saturating_sub(self.visible / 2).min(self.max_offset());
    }

    pub fn scroll_by(&mut self, direction: i32) {
        let step = SCROLL_STEP * direction.unsigned_abs() as usize;
        self.offset = if direction < 0 {
            self.offset.saturating_sub(step)
        } else {
            (self.offset + step).min(self.max_offset())
        };
    }
}
