//! Follow-cursor scrolling for the note pane.

/// Rows the note pane spends on chrome: title, top/bottom padding, border.
pub const NOTE_PANE_CHROME: usize = 4;

/// Content rows available in a note pane `terminal_rows` tall.
pub fn usable_rows(terminal_rows: usize) -> usize {
    terminal_rows.saturating_sub(NOTE_PANE_CHROME)
}

/// Scroll offset of a single text buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    offset: usize,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(offset: usize) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Moves the offset as little as possible so `target` stays in view, then
    /// clamps it to `[0, max(0, total - height)]`.
    ///
    /// Scrolling down starts once `target > offset + height`, so `target`
    /// may sit one row past the window without moving it. The `>=` form
    /// (`target >= offset + height`) conflicts with the reference case
    /// total 100, height 10, offset 40: target 50 must keep offset 40 and
    /// target 55 must give 46. Only the strict form satisfies both.
    pub fn follow(&mut self, total: usize, height: usize, target: usize) -> usize {
        let mut offset = self.offset;
        if target < offset {
            offset = target;
        } else if target > offset + height {
            offset = (target + 1).saturating_sub(height);
        }
        self.offset = offset.min(total.saturating_sub(height));
        self.offset
    }

    /// Range of line indexes currently in view.
    pub fn visible(&self, total: usize, height: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(total);
        start..(start + height).min(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_put_while_target_is_in_view() {
        let mut vp = Viewport::with_offset(40);
        assert_eq!(vp.follow(100, 10, 45), 40);
        assert_eq!(vp.follow(100, 10, 50), 40);
    }

    #[test]
    fn jumps_minimally_downward() {
        let mut vp = Viewport::with_offset(40);
        assert_eq!(vp.follow(100, 10, 55), 46);
    }

    #[test]
    fn jumps_upward_to_target() {
        let mut vp = Viewport::with_offset(40);
        assert_eq!(vp.follow(100, 10, 12), 12);
    }

    #[test]
    fn clamps_to_last_page() {
        let mut vp = Viewport::with_offset(95);
        assert_eq!(vp.follow(100, 10, 99), 90);
    }

    #[test]
    fn short_buffers_never_scroll() {
        let mut vp = Viewport::with_offset(3);
        assert_eq!(vp.follow(5, 10, 4), 0);
        assert_eq!(vp.follow(0, 10, 0), 0);
    }

    #[test]
    fn usable_rows_subtracts_chrome() {
        assert_eq!(usable_rows(24), 20);
        assert_eq!(usable_rows(2), 0);
    }

    #[test]
    fn visible_range_is_clipped() {
        let vp = Viewport::with_offset(8);
        assert_eq!(vp.visible(12, 10), 8..12);
    }
}
