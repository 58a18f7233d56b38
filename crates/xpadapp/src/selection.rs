//! # Selection
//!
//! Visual selection over a note, vi style.
//!
//! ```text
//!            start_line / start_char
//!  Inactive ────────────────────────▶ Active { mode, anchor, cursor }
//!     ▲                                  │  extend(motion)  (cursor only)
//!     └──────── yank / cancel ───────────┘
//! ```
//!
//! The anchor is fixed when the selection starts. The pair is stored as
//! entered and only ordered when the range is read, so extending past the
//! anchor simply flips which end is first.
//!
//! Line mode covers whole lines `[min, max]`. Char mode covers the text from
//! the earlier position up to, but not including, the later one.

use crate::clipboard::ClipboardSink;
use crate::motion::{CursorPosition, LineBuffer, Motion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Line,
    Char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Inactive,
    Active {
        mode: SelectionMode,
        anchor: CursorPosition,
        cursor: CursorPosition,
    },
}

/// A covered piece of one line: chars `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub line: usize,
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Default)]
pub struct SelectionEngine {
    state: SelectionState,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SelectionState::Active { .. })
    }

    pub fn mode(&self) -> Option<SelectionMode> {
        match self.state {
            SelectionState::Active { mode, .. } => Some(mode),
            SelectionState::Inactive => None,
        }
    }

    pub fn cursor(&self) -> Option<CursorPosition> {
        match self.state {
            SelectionState::Active { cursor, .. } => Some(cursor),
            SelectionState::Inactive => None,
        }
    }

    pub fn anchor(&self) -> Option<CursorPosition> {
        match self.state {
            SelectionState::Active { anchor, .. } => Some(anchor),
            SelectionState::Inactive => None,
        }
    }

    /// Starts a selection at `at`. Ignored (returns `false`) while one is
    /// already active.
    pub fn start(&mut self, mode: SelectionMode, at: CursorPosition) -> bool {
        if self.is_active() {
            return false;
        }
        self.state = SelectionState::Active {
            mode,
            anchor: at,
            cursor: at,
        };
        true
    }

    pub fn start_line(&mut self, at: CursorPosition) -> bool {
        self.start(SelectionMode::Line, at)
    }

    pub fn start_char(&mut self, at: CursorPosition) -> bool {
        self.start(SelectionMode::Char, at)
    }

    /// Moves the selection cursor. Returns `false` when no selection is active.
    pub fn extend(&mut self, buffer: &LineBuffer, motion: Motion) -> bool {
        match &mut self.state {
            SelectionState::Active { cursor, .. } => {
                *cursor = buffer.apply(*cursor, motion);
                true
            }
            SelectionState::Inactive => false,
        }
    }

    pub fn cancel(&mut self) {
        self.state = SelectionState::Inactive;
    }

    /// The covered spans in document order.
    pub fn spans(&self, buffer: &LineBuffer) -> Vec<LineSpan> {
        let SelectionState::Active {
            mode,
            anchor,
            cursor,
        } = self.state
        else {
            return Vec::new();
        };
        let anchor = buffer.clamp_line(anchor);
        let cursor = buffer.clamp_line(cursor);

        match mode {
            SelectionMode::Line => {
                let first = anchor.line.min(cursor.line);
                let last = anchor.line.max(cursor.line);
                (first..=last)
                    .map(|line| LineSpan {
                        line,
                        from: 0,
                        to: buffer.line_len(line),
                    })
                    .collect()
            }
            SelectionMode::Char => {
                let (start, end) = if anchor <= cursor {
                    (anchor, cursor)
                } else {
                    (cursor, anchor)
                };
                (start.line..=end.line)
                    .map(|line| {
                        let len = buffer.line_len(line);
                        let from = if line == start.line { start.col.min(len) } else { 0 };
                        let to = if line == end.line { end.col.min(len) } else { len };
                        LineSpan {
                            line,
                            from,
                            to: to.max(from),
                        }
                    })
                    .collect()
            }
        }
    }

    /// The normalized selected text, or `None` while inactive.
    pub fn selected_text(&self, buffer: &LineBuffer) -> Option<String> {
        if !self.is_active() {
            return None;
        }
        let parts: Vec<String> = self
            .spans(buffer)
            .into_iter()
            .map(|span| buffer.slice(span.line, span.from, span.to))
            .collect();
        Some(parts.join("\n"))
    }

    /// Copies the selection to `sink` and ends it. Returns the copied text.
    pub fn yank<C: ClipboardSink + ?Sized>(
        &mut self,
        buffer: &LineBuffer,
        sink: &mut C,
    ) -> Option<String> {
        let text = self.selected_text(buffer)?;
        sink.copy(&text);
        self.state = SelectionState::Inactive;
        Some(text)
    }
}

/// Copies a whole note regardless of selection state.
pub fn yank_full<C: ClipboardSink + ?Sized>(content: &str, sink: &mut C) -> bool {
    sink.copy(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: usize, col: usize) -> CursorPosition {
        CursorPosition::new(line, col)
    }

    #[test]
    fn line_selection_extended_down_yanks_two_lines() {
        let buf = LineBuffer::new("Line1\nLine2\nLine3");
        let mut sel = SelectionEngine::new();
        let mut clip: Vec<String> = Vec::new();

        assert!(sel.start_line(at(1, 0)));
        assert!(sel.extend(&buf, Motion::Down));
        assert_eq!(sel.yank(&buf, &mut clip).as_deref(), Some("Line2\nLine3"));
        assert_eq!(clip, vec!["Line2\nLine3"]);
        assert!(!sel.is_active());
        assert_eq!(sel.anchor(), None);
    }

    #[test]
    fn line_selection_is_order_independent() {
        let buf = LineBuffer::new("a\nb\nc\nd");
        let mut sel = SelectionEngine::new();
        sel.start_line(at(2, 0));
        sel.extend(&buf, Motion::Up);
        sel.extend(&buf, Motion::Up);
        assert_eq!(sel.anchor(), Some(at(2, 0)));
        assert_eq!(sel.cursor(), Some(at(0, 0)));
        assert_eq!(sel.selected_text(&buf).as_deref(), Some("a\nb\nc"));
    }

    #[test]
    fn char_selection_on_one_line() {
        let buf = LineBuffer::new("hello world");
        let mut sel = SelectionEngine::new();
        let mut clip: Vec<String> = Vec::new();
        sel.start_char(at(0, 2));
        for _ in 0..3 {
            sel.extend(&buf, Motion::Right);
        }
        assert_eq!(sel.cursor(), Some(at(0, 5)));
        assert_eq!(sel.yank(&buf, &mut clip).as_deref(), Some("llo"));
    }

    #[test]
    fn char_selection_backwards_matches_forwards() {
        let buf = LineBuffer::new("hello world");
        let mut sel = SelectionEngine::new();
        sel.start_char(at(0, 5));
        for _ in 0..3 {
            sel.extend(&buf, Motion::Left);
        }
        assert_eq!(sel.selected_text(&buf).as_deref(), Some("llo"));
    }

    #[test]
    fn char_selection_across_lines() {
        let buf = LineBuffer::new("first line\nmiddle\nlast line");
        let mut sel = SelectionEngine::new();
        sel.start_char(at(2, 4));
        sel.extend(&buf, Motion::Up);
        sel.extend(&buf, Motion::Up);
        sel.extend(&buf, Motion::LineStart);
        sel.extend(&buf, Motion::WordForward);
        assert_eq!(sel.cursor(), Some(at(0, 6)));
        assert_eq!(
            sel.spans(&buf),
            vec![
                LineSpan { line: 0, from: 6, to: 10 },
                LineSpan { line: 1, from: 0, to: 6 },
                LineSpan { line: 2, from: 0, to: 4 },
            ]
        );
        assert_eq!(
            sel.selected_text(&buf).as_deref(),
            Some("line\nmiddle\nlast")
        );
    }

    #[test]
    fn inactive_engine_rejects_motion_and_yank() {
        let buf = LineBuffer::new("abc");
        let mut sel = SelectionEngine::new();
        let mut clip: Vec<String> = Vec::new();
        assert!(!sel.extend(&buf, Motion::Down));
        assert_eq!(sel.yank(&buf, &mut clip), None);
        assert!(clip.is_empty());
        assert_eq!(sel.selected_text(&buf), None);
    }

    #[test]
    fn second_start_keeps_original_anchor() {
        let mut sel = SelectionEngine::new();
        sel.start_line(at(1, 0));
        assert!(!sel.start_char(at(3, 3)));
        assert_eq!(sel.mode(), Some(SelectionMode::Line));
        assert_eq!(sel.anchor(), Some(at(1, 0)));
    }

    #[test]
    fn cancel_clears_state() {
        let mut sel = SelectionEngine::new();
        sel.start_char(at(0, 1));
        sel.cancel();
        assert_eq!(sel.state(), SelectionState::Inactive);
    }

    #[test]
    fn full_yank_ignores_selection() {
        let mut clip: Vec<String> = Vec::new();
        assert!(yank_full("whole\nnote", &mut clip));
        assert_eq!(clip, vec!["whole\nnote"]);
    }

    #[test]
    fn stale_anchor_past_end_is_clamped() {
        let buf = LineBuffer::new("only");
        let mut sel = SelectionEngine::new();
        sel.start_line(at(5, 0));
        assert_eq!(sel.selected_text(&buf).as_deref(), Some("only"));
    }
}
