//! # Cursor Motions
//!
//! Pure functions from `(content, position, motion)` to a new position.
//! Columns count `char`s, never bytes, so multi-byte text is always sliced
//! on character boundaries.
//!
//! Every motion is total: at a buffer edge it returns its input unchanged.

/// A zero-based line/column position in a [`LineBuffer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CursorPosition {
    pub line: usize,
    pub col: usize,
}

impl CursorPosition {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    WordForward,
    WordBackward,
    LineStart,
    LineEnd,
    BufferTop,
    BufferBottom,
}

/// Note content split into lines of chars.
///
/// Lines are separated by `\n`; a trailing `\r` is dropped. Empty content is
/// a single empty line, so there is always at least one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<Vec<char>>,
}

impl LineBuffer {
    pub fn new(content: &str) -> Self {
        let lines = content
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).chars().collect())
            .collect();
        Self { lines }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Length of `line` in chars; 0 past the end.
    pub fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, Vec::len)
    }

    pub fn line(&self, line: usize) -> Option<&[char]> {
        self.lines.get(line).map(Vec::as_slice)
    }

    /// Chars `[from, to)` of `line` as a string, clamped to the line.
    pub fn slice(&self, line: usize, from: usize, to: usize) -> String {
        let chars = self.line(line).unwrap_or(&[]);
        let to = to.min(chars.len());
        let from = from.min(to);
        chars[from..to].iter().collect()
    }

    pub fn line_text(&self, line: usize) -> String {
        self.slice(line, 0, self.line_len(line))
    }

    /// Index of the last valid character, 0 on an empty line.
    fn last_col(&self, line: usize) -> usize {
        self.line_len(line).saturating_sub(1)
    }

    /// Pulls a position back inside the buffer.
    pub fn clamp(&self, pos: CursorPosition) -> CursorPosition {
        let line = pos.line.min(self.line_count() - 1);
        CursorPosition::new(line, pos.col.min(self.last_col(line)))
    }

    /// Clamps only the line; columns are resolved by the caller.
    pub(crate) fn clamp_line(&self, pos: CursorPosition) -> CursorPosition {
        CursorPosition::new(pos.line.min(self.line_count() - 1), pos.col)
    }

    pub fn apply(&self, pos: CursorPosition, motion: Motion) -> CursorPosition {
        let pos = self.clamp(pos);
        match motion {
            Motion::Left => self.left(pos),
            Motion::Right => self.right(pos),
            Motion::Up => self.up(pos),
            Motion::Down => self.down(pos),
            Motion::WordForward => self.word_forward(pos),
            Motion::WordBackward => self.word_backward(pos),
            Motion::LineStart => CursorPosition::new(pos.line, 0),
            Motion::LineEnd => CursorPosition::new(pos.line, self.last_col(pos.line)),
            Motion::BufferTop => CursorPosition::new(0, pos.col.min(self.last_col(0))),
            Motion::BufferBottom => {
                let last = self.line_count() - 1;
                CursorPosition::new(last, pos.col.min(self.last_col(last)))
            }
        }
    }

    fn left(&self, pos: CursorPosition) -> CursorPosition {
        if pos.col > 0 {
            CursorPosition::new(pos.line, pos.col - 1)
        } else if pos.line > 0 {
            CursorPosition::new(pos.line - 1, self.last_col(pos.line - 1))
        } else {
            pos
        }
    }

    fn right(&self, pos: CursorPosition) -> CursorPosition {
        if pos.col + 1 < self.line_len(pos.line) {
            CursorPosition::new(pos.line, pos.col + 1)
        } else if pos.line + 1 < self.line_count() {
            CursorPosition::new(pos.line + 1, 0)
        } else {
            pos
        }
    }

    fn up(&self, pos: CursorPosition) -> CursorPosition {
        if pos.line == 0 {
            return pos;
        }
        let line = pos.line - 1;
        CursorPosition::new(line, pos.col.min(self.last_col(line)))
    }

    fn down(&self, pos: CursorPosition) -> CursorPosition {
        if pos.line + 1 >= self.line_count() {
            return pos;
        }
        let line = pos.line + 1;
        CursorPosition::new(line, pos.col.min(self.last_col(line)))
    }

    fn word_forward(&self, pos: CursorPosition) -> CursorPosition {
        let chars = &self.lines[pos.line];
        let len = chars.len();
        let mut col = pos.col;

        while col < len && !chars[col].is_whitespace() {
            col += 1;
        }
        while col < len && chars[col].is_whitespace() {
            col += 1;
        }

        if col < len {
            return CursorPosition::new(pos.line, col);
        }
        if pos.line + 1 < self.line_count() {
            let line = pos.line + 1;
            let next = &self.lines[line];
            let col = next
                .iter()
                .position(|c| !c.is_whitespace())
                .unwrap_or(next.len());
            return CursorPosition::new(line, col.min(self.last_col(line)));
        }
        CursorPosition::new(pos.line, self.last_col(pos.line))
    }

    fn word_backward(&self, pos: CursorPosition) -> CursorPosition {
        if pos.col == 0 {
            return pos;
        }
        let chars = &self.lines[pos.line];
        let mut col = pos.col - 1;
        while col > 0 && chars[col].is_whitespace() {
            col -= 1;
        }
        while col > 0 && !chars[col - 1].is_whitespace() {
            col -= 1;
        }
        CursorPosition::new(pos.line, col)
    }
}
