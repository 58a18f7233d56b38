//! # List and Grid Windowing
//!
//! Both the note list and the card grid keep the selection near the middle of
//! the visible window and only shift the window near the ends.
//!
//! ## List
//!
//! Each entry takes two rows, a title and a separator. When the whole list
//! does not fit, two rows are reserved for the `▲ more` / `▼ more`
//! indicators. A final odd row still fits one more title (without its
//! separator).
//!
//! ## Grid
//!
//! Cards have a fixed size and gap. The grid only ever contains notes that
//! are not hidden; indexes here are positions in that navigable set, not in
//! the full note list.

use crate::model::Note;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ROWS_PER_ENTRY: usize = 2;
const INDICATOR_ROWS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListWindow {
    /// First visible entry.
    pub start: usize,
    /// One past the last visible entry.
    pub end: usize,
    /// Selected index clamped to the list.
    pub selected: usize,
    /// How many of the visible entries get a separator row.
    pub separators: usize,
    pub more_above: bool,
    pub more_below: bool,
}

impl ListWindow {
    pub fn compute(total: usize, selected: usize, height: usize) -> Self {
        if total == 0 {
            return Self::default();
        }

        let indicator_rows = if total * ROWS_PER_ENTRY > height {
            INDICATOR_ROWS
        } else {
            0
        };
        let available = height.saturating_sub(indicator_rows);
        let full = available / ROWS_PER_ENTRY;
        let partial = usize::from(available % ROWS_PER_ENTRY >= 1);
        let visible = (full + partial).min(total).max(1);

        let selected = selected.min(total - 1);
        let start = selected
            .saturating_sub(visible / 2)
            .min(total - visible);
        let end = (start + visible).min(total);

        Self {
            start,
            end,
            selected,
            separators: available.saturating_sub(visible),
            more_above: start > 0,
            more_below: end < total,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Removes later entries whose id was already seen, keeping order.
pub fn dedup_by_id(notes: &[Note]) -> Vec<&Note> {
    let mut seen = std::collections::HashSet::new();
    notes.iter().filter(|n| seen.insert(n.id.as_str())).collect()
}

/// Collapses whitespace and cuts `text` to `max_width` display columns,
/// ending with `…` when shortened.
pub fn truncate_title(text: &str, max_width: usize) -> String {
    let clean = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if clean.width() <= max_width {
        return clean;
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in clean.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub card_width: usize,
    pub card_height: usize,
    pub gap: usize,
    /// Rows above the cards (heading and spacing).
    pub header_rows: usize,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            card_width: 30,
            card_height: 9,
            gap: 2,
            header_rows: 2,
        }
    }
}

impl GridLayout {
    pub fn columns(&self, width: usize) -> usize {
        ((width + self.gap) / (self.card_width + self.gap)).max(1)
    }

    pub fn rows_per_page(&self, height: usize) -> usize {
        let usable = height.saturating_sub(self.header_rows);
        ((usable + self.gap) / (self.card_height + self.gap)).max(1)
    }

    pub fn window(&self, width: usize, height: usize, total: usize, selected: usize) -> GridWindow {
        let columns = self.columns(width);
        let rows_per_page = self.rows_per_page(height);
        let selected = selected.min(total.saturating_sub(1));
        let total_rows = total.div_ceil(columns).max(1);
        let selected_row = selected / columns;
        let row_start = selected_row
            .saturating_sub(rows_per_page / 2)
            .min(total_rows.saturating_sub(rows_per_page));
        let start = (row_start * columns).min(total);
        let end = (start + rows_per_page * columns).min(total);

        GridWindow {
            columns,
            rows_per_page,
            total_rows,
            row_start,
            start,
            end,
            selected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridWindow {
    pub columns: usize,
    pub rows_per_page: usize,
    pub total_rows: usize,
    /// Top visible row.
    pub row_start: usize,
    /// Flat index range of visible cards.
    pub start: usize,
    pub end: usize,
    pub selected: usize,
}

impl GridWindow {
    /// `(row, col)` of a flat index.
    pub fn cell(&self, index: usize) -> (usize, usize) {
        (index / self.columns, index % self.columns)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Moves within a grid of `total` cards laid out `columns` wide. Returns
/// `None` when the move would cross a row edge or leave the set.
pub fn grid_move(total: usize, columns: usize, index: usize, dir: Direction) -> Option<usize> {
    let columns = columns.max(1);
    if index >= total {
        return None;
    }
    let col = index % columns;
    let target = match dir {
        Direction::Left if col > 0 => index - 1,
        Direction::Right if col + 1 < columns => index + 1,
        Direction::Up if index >= columns => index - columns,
        Direction::Down => index + columns,
        _ => return None,
    };
    (target < total).then_some(target)
}

/// Positions in `notes` that the grid may visit: everything not hidden.
pub fn navigable_indices<'a>(notes: impl IntoIterator<Item = &'a Note>) -> Vec<usize> {
    notes
        .into_iter()
        .enumerate()
        .filter(|(_, n)| !n.hidden)
        .map(|(i, _)| i)
        .collect()
}
