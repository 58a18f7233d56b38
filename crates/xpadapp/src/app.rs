//! # App
//!
//! The interactive state machine behind the two-pane note browser. It owns
//! the note list, the cursor and selection over the current note, and the
//! current [`Mode`].
//!
//! ## Event model
//!
//! [`App::handle_key`] consumes one key to completion, including any disk
//! I/O, before the caller reads the next one. Nothing here touches the
//! terminal: rendering reads the accessors, and running an external editor is
//! handed back to the caller as an [`Outcome`]:
//!
//! ```text
//!   handle_key('e') ──▶ Outcome::Edit { id, content }
//!        caller runs the editor
//!   finish_edit(id, new_content) ──▶ save
//! ```
//!
//! ## Failures
//!
//! A failed operation leaves the list, cursor and selection as they were and
//! sets a single error [`StatusMessage`].
//!
//! ## Encrypted notes
//!
//! Encrypted notes load locked. Unlocking prompts for a password, decrypts
//! into memory and drops the password. Saving an edited encrypted note
//! prompts again; the password is checked against the stored envelope before
//! anything is written.

use crate::clipboard::ClipboardSink;
use crate::config::{AppConfig, ConfigKey};
use crate::error::{Result, XpadError};
use crate::keys::{motion_for, normal_action, Action, Key};
use crate::mode::{ConfigField, Mode, PaneFocus, PasswordPurpose};
use crate::model::{derive_title, Note};
use crate::motion::{CursorPosition, LineBuffer};
use crate::selection::{yank_full, SelectionEngine, SelectionMode};
use crate::store::NoteRepository;
use crate::tasks;
use crate::viewport::{usable_rows, Viewport};
use crate::window::{grid_move, navigable_indices, Direction, GridLayout, GridWindow, ListWindow};
use log::debug;
use serde::Serialize;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Rows of the terminal not available to the note list (borders, heading,
/// status line).
const LIST_CHROME: usize = 6;
const DEFAULT_SIZE: (usize, usize) = (80, 24);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl StatusMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// What the caller must do after a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    None,
    Quit,
    /// Open `content` in the editor, then call [`App::finish_edit`].
    Edit { id: String, content: String },
    /// Open an empty buffer, then call [`App::finish_create`].
    Create,
}

pub struct App<C: ClipboardSink> {
    repo: NoteRepository,
    config: AppConfig,
    config_path: Option<PathBuf>,
    clipboard: C,
    notes: Vec<Note>,
    dir_missing: bool,
    show_hidden: bool,
    filter: String,
    selected: usize,
    focus: PaneFocus,
    mode: Mode,
    cursor: CursorPosition,
    selection: SelectionEngine,
    viewport: Viewport,
    grid: GridLayout,
    size: (usize, usize),
    message: Option<StatusMessage>,
}

impl<C: ClipboardSink> App<C> {
    /// Builds the app and performs the first scan. A missing notes directory
    /// is not an error; it is reported through [`App::dir_missing`].
    pub fn new(repo: NoteRepository, config: AppConfig, clipboard: C) -> Result<Self> {
        let mut app = Self {
            repo,
            config,
            config_path: None,
            clipboard,
            notes: Vec::new(),
            dir_missing: false,
            show_hidden: false,
            filter: String::new(),
            selected: 0,
            focus: PaneFocus::default(),
            mode: Mode::default(),
            cursor: CursorPosition::default(),
            selection: SelectionEngine::new(),
            viewport: Viewport::new(),
            grid: GridLayout::default(),
            size: DEFAULT_SIZE,
            message: None,
        };
        app.refresh()?;
        Ok(app)
    }

    /// Where config edits made in the app are persisted.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn resize(&mut self, columns: usize, rows: usize) {
        self.size = (columns, rows);
        self.follow_cursor();
    }

    pub fn dir(&self) -> &Path {
        self.repo.dir()
    }

    pub fn dir_missing(&self) -> bool {
        self.dir_missing
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn focus(&self) -> PaneFocus {
        self.focus
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    pub fn selection(&self) -> &SelectionEngine {
        &self.selection
    }

    pub fn scroll_offset(&self) -> usize {
        self.viewport.offset()
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Notes passing the current filter, in list order.
    pub fn visible_notes(&self) -> Vec<&Note> {
        let query = self.filter.to_lowercase();
        self.notes
            .iter()
            .filter(|n| {
                query.is_empty()
                    || n.title.to_lowercase().contains(&query)
                    || n.content().to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn current_note(&self) -> Option<&Note> {
        self.visible_notes().get(self.selected).copied()
    }

    pub fn list_window(&self) -> ListWindow {
        let height = self.size.1.saturating_sub(LIST_CHROME);
        ListWindow::compute(self.visible_notes().len(), self.selected, height)
    }

    /// Grid geometry while browsing the grid.
    pub fn grid_window(&self) -> Option<GridWindow> {
        let Mode::GridBrowsing { index } = self.mode else {
            return None;
        };
        let total = self.grid_notes().len();
        Some(self.grid.window(self.size.0, self.size.1, total, index))
    }

    /// The notes the grid shows: visible ones that are not hidden.
    pub fn grid_notes(&self) -> Vec<&Note> {
        let visible = self.visible_notes();
        navigable_indices(visible.iter().copied())
            .into_iter()
            .map(|i| visible[i])
            .collect()
    }

    /// Handles one key. Errors become the status message and leave state as
    /// it was.
    pub fn handle_key(&mut self, key: Key) -> Outcome {
        match self.dispatch(key) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.message = Some(StatusMessage::error(e.to_string()));
                Outcome::None
            }
        }
    }

    fn dispatch(&mut self, key: Key) -> Result<Outcome> {
        match std::mem::take(&mut self.mode) {
            Mode::Normal => self.on_normal(key),
            Mode::Help => Ok(Outcome::None),
            Mode::Selecting { mode } => {
                self.on_selecting(mode, key);
                Ok(Outcome::None)
            }
            Mode::Filtering { query } => {
                self.on_filtering(query, key);
                Ok(Outcome::None)
            }
            Mode::ConfirmingDelete { id } => self.on_confirming_delete(id, key),
            Mode::EditingConfig {
                field,
                editor,
                notes_dir,
            } => self.on_editing_config(field, editor, notes_dir, key),
            Mode::GridBrowsing { index } => {
                self.on_grid(index, key);
                Ok(Outcome::None)
            }
            Mode::EnteringPassword { purpose, input } => self.on_password(purpose, input, key),
        }
    }

    fn on_normal(&mut self, key: Key) -> Result<Outcome> {
        if key == Key::Esc {
            self.message = None;
            return Ok(Outcome::None);
        }
        let Some(action) = normal_action(key, self.focus) else {
            return Ok(Outcome::None);
        };

        match action {
            Action::Quit => return Ok(Outcome::Quit),
            Action::Help => self.mode = Mode::Help,
            Action::ListUp => self.select(self.selected.saturating_sub(1)),
            Action::ListDown => self.select(self.selected + 1),
            Action::FocusList => self.focus = PaneFocus::List,
            Action::FocusNote => self.focus = PaneFocus::Note,
            Action::Move(motion) => {
                if let Some(buffer) = self.buffer() {
                    self.cursor = buffer.apply(self.cursor, motion);
                    self.follow_cursor();
                }
            }
            Action::StartLineSelection => self.start_selection(SelectionMode::Line)?,
            Action::StartCharSelection => self.start_selection(SelectionMode::Char)?,
            Action::YankNote => {
                let note = self.require_unlocked()?;
                let content = note.content().to_string();
                let copied = yank_full(&content, &mut self.clipboard);
                self.report_copy(copied, "Copied note to clipboard");
            }
            Action::Edit => {
                let note = self.require_unlocked()?;
                return Ok(Outcome::Edit {
                    id: note.id.clone(),
                    content: note.content().to_string(),
                });
            }
            Action::Create => return Ok(Outcome::Create),
            Action::Delete => {
                let id = self.require_note()?.id.clone();
                self.mode = Mode::ConfirmingDelete { id };
            }
            Action::ToggleHidden => {
                let note = self.require_note()?.clone();
                self.repo.set_hidden(&note, !note.hidden)?;
                self.refresh()?;
                let verb = if note.hidden { "Unhid" } else { "Hid" };
                self.message = Some(StatusMessage::success(format!("{} \"{}\"", verb, note.title)));
            }
            Action::ToggleShowHidden => {
                self.show_hidden = !self.show_hidden;
                self.refresh()?;
            }
            Action::Filter => {
                self.mode = Mode::Filtering {
                    query: self.filter.clone(),
                }
            }
            Action::Grid => self.open_grid(),
            Action::Config => {
                self.mode = Mode::EditingConfig {
                    field: ConfigField::Editor,
                    editor: self.config.editor.clone().unwrap_or_default(),
                    notes_dir: self.config.notes_dir.clone().unwrap_or_default(),
                }
            }
            Action::Unlock => {
                let note = self.require_note()?;
                let (id, locked) = (note.id.clone(), note.is_locked());
                if locked {
                    self.mode = Mode::EnteringPassword {
                        purpose: PasswordPurpose::Unlock { id },
                        input: String::new(),
                    };
                } else {
                    self.message = Some(StatusMessage::info("Note is not locked"));
                }
            }
            Action::ToggleTask => {
                let note = self.require_unlocked()?;
                let id = note.id.clone();
                match tasks::toggle_in(note.content(), self.cursor.line) {
                    Some(content) => self.save_content(&id, content)?,
                    None => self.message = Some(StatusMessage::info("Not a task line")),
                }
            }
        }
        Ok(Outcome::None)
    }

    fn start_selection(&mut self, mode: SelectionMode) -> Result<()> {
        self.require_unlocked()?;
        self.selection.start(mode, self.cursor);
        self.focus = PaneFocus::Note;
        self.mode = Mode::Selecting { mode };
        Ok(())
    }

    fn on_selecting(&mut self, mode: SelectionMode, key: Key) {
        let Some(buffer) = self.buffer() else {
            self.selection.cancel();
            return;
        };
        match key {
            Key::Esc => {
                self.selection.cancel();
                return;
            }
            Key::Char('y') => {
                if let Some(cursor) = self.selection.cursor() {
                    self.cursor = buffer.clamp(cursor);
                }
                let text = self.selection.selected_text(&buffer);
                self.selection.cancel();
                let copied = text.is_some_and(|text| self.clipboard.copy(&text));
                self.report_copy(copied, "Copied selection to clipboard");
                return;
            }
            key => {
                if let Some(motion) = motion_for(key) {
                    self.selection.extend(&buffer, motion);
                    self.follow_cursor();
                }
            }
        }
        self.mode = Mode::Selecting { mode };
    }

    fn on_filtering(&mut self, mut query: String, key: Key) {
        match key {
            Key::Esc => {
                self.set_filter(String::new());
                return;
            }
            Key::Enter => return,
            Key::Backspace => {
                query.pop();
            }
            Key::Char(c) => query.push(c),
            _ => {}
        }
        self.set_filter(query.clone());
        self.mode = Mode::Filtering { query };
    }

    fn on_confirming_delete(&mut self, id: String, key: Key) -> Result<Outcome> {
        match key {
            Key::Char('y') | Key::Enter => {
                let note = self
                    .notes
                    .iter()
                    .find(|n| n.id == id)
                    .cloned()
                    .ok_or(XpadError::OwnerNotFound(id))?;
                self.repo.remove(&note)?;
                self.refresh()?;
                self.message = Some(StatusMessage::success(format!("Deleted \"{}\"", note.title)));
            }
            Key::Char('n') | Key::Esc => {}
            _ => self.mode = Mode::ConfirmingDelete { id },
        }
        Ok(Outcome::None)
    }

    fn on_editing_config(
        &mut self,
        mut field: ConfigField,
        mut editor: String,
        mut notes_dir: String,
        key: Key,
    ) -> Result<Outcome> {
        let target = match field {
            ConfigField::Editor => &mut editor,
            ConfigField::NotesDir => &mut notes_dir,
        };
        match key {
            Key::Esc => return Ok(Outcome::None),
            Key::Enter => {
                self.apply_config(&editor, &notes_dir)?;
                return Ok(Outcome::None);
            }
            Key::Tab | Key::Down | Key::Up => field = field.next(),
            Key::Backspace => {
                target.pop();
            }
            Key::Char(c) => target.push(c),
            _ => {}
        }
        self.mode = Mode::EditingConfig {
            field,
            editor,
            notes_dir,
        };
        Ok(Outcome::None)
    }

    fn apply_config(&mut self, editor: &str, notes_dir: &str) -> Result<()> {
        let mut updated = self.config.clone();
        updated.set(ConfigKey::Editor, editor);
        updated.set(ConfigKey::NotesDir, notes_dir);

        if let Some(path) = &self.config_path {
            let mut on_disk = AppConfig::load_file(path)?;
            on_disk.set(ConfigKey::Editor, editor);
            on_disk.set(ConfigKey::NotesDir, notes_dir);
            on_disk.save(path)?;
        }

        let dir_changed = updated.notes_dir != self.config.notes_dir;
        self.config = updated;
        if dir_changed {
            self.repo = NoteRepository::new(self.config.notes_dir());
            self.selected = 0;
            self.reset_note_state();
            self.refresh()?;
        }
        self.message = Some(StatusMessage::success("Configuration saved"));
        Ok(())
    }

    fn open_grid(&mut self) {
        let grid = self.grid_notes();
        if grid.is_empty() {
            self.message = Some(StatusMessage::info("No notes to show in the grid"));
            return;
        }
        let current = self.current_note().map(|n| n.id.clone());
        let index = grid
            .iter()
            .position(|n| Some(&n.id) == current.as_ref())
            .unwrap_or(0);
        self.mode = Mode::GridBrowsing { index };
    }

    fn on_grid(&mut self, index: usize, key: Key) {
        let grid: Vec<String> = self.grid_notes().iter().map(|n| n.id.clone()).collect();
        let columns = self.grid.columns(self.size.0);
        let direction = match key {
            Key::Esc | Key::Char('g') | Key::Char('q') => return,
            Key::Enter => {
                if let Some(id) = grid.get(index) {
                    let id = id.clone();
                    self.select_id(&id);
                    self.focus = PaneFocus::Note;
                }
                return;
            }
            Key::Char('h') | Key::Left => Some(Direction::Left),
            Key::Char('l') | Key::Right => Some(Direction::Right),
            Key::Char('k') | Key::Up => Some(Direction::Up),
            Key::Char('j') | Key::Down => Some(Direction::Down),
            _ => None,
        };
        let index = direction
            .and_then(|dir| grid_move(grid.len(), columns, index, dir))
            .unwrap_or(index);
        self.mode = Mode::GridBrowsing { index };
    }

    fn on_password(&mut self, purpose: PasswordPurpose, input: String, key: Key) -> Result<Outcome> {
        let mut input = Zeroizing::new(input);
        match key {
            Key::Esc => return Ok(Outcome::None),
            Key::Enter => {
                if input.is_empty() {
                    self.message = Some(StatusMessage::warning("Password cannot be empty"));
                    self.mode = Mode::EnteringPassword {
                        purpose,
                        input: String::new(),
                    };
                    return Ok(Outcome::None);
                }
                self.use_password(purpose, &input)?;
                return Ok(Outcome::None);
            }
            Key::Backspace => {
                input.pop();
            }
            Key::Char(c) => input.push(c),
            _ => {}
        }
        self.mode = Mode::EnteringPassword {
            purpose,
            input: std::mem::take(&mut *input),
        };
        Ok(Outcome::None)
    }

    fn use_password(&mut self, purpose: PasswordPurpose, password: &str) -> Result<()> {
        let note = self.note_by_id(purpose.id())?.clone();
        match purpose {
            PasswordPurpose::Unlock { .. } => {
                let unlocked = self.repo.decrypt(&note, password)?;
                self.replace_note(unlocked);
                self.reset_note_state();
                self.message = Some(StatusMessage::success(format!("Unlocked \"{}\"", note.title)));
            }
            PasswordPurpose::Save { id, content } => {
                // A wrong password must not silently re-key the note. The
                // pending edit stays in the prompt for another attempt.
                if let Err(e) = self.repo.decrypt(&note, password) {
                    if matches!(e, XpadError::Authentication) {
                        self.mode = Mode::EnteringPassword {
                            purpose: PasswordPurpose::Save { id, content },
                            input: String::new(),
                        };
                    }
                    return Err(e);
                }
                let mut updated = note;
                updated.set_content(content);
                self.repo.save(&updated, Some(password))?;
                self.commit_saved(updated)?;
            }
        }
        Ok(())
    }

    /// Completes an [`Outcome::Edit`] with the editor's result.
    pub fn finish_edit(&mut self, id: &str, content: String) {
        let unchanged = self.note_by_id(id).map(|note| note.content() == content);
        let result = match unchanged {
            Ok(true) => {
                self.message = Some(StatusMessage::info("No changes"));
                Ok(())
            }
            Ok(false) => self.save_content(id, content),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            self.message = Some(StatusMessage::error(e.to_string()));
        }
    }

    /// Completes an [`Outcome::Create`]. Blank content creates nothing.
    pub fn finish_create(&mut self, content: String) {
        if content.trim().is_empty() {
            self.message = Some(StatusMessage::info("Empty note discarded"));
            return;
        }
        let title = derive_title(&content, "");
        let result = self
            .repo
            .create(Some(&title), &content, None)
            .and_then(|note| {
                self.refresh()?;
                self.select_id(&note.id);
                Ok(note)
            });
        match result {
            Ok(note) => {
                self.message = Some(StatusMessage::success(format!("Created \"{}\"", note.title)))
            }
            Err(e) => self.message = Some(StatusMessage::error(e.to_string())),
        }
    }

    /// Every content change ends up here and in [`NoteRepository::save`].
    fn save_content(&mut self, id: &str, content: String) -> Result<()> {
        let note = self.note_by_id(id)?.clone();
        if note.encrypted {
            self.mode = Mode::EnteringPassword {
                purpose: PasswordPurpose::Save {
                    id: note.id,
                    content,
                },
                input: String::new(),
            };
            return Ok(());
        }
        let mut updated = note;
        updated.set_content(content);
        self.repo.save(&updated, None)?;
        self.commit_saved(updated)
    }

    fn commit_saved(&mut self, note: Note) -> Result<()> {
        let id = note.id.clone();
        let title = note.title.clone();
        self.replace_note(note);
        self.refresh()?;
        self.select_id(&id);
        if let Some(buffer) = self.buffer() {
            self.cursor = buffer.clamp(self.cursor);
        }
        self.follow_cursor();
        self.message = Some(StatusMessage::success(format!("Saved \"{}\"", title)));
        Ok(())
    }

    /// Rescans the directory. Unlocked bodies survive the rescan so the user
    /// is not asked for a password again.
    pub fn refresh(&mut self) -> Result<()> {
        let keep = self.current_note().map(|n| n.id.clone());
        match self.repo.list(self.show_hidden) {
            Ok(mut fresh) => {
                for note in fresh.iter_mut().filter(|n| n.is_locked()) {
                    if let Some(prev) = self.notes.iter().find(|p| p.id == note.id && !p.is_locked()) {
                        note.body = prev.body.clone();
                    }
                }
                self.notes = fresh;
                self.dir_missing = false;
            }
            Err(XpadError::NotFound(dir)) => {
                debug!("notes directory {} is missing", dir.display());
                self.notes.clear();
                self.dir_missing = true;
            }
            Err(e) => return Err(e),
        }
        match keep {
            Some(id) => self.select_id(&id),
            None => self.select(self.selected),
        }
        Ok(())
    }

    fn set_filter(&mut self, query: String) {
        if query != self.filter {
            self.filter = query;
            self.selected = 0;
            self.reset_note_state();
        }
    }

    /// Selects position `index` (clamped) of the visible list. Moving to a
    /// different note resets cursor, selection and scroll.
    fn select(&mut self, index: usize) {
        let before = self.current_note().map(|n| n.id.clone());
        let len = self.visible_notes().len();
        self.selected = index.min(len.saturating_sub(1));
        let after = self.current_note().map(|n| n.id.clone());
        if before != after {
            self.reset_note_state();
        }
    }

    fn select_id(&mut self, id: &str) {
        let position = self.visible_notes().iter().position(|n| n.id == id);
        match position {
            Some(pos) if pos == self.selected => {}
            Some(pos) => {
                self.selected = pos;
                self.reset_note_state();
            }
            None => {
                self.selected = 0;
                self.reset_note_state();
                self.select(0);
            }
        }
    }

    fn reset_note_state(&mut self) {
        self.cursor = CursorPosition::default();
        self.selection.cancel();
        self.viewport.reset();
    }

    fn follow_cursor(&mut self) {
        let Some(buffer) = self.buffer() else {
            return;
        };
        let target = self.selection.cursor().unwrap_or(self.cursor);
        let height = usable_rows(self.size.1);
        self.viewport.follow(buffer.line_count(), height, target.line);
    }

    fn buffer(&self) -> Option<LineBuffer> {
        self.current_note()
            .filter(|n| !n.is_locked())
            .map(|n| LineBuffer::new(n.content()))
    }

    fn require_note(&self) -> Result<&Note> {
        self.current_note().ok_or(XpadError::NoSelection)
    }

    fn require_unlocked(&self) -> Result<&Note> {
        let note = self.require_note()?;
        if note.is_locked() {
            return Err(XpadError::NoteLocked(note.id.clone()));
        }
        Ok(note)
    }

    fn note_by_id(&self, id: &str) -> Result<&Note> {
        self.notes
            .iter()
            .find(|n| n.id == id)
            .ok_or_else(|| XpadError::OwnerNotFound(id.to_string()))
    }

    fn replace_note(&mut self, note: Note) {
        if let Some(slot) = self.notes.iter_mut().find(|n| n.id == note.id) {
            *slot = note;
        }
    }

    fn report_copy(&mut self, copied: bool, success: &str) {
        self.message = Some(if copied {
            StatusMessage::success(success)
        } else {
            StatusMessage::warning("Clipboard unavailable in this terminal")
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn setup(notes: &[&str]) -> (TempDir, App<Vec<String>>) {
        let dir = tempdir().unwrap();
        let repo = NoteRepository::new(dir.path());
        for content in notes {
            repo.create(None, content, None).unwrap();
        }
        let app = App::new(repo, AppConfig::default(), Vec::new()).unwrap();
        (dir, app)
    }

    fn press(app: &mut App<Vec<String>>, keys: &str) {
        for c in keys.chars() {
            app.handle_key(Key::Char(c));
        }
    }

    #[test]
    fn missing_directory_is_reported_not_fatal() {
        let dir = tempdir().unwrap();
        let repo = NoteRepository::new(dir.path().join("absent"));
        let app = App::new(repo, AppConfig::default(), Vec::<String>::new()).unwrap();
        assert!(app.dir_missing());
        assert!(app.current_note().is_none());
    }

    #[test]
    fn list_movement_resets_cursor_and_selection() {
        let (_dir, mut app) = setup(&["alpha\nsecond line", "beta"]);
        press(&mut app, "lj");
        assert_eq!(app.cursor(), CursorPosition::new(1, 0));
        press(&mut app, "V");
        assert!(app.selection().is_active());

        app.handle_key(Key::Esc);
        press(&mut app, "hj");
        assert_eq!(app.current_note().unwrap().title, "beta");
        assert_eq!(app.cursor(), CursorPosition::default());
        assert!(!app.selection().is_active());
    }

    #[test]
    fn line_selection_yanks_to_clipboard() {
        let (_dir, mut app) = setup(&["Line1\nLine2\nLine3"]);
        press(&mut app, "ljVjy");
        assert_eq!(app.clipboard(), &vec!["Line2\nLine3".to_string()]);
        assert!(app.mode().is_normal());
        assert!(!app.selection().is_active());
    }

    #[test]
    fn char_selection_yanks_exclusive_range() {
        let (_dir, mut app) = setup(&["hello world"]);
        press(&mut app, "l");
        app.handle_key(Key::Right);
        app.handle_key(Key::Right);
        press(&mut app, "vllly");
        assert_eq!(app.clipboard(), &vec!["llo".to_string()]);
    }

    #[test]
    fn full_yank_copies_whole_note() {
        let (_dir, mut app) = setup(&["one\ntwo"]);
        press(&mut app, "Y");
        assert_eq!(app.clipboard(), &vec!["one\ntwo".to_string()]);
        assert_eq!(app.message().unwrap().level, MessageLevel::Success);
    }

    #[test]
    fn edit_round_trip_saves_through_repository() {
        let (dir, mut app) = setup(&["draft"]);
        let outcome = app.handle_key(Key::Char('e'));
        let Outcome::Edit { id, content } = outcome else {
            panic!("expected edit outcome, got {:?}", outcome);
        };
        assert_eq!(content, "draft");

        app.finish_edit(&id, "final\nbody".into());
        assert_eq!(app.current_note().unwrap().title, "final");
        assert_eq!(fs::read_to_string(dir.path().join(&id)).unwrap(), "final\nbody");
    }

    #[test]
    fn unchanged_edit_writes_nothing() {
        let (_dir, mut app) = setup(&["same"]);
        let id = app.current_note().unwrap().id.clone();
        app.finish_edit(&id, "same".into());
        assert_eq!(app.message().unwrap().content, "No changes");
    }

    #[test]
    fn create_selects_the_new_note() {
        let (_dir, mut app) = setup(&["aaa", "ccc"]);
        assert_eq!(app.handle_key(Key::Char('n')), Outcome::Create);
        app.finish_create("bbb\nnew".into());
        assert_eq!(app.visible_notes().len(), 3);
        assert_eq!(app.current_note().unwrap().title, "bbb");

        app.finish_create("  \n".into());
        assert_eq!(app.visible_notes().len(), 3);
    }

    #[test]
    fn delete_requires_confirmation() {
        let (_dir, mut app) = setup(&["keep", "zap"]);
        press(&mut app, "jd");
        assert!(matches!(app.mode(), Mode::ConfirmingDelete { .. }));
        app.handle_key(Key::Esc);
        assert_eq!(app.visible_notes().len(), 2);

        press(&mut app, "dy");
        assert_eq!(app.visible_notes().len(), 1);
        assert_eq!(app.current_note().unwrap().title, "keep");
    }

    #[test]
    fn hidden_notes_toggle_with_show_hidden() {
        let (_dir, mut app) = setup(&["a", "b"]);
        press(&mut app, ".");
        assert_eq!(app.visible_notes().len(), 1);
        press(&mut app, "a");
        assert_eq!(app.visible_notes().len(), 2);
        assert!(app.visible_notes().iter().any(|n| n.hidden));
    }

    #[test]
    fn filter_narrows_and_escape_clears() {
        let (_dir, mut app) = setup(&["groceries", "meeting notes", "gym"]);
        press(&mut app, "/g");
        assert_eq!(app.visible_notes().len(), 3);
        press(&mut app, "y");
        assert_eq!(app.visible_notes().len(), 1);
        app.handle_key(Key::Enter);
        assert!(app.mode().is_normal());
        assert_eq!(app.filter(), "gy");

        press(&mut app, "/");
        app.handle_key(Key::Esc);
        assert_eq!(app.filter(), "");
        assert_eq!(app.visible_notes().len(), 3);
    }

    #[test]
    fn task_toggle_persists() {
        let (dir, mut app) = setup(&["todo\n- [ ] milk"]);
        let id = app.current_note().unwrap().id.clone();
        press(&mut app, "ljx");
        assert_eq!(
            fs::read_to_string(dir.path().join(&id)).unwrap(),
            "todo\n- [x] milk"
        );
        assert_eq!(app.cursor(), CursorPosition::new(1, 0));

        press(&mut app, "kx");
        assert_eq!(app.message().unwrap().content, "Not a task line");
    }

    #[test]
    fn grid_skips_hidden_notes_and_selects_on_enter() {
        let (_dir, mut app) = setup(&["a", "b", "c"]);
        press(&mut app, "j.a");
        assert_eq!(app.visible_notes().len(), 3);
        assert_eq!(app.grid_notes().len(), 2);

        app.resize(94, 24);
        press(&mut app, "g");
        assert_eq!(app.mode(), &Mode::GridBrowsing { index: 0 });
        press(&mut app, "l");
        assert_eq!(app.mode(), &Mode::GridBrowsing { index: 1 });
        press(&mut app, "l");
        assert_eq!(app.mode(), &Mode::GridBrowsing { index: 1 });
        app.handle_key(Key::Enter);
        assert_eq!(app.current_note().unwrap().title, "c");
    }

    #[test]
    fn unlock_with_wrong_password_keeps_note_locked() {
        let dir = tempdir().unwrap();
        let repo = NoteRepository::new(dir.path());
        repo.create(Some("secret"), "secret\nbody", Some("pw")).unwrap();
        let mut app = App::new(repo, AppConfig::default(), Vec::<String>::new()).unwrap();
        assert!(app.current_note().unwrap().is_locked());

        app.handle_key(Key::Char('e'));
        assert_eq!(app.message().unwrap().level, MessageLevel::Error);

        press(&mut app, "unope");
        app.handle_key(Key::Enter);
        assert!(app.current_note().unwrap().is_locked());
        assert_eq!(app.message().unwrap().level, MessageLevel::Error);

        press(&mut app, "upw");
        app.handle_key(Key::Enter);
        assert_eq!(app.current_note().unwrap().content(), "secret\nbody");
        assert!(!matches!(app.mode(), Mode::EnteringPassword { .. }));
    }

    #[test]
    fn editing_an_encrypted_note_prompts_before_saving() {
        let dir = tempdir().unwrap();
        let repo = NoteRepository::new(dir.path());
        let created = repo.create(Some("secret"), "secret", Some("pw")).unwrap();
        let mut app = App::new(repo, AppConfig::default(), Vec::<String>::new()).unwrap();
        press(&mut app, "upw");
        app.handle_key(Key::Enter);

        app.finish_edit(&created.id, "secret\nmore".into());
        assert!(matches!(app.mode(), Mode::EnteringPassword { .. }));
        press(&mut app, "pw");
        app.handle_key(Key::Enter);

        let raw = fs::read(&created.file_path).unwrap();
        assert_eq!(crate::crypto::decrypt(&raw, "pw").unwrap(), "secret\nmore");
        assert_eq!(app.current_note().unwrap().content(), "secret\nmore");
    }

    #[test]
    fn mistyped_save_password_keeps_the_edit() {
        let dir = tempdir().unwrap();
        let repo = NoteRepository::new(dir.path());
        let created = repo.create(Some("secret"), "secret", Some("pw")).unwrap();
        let mut app = App::new(repo, AppConfig::default(), Vec::<String>::new()).unwrap();
        press(&mut app, "upw");
        app.handle_key(Key::Enter);

        app.finish_edit(&created.id, "secret\nhours of work".into());
        press(&mut app, "typo");
        app.handle_key(Key::Enter);

        assert_eq!(app.message().unwrap().level, MessageLevel::Error);
        match app.mode() {
            Mode::EnteringPassword {
                purpose: PasswordPurpose::Save { content, .. },
                input,
            } => {
                assert_eq!(content, "secret\nhours of work");
                assert!(input.is_empty());
            }
            other => panic!("expected save prompt, got {:?}", other),
        }
        let raw = fs::read(&created.file_path).unwrap();
        assert_eq!(crate::crypto::decrypt(&raw, "pw").unwrap(), "secret");

        press(&mut app, "pw");
        app.handle_key(Key::Enter);
        assert!(app.mode().is_normal());
        let raw = fs::read(&created.file_path).unwrap();
        assert_eq!(crate::crypto::decrypt(&raw, "pw").unwrap(), "secret\nhours of work");
        assert_eq!(app.current_note().unwrap().content(), "secret\nhours of work");
    }

    #[test]
    fn config_edit_switches_directory() {
        let (_dir, mut app) = setup(&["old"]);
        let other = tempdir().unwrap();
        let cfg = tempdir().unwrap();
        let cfg_path = cfg.path().join("xpad-cli.toml");
        app = app.with_config_path(&cfg_path);

        press(&mut app, "c");
        app.handle_key(Key::Tab);
        press(&mut app, other.path().to_str().unwrap());
        app.handle_key(Key::Enter);

        assert_eq!(app.dir(), other.path());
        assert!(app.visible_notes().is_empty());
        let saved = AppConfig::load_file(&cfg_path).unwrap();
        assert_eq!(saved.notes_dir.as_deref(), other.path().to_str());
    }

    #[test]
    fn help_closes_on_any_key() {
        let (_dir, mut app) = setup(&["x"]);
        press(&mut app, "?");
        assert_eq!(app.mode(), &Mode::Help);
        press(&mut app, "q");
        assert!(app.mode().is_normal());
        assert_eq!(app.handle_key(Key::Char('q')), Outcome::Quit);
    }

    #[test]
    fn note_cursor_scrolls_viewport() {
        let content: String = (0..50).map(|i| format!("line {}\n", i)).collect();
        let (_dir, mut app) = setup(&[&content]);
        app.resize(80, 14); // 10 usable rows
        app.handle_key(Key::Char('l'));
        for _ in 0..20 {
            app.handle_key(Key::Char('j'));
        }
        assert_eq!(app.cursor().line, 20);
        // one past the window edge does not scroll yet, see Viewport::follow
        assert_eq!(app.scroll_offset(), 10);
        app.handle_key(Key::Char('j'));
        assert_eq!(app.scroll_offset(), 12);
    }
}
