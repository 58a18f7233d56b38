//! The interaction mode of the app.
//!
//! Exactly one mode is active at a time, so combinations such as "filtering
//! while confirming a delete" cannot be represented.

use crate::selection::SelectionMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaneFocus {
    #[default]
    List,
    Note,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigField {
    #[default]
    Editor,
    NotesDir,
}

impl ConfigField {
    pub fn next(self) -> Self {
        match self {
            ConfigField::Editor => ConfigField::NotesDir,
            ConfigField::NotesDir => ConfigField::Editor,
        }
    }
}

/// What a password prompt is for. The password itself lives only in the
/// prompt input and is dropped once used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordPurpose {
    /// Decrypt the note for this session.
    Unlock { id: String },
    /// Re-encrypt edited content for an encrypted note.
    Save { id: String, content: String },
}

impl PasswordPurpose {
    pub fn id(&self) -> &str {
        match self {
            PasswordPurpose::Unlock { id } | PasswordPurpose::Save { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Selecting {
        mode: SelectionMode,
    },
    Filtering {
        query: String,
    },
    ConfirmingDelete {
        id: String,
    },
    EditingConfig {
        field: ConfigField,
        editor: String,
        notes_dir: String,
    },
    /// `index` is a position among the visible, non-hidden notes.
    GridBrowsing {
        index: usize,
    },
    EnteringPassword {
        purpose: PasswordPurpose,
        input: String,
    },
    Help,
}

impl Mode {
    /// Short label for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Selecting {
                mode: SelectionMode::Line,
            } => "V-LINE",
            Mode::Selecting {
                mode: SelectionMode::Char,
            } => "VISUAL",
            Mode::Filtering { .. } => "FILTER",
            Mode::ConfirmingDelete { .. } => "DELETE?",
            Mode::EditingConfig { .. } => "CONFIG",
            Mode::GridBrowsing { .. } => "GRID",
            Mode::EnteringPassword { .. } => "PASSWORD",
            Mode::Help => "HELP",
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, Mode::Normal)
    }
}
