use serde::Serialize;
use std::path::PathBuf;

/// Metadata parsed from an `info-*` file.
///
/// Everything except `content`, `hidden` and `encrypted` is carried through
/// untouched for the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteInfo {
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub follow_font: Option<bool>,
    pub follow_color: Option<bool>,
    pub sticky: Option<bool>,
    pub hidden: bool,
    pub encrypted: bool,
    pub title: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub font: Option<String>,
    /// Name of the content file this info file owns.
    pub content_file: String,
}

/// The body of a note as held in memory.
///
/// An encrypted note is listed as `Locked`; it only becomes `Text` after a
/// successful decrypt, so a placeholder can never reach the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteBody {
    Locked,
    Text(String),
}

impl NoteBody {
    pub fn text(&self) -> Option<&str> {
        match self {
            NoteBody::Locked => None,
            NoteBody::Text(s) => Some(s),
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, NoteBody::Locked)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Content file name, e.g. `content-a1b2c3`.
    pub id: String,
    pub title: String,
    pub body: NoteBody,
    pub file_path: PathBuf,
    pub hidden: bool,
    pub encrypted: bool,
    pub info: NoteInfo,
}

impl Note {
    /// Note content, or `""` while locked.
    pub fn content(&self) -> &str {
        self.body.text().unwrap_or("")
    }

    pub fn is_locked(&self) -> bool {
        self.body.is_locked()
    }

    /// Replace the in-memory body. Persist with `NoteRepository::save`.
    pub fn set_content(&mut self, content: String) {
        if !self.encrypted {
            self.title = derive_title(&content, &self.id);
        }
        self.body = NoteBody::Text(content);
    }
}

/// First line of the content, trimmed; falls back to the content id.
pub fn derive_title(content: &str, id: &str) -> String {
    let first = content.split('\n').next().unwrap_or("");
    let first = first.trim();
    if first.is_empty() {
        id.to_string()
    } else {
        first.to_string()
    }
}
