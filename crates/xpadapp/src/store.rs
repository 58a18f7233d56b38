//! # Note Repository
//!
//! Notes live in a single flat directory shared with the xpad desktop
//! application. Every note is a pair of files:
//!
//! ```text
//! ~/.config/xpad/
//! ├── info-8k2d0q      # metadata, see [`crate::info`]
//! ├── content-4fz81a   # body: UTF-8 text, or an envelope when `encrypted 1`
//! └── ...
//! ```
//!
//! The info file is the source of truth for a note's existence: a content file
//! nobody references is invisible, and an info file whose content file is
//! missing yields an empty note.
//!
//! ## Failure model
//!
//! - **Scans** (`list`) are best effort. Unreadable or malformed info files are
//!   logged at debug level and skipped; only a missing directory is an error.
//! - **Single-note operations** (`create`, `save`, `remove`, `decrypt`, flag
//!   toggles) return one reportable error and never leave partial plaintext
//!   behind.
//!
//! Writes go through a temp file in the same directory followed by a rename,
//! so a crash never leaves a half-written note.
//!
//! There is no locking: the directory is assumed to belong to one session
//! and the next scan simply reflects whatever is on disk.

use crate::crypto;
use crate::error::{Result, XpadError};
use crate::info::{self, KEY_ENCRYPTED, KEY_HIDDEN, KEY_TITLE};
use crate::model::{derive_title, Note, NoteBody, NoteInfo};
use log::{debug, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const INFO_PREFIX: &str = "info-";
const CONTENT_PREFIX: &str = "content-";
const ID_LEN: usize = 6;
const ID_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// `<prefix><6 random chars>`. Collisions are not checked for.
fn random_name(prefix: &str) -> String {
    format!("{}{}", prefix, nanoid::nanoid!(ID_LEN, &ID_ALPHABET))
}

fn flag_value(on: bool) -> &'static str {
    if on {
        "1"
    } else {
        "0"
    }
}

pub struct NoteRepository {
    dir: PathBuf,
}

impl NoteRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    /// Lists notes sorted by title. Hidden notes are skipped unless
    /// `show_hidden` is set.
    pub fn list(&self, show_hidden: bool) -> Result<Vec<Note>> {
        if !self.exists() {
            return Err(XpadError::NotFound(self.dir.clone()));
        }

        let mut notes: Vec<Note> = Vec::new();
        for info_path in self.info_files()? {
            let note = match self.load_from_info(&info_path) {
                Ok(note) => note,
                Err(e) => {
                    debug!("skipping {}: {}", info_path.display(), e);
                    continue;
                }
            };
            if notes.iter().any(|n| n.id == note.id) {
                debug!(
                    "skipping {}: {} is already owned",
                    info_path.display(),
                    note.id
                );
                continue;
            }
            notes.push(note);
        }

        notes.retain(|n| show_hidden || !n.hidden);
        notes.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(notes)
    }

    /// Creates a content/info pair. With a password the body is stored as an
    /// envelope and the title is recorded in the info file.
    pub fn create(
        &self,
        title: Option<&str>,
        content: &str,
        password: Option<&str>,
    ) -> Result<Note> {
        fs::create_dir_all(&self.dir)?;

        let id = random_name(CONTENT_PREFIX);
        let info_name = random_name(INFO_PREFIX);
        let file_path = self.dir.join(&id);

        let body = if content.is_empty() {
            title.unwrap_or("").to_string()
        } else {
            content.to_string()
        };
        let encrypted = password.is_some();
        let note_title = match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) if encrypted => t.to_string(),
            _ => derive_title(&body, &id),
        };

        match password {
            Some(pw) => write_atomic(&file_path, &crypto::encrypt(&body, pw)?)?,
            None => write_atomic(&file_path, body.as_bytes())?,
        }

        let mut lines = vec![format!("{} 0", KEY_HIDDEN), format!("content {}", id)];
        if encrypted {
            lines.push(format!("{} 1", KEY_ENCRYPTED));
            lines.push(format!("{} {}", KEY_TITLE, note_title));
        }
        if let Err(e) = write_atomic(&self.dir.join(&info_name), lines.join("\n").as_bytes()) {
            let _ = fs::remove_file(&file_path);
            return Err(e);
        }
        info!("created note {} ({})", id, info_name);

        Ok(Note {
            title: note_title.clone(),
            body: NoteBody::Text(body),
            file_path,
            hidden: false,
            encrypted,
            info: NoteInfo {
                encrypted,
                title: encrypted.then_some(note_title),
                content_file: id.clone(),
                ..NoteInfo::default()
            },
            id,
        })
    }

    /// Rewrites the content file: plaintext, or a fresh envelope when the note
    /// is encrypted. A locked body is never written.
    pub fn save(&self, note: &Note, password: Option<&str>) -> Result<()> {
        let text = match &note.body {
            NoteBody::Locked => return Err(XpadError::NoteLocked(note.id.clone())),
            NoteBody::Text(text) => text,
        };

        if note.encrypted {
            let password = password.ok_or(XpadError::PasswordRequired)?;
            write_atomic(&note.file_path, &crypto::encrypt(text, password)?)?;
        } else {
            write_atomic(&note.file_path, text.as_bytes())?;
        }
        info!("saved note {}", note.id);
        Ok(())
    }

    /// Deletes the content file, then the first info file that owns it.
    /// Missing files are not errors, so calling this twice is fine.
    pub fn remove(&self, note: &Note) -> Result<()> {
        remove_if_present(&note.file_path)?;
        if let Some(owner) = self.find_owner(&note.id)? {
            remove_if_present(&owner)?;
        }
        info!("removed note {}", note.id);
        Ok(())
    }

    pub fn set_hidden(&self, note: &Note, hidden: bool) -> Result<()> {
        self.rewrite_info(&note.id, &[(KEY_HIDDEN, flag_value(hidden))])
    }

    pub fn set_encrypted(&self, note: &Note, encrypted: bool) -> Result<()> {
        self.rewrite_info(&note.id, &[(KEY_ENCRYPTED, flag_value(encrypted))])
    }

    /// Reads the envelope from disk and returns an unlocked copy of `note`.
    pub fn decrypt(&self, note: &Note, password: &str) -> Result<Note> {
        let raw = fs::read(&note.file_path)?;
        let plaintext = crypto::decrypt(&raw, password)?;
        let mut unlocked = note.clone();
        unlocked.body = NoteBody::Text(plaintext);
        Ok(unlocked)
    }

    /// Turns an unlocked plaintext note into an encrypted one. The current
    /// title is stored in the info file so listings never need the password.
    pub fn encrypt(&self, note: &mut Note, password: &str) -> Result<()> {
        let text = note
            .body
            .text()
            .ok_or_else(|| XpadError::NoteLocked(note.id.clone()))?;
        let owner = self.owner_of(&note.id)?;
        let envelope = crypto::encrypt(text, password)?;
        self.replace_content(
            note,
            &envelope,
            &owner,
            &[(KEY_ENCRYPTED, "1"), (KEY_TITLE, &note.title)],
        )?;
        note.encrypted = true;
        note.info.encrypted = true;
        note.info.title = Some(note.title.clone());
        Ok(())
    }

    /// Writes an unlocked note back as plaintext and clears its flag.
    pub fn remove_encryption(&self, note: &mut Note) -> Result<()> {
        let text = note
            .body
            .text()
            .ok_or_else(|| XpadError::NoteLocked(note.id.clone()))?
            .to_string();
        let owner = self.owner_of(&note.id)?;
        self.replace_content(note, text.as_bytes(), &owner, &[(KEY_ENCRYPTED, "0")])?;
        note.encrypted = false;
        note.info.encrypted = false;
        note.title = derive_title(&text, &note.id);
        Ok(())
    }

    /// Re-reads a single note from disk.
    pub fn reload(&self, id: &str) -> Result<Note> {
        let owner = self
            .find_owner(id)?
            .ok_or_else(|| XpadError::OwnerNotFound(id.to_string()))?;
        self.load_from_info(&owner)
    }

    fn info_files(&self) -> Result<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(INFO_PREFIX))
                    && path.is_file()
            })
            .collect();
        paths.sort();
        Ok(paths)
    }

    fn find_owner(&self, id: &str) -> Result<Option<PathBuf>> {
        if !self.exists() {
            return Ok(None);
        }
        for path in self.info_files()? {
            let Ok(raw) = fs::read_to_string(&path) else {
                continue;
            };
            if info::content_field(&raw) == Some(id) {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    fn owner_of(&self, id: &str) -> Result<PathBuf> {
        self.find_owner(id)?
            .ok_or_else(|| XpadError::OwnerNotFound(id.to_string()))
    }

    fn rewrite_info(&self, id: &str, fields: &[(&str, &str)]) -> Result<()> {
        let owner = self.owner_of(id)?;
        self.write_info_fields(&owner, fields)?;
        debug!("updated {} for {}", owner.display(), id);
        Ok(())
    }

    fn write_info_fields(&self, owner: &Path, fields: &[(&str, &str)]) -> Result<()> {
        let mut raw = fs::read_to_string(owner)?;
        for (key, value) in fields {
            raw = info::set_field(&raw, key, value);
        }
        write_atomic(owner, raw.as_bytes())
    }

    /// Writes `bytes` as the note's content, then `fields` into its info
    /// file. If the info write fails the previous content is put back, so the
    /// `encrypted` flag never disagrees with what is on disk.
    fn replace_content(
        &self,
        note: &Note,
        bytes: &[u8],
        owner: &Path,
        fields: &[(&str, &str)],
    ) -> Result<()> {
        let previous = fs::read(&note.file_path).ok();
        write_atomic(&note.file_path, bytes)?;
        if let Err(e) = self.write_info_fields(owner, fields) {
            let restored = match &previous {
                Some(old) => write_atomic(&note.file_path, old),
                None => remove_if_present(&note.file_path),
            };
            if let Err(restore_err) = restored {
                warn!("could not restore {}: {}", note.file_path.display(), restore_err);
            }
            return Err(e);
        }
        debug!("updated {} for {}", owner.display(), note.id);
        Ok(())
    }

    fn load_from_info(&self, info_path: &Path) -> Result<Note> {
        let raw = fs::read_to_string(info_path)?;
        let info = info::parse(&raw, info_path)?;
        if info.content_file.contains(['/', '\\']) || info.content_file.starts_with('.') {
            return Err(XpadError::MalformedMetadata(info_path.to_path_buf()));
        }

        let id = info.content_file.clone();
        let file_path = self.dir.join(&id);

        let (title, body) = if info.encrypted {
            let title = info
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| id.clone());
            (title, NoteBody::Locked)
        } else {
            let content = read_content(&file_path);
            (derive_title(&content, &id), NoteBody::Text(content))
        };

        Ok(Note {
            id,
            title,
            body,
            file_path,
            hidden: info.hidden,
            encrypted: info.encrypted,
            info,
        })
    }
}

/// Missing or unreadable content reads as empty.
fn read_content(path: &Path) -> String {
    if !path.is_file() {
        return String::new();
    }
    match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            debug!("unreadable content {}: {}", path.display(), e);
            String::new()
        }
    }
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(XpadError::Io(e)),
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("note");
    let tmp = dir.join(format!(".{}.{}.tmp", name, nanoid::nanoid!(ID_LEN, &ID_ALPHABET)));
    fs::write(&tmp, bytes)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(XpadError::Io(e));
    }
    Ok(())
}
