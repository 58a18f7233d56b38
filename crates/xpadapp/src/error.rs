use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XpadError {
    #[error("Notes directory not found: {0} (create it with `mkdir -p` or configure another one)")]
    NotFound(PathBuf),

    #[error("No info file references note {0}")]
    OwnerNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decryption failed: incorrect password or corrupted data")]
    Authentication,

    #[error("Encryption failed")]
    Encryption,

    #[error("Editor '{0}' not found on PATH. Set $EDITOR or pass --editor <command>.")]
    EditorNotFound(String),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Info file {0} does not name a content file")]
    MalformedMetadata(PathBuf),

    #[error("Note {0} is locked; unlock it first")]
    NoteLocked(String),

    #[error("No note at index {0} (there are {1})")]
    InvalidIndex(usize, usize),

    #[error("Line {0} is past the end of the note ({1} lines)")]
    InvalidLine(usize, usize),

    #[error("No note selected")]
    NoSelection,

    #[error("A password is required for encrypted notes")]
    PasswordRequired,

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, XpadError>;
