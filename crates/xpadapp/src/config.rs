//! # Configuration
//!
//! Settings are loaded with [`confique`] in priority order:
//!
//! 1. **Environment variables**: `XPAD_EDITOR`, `XPAD_NOTES_DIR`.
//! 2. **Config file**: `<config dir>/xpad/xpad-cli.toml` (platform config
//!    directory via the `directories` crate).
//! 3. **Defaults**: no editor override, notes in `~/.config/xpad`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `editor` | unset | Command used to edit notes |
//! | `notes_dir` | `~/.config/xpad` | Directory shared with the xpad desktop app |
//!
//! A leading `~` in `notes_dir` expands to the home directory.

use crate::error::{Result, XpadError};
use confique::Config;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "xpad-cli.toml";
const APP_DIR: &str = "xpad";
const DEFAULT_NOTES_DIR: &str = "~/.config/xpad";

#[derive(Config, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Editor command used for `new` and `edit`.
    #[config(env = "XPAD_EDITOR")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Directory holding `info-*` / `content-*` files.
    #[config(env = "XPAD_NOTES_DIR")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_dir: Option<String>,
}

/// The settable keys, as named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Editor,
    NotesDir,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 2] = [ConfigKey::Editor, ConfigKey::NotesDir];

    pub fn name(self) -> &'static str {
        match self {
            ConfigKey::Editor => "editor",
            ConfigKey::NotesDir => "notes_dir",
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        match name.replace('-', "_").as_str() {
            "editor" => Ok(ConfigKey::Editor),
            "notes_dir" | "notesdir" | "dir" => Ok(ConfigKey::NotesDir),
            other => Err(XpadError::Config(format!(
                "unknown key '{}' (expected editor or notes_dir)",
                other
            ))),
        }
    }
}

impl AppConfig {
    /// Loads env overrides on top of `path` (a missing file is fine).
    pub fn load(path: &Path) -> Result<Self> {
        AppConfig::builder()
            .env()
            .file(path)
            .load()
            .map_err(|e| XpadError::Config(e.to_string()))
    }

    /// Loads from the platform location, or env only when no home is known.
    pub fn load_default() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load(&path),
            None => AppConfig::builder()
                .env()
                .load()
                .map_err(|e| XpadError::Config(e.to_string())),
        }
    }

    /// Reads only the file, without env overrides. Used before saving so an
    /// environment variable never leaks into the persisted file.
    pub fn load_file(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(raw) => toml::from_str(&raw).map_err(|e| XpadError::Config(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self).map_err(|e| XpadError::Config(e.to_string()))?;
        fs::write(path, raw)?;
        Ok(())
    }

    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        match key {
            ConfigKey::Editor => self.editor.as_deref(),
            ConfigKey::NotesDir => self.notes_dir.as_deref(),
        }
    }

    /// Sets `key`; a blank value unsets it.
    pub fn set(&mut self, key: ConfigKey, value: &str) {
        let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
        match key {
            ConfigKey::Editor => self.editor = value,
            ConfigKey::NotesDir => self.notes_dir = value,
        }
    }

    pub fn unset(&mut self, key: ConfigKey) {
        self.set(key, "");
    }

    /// The effective notes directory with `~` expanded.
    pub fn notes_dir(&self) -> PathBuf {
        let raw = self.notes_dir.as_deref().unwrap_or(DEFAULT_NOTES_DIR);
        expand_tilde(raw)
    }
}

/// `<config dir>/xpad/xpad-cli.toml`, or `None` without a home directory.
pub fn config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.config_dir().join(APP_DIR).join(CONFIG_FILE))
}

/// Expands a leading `~` or `~/`; anything else is returned as is.
pub fn expand_tilde(raw: &str) -> PathBuf {
    let home = || BaseDirs::new().map(|d| d.home_dir().to_path_buf());
    if raw == "~" {
        if let Some(home) = home() {
            return home;
        }
    } else if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = home() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_has_no_overrides() {
        let config = AppConfig::default();
        assert_eq!(config.editor, None);
        assert_eq!(config.notes_dir, None);
        assert!(config.notes_dir().ends_with(".config/xpad"));
    }

    #[test]
    fn explicit_dir_is_kept() {
        let config = AppConfig {
            notes_dir: Some("/tmp/notes".into()),
            ..Default::default()
        };
        assert_eq!(config.notes_dir(), PathBuf::from("/tmp/notes"));
    }

    #[test]
    fn tilde_expands_to_home() {
        let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) else {
            return;
        };
        assert_eq!(expand_tilde("~"), home);
        assert_eq!(expand_tilde("~/notes"), home.join("notes"));
        assert_eq!(expand_tilde("~other"), PathBuf::from("~other"));
        assert_eq!(expand_tilde("rel/~"), PathBuf::from("rel/~"));
    }

    #[test]
    fn set_and_unset() {
        let mut config = AppConfig::default();
        config.set(ConfigKey::Editor, "  nano ");
        assert_eq!(config.get(ConfigKey::Editor), Some("nano"));
        config.set(ConfigKey::Editor, "   ");
        assert_eq!(config.editor, None);
        config.set(ConfigKey::NotesDir, "/x");
        config.unset(ConfigKey::NotesDir);
        assert_eq!(config.notes_dir, None);
    }

    #[test]
    fn keys_parse_with_aliases() {
        assert_eq!(ConfigKey::parse("editor").unwrap(), ConfigKey::Editor);
        assert_eq!(ConfigKey::parse("notes-dir").unwrap(), ConfigKey::NotesDir);
        assert!(ConfigKey::parse("font").is_err());
    }

    #[test]
    fn save_then_read_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = AppConfig {
            editor: Some("hx".into()),
            notes_dir: None,
        };
        config.save(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("editor = \"hx\""));
        assert!(!raw.contains("notes_dir"));
        assert_eq!(AppConfig::load_file(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_reads_as_default() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
