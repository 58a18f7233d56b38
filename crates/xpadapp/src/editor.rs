//! External editor invocation.
//!
//! The editor is resolved in this order: command-line flag, config, `$EDITOR`,
//! `$VISUAL`, then `vi`. The value may carry arguments (`code --wait`); the
//! program part must exist on `PATH`, or be a path to an existing file,
//! before anything is spawned.

use crate::error::{Result, XpadError};
use log::debug;
use std::env;
use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

const FALLBACK_EDITOR: &str = "vi";
const TEMP_SUFFIX: &str = ".md";

/// Picks the editor command from explicit settings, then the environment.
pub fn resolve_editor(cli: Option<&str>, config: Option<&str>) -> String {
    pick_editor(
        cli,
        config,
        env::var("EDITOR").ok().as_deref(),
        env::var("VISUAL").ok().as_deref(),
    )
}

fn pick_editor(
    cli: Option<&str>,
    config: Option<&str>,
    editor_var: Option<&str>,
    visual_var: Option<&str>,
) -> String {
    [cli, config, editor_var, visual_var]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(FALLBACK_EDITOR)
        .to_string()
}

/// Splits an editor command into program and arguments.
fn split_command(command: &str) -> Result<(&str, Vec<&str>)> {
    let mut parts = command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| XpadError::EditorNotFound(command.to_string()))?;
    Ok((program, parts.collect()))
}

/// Locates `program` on `path_var` (a `PATH`-style list). Anything with a
/// path separator is checked as a file instead.
pub fn find_program(program: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    let direct = Path::new(program);
    if direct.components().count() > 1 {
        return direct.is_file().then(|| direct.to_path_buf());
    }
    env::split_paths(path_var?)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

/// Opens `initial` in `editor` and returns the saved text.
///
/// Blocks with the terminal handed to the editor until it exits. The temp
/// file is removed afterwards whatever the outcome.
pub fn edit_text(editor: &str, initial: &str) -> Result<String> {
    let (program, args) = split_command(editor)?;
    let resolved = find_program(program, env::var_os("PATH").as_deref())
        .ok_or_else(|| XpadError::EditorNotFound(program.to_string()))?;

    let mut file = tempfile::Builder::new()
        .prefix("xpad-")
        .suffix(TEMP_SUFFIX)
        .tempfile()?;
    file.write_all(initial.as_bytes())?;
    file.flush()?;

    debug!("launching {} on {}", resolved.display(), file.path().display());
    let status = Command::new(&resolved)
        .args(&args)
        .arg(file.path())
        .status()
        .map_err(|e| XpadError::Editor(format!("failed to launch '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(XpadError::Editor(format!(
            "'{}' exited with {}",
            editor, status
        )));
    }

    let bytes = fs::read(file.path())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use tempfile::tempdir;

    #[test]
    fn precedence_is_cli_config_editor_visual() {
        assert_eq!(pick_editor(Some("a"), Some("b"), Some("c"), Some("d")), "a");
        assert_eq!(pick_editor(None, Some("b"), Some("c"), Some("d")), "b");
        assert_eq!(pick_editor(None, None, Some("c"), Some("d")), "c");
        assert_eq!(pick_editor(None, None, None, Some("d")), "d");
        assert_eq!(pick_editor(None, None, None, None), "vi");
    }

    #[test]
    fn blank_values_are_skipped() {
        assert_eq!(pick_editor(Some("  "), None, Some(""), Some("nano")), "nano");
    }

    #[test]
    fn command_arguments_are_split() {
        let (program, args) = split_command("code --wait -n").unwrap();
        assert_eq!(program, "code");
        assert_eq!(args, vec!["--wait", "-n"]);
        assert!(split_command("   ").is_err());
    }

    #[test]
    fn finds_program_in_path_list() {
        let a = tempdir().unwrap();
        let b = tempdir().unwrap();
        fs::write(b.path().join("myeditor"), "").unwrap();
        let path_var: OsString = env::join_paths([a.path(), b.path()]).unwrap();

        assert_eq!(
            find_program("myeditor", Some(path_var.as_os_str())),
            Some(b.path().join("myeditor"))
        );
        assert_eq!(find_program("nothere", Some(path_var.as_os_str())), None);
        assert_eq!(find_program("myeditor", None), None);
    }

    #[test]
    fn explicit_paths_are_checked_directly() {
        let dir = tempdir().unwrap();
        let exe = dir.path().join("ed");
        fs::write(&exe, "").unwrap();
        let exe_str = exe.to_str().unwrap();
        assert_eq!(find_program(exe_str, None), Some(exe.clone()));
        assert_eq!(
            find_program(dir.path().join("missing").to_str().unwrap(), None),
            None
        );
    }

    #[test]
    fn missing_editor_is_reported() {
        let err = edit_text("xpad-no-such-editor-7f3k", "x").unwrap_err();
        assert!(matches!(err, XpadError::EditorNotFound(name) if name == "xpad-no-such-editor-7f3k"));
    }

    #[cfg(unix)]
    #[test]
    fn no_op_editor_returns_initial_text() {
        assert_eq!(edit_text("true", "keep me\n").unwrap(), "keep me\n");
    }

    #[cfg(unix)]
    #[test]
    fn failing_editor_is_an_error() {
        assert!(matches!(edit_text("false", "x"), Err(XpadError::Editor(_))));
    }
}
