//! # CLI Layer
//!
//! The only place that knows about stdout, stderr, prompts and exit codes.
//! Each handler resolves a note number against `xpad list --all`, calls the
//! library, and prints the result.
//!
//! ## Structure
//!
//! - `run()`: parse, set up logging and config, dispatch
//! - `handle_*()`: one per subcommand
//! - `read_password()`: `$XPAD_PASSWORD`, else an interactive prompt

use super::print::{
    print_config, print_json, print_list, print_messages, print_note, terminal_width, ListEntry,
};
use super::setup::{Cli, Commands, ConfigAction, LineRange, YankArgs};
use clap::Parser;
use log::{debug, LevelFilter};
use std::env;
use std::io::{IsTerminal, Read};
use xpadapp::app::StatusMessage;
use xpadapp::clipboard::Osc52Clipboard;
use xpadapp::config::{config_path, AppConfig, ConfigKey};
use xpadapp::editor::{edit_text, resolve_editor};
use xpadapp::motion::{CursorPosition, LineBuffer, Motion};
use xpadapp::selection::{yank_full, SelectionEngine};
use xpadapp::{Note, NoteRepository, Result, XpadError};

const LOG_ENV: &str = "XPAD_LOG";
const PASSWORD_ENV: &str = "XPAD_PASSWORD";

struct AppContext {
    repo: NoteRepository,
    config: AppConfig,
    editor: Option<String>,
}

impl AppContext {
    fn editor(&self) -> String {
        resolve_editor(self.editor.as_deref(), self.config.editor.as_deref())
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::load_default()?;
    let dir = cli.dir.clone().unwrap_or_else(|| config.notes_dir());
    debug!("notes directory: {}", dir.display());

    let ctx = AppContext {
        repo: NoteRepository::new(dir),
        config,
        editor: cli.editor.clone(),
    };

    match cli.command {
        None => handle_list(&ctx, false, false),
        Some(Commands::List { all, json }) => handle_list(&ctx, all, json),
        Some(Commands::View { index }) => handle_view(&ctx, index),
        Some(Commands::New {
            title,
            no_editor,
            encrypt,
        }) => handle_new(&ctx, title, no_editor, encrypt),
        Some(Commands::Edit { index }) => handle_edit(&ctx, index),
        Some(Commands::Delete { index }) => handle_delete(&ctx, index),
        Some(Commands::Hide { index }) => handle_hidden(&ctx, index, true),
        Some(Commands::Unhide { index }) => handle_hidden(&ctx, index, false),
        Some(Commands::Lock { index }) => handle_lock(&ctx, index),
        Some(Commands::Unlock { index }) => handle_unlock(&ctx, index),
        Some(Commands::Yank(args)) => handle_yank(&ctx, args),
        Some(Commands::Config { action }) => handle_config(&ctx, action),
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, "warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

/// Resolves a 1-based number from `xpad list --all`.
fn note_at(ctx: &AppContext, index: usize) -> Result<Note> {
    let notes = ctx.repo.list(true)?;
    let total = notes.len();
    index
        .checked_sub(1)
        .and_then(|i| notes.into_iter().nth(i))
        .ok_or(XpadError::InvalidIndex(index, total))
}

fn read_password() -> Result<String> {
    if let Ok(password) = env::var(PASSWORD_ENV) {
        if !password.is_empty() {
            return Ok(password);
        }
    }
    if !std::io::stdin().is_terminal() {
        return Err(XpadError::PasswordRequired);
    }
    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        return Err(XpadError::PasswordRequired);
    }
    Ok(password)
}

/// Decrypts `note` if needed. Returns the password used, for saving back.
fn unlocked(ctx: &AppContext, note: Note) -> Result<(Note, Option<String>)> {
    if !note.is_locked() {
        return Ok((note, None));
    }
    let password = read_password()?;
    let note = ctx.repo.decrypt(&note, &password)?;
    Ok((note, Some(password)))
}

fn handle_list(ctx: &AppContext, all: bool, json: bool) -> Result<()> {
    let notes = ctx.repo.list(true)?;
    let entries: Vec<ListEntry> = notes
        .iter()
        .enumerate()
        .map(|(i, note)| ListEntry::new(i + 1, note))
        .filter(|entry| all || !entry.hidden)
        .collect();

    if json {
        print_json(&entries).map_err(std::io::Error::from)?;
    } else {
        print_list(&entries, terminal_width());
    }
    Ok(())
}

fn handle_view(ctx: &AppContext, index: usize) -> Result<()> {
    let (note, _) = unlocked(ctx, note_at(ctx, index)?)?;
    print_note(index, &note.title, note.content());
    Ok(())
}

fn handle_new(ctx: &AppContext, title: Vec<String>, no_editor: bool, encrypt: bool) -> Result<()> {
    let title = Some(title.join(" ").trim().to_string()).filter(|t| !t.is_empty());

    let mut piped = String::new();
    if !std::io::stdin().is_terminal() {
        std::io::stdin().read_to_string(&mut piped)?;
    }

    let content = if !piped.trim().is_empty() {
        piped
    } else if no_editor {
        title.clone().unwrap_or_default()
    } else {
        let initial = title.as_deref().map(|t| format!("{}\n", t)).unwrap_or_default();
        edit_text(&ctx.editor(), &initial)?
    };

    if content.trim().is_empty() {
        print_messages(&[StatusMessage::info("Empty note discarded")]);
        return Ok(());
    }

    let password = if encrypt { Some(read_password()?) } else { None };
    let note = ctx
        .repo
        .create(title.as_deref(), &content, password.as_deref())?;
    print_messages(&[StatusMessage::success(format!(
        "Created \"{}\" ({})",
        note.title, note.id
    ))]);
    Ok(())
}

fn handle_edit(ctx: &AppContext, index: usize) -> Result<()> {
    let (mut note, password) = unlocked(ctx, note_at(ctx, index)?)?;
    let edited = edit_text(&ctx.editor(), note.content())?;

    if edited == note.content() {
        print_messages(&[StatusMessage::info("No changes.")]);
        return Ok(());
    }
    note.set_content(edited);
    ctx.repo.save(&note, password.as_deref())?;
    print_messages(&[StatusMessage::success(format!("Saved \"{}\"", note.title))]);
    Ok(())
}

fn handle_delete(ctx: &AppContext, index: usize) -> Result<()> {
    let note = note_at(ctx, index)?;
    ctx.repo.remove(&note)?;
    print_messages(&[StatusMessage::success(format!("Deleted \"{}\"", note.title))]);
    Ok(())
}

fn handle_hidden(ctx: &AppContext, index: usize, hidden: bool) -> Result<()> {
    let note = note_at(ctx, index)?;
    if note.hidden == hidden {
        let state = if hidden { "hidden" } else { "visible" };
        print_messages(&[StatusMessage::info(format!(
            "\"{}\" is already {}",
            note.title, state
        ))]);
        return Ok(());
    }
    ctx.repo.set_hidden(&note, hidden)?;
    let verb = if hidden { "Hid" } else { "Unhid" };
    print_messages(&[StatusMessage::success(format!("{} \"{}\"", verb, note.title))]);
    Ok(())
}

fn handle_lock(ctx: &AppContext, index: usize) -> Result<()> {
    let mut note = note_at(ctx, index)?;
    if note.encrypted {
        print_messages(&[StatusMessage::info(format!(
            "\"{}\" is already encrypted",
            note.title
        ))]);
        return Ok(());
    }
    let password = read_password()?;
    ctx.repo.encrypt(&mut note, &password)?;
    print_messages(&[StatusMessage::success(format!("Encrypted \"{}\"", note.title))]);
    Ok(())
}

fn handle_unlock(ctx: &AppContext, index: usize) -> Result<()> {
    let note = note_at(ctx, index)?;
    if !note.encrypted {
        print_messages(&[StatusMessage::info(format!(
            "\"{}\" is not encrypted",
            note.title
        ))]);
        return Ok(());
    }
    let (mut note, _) = unlocked(ctx, note)?;
    ctx.repo.remove_encryption(&mut note)?;
    print_messages(&[StatusMessage::success(format!(
        "Removed encryption from \"{}\"",
        note.title
    ))]);
    Ok(())
}

/// Copies via OSC 52. Without a capable terminal the text goes to stdout
/// instead, so `xpad yank 3 | pbcopy` still works.
fn handle_yank(ctx: &AppContext, args: YankArgs) -> Result<()> {
    let (note, _) = unlocked(ctx, note_at(ctx, args.index)?)?;
    let mut clipboard = Osc52Clipboard::new();
    let capable = clipboard.is_capable();

    let text = match args.lines {
        None if capable => {
            yank_full(note.content(), &mut clipboard);
            note.content().to_string()
        }
        None => note.content().to_string(),
        Some(range) => {
            let buffer = LineBuffer::new(note.content());
            let mut selection = select_lines(&buffer, range)?;
            let text = if capable {
                selection.yank(&buffer, &mut clipboard)
            } else {
                selection.selected_text(&buffer)
            };
            text.unwrap_or_default()
        }
    };

    if capable {
        let lines = text.split('\n').count();
        print_messages(&[StatusMessage::success(format!(
            "Copied {} line{} to clipboard",
            lines,
            if lines == 1 { "" } else { "s" }
        ))]);
    } else {
        print!("{}", text);
        print_messages(&[StatusMessage::warning(
            "Clipboard unavailable; wrote the text to stdout",
        )]);
    }
    Ok(())
}

fn select_lines(buffer: &LineBuffer, range: LineRange) -> Result<SelectionEngine> {
    let count = buffer.line_count();
    if range.start > count {
        return Err(XpadError::InvalidLine(range.start, count));
    }
    let end = range.end.min(count);

    let mut selection = SelectionEngine::new();
    selection.start_line(CursorPosition::new(range.start - 1, 0));
    for _ in range.start..end {
        selection.extend(buffer, Motion::Down);
    }
    Ok(selection)
}

fn handle_config(ctx: &AppContext, action: Option<ConfigAction>) -> Result<()> {
    let path = config_path();
    let Some(action) = action else {
        let file = path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(no config directory)".to_string());
        let editor = match ctx.config.editor.as_deref() {
            Some(editor) => editor.to_string(),
            None => format!("(unset, using {})", ctx.editor()),
        };
        print_config(&[
            ("file", file),
            (ConfigKey::Editor.name(), editor),
            (
                ConfigKey::NotesDir.name(),
                ctx.repo.dir().display().to_string(),
            ),
        ]);
        return Ok(());
    };

    let path = path.ok_or_else(|| XpadError::Config("no config directory available".into()))?;
    let mut on_disk = AppConfig::load_file(&path)?;
    let message = match action {
        ConfigAction::Set { key, value } => {
            let key = ConfigKey::parse(&key)?;
            on_disk.set(key, &value);
            format!("Set {} = {}", key.name(), value.trim())
        }
        ConfigAction::Unset { key } => {
            let key = ConfigKey::parse(&key)?;
            on_disk.unset(key);
            format!("Unset {}", key.name())
        }
    };
    on_disk.save(&path)?;
    print_messages(&[StatusMessage::success(message)]);
    Ok(())
}
