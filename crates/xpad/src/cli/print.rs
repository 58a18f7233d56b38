use colored::Colorize;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;
use xpadapp::app::{MessageLevel, StatusMessage};
use xpadapp::window::truncate_title;
use xpadapp::Note;

const DEFAULT_WIDTH: usize = 80;
const HIDDEN_MARKER: &str = "hidden";
const LOCK_MARKER: &str = "🔒";

/// A note as it appears in `list`, with its 1-based number.
#[derive(Debug, Serialize)]
pub(super) struct ListEntry<'a> {
    pub index: usize,
    pub id: &'a str,
    pub title: &'a str,
    pub hidden: bool,
    pub encrypted: bool,
}

impl<'a> ListEntry<'a> {
    pub fn new(index: usize, note: &'a Note) -> Self {
        Self {
            index,
            id: &note.id,
            title: &note.title,
            hidden: note.hidden,
            encrypted: note.encrypted,
        }
    }
}

pub(super) fn print_messages(messages: &[StatusMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

pub(super) fn terminal_width() -> usize {
    console::Term::stdout()
        .size_checked()
        .map(|(_, cols)| cols as usize)
        .unwrap_or(DEFAULT_WIDTH)
}

pub(super) fn print_list(entries: &[ListEntry], width: usize) {
    if entries.is_empty() {
        println!("No notes found.");
        return;
    }

    let index_width = entries
        .iter()
        .map(|e| e.index.to_string().len())
        .max()
        .unwrap_or(1);

    for entry in entries {
        let idx = format!("{:>w$}. ", entry.index, w = index_width);
        let mut suffix = String::new();
        if entry.encrypted {
            suffix.push(' ');
            suffix.push_str(LOCK_MARKER);
        }
        if entry.hidden {
            suffix.push_str(&format!(" ({})", HIDDEN_MARKER));
        }

        let available = width
            .saturating_sub(idx.width())
            .saturating_sub(suffix.width());
        let title = truncate_title(entry.title, available);

        let line = if entry.hidden {
            format!("{}{}", title.dimmed(), suffix.dimmed())
        } else {
            format!("{}{}", title.bold(), suffix)
        };
        println!("{}{}", idx.yellow(), line);
    }
}

pub(super) fn print_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(super) fn print_note(index: usize, title: &str, content: &str) {
    println!("{} {}", format!("{}.", index).yellow(), title.bold());
    println!("--------------------------------");
    println!("{}", content);
}

pub(super) fn print_config(rows: &[(&str, String)]) {
    let key_width = rows.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
    for (key, value) in rows {
        println!("{}  {}", format!("{:<w$}", key, w = key_width).bold(), value);
    }
}
