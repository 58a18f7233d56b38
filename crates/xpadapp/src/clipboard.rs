use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use console::Term;
use log::warn;
use std::io::Write;

/// Anything that can receive yanked text.
pub trait ClipboardSink {
    /// Returns `false` when the text could not be delivered.
    fn copy(&mut self, text: &str) -> bool;
}

/// Collects copies in memory; handy for headless use and tests.
impl ClipboardSink for Vec<String> {
    fn copy(&mut self, text: &str) -> bool {
        self.push(text.to_string());
        true
    }
}

/// Builds the OSC 52 "set clipboard" escape sequence for `text`.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

/// Writes the clipboard escape sequence to the controlling terminal.
///
/// Works over SSH and inside tmux (with `set-clipboard on`) because the
/// terminal emulator, not the host, owns the clipboard.
pub struct Osc52Clipboard {
    term: Term,
    term_name: Option<String>,
}

impl Osc52Clipboard {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            term_name: std::env::var("TERM").ok(),
        }
    }

    /// Whether the sequence would reach a capable terminal.
    pub fn is_capable(&self) -> bool {
        self.term.is_term() && self.term_name.as_deref() != Some("dumb")
    }
}

impl Default for Osc52Clipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSink for Osc52Clipboard {
    fn copy(&mut self, text: &str) -> bool {
        if !self.is_capable() {
            warn!("clipboard unavailable: stdout is not a capable terminal");
            return false;
        }
        let seq = osc52_sequence(text);
        self.term
            .write_all(seq.as_bytes())
            .and_then(|_| self.term.flush())
            .is_ok()
    }
}
