//! # CLI
//!
//! One thin client over `xpadapp`. Everything user-facing lives here:
//! argument parsing, prompts, editor hand-off and output.
//!
//! ## Notes by number
//!
//! Commands take the 1-based number shown by `xpad list --all`, so a hidden
//! note keeps its number whether or not it is listed.
//!
//! ## Creating notes
//!
//! Content for `xpad new` is taken from, in order:
//!
//! 1. **Piped input**: `echo "milk" | xpad new`. Skips the editor.
//! 2. **`--no-editor`**: the title words become the content.
//! 3. **The editor**, pre-filled with the title.
//!
//! ## Encrypted notes
//!
//! The password comes from `$XPAD_PASSWORD` or an interactive prompt. It is
//! never written anywhere.
//!
//! ## Module Structure
//!
//! - `setup`: clap definitions
//! - `commands`: dispatch and per-command handlers
//! - `print`: colored output and JSON

mod commands;
mod print;
pub mod setup;

pub use commands::run;
