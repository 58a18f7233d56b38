//! # xpad
//!
//! Terminal client for xpad sticky notes. The binary is intentionally thin:
//! the CLI lives in `src/cli/`, and this file only invokes `cli::run()` and
//! handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/xpadapp/`: note store, encryption, cursor/selection engine and
//!   the interactive app state machine. No terminal I/O.
//! - `crates/xpad/`: this CLI.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
