use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.1"
/// Format for dev builds: "v0.3.1\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "xpad",
    bin_name = "xpad",
    version = get_version(),
    disable_help_subcommand = true,
    after_help = "Notes are numbered as in `xpad list --all`.\nEncrypted notes read the password from $XPAD_PASSWORD or prompt for it."
)]
#[command(about = "Browse, edit and encrypt xpad sticky notes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Notes directory (defaults to the configured one, then ~/.config/xpad)
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub dir: Option<PathBuf>,

    /// Editor command for new and edit
    #[arg(long, global = true, value_name = "CMD", help_heading = "Options")]
    pub editor: Option<String>,

    /// Verbose logging on stderr
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List notes (hidden ones only with --all)
    #[command(alias = "ls")]
    List {
        /// Include hidden notes
        #[arg(short, long)]
        all: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print a note
    View {
        /// Note number
        index: usize,
    },

    /// Create a note, from piped stdin or the editor
    New {
        /// Title (also the initial first line)
        title: Vec<String>,

        /// Skip the editor; the title becomes the content
        #[arg(long)]
        no_editor: bool,

        /// Store the note encrypted
        #[arg(long)]
        encrypt: bool,
    },

    /// Edit a note in the editor
    Edit {
        /// Note number
        index: usize,
    },

    /// Delete a note permanently
    #[command(alias = "rm")]
    Delete {
        /// Note number
        index: usize,
    },

    /// Hide a note from the default list
    Hide {
        /// Note number
        index: usize,
    },

    /// Show a hidden note again
    Unhide {
        /// Note number
        index: usize,
    },

    /// Encrypt a note
    Lock {
        /// Note number
        index: usize,
    },

    /// Remove encryption from a note
    Unlock {
        /// Note number
        index: usize,
    },

    /// Copy a note, or a range of its lines, to the clipboard
    Yank(YankArgs),

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Args, Debug)]
pub struct YankArgs {
    /// Note number
    pub index: usize,

    /// Lines to copy, 1-based: `3` or `2-5`
    #[arg(long, value_name = "A-B", value_parser = parse_line_range)]
    pub lines: Option<LineRange>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Set a value
    Set { key: String, value: String },
    /// Remove a value
    Unset { key: String },
}

/// Inclusive, 1-based line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

pub fn parse_line_range(s: &str) -> Result<LineRange, String> {
    let parse = |part: &str| -> Result<usize, String> {
        match part.trim().parse::<usize>() {
            Ok(0) | Err(_) => Err(format!("'{}' is not a line number (lines start at 1)", part)),
            Ok(n) => Ok(n),
        }
    };
    let (start, end) = match s.split_once('-') {
        Some((a, b)) => (parse(a)?, parse(b)?),
        None => {
            let n = parse(s)?;
            (n, n)
        }
    };
    if start > end {
        return Err(format!("range start {} is after end {}", start, end));
    }
    Ok(LineRange { start, end })
}
