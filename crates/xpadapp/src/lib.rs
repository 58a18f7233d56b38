//! # xpadapp
//!
//! Core library for browsing xpad sticky notes from a terminal. The notes
//! directory is shared with the xpad desktop application, so the on-disk
//! format is fixed: see [`store`] and [`info`].
//!
//! ## Architecture
//!
//! ```text
//!  crates/xpad (CLI)          clap parsing, editor + password prompts, output
//!        │
//!        ▼
//!  app::App                   one key at a time; returns Outcome for the editor
//!        │
//!        ├── motion / selection / viewport / window    pure text and layout math
//!        ├── clipboard                                 OSC 52 sink
//!        ▼
//!  store::NoteRepository      flat files: info-XXXXXX + content-XXXXXX
//!        │
//!        └── crypto           argon2id + AES-256-GCM envelope
//! ```
//!
//! Nothing in this crate writes to stdout except the clipboard sink, and
//! nothing reads from the terminal. The CLI crate owns all user interaction.
//!
//! ## Modules
//!
//! - [`store`]: list, create, save, remove notes; hidden and encrypted flags
//! - [`info`]: the `key value` info-file format
//! - [`crypto`]: the encryption envelope
//! - [`motion`]: vi-style cursor motions over a [`motion::LineBuffer`]
//! - [`selection`]: line and char selections, yanking
//! - [`viewport`]: follow-cursor scrolling
//! - [`window`]: list and grid windowing
//! - [`app`], [`mode`], [`keys`]: the interactive state machine
//! - [`tasks`]: `- [ ]` task lines
//! - [`config`], [`editor`]: settings and the external editor

pub mod app;
pub mod clipboard;
pub mod config;
pub mod crypto;
pub mod editor;
pub mod error;
pub mod info;
pub mod keys;
pub mod mode;
pub mod model;
pub mod motion;
pub mod selection;
pub mod store;
pub mod tasks;
pub mod viewport;
pub mod window;

pub use error::{Result, XpadError};
pub use model::{Note, NoteBody, NoteInfo};
pub use store::NoteRepository;
