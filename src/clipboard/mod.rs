//! Clipboard integration
//!
//! Wires the protocol core into a host application's copy/paste events.
//!
//! # Architecture
//!
//! The protocol itself lives in [`clipegg_core`]: the egg record, the four-format
//! encoder and the decoder. This module adds the pieces an application needs
//! around it:
//!
//! - [`ClipEgg`] - Rule registry and copy/paste dispatch
//! - [`CopyEvent`] / [`PasteEvent`] - Events handed in by the event layer
//! - [`file`] - Bundle files, the on-disk form of a clipboard transaction
//!
//! # Data Flow
//!
//! ```text
//! Event layer               ClipEgg                    clipegg-core           Clipboard
//! ━━━━━━━━━━━               ━━━━━━━                    ━━━━━━━━━━━━           ━━━━━━━━━
//!
//! Copy (Ctrl+C)
//!   └─> CopyEvent ──────> first matching rule
//!                           └─> extractor ──────────> Egg::with_clock
//!                                                       └─> write_egg ─────> 4 formats
//!
//! Paste (Ctrl+V)
//!   └─> PasteEvent ─────> decode_with_clock <─────────────────────────────── get_data
//!                           └─> paste handlers
//! ```

pub mod error;
pub mod file;

mod dispatcher;
mod event;

// =============================================================================
// Re-exports
// =============================================================================

pub use dispatcher::{locate, ClipEgg, EggFields, Extractor, Locate, Matcher, PasteHandler};
pub use error::{ClipboardError, ErrorType, Result};
pub use event::{CopyEvent, PasteEvent};
pub use file::{decode_file, read_bundle, read_bundle_from, write_bundle};
