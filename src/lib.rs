//! # clipegg
//!
//! Clipboard egg protocol: copy a small reference to a resource instead of the
//! resource itself.
//!
//! This crate integrates the protocol core with a host application:
//! - [`clipegg_core`] - Egg record, four-format encoder and decoder
//! - [`clipboard`] - Copy/paste dispatch, events and bundle files
//! - [`config`] - TOML configuration for the `clipegg` binary
//!
//! # Architecture
//!
//! ```text
//! clipegg
//!   ├─> ClipEgg dispatcher (rules on copy, handlers on paste)
//!   ├─> Bundle files (JSON map of format -> payload)
//!   └─> clipegg-core
//!         ├─> encode (egg -> structured, uri-list, plain, html)
//!         └─> decode (structured first, uri-list fallback)
//! ```
//!
//! # Example
//!
//! ```
//! use clipegg::clipboard::{ClipEgg, CopyEvent, EggFields, PasteEvent};
//! use clipegg::MemoryClipboard;
//!
//! struct Card {
//!     href: String,
//!     title: String,
//! }
//!
//! let mut clipegg: ClipEgg<Card> = ClipEgg::new();
//! clipegg
//!     .register(
//!         |_: &Card| true,
//!         |card: &Card| EggFields::new(card.href.clone(), card.title.clone()),
//!     )
//!     .activate();
//!
//! let card = Card {
//!     href: "https://example.com/doc".to_string(),
//!     title: "Document".to_string(),
//! };
//! let mut clipboard = MemoryClipboard::new();
//! let mut copy = CopyEvent::new(Some(&card), &mut clipboard);
//! clipegg.handle_copy(&mut copy);
//!
//! let mut paste = PasteEvent::new(&clipboard);
//! let egg = clipegg.handle_paste(&mut paste).unwrap();
//! assert_eq!(egg.label, "Document");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Copy/paste integration
pub mod clipboard;

/// CLI configuration
pub mod config;

// =============================================================================
// Re-exports from the protocol core
// =============================================================================

pub use clipegg_core;
pub use clipegg_core::{
    decode, encode, try_decode, Egg, EggError, EggOptions, FormatBundle, FormatLookup,
    MemoryClipboard, MetaMap,
};
