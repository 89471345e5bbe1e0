//! # clipegg-core
//!
//! Clipboard egg protocol: copy references, not payloads.
//!
//! An [`Egg`] is a small record pointing at content (a URI plus display
//! metadata). This crate turns an egg into a multi-format clipboard payload and
//! back again:
//!
//! - **[`encode`]** - Egg → [`FormatBundle`] (structured JSON + three fallbacks)
//! - **[`decode`]** - [`FormatLookup`] → `Option<Egg>`, with fallback
//!   reconstruction from `text/uri-list` when the structured format is absent
//!
//! ## Quick Start
//!
//! ```rust
//! use clipegg_core::{decode, encode, Egg, EggOptions};
//!
//! let egg = Egg::new(
//!     "https://example.com/doc/123",
//!     "My Document",
//!     EggOptions::new().with_type("document"),
//! );
//!
//! let bundle = encode(&egg);
//! assert_eq!(bundle.plain, "My Document\nhttps://example.com/doc/123");
//!
//! let pasted = decode(&bundle).unwrap();
//! assert_eq!(pasted, egg);
//! ```
//!
//! ## Wire Formats
//!
//! | Format | Content |
//! |--------|---------|
//! | `application/x-clipegg+json` | full egg, every key present, nulls explicit |
//! | `text/uri-list` | raw URI |
//! | `text/plain` | `label\nuri` |
//! | `text/html` | anchor, optional inline thumbnail |
//!
//! The fallback formats are written verbatim. No HTML escaping is performed, so
//! integrators copying from untrusted content must sanitize before encoding.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

mod decode;
mod egg;
mod encode;
mod error;

pub mod formats;

pub use decode::{decode, decode_with_clock, try_decode, try_decode_with_clock};
pub use egg::{Clock, Egg, EggOptions, SystemClock, PROTOCOL_VERSION, TYPE_UNKNOWN, TYPE_URI_FALLBACK};
pub use encode::{encode, write_egg};
pub use error::{EggError, EggResult};
pub use formats::{
    ClipboardPayload, FormatBundle, FormatLookup, MemoryClipboard, MIME_EGG, MIME_HTML, MIME_PLAIN, MIME_URI_LIST,
};

/// Re-export of the JSON object type used for [`Egg::meta`]
pub use serde_json::{Map as MetaMap, Value as MetaValue};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{decode, encode, write_egg, ClipboardPayload, Egg, EggOptions, FormatBundle, FormatLookup};
}
