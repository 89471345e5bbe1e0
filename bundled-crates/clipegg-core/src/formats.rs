//! Clipboard format identifiers and the containers that carry them.
//!
//! A clipboard transaction carries one egg as four parallel representations,
//! each keyed by a MIME-like format identifier. [`FormatBundle`] is the
//! encoder's output; [`FormatLookup`] and [`ClipboardPayload`] are the read and
//! write sides of whatever clipboard the caller is talking to.

use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Format Identifiers
// =============================================================================

/// Structured egg format (canonical representation)
pub const MIME_EGG: &str = "application/x-clipegg+json";

/// URI list fallback (raw URI, no trailing newline)
pub const MIME_URI_LIST: &str = "text/uri-list";

/// Plain text fallback (`label\nuri`)
pub const MIME_PLAIN: &str = "text/plain";

/// HTML fallback (anchor with optional thumbnail)
pub const MIME_HTML: &str = "text/html";

/// All egg formats in priority order
pub const EGG_FORMATS: [&str; 4] = [MIME_EGG, MIME_URI_LIST, MIME_PLAIN, MIME_HTML];

// =============================================================================
// Format Bundle
// =============================================================================

/// The four clipboard representations of one egg.
///
/// Produced by [`encode`](crate::encode); lives only for the duration of a
/// clipboard write or read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatBundle {
    /// `application/x-clipegg+json` payload
    pub structured: String,

    /// `text/uri-list` payload
    pub uri_list: String,

    /// `text/plain` payload
    pub plain: String,

    /// `text/html` payload
    pub html: String,
}

impl FormatBundle {
    /// Payload for a format identifier, if it is one of the four egg formats
    pub fn get(&self, format: &str) -> Option<&str> {
        match format {
            MIME_EGG => Some(&self.structured),
            MIME_URI_LIST => Some(&self.uri_list),
            MIME_PLAIN => Some(&self.plain),
            MIME_HTML => Some(&self.html),
            _ => None,
        }
    }

    /// `(format, payload)` pairs in priority order
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            (MIME_EGG, self.structured.as_str()),
            (MIME_URI_LIST, self.uri_list.as_str()),
            (MIME_PLAIN, self.plain.as_str()),
            (MIME_HTML, self.html.as_str()),
        ]
    }

    /// Copy the bundle into an owned format map
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.entries()
            .into_iter()
            .map(|(format, data)| (format.to_string(), data.to_string()))
            .collect()
    }
}

// =============================================================================
// Clipboard Access
// =============================================================================

/// Read side of a clipboard transaction.
///
/// A single query: the payload stored under a format identifier. Returning
/// `Some("")` is equivalent to `None`; the decoder treats both as absent.
pub trait FormatLookup {
    /// Payload for `format`, if any
    fn get_data(&self, format: &str) -> Option<&str>;
}

/// Write side of a clipboard transaction (one slot per format).
pub trait ClipboardPayload {
    /// Store `data` under `format`, replacing any previous value
    fn set_data(&mut self, format: &str, data: &str);
}

impl FormatLookup for FormatBundle {
    fn get_data(&self, format: &str) -> Option<&str> {
        self.get(format)
    }
}

impl<S: std::hash::BuildHasher> FormatLookup for HashMap<String, String, S> {
    fn get_data(&self, format: &str) -> Option<&str> {
        self.get(format).map(String::as_str)
    }
}

impl FormatLookup for BTreeMap<String, String> {
    fn get_data(&self, format: &str) -> Option<&str> {
        self.get(format).map(String::as_str)
    }
}

impl<T: FormatLookup + ?Sized> FormatLookup for &T {
    fn get_data(&self, format: &str) -> Option<&str> {
        (**self).get_data(format)
    }
}

impl<S: std::hash::BuildHasher> ClipboardPayload for HashMap<String, String, S> {
    fn set_data(&mut self, format: &str, data: &str) {
        self.insert(format.to_string(), data.to_string());
    }
}

impl ClipboardPayload for BTreeMap<String, String> {
    fn set_data(&mut self, format: &str, data: &str) {
        self.insert(format.to_string(), data.to_string());
    }
}

// =============================================================================
// In-memory Clipboard
// =============================================================================

/// In-memory clipboard data, readable and writable.
///
/// Stands in for a platform clipboard event payload in tests and in tools that
/// move bundles through files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    data: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryClipboard {
    /// Create an empty clipboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, for setting up clipboards in tests
    pub fn with_data(mut self, format: impl Into<String>, data: impl Into<String>) -> Self {
        self.data.insert(format.into(), data.into());
        self
    }

    /// Number of formats currently stored
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no format is stored
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of [`ClipboardPayload::set_data`] calls received
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Stored format identifiers, sorted
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    /// Take the stored formats
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.data
    }
}

impl From<BTreeMap<String, String>> for MemoryClipboard {
    fn from(data: BTreeMap<String, String>) -> Self {
        Self { data, writes: 0 }
    }
}

impl From<&FormatBundle> for MemoryClipboard {
    fn from(bundle: &FormatBundle) -> Self {
        Self::from(bundle.to_map())
    }
}

impl FormatLookup for MemoryClipboard {
    fn get_data(&self, format: &str) -> Option<&str> {
        self.data.get(format).map(String::as_str)
    }
}

impl ClipboardPayload for MemoryClipboard {
    fn set_data(&mut self, format: &str, data: &str) {
        self.writes += 1;
        self.data.insert(format.to_string(), data.to_string());
    }
}
