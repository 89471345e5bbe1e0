//! The egg record and its factory.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Protocol version stamped into every egg this crate creates
pub const PROTOCOL_VERSION: u32 = 1;

/// Type tag used when the copier did not say what the reference points at
pub const TYPE_UNKNOWN: &str = "unknown";

/// Type tag of eggs rebuilt from `text/uri-list`
pub const TYPE_URI_FALLBACK: &str = "uri-fallback";

// =============================================================================
// Clock
// =============================================================================

/// Source of egg timestamps (milliseconds since the Unix epoch)
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    /// Current time in milliseconds
    fn now_millis(&self) -> u64;
}

/// Highest timestamp handed out by [`SystemClock`] in this process
static LAST_TIMESTAMP_MS: AtomicU64 = AtomicU64::new(0);

/// Wall-clock time, never going backwards within a process.
///
/// Two eggs created in the same millisecond share a timestamp; an egg is never
/// stamped earlier than one created before it, even if the system clock is
/// stepped back in between.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        let wall = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let previous = LAST_TIMESTAMP_MS.fetch_max(wall, Ordering::Relaxed);
        previous.max(wall)
    }
}

// =============================================================================
// Egg
// =============================================================================

/// A clipboard egg: a reference to content rather than the content itself.
///
/// Serializes to the structured wire shape
/// `{ v, uri, label, type, thumb, meta, ts }` with every key present and absent
/// optionals written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Egg {
    /// Protocol version
    #[serde(rename = "v")]
    pub version: u32,

    /// The referenced resource
    pub uri: String,

    /// Human-readable display text (may be empty)
    pub label: String,

    /// Free-form category tag (`"image"`, `"document"`, ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Thumbnail URL
    #[serde(default)]
    pub thumb: Option<String>,

    /// Application-defined payload, opaque to the protocol
    #[serde(default)]
    pub meta: Option<Map<String, Value>>,

    /// Creation time in milliseconds since the Unix epoch
    #[serde(rename = "ts")]
    pub timestamp: u64,
}

impl Egg {
    /// Create an egg stamped with the current wall-clock time.
    ///
    /// `uri` and `label` are stored verbatim. Unset or empty `type` becomes
    /// [`TYPE_UNKNOWN`], unset or empty `thumb` becomes `None`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use clipegg_core::{Egg, EggOptions, TYPE_UNKNOWN};
    ///
    /// let egg = Egg::new("https://example.com", "Example", EggOptions::default());
    /// assert_eq!(egg.kind, TYPE_UNKNOWN);
    /// assert!(egg.thumb.is_none());
    /// ```
    pub fn new(uri: impl Into<String>, label: impl Into<String>, options: EggOptions) -> Self {
        Self::with_clock(uri, label, options, &SystemClock)
    }

    /// Create an egg stamped by `clock`
    pub fn with_clock(
        uri: impl Into<String>,
        label: impl Into<String>,
        options: EggOptions,
        clock: &dyn Clock,
    ) -> Self {
        let EggOptions { kind, thumb, meta } = options;

        Self {
            version: PROTOCOL_VERSION,
            uri: uri.into(),
            label: label.into(),
            kind: kind
                .filter(|k| !k.is_empty())
                .unwrap_or_else(|| TYPE_UNKNOWN.to_string()),
            thumb: thumb.filter(|t| !t.is_empty()),
            meta,
            timestamp: clock.now_millis(),
        }
    }

    /// Synthetic egg rebuilt from the plain URI formats
    pub(crate) fn uri_fallback(uri: String, label: String, clock: &dyn Clock) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            uri,
            label,
            kind: TYPE_URI_FALLBACK.to_string(),
            thumb: None,
            meta: None,
            timestamp: clock.now_millis(),
        }
    }

    /// Whether this egg was reconstructed from fallback formats
    pub fn is_uri_fallback(&self) -> bool {
        self.kind == TYPE_URI_FALLBACK
    }
}

/// Optional egg fields accepted by [`Egg::new`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EggOptions {
    /// Category tag
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    /// Thumbnail URL
    #[serde(default)]
    pub thumb: Option<String>,

    /// Application metadata
    #[serde(default)]
    pub meta: Option<Map<String, Value>>,
}

impl EggOptions {
    /// Empty options; every field takes its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the category tag
    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the thumbnail URL
    pub fn with_thumb(mut self, thumb: impl Into<String>) -> Self {
        self.thumb = Some(thumb.into());
        self
    }

    /// Set the metadata object
    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = Some(meta);
        self
    }
}
