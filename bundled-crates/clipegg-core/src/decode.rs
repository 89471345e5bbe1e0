//! Clipboard formats → egg.
//!
//! Resolution order:
//!
//! 1. `application/x-clipegg+json` present and non-empty: parse it and return
//!    the egg unchanged. A payload that fails to parse yields no egg; the URI
//!    formats are *not* consulted, since a broken structured payload means the
//!    copier spoke the protocol and a guessed egg would misrepresent it.
//!    Parsing is typed: `v` and `ts` must be JSON integers, so `1.0` or
//!    `1.7e12` in those fields makes the payload malformed.
//! 2. Otherwise `text/uri-list` present and non-empty: rebuild an egg from the
//!    trimmed URI, labelled with the first line of `text/plain` when there is
//!    one, typed [`TYPE_URI_FALLBACK`](crate::TYPE_URI_FALLBACK).
//! 3. Otherwise there is no egg.

use crate::egg::{Clock, SystemClock};
use crate::formats::{FormatLookup, MIME_EGG, MIME_PLAIN, MIME_URI_LIST};
use crate::{Egg, EggResult};

/// Read an egg from clipboard formats.
///
/// Returns `None` when the clipboard holds no egg or when the structured
/// payload is malformed; the latter is reported as a `warn` diagnostic. Use
/// [`try_decode`] to receive that condition as an error instead. Malformed
/// includes valid JSON of the wrong shape, and integer fields written as
/// floats (`"v": 1.0`, `"ts": 1.7e12`).
///
/// # Example
///
/// ```rust
/// use clipegg_core::{decode, MemoryClipboard, MIME_PLAIN, MIME_URI_LIST};
///
/// let clipboard = MemoryClipboard::new()
///     .with_data(MIME_URI_LIST, "  https://x/y  ")
///     .with_data(MIME_PLAIN, "Title\nhttps://x/y");
///
/// let egg = decode(&clipboard).unwrap();
/// assert_eq!(egg.uri, "https://x/y");
/// assert_eq!(egg.label, "Title");
/// assert_eq!(egg.kind, "uri-fallback");
/// ```
pub fn decode<L: FormatLookup + ?Sized>(clipboard: &L) -> Option<Egg> {
    decode_with_clock(clipboard, &SystemClock)
}

/// [`decode`] with an explicit clock for stamping fallback eggs
pub fn decode_with_clock<L: FormatLookup + ?Sized>(clipboard: &L, clock: &dyn Clock) -> Option<Egg> {
    match try_decode_with_clock(clipboard, clock) {
        Ok(egg) => egg,
        Err(e) => {
            tracing::warn!("ClipEgg: {}", e);
            None
        }
    }
}

/// Read an egg from clipboard formats, surfacing a malformed structured payload.
///
/// `Ok(None)` means the clipboard simply holds no egg.
///
/// # Errors
///
/// [`EggError::MalformedPayload`](crate::EggError::MalformedPayload) when the
/// structured format is present but is not a valid egg. The payload is
/// deserialized into the typed [`Egg`], so `v` and `ts` must be JSON integers:
/// numerically equal values written as floats (`"v": 1.0`, `"ts": 1.7e12`) or
/// strings are rejected.
pub fn try_decode<L: FormatLookup + ?Sized>(clipboard: &L) -> EggResult<Option<Egg>> {
    try_decode_with_clock(clipboard, &SystemClock)
}

/// [`try_decode`] with an explicit clock for stamping fallback eggs
pub fn try_decode_with_clock<L: FormatLookup + ?Sized>(
    clipboard: &L,
    clock: &dyn Clock,
) -> EggResult<Option<Egg>> {
    if let Some(payload) = lookup(clipboard, MIME_EGG) {
        let egg: Egg = serde_json::from_str(payload)?;
        tracing::trace!(uri = %egg.uri, version = egg.version, "Decoded structured egg");
        return Ok(Some(egg));
    }

    let Some(raw_uri) = lookup(clipboard, MIME_URI_LIST) else {
        return Ok(None);
    };

    let uri = raw_uri.trim();
    let label = lookup(clipboard, MIME_PLAIN)
        .and_then(|plain| plain.split('\n').next())
        .filter(|line| !line.is_empty())
        .unwrap_or(uri);

    tracing::debug!(uri = %uri, "Rebuilt egg from {}", MIME_URI_LIST);
    Ok(Some(Egg::uri_fallback(uri.to_string(), label.to_string(), clock)))
}

/// Non-empty payload for `format`
fn lookup<'a, L: FormatLookup + ?Sized>(clipboard: &'a L, format: &str) -> Option<&'a str> {
    clipboard.get_data(format).filter(|data| !data.is_empty())
}
