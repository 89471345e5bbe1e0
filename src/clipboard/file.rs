//! Bundle files
//!
//! A bundle file is a JSON object mapping clipboard format identifiers to text
//! payloads, the on-disk form of one clipboard transaction:
//!
//! ```json
//! {
//!   "application/x-clipegg+json": "{\"v\":1, ...}",
//!   "text/uri-list": "https://example.com/doc",
//!   "text/plain": "Document\nhttps://example.com/doc",
//!   "text/html": "<a href=\"https://example.com/doc\">Document</a>"
//! }
//! ```
//!
//! Formats other than the four egg formats are kept, so a bundle captured from
//! a real clipboard reads back intact.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use clipegg_core::{try_decode, Egg, FormatBundle, MemoryClipboard};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::error::{ClipboardError, Result};

/// Read a bundle file, rejecting files larger than `max_size` bytes
pub fn read_bundle(path: &Path, max_size: usize) -> Result<MemoryClipboard> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    if len > max_size as u64 {
        return Err(ClipboardError::DataSizeExceeded(max_size));
    }

    debug!("Reading bundle {:?} ({} bytes)", path, len);
    read_bundle_from(file, max_size)
}

/// Read a bundle from any reader, stopping after `max_size` bytes
pub fn read_bundle_from<R: Read>(reader: R, max_size: usize) -> Result<MemoryClipboard> {
    let mut content = String::new();
    reader
        .take((max_size as u64).saturating_add(1))
        .read_to_string(&mut content)?;
    if content.len() > max_size {
        return Err(ClipboardError::DataSizeExceeded(max_size));
    }

    parse_bundle(&content)
}

/// Parse bundle JSON into clipboard data
pub fn parse_bundle(content: &str) -> Result<MemoryClipboard> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Object(formats) = value else {
        return Err(ClipboardError::InvalidData("expected a JSON object".to_string()));
    };

    let mut clipboard = MemoryClipboard::new();
    for (format, data) in formats {
        match data {
            Value::String(data) => {
                trace!("Bundle format {} ({} bytes)", format, data.len());
                clipboard = clipboard.with_data(format, data);
            }
            other => {
                return Err(ClipboardError::InvalidData(format!(
                    "payload for {} is not a string: {}",
                    format, other
                )));
            }
        }
    }

    Ok(clipboard)
}

/// Read a bundle file and decode the egg it carries
///
/// `Ok(None)` means the bundle is readable but holds no egg. A malformed
/// structured payload is an error here rather than a silent miss.
pub fn decode_file(path: &Path, max_size: usize) -> Result<Option<Egg>> {
    let clipboard = read_bundle(path, max_size)?;
    Ok(try_decode(&clipboard)?)
}

/// Write the four egg formats as a bundle file, in priority order
pub fn write_bundle<W: Write>(bundle: &FormatBundle, mut writer: W, pretty: bool) -> Result<()> {
    let formats: Map<String, Value> = bundle
        .entries()
        .into_iter()
        .map(|(format, data)| (format.to_string(), Value::from(data)))
        .collect();

    if pretty {
        serde_json::to_writer_pretty(&mut writer, &formats)?;
    } else {
        serde_json::to_writer(&mut writer, &formats)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
