//! Egg → clipboard formats.

use serde_json::{Map, Value};

use crate::formats::{ClipboardPayload, FormatBundle};
use crate::Egg;

/// Bounding box and spacing of the inline thumbnail in the HTML fallback
const THUMB_STYLE: &str = "max-width:64px;max-height:64px;vertical-align:middle;margin-right:8px;";

/// Encode an egg into its four clipboard representations.
///
/// - `application/x-clipegg+json`: the whole egg, absent optionals as `null`
/// - `text/uri-list`: the URI as-is
/// - `text/plain`: `label`, `\n`, `uri`
/// - `text/html`: `<a href="uri">[<img src="thumb" ...>]label</a>`
///
/// # Security
///
/// Nothing is escaped. A `uri`, `label` or `thumb` containing markup ends up
/// in the `text/html` payload unchanged, and a newline in `label` makes the
/// plain text fallback ambiguous. Sanitize untrusted values before building
/// the egg.
///
/// # Example
///
/// ```rust
/// use clipegg_core::{encode, Egg, EggOptions};
///
/// let egg = Egg::new("https://example.com/article", "Article", EggOptions::new());
/// let bundle = encode(&egg);
///
/// assert_eq!(bundle.uri_list, "https://example.com/article");
/// assert_eq!(bundle.html, r#"<a href="https://example.com/article">Article</a>"#);
/// ```
pub fn encode(egg: &Egg) -> FormatBundle {
    FormatBundle {
        structured: structured_payload(egg),
        uri_list: egg.uri.clone(),
        plain: format!("{}\n{}", egg.label, egg.uri),
        html: html_payload(egg),
    }
}

/// Encode `egg` and store all four formats in `clipboard`.
///
/// Exactly one `set_data` call per format, structured format first.
pub fn write_egg<P: ClipboardPayload + ?Sized>(egg: &Egg, clipboard: &mut P) {
    let bundle = encode(egg);
    for (format, data) in bundle.entries() {
        clipboard.set_data(format, data);
    }
    tracing::trace!(uri = %egg.uri, "Wrote egg to clipboard");
}

fn structured_payload(egg: &Egg) -> String {
    // Built as a Value so serialization cannot fail; key order is the wire order.
    let mut object = Map::with_capacity(7);
    object.insert("v".to_string(), Value::from(egg.version));
    object.insert("uri".to_string(), Value::from(egg.uri.as_str()));
    object.insert("label".to_string(), Value::from(egg.label.as_str()));
    object.insert("type".to_string(), Value::from(egg.kind.as_str()));
    object.insert(
        "thumb".to_string(),
        egg.thumb.as_deref().map_or(Value::Null, Value::from),
    );
    object.insert(
        "meta".to_string(),
        egg.meta.clone().map_or(Value::Null, Value::Object),
    );
    object.insert("ts".to_string(), Value::from(egg.timestamp));
    Value::Object(object).to_string()
}

fn html_payload(egg: &Egg) -> String {
    match egg.thumb.as_deref() {
        Some(thumb) => format!(
            r#"<a href="{}"><img src="{}" alt="" style="{}">{}</a>"#,
            egg.uri, thumb, THUMB_STYLE, egg.label
        ),
        None => format!(r#"<a href="{}">{}</a>"#, egg.uri, egg.label),
    }
}
