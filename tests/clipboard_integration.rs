//! ClipEgg dispatcher integration tests
//!
//! Drives copy and paste through a small element tree standing in for a host
//! application's UI.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use clipegg::clipboard::{locate, read_bundle, write_bundle, ClipEgg, CopyEvent, EggFields, PasteEvent};
use clipegg::clipegg_core::{MIME_EGG, MIME_HTML, MIME_PLAIN, MIME_URI_LIST};
use clipegg::{encode, Egg, EggOptions, FormatLookup, MemoryClipboard};
use tempfile::TempDir;

/// A UI element with a tag, attributes and an optional parent
#[derive(Debug)]
struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    parent: Option<Box<Element>>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            parent: None,
        }
    }

    fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    fn inside(mut self, parent: Element) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Nearest ancestor-or-self with the given tag
    fn closest(&self, tag: &str) -> Option<&Element> {
        let mut current = Some(self);
        while let Some(el) = current {
            if el.tag == tag {
                return Some(el);
            }
            current = el.parent.as_deref();
        }
        None
    }
}

/// A span of text inside a project card
fn text_in_card() -> Element {
    let card = Element::new("card")
        .attr("href", "https://example.com/projects/42")
        .attr("title", "Project 42")
        .attr("thumb", "https://example.com/thumbs/42.png")
        .inside(Element::new("body"));
    Element::new("span").inside(card)
}

fn card_dispatcher() -> ClipEgg<Element> {
    let mut clipegg: ClipEgg<Element> = ClipEgg::new();
    clipegg
        .register(locate(|el: &Element| el.closest("card")), |card: &Element| {
            EggFields::new(card.get("href").unwrap(), card.get("title").unwrap()).with_options(
                EggOptions::new()
                    .with_type("project")
                    .with_thumb(card.get("thumb").unwrap()),
            )
        })
        .activate();
    clipegg
}

fn recording_handler(clipegg: &mut ClipEgg<Element>) -> Arc<Mutex<Vec<Egg>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    clipegg.on_paste(move |egg: &Egg, _| sink.lock().unwrap().push(egg.clone()));
    seen
}

#[test]
fn test_copy_then_paste_between_instances() {
    let source_app = card_dispatcher();
    let mut target_app: ClipEgg<Element> = ClipEgg::new();
    let seen = recording_handler(&mut target_app);
    target_app.activate();

    let selection = text_in_card();
    let mut clipboard = MemoryClipboard::new();
    let mut copy = CopyEvent::new(Some(&selection), &mut clipboard);
    let copied = source_app.handle_copy(&mut copy).unwrap();
    assert!(copy.default_prevented());

    assert_eq!(copied.uri, "https://example.com/projects/42");
    assert_eq!(copied.kind, "project");
    assert_eq!(clipboard.write_count(), 4);
    assert_eq!(clipboard.get_data(MIME_URI_LIST), Some("https://example.com/projects/42"));
    assert_eq!(
        clipboard.get_data(MIME_PLAIN),
        Some("Project 42\nhttps://example.com/projects/42")
    );
    assert!(clipboard.get_data(MIME_HTML).unwrap().contains("<img src=\"https://example.com/thumbs/42.png\""));

    let mut paste = PasteEvent::new(&clipboard);
    let pasted = target_app.handle_paste(&mut paste).unwrap();
    assert!(paste.default_prevented());
    assert_eq!(pasted, copied);
    assert_eq!(*seen.lock().unwrap(), vec![copied]);
}

#[test]
fn test_first_matching_rule_wins() {
    let mut clipegg = card_dispatcher();
    clipegg.register(
        |_: &Element| true,
        |_: &Element| EggFields::new("https://example.com/anything", "Anything"),
    );

    let selection = text_in_card();
    let mut clipboard = MemoryClipboard::new();
    let egg = clipegg
        .handle_copy(&mut CopyEvent::new(Some(&selection), &mut clipboard))
        .unwrap();
    assert_eq!(egg.label, "Project 42");

    let outside = Element::new("span").inside(Element::new("body"));
    let mut clipboard = MemoryClipboard::new();
    let egg = clipegg
        .handle_copy(&mut CopyEvent::new(Some(&outside), &mut clipboard))
        .unwrap();
    assert_eq!(egg.label, "Anything");
    assert_eq!(egg.kind, "unknown");
}

#[test]
fn test_unmatched_copy_is_untouched() {
    let clipegg = card_dispatcher();

    let outside = Element::new("span").inside(Element::new("body"));
    let mut clipboard = MemoryClipboard::new();
    let mut copy = CopyEvent::new(Some(&outside), &mut clipboard);
    assert!(clipegg.handle_copy(&mut copy).is_none());
    assert!(!copy.default_prevented());
    assert!(clipboard.is_empty());

    let mut clipboard = MemoryClipboard::new();
    let mut copy = CopyEvent::<Element>::new(None, &mut clipboard);
    assert!(clipegg.handle_copy(&mut copy).is_none());
    assert!(!copy.default_prevented());
    assert_eq!(clipboard.write_count(), 0);
}

#[test]
fn test_deactivated_instance_ignores_events() {
    let mut clipegg = card_dispatcher();
    let seen = recording_handler(&mut clipegg);
    clipegg.deactivate();
    assert!(!clipegg.is_active());

    let selection = text_in_card();
    let mut clipboard = MemoryClipboard::new();
    let mut copy = CopyEvent::new(Some(&selection), &mut clipboard);
    assert!(clipegg.handle_copy(&mut copy).is_none());
    assert!(!copy.default_prevented());
    assert!(clipboard.is_empty());

    let bundle = encode(&Egg::new("https://x", "X", EggOptions::new()));
    let mut paste = PasteEvent::new(&bundle);
    assert!(clipegg.handle_paste(&mut paste).is_none());
    assert!(!paste.default_prevented());
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_paste_from_plain_uri_clipboard() {
    let mut clipegg: ClipEgg<Element> = ClipEgg::new();
    let seen = recording_handler(&mut clipegg);
    clipegg.activate();

    let clipboard = MemoryClipboard::new()
        .with_data(MIME_URI_LIST, "  https://example.com/page \n")
        .with_data(MIME_PLAIN, "A page\nhttps://example.com/page");
    let mut paste = PasteEvent::new(&clipboard);
    let egg = clipegg.handle_paste(&mut paste).unwrap();

    assert!(paste.default_prevented());
    assert_eq!(egg.uri, "https://example.com/page");
    assert_eq!(egg.label, "A page");
    assert!(egg.is_uri_fallback());
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn test_malformed_payload_is_not_an_egg() {
    let mut clipegg: ClipEgg<Element> = ClipEgg::new();
    let seen = recording_handler(&mut clipegg);
    clipegg.activate();

    let clipboard = MemoryClipboard::new()
        .with_data(MIME_EGG, "{\"v\":1,\"uri\":")
        .with_data(MIME_URI_LIST, "https://example.com/page");
    let mut paste = PasteEvent::new(&clipboard);

    assert!(clipegg.handle_paste(&mut paste).is_none());
    assert!(!paste.default_prevented());
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_paste_without_handlers_keeps_default() {
    let clipegg = card_dispatcher();
    let bundle = encode(&Egg::new("https://x", "X", EggOptions::new()));

    let mut paste = PasteEvent::new(&bundle);
    let egg = clipegg.handle_paste(&mut paste).unwrap();
    assert_eq!(egg.uri, "https://x");
    assert!(!paste.default_prevented());
}

#[test]
fn test_copy_through_bundle_file() {
    let clipegg = card_dispatcher();
    let selection = text_in_card();
    let mut clipboard = MemoryClipboard::new();
    let copied = clipegg
        .handle_copy(&mut CopyEvent::new(Some(&selection), &mut clipboard))
        .unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bundle.json");
    write_bundle(&encode(&copied), std::fs::File::create(&path).unwrap(), true).unwrap();

    let restored = read_bundle(&path, 1024 * 1024).unwrap();
    assert_eq!(restored.into_map(), clipboard.into_map());

    let restored = read_bundle(&path, 1024 * 1024).unwrap();
    let mut paste = PasteEvent::new(&restored);
    assert_eq!(clipegg.handle_paste(&mut paste), Some(copied));
}
