//! ClipEgg dispatcher
//!
//! Connects the event layer to the protocol core. On copy, the first
//! registered rule whose matcher locates a target from the selection's element
//! hands that target to its extractor; the egg is built from the extracted
//! fields and written to the clipboard. On paste, the
//! clipboard is decoded and every paste handler sees the egg.
//!
//! There is no process-wide instance: the embedder constructs a [`ClipEgg`],
//! registers rules and handlers, calls [`activate`](ClipEgg::activate) and
//! routes its copy/paste events through [`handle_copy`](ClipEgg::handle_copy)
//! and [`handle_paste`](ClipEgg::handle_paste).

use std::sync::Arc;

use clipegg_core::{decode_with_clock, write_egg, Clock, Egg, EggOptions, SystemClock};
use tracing::{debug, info};

use super::event::{CopyEvent, PasteEvent};

/// Raw egg fields produced by an [`Extractor`]
#[derive(Debug, Clone, PartialEq)]
pub struct EggFields {
    /// The referenced resource
    pub uri: String,

    /// Display text
    pub label: String,

    /// Optional type, thumbnail and metadata
    pub options: EggOptions,
}

impl EggFields {
    /// Fields with default options
    pub fn new(uri: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            label: label.into(),
            options: EggOptions::default(),
        }
    }

    /// Replace the options
    pub fn with_options(mut self, options: EggOptions) -> Self {
        self.options = options;
        self
    }
}

/// Decides whether a copy rule applies to an element, and to which part of it.
///
/// The returned target is what the rule's [`Extractor`] sees. A plain
/// `Fn(&S) -> bool` closure targets the element itself; wrap a lookup such as
/// "nearest enclosing card" in [`locate`] to hand the extractor the element it
/// found.
pub trait Matcher<S: ?Sized>: Send + Sync {
    /// The element the rule applies to, if any
    fn target<'s>(&self, source: &'s S) -> Option<&'s S>;
}

impl<S: ?Sized, F> Matcher<S> for F
where
    F: Fn(&S) -> bool + Send + Sync,
{
    fn target<'s>(&self, source: &'s S) -> Option<&'s S> {
        self(source).then_some(source)
    }
}

/// Matcher built from a lookup closure, see [`locate`]
#[derive(Debug, Clone, Copy)]
pub struct Locate<F>(F);

/// Match with a lookup that returns the target element.
///
/// ```
/// use clipegg::clipboard::{locate, ClipEgg, EggFields};
///
/// let mut clipegg: ClipEgg<str> = ClipEgg::new();
/// clipegg.register(
///     locate(|s: &str| s.strip_prefix("link:")),
///     |uri: &str| EggFields::new(uri, "Link"),
/// );
/// ```
pub fn locate<S: ?Sized, F>(lookup: F) -> Locate<F>
where
    F: for<'s> Fn(&'s S) -> Option<&'s S> + Send + Sync,
{
    Locate(lookup)
}

impl<S: ?Sized, F> Matcher<S> for Locate<F>
where
    F: for<'s> Fn(&'s S) -> Option<&'s S> + Send + Sync,
{
    fn target<'s>(&self, source: &'s S) -> Option<&'s S> {
        (self.0)(source)
    }
}

/// Turns a matched element into egg fields
pub trait Extractor<S: ?Sized>: Send + Sync {
    /// Extract the reference carried by the matched `target`
    fn extract(&self, target: &S) -> EggFields;
}

impl<S: ?Sized, F> Extractor<S> for F
where
    F: Fn(&S) -> EggFields + Send + Sync,
{
    fn extract(&self, target: &S) -> EggFields {
        self(target)
    }
}

/// Observer notified of every pasted egg
pub type PasteHandler = Box<dyn Fn(&Egg, &PasteEvent<'_>) + Send + Sync>;

struct CopyRule<S: ?Sized> {
    matcher: Box<dyn Matcher<S>>,
    extractor: Box<dyn Extractor<S>>,
}

/// Copy/paste interception for the clipboard egg protocol
pub struct ClipEgg<S: ?Sized> {
    /// Copy rules, consulted in registration order
    rules: Vec<CopyRule<S>>,

    /// Paste observers, called in registration order
    paste_handlers: Vec<PasteHandler>,

    /// Whether events are being intercepted
    active: bool,

    /// Timestamp source for new eggs
    clock: Arc<dyn Clock>,
}

impl<S: ?Sized> ClipEgg<S> {
    /// Create an inactive instance with no rules or handlers
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an instance stamping eggs with `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            rules: Vec::new(),
            paste_handlers: Vec::new(),
            active: false,
            clock,
        }
    }

    /// Register a copy rule.
    ///
    /// Rules are tried in registration order and the first match wins.
    /// Registering a second rule with an equivalent matcher does not replace
    /// the first; the earlier one keeps winning.
    pub fn register<M, E>(&mut self, matcher: M, extractor: E) -> &mut Self
    where
        M: Matcher<S> + 'static,
        E: Extractor<S> + 'static,
    {
        self.rules.push(CopyRule {
            matcher: Box::new(matcher),
            extractor: Box::new(extractor),
        });
        self
    }

    /// Register a paste handler
    pub fn on_paste<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&Egg, &PasteEvent<'_>) + Send + Sync + 'static,
    {
        self.paste_handlers.push(Box::new(handler));
        self
    }

    /// Start intercepting copy and paste events
    pub fn activate(&mut self) -> &mut Self {
        if !self.active {
            info!(
                "ClipEgg activated ({} copy rules, {} paste handlers)",
                self.rules.len(),
                self.paste_handlers.len()
            );
        }
        self.active = true;
        self
    }

    /// Stop intercepting copy and paste events
    pub fn deactivate(&mut self) -> &mut Self {
        if self.active {
            info!("ClipEgg deactivated");
        }
        self.active = false;
        self
    }

    /// Whether events are being intercepted
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of registered copy rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Number of registered paste handlers
    pub fn paste_handler_count(&self) -> usize {
        self.paste_handlers.len()
    }

    /// Handle a copy event.
    ///
    /// Returns the egg written to the clipboard, or `None` when the instance is
    /// inactive, there is no selection, or no rule matches; in those cases the
    /// event is left untouched.
    pub fn handle_copy(&self, event: &mut CopyEvent<'_, S>) -> Option<Egg> {
        if !self.active {
            return None;
        }

        let source = event.source()?;
        let (rule, target) = self
            .rules
            .iter()
            .find_map(|rule| rule.matcher.target(source).map(|target| (rule, target)))?;

        let EggFields { uri, label, options } = rule.extractor.extract(target);
        let egg = Egg::with_clock(uri, label, options, self.clock.as_ref());

        event.prevent_default();
        write_egg(&egg, event.clipboard_mut());

        debug!(uri = %egg.uri, kind = %egg.kind, "ClipEgg: copied");
        Some(egg)
    }

    /// Handle a paste event.
    ///
    /// Decodes the clipboard. When an egg is found and at least one paste
    /// handler is registered, the default paste is prevented and every handler
    /// runs, in registration order. Returns the decoded egg.
    pub fn handle_paste(&self, event: &mut PasteEvent<'_>) -> Option<Egg> {
        if !self.active {
            return None;
        }

        let egg = decode_with_clock(event.clipboard(), self.clock.as_ref())?;

        if !self.paste_handlers.is_empty() {
            event.prevent_default();
            for handler in &self.paste_handlers {
                handler(&egg, &*event);
            }
            debug!(uri = %egg.uri, kind = %egg.kind, "ClipEgg: pasted");
        }

        Some(egg)
    }
}

impl<S: ?Sized> Default for ClipEgg<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized> std::fmt::Debug for ClipEgg<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipEgg")
            .field("rules", &self.rules.len())
            .field("paste_handlers", &self.paste_handlers.len())
            .field("active", &self.active)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipegg_core::{FormatLookup, MemoryClipboard, MIME_EGG, MIME_URI_LIST};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedClock(u64);

    impl Clock for FixedClock {
        fn now_millis(&self) -> u64 {
            self.0
        }
    }

    fn link_rule(clipegg: &mut ClipEgg<str>) {
        clipegg.register(
            |source: &str| source.starts_with("link:"),
            |source: &str| EggFields::new(&source["link:".len()..], "Link"),
        );
    }

    #[test]
    fn test_register_and_chain() {
        let mut clipegg: ClipEgg<str> = ClipEgg::new();
        clipegg
            .register(|_: &str| true, |_: &str| EggFields::new("a", "A"))
            .register(|_: &str| false, |_: &str| EggFields::new("b", "B"))
            .on_paste(|_, _| {})
            .activate();

        assert_eq!(clipegg.rule_count(), 2);
        assert_eq!(clipegg.paste_handler_count(), 1);
        assert!(clipegg.is_active());

        clipegg.deactivate();
        assert!(!clipegg.is_active());
    }

    #[test]
    fn test_copy_when_inactive_is_noop() {
        let mut clipegg: ClipEgg<str> = ClipEgg::new();
        link_rule(&mut clipegg);

        let mut clipboard = MemoryClipboard::new();
        let mut event = CopyEvent::new(Some("link:https://x"), &mut clipboard);

        assert_eq!(clipegg.handle_copy(&mut event), None);
        assert!(!event.default_prevented());
        assert!(clipboard.is_empty());
    }

    #[test]
    fn test_copy_without_selection() {
        let mut clipegg: ClipEgg<str> = ClipEgg::new();
        link_rule(&mut clipegg);
        clipegg.activate();

        let mut clipboard = MemoryClipboard::new();
        let mut event = CopyEvent::<str>::new(None, &mut clipboard);

        assert_eq!(clipegg.handle_copy(&mut event), None);
        assert!(!event.default_prevented());
    }

    #[test]
    fn test_copy_writes_egg() {
        let mut clipegg: ClipEgg<str> = ClipEgg::with_clock(Arc::new(FixedClock(99)));
        link_rule(&mut clipegg);
        clipegg.activate();

        let mut clipboard = MemoryClipboard::new();
        let mut event = CopyEvent::new(Some("link:https://test.com"), &mut clipboard);
        let egg = clipegg.handle_copy(&mut event).unwrap();

        assert!(event.default_prevented());
        assert_eq!(egg.uri, "https://test.com");
        assert_eq!(egg.timestamp, 99);
        assert_eq!(clipboard.write_count(), 4);
        assert_eq!(clipboard.get_data(MIME_URI_LIST), Some("https://test.com"));
    }

    #[test]
    fn test_extractor_receives_located_target() {
        let mut clipegg: ClipEgg<str> = ClipEgg::with_clock(Arc::new(FixedClock(5)));
        clipegg
            .register(locate(|s: &str| s.strip_prefix("link:")), |target: &str| {
                EggFields::new(target, target.len().to_string())
            })
            .activate();

        let mut clipboard = MemoryClipboard::new();
        let mut event = CopyEvent::new(Some("link:https://a.b"), &mut clipboard);
        let egg = clipegg.handle_copy(&mut event).unwrap();

        assert_eq!(egg.uri, "https://a.b");
        assert_eq!(egg.label, "11");
        assert!(event.default_prevented());

        let mut clipboard = MemoryClipboard::new();
        let mut event = CopyEvent::new(Some("https://a.b"), &mut clipboard);
        assert_eq!(clipegg.handle_copy(&mut event), None);
        assert!(!event.default_prevented());
    }

    #[test]
    fn test_first_match_wins() {
        let mut clipegg: ClipEgg<str> = ClipEgg::new();
        clipegg
            .register(|s: &str| s.contains("card"), |_: &str| EggFields::new("https://first", "first"))
            .register(|s: &str| s.contains("card"), |_: &str| EggFields::new("https://second", "second"))
            .activate();

        let mut clipboard = MemoryClipboard::new();
        let mut event = CopyEvent::new(Some("card"), &mut clipboard);

        assert_eq!(clipegg.handle_copy(&mut event).unwrap().label, "first");
    }

    #[test]
    fn test_copy_no_matching_rule() {
        let mut clipegg: ClipEgg<str> = ClipEgg::new();
        link_rule(&mut clipegg);
        clipegg.activate();

        let mut clipboard = MemoryClipboard::new();
        let mut event = CopyEvent::new(Some("plain text"), &mut clipboard);

        assert_eq!(clipegg.handle_copy(&mut event), None);
        assert!(!event.default_prevented());
        assert!(clipboard.is_empty());
    }

    #[test]
    fn test_paste_invokes_handlers_in_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let first_seen = Arc::new(AtomicUsize::new(usize::MAX));
        let second_seen = Arc::new(AtomicUsize::new(usize::MAX));

        let mut clipegg: ClipEgg<str> = ClipEgg::new();
        {
            let (calls, seen) = (calls.clone(), first_seen.clone());
            clipegg.on_paste(move |egg, event| {
                assert_eq!(egg.uri, "https://example.com");
                assert!(event.default_prevented());
                seen.store(calls.fetch_add(1, Ordering::SeqCst), Ordering::SeqCst);
            });
        }
        {
            let (calls, seen) = (calls.clone(), second_seen.clone());
            clipegg.on_paste(move |_, _| {
                seen.store(calls.fetch_add(1, Ordering::SeqCst), Ordering::SeqCst);
            });
        }
        clipegg.activate();

        let copied = Egg::new("https://example.com", "Example", EggOptions::new());
        let mut clipboard = MemoryClipboard::new();
        write_egg(&copied, &mut clipboard);

        let mut event = PasteEvent::new(&clipboard);
        let pasted = clipegg.handle_paste(&mut event);

        assert_eq!(pasted, Some(copied));
        assert!(event.default_prevented());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(first_seen.load(Ordering::SeqCst), 0);
        assert_eq!(second_seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_paste_without_egg() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut clipegg: ClipEgg<str> = ClipEgg::new();
        {
            let calls = calls.clone();
            clipegg.on_paste(move |_, _| {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }
        clipegg.activate();

        let clipboard = MemoryClipboard::new();
        let mut event = PasteEvent::new(&clipboard);

        assert_eq!(clipegg.handle_paste(&mut event), None);
        assert!(!event.default_prevented());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_paste_malformed_egg_skips_handlers() {
        let mut clipegg: ClipEgg<str> = ClipEgg::new();
        clipegg.on_paste(|_, _| panic!("handler must not run")).activate();

        let clipboard = MemoryClipboard::new()
            .with_data(MIME_EGG, "{not json")
            .with_data(MIME_URI_LIST, "https://x");
        let mut event = PasteEvent::new(&clipboard);

        assert_eq!(clipegg.handle_paste(&mut event), None);
        assert!(!event.default_prevented());
    }

    #[test]
    fn test_paste_without_handlers_keeps_default() {
        let mut clipegg: ClipEgg<str> = ClipEgg::new();
        clipegg.activate();

        let clipboard = MemoryClipboard::new().with_data(MIME_URI_LIST, "https://x");
        let mut event = PasteEvent::new(&clipboard);

        assert!(clipegg.handle_paste(&mut event).is_some());
        assert!(!event.default_prevented());
        assert!(clipboard.get_data(MIME_URI_LIST).is_some());
    }
}
