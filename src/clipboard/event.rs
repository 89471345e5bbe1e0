//! Copy and paste events handed to [`ClipEgg`](super::ClipEgg) by the event layer.

use clipegg_core::{ClipboardPayload, FormatLookup};

/// A copy about to happen.
///
/// `S` is whatever the event layer calls an element: the thing the user's
/// selection is anchored in.
pub struct CopyEvent<'a, S: ?Sized> {
    source: Option<&'a S>,
    clipboard: &'a mut dyn ClipboardPayload,
    default_prevented: bool,
}

impl<'a, S: ?Sized> CopyEvent<'a, S> {
    /// Create a copy event writing into `clipboard`
    pub fn new(source: Option<&'a S>, clipboard: &'a mut dyn ClipboardPayload) -> Self {
        Self {
            source,
            clipboard,
            default_prevented: false,
        }
    }

    /// Element the selection is anchored in, if there is a selection
    pub fn source(&self) -> Option<&'a S> {
        self.source
    }

    /// Clipboard data being written by this copy
    pub fn clipboard_mut(&mut self) -> &mut (dyn ClipboardPayload + 'a) {
        &mut *self.clipboard
    }

    /// Suppress the platform's own copy behavior
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether [`prevent_default`](Self::prevent_default) was called
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl<S: ?Sized> std::fmt::Debug for CopyEvent<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CopyEvent")
            .field("has_source", &self.source.is_some())
            .field("default_prevented", &self.default_prevented)
            .finish()
    }
}

/// A paste about to happen
pub struct PasteEvent<'a> {
    clipboard: &'a dyn FormatLookup,
    default_prevented: bool,
}

impl<'a> PasteEvent<'a> {
    /// Create a paste event reading from `clipboard`
    pub fn new(clipboard: &'a dyn FormatLookup) -> Self {
        Self {
            clipboard,
            default_prevented: false,
        }
    }

    /// Clipboard data being pasted
    pub fn clipboard(&self) -> &'a dyn FormatLookup {
        self.clipboard
    }

    /// Suppress the platform's own paste behavior
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether [`prevent_default`](Self::prevent_default) was called
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl std::fmt::Debug for PasteEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasteEvent")
            .field("default_prevented", &self.default_prevented)
            .finish()
    }
}
