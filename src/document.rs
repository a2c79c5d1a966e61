//! The Markdown text being edited
//!
//! A `DocumentSource` lives only for the session. It is owned by the
//! application state and handed to the renderer and export actions by
//! reference.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// The current Markdown source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSource {
    text: String,
}

impl DocumentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Mutable access for text widgets that edit in place.
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    /// Export actions are unavailable while this is true.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of characters (not bytes).
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Hash of the current text, for change detection.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.text.hash(&mut hasher);
        hasher.finish()
    }
}

impl From<&str> for DocumentSource {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl From<String> for DocumentSource {
    fn from(text: String) -> Self {
        Self { text }
    }
}
