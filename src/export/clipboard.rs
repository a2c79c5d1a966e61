//! Clipboard Operations
//!
//! This module provides cross-platform clipboard writing using the arboard
//! crate. Rich copies place an HTML flavor and a plain-text flavor on the
//! clipboard together, so the paste target picks whichever it understands.

// - enum_variant_names: Error variants follow standard naming convention
#![allow(clippy::enum_variant_names)]

use arboard::Clipboard;
use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during clipboard operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// The system clipboard could not be opened
    Unavailable(String),
    /// Failed to set clipboard content
    WriteError(String),
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardError::Unavailable(msg) => write!(f, "Clipboard unavailable: {}", msg),
            ClipboardError::WriteError(msg) => write!(f, "Clipboard write error: {}", msg),
        }
    }
}

impl std::error::Error for ClipboardError {}

impl From<arboard::Error> for ClipboardError {
    fn from(err: arboard::Error) -> Self {
        ClipboardError::WriteError(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Backend
// ─────────────────────────────────────────────────────────────────────────────

/// Destination for copied content.
pub trait ClipboardBackend {
    /// Place formatted content on the clipboard, with `plain_text` as the
    /// representation for targets that don't accept HTML.
    fn write_rich(&mut self, html: &str, plain_text: &str) -> Result<(), ClipboardError>;

    /// Place plain text on the clipboard.
    fn write_plain(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The operating system clipboard.
///
/// The arboard handle is opened on first use and kept for the lifetime of
/// the application; on X11 and Wayland the clipboard contents are served by
/// the process that owns the handle.
#[derive(Default)]
pub struct SystemClipboard {
    clipboard: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut Clipboard, ClipboardError> {
        if self.clipboard.is_none() {
            debug!("Opening system clipboard");
            let clipboard =
                Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.clipboard = Some(clipboard);
        }

        self.clipboard
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("clipboard not initialized".to_string()))
    }
}

impl ClipboardBackend for SystemClipboard {
    fn write_rich(&mut self, html: &str, plain_text: &str) -> Result<(), ClipboardError> {
        self.handle()?.set_html(html, Some(plain_text))?;
        Ok(())
    }

    fn write_plain(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.handle()?.set_text(text)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipboard_error_display() {
        let err = ClipboardError::Unavailable("no display".to_string());
        assert!(err.to_string().contains("no display"));

        let err = ClipboardError::WriteError("write failed".to_string());
        assert!(err.to_string().contains("write failed"));
    }

    #[test]
    fn test_arboard_error_conversion() {
        let err: ClipboardError = arboard::Error::ContentNotAvailable.into();
        assert!(matches!(err, ClipboardError::WriteError(_)));
    }

    // Note: Actual clipboard tests require a display/clipboard context
    // which isn't typically available in CI environments.
}
