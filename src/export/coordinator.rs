//! Export actions: copy to clipboard and download as a Word document
//!
//! The coordinator owns no UI. It renders the current source, talks to the
//! clipboard or downloader it is handed, and reports the result through a
//! [`Notifier`]. Every action on an empty source is a no-op.

use std::path::PathBuf;

use log::{debug, info, warn};

use super::clipboard::{ClipboardBackend, ClipboardError};
use super::document::{DocumentPayload, DEFAULT_FILE_NAME};
use super::download::{DownloadError, Downloader, SaveOutcome};
use super::notify::{Notification, Notifier};
use crate::document::DocumentSource;
use crate::markdown::{
    html_text_content, ComrakConverter, MarkdownConverter, MarkdownOptions, Renderer,
};

/// Result of a copy action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Source was empty, nothing happened
    Skipped,
    /// HTML and plain-text flavors were placed on the clipboard
    Rich,
    /// Rich copy failed; the raw Markdown was copied instead
    PlainText,
    /// Both copy attempts failed
    Failed(ClipboardError),
}

/// Result of a download action.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// Source was empty, nothing happened
    Skipped,
    Saved(PathBuf),
    Cancelled,
    Failed(DownloadError),
}

/// Runs export actions against the current document.
#[derive(Debug, Clone)]
pub struct ExportCoordinator<C = ComrakConverter> {
    renderer: Renderer<C>,
    file_name: String,
}

impl ExportCoordinator {
    /// Create a coordinator using comrak with the given options.
    pub fn new(options: MarkdownOptions, file_name: impl Into<String>) -> Self {
        Self::with_renderer(Renderer::new(options), file_name)
    }
}

impl Default for ExportCoordinator {
    fn default() -> Self {
        Self::new(MarkdownOptions::default(), DEFAULT_FILE_NAME)
    }
}

impl<C: MarkdownConverter> ExportCoordinator<C> {
    pub fn with_renderer(renderer: Renderer<C>, file_name: impl Into<String>) -> Self {
        Self {
            renderer,
            file_name: file_name.into(),
        }
    }

    pub fn renderer(&self) -> &Renderer<C> {
        &self.renderer
    }

    /// Render the source and package it as a Word-compatible document.
    pub fn build_payload(&self, source: &DocumentSource) -> DocumentPayload {
        DocumentPayload::word_document(&self.renderer.render(source.as_str()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Copy
    // ─────────────────────────────────────────────────────────────────────────

    /// Copy the rendered document to the clipboard.
    ///
    /// Tries a rich copy first (HTML plus its text content). If that fails,
    /// the raw Markdown is copied as plain text. Exactly one notification is
    /// raised unless the source is empty.
    pub fn copy<B, N>(
        &self,
        source: &DocumentSource,
        clipboard: &mut B,
        notifier: &mut N,
    ) -> CopyOutcome
    where
        B: ClipboardBackend + ?Sized,
        N: Notifier + ?Sized,
    {
        if source.is_empty() {
            debug!("Copy skipped: document is empty");
            return CopyOutcome::Skipped;
        }

        let html = self.renderer.render(source.as_str());
        let plain_text = html_text_content(&html);

        let rich_err = match clipboard.write_rich(&html, &plain_text) {
            Ok(()) => {
                info!("Copied {} bytes of HTML to clipboard", html.len());
                notifier.notify(Notification::new(
                    "Copied to clipboard",
                    "The converted text has been copied to your clipboard.",
                ));
                return CopyOutcome::Rich;
            }
            Err(e) => e,
        };

        warn!("Rich copy failed, falling back to plain text: {}", rich_err);

        match clipboard.write_plain(source.as_str()) {
            Ok(()) => {
                notifier.notify(Notification::new(
                    "Copied as plain text",
                    "Formatting could not be copied, so the Markdown text was copied instead.",
                ));
                CopyOutcome::PlainText
            }
            Err(e) => {
                warn!("Plain-text copy failed: {}", e);
                notifier.notify(Notification::destructive(
                    "Copy failed",
                    format!("Could not copy to the clipboard: {}", e),
                ));
                CopyOutcome::Failed(e)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Download
    // ─────────────────────────────────────────────────────────────────────────

    /// Save the rendered document as a `.doc` file.
    ///
    /// The staged reference is released exactly once whatever the outcome.
    pub fn download<D, N>(
        &self,
        source: &DocumentSource,
        downloader: &mut D,
        notifier: &mut N,
    ) -> DownloadOutcome
    where
        D: Downloader + ?Sized,
        N: Notifier + ?Sized,
    {
        if source.is_empty() {
            debug!("Download skipped: document is empty");
            return DownloadOutcome::Skipped;
        }

        let payload = self.build_payload(source);

        match self.save_payload(&payload, downloader) {
            Ok(SaveOutcome::Saved(path)) => {
                info!("Saved document to {}", path.display());
                notifier.notify(Notification::new(
                    "Document downloaded",
                    "Your Word document has been downloaded successfully.",
                ));
                DownloadOutcome::Saved(path)
            }
            Ok(SaveOutcome::Cancelled) => {
                debug!("Download cancelled by user");
                notifier.notify(Notification::new(
                    "Download cancelled",
                    "The document was not saved.",
                ));
                DownloadOutcome::Cancelled
            }
            Err(e) => {
                warn!("Download failed: {}", e);
                notifier.notify(Notification::destructive(
                    "Download failed",
                    format!("The document could not be saved: {}", e),
                ));
                DownloadOutcome::Failed(e)
            }
        }
    }

    fn save_payload<D>(
        &self,
        payload: &DocumentPayload,
        downloader: &mut D,
    ) -> Result<SaveOutcome, DownloadError>
    where
        D: Downloader + ?Sized,
    {
        let reference = downloader.create_reference(payload)?;
        let outcome = downloader.save_as(&reference, &self.file_name);
        downloader.release(reference);
        outcome
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
