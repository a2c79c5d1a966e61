//! Document Export Module
//!
//! This module turns the current Markdown document into something that can
//! leave the application: formatted clipboard content or a Word-compatible
//! `.doc` file.
//!
//! # Architecture
//!
//! - `coordinator.rs` - Copy and download actions with user notifications
//! - `document.rs` - Word document packaging (HTML shell, MIME type)
//! - `clipboard.rs` - Platform clipboard operations
//! - `download.rs` - Staging and saving document files
//! - `notify.rs` - Notification types shared with the UI

mod clipboard;
mod coordinator;
mod document;
mod download;
mod notify;

pub use clipboard::SystemClipboard;
pub use coordinator::{DownloadOutcome, ExportCoordinator};
pub use document::DEFAULT_FILE_NAME;
pub use download::{DialogDownloader, DirectoryDownloader, DownloadError};
pub use notify::{Notification, Notifier, Severity};
