//! User settings and preferences for mdword
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::export::DEFAULT_FILE_NAME;
use crate::markdown::MarkdownOptions;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    /// Get the display label for the theme.
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }

    /// Get all available themes.
    pub fn all() -> &'static [Theme] {
        &[Theme::Light, Theme::Dark, Theme::System]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preview Mode Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// What the preview pane shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    /// Formatted document, as a word processor would show it
    #[default]
    Formatted,
    /// The rendered HTML markup
    Html,
}

impl PreviewMode {
    /// Toggle between Formatted and Html.
    pub fn toggle(&self) -> Self {
        match self {
            PreviewMode::Formatted => PreviewMode::Html,
            PreviewMode::Html => PreviewMode::Formatted,
        }
    }

    /// Get a display label for the mode.
    pub fn label(&self) -> &'static str {
        match self {
            PreviewMode::Formatted => "Formatted",
            PreviewMode::Html => "HTML",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    /// Window X position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Window Y position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    /// Whether the window was maximized
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            x: None,
            y: None,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and application settings.
///
/// Serialized to JSON in the user's config directory. The Markdown source
/// itself is never part of the settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    /// Color theme (light, dark, or system)
    pub theme: Theme,

    /// Font size for the editor and preview (in points)
    pub font_size: f32,

    /// What the preview pane shows
    pub preview_mode: PreviewMode,

    // ─────────────────────────────────────────────────────────────────────────
    // Window State
    // ─────────────────────────────────────────────────────────────────────────
    /// Window size and position
    pub window_size: WindowSize,

    /// Share of the window width given to the editor pane
    pub split_ratio: f32,

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────
    /// Markdown extensions passed to the renderer
    pub markdown: MarkdownOptions,

    // ─────────────────────────────────────────────────────────────────────────
    // Download Settings
    // ─────────────────────────────────────────────────────────────────────────
    /// File name given to downloaded documents
    pub download_file_name: String,

    /// Whether to show a save dialog instead of saving into the download directory
    pub ask_download_location: bool,

    /// Download directory override (None = the platform Downloads folder)
    pub download_directory: Option<PathBuf>,

    /// Whether to open the document after it has been saved
    pub open_after_download: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Appearance
            theme: Theme::default(),
            font_size: 14.0,
            preview_mode: PreviewMode::default(),

            // Window State
            window_size: WindowSize::default(),
            split_ratio: 0.5,

            // Rendering
            markdown: MarkdownOptions::default(),

            // Download Settings
            download_file_name: DEFAULT_FILE_NAME.to_string(),
            ask_download_location: false,
            download_directory: None,
            open_after_download: false,
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum allowed font size.
    pub const MIN_FONT_SIZE: f32 = 8.0;
    /// Maximum allowed font size.
    pub const MAX_FONT_SIZE: f32 = 72.0;
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;
    /// Minimum editor share of the window.
    pub const MIN_SPLIT_RATIO: f32 = 0.2;
    /// Maximum editor share of the window.
    pub const MAX_SPLIT_RATIO: f32 = 0.8;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        self.split_ratio = self
            .split_ratio
            .clamp(Self::MIN_SPLIT_RATIO, Self::MAX_SPLIT_RATIO);

        self.download_file_name = sanitize_file_name(&self.download_file_name);
    }

    /// Load settings and sanitize them to ensure validity.
    pub fn from_json_sanitized(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Resolve the directory downloads are written to, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `Error::DownloadDirNotFound` if no override is set and the
    /// platform has no Downloads folder, or `Error::DownloadDirCreate` if the
    /// folder can't be created.
    pub fn resolve_download_dir(&self) -> Result<PathBuf> {
        let dir = self
            .download_directory
            .clone()
            .or_else(dirs::download_dir)
            .ok_or(Error::DownloadDirNotFound)?;

        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|source| Error::DownloadDirCreate {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(dir)
    }
}

/// Normalize a user-supplied download file name.
///
/// Path separators are replaced, blank names fall back to the default and
/// a missing `.doc` extension is appended.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();

    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        return DEFAULT_FILE_NAME.to_string();
    }

    if cleaned.to_ascii_lowercase().ends_with(".doc") {
        cleaned.to_string()
    } else {
        format!("{}.doc", cleaned)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
