//! Application state
//!
//! Holds the document being converted, user settings and transient UI
//! state. Rendering and export live elsewhere; this module only tracks data
//! and knows when settings need to be written back to disk.

use log::{debug, info, warn};

use crate::config::{load_config, save_config_silent, Settings};
use crate::document::DocumentSource;
use crate::ui::ToastQueue;

/// Transient UI state that is never persisted.
#[derive(Debug, Default)]
pub struct UiState {
    /// Whether the settings window is open
    pub show_settings: bool,
    /// Visible notifications
    pub toasts: ToastQueue,
}

/// Central application state.
#[derive(Debug)]
pub struct AppState {
    /// The Markdown text in the editor pane
    pub document: DocumentSource,
    pub settings: Settings,
    pub ui: UiState,
    settings_dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl AppState {
    /// Create state from the settings stored on disk.
    pub fn new() -> Self {
        let settings = load_config();
        info!("AppState initialized with settings");
        debug!(
            "Theme: {:?}, Preview mode: {:?}",
            settings.theme, settings.preview_mode
        );
        Self::with_settings(settings)
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            document: DocumentSource::new(),
            settings,
            ui: UiState::default(),
            settings_dirty: false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────

    pub fn mark_settings_dirty(&mut self) {
        self.settings_dirty = true;
    }

    pub fn is_settings_dirty(&self) -> bool {
        self.settings_dirty
    }

    /// Replace all settings with defaults.
    pub fn reset_settings(&mut self) {
        self.settings = Settings::default();
        self.settings_dirty = true;
    }

    /// Toggle between the formatted and HTML preview.
    pub fn toggle_preview_mode(&mut self) {
        self.settings.preview_mode = self.settings.preview_mode.toggle();
        self.settings_dirty = true;
    }

    /// Write settings to disk if they changed.
    ///
    /// Returns `true` if settings were saved.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if self.is_settings_dirty() {
            self.settings.sanitize();
            if save_config_silent(&self.settings) {
                self.settings_dirty = false;
                info!("Settings saved");
                return true;
            }
            warn!("Failed to save settings");
        }
        false
    }

    // ─────────────────────────────────────────────────────────────────────────
    // UI
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle_settings(&mut self) {
        self.ui.show_settings = !self.ui.show_settings;
    }

    /// Advance toast timers.
    pub fn update_toasts(&mut self, current_time: f64) {
        self.ui.toasts.update(current_time);
    }

    /// Persist anything outstanding before the application exits.
    pub fn shutdown(&mut self) {
        self.save_settings_if_dirty();
        info!("AppState shutdown complete");
    }
}
