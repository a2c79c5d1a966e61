//! Main application module
//!
//! This module implements the eframe App trait: the editor and preview
//! panes, the copy and download actions, keyboard shortcuts, and window
//! state persistence.

use crate::config::{PreviewMode, Settings, WindowSize};
use crate::document::DocumentSource;
use crate::export::{
    DialogDownloader, DirectoryDownloader, DownloadError, DownloadOutcome, ExportCoordinator,
    Notification, Notifier, SystemClipboard,
};
use crate::preview::MarkdownPreview;
use crate::state::AppState;
use crate::theme::{Palette, ThemeManager};
use crate::ui::SettingsPanel;
use eframe::egui::{self, FontId, RichText};
use log::{debug, info, warn};

/// Window and header title.
pub const APP_TITLE: &str = "Markdown to Word Converter";

/// Shown in the editor while it is empty.
const EDITOR_PLACEHOLDER: &str = "Enter your markdown text here...";

/// Keyboard shortcut actions that need to be deferred.
///
/// These actions are detected in the input handling closure and executed
/// afterwards to avoid borrow conflicts.
#[derive(Debug, Clone, Copy)]
enum KeyboardAction {
    /// Copy the converted document (Ctrl+Shift+C)
    Copy,
    /// Download as Word document (Ctrl+S)
    Download,
    /// Switch between formatted and HTML preview (Ctrl+E)
    TogglePreviewMode,
    /// Open settings panel (Ctrl+,)
    OpenSettings,
}

/// The main application struct that holds all state and implements eframe::App.
pub struct MdwordApp {
    state: AppState,
    theme_manager: ThemeManager,
    settings_panel: SettingsPanel,
    preview: MarkdownPreview,
    exporter: ExportCoordinator,
    clipboard: SystemClipboard,
    /// OS dark mode preference, when the windowing integration reports one
    system_dark: Option<bool>,
    /// Last known window size (for detecting changes)
    last_window_size: Option<egui::Vec2>,
    /// Last known window position (for detecting changes)
    last_window_pos: Option<egui::Pos2>,
    /// Application start time for timing toast messages
    start_time: std::time::Instant,
}

impl MdwordApp {
    /// Create the application from the stored settings.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        info!("Initializing {}", APP_TITLE);

        let state = AppState::new();

        let system_dark = system_dark(cc.integration_info.system_theme);
        let mut theme_manager = ThemeManager::new(state.settings.theme);
        theme_manager.apply(&cc.egui_ctx, system_dark);
        info!("Applied initial theme: {:?}", state.settings.theme);

        let preview = MarkdownPreview::new(state.settings.markdown.clone());
        let exporter = exporter_for(&state.settings);

        Self {
            state,
            theme_manager,
            settings_panel: SettingsPanel::new(),
            preview,
            exporter,
            clipboard: SystemClipboard::new(),
            system_dark,
            last_window_size: None,
            last_window_pos: None,
            start_time: std::time::Instant::now(),
        }
    }

    /// Get elapsed time since app start in seconds.
    fn get_app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Update window size in settings if changed.
    fn update_window_state(&mut self, ctx: &egui::Context) {
        let mut changed = false;

        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                let current_size = rect.size();
                let current_pos = rect.min;

                let size_changed = self
                    .last_window_size
                    .map(|s| (s - current_size).length() > 1.0)
                    .unwrap_or(true);
                let pos_changed = self
                    .last_window_pos
                    .map(|p| (p - current_pos).length() > 1.0)
                    .unwrap_or(true);

                if size_changed || pos_changed {
                    self.last_window_size = Some(current_size);
                    self.last_window_pos = Some(current_pos);
                    changed = true;
                }
            }
        });

        if changed {
            if let (Some(size), Some(pos)) = (self.last_window_size, self.last_window_pos) {
                let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));

                self.state.settings.window_size = WindowSize {
                    width: size.x,
                    height: size.y,
                    x: Some(pos.x),
                    y: Some(pos.y),
                    maximized,
                };
                self.state.mark_settings_dirty();

                debug!(
                    "Window state updated: {}x{} at ({}, {}), maximized: {}",
                    size.x, size.y, pos.x, pos.y, maximized
                );
            }
        }
    }

    /// Rebuild components that depend on settings.
    fn apply_settings(&mut self, ctx: &egui::Context) {
        self.theme_manager.set_theme(self.state.settings.theme);
        self.theme_manager.apply(ctx, self.system_dark);
        self.preview.set_options(self.state.settings.markdown.clone());
        self.exporter = exporter_for(&self.state.settings);
        self.state.mark_settings_dirty();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Layout
    // ─────────────────────────────────────────────────────────────────────────

    fn render_ui(&mut self, ctx: &egui::Context) {
        let palette = Palette::for_visuals(&ctx.style().visuals);
        let has_content = !self.state.document.is_empty();
        let font_size = self.state.settings.font_size;

        // Header: title and export actions
        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(palette.surface)
                    .inner_margin(egui::Margin::symmetric(16.0, 10.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(APP_TITLE)
                            .size(20.0)
                            .strong()
                            .color(palette.heading),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("⚙").on_hover_text("Settings (Ctrl+,)").clicked() {
                            self.state.toggle_settings();
                        }

                        if ui
                            .add_enabled(has_content, egui::Button::new("📥 Download as Word"))
                            .on_hover_text("Save as a .doc file (Ctrl+S)")
                            .clicked()
                        {
                            self.handle_download();
                        }

                        if ui
                            .add_enabled(has_content, egui::Button::new("📋 Copy"))
                            .on_hover_text("Copy formatted text (Ctrl+Shift+C)")
                            .clicked()
                        {
                            self.handle_copy();
                        }
                    });
                });
            });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let document = &self.state.document;
                ui.label(
                    RichText::new(format!(
                        "{} characters · {} words",
                        document.char_count(),
                        document.word_count()
                    ))
                    .small()
                    .color(palette.text_muted),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mut mode = self.state.settings.preview_mode;
                    for option in [PreviewMode::Html, PreviewMode::Formatted] {
                        ui.selectable_value(&mut mode, option, option.label());
                    }
                    if mode != self.state.settings.preview_mode {
                        self.state.settings.preview_mode = mode;
                        self.state.mark_settings_dirty();
                    }
                    ui.label(RichText::new("Preview:").small().color(palette.text_muted));
                });
            });
        });

        // Editor pane
        let screen_width = ctx.screen_rect().width();
        let editor = egui::SidePanel::left("editor_pane")
            .resizable(true)
            .default_width(screen_width * self.state.settings.split_ratio)
            .width_range(
                screen_width * Settings::MIN_SPLIT_RATIO..=screen_width * Settings::MAX_SPLIT_RATIO,
            )
            .show(ctx, |ui| {
                ui.label(RichText::new("Markdown Input").strong());
                ui.add_space(4.0);

                egui::ScrollArea::vertical()
                    .id_source("editor_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.add_sized(
                            ui.available_size(),
                            egui::TextEdit::multiline(self.state.document.text_mut())
                                .hint_text(EDITOR_PLACEHOLDER)
                                .font(FontId::monospace(font_size))
                                .desired_width(f32::INFINITY)
                                .lock_focus(true),
                        );
                    });
            });

        if screen_width > 0.0 {
            let ratio = (editor.response.rect.width() / screen_width)
                .clamp(Settings::MIN_SPLIT_RATIO, Settings::MAX_SPLIT_RATIO);
            if (ratio - self.state.settings.split_ratio).abs() > 0.01 {
                self.state.settings.split_ratio = ratio;
                self.state.mark_settings_dirty();
            }
        }

        // Preview pane
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(RichText::new("Preview").strong());
            ui.add_space(4.0);
            self.preview.show(
                ui,
                &self.state.document,
                self.state.settings.preview_mode,
                self.exporter.renderer(),
                font_size,
            );
        });
    }

    fn render_dialogs(&mut self, ctx: &egui::Context) {
        if !self.state.ui.show_settings {
            return;
        }

        let is_dark = ctx.style().visuals.dark_mode;
        let output = self
            .settings_panel
            .show(ctx, &mut self.state.settings, is_dark);

        if output.changed {
            self.apply_settings(ctx);
        }

        if output.reset_requested {
            self.state.reset_settings();
            self.apply_settings(ctx);
            self.state
                .ui
                .toasts
                .notify(Notification::new("Settings reset to defaults", ""));
        }

        if output.close_requested {
            self.state.ui.show_settings = false;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Keyboard Shortcuts
    // ─────────────────────────────────────────────────────────────────────────

    /// Processes global keyboard shortcuts:
    /// - Ctrl+Shift+C: Copy converted document
    /// - Ctrl+S: Download as Word document
    /// - Ctrl+E: Toggle preview mode
    /// - Ctrl+,: Open settings
    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let action = ctx.input(|i| {
            // Ctrl+Shift+C: Copy (plain Ctrl+C stays with the text editor)
            if i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::C) {
                debug!("Keyboard shortcut: Ctrl+Shift+C (Copy)");
                return Some(KeyboardAction::Copy);
            }

            if i.modifiers.command && !i.modifiers.shift && i.key_pressed(egui::Key::S) {
                debug!("Keyboard shortcut: Ctrl+S (Download)");
                return Some(KeyboardAction::Download);
            }

            if i.modifiers.command && i.key_pressed(egui::Key::E) {
                debug!("Keyboard shortcut: Ctrl+E (Toggle Preview Mode)");
                return Some(KeyboardAction::TogglePreviewMode);
            }

            if i.modifiers.command && i.key_pressed(egui::Key::Comma) {
                debug!("Keyboard shortcut: Ctrl+, (Settings)");
                return Some(KeyboardAction::OpenSettings);
            }

            None
        });

        match action {
            Some(KeyboardAction::Copy) => self.handle_copy(),
            Some(KeyboardAction::Download) => self.handle_download(),
            Some(KeyboardAction::TogglePreviewMode) => self.state.toggle_preview_mode(),
            Some(KeyboardAction::OpenSettings) => self.state.toggle_settings(),
            None => {}
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export Handlers
    // ─────────────────────────────────────────────────────────────────────────

    /// Copy the converted document to the clipboard.
    fn handle_copy(&mut self) {
        if self.state.document.is_empty() {
            return;
        }

        let outcome = self.exporter.copy(
            &self.state.document,
            &mut self.clipboard,
            &mut self.state.ui.toasts,
        );
        debug!("Copy finished: {:?}", outcome);
    }

    /// Save the converted document as a `.doc` file.
    fn handle_download(&mut self) {
        let outcome = download_document(
            &self.exporter,
            &self.state.document,
            &self.state.settings,
            &mut self.state.ui.toasts,
        );
        debug!("Download finished: {:?}", outcome);

        if let DownloadOutcome::Saved(path) = outcome {
            if self.state.settings.open_after_download {
                if let Err(e) = open::that(&path) {
                    warn!("Failed to open downloaded document: {}", e);
                }
            }
        }
    }
}

/// Save `document` to the destination chosen by `settings`.
///
/// An empty document is skipped before any destination is resolved, so no
/// folder is created and nothing is reported.
fn download_document<N: Notifier>(
    exporter: &ExportCoordinator,
    document: &DocumentSource,
    settings: &Settings,
    notifier: &mut N,
) -> DownloadOutcome {
    if document.is_empty() {
        return DownloadOutcome::Skipped;
    }

    if settings.ask_download_location {
        let initial_dir = settings
            .download_directory
            .clone()
            .or_else(dirs::download_dir);
        let mut downloader = DialogDownloader::new(initial_dir);
        return exporter.download(document, &mut downloader, notifier);
    }

    match settings.resolve_download_dir() {
        Ok(dir) => {
            let mut downloader = DirectoryDownloader::new(dir);
            exporter.download(document, &mut downloader, notifier)
        }
        Err(e) => {
            warn!("No download directory: {}", e);
            notifier.notify(Notification::destructive(
                "Download failed",
                format!("{}. Choose a folder in Settings.", e),
            ));
            DownloadOutcome::Failed(DownloadError::NoDestination(e.to_string()))
        }
    }
}

/// Build the export coordinator for the current settings.
fn exporter_for(settings: &Settings) -> ExportCoordinator {
    ExportCoordinator::new(settings.markdown.clone(), settings.download_file_name.clone())
}

fn system_dark(theme: Option<eframe::Theme>) -> Option<bool> {
    theme.map(|t| t == eframe::Theme::Dark)
}

impl eframe::App for MdwordApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.system_dark = system_dark(frame.info().system_theme);

        // Apply theme if needed (handles System theme changes)
        self.theme_manager.apply_if_needed(ctx, self.system_dark);

        let current_time = self.get_app_time();
        self.state.update_toasts(current_time);

        self.update_window_state(ctx);

        self.render_ui(ctx);
        self.render_dialogs(ctx);

        // Handle keyboard shortcuts after render so the editor sees its input first
        self.handle_keyboard_shortcuts(ctx);

        self.state.ui.toasts.show(ctx);
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.state.shutdown();
    }

    /// Save persistent state.
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        debug!("Saving application state");
        self.state.save_settings_if_dirty();
    }

    /// Auto-save interval in seconds.
    fn auto_save_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(30)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn directory_settings(dir: &std::path::Path) -> Settings {
        Settings {
            ask_download_location: false,
            download_directory: Some(dir.to_path_buf()),
            ..Settings::default()
        }
    }

    #[test]
    fn test_empty_download_creates_no_folder() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("exports");
        let settings = directory_settings(&target);
        let mut notes: Vec<Notification> = Vec::new();

        let outcome = download_document(
            &exporter_for(&settings),
            &DocumentSource::new(),
            &settings,
            &mut notes,
        );

        assert!(matches!(outcome, DownloadOutcome::Skipped));
        assert!(!target.exists());
        assert!(notes.is_empty());
    }

    #[test]
    fn test_download_into_configured_folder() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("exports");
        let settings = directory_settings(&target);
        let mut notes: Vec<Notification> = Vec::new();

        let outcome = download_document(
            &exporter_for(&settings),
            &DocumentSource::from("# Title"),
            &settings,
            &mut notes,
        );

        match outcome {
            DownloadOutcome::Saved(path) => {
                assert_eq!(path, target.join("converted-document.doc"));
                assert!(path.exists());
            }
            other => panic!("expected a saved document, got {:?}", other),
        }
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Document downloaded");
    }

    #[test]
    fn test_system_dark() {
        assert_eq!(system_dark(Some(eframe::Theme::Dark)), Some(true));
        assert_eq!(system_dark(Some(eframe::Theme::Light)), Some(false));
        assert_eq!(system_dark(None), None);
    }
}
