//! Settings Panel Component
//!
//! A modal window for appearance, Markdown conversion and download options.
//! Changes apply immediately and are persisted by the application.

use crate::config::{Settings, Theme};
use eframe::egui::{self, Color32, RichText, Ui};
use rfd::FileDialog;

/// Settings panel sections for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsSection {
    #[default]
    Appearance,
    Markdown,
    Downloads,
}

impl SettingsSection {
    pub fn label(&self) -> &'static str {
        match self {
            SettingsSection::Appearance => "Appearance",
            SettingsSection::Markdown => "Markdown",
            SettingsSection::Downloads => "Downloads",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SettingsSection::Appearance => "🎨",
            SettingsSection::Markdown => "📝",
            SettingsSection::Downloads => "📥",
        }
    }
}

/// Result of showing the settings panel.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanelOutput {
    /// Whether settings were modified.
    pub changed: bool,
    /// Whether the panel should be closed.
    pub close_requested: bool,
    /// Whether a reset to defaults was requested.
    pub reset_requested: bool,
}

/// Settings panel state and rendering.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanel {
    active_section: SettingsSection,
}

impl SettingsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the settings panel as a modal window.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        settings: &mut Settings,
        is_dark: bool,
    ) -> SettingsPanelOutput {
        let mut output = SettingsPanelOutput::default();

        // Semi-transparent overlay
        let screen_rect = ctx.screen_rect();
        let overlay_color = if is_dark {
            Color32::from_rgba_unmultiplied(0, 0, 0, 180)
        } else {
            Color32::from_rgba_unmultiplied(0, 0, 0, 120)
        };

        egui::Area::new(egui::Id::new("settings_overlay"))
            .order(egui::Order::Middle)
            .fixed_pos(screen_rect.min)
            .show(ctx, |ui| {
                let response = ui.allocate_response(screen_rect.size(), egui::Sense::click());
                ui.painter().rect_filled(screen_rect, 0.0, overlay_color);

                if response.clicked() {
                    output.close_requested = true;
                }
            });

        egui::Window::new("⚙ Settings")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .min_width(500.0)
            .max_width(600.0)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    output.close_requested = true;
                }

                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.set_min_width(120.0);

                        for section in [
                            SettingsSection::Appearance,
                            SettingsSection::Markdown,
                            SettingsSection::Downloads,
                        ] {
                            let selected = self.active_section == section;
                            let text = format!("{} {}", section.icon(), section.label());

                            if ui
                                .add_sized(
                                    [110.0, 32.0],
                                    egui::SelectableLabel::new(
                                        selected,
                                        RichText::new(text).size(14.0),
                                    ),
                                )
                                .clicked()
                            {
                                self.active_section = section;
                            }
                        }

                        ui.add_space((ui.available_height() - 40.0).max(0.0));

                        if ui
                            .add_sized([110.0, 28.0], egui::Button::new("↺ Reset All"))
                            .on_hover_text("Reset all settings to defaults")
                            .clicked()
                        {
                            output.reset_requested = true;
                        }
                    });

                    ui.separator();

                    ui.vertical(|ui| {
                        ui.set_min_width(350.0);
                        ui.set_min_height(320.0);

                        let changed = match self.active_section {
                            SettingsSection::Appearance => show_appearance_section(ui, settings),
                            SettingsSection::Markdown => show_markdown_section(ui, settings),
                            SettingsSection::Downloads => show_downloads_section(ui, settings),
                        };
                        output.changed |= changed;
                    });
                });

                ui.separator();

                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Close").clicked() {
                            output.close_requested = true;
                        }
                        ui.label(
                            RichText::new("Settings are saved automatically")
                                .small()
                                .weak(),
                        );
                    });
                });
            });

        output
    }
}

/// Returns true if any setting was changed.
fn show_appearance_section(ui: &mut Ui, settings: &mut Settings) -> bool {
    let mut changed = false;

    ui.heading("Appearance");
    ui.add_space(8.0);

    ui.label(RichText::new("Theme").strong());
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        for theme in Theme::all() {
            let icon = match theme {
                Theme::Light => "☀",
                Theme::Dark => "🌙",
                Theme::System => "💻",
            };
            let label = format!("{} {}", icon, theme.label());
            changed |= ui
                .selectable_value(&mut settings.theme, *theme, label)
                .changed();
        }
    });

    ui.add_space(16.0);
    ui.separator();
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label(RichText::new("Font Size").strong());
        ui.add_space(8.0);
        ui.label(format!("{}px", settings.font_size as u32));
    });
    ui.add_space(4.0);

    changed |= ui
        .add(
            egui::Slider::new(
                &mut settings.font_size,
                Settings::MIN_FONT_SIZE..=Settings::MAX_FONT_SIZE,
            )
            .show_value(false)
            .step_by(1.0),
        )
        .changed();

    ui.horizontal(|ui| {
        for (label, size) in [("Small", 12.0), ("Medium", 14.0), ("Large", 18.0)] {
            if ui.small_button(label).clicked() {
                settings.font_size = size;
                changed = true;
            }
        }
    });

    changed
}

/// Returns true if any setting was changed.
fn show_markdown_section(ui: &mut Ui, settings: &mut Settings) -> bool {
    let mut changed = false;
    let markdown = &mut settings.markdown;

    ui.heading("Markdown");
    ui.add_space(8.0);

    for (value, label, hint) in [
        (&mut markdown.tables, "Tables", "| a | b | pipe tables"),
        (&mut markdown.strikethrough, "Strikethrough", "~~deleted~~ text"),
        (&mut markdown.autolink, "Autolinks", "Turn bare URLs into links"),
        (&mut markdown.tasklist, "Task Lists", "- [ ] and - [x] items"),
        (&mut markdown.footnotes, "Footnotes", "[^1] references"),
    ] {
        changed |= ui.checkbox(value, label).on_hover_text(hint).changed();
        ui.add_space(4.0);
    }

    ui.add_space(12.0);
    ui.separator();
    ui.add_space(8.0);

    changed |= ui
        .checkbox(&mut markdown.allow_raw_html, "Keep Raw HTML")
        .on_hover_text("Pass HTML written in the Markdown through to the output")
        .changed();
    ui.label(
        RichText::new("When off, embedded HTML becomes a placeholder comment in exports.")
            .small()
            .weak(),
    );

    changed
}

/// Returns true if any setting was changed.
fn show_downloads_section(ui: &mut Ui, settings: &mut Settings) -> bool {
    let mut changed = false;

    ui.heading("Downloads");
    ui.add_space(8.0);

    ui.label(RichText::new("File Name").strong());
    ui.add_space(4.0);
    let name_response = ui.text_edit_singleline(&mut settings.download_file_name);
    if name_response.lost_focus() {
        // Normalize once editing finishes so typing isn't interrupted
        settings.sanitize();
        changed = true;
    }

    ui.add_space(16.0);
    ui.separator();
    ui.add_space(8.0);

    changed |= ui
        .checkbox(&mut settings.ask_download_location, "Ask Where to Save")
        .on_hover_text("Show a save dialog for every download")
        .changed();

    ui.add_space(4.0);

    ui.label(RichText::new("Download Folder").strong());
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        let current = settings
            .download_directory
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "System Downloads folder".to_string());
        ui.label(RichText::new(current).monospace().small());
    });
    ui.horizontal(|ui| {
        if ui.button("Choose…").clicked() {
            let mut dialog = FileDialog::new().set_title("Choose Download Folder");
            if let Some(dir) = &settings.download_directory {
                dialog = dialog.set_directory(dir);
            }
            if let Some(dir) = dialog.pick_folder() {
                settings.download_directory = Some(dir);
                changed = true;
            }
        }
        if settings.download_directory.is_some() && ui.button("Use Default").clicked() {
            settings.download_directory = None;
            changed = true;
        }
    });

    ui.add_space(16.0);
    ui.separator();
    ui.add_space(8.0);

    changed |= ui
        .checkbox(&mut settings.open_after_download, "Open After Download")
        .on_hover_text("Open the saved document with the default application")
        .changed();

    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_panel_default_section() {
        let panel = SettingsPanel::new();
        assert_eq!(panel.active_section, SettingsSection::Appearance);
    }

    #[test]
    fn test_settings_section_label() {
        assert_eq!(SettingsSection::Appearance.label(), "Appearance");
        assert_eq!(SettingsSection::Markdown.label(), "Markdown");
        assert_eq!(SettingsSection::Downloads.label(), "Downloads");
    }

    #[test]
    fn test_settings_panel_output_default() {
        let output = SettingsPanelOutput::default();
        assert!(!output.changed);
        assert!(!output.close_requested);
        assert!(!output.reset_requested);
    }
}
