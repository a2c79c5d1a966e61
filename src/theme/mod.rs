//! Theme System
//!
//! Colors for the window chrome, the formatted preview and notifications.
//! The `Theme` enum in `config::settings` (Light/Dark/System) selects which
//! palette is active; [`ThemeManager`] applies it to the egui context.
//!
//! # Usage
//!
//! ```ignore
//! use crate::theme::Palette;
//!
//! let palette = Palette::for_visuals(&ctx.style().visuals);
//! ui.label(RichText::new("Title").color(palette.heading));
//! ```

mod manager;

pub use manager::ThemeManager;

use eframe::egui::{self, Color32, Rounding, Stroke, Visuals};

// ─────────────────────────────────────────────────────────────────────────────
// Palette
// ─────────────────────────────────────────────────────────────────────────────

/// Colors used across the application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Main panel background
    pub background: Color32,
    /// Elevated surfaces (header, toasts, input fields)
    pub surface: Color32,
    /// Hovered widget background
    pub hover: Color32,
    /// Selected text background
    pub selection: Color32,
    pub border: Color32,
    /// Primary text
    pub text: Color32,
    /// Hints, placeholders and the status line
    pub text_muted: Color32,
    pub link: Color32,
    /// Buttons and focus strokes
    pub accent: Color32,
    /// Destructive notifications
    pub error: Color32,
    pub heading: Color32,
    pub code_bg: Color32,
    pub quote_bar: Color32,
    pub rule: Color32,
    pub table_header_bg: Color32,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            background: Color32::from_rgb(255, 255, 255),
            surface: Color32::from_rgb(248, 249, 250),
            hover: Color32::from_rgb(238, 240, 243),
            selection: Color32::from_rgb(210, 228, 255),
            border: Color32::from_rgb(206, 212, 218),
            text: Color32::from_rgb(30, 30, 30),
            text_muted: Color32::from_rgb(120, 120, 120),
            link: Color32::from_rgb(0, 100, 180),
            accent: Color32::from_rgb(0, 120, 212),
            error: Color32::from_rgb(220, 53, 69),
            heading: Color32::from_rgb(20, 20, 20),
            code_bg: Color32::from_rgb(233, 236, 239),
            quote_bar: Color32::from_rgb(200, 200, 200),
            rule: Color32::from_rgb(200, 200, 200),
            table_header_bg: Color32::from_rgb(240, 242, 245),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color32::from_rgb(30, 30, 30),
            surface: Color32::from_rgb(40, 40, 42),
            hover: Color32::from_rgb(52, 52, 56),
            selection: Color32::from_rgb(40, 60, 80),
            border: Color32::from_rgb(62, 62, 66),
            text: Color32::from_rgb(220, 220, 220),
            text_muted: Color32::from_rgb(140, 140, 140),
            link: Color32::from_rgb(100, 180, 255),
            accent: Color32::from_rgb(100, 180, 255),
            error: Color32::from_rgb(255, 100, 100),
            heading: Color32::from_rgb(235, 235, 235),
            code_bg: Color32::from_rgb(35, 39, 46),
            quote_bar: Color32::from_rgb(80, 80, 80),
            rule: Color32::from_rgb(80, 80, 80),
            table_header_bg: Color32::from_rgb(45, 50, 60),
        }
    }

    pub fn for_dark_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// Palette matching whatever visuals are currently applied.
    pub fn for_visuals(visuals: &Visuals) -> Self {
        Self::for_dark_mode(visuals.dark_mode)
    }

    /// Build egui visuals from this palette.
    pub fn to_visuals(&self, dark: bool) -> Visuals {
        let mut visuals = if dark { Visuals::dark() } else { Visuals::light() };
        let rounding = Rounding::same(4.0);

        visuals.panel_fill = self.background;
        visuals.window_fill = self.background;
        visuals.extreme_bg_color = self.surface;
        visuals.faint_bg_color = self.surface;
        visuals.code_bg_color = self.code_bg;
        visuals.hyperlink_color = self.link;
        visuals.error_fg_color = self.error;

        visuals.selection.bg_fill = self.selection;
        visuals.selection.stroke = Stroke::new(1.0, self.accent);

        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text);
        visuals.widgets.noninteractive.rounding = rounding;

        visuals.widgets.inactive.weak_bg_fill = self.surface;
        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.inactive.rounding = rounding;

        visuals.widgets.hovered.weak_bg_fill = self.hover;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.hovered.rounding = rounding;

        visuals.widgets.active.bg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.active.rounding = rounding;

        visuals.window_rounding = Rounding::same(8.0);
        visuals.window_stroke = Stroke::new(1.0, self.border);
        visuals.window_shadow = egui::epaint::Shadow {
            offset: egui::vec2(0.0, 4.0),
            blur: 16.0,
            spread: 0.0,
            color: Color32::from_black_alpha(if dark { 80 } else { 30 }),
        };

        visuals
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palettes_differ() {
        assert_ne!(Palette::light().background, Palette::dark().background);
        assert_ne!(Palette::light().text, Palette::dark().text);
    }

    #[test]
    fn test_visuals_dark_mode_flag() {
        assert!(Palette::dark().to_visuals(true).dark_mode);
        assert!(!Palette::light().to_visuals(false).dark_mode);
    }

    #[test]
    fn test_for_visuals_follows_dark_mode() {
        assert_eq!(Palette::for_visuals(&Visuals::dark()), Palette::dark());
        assert_eq!(Palette::for_visuals(&Visuals::light()), Palette::light());
    }
}
