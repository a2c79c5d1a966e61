//! Theme Manager
//!
//! Tracks the theme preference and applies it to the egui context.

use eframe::egui::Context;
use log::{debug, info};

use super::Palette;
use crate::config::Theme;

/// Manages theme state and applies themes to the egui context.
///
/// `System` follows the operating system preference reported by the
/// windowing integration; when none is reported, light is used.
#[derive(Debug, Clone)]
pub struct ThemeManager {
    current_theme: Theme,
    /// Dark mode state last pushed to egui
    applied_dark: Option<bool>,
    needs_apply: bool,
}

impl ThemeManager {
    pub fn new(theme: Theme) -> Self {
        info!("ThemeManager initialized with theme: {:?}", theme);
        Self {
            current_theme: theme,
            applied_dark: None,
            needs_apply: true,
        }
    }

    /// Set the theme and mark for reapplication.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.current_theme != theme {
            info!("Theme changed from {:?} to {:?}", self.current_theme, theme);
            self.current_theme = theme;
            self.needs_apply = true;
        }
    }

    /// Whether the effective theme is dark, given the system preference.
    pub fn resolve_dark(&self, system_dark: Option<bool>) -> bool {
        match self.current_theme {
            Theme::Light => false,
            Theme::Dark => true,
            Theme::System => system_dark.unwrap_or(false),
        }
    }

    /// Apply the theme unconditionally.
    pub fn apply(&mut self, ctx: &Context, system_dark: Option<bool>) {
        let dark = self.resolve_dark(system_dark);
        ctx.set_visuals(Palette::for_dark_mode(dark).to_visuals(dark));
        self.applied_dark = Some(dark);
        self.needs_apply = false;
        debug!("Applied theme: {:?} (dark: {})", self.current_theme, dark);
    }

    /// Apply the theme if it or the system preference changed.
    ///
    /// Returns `true` if the theme was applied.
    pub fn apply_if_needed(&mut self, ctx: &Context, system_dark: Option<bool>) -> bool {
        if self.applied_dark != Some(self.resolve_dark(system_dark)) {
            self.needs_apply = true;
        }

        if self.needs_apply {
            self.apply(ctx, system_dark);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_dark() {
        assert!(!ThemeManager::new(Theme::Light).resolve_dark(Some(true)));
        assert!(ThemeManager::new(Theme::Dark).resolve_dark(Some(false)));
        assert!(ThemeManager::new(Theme::System).resolve_dark(Some(true)));
        assert!(!ThemeManager::new(Theme::System).resolve_dark(None));
    }

    #[test]
    fn test_apply_if_needed_only_once() {
        let ctx = Context::default();
        let mut manager = ThemeManager::new(Theme::Dark);

        assert!(manager.apply_if_needed(&ctx, None));
        assert!(ctx.style().visuals.dark_mode);
        assert!(!manager.apply_if_needed(&ctx, None));

        manager.set_theme(Theme::Light);
        assert!(manager.apply_if_needed(&ctx, None));
        assert!(!ctx.style().visuals.dark_mode);
    }

    #[test]
    fn test_system_theme_follows_preference_changes() {
        let ctx = Context::default();
        let mut manager = ThemeManager::new(Theme::System);

        assert!(manager.apply_if_needed(&ctx, Some(false)));
        assert!(!manager.apply_if_needed(&ctx, Some(false)));
        assert!(manager.apply_if_needed(&ctx, Some(true)));
        assert!(ctx.style().visuals.dark_mode);
    }
}
