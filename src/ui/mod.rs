//! UI components
//!
//! This module contains the settings window and toast notifications.

mod settings;
mod toast;

pub use settings::SettingsPanel;
pub use toast::ToastQueue;
