//! Toast notifications
//!
//! Transient messages stacked in the bottom-right corner of the window.
//! Toasts expire on their own; clicking one dismisses it early.

use std::collections::VecDeque;
use std::time::Duration;

use eframe::egui::{self, Color32, RichText};

use crate::export::{Notification, Notifier, Severity};
use crate::theme::Palette;

/// Seconds a regular toast stays visible.
pub const DEFAULT_DURATION: f64 = 3.0;

/// Seconds a destructive toast stays visible.
pub const DESTRUCTIVE_DURATION: f64 = 5.0;

/// Oldest toasts are dropped beyond this count.
pub const MAX_VISIBLE: usize = 3;

const TOAST_WIDTH: f32 = 320.0;

#[derive(Debug, Clone)]
struct Toast {
    notification: Notification,
    expires_at: f64,
}

/// Queue of visible toasts, timed against application time in seconds.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    now: f64,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock and drop expired toasts.
    pub fn update(&mut self, now: f64) {
        self.now = now;
        self.toasts.retain(|t| t.expires_at > now);
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Visible notifications, oldest first.
    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.toasts.iter().map(|t| &t.notification)
    }

    pub fn dismiss(&mut self, index: usize) {
        self.toasts.remove(index);
    }

    /// Time until the next toast expires, if any are shown.
    pub fn next_expiry(&self) -> Option<Duration> {
        self.toasts
            .iter()
            .map(|t| t.expires_at)
            .reduce(f64::min)
            .map(|at| Duration::from_secs_f64((at - self.now).max(0.0)))
    }

    /// Draw the toasts and schedule a repaint for the next expiry.
    pub fn show(&mut self, ctx: &egui::Context) {
        if self.is_empty() {
            return;
        }

        let palette = Palette::for_visuals(&ctx.style().visuals);
        let mut dismissed = None;

        egui::Area::new(egui::Id::new("toast_stack"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -36.0])
            .order(egui::Order::Foreground)
            .interactable(true)
            .show(ctx, |ui| {
                ui.set_width(TOAST_WIDTH);
                for (index, toast) in self.toasts.iter().enumerate() {
                    let (fill, text_color) = match toast.notification.severity {
                        Severity::Default => (palette.surface, palette.text),
                        Severity::Destructive => (palette.error, Color32::WHITE),
                    };

                    let response = egui::Frame::popup(ui.style())
                        .fill(fill)
                        .show(ui, |ui| {
                            ui.set_width(TOAST_WIDTH);
                            ui.label(
                                RichText::new(&toast.notification.title)
                                    .strong()
                                    .color(text_color),
                            );
                            if !toast.notification.description.is_empty() {
                                ui.label(
                                    RichText::new(&toast.notification.description)
                                        .small()
                                        .color(text_color),
                                );
                            }
                        })
                        .response
                        .interact(egui::Sense::click())
                        .on_hover_cursor(egui::CursorIcon::PointingHand);

                    if response.clicked() {
                        dismissed = Some(index);
                    }
                    ui.add_space(6.0);
                }
            });

        if let Some(index) = dismissed {
            self.dismiss(index);
        }

        if let Some(wait) = self.next_expiry() {
            ctx.request_repaint_after(wait);
        }
    }
}

impl Notifier for ToastQueue {
    fn notify(&mut self, notification: Notification) {
        let duration = if notification.is_destructive() {
            DESTRUCTIVE_DURATION
        } else {
            DEFAULT_DURATION
        };
        self.toasts.push_back(Toast {
            notification,
            expires_at: self.now + duration,
        });
        while self.toasts.len() > MAX_VISIBLE {
            self.toasts.pop_front();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_expire_by_severity() {
        let mut queue = ToastQueue::new();
        queue.update(10.0);
        queue.notify(Notification::new("Saved", ""));
        queue.notify(Notification::destructive("Failed", "disk full"));
        assert_eq!(queue.notifications().count(), 2);

        queue.update(13.5);
        let titles: Vec<_> = queue.notifications().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Failed"]);

        queue.update(15.0);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_oldest_toast_dropped_when_full() {
        let mut queue = ToastQueue::new();
        for i in 0..5 {
            queue.notify(Notification::new(format!("t{}", i), ""));
        }
        let titles: Vec<_> = queue.notifications().map(|n| n.title.clone()).collect();
        assert_eq!(titles, vec!["t2", "t3", "t4"]);
    }

    #[test]
    fn test_dismiss() {
        let mut queue = ToastQueue::new();
        queue.notify(Notification::new("a", ""));
        queue.notify(Notification::new("b", ""));
        queue.dismiss(0);
        assert_eq!(queue.notifications().next().unwrap().title, "b");
    }

    #[test]
    fn test_next_expiry() {
        let mut queue = ToastQueue::new();
        assert!(queue.next_expiry().is_none());

        queue.update(1.0);
        queue.notify(Notification::destructive("x", ""));
        queue.notify(Notification::new("y", ""));
        queue.update(2.0);
        assert_eq!(queue.next_expiry(), Some(Duration::from_secs(2)));
    }
}
