//! Transient notification in the bottom-right corner.

use hdrprobe_core::NotificationKind;

use crate::app::HdrProbeApp;
use crate::ui_constants::{colors, toast};

impl HdrProbeApp {
    /// Draw the current toast, if any.
    pub(crate) fn build_toast(&self, ctx: &egui::Context) {
        let Some(current) = &self.toast else {
            return;
        };
        if current.is_expired() {
            return;
        }

        let fill = match current.notification.kind {
            NotificationKind::Info => colors::INFO,
            NotificationKind::Success => colors::SUCCESS,
            NotificationKind::Error => colors::ERROR,
        };

        egui::Area::new(egui::Id::new("toast"))
            .order(egui::Order::Foreground)
            .anchor(
                egui::Align2::RIGHT_BOTTOM,
                egui::vec2(-toast::MARGIN, -toast::MARGIN),
            )
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(fill)
                    .corner_radius(6.0)
                    .inner_margin(egui::Margin::symmetric(12, 8))
                    .show(ui, |ui| {
                        ui.set_max_width(toast::MAX_WIDTH);
                        ui.label(
                            egui::RichText::new(current.notification.message.as_str())
                                .color(egui::Color32::WHITE),
                        );
                    });
            });
    }
}
