//! Top bar UI component.

use hdrprobe_core::Event;

use crate::app::{pick_image, HdrProbeApp};
use crate::ui_constants::{spacing, text};

impl HdrProbeApp {
    /// Build the top bar with the open button, image info and loading status.
    pub(crate) fn build_topbar(&self, ctx: &egui::Context, events: &mut Vec<Event>) {
        egui::TopBottomPanel::top("topbar").show(ctx, |ui| {
            ui.add_space(spacing::TIGHT);
            ui.horizontal(|ui| {
                let open = ui.add_enabled(
                    !self.controller.is_uploading(),
                    egui::Button::new("Open Image…"),
                );
                if open.clicked() {
                    if let Some(path) = pick_image() {
                        events.push(Event::UploadRequested(path));
                    }
                }
                ui.separator();

                match self.controller.session() {
                    Some(session) => {
                        ui.strong(session.filename.as_str());
                        ui.label(session.dimensions_label());
                        ui.separator();
                        ui.label(session.stats.to_string());
                        ui.separator();
                        ui.label(session.calibration_status());
                    }
                    None => {
                        ui.weak("No image loaded. Open or drop an HDR file.");
                    }
                }

                let loading = self.controller.loading();
                if loading.is_active() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(egui::RichText::new(loading.message()).size(text::SMALL));
                        ui.spinner();
                    });
                }
            });
            ui.add_space(spacing::TIGHT);
        });
    }
}
