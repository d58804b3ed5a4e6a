//! Right sidebar UI component.

use hdrprobe_core::Event;

use crate::app::HdrProbeApp;
use crate::ui_constants::{sidebar, spacing, text};

impl HdrProbeApp {
    /// Build the right sidebar with actions and the annotation list.
    pub(crate) fn build_right_sidebar(&self, ctx: &egui::Context, events: &mut Vec<Event>) {
        let enabled = self.controller.actions_enabled();
        let calibration = self.controller.calibration();

        egui::SidePanel::right("annotations")
            .resizable(false)
            .exact_width(sidebar::RIGHT_WIDTH)
            .show(ctx, |ui| {
                ui.add_space(spacing::STANDARD);
                ui.label(egui::RichText::new("Actions").size(text::SECTION_HEADER));
                ui.add_space(spacing::TIGHT);

                let calibrate_label = if calibration.is_armed() {
                    "Click a pixel…"
                } else {
                    "Calibrate"
                };
                let calibrate = ui.add_enabled(
                    enabled && !calibration.is_awaiting_value(),
                    egui::Button::new(calibrate_label).selected(calibration.is_armed()),
                );
                if calibrate.clicked() {
                    events.push(Event::CalibrateRequested);
                }

                ui.horizontal(|ui| {
                    if ui.add_enabled(enabled, egui::Button::new("Clear")).clicked() {
                        events.push(Event::ClearAnnotations);
                    }
                    if ui.add_enabled(enabled, egui::Button::new("Histogram")).clicked() {
                        events.push(Event::HistogramOpened);
                    }
                });

                ui.add_space(spacing::LARGE);
                ui.label(egui::RichText::new("Annotations").size(text::SECTION_HEADER));
                ui.add_space(spacing::TIGHT);

                let entries = self.controller.annotations().list_annotations();
                if entries.is_empty() {
                    ui.weak("No annotations yet");
                    return;
                }

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for entry in &entries {
                            ui.horizontal(|ui| {
                                ui.label(format!("{}: {}", entry.kind.name(), entry.label));
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| ui.strong(entry.value_text.as_str()),
                                );
                            });
                        }
                    });
            });
    }
}
