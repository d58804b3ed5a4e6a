//! Modal prompt for the known luminance of the calibration pixel.

use hdrprobe_core::Event;

use crate::app::HdrProbeApp;
use crate::ui_constants::spacing;

impl HdrProbeApp {
    /// Build the reference-value prompt while one is pending.
    ///
    /// Enter submits, Escape or the window's close button cancels.
    pub(crate) fn build_reference_prompt(&mut self, ctx: &egui::Context, events: &mut Vec<Event>) {
        let Some(prompt) = &mut self.reference_prompt else {
            return;
        };

        let mut open = true;
        let mut submitted = false;
        let mut cancelled = false;
        egui::Window::new("Calibrate")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!("Pixel ({}, {})", prompt.at.x, prompt.at.y));
                ui.label("Enter known luminance (cd/m²):");
                let field = ui.text_edit_singleline(&mut prompt.input);
                if prompt.focus_pending {
                    field.request_focus();
                    prompt.focus_pending = false;
                }
                if field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submitted = true;
                }
                ui.add_space(spacing::TIGHT);
                ui.horizontal(|ui| {
                    submitted |= ui.button("OK").clicked();
                    cancelled |= ui.button("Cancel").clicked();
                });
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            cancelled = true;
        }

        if submitted {
            events.push(Event::ReferenceValueSubmitted(prompt.input.clone()));
            self.reference_prompt = None;
        } else if cancelled || !open {
            events.push(Event::ReferenceValueCancelled);
            self.reference_prompt = None;
        }
    }
}
