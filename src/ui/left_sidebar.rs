//! Left sidebar UI component.

use hdrprobe_core::controls::{EXPOSURE_RANGE, GAMMA_RANGE};
use hdrprobe_core::{Colormap, Event};

use crate::app::HdrProbeApp;
use crate::ui_constants::{sidebar, spacing, text};

impl HdrProbeApp {
    /// Build the left sidebar with tone-mapping and false-color controls.
    pub(crate) fn build_left_sidebar(&self, ctx: &egui::Context, events: &mut Vec<Event>) {
        let controls = self.controller.controls();

        egui::SidePanel::left("display_controls")
            .resizable(false)
            .exact_width(sidebar::LEFT_WIDTH)
            .show(ctx, |ui| {
                ui.add_space(spacing::STANDARD);
                ui.label(egui::RichText::new("Tone Mapping").size(text::SECTION_HEADER));
                ui.add_space(spacing::TIGHT);

                let mut exposure = controls.exposure();
                let slider = egui::Slider::new(&mut exposure, EXPOSURE_RANGE)
                    .step_by(0.1)
                    .text("Exposure");
                if ui.add_enabled(controls.exposure_enabled(), slider).changed() {
                    events.push(Event::ExposureChanged(exposure));
                }

                let mut gamma = controls.gamma();
                let slider = egui::Slider::new(&mut gamma, GAMMA_RANGE)
                    .step_by(0.05)
                    .text("Gamma");
                if ui.add_enabled(controls.gamma_enabled(), slider).changed() {
                    events.push(Event::GammaChanged(gamma));
                }

                let mut use_srgb = controls.use_srgb();
                if ui.checkbox(&mut use_srgb, "sRGB transfer").changed() {
                    events.push(Event::SrgbToggled(use_srgb));
                }

                ui.add_space(spacing::LARGE);
                ui.label(egui::RichText::new("False Color").size(text::SECTION_HEADER));
                ui.add_space(spacing::TIGHT);

                let mut false_color = controls.false_color();
                if ui.checkbox(&mut false_color, "Enable false color").changed() {
                    events.push(Event::FalseColorToggled(false_color));
                }

                ui.add_enabled_ui(controls.false_color(), |ui| {
                    let selected = controls.colormap();
                    egui::ComboBox::from_label("Colormap")
                        .selected_text(selected.name())
                        .show_ui(ui, |ui| {
                            for colormap in Colormap::all() {
                                if ui
                                    .selectable_label(*colormap == selected, colormap.name())
                                    .clicked()
                                    && *colormap != selected
                                {
                                    events.push(Event::ColormapSelected(*colormap));
                                }
                            }
                        });

                    let (mut min, mut max) = controls.falsecolor_range();
                    let mut edited = false;
                    ui.horizontal(|ui| {
                        ui.label("Min");
                        edited |= ui
                            .add(egui::DragValue::new(&mut min).speed(1.0).suffix(" cd/m²"))
                            .changed();
                    });
                    ui.horizontal(|ui| {
                        ui.label("Max");
                        edited |= ui
                            .add(egui::DragValue::new(&mut max).speed(1.0).suffix(" cd/m²"))
                            .changed();
                    });
                    if edited {
                        events.push(Event::FalseColorRangeEdited { min, max });
                    }

                    let mut show_scale = controls.show_color_scale();
                    if ui.checkbox(&mut show_scale, "Show color scale").changed() {
                        events.push(Event::ColorScaleToggled(show_scale));
                    }
                });
            });
    }
}
