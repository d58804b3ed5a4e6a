//! Luminance histogram dialog.

use std::ops::RangeInclusive;

use egui_plot::{GridMark, Line, Plot, PlotPoint, PlotPoints};
use hdrprobe_core::{Event, Histogram, HistogramMode};

use crate::app::HdrProbeApp;
use crate::ui_constants::{colors, histogram, spacing};

/// Decade labels are only drawn for marks this close to an integer exponent.
const DECADE_TOLERANCE: f64 = 1e-9;

impl HdrProbeApp {
    /// Build the histogram window while it is open.
    pub(crate) fn build_histogram_dialog(&self, ctx: &egui::Context, events: &mut Vec<Event>) {
        let view = self.controller.histogram();
        if !view.is_open() {
            return;
        }

        let mut open = true;
        egui::Window::new("Luminance Histogram")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Mode:");
                    for mode in HistogramMode::all() {
                        if ui.radio(view.mode() == *mode, mode.as_str()).clicked()
                            && view.mode() != *mode
                        {
                            events.push(Event::HistogramModeSelected(*mode));
                        }
                    }
                    if view.is_pending() {
                        ui.spinner();
                    }
                });
                ui.add_space(spacing::TIGHT);

                let points = view.histogram().map(log_points).unwrap_or_default();
                Plot::new("luminance_histogram")
                    .width(histogram::PLOT_SIZE.0)
                    .height(histogram::PLOT_SIZE.1)
                    .x_axis_label("Luminance (cd/m²)")
                    .y_axis_label("Frequency")
                    .x_grid_spacer(egui_plot::log_grid_spacer(10))
                    .x_axis_formatter(decade_tick)
                    .label_formatter(|_name, value| hover_label(value))
                    .include_y(0.0)
                    .allow_drag(false)
                    .allow_zoom(false)
                    .allow_scroll(false)
                    .show(ui, |plot_ui| {
                        if !points.is_empty() {
                            plot_ui.line(
                                Line::new(PlotPoints::new(points))
                                    .color(colors::HISTOGRAM_LINE)
                                    .width(histogram::LINE_WIDTH)
                                    .name(view.mode().as_str()),
                            );
                        }
                    });

                if matches!(view.histogram(), Some(data) if data.is_empty()) {
                    ui.weak("No data");
                }

                ui.add_space(spacing::TIGHT);
                if ui.button("Close").clicked() {
                    events.push(Event::HistogramClosed);
                }
            });

        if !open {
            events.push(Event::HistogramClosed);
        }
    }
}

/// Histogram points with x as log10 of the clamped bin and y as the count.
fn log_points(data: &Histogram) -> Vec<[f64; 2]> {
    data.plot_points()
        .into_iter()
        .map(|[bin, count]| [bin.log10(), count])
        .collect()
}

/// Axis label for a log10 grid mark: the luminance at whole decades,
/// nothing in between.
fn decade_tick(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    let exponent = mark.value.round();
    if (mark.value - exponent).abs() > DECADE_TOLERANCE {
        return String::new();
    }
    format_decade(exponent as i32)
}

fn format_decade(exponent: i32) -> String {
    if (-2..=4).contains(&exponent) {
        format!("{}", 10f64.powi(exponent))
    } else {
        format!("1e{exponent}")
    }
}

fn hover_label(value: &PlotPoint) -> String {
    format!(
        "{:.3} cd/m²\n{} pixels",
        10f64.powf(value.x),
        value.y.max(0.0).round()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_use_log_luminance() {
        let data = Histogram {
            bins: vec![0.0, 1.0, 100.0],
            counts: vec![5, 10],
        };
        let points = log_points(&data);

        assert_eq!(points.len(), 3);
        // Zero bin is clamped to 1e-6 before the log
        assert!((points[0][0] + 6.0).abs() < 1e-9);
        assert_eq!(points[0][1], 5.0);
        assert_eq!(points[1], [0.0, 10.0]);
        assert!((points[2][0] - 2.0).abs() < 1e-9);
        // Missing count reads as zero
        assert_eq!(points[2][1], 0.0);
    }

    #[test]
    fn test_decade_labels() {
        assert_eq!(format_decade(-6), "1e-6");
        assert_eq!(format_decade(-2), "0.01");
        assert_eq!(format_decade(0), "1");
        assert_eq!(format_decade(3), "1000");
        assert_eq!(format_decade(5), "1e5");
    }

    #[test]
    fn test_hover_label_undoes_log() {
        assert_eq!(hover_label(&PlotPoint::new(2.0, 42.0)), "100.000 cd/m²\n42 pixels");
    }
}
