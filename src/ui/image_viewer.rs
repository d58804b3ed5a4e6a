//! Image viewer UI component.
//!
//! Fits the rendered preview into the central panel, reports the displayed
//! size to the controller, translates pointer input into image-relative
//! display coordinates, and paints the overlay on top.

use egui::{pos2, vec2, Color32, Painter, Pos2, Rect, Stroke, StrokeKind};
use hdrprobe_core::overlay::STROKE_WIDTH;
use hdrprobe_core::{DisplayPoint, DrawCommand, Event, OverlayTone};

use crate::app::HdrProbeApp;
use crate::ui_constants::{colors, image_viewer, text};

/// Differences below this many logical pixels don't count as a resize.
const RESIZE_TOLERANCE: f32 = 0.5;

impl HdrProbeApp {
    /// Build the central image viewer.
    pub(crate) fn build_image_viewer(&self, ctx: &egui::Context, events: &mut Vec<Event>) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(preview) = &self.textures.preview else {
                ui.centered_and_justified(|ui| {
                    if self.controller.loading().is_active() {
                        ui.spinner();
                    } else {
                        ui.weak("Open an HDR image to start");
                    }
                });
                return;
            };

            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let canvas = response.rect;
            painter.rect_filled(canvas, 0.0, Color32::from_gray(image_viewer::BACKGROUND_GRAY));

            let colorbar = self
                .controller
                .colorbar()
                .and(self.textures.colorbar.as_ref());
            let reserved = if colorbar.is_some() {
                image_viewer::COLORBAR_HEIGHT + image_viewer::COLORBAR_GAP
            } else {
                0.0
            };
            let image_rect = fit_image(canvas, preview.size_vec2(), reserved);

            self.report_display_size(image_rect.size(), events);

            painter.image(
                preview.id(),
                image_rect,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );

            if let Some(colorbar) = colorbar {
                let bar_size = colorbar.size_vec2();
                let height = image_viewer::COLORBAR_HEIGHT;
                let width = (bar_size.x * height / bar_size.y.max(1.0)).min(canvas.width());
                let bar_rect = Rect::from_center_size(
                    pos2(
                        image_rect.center().x,
                        image_rect.max.y + image_viewer::COLORBAR_GAP + height / 2.0,
                    ),
                    vec2(width, height),
                );
                painter.image(
                    colorbar.id(),
                    bar_rect,
                    Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            }

            let overlay_painter = painter.with_clip_rect(image_rect);
            for command in self.controller.overlay() {
                paint_command(&overlay_painter, image_rect.min, &command);
            }

            if self.controller.calibration().is_armed() && response.hovered() {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }

            self.collect_pointer_events(ctx, &response, image_rect, events);
        });
    }

    /// Tell the controller when the displayed image size changed.
    fn report_display_size(&self, size: egui::Vec2, events: &mut Vec<Event>) {
        let changed = match self.controller.geometry() {
            Some(geometry) => {
                (geometry.display_width() - size.x).abs() > RESIZE_TOLERANCE
                    || (geometry.display_height() - size.y).abs() > RESIZE_TOLERANCE
            }
            None => self.controller.session().is_some(),
        };
        if changed {
            events.push(Event::DisplayResized {
                width: size.x,
                height: size.y,
            });
        }
    }

    /// Translate primary-button input into pointer events.
    ///
    /// A press only counts over the image. Once a drag is running, moves and
    /// the release are reported wherever the pointer is; a release with the
    /// pointer gone reports no position.
    fn collect_pointer_events(
        &self,
        ctx: &egui::Context,
        response: &egui::Response,
        image_rect: Rect,
        events: &mut Vec<Event>,
    ) {
        let (pressed, down, moved, position) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.delta() != egui::Vec2::ZERO,
                i.pointer.latest_pos(),
            )
        });
        let to_display =
            |pos: Pos2| DisplayPoint::new(pos.x - image_rect.min.x, pos.y - image_rect.min.y);

        let mut dragging = self.controller.drag().is_active();
        if pressed && response.hovered() {
            if let Some(pos) = position.filter(|pos| image_rect.contains(*pos)) {
                events.push(Event::PointerDown(to_display(pos)));
                dragging = true;
            }
        }
        if !dragging {
            return;
        }

        if !down {
            events.push(Event::PointerUp(position.map(to_display)));
        } else if moved {
            if let Some(pos) = position {
                events.push(Event::PointerMoved(to_display(pos)));
            }
        }
    }
}

/// Largest rectangle with the image's aspect ratio that fits in `canvas`
/// above `reserved` logical pixels, centered horizontally. Never upscales.
fn fit_image(canvas: Rect, image_size: egui::Vec2, reserved: f32) -> Rect {
    let available = vec2(canvas.width(), (canvas.height() - reserved).max(1.0));
    let scale = (available.x / image_size.x)
        .min(available.y / image_size.y)
        .min(1.0);
    let size = image_size * scale;
    let min = pos2(
        canvas.center().x - size.x / 2.0,
        canvas.min.y + (available.y - size.y) / 2.0,
    );
    Rect::from_min_size(min, size)
}

fn tone_color(tone: OverlayTone) -> Color32 {
    match tone {
        OverlayTone::PointTag => colors::POINT_TAG,
        OverlayTone::RegionTag => colors::REGION_TAG,
        OverlayTone::DragPreview => colors::DRAG_PREVIEW,
    }
}

fn to_screen(origin: Pos2, point: DisplayPoint) -> Pos2 {
    pos2(origin.x + point.x, origin.y + point.y)
}

fn paint_command(painter: &Painter, origin: Pos2, command: &DrawCommand) {
    match command {
        DrawCommand::Marker {
            center,
            radius,
            tone,
        } => {
            painter.circle_filled(to_screen(origin, *center), *radius, tone_color(*tone));
        }
        DrawCommand::Rect { min, max, tone } => {
            let rect = Rect::from_min_max(to_screen(origin, *min), to_screen(origin, *max));
            painter.rect_stroke(
                rect,
                0.0,
                Stroke::new(STROKE_WIDTH, tone_color(*tone)),
                StrokeKind::Middle,
            );
        }
        DrawCommand::Label {
            anchor,
            text: label,
            tone,
        } => {
            let color = tone_color(*tone);
            let galley = painter.layout_no_wrap(
                label.clone(),
                egui::FontId::proportional(text::OVERLAY_LABEL),
                color,
            );
            // Anchor is the baseline; lift the galley so its bottom sits there
            let baseline = to_screen(origin, *anchor);
            let top_left = pos2(baseline.x, baseline.y - galley.size().y);
            let backdrop = Rect::from_min_size(top_left, galley.size()).expand(2.0);
            painter.rect_filled(backdrop, 2.0, colors::LABEL_BACKDROP);
            painter.galley(top_left, galley, color);
        }
    }
}
