//! Event handlers for the controller.
//!
//! Each handler processes one category of events and returns the effects
//! to run. Handlers call `touch` whenever observable state changes.

use std::path::PathBuf;

use super::{Controller, FALSE_COLOR_RENDER_MESSAGE, RENDER_MESSAGE, UPLOAD_MESSAGE};
use crate::annotation::{format_luminance, PointTag, RegionTag};
use crate::calibration::ReferenceInput;
use crate::error::{ProbeError, Result};
use crate::frame::RenderedFrame;
use crate::geometry::{DisplayGeometry, DisplayPoint, SourceCoordinates};
use crate::gesture::{DragState, Probe};
use crate::message::{CalibrationOutcome, Effect, Event, Notification, Request, UploadOutcome};
use crate::sequence::{RequestChannel, RequestToken};
use crate::session::{Histogram, HistogramMode, Session};

impl Controller {
    // Session

    pub(super) fn handle_upload_requested(&mut self, path: PathBuf) -> Vec<Effect> {
        log::info!("Upload requested: {:?}", path);
        let token = self.sequencer.issue(RequestChannel::Upload);
        // A newer upload supersedes the loading slot of an older one
        if let Some(previous) = self.pending_upload.replace(token) {
            self.loading.finish(&previous);
        }
        self.loading.begin(token, UPLOAD_MESSAGE);
        self.touch();
        vec![Effect::Request(Request::Upload { token, path })]
    }

    pub(super) fn handle_upload_completed(
        &mut self,
        token: RequestToken,
        result: Result<UploadOutcome>,
    ) -> Vec<Effect> {
        if !self.sequencer.is_current(&token) {
            log::debug!("Discarding stale upload response (seq {})", token.seq);
            if self.loading.finish(&token) {
                self.touch();
            }
            return Vec::new();
        }
        self.pending_upload = None;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Upload failed: {}", e);
                self.loading.finish(&token);
                self.touch();
                return vec![Effect::Notify(Notification::error(format!(
                    "Failed to load image: {e}"
                )))];
            }
        };

        let generation = self.sequencer.begin_session();
        log::info!(
            "Session {} started: {} ({}x{}), generation {}",
            outcome.session_id,
            outcome.filename,
            outcome.width,
            outcome.height,
            generation
        );

        let mut session = Session::new(
            outcome.session_id,
            outcome.filename,
            outcome.width,
            outcome.height,
            outcome.stats,
        );
        session.calibrated = outcome.calibrated;
        self.session = Some(session);
        self.geometry = None;
        self.frame = None;
        self.store.clear_all();
        self.drag = DragState::Idle;
        self.calibration.reset();
        self.controls.reset();
        self.histogram.histogram = None;
        self.histogram.pending = false;
        self.touch();

        let mut effects = Vec::new();
        // The first render keeps the upload's loading slot until it lands
        if let Some(effect) = self.request_render(false) {
            if let Effect::Request(request) = &effect {
                self.loading.transfer(&token, request.token());
            }
            effects.push(effect);
        } else {
            self.loading.finish(&token);
        }
        if self.histogram.open {
            effects.extend(self.request_histogram());
        }
        effects.push(Effect::Notify(Notification::success(
            "Image loaded successfully",
        )));
        effects
    }

    pub(super) fn handle_render_completed(
        &mut self,
        token: RequestToken,
        result: Result<RenderedFrame>,
    ) -> Vec<Effect> {
        let released = self.loading.finish(&token);
        if !self.sequencer.is_current(&token) {
            log::debug!(
                "Discarding stale render response (generation {}, seq {})",
                token.generation,
                token.seq
            );
            if released {
                self.touch();
            }
            return Vec::new();
        }

        self.touch();
        match result {
            Ok(frame) => {
                log::info!(
                    "Render committed: {}x{}{}",
                    frame.image.width(),
                    frame.image.height(),
                    if frame.colorbar.is_some() {
                        " with color scale"
                    } else {
                        ""
                    }
                );
                self.frame = Some(frame);
                Vec::new()
            }
            Err(e) => {
                log::error!("Render failed: {}", e);
                vec![Effect::Notify(Notification::error(format!(
                    "Failed to render image: {e}"
                )))]
            }
        }
    }

    pub(super) fn handle_display_resized(&mut self, width: f32, height: f32) -> Vec<Effect> {
        let Some(session) = &self.session else {
            return Vec::new();
        };
        let geometry =
            DisplayGeometry::new(session.source_width, session.source_height, width, height);
        if geometry != self.geometry {
            log::debug!("Display geometry: {}x{} -> {:?}", width, height, geometry);
            self.geometry = geometry;
            self.touch();
        }
        Vec::new()
    }

    // Pointer

    pub(super) fn handle_pointer_down(&mut self, point: DisplayPoint) -> Vec<Effect> {
        let Some(geometry) = self.geometry else {
            log::debug!("Pointer down ignored: no display geometry");
            return Vec::new();
        };
        let sample = geometry.sample(point);

        if self.calibration.is_armed() {
            self.calibration.select_pixel(sample.source);
            log::info!(
                "Calibration pixel selected at ({}, {})",
                sample.source.x,
                sample.source.y
            );
            self.touch();
            return vec![Effect::PromptReferenceValue { at: sample.source }];
        }
        if self.calibration.is_awaiting_value() || self.drag.is_active() {
            return Vec::new();
        }

        log::debug!(
            "Drag started at display ({:.1}, {:.1}) -> source ({}, {})",
            point.x,
            point.y,
            sample.source.x,
            sample.source.y
        );
        self.drag = DragState::begin(sample);
        self.touch();
        Vec::new()
    }

    pub(super) fn handle_pointer_moved(&mut self, point: DisplayPoint) -> Vec<Effect> {
        let Some(geometry) = self.geometry else {
            return Vec::new();
        };
        if self.drag.update(geometry.sample(point)) {
            self.touch();
        }
        Vec::new()
    }

    pub(super) fn handle_pointer_up(&mut self, point: Option<DisplayPoint>) -> Vec<Effect> {
        if !self.drag.is_active() {
            return Vec::new();
        }
        let end = match (point, self.geometry) {
            (Some(point), Some(geometry)) => Some(geometry.sample(point)),
            _ => None,
        };
        let probe = self.drag.finish(end);
        self.touch();

        let (Some(probe), Some(session)) = (probe, &self.session) else {
            return Vec::new();
        };
        let session = session.id.clone();
        let token = self.sequencer.issue(RequestChannel::Probe);

        let request = match probe {
            Probe::Pixel(at) => {
                log::debug!("Point probe at ({}, {})", at.x, at.y);
                Request::ProbePixel { token, session, at }
            }
            Probe::Region { start, end } => {
                log::debug!(
                    "Region probe ({}, {}) -> ({}, {})",
                    start.x,
                    start.y,
                    end.x,
                    end.y
                );
                Request::ProbeRegion {
                    token,
                    session,
                    start,
                    end,
                }
            }
        };
        vec![Effect::Request(request)]
    }

    // Probes

    pub(super) fn handle_pixel_probe_completed(
        &mut self,
        token: RequestToken,
        at: SourceCoordinates,
        result: Result<f64>,
    ) -> Vec<Effect> {
        if !self.sequencer.is_current(&token) {
            log::debug!("Discarding pixel probe from previous session");
            return Vec::new();
        }
        match result {
            Ok(value) => {
                let tag = PointTag::new(self.clamp_to_source(at), value);
                log::info!("Point tag {} = {}", tag.label(), value);
                self.store.add_point(tag);
                self.touch();
                vec![Effect::Notify(Notification::info(format!(
                    "Pixel luminance: {}",
                    format_luminance(value)
                )))]
            }
            Err(e) => {
                log::warn!("Pixel probe failed at ({}, {}): {}", at.x, at.y, e);
                vec![Effect::Notify(Notification::error(format!(
                    "Failed to lookup pixel luminance: {e}"
                )))]
            }
        }
    }

    pub(super) fn handle_region_probe_completed(
        &mut self,
        token: RequestToken,
        start: SourceCoordinates,
        end: SourceCoordinates,
        result: Result<f64>,
    ) -> Vec<Effect> {
        if !self.sequencer.is_current(&token) {
            log::debug!("Discarding region probe from previous session");
            return Vec::new();
        }
        let tag = RegionTag::new(self.clamp_to_source(start), self.clamp_to_source(end), 0.0);
        match result {
            Ok(value) => {
                let tag = RegionTag { value, ..tag };
                log::info!("Region tag {} = {}", tag.label(), value);
                self.store.add_region(tag);
                self.touch();
                vec![Effect::Notify(Notification::info(format!(
                    "ROI mean luminance: {}",
                    format_luminance(value)
                )))]
            }
            Err(e) => {
                let error = if tag.is_degenerate() {
                    log::warn!("Region probe {} failed ({}): zero area", tag.label(), e);
                    ProbeError::DegenerateRegion
                } else {
                    log::warn!("Region probe {} failed: {}", tag.label(), e);
                    e
                };
                vec![Effect::Notify(Notification::error(format!(
                    "Failed to compute ROI luminance: {error}"
                )))]
            }
        }
    }

    // Controls

    pub(super) fn handle_control(&mut self, event: Event) -> Vec<Effect> {
        let controls = &mut self.controls;
        let (changed, rerender) = match event {
            Event::ExposureChanged(value) => {
                let changed = controls.exposure_enabled() && controls.set_exposure(value);
                (changed, changed)
            }
            Event::GammaChanged(value) => {
                let changed = controls.set_gamma(value);
                (changed, changed)
            }
            Event::SrgbToggled(on) => {
                let changed = controls.set_use_srgb(on);
                (changed, changed)
            }
            Event::FalseColorToggled(on) => {
                let changed = controls.set_false_color(on);
                (changed, changed)
            }
            Event::ColormapSelected(colormap) => {
                let changed = controls.set_colormap(colormap);
                (changed, changed)
            }
            Event::FalseColorRangeEdited { min, max } => {
                let changed = controls.set_falsecolor_range(min, max);
                (changed, changed)
            }
            // Legend visibility only; the last render already carries it
            Event::ColorScaleToggled(show) => (controls.set_show_color_scale(show), false),
            other => {
                log::warn!("Not a control event: {:?}", other);
                (false, false)
            }
        };
        if !changed {
            return Vec::new();
        }
        log::debug!("Controls changed: {:?}", self.controls.build());
        self.touch();
        if rerender {
            self.request_render(true).into_iter().collect()
        } else {
            Vec::new()
        }
    }

    // Annotations

    pub(super) fn handle_clear_annotations(&mut self) -> Vec<Effect> {
        if !self.actions_enabled() {
            log::debug!("Clear ignored: {}", ProbeError::NoActiveSession);
            return Vec::new();
        }
        log::info!("Clearing {} annotations", self.store.len());
        self.store.clear_all();
        self.touch();
        vec![Effect::Notify(Notification::success("Annotations cleared"))]
    }

    // Calibration

    pub(super) fn handle_calibrate_requested(&mut self) -> Vec<Effect> {
        if !self.actions_enabled() || !self.calibration.arm(true) {
            return Vec::new();
        }
        log::info!("Calibration armed");
        self.touch();
        vec![Effect::Notify(Notification::info(
            "Pick a pixel to calibrate and enter the known luminance",
        ))]
    }

    pub(super) fn handle_reference_submitted(&mut self, text: String) -> Vec<Effect> {
        let was_awaiting = self.calibration.is_awaiting_value();
        let resolved = self.calibration.resolve(ReferenceInput::Entered(text));
        if was_awaiting {
            self.touch();
        }

        let calibration = match resolved {
            Ok(Some(calibration)) => calibration,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("Calibration aborted: {}", e);
                return vec![Effect::Notify(Notification::error(
                    "Please provide a positive number",
                ))];
            }
        };
        let Some(session) = &self.session else {
            log::warn!("Calibration aborted: {}", ProbeError::NoActiveSession);
            return Vec::new();
        };

        log::info!(
            "Calibrating ({}, {}) to {} cd/m²",
            calibration.target.x,
            calibration.target.y,
            calibration.known_value
        );
        let session = session.id.clone();
        let token = self.sequencer.issue(RequestChannel::Calibration);
        vec![Effect::Request(Request::Calibrate {
            token,
            session,
            calibration,
        })]
    }

    pub(super) fn handle_reference_cancelled(&mut self) -> Vec<Effect> {
        if self.calibration.is_awaiting_value() {
            log::info!("Calibration cancelled");
            // Cancelling never fails
            let _ = self.calibration.resolve(ReferenceInput::Cancelled);
            self.touch();
        }
        Vec::new()
    }

    pub(super) fn handle_calibration_completed(
        &mut self,
        token: RequestToken,
        result: Result<CalibrationOutcome>,
    ) -> Vec<Effect> {
        if !self.sequencer.is_current(&token) {
            log::debug!("Discarding superseded calibration response");
            return Vec::new();
        }
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Calibration failed: {}", e);
                return vec![Effect::Notify(Notification::error(format!(
                    "Calibration failed: {e}"
                )))];
            }
        };
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };

        session.apply_calibration(outcome.scale_factor, outcome.stats);
        log::info!(
            "Calibration applied: scale {}, {}",
            outcome.scale_factor,
            outcome.stats
        );
        self.touch();

        let mut effects: Vec<Effect> = self.request_render(false).into_iter().collect();
        if self.histogram.open {
            effects.extend(self.request_histogram());
        }
        effects.push(Effect::Notify(Notification::success(format!(
            "Calibration applied (×{:.2})",
            outcome.scale_factor
        ))));
        effects
    }

    // Histogram

    pub(super) fn handle_histogram_opened(&mut self) -> Vec<Effect> {
        if !self.actions_enabled() || self.histogram.open {
            return Vec::new();
        }
        self.histogram.open = true;
        self.touch();
        self.request_histogram().into_iter().collect()
    }

    pub(super) fn handle_histogram_mode(&mut self, mode: HistogramMode) -> Vec<Effect> {
        if mode == self.histogram.mode {
            return Vec::new();
        }
        self.histogram.mode = mode;
        self.histogram.histogram = None;
        self.touch();
        if self.histogram.open {
            self.request_histogram().into_iter().collect()
        } else {
            Vec::new()
        }
    }

    pub(super) fn handle_histogram_closed(&mut self) -> Vec<Effect> {
        if self.histogram.open {
            self.histogram.open = false;
            self.touch();
        }
        Vec::new()
    }

    pub(super) fn handle_histogram_completed(
        &mut self,
        token: RequestToken,
        mode: HistogramMode,
        result: Result<Histogram>,
    ) -> Vec<Effect> {
        if !self.sequencer.is_current(&token) {
            log::debug!("Discarding stale histogram ({})", mode.as_str());
            return Vec::new();
        }
        self.histogram.pending = false;
        self.touch();
        match result {
            Ok(histogram) => {
                log::debug!("Histogram loaded: {} bins ({})", histogram.bins.len(), mode.as_str());
                self.histogram.histogram = Some(histogram);
                Vec::new()
            }
            Err(e) => {
                log::error!("Histogram failed: {}", e);
                vec![Effect::Notify(Notification::error(format!(
                    "Failed to load histogram: {e}"
                )))]
            }
        }
    }

    // Requests

    /// Issue a render of the current controls. `show_loading` marks
    /// operator-triggered renders that hold the loading indicator.
    fn request_render(&mut self, show_loading: bool) -> Option<Effect> {
        let session = self.session.as_ref()?.id.clone();
        let params = self.controls.build();
        let token = self.sequencer.issue(RequestChannel::Render);
        if show_loading {
            let message = if params.false_color {
                FALSE_COLOR_RENDER_MESSAGE
            } else {
                RENDER_MESSAGE
            };
            self.loading.begin(token, message);
        }
        Some(Effect::Request(Request::Render {
            token,
            session,
            params,
        }))
    }

    fn request_histogram(&mut self) -> Option<Effect> {
        let session = self.session.as_ref()?.id.clone();
        let mode = self.histogram.mode;
        let token = self.sequencer.issue(RequestChannel::Histogram);
        self.histogram.pending = true;
        Some(Effect::Request(Request::Histogram {
            token,
            session,
            mode,
        }))
    }

    /// Keep stored coordinates inside the current source image.
    fn clamp_to_source(&self, at: SourceCoordinates) -> SourceCoordinates {
        match &self.session {
            Some(session) => SourceCoordinates::new(
                at.x.min(session.source_width.saturating_sub(1)),
                at.y.min(session.source_height.saturating_sub(1)),
            ),
            None => at,
        }
    }
}
