//! The single owner of application state.
//!
//! [`Controller::update`] is the only way state changes. Handlers live in
//! `handlers.rs`, one per event category.

mod handlers;


use crate::annotation::AnnotationStore;
use crate::calibration::CalibrationWorkflow;
use crate::controls::ControlState;
use crate::frame::{RasterImage, RenderedFrame};
use crate::geometry::DisplayGeometry;
use crate::gesture::DragState;
use crate::message::{Effect, Event};
use crate::overlay::{self, DrawCommand};
use crate::sequence::{RequestSequencer, RequestToken};
use crate::session::{Histogram, HistogramMode, Session};

/// Message shown while an upload is in flight.
pub const UPLOAD_MESSAGE: &str = "Uploading image…";
/// Message shown while a tone-mapped render is in flight.
pub const RENDER_MESSAGE: &str = "Updating preview…";
/// Message shown while a false-color render is in flight.
pub const FALSE_COLOR_RENDER_MESSAGE: &str = "Updating false-color view…";

/// Requests that currently hold the loading indicator.
///
/// Every holder is released when its response arrives, current or stale,
/// success or failure.
#[derive(Debug, Clone, Default)]
pub struct LoadingState {
    holders: Vec<RequestToken>,
    message: String,
}

impl LoadingState {
    pub fn is_active(&self) -> bool {
        !self.holders.is_empty()
    }

    /// Number of requests holding the indicator.
    pub fn count(&self) -> usize {
        self.holders.len()
    }

    /// Message of the most recent holder.
    pub fn message(&self) -> &str {
        &self.message
    }

    fn begin(&mut self, token: RequestToken, message: &str) {
        self.holders.push(token);
        self.message = message.to_string();
    }

    /// Release the slot held by `token`. Returns false if it held none.
    fn finish(&mut self, token: &RequestToken) -> bool {
        match self.holders.iter().position(|held| held == token) {
            Some(index) => {
                self.holders.remove(index);
                true
            }
            None => false,
        }
    }

    /// Hand the slot held by `from` over to `to`, keeping the message.
    fn transfer(&mut self, from: &RequestToken, to: RequestToken) {
        if let Some(held) = self.holders.iter_mut().find(|held| **held == *from) {
            *held = to;
        }
    }
}

/// Histogram dialog state.
#[derive(Debug, Clone, Default)]
pub struct HistogramView {
    open: bool,
    mode: HistogramMode,
    histogram: Option<Histogram>,
    pending: bool,
}

impl HistogramView {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn mode(&self) -> HistogramMode {
        self.mode
    }

    /// Latest histogram for the selected mode, if loaded.
    pub fn histogram(&self) -> Option<&Histogram> {
        self.histogram.as_ref()
    }

    /// Whether a fetch is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Application state and the reducer over it.
#[derive(Debug, Default)]
pub struct Controller {
    session: Option<Session>,
    geometry: Option<DisplayGeometry>,
    frame: Option<RenderedFrame>,
    store: AnnotationStore,
    drag: DragState,
    calibration: CalibrationWorkflow,
    controls: ControlState,
    histogram: HistogramView,
    sequencer: RequestSequencer,
    loading: LoadingState,
    pending_upload: Option<RequestToken>,
    revision: u64,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event and return the effects the front end must run.
    pub fn update(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::UploadRequested(path) => self.handle_upload_requested(path),
            Event::UploadCompleted { token, result } => self.handle_upload_completed(token, result),
            Event::RenderCompleted { token, result } => self.handle_render_completed(token, result),
            Event::DisplayResized { width, height } => self.handle_display_resized(width, height),

            Event::PointerDown(point) => self.handle_pointer_down(point),
            Event::PointerMoved(point) => self.handle_pointer_moved(point),
            Event::PointerUp(point) => self.handle_pointer_up(point),

            Event::PixelProbeCompleted { token, at, result } => {
                self.handle_pixel_probe_completed(token, at, result)
            }
            Event::RegionProbeCompleted {
                token,
                start,
                end,
                result,
            } => self.handle_region_probe_completed(token, start, end, result),

            Event::ExposureChanged(_)
            | Event::GammaChanged(_)
            | Event::SrgbToggled(_)
            | Event::FalseColorToggled(_)
            | Event::ColormapSelected(_)
            | Event::FalseColorRangeEdited { .. }
            | Event::ColorScaleToggled(_) => self.handle_control(event),

            Event::ClearAnnotations => self.handle_clear_annotations(),

            Event::CalibrateRequested => self.handle_calibrate_requested(),
            Event::ReferenceValueSubmitted(text) => self.handle_reference_submitted(text),
            Event::ReferenceValueCancelled => self.handle_reference_cancelled(),
            Event::CalibrationCompleted { token, result } => {
                self.handle_calibration_completed(token, result)
            }

            Event::HistogramOpened => self.handle_histogram_opened(),
            Event::HistogramModeSelected(mode) => self.handle_histogram_mode(mode),
            Event::HistogramClosed => self.handle_histogram_closed(),
            Event::HistogramCompleted {
                token,
                mode,
                result,
            } => self.handle_histogram_completed(token, mode, result),
        }
    }

    /// Monotonic counter bumped on every state change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Current display geometry; `None` until the rendered image is sized.
    pub fn geometry(&self) -> Option<&DisplayGeometry> {
        self.geometry.as_ref()
    }

    pub fn frame(&self) -> Option<&RenderedFrame> {
        self.frame.as_ref()
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn calibration(&self) -> &CalibrationWorkflow {
        &self.calibration
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn histogram(&self) -> &HistogramView {
        &self.histogram
    }

    pub fn loading(&self) -> &LoadingState {
        &self.loading
    }

    /// Whether an upload is in flight.
    pub fn is_uploading(&self) -> bool {
        self.pending_upload.is_some()
    }

    /// Calibrate, clear and histogram need a session and no upload in flight.
    pub fn actions_enabled(&self) -> bool {
        self.session.is_some() && self.pending_upload.is_none()
    }

    /// Color-scale legend to display, if any.
    pub fn colorbar(&self) -> Option<&RasterImage> {
        if !self.controls.color_scale_visible() {
            return None;
        }
        self.frame.as_ref()?.colorbar.as_ref()
    }

    /// Draw commands for the current state.
    pub fn overlay(&self) -> Vec<DrawCommand> {
        match &self.geometry {
            Some(geometry) => overlay::render(geometry, &self.store, &self.drag),
            None => Vec::new(),
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}
