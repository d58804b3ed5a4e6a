//! Events fed into the controller and the effects it asks the front end to run.
//!
//! Every input, control change and backend completion is an [`Event`]. The
//! controller answers with [`Effect`]s: network requests to run off the UI
//! thread, a modal prompt to show, or a notification to display.

use std::path::PathBuf;

use crate::calibration::CalibrationRequest;
use crate::controls::{Colormap, RenderParameters};
use crate::error::Result;
use crate::frame::RenderedFrame;
use crate::geometry::{DisplayPoint, SourceCoordinates};
use crate::sequence::RequestToken;
use crate::session::{Histogram, HistogramMode, LuminanceStats, SessionId};

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// A transient message for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub session_id: SessionId,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub stats: LuminanceStats,
    pub calibrated: bool,
}

/// Result of a successful calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationOutcome {
    pub scale_factor: f64,
    pub stats: LuminanceStats,
}

/// A backend call the front end must run off the UI thread.
///
/// Completions come back as the matching `*Completed` event carrying the
/// same token.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Upload {
        token: RequestToken,
        path: PathBuf,
    },
    Render {
        token: RequestToken,
        session: SessionId,
        params: RenderParameters,
    },
    ProbePixel {
        token: RequestToken,
        session: SessionId,
        at: SourceCoordinates,
    },
    ProbeRegion {
        token: RequestToken,
        session: SessionId,
        start: SourceCoordinates,
        end: SourceCoordinates,
    },
    Calibrate {
        token: RequestToken,
        session: SessionId,
        calibration: CalibrationRequest,
    },
    Histogram {
        token: RequestToken,
        session: SessionId,
        mode: HistogramMode,
    },
}

impl Request {
    pub fn token(&self) -> RequestToken {
        match self {
            Request::Upload { token, .. }
            | Request::Render { token, .. }
            | Request::ProbePixel { token, .. }
            | Request::ProbeRegion { token, .. }
            | Request::Calibrate { token, .. }
            | Request::Histogram { token, .. } => *token,
        }
    }

    /// Short operation name for logs and errors.
    pub fn operation(&self) -> &'static str {
        match self {
            Request::Upload { .. } => "upload",
            Request::Render { .. } => "render",
            Request::ProbePixel { .. } => "pixel",
            Request::ProbeRegion { .. } => "roi",
            Request::Calibrate { .. } => "calibrate",
            Request::Histogram { .. } => "histogram",
        }
    }
}

/// Side effects requested by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run a backend call and feed its completion back as an event
    Request(Request),
    /// Ask the operator for the known luminance at `at`; answer with
    /// [`Event::ReferenceValueSubmitted`] or [`Event::ReferenceValueCancelled`]
    PromptReferenceValue { at: SourceCoordinates },
    /// Show a transient notification
    Notify(Notification),
}

/// Inputs to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // Session
    /// Operator picked or dropped an image file
    UploadRequested(PathBuf),
    /// Upload finished
    UploadCompleted {
        token: RequestToken,
        result: Result<UploadOutcome>,
    },
    /// Render finished
    RenderCompleted {
        token: RequestToken,
        result: Result<RenderedFrame>,
    },
    /// Displayed image size changed
    DisplayResized { width: f32, height: f32 },

    // Pointer, relative to the displayed image
    /// Pointer pressed
    PointerDown(DisplayPoint),
    /// Pointer moved while pressed
    PointerMoved(DisplayPoint),
    /// Pointer released; `None` if released outside the image
    PointerUp(Option<DisplayPoint>),

    // Probes
    /// Pixel probe finished
    PixelProbeCompleted {
        token: RequestToken,
        at: SourceCoordinates,
        result: Result<f64>,
    },
    /// Region probe finished
    RegionProbeCompleted {
        token: RequestToken,
        start: SourceCoordinates,
        end: SourceCoordinates,
        result: Result<f64>,
    },

    // Controls
    /// Exposure slider moved
    ExposureChanged(f64),
    /// Gamma slider moved
    GammaChanged(f64),
    /// sRGB checkbox toggled
    SrgbToggled(bool),
    /// False-color checkbox toggled
    FalseColorToggled(bool),
    /// Colormap selected
    ColormapSelected(Colormap),
    /// False-color range edited
    FalseColorRangeEdited { min: f64, max: f64 },
    /// Show color scale checkbox toggled
    ColorScaleToggled(bool),

    // Annotations
    /// Clear all annotations
    ClearAnnotations,

    // Calibration
    /// Arm calibration
    CalibrateRequested,
    /// Reference prompt answered
    ReferenceValueSubmitted(String),
    /// Reference prompt dismissed
    ReferenceValueCancelled,
    /// Calibration finished
    CalibrationCompleted {
        token: RequestToken,
        result: Result<CalibrationOutcome>,
    },

    // Histogram
    /// Histogram view opened
    HistogramOpened,
    /// Histogram mode changed
    HistogramModeSelected(HistogramMode),
    /// Histogram view closed
    HistogramClosed,
    /// Histogram fetch finished
    HistogramCompleted {
        token: RequestToken,
        mode: HistogramMode,
        result: Result<Histogram>,
    },
}
