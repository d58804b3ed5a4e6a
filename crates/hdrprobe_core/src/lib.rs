//! HDRProbe core - annotation, calibration and coordinate mapping.
//!
//! Everything in this crate is pure state and logic: no I/O, no threads and
//! no clocks. The front end feeds [`Event`]s into a [`Controller`], executes
//! the [`Effect`]s it returns, and redraws the overlay from
//! [`Controller::overlay`] whenever [`Controller::revision`] moves.

pub mod annotation;
pub mod calibration;
pub mod controller;
pub mod controls;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod gesture;
pub mod message;
pub mod overlay;
pub mod sequence;
pub mod session;

pub use annotation::{AnnotationEntry, AnnotationKind, AnnotationStore, PointTag, RegionTag};
pub use calibration::{CalibrationRequest, CalibrationState, CalibrationWorkflow, ReferenceInput};
pub use controller::{Controller, HistogramView, LoadingState};
pub use controls::{Colormap, ControlState, RenderParameters};
pub use error::{ProbeError, Result};
pub use frame::{RasterImage, RenderedFrame};
pub use geometry::{DisplayGeometry, DisplayPoint, PointerSample, SourceCoordinates};
pub use gesture::{DragState, GestureKind, Probe};
pub use message::{
    CalibrationOutcome, Effect, Event, Notification, NotificationKind, Request, UploadOutcome,
};
pub use overlay::{DrawCommand, OverlayTone};
pub use sequence::{RequestChannel, RequestSequencer, RequestToken};
pub use session::{Histogram, HistogramMode, LuminanceStats, Session, SessionId};
