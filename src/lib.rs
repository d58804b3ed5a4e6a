//! HDRProbe - HDR luminance inspector
//!
//! A desktop front end for an HDR processing server: tone-mapped preview,
//! pixel and region luminance probes, and single-point calibration.

mod app;
pub mod config;
mod constants;
mod ui;
pub mod ui_constants;
mod worker;

pub use app::HdrProbeApp;
pub use worker::BackendWorker;
