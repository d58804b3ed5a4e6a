//! JSON bodies of the processing server's API.
//!
//! Field names follow the server's camelCase aliases.

use hdrprobe_core::{
    CalibrationOutcome, LuminanceStats, RasterImage, RenderParameters, SessionId,
    UploadOutcome,
};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// `POST /api/upload` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub session_id: String,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub stats: LuminanceStats,
    #[serde(default)]
    pub calibrated: bool,
}

impl From<UploadResponse> for UploadOutcome {
    fn from(response: UploadResponse) -> Self {
        UploadOutcome {
            session_id: SessionId::new(response.session_id),
            filename: response.filename,
            width: response.width,
            height: response.height,
            stats: response.stats,
            calibrated: response.calibrated,
        }
    }
}

/// `POST /api/render` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderBody<'a> {
    pub session_id: &'a str,
    #[serde(flatten)]
    pub params: &'a RenderParameters,
}

/// `POST /api/render` response. Images are PNG data URLs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenderResponse {
    pub image: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub colorbar: Option<String>,
}

impl RenderResponse {
    /// Check a decoded preview against the size the server reported.
    /// Missing dimensions are not checked.
    pub fn check_size(&self, image: &RasterImage) -> Result<()> {
        let actual = (image.width(), image.height());
        let reported = (
            self.width.unwrap_or(actual.0),
            self.height.unwrap_or(actual.1),
        );
        if reported == actual {
            Ok(())
        } else {
            Err(ClientError::RasterSizeMismatch { reported, actual })
        }
    }
}

/// `POST /api/pixel` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelBody<'a> {
    pub session_id: &'a str,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PixelResponse {
    pub luminance: f64,
}

/// `POST /api/roi` body. Corners are sent as captured.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiBody<'a> {
    pub session_id: &'a str,
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RoiResponse {
    pub mean: f64,
}

/// `POST /api/calibrate` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrateBody<'a> {
    pub session_id: &'a str,
    pub x: u32,
    pub y: u32,
    pub known_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrateResponse {
    pub scale_factor: f64,
    pub stats: LuminanceStats,
    #[serde(default)]
    pub calibrated: bool,
}

impl From<CalibrateResponse> for CalibrationOutcome {
    fn from(response: CalibrateResponse) -> Self {
        CalibrationOutcome {
            scale_factor: response.scale_factor,
            stats: response.stats,
        }
    }
}

/// `GET /healthz` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
