//! Decoding of base64 PNG data URLs into RGBA rasters.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hdrprobe_core::RasterImage;

use crate::error::{ClientError, Result};

/// Decode a `data:<mime>;base64,<payload>` URL into an RGBA raster.
pub fn decode_data_url(url: &str) -> Result<RasterImage> {
    let (header, payload) = url.split_once(',').ok_or(ClientError::InvalidDataUrl)?;
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(ClientError::InvalidDataUrl);
    }

    let bytes = STANDARD.decode(payload.trim())?;
    let rgba = image::load_from_memory(&bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::trace!("Decoded {}x{} raster from {} bytes", width, height, bytes.len());

    RasterImage::from_rgba(width, height, rgba.into_raw()).ok_or(ClientError::InvalidRaster)
}
