//! Global constants for the HDRProbe application

use std::time::Duration;

/// How long a notification stays on screen
pub const TOAST_DURATION: Duration = Duration::from_millis(4200);

/// File extensions offered by the open dialog
pub const IMAGE_EXTENSIONS: &[&str] = &["hdr", "exr", "pfm", "tif", "tiff", "png", "jpg", "jpeg"];

/// Open dialog filter name
pub const IMAGE_FILTER_NAME: &str = "HDR images";

/// Texture name for the rendered preview
pub const PREVIEW_TEXTURE: &str = "hdr-preview";

/// Texture name for the color scale legend
pub const COLORBAR_TEXTURE: &str = "hdr-colorbar";
