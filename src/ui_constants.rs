//! UI constants for consistent styling across the application.
//!
//! This module centralizes hardcoded sizes, spacing and overlay colors.

use egui::Color32;

/// Window dimensions.
pub mod window {
    /// Initial window size when no preference is stored
    pub const DEFAULT_SIZE: (f32, f32) = (1280.0, 800.0);
    /// Smallest usable window
    pub const MIN_SIZE: (f32, f32) = (800.0, 500.0);
    /// Title bar text
    pub const TITLE: &str = "HDRProbe - HDR Luminance Inspector";
}

/// Text size constants.
pub mod text {
    /// Section headers in the sidebars
    pub const SECTION_HEADER: f32 = 16.0;
    /// Body text and labels
    pub const BODY: f32 = 14.0;
    /// Overlay labels drawn over the image
    pub const OVERLAY_LABEL: f32 = 12.0;
    /// Status line and help text
    pub const SMALL: f32 = 12.0;
}

/// Spacing constants.
pub mod spacing {
    /// Tight spacing for compact elements
    pub const TIGHT: f32 = 4.0;
    /// Standard spacing between related elements
    pub const STANDARD: f32 = 8.0;
    /// Large spacing between sections
    pub const LARGE: f32 = 16.0;
}

/// Sidebar dimensions.
pub mod sidebar {
    /// Left (display controls) sidebar width
    pub const LEFT_WIDTH: f32 = 250.0;
    /// Right (annotations) sidebar width
    pub const RIGHT_WIDTH: f32 = 260.0;
}

/// Image viewer layout.
pub mod image_viewer {
    /// Height reserved under the image for the color scale
    pub const COLORBAR_HEIGHT: f32 = 48.0;
    /// Gap between the image and the color scale
    pub const COLORBAR_GAP: f32 = 6.0;
    /// Canvas background gray level
    pub const BACKGROUND_GRAY: u8 = 30;
}

/// Histogram dialog layout.
pub mod histogram {
    /// Plot area size
    pub const PLOT_SIZE: (f32, f32) = (520.0, 260.0);
    /// Line width of the histogram curve
    pub const LINE_WIDTH: f32 = 1.5;
}

/// Toast placement.
pub mod toast {
    /// Distance from the bottom-right window corner
    pub const MARGIN: f32 = 16.0;
    /// Maximum toast width
    pub const MAX_WIDTH: f32 = 360.0;
}

/// Overlay and status colors.
pub mod colors {
    use super::Color32;

    /// Point tag markers and labels
    pub const POINT_TAG: Color32 = Color32::from_rgb(255, 112, 112);
    /// Region tag rectangles and labels
    pub const REGION_TAG: Color32 = Color32::from_rgb(90, 169, 248);
    /// Rectangle preview while dragging
    pub const DRAG_PREVIEW: Color32 = Color32::WHITE;
    /// Backdrop behind overlay labels
    pub const LABEL_BACKDROP: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 160);
    /// Info toast background
    pub const INFO: Color32 = Color32::from_rgb(52, 73, 94);
    /// Success toast background
    pub const SUCCESS: Color32 = Color32::from_rgb(39, 125, 80);
    /// Error toast background
    pub const ERROR: Color32 = Color32::from_rgb(170, 52, 52);
    /// Histogram curve
    pub const HISTOGRAM_LINE: Color32 = Color32::from_rgb(90, 169, 248);
}
