//! Display-space to source-space coordinate mapping.
//!
//! The rendered image is shown scaled to fit the viewer. Pointer positions
//! arrive in display space (relative to the top-left corner of the displayed
//! image) and are mapped back to pixel coordinates of the original HDR image
//! before any probe is issued. Overlay drawing uses the inverse mapping.

use serde::{Deserialize, Serialize};

/// A position in display space, relative to the displayed image's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayPoint {
    pub x: f32,
    pub y: f32,
}

impl DisplayPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another display point.
    pub fn distance_to(&self, other: &DisplayPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Pixel coordinates in the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceCoordinates {
    pub x: u32,
    pub y: u32,
}

impl SourceCoordinates {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A pointer position captured in both coordinate spaces.
///
/// The source coordinates are fixed at capture time, so a later resize does
/// not move a drag that is already in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub display: DisplayPoint,
    pub source: SourceCoordinates,
}

/// On-screen size of the displayed image together with the size of the
/// source image it represents.
///
/// Must be rebuilt whenever the displayed image changes size (new image,
/// viewport resize); a stale geometry maps pointers to the wrong pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayGeometry {
    source_width: u32,
    source_height: u32,
    display_width: f32,
    display_height: f32,
}

impl DisplayGeometry {
    /// Create a geometry, or `None` if either size is empty or not finite.
    pub fn new(
        source_width: u32,
        source_height: u32,
        display_width: f32,
        display_height: f32,
    ) -> Option<Self> {
        if source_width == 0 || source_height == 0 {
            return None;
        }
        if !display_width.is_finite()
            || !display_height.is_finite()
            || display_width <= 0.0
            || display_height <= 0.0
        {
            return None;
        }
        Some(Self {
            source_width,
            source_height,
            display_width,
            display_height,
        })
    }

    pub fn source_width(&self) -> u32 {
        self.source_width
    }

    pub fn source_height(&self) -> u32 {
        self.source_height
    }

    pub fn display_width(&self) -> f32 {
        self.display_width
    }

    pub fn display_height(&self) -> f32 {
        self.display_height
    }

    /// Source pixels per display pixel, horizontally.
    pub fn scale_x(&self) -> f64 {
        f64::from(self.source_width) / f64::from(self.display_width)
    }

    /// Source pixels per display pixel, vertically.
    pub fn scale_y(&self) -> f64 {
        f64::from(self.source_height) / f64::from(self.display_height)
    }

    /// Map a display position to source pixel coordinates.
    ///
    /// Each axis is scaled, rounded to the nearest pixel and clamped into
    /// `[0, dim - 1]`, so any input (including positions outside the
    /// displayed image) yields valid coordinates.
    pub fn to_source(&self, point: DisplayPoint) -> SourceCoordinates {
        SourceCoordinates {
            x: scale_axis(point.x, self.scale_x(), self.source_width),
            y: scale_axis(point.y, self.scale_y(), self.source_height),
        }
    }

    /// Map a display position into a pointer sample carrying both spaces.
    pub fn sample(&self, point: DisplayPoint) -> PointerSample {
        PointerSample {
            display: point,
            source: self.to_source(point),
        }
    }

    /// Map source coordinates back into display space
    /// (`display = source / source_dim * display_dim`).
    pub fn to_display(&self, coords: SourceCoordinates) -> DisplayPoint {
        let x = f64::from(coords.x) / f64::from(self.source_width) * f64::from(self.display_width);
        let y =
            f64::from(coords.y) / f64::from(self.source_height) * f64::from(self.display_height);
        DisplayPoint::new(x as f32, y as f32)
    }
}

fn scale_axis(display: f32, scale: f64, dim: u32) -> u32 {
    let scaled = (f64::from(display) * scale).round();
    let max = f64::from(dim.saturating_sub(1));
    // NaN survives clamp and casts to 0
    scaled.clamp(0.0, max) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn full_hd_at_half_size() -> DisplayGeometry {
        DisplayGeometry::new(1920, 1080, 960.0, 540.0).unwrap()
    }

    #[test]
    fn test_scale_factors() {
        let geometry = full_hd_at_half_size();
        assert_eq!(geometry.scale_x(), 2.0);
        assert_eq!(geometry.scale_y(), 2.0);
    }

    #[test]
    fn test_to_source_scales_and_rounds() {
        let geometry = full_hd_at_half_size();
        assert_eq!(
            geometry.to_source(DisplayPoint::new(102.0, 101.0)),
            SourceCoordinates::new(204, 202)
        );
        assert_eq!(
            geometry.to_source(DisplayPoint::new(100.3, 100.2)),
            SourceCoordinates::new(201, 200)
        );
    }

    #[test]
    fn test_to_source_clamps_out_of_range() {
        let geometry = full_hd_at_half_size();
        assert_eq!(
            geometry.to_source(DisplayPoint::new(-10.0, -0.4)),
            SourceCoordinates::new(0, 0)
        );
        assert_eq!(
            geometry.to_source(DisplayPoint::new(960.0, 540.0)),
            SourceCoordinates::new(1919, 1079)
        );
        assert_eq!(
            geometry.to_source(DisplayPoint::new(5000.0, 5000.0)),
            SourceCoordinates::new(1919, 1079)
        );
    }

    #[test]
    fn test_to_source_handles_nan() {
        let geometry = full_hd_at_half_size();
        assert_eq!(
            geometry.to_source(DisplayPoint::new(f32::NAN, f32::NAN)),
            SourceCoordinates::new(0, 0)
        );
    }

    #[test]
    fn test_every_canvas_point_maps_inside_source() {
        // Non-integer scale in both directions
        let geometry = DisplayGeometry::new(1000, 333, 317.0, 911.0).unwrap();
        let mut y = 0.0;
        while y <= geometry.display_height() {
            let mut x = 0.0;
            while x <= geometry.display_width() {
                let coords = geometry.to_source(DisplayPoint::new(x, y));
                assert!(coords.x <= 999, "x out of range at ({x}, {y})");
                assert!(coords.y <= 332, "y out of range at ({x}, {y})");
                x += 3.7;
            }
            y += 3.7;
        }
    }

    #[test]
    fn test_to_display_inverts_scale() {
        let geometry = full_hd_at_half_size();
        let point = geometry.to_display(SourceCoordinates::new(400, 300));
        assert!(approx_eq(point.x, 200.0));
        assert!(approx_eq(point.y, 150.0));
    }

    #[test]
    fn test_rejects_empty_geometry() {
        assert!(DisplayGeometry::new(0, 100, 10.0, 10.0).is_none());
        assert!(DisplayGeometry::new(100, 100, 0.0, 10.0).is_none());
        assert!(DisplayGeometry::new(100, 100, 10.0, f32::INFINITY).is_none());
    }

    #[test]
    fn test_single_pixel_source() {
        let geometry = DisplayGeometry::new(1, 1, 400.0, 400.0).unwrap();
        assert_eq!(
            geometry.to_source(DisplayPoint::new(399.0, 200.0)),
            SourceCoordinates::new(0, 0)
        );
    }

    #[test]
    fn test_distance_to() {
        let a = DisplayPoint::new(0.0, 0.0);
        let b = DisplayPoint::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
    }
}
