//! Point and region luminance annotations for the current session.
//!
//! Tags are immutable once created and kept in insertion order. The store is
//! append-only apart from [`AnnotationStore::clear_all`], which empties both
//! collections together.

use serde::{Deserialize, Serialize};

use crate::geometry::SourceCoordinates;

/// Unit suffix for luminance values.
pub const LUMINANCE_UNIT: &str = "cd/m²";

/// Format a luminance value for lists and notifications.
pub fn format_luminance(value: f64) -> String {
    format!("{value:.2} {LUMINANCE_UNIT}")
}

/// Luminance of a single source pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointTag {
    pub x: u32,
    pub y: u32,
    /// Luminance in cd/m² as reported by the backend
    pub value: f64,
}

impl PointTag {
    pub fn new(at: SourceCoordinates, value: f64) -> Self {
        Self {
            x: at.x,
            y: at.y,
            value,
        }
    }

    pub fn position(&self) -> SourceCoordinates {
        SourceCoordinates::new(self.x, self.y)
    }

    /// Display label, e.g. `(204, 202)`.
    pub fn label(&self) -> String {
        format!("({}, {})", self.x, self.y)
    }
}

/// Mean luminance of a rectangular source region.
///
/// Corners are stored as captured and may be in any order; use
/// [`RegionTag::bounds`] to read them normalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionTag {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
    /// Mean luminance in cd/m² as reported by the backend
    pub value: f64,
}

impl RegionTag {
    pub fn new(start: SourceCoordinates, end: SourceCoordinates, value: f64) -> Self {
        Self {
            x0: start.x,
            y0: start.y,
            x1: end.x,
            y1: end.y,
            value,
        }
    }

    /// Normalized `(min, max)` corners.
    pub fn bounds(&self) -> (SourceCoordinates, SourceCoordinates) {
        (
            SourceCoordinates::new(self.x0.min(self.x1), self.y0.min(self.y1)),
            SourceCoordinates::new(self.x0.max(self.x1), self.y0.max(self.y1)),
        )
    }

    /// Check if the region has zero width or height.
    pub fn is_degenerate(&self) -> bool {
        self.x0 == self.x1 || self.y0 == self.y1
    }

    /// Display label with normalized corners, e.g. `(10, 20) → (50, 80)`.
    pub fn label(&self) -> String {
        let (min, max) = self.bounds();
        format!("({}, {}) → ({}, {})", min.x, min.y, max.x, max.y)
    }
}

/// Kind tag carried by each listed annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    Pixel,
    Region,
}

impl AnnotationKind {
    /// Get the display name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationKind::Pixel => "Pixel",
            AnnotationKind::Region => "ROI",
        }
    }
}

/// One row of the annotation list.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationEntry {
    pub kind: AnnotationKind,
    pub label: String,
    pub value: f64,
    /// Value formatted to two decimals with its unit
    pub value_text: String,
}

/// Ordered point and region annotations of one session.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    points: Vec<PointTag>,
    regions: Vec<RegionTag>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&mut self, tag: PointTag) {
        self.points.push(tag);
    }

    pub fn add_region(&mut self, tag: RegionTag) {
        self.regions.push(tag);
    }

    /// Remove every annotation of both kinds.
    pub fn clear_all(&mut self) {
        self.points.clear();
        self.regions.clear();
    }

    pub fn points(&self) -> &[PointTag] {
        &self.points
    }

    pub fn regions(&self) -> &[RegionTag] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.points.len() + self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.regions.is_empty()
    }

    /// All annotations for display: point tags first, then region tags,
    /// each in insertion order.
    pub fn list_annotations(&self) -> Vec<AnnotationEntry> {
        let points = self.points.iter().map(|tag| AnnotationEntry {
            kind: AnnotationKind::Pixel,
            label: tag.label(),
            value: tag.value,
            value_text: format_luminance(tag.value),
        });
        let regions = self.regions.iter().map(|tag| AnnotationEntry {
            kind: AnnotationKind::Region,
            label: tag.label(),
            value: tag.value,
            value_text: format_luminance(tag.value),
        });
        points.chain(regions).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated_store() -> AnnotationStore {
        let mut store = AnnotationStore::new();
        store.add_region(RegionTag::new(
            SourceCoordinates::new(50, 80),
            SourceCoordinates::new(10, 20),
            3.14159,
        ));
        store.add_point(PointTag::new(SourceCoordinates::new(204, 202), 120.0));
        store.add_point(PointTag::new(SourceCoordinates::new(0, 7), 0.005));
        store
    }

    #[test]
    fn test_region_label_is_normalized() {
        let tag = RegionTag::new(
            SourceCoordinates::new(50, 80),
            SourceCoordinates::new(10, 20),
            1.0,
        );
        assert_eq!(tag.label(), "(10, 20) → (50, 80)");
        // Stored corners stay as captured
        assert_eq!((tag.x0, tag.y0, tag.x1, tag.y1), (50, 80, 10, 20));
    }

    #[test]
    fn test_list_orders_points_before_regions() {
        let entries = populated_store().list_annotations();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].kind, AnnotationKind::Pixel);
        assert_eq!(entries[0].label, "(204, 202)");
        assert_eq!(entries[0].value_text, "120.00 cd/m²");
        assert_eq!(entries[1].label, "(0, 7)");
        assert_eq!(entries[1].value_text, "0.01 cd/m²");
        assert_eq!(entries[2].kind, AnnotationKind::Region);
        assert_eq!(entries[2].label, "(10, 20) → (50, 80)");
        assert_eq!(entries[2].value_text, "3.14 cd/m²");
    }

    #[test]
    fn test_clear_all_empties_both_kinds() {
        let mut store = populated_store();
        assert_eq!(store.len(), 3);

        store.clear_all();
        assert!(store.is_empty());
        assert!(store.list_annotations().is_empty());

        // Idempotent
        store.clear_all();
        assert!(store.list_annotations().is_empty());
    }

    #[test]
    fn test_degenerate_region() {
        let line = RegionTag::new(SourceCoordinates::new(5, 5), SourceCoordinates::new(5, 90), 0.0);
        assert!(line.is_degenerate());

        let area = RegionTag::new(SourceCoordinates::new(5, 5), SourceCoordinates::new(6, 6), 0.0);
        assert!(!area.is_degenerate());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(AnnotationKind::Pixel.name(), "Pixel");
        assert_eq!(AnnotationKind::Region.name(), "ROI");
    }
}
