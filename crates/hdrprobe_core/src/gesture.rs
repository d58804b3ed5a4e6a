//! Click-versus-drag classification of pointer gestures.

use crate::geometry::{DisplayPoint, PointerSample, SourceCoordinates};

/// Display-space distance below which a gesture counts as a click.
///
/// Strict: a gesture of exactly this length is a drag.
pub const CLICK_DISTANCE_THRESHOLD: f32 = 5.0;

/// Kind of probe a completed gesture asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Single pixel probe
    Point,
    /// Rectangular region probe
    Region,
}

/// Classify a gesture by the display-space distance between its endpoints.
pub fn classify(start: DisplayPoint, end: DisplayPoint) -> GestureKind {
    if start.distance_to(&end) < CLICK_DISTANCE_THRESHOLD {
        GestureKind::Point
    } else {
        GestureKind::Region
    }
}

/// A backend probe derived from a completed gesture, in source coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Luminance of a single pixel.
    Pixel(SourceCoordinates),
    /// Mean luminance of the rectangle spanned by two corners.
    ///
    /// Corners are kept as captured; normalization happens on read.
    Region {
        start: SourceCoordinates,
        end: SourceCoordinates,
    },
}

impl Probe {
    /// Build the probe for a gesture running from `start` to `end`.
    ///
    /// A click probes the pixel under the release point.
    pub fn from_gesture(start: &PointerSample, end: &PointerSample) -> Self {
        match classify(start.display, end.display) {
            GestureKind::Point => Probe::Pixel(end.source),
            GestureKind::Region => Probe::Region {
                start: start.source,
                end: end.source,
            },
        }
    }
}

/// Transient drag state between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No pointer is held.
    #[default]
    Idle,
    /// A pointer is held; `current` follows the latest move.
    Dragging {
        start: PointerSample,
        current: PointerSample,
    },
}

impl DragState {
    /// Start a drag at the given sample.
    pub fn begin(sample: PointerSample) -> Self {
        DragState::Dragging {
            start: sample,
            current: sample,
        }
    }

    /// Check if a drag is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    pub fn start(&self) -> Option<&PointerSample> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { start, .. } => Some(start),
        }
    }

    pub fn current(&self) -> Option<&PointerSample> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { current, .. } => Some(current),
        }
    }

    /// Move the live end of the drag. Returns false if no drag is active.
    pub fn update(&mut self, sample: PointerSample) -> bool {
        match self {
            DragState::Idle => false,
            DragState::Dragging { current, .. } => {
                *current = sample;
                true
            }
        }
    }

    /// End the drag and classify it.
    ///
    /// `end` is the release sample if one was reported; otherwise the last
    /// move is used. Returns `None` if no drag was active.
    pub fn finish(&mut self, end: Option<PointerSample>) -> Option<Probe> {
        match std::mem::take(self) {
            DragState::Idle => None,
            DragState::Dragging { start, current } => {
                let end = end.unwrap_or(current);
                Some(Probe::from_gesture(&start, &end))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DisplayGeometry;

    fn geometry() -> DisplayGeometry {
        DisplayGeometry::new(1920, 1080, 960.0, 540.0).unwrap()
    }

    #[test]
    fn test_short_gesture_is_point() {
        let kind = classify(DisplayPoint::new(100.0, 100.0), DisplayPoint::new(102.0, 101.0));
        assert_eq!(kind, GestureKind::Point);
    }

    #[test]
    fn test_threshold_is_strict() {
        // 3-4-5 triangle: exactly on the threshold
        let kind = classify(DisplayPoint::new(10.0, 10.0), DisplayPoint::new(13.0, 14.0));
        assert_eq!(kind, GestureKind::Region);

        let kind = classify(DisplayPoint::new(10.0, 10.0), DisplayPoint::new(14.99, 10.0));
        assert_eq!(kind, GestureKind::Point);
    }

    #[test]
    fn test_zero_length_gesture_is_point() {
        let p = DisplayPoint::new(42.0, 7.0);
        assert_eq!(classify(p, p), GestureKind::Point);
    }

    #[test]
    fn test_click_probes_release_pixel() {
        let geometry = geometry();
        let start = geometry.sample(DisplayPoint::new(100.0, 100.0));
        let end = geometry.sample(DisplayPoint::new(102.0, 101.0));

        assert_eq!(
            Probe::from_gesture(&start, &end),
            Probe::Pixel(SourceCoordinates::new(204, 202))
        );
    }

    #[test]
    fn test_drag_probes_region_with_raw_corners() {
        let geometry = geometry();
        let start = geometry.sample(DisplayPoint::new(200.0, 150.0));
        let end = geometry.sample(DisplayPoint::new(100.0, 100.0));

        assert_eq!(
            Probe::from_gesture(&start, &end),
            Probe::Region {
                start: SourceCoordinates::new(400, 300),
                end: SourceCoordinates::new(200, 200),
            }
        );
    }

    #[test]
    fn test_drag_lifecycle() {
        let geometry = geometry();
        let mut drag = DragState::default();
        assert!(!drag.is_active());
        assert!(!drag.update(geometry.sample(DisplayPoint::new(1.0, 1.0))));

        drag = DragState::begin(geometry.sample(DisplayPoint::new(100.0, 100.0)));
        assert!(drag.is_active());
        assert!(drag.update(geometry.sample(DisplayPoint::new(200.0, 150.0))));
        assert_eq!(
            drag.current().map(|s| s.source),
            Some(SourceCoordinates::new(400, 300))
        );

        let probe = drag.finish(None);
        assert_eq!(
            probe,
            Some(Probe::Region {
                start: SourceCoordinates::new(200, 200),
                end: SourceCoordinates::new(400, 300),
            })
        );
        assert!(!drag.is_active());
        assert_eq!(drag.finish(None), None);
    }

    #[test]
    fn test_finish_prefers_release_sample() {
        let geometry = geometry();
        let mut drag = DragState::begin(geometry.sample(DisplayPoint::new(100.0, 100.0)));
        drag.update(geometry.sample(DisplayPoint::new(300.0, 300.0)));

        // Released back near the start: a click, not the dragged region
        let probe = drag.finish(Some(geometry.sample(DisplayPoint::new(101.0, 100.0))));
        assert_eq!(probe, Some(Probe::Pixel(SourceCoordinates::new(202, 200))));
    }
}
