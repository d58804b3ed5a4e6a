//! Overlay projection of annotations onto the displayed image.
//!
//! [`render`] is a pure function of the current geometry, the annotation
//! store and the drag state. The front end calls it whenever the controller
//! revision changes and paints the returned commands in order.

use crate::annotation::AnnotationStore;
use crate::geometry::{DisplayGeometry, DisplayPoint, SourceCoordinates};
use crate::gesture::DragState;

/// Point marker radius in display pixels.
pub const MARKER_RADIUS: f32 = 4.0;
/// Offset of a label from its anchor.
pub const LABEL_OFFSET: f32 = 6.0;
/// Vertical offset of region labels below the top edge.
pub const REGION_LABEL_BASELINE: f32 = 12.0;
/// Line width for rectangles.
pub const STROKE_WIDTH: f32 = 2.0;

/// Palette slot for a draw command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTone {
    PointTag,
    RegionTag,
    DragPreview,
}

/// One primitive over the display canvas, in display coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled circle
    Marker {
        center: DisplayPoint,
        radius: f32,
        tone: OverlayTone,
    },
    /// Stroked rectangle with normalized corners
    Rect {
        min: DisplayPoint,
        max: DisplayPoint,
        tone: OverlayTone,
    },
    /// Text with its baseline-left corner at `anchor`
    Label {
        anchor: DisplayPoint,
        text: String,
        tone: OverlayTone,
    },
}

/// Project the store and any active drag into draw commands.
///
/// Order: each point tag (marker, label), each region tag (rectangle,
/// label at its top-right corner), then the drag preview if a drag is active.
pub fn render(
    geometry: &DisplayGeometry,
    store: &AnnotationStore,
    drag: &DragState,
) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(store.points().len() * 2 + store.regions().len() * 2 + 1);

    for tag in store.points() {
        let center = geometry.to_display(tag.position());
        commands.push(DrawCommand::Marker {
            center,
            radius: MARKER_RADIUS,
            tone: OverlayTone::PointTag,
        });
        commands.push(DrawCommand::Label {
            anchor: DisplayPoint::new(center.x + LABEL_OFFSET, center.y - LABEL_OFFSET),
            text: format!("{:.1}", tag.value),
            tone: OverlayTone::PointTag,
        });
    }

    for tag in store.regions() {
        let (min, max) = tag.bounds();
        let (min, max) = (geometry.to_display(min), geometry.to_display(max));
        commands.push(DrawCommand::Rect {
            min,
            max,
            tone: OverlayTone::RegionTag,
        });
        commands.push(DrawCommand::Label {
            anchor: DisplayPoint::new(max.x + LABEL_OFFSET, min.y + REGION_LABEL_BASELINE),
            text: format!("{:.1}", tag.value),
            tone: OverlayTone::RegionTag,
        });
    }

    if let (Some(start), Some(current)) = (drag.start(), drag.current()) {
        let (min, max) = display_bounds(geometry, start.source, current.source);
        commands.push(DrawCommand::Rect {
            min,
            max,
            tone: OverlayTone::DragPreview,
        });
    }

    commands
}

fn display_bounds(
    geometry: &DisplayGeometry,
    a: SourceCoordinates,
    b: SourceCoordinates,
) -> (DisplayPoint, DisplayPoint) {
    let min = SourceCoordinates::new(a.x.min(b.x), a.y.min(b.y));
    let max = SourceCoordinates::new(a.x.max(b.x), a.y.max(b.y));
    (geometry.to_display(min), geometry.to_display(max))
}
