//! Anchors and offset resolution.

use crate::foundation::core::PixelPoint;
use serde::{Deserialize, Serialize};

/// Named reference point on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    /// Canvas center.
    Center,
    /// Top-left corner.
    TopLeft,
    /// Midpoint of the top edge.
    TopCenter,
    /// Top-right corner.
    TopRight,
    /// Midpoint of the left edge.
    #[serde(alias = "left-center")]
    CenterLeft,
    /// Midpoint of the right edge.
    #[serde(alias = "right-center")]
    CenterRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Midpoint of the bottom edge.
    BottomCenter,
    /// Bottom-right corner.
    BottomRight,
}

/// Horizontal third an anchor sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalEdge {
    /// Left edge.
    Start,
    /// Horizontal middle.
    Middle,
    /// Right edge.
    End,
}

/// Vertical third an anchor sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalEdge {
    /// Top edge.
    Start,
    /// Vertical middle.
    Middle,
    /// Bottom edge.
    End,
}

impl Anchor {
    /// All nine anchors.
    pub const ALL: [Anchor; 9] = [
        Anchor::Center,
        Anchor::TopLeft,
        Anchor::TopCenter,
        Anchor::TopRight,
        Anchor::CenterLeft,
        Anchor::CenterRight,
        Anchor::BottomLeft,
        Anchor::BottomCenter,
        Anchor::BottomRight,
    ];

    /// Decompose into horizontal/vertical placement.
    pub fn edges(self) -> (HorizontalEdge, VerticalEdge) {
        use HorizontalEdge as H;
        use VerticalEdge as V;
        match self {
            Anchor::Center => (H::Middle, V::Middle),
            Anchor::TopLeft => (H::Start, V::Start),
            Anchor::TopCenter => (H::Middle, V::Start),
            Anchor::TopRight => (H::End, V::Start),
            Anchor::CenterLeft => (H::Start, V::Middle),
            Anchor::CenterRight => (H::End, V::Middle),
            Anchor::BottomLeft => (H::Start, V::End),
            Anchor::BottomCenter => (H::Middle, V::End),
            Anchor::BottomRight => (H::End, V::End),
        }
    }

    /// Base point of this anchor on a `width × height` canvas.
    pub fn base_point(self, width: u32, height: u32) -> PixelPoint {
        let (h, v) = self.edges();
        PixelPoint::new(edge_coord(h.into(), width), edge_coord(v.into(), height))
    }

    /// Top-left corner of a `w × h` box aligned to `point` the way this anchor is aligned to the
    /// canvas: a top-left anchor puts the box's top-left corner on the point, a center anchor
    /// centers the box on it, a bottom-right anchor puts its bottom-right corner there.
    pub fn place_box(self, point: PixelPoint, w: u32, h: u32) -> PixelPoint {
        let (he, ve) = self.edges();
        PixelPoint::new(
            point.x - edge_coord(he.into(), w),
            point.y - edge_coord(ve.into(), h),
        )
    }
}

#[derive(Clone, Copy)]
enum Edge {
    Start,
    Middle,
    End,
}

impl From<HorizontalEdge> for Edge {
    fn from(e: HorizontalEdge) -> Self {
        match e {
            HorizontalEdge::Start => Edge::Start,
            HorizontalEdge::Middle => Edge::Middle,
            HorizontalEdge::End => Edge::End,
        }
    }
}

impl From<VerticalEdge> for Edge {
    fn from(e: VerticalEdge) -> Self {
        match e {
            VerticalEdge::Start => Edge::Start,
            VerticalEdge::Middle => Edge::Middle,
            VerticalEdge::End => Edge::End,
        }
    }
}

fn edge_coord(edge: Edge, extent: u32) -> i64 {
    let extent = i64::from(extent);
    match edge {
        Edge::Start => 0,
        Edge::Middle => extent / 2,
        Edge::End => extent,
    }
}

/// Resolve an anchor plus pixel offsets to absolute canvas coordinates.
///
/// Offsets may be negative and the result is not clamped to the canvas.
pub fn resolve_position(
    anchor: Anchor,
    offset_x: i64,
    offset_y: i64,
    canvas_width: u32,
    canvas_height: u32,
) -> PixelPoint {
    let base = anchor.base_point(canvas_width, canvas_height);
    PixelPoint::new(base.x + offset_x, base.y + offset_y)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/position.rs"]
mod tests;
