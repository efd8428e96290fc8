//! Strip segments, their attachment points and the pickups spawned on them

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Path color (the host maps it onto the segment's main material)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A marked spot on a segment where a pickup may spawn.
///
/// `offset` is measured along the scroll axis from the segment's start,
/// `height` is the vertical placement the host renders it at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttachmentPoint {
    pub offset: f32,
    #[serde(default)]
    pub height: f32,
}

impl AttachmentPoint {
    pub fn new(offset: f32, height: f32) -> Self {
        Self { offset, height }
    }

    /// Whether the point lies on a segment of the given extent
    pub fn fits(&self, extent: f32) -> bool {
        self.offset.is_finite() && self.height.is_finite() && (0.0..=extent).contains(&self.offset)
    }
}

/// A placeable kind of segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentTemplate {
    pub name: String,
    /// Horizontal length of the segment
    pub extent: f32,
    #[serde(default)]
    pub attachment_points: Vec<AttachmentPoint>,
}

impl SegmentTemplate {
    pub fn new(name: impl Into<String>, extent: f32) -> Self {
        Self {
            name: name.into(),
            extent,
            attachment_points: Vec::new(),
        }
    }

    pub fn with_point(mut self, offset: f32, height: f32) -> Self {
        self.attachment_points.push(AttachmentPoint::new(offset, height));
        self
    }

    pub fn has_valid_extent(&self) -> bool {
        self.extent.is_finite() && self.extent > 0.0
    }
}

/// What a pickup is when spawned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Coin,
    /// Score ring; its inner region is the "center"
    ScoreRing,
}

/// Which region of a pickup the collision source reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitKind {
    Coin,
    ScoreRing,
    ScoreCenter,
}

impl HitKind {
    pub fn is_score(&self) -> bool {
        matches!(self, HitKind::ScoreRing | HitKind::ScoreCenter)
    }
}

/// A pickup entity attached to a segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub collected: bool,
}

/// One placed unit of the strip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Sequence number; the n-th segment ever appended
    pub index: u64,
    /// Index into the template palette; `None` for a caller-supplied first segment
    pub kind: Option<usize>,
    pub position: f32,
    pub extent: f32,
    pub color_index: usize,
    pub attachment_points: Vec<AttachmentPoint>,
    /// Pickups spawned on this segment (sorted by id)
    pub pickups: Vec<Pickup>,
}

impl Segment {
    /// Position where the next segment starts
    pub fn end(&self) -> f32 {
        self.position + self.extent
    }

    pub fn pickup_mut(&mut self, id: u32) -> Option<&mut Pickup> {
        self.pickups.iter_mut().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_point_fits() {
        assert!(AttachmentPoint::new(0.0, 1.0).fits(10.0));
        assert!(AttachmentPoint::new(10.0, 1.0).fits(10.0));
        assert!(!AttachmentPoint::new(10.5, 1.0).fits(10.0));
        assert!(!AttachmentPoint::new(-0.1, 1.0).fits(10.0));
        assert!(!AttachmentPoint::new(f32::NAN, 1.0).fits(10.0));
        assert!(!AttachmentPoint::new(2.0, f32::INFINITY).fits(10.0));
    }

    #[test]
    fn test_template_extent() {
        assert!(SegmentTemplate::new("flat", 10.0).has_valid_extent());
        assert!(!SegmentTemplate::new("flat", 0.0).has_valid_extent());
        assert!(!SegmentTemplate::new("flat", f32::NAN).has_valid_extent());
    }

    #[test]
    fn test_template_deserialize_defaults() {
        let t: SegmentTemplate =
            serde_json::from_str(r#"{"name":"hill","extent":12.0,"attachment_points":[{"offset":4.0}]}"#)
                .unwrap();
        assert_eq!(t.attachment_points, vec![AttachmentPoint::new(4.0, 0.0)]);
    }
}
