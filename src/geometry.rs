//! Compositor-coordinate geometry primitives.
//!
//! Frames are expressed with the same `CGRect`/`CGPoint`/`CGSize` triple the
//! accessibility and window-server layers hand back, so the layout engine
//! never has to convert between a "pure" rect type and the bridge's wire
//! format.

use objc2_core_foundation::{CGPoint, CGRect, CGSize};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Minimum viable window size enforced by every layout system (§4.1).
pub const MIN_WINDOW_DIMENSION: f64 = 100.0;

/// A frame the Core hands to the compositor bridge.
pub type Frame = CGRect;
pub type Region = CGRect;

pub trait CGRectExt {
    fn mid(&self) -> CGPoint;
    fn area(&self) -> f64;
    fn contains(&self, point: CGPoint) -> bool;
    fn intersection(&self, other: &CGRect) -> CGRect;
    fn max_x(&self) -> f64;
    fn max_y(&self) -> f64;
    fn clamp_min_size(&self, min_w: f64, min_h: f64) -> CGRect;
    fn inset(&self, dx: f64, dy: f64) -> CGRect;
}

impl CGRectExt for CGRect {
    fn mid(&self) -> CGPoint {
        CGPoint::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    fn area(&self) -> f64 { self.size.width.max(0.0) * self.size.height.max(0.0) }

    fn contains(&self, point: CGPoint) -> bool {
        point.x >= self.origin.x
            && point.x <= self.max_x()
            && point.y >= self.origin.y
            && point.y <= self.max_y()
    }

    fn intersection(&self, other: &CGRect) -> CGRect {
        let x0 = self.origin.x.max(other.origin.x);
        let y0 = self.origin.y.max(other.origin.y);
        let x1 = self.max_x().min(other.max_x());
        let y1 = self.max_y().min(other.max_y());
        if x1 <= x0 || y1 <= y0 {
            CGRect::new(CGPoint::new(0.0, 0.0), CGSize::new(0.0, 0.0))
        } else {
            CGRect::new(CGPoint::new(x0, y0), CGSize::new(x1 - x0, y1 - y0))
        }
    }

    fn max_x(&self) -> f64 { self.origin.x + self.size.width }

    fn max_y(&self) -> f64 { self.origin.y + self.size.height }

    fn clamp_min_size(&self, min_w: f64, min_h: f64) -> CGRect {
        CGRect::new(
            self.origin,
            CGSize::new(self.size.width.max(min_w), self.size.height.max(min_h)),
        )
    }

    fn inset(&self, dx: f64, dy: f64) -> CGRect {
        CGRect::new(
            CGPoint::new(self.origin.x + dx, self.origin.y + dy),
            CGSize::new(
                (self.size.width - 2.0 * dx).max(0.0),
                (self.size.height - 2.0 * dy).max(0.0),
            ),
        )
    }
}

/// `#[serde(with = "CGRectDef")]` shim: `CGRect` itself has no `serde::Serialize`
/// impl upstream, so events and persisted snapshots that carry a frame go
/// through this module as a flat `(x, y, w, h)` tuple.
pub struct CGRectDef;

impl CGRectDef {
    pub fn serialize<S>(rect: &CGRect, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        (rect.origin.x, rect.origin.y, rect.size.width, rect.size.height).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<CGRect, D::Error>
    where D: Deserializer<'de> {
        let (x, y, width, height): (f64, f64, f64, f64) = Deserialize::deserialize(deserializer)?;
        Ok(CGRect::new(CGPoint::new(x, y), CGSize::new(width, height)))
    }
}

/// The off-screen "hidden-position" frame for a monitor: bottom-right
/// corner, 1 px visible (§3 invariant 6, glossary: hidden-position).
pub fn hidden_position_frame(monitor_region: Region, window_size: CGSize) -> Frame {
    CGRect::new(
        CGPoint::new(
            monitor_region.max_x() - 1.0,
            monitor_region.max_y() - 1.0,
        ),
        window_size,
    )
}

/// A window is "at or near" the hidden position if at most 3 px of it would
/// be visible within `monitor_region` (§4.3 startup orphan-restore rule).
pub fn is_near_hidden_position(frame: Frame, monitor_region: Region) -> bool {
    let visible = monitor_region.intersection(&frame);
    visible.size.width <= 3.0 && visible.size.height <= 3.0
}

/// The centered quarter-screen frame used to restore orphaned or
/// un-minimized windows (§4.3, §8 scenario 6).
pub fn centered_quarter_frame(monitor_region: Region) -> Frame {
    CGRect::new(
        CGPoint::new(
            monitor_region.origin.x + monitor_region.size.width / 4.0,
            monitor_region.origin.y + monitor_region.size.height / 4.0,
        ),
        CGSize::new(monitor_region.size.width / 2.0, monitor_region.size.height / 2.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(x: f64, y: f64, w: f64, h: f64) -> Region {
        CGRect::new(CGPoint::new(x, y), CGSize::new(w, h))
    }

    #[test]
    fn hidden_position_is_near_hidden() {
        let r = region(0.0, 0.0, 1920.0, 1080.0);
        let size = CGSize::new(800.0, 600.0);
        let frame = hidden_position_frame(r, size);
        assert!(is_near_hidden_position(frame, r));
    }

    #[test]
    fn centered_quarter_is_not_hidden() {
        let r = region(0.0, 0.0, 1920.0, 1080.0);
        let frame = centered_quarter_frame(r);
        assert!(!is_near_hidden_position(frame, r));
        assert_eq!(frame.size.width, 960.0);
        assert_eq!(frame.size.height, 540.0);
    }

    #[test]
    fn intersection_of_disjoint_rects_is_empty() {
        let a = region(0.0, 0.0, 10.0, 10.0);
        let b = region(100.0, 100.0, 10.0, 10.0);
        assert_eq!(a.intersection(&b).area(), 0.0);
    }
}
