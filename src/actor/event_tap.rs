//! Input translation: turns raw key chords and mouse movement into the
//! coarse `InputEvent`s the Core understands. Stays ignorant of `Action` —
//! the config's keybinding table (owned by the Core) is what maps a
//! `KeyChord` to an `Action`, keeping this module a pure translator.

use std::time::Duration;

use crate::geometry::{CGRectExt, Frame};

/// Mouse-move sampling periods (§4.6): halved under low power mode.
pub const MOUSE_MOVE_INTERVAL_NORMAL: Duration = Duration::from_millis(8);
pub const MOUSE_MOVE_INTERVAL_LOW_POWER: Duration = Duration::from_millis(16);

/// How close the cursor must be to a divider, in points, before a drag is
/// classified as a resize rather than a reorder (§4.3 "Drag to resize").
pub const DIVIDER_PROXIMITY_PX: f64 = 20.0;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT   = 0b0001;
        const CONTROL = 0b0010;
        const OPTION  = 0b0100;
        const COMMAND = 0b1000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key_code: u16,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy)]
pub enum DragKind {
    /// Control held and the cursor started within `DIVIDER_PROXIMITY_PX`
    /// of a layout divider.
    Resize,
    /// Everything else: reorder two tiles by dragging one onto the other.
    Reorder,
}

#[derive(Debug, Clone, Copy)]
pub enum InputEvent {
    KeyDown(KeyChord),
    MouseMoved { x: f64, y: f64 },
    DragStarted { x: f64, y: f64, kind: DragKind },
    DragMoved { x: f64, y: f64 },
    DragEnded { x: f64, y: f64 },
}

/// Classifies a drag start as a resize when Control is held and the
/// cursor is within `DIVIDER_PROXIMITY_PX` of a divider, a reorder
/// otherwise (§4.3 "Drag-to-resize and drag-to-reorder").
pub fn classify_drag_start(point: (f64, f64), dividers: &[f64], control_held: bool) -> DragKind {
    if control_held {
        for &x in dividers {
            if (point.0 - x).abs() <= DIVIDER_PROXIMITY_PX {
                return DragKind::Resize;
            }
        }
    }
    DragKind::Reorder
}

/// Extracts the divider x-positions between adjacent frames in `frames`,
/// assuming frames are already sorted left to right (§4.3).
pub fn dividers_between(frames: &[Frame]) -> Vec<f64> {
    frames.windows(2).map(|pair| pair[0].max_x()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_held_near_divider_is_a_resize() {
        let dividers = vec![960.0];
        assert!(matches!(classify_drag_start((965.0, 500.0), &dividers, true), DragKind::Resize));
    }

    #[test]
    fn control_held_far_from_divider_is_a_reorder() {
        let dividers = vec![960.0];
        assert!(matches!(classify_drag_start((100.0, 500.0), &dividers, true), DragKind::Reorder));
    }

    #[test]
    fn without_control_near_divider_is_still_a_reorder() {
        let dividers = vec![960.0];
        assert!(matches!(classify_drag_start((960.0, 500.0), &dividers, false), DragKind::Reorder));
    }
}
