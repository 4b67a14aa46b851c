//! The layout engine is pure: every function here takes a snapshot of
//! counts/positions and a region, and returns frames or a reordered id
//! list. It never touches the compositor, the workspace store, or any
//! other mutable state — the Core is the only caller, and the only thing
//! that turns these results into side effects.

pub mod master_stack;
pub mod scrolling;

pub use scrolling::{ColumnFrames, ColumnLayoutInput};

use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::actor::app::WindowId;
use crate::geometry::{CGRectExt, Frame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
pub enum LayoutVariant {
    SideBySide,
    Stacked,
    Monocle,
}

impl LayoutVariant {
    /// Two successive `cycle_layout` calls must advance by exactly 2 mod 3
    /// (§8 round-trip law); this is the single step primitive they compose.
    pub fn cycle(self) -> LayoutVariant {
        match self {
            LayoutVariant::SideBySide => LayoutVariant::Stacked,
            LayoutVariant::Stacked => LayoutVariant::Monocle,
            LayoutVariant::Monocle => LayoutVariant::SideBySide,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

pub const MIN_SPLIT_RATIO: f64 = 0.2;
pub const MAX_SPLIT_RATIO: f64 = 0.8;
pub const MIN_COLUMN_WIDTH: f64 = 0.1;
pub const MAX_COLUMN_WIDTH: f64 = 3.0;

pub fn clamp_split_ratio(ratio: f64) -> f64 { ratio.clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO) }

pub fn clamp_column_width(width: f64) -> f64 { width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH) }

/// Directional focus search (§4.1 "Neighbor search"): among `candidates`,
/// picks the one whose center lies strictly in `direction` from
/// `current_frame`'s center and is nearest by Euclidean distance. Ties are
/// broken by the lower `WindowId` for determinism.
pub fn neighbor_in_direction(
    current_frame: Frame,
    candidates: &[(WindowId, Frame)],
    direction: Direction,
) -> Option<WindowId> {
    let origin = current_frame.mid();

    candidates
        .iter()
        .filter(|(_, frame)| {
            let center = frame.mid();
            match direction {
                Direction::Left => center.x < origin.x,
                Direction::Right => center.x > origin.x,
                Direction::Up => center.y < origin.y,
                Direction::Down => center.y > origin.y,
            }
        })
        .map(|(id, frame)| {
            let center = frame.mid();
            let dx = center.x - origin.x;
            let dy = center.y - origin.y;
            (dx * dx + dy * dy, *id)
        })
        .min_by(|(da, ida), (db, idb)| {
            da.partial_cmp(db).unwrap_or(std::cmp::Ordering::Equal).then(ida.cmp(idb))
        })
        .map(|(_, id)| id)
}

/// `move_position` targets (§4.1 rotation and swap primitives).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TilePosition {
    First,
    Last,
    OneEarlier,
    OneLater,
}

/// If `w` is not already first, swaps indices `0` and `index_of(w)`.
/// No-op if `tiled.len() < 2` or `w` is not present. An involution for any
/// non-first target (§8).
pub fn swap_with_first(tiled: &mut [WindowId], w: WindowId) {
    if tiled.len() < 2 {
        return;
    }
    if let Some(idx) = tiled.iter().position(|id| *id == w) {
        if idx != 0 {
            tiled.swap(0, idx);
        }
    }
}

/// Moves the last element to the front (wrap right).
pub fn rotate_next(tiled: &mut Vec<WindowId>) {
    if tiled.len() < 2 {
        return;
    }
    if let Some(last) = tiled.pop() {
        tiled.insert(0, last);
    }
}

/// Moves the first element to the back (wrap left). The exact inverse of
/// `rotate_next` (§8 round-trip law).
pub fn rotate_prev(tiled: &mut Vec<WindowId>) {
    if tiled.len() < 2 {
        return;
    }
    let first = tiled.remove(0);
    tiled.push(first);
}

/// Repositions `w` within `tiled` per `position`. No-op if `tiled.len() < 2`
/// or `w` is absent.
pub fn move_position(tiled: &mut Vec<WindowId>, w: WindowId, position: TilePosition) {
    if tiled.len() < 2 {
        return;
    }
    let Some(idx) = tiled.iter().position(|id| *id == w) else { return };

    match position {
        TilePosition::First => {
            if idx != 0 {
                let w = tiled.remove(idx);
                tiled.insert(0, w);
            }
        }
        TilePosition::Last => {
            if idx != tiled.len() - 1 {
                let w = tiled.remove(idx);
                tiled.push(w);
            }
        }
        TilePosition::OneEarlier => {
            if idx > 0 {
                tiled.swap(idx, idx - 1);
            }
        }
        TilePosition::OneLater => {
            if idx + 1 < tiled.len() {
                tiled.swap(idx, idx + 1);
            }
        }
    }
}
