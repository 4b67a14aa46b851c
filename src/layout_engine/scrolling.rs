//! Pure scrolling-columns ("Niri mode") geometry (§4.1).
//!
//! Columns are laid out on an infinite horizontal strip; only the strip
//! positions that intersect the monitor region are reported as visible.
//! The caller (Core) owns the authoritative `Column` sequence — this module
//! only turns it into frames for a given frame tick.

use objc2_core_foundation::{CGPoint, CGRect, CGSize};

use crate::geometry::{CGRectExt, Region};

#[derive(Debug, Clone, Copy)]
pub struct ColumnLayoutInput {
    pub window_count: usize,
    /// Fraction of region width, overriding `default_column_width` (§3:
    /// `width_override? ∈ [0.1, 3.0]`).
    pub width_override: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ColumnFrames {
    pub column_index: usize,
    /// Per-window frame, top-to-bottom in the column's listed order.
    pub frames: Vec<CGRect>,
    pub is_visible: bool,
}

/// Computes per-column frames for the scrolling strip.
///
/// `active_column_index` must be a valid index into `columns` when
/// `columns` is non-empty; callers are expected to uphold invariant 4
/// before calling (`active_column_index ∈ [0, |scrolling_columns|)`).
pub fn frames_for_columns(
    columns: &[ColumnLayoutInput],
    active_column_index: usize,
    region: Region,
    gap: f64,
    default_column_width: f64,
) -> Vec<ColumnFrames> {
    if columns.is_empty() {
        return Vec::new();
    }

    // Step 1 & 2: per-column pixel width and cumulative strip x-positions.
    let widths: Vec<f64> = columns
        .iter()
        .map(|c| region.size.width * c.width_override.unwrap_or(default_column_width))
        .collect();

    let mut xs = Vec::with_capacity(widths.len() + 1);
    xs.push(0.0);
    for w in &widths {
        xs.push(xs.last().unwrap() + w);
    }

    // Step 3: offset so the active column's midpoint aligns with the
    // region's midpoint.
    let active_idx = active_column_index.min(columns.len() - 1);
    let active_mid = xs[active_idx] + widths[active_idx] / 2.0;
    let region_mid_x = region.origin.x + region.size.width / 2.0;
    let offset = region_mid_x - active_mid;

    columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let col_x = region.origin.x + xs[i] + offset;
            let col_w = widths[i];

            // Step 4: visibility test against the monitor viewport.
            let strip_rect = CGRect::new(
                CGPoint::new(col_x, region.origin.y),
                CGSize::new(col_w, region.size.height),
            );
            let is_visible = strip_rect.intersection(&region).area() > 0.0;

            // Step 5: within the column, equal horizontal slabs top to
            // bottom with half-gap spacing.
            let m = col.window_count.max(1);
            let row_h = region.size.height / m as f64;
            let frames: Vec<CGRect> = (0..col.window_count)
                .map(|row| {
                    CGRect::new(
                        CGPoint::new(col_x, region.origin.y + row_h * row as f64),
                        CGSize::new(col_w, row_h),
                    )
                    .inset(gap / 2.0, gap / 2.0)
                })
                .collect();

            ColumnFrames {
                column_index: i,
                frames,
                is_visible,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> Region { CGRect::new(CGPoint::new(0.0, 0.0), CGSize::new(1920.0, 1080.0)) }

    fn col(n: usize) -> ColumnLayoutInput { ColumnLayoutInput { window_count: n, width_override: None } }

    #[test]
    fn single_active_column_centers_on_region_midpoint() {
        let columns = vec![col(1)];
        let result = frames_for_columns(&columns, 0, region(), 8.0, 0.5);
        let frame = &result[0].frames[0];
        let mid_x = frame.origin.x + frame.size.width / 2.0;
        assert!((mid_x - 960.0).abs() < 1.0);
    }

    #[test]
    fn distant_columns_are_not_visible() {
        let columns = vec![col(1); 10];
        let result = frames_for_columns(&columns, 0, region(), 8.0, 0.5);
        assert!(result[0].is_visible);
        assert!(!result.last().unwrap().is_visible);
    }

    #[test]
    fn width_override_is_applied_as_a_region_fraction() {
        let columns = vec![ColumnLayoutInput { window_count: 1, width_override: Some(1.0) }];
        let result = frames_for_columns(&columns, 0, region(), 0.0, 0.5);
        assert_eq!(result[0].frames[0].size.width, 1920.0);
    }

    #[test]
    fn rows_within_a_column_split_height_evenly() {
        let columns = vec![col(3)];
        let result = frames_for_columns(&columns, 0, region(), 0.0, 1.0);
        for f in &result[0].frames {
            assert_eq!(f.size.height, 1080.0 / 3.0);
        }
        assert_eq!(result[0].frames[1].origin.y, 1080.0 / 3.0);
    }

    #[test]
    fn empty_columns_returns_empty() {
        assert!(frames_for_columns(&[], 0, region(), 8.0, 0.5).is_empty());
    }
}
