//! Pure master-stack ("Hyprland mode") geometry (§4.1).
//!
//! Every function here is a total, side-effect-free mapping from a window
//! count and a region to a list of frames. No window identity is needed —
//! the caller zips the returned frames onto its own `tiled` order.

use objc2_core_foundation::{CGPoint, CGRect, CGSize};

use crate::geometry::{CGRectExt, MIN_WINDOW_DIMENSION, Region};
use crate::layout_engine::LayoutVariant;

fn clamp_min(rect: CGRect) -> CGRect { rect.clamp_min_size(MIN_WINDOW_DIMENSION, MIN_WINDOW_DIMENSION) }

fn half_gap_rect(x: f64, y: f64, w: f64, h: f64, gap: f64) -> CGRect {
    clamp_min(CGRect::new(CGPoint::new(x, y), CGSize::new(w, h)).inset(gap / 2.0, gap / 2.0))
}

/// Computes the `n` master-stack frames for `variant` within `region`.
///
/// The returned `Vec` always has exactly `n` entries (§8 quantified
/// invariant), in the same positional order the layout assigns to
/// `tiled[0..n]`.
pub fn frames(
    n: usize,
    region: Region,
    inner_gap: f64,
    single_window_padding: f64,
    split_ratio: f64,
    variant: LayoutVariant,
) -> Vec<CGRect> {
    if n == 0 {
        return Vec::new();
    }

    if variant == LayoutVariant::Monocle {
        let frame = if single_window_padding > 0.0 {
            clamp_min(region.inset(single_window_padding, single_window_padding))
        } else {
            clamp_min(region)
        };
        return vec![frame; n];
    }

    if n == 1 {
        let frame = if single_window_padding > 0.0 {
            clamp_min(region.inset(single_window_padding, single_window_padding))
        } else {
            clamp_min(region)
        };
        return vec![frame];
    }

    match variant {
        LayoutVariant::SideBySide => side_by_side(n, region, inner_gap, split_ratio),
        LayoutVariant::Stacked => stacked(n, region, inner_gap, split_ratio),
        LayoutVariant::Monocle => unreachable!("handled above"),
    }
}

fn side_by_side(n: usize, region: Region, gap: f64, split: f64) -> Vec<CGRect> {
    let Region { origin, size } = region;
    match n {
        2 => {
            let left_w = size.width * split;
            let right_w = size.width * (1.0 - split);
            vec![
                half_gap_rect(origin.x, origin.y, left_w, size.height, gap),
                half_gap_rect(origin.x + left_w, origin.y, right_w, size.height, gap),
            ]
        }
        3 => {
            let left_w = size.width * split;
            let right_w = size.width - left_w;
            let half_h = size.height / 2.0;
            vec![
                half_gap_rect(origin.x, origin.y, left_w, size.height, gap),
                half_gap_rect(origin.x + left_w, origin.y, right_w, half_h, gap),
                half_gap_rect(origin.x + left_w, origin.y + half_h, right_w, half_h, gap),
            ]
        }
        _ => {
            let half_w = size.width / 2.0;
            let half_h = size.height / 2.0;
            let quarters = [
                half_gap_rect(origin.x, origin.y, half_w, half_h, gap),
                half_gap_rect(origin.x + half_w, origin.y, half_w, half_h, gap),
                half_gap_rect(origin.x, origin.y + half_h, half_w, half_h, gap),
                half_gap_rect(origin.x + half_w, origin.y + half_h, half_w, half_h, gap),
            ];
            (0..n).map(|i| quarters[i.min(3)]).collect()
        }
    }
}

fn stacked(n: usize, region: Region, gap: f64, split: f64) -> Vec<CGRect> {
    let Region { origin, size } = region;
    match n {
        2 => {
            let top_h = size.height * split;
            let bottom_h = size.height * (1.0 - split);
            vec![
                half_gap_rect(origin.x, origin.y, size.width, top_h, gap),
                half_gap_rect(origin.x, origin.y + top_h, size.width, bottom_h, gap),
            ]
        }
        // n=3, Stacked deliberately ignores split_ratio (§4.1, §9 open question):
        // implemented literally as specified — three equal rows.
        _ => {
            let row_h = size.height / n as f64;
            (0..n)
                .map(|i| half_gap_rect(origin.x, origin.y + row_h * i as f64, size.width, row_h, gap))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> Region { CGRect::new(CGPoint::new(0.0, 0.0), CGSize::new(1920.0, 1080.0)) }

    #[test]
    fn zero_windows_is_empty() {
        assert!(frames(0, region(), 8.0, 0.0, 0.5, LayoutVariant::SideBySide).is_empty());
    }

    #[test]
    fn exactly_n_frames_for_every_n() {
        for n in 1..=6 {
            for variant in [LayoutVariant::SideBySide, LayoutVariant::Stacked, LayoutVariant::Monocle] {
                let result = frames(n, region(), 8.0, 0.0, 0.5, variant);
                assert_eq!(result.len(), n, "variant {variant:?} n={n}");
                for f in &result {
                    assert!(f.size.width >= MIN_WINDOW_DIMENSION);
                    assert!(f.size.height >= MIN_WINDOW_DIMENSION);
                }
            }
        }
    }

    #[test]
    fn monocle_frames_are_identical() {
        let result = frames(3, region(), 8.0, 0.0, 0.5, LayoutVariant::Monocle);
        assert_eq!(result[0], result[1]);
        assert_eq!(result[1], result[2]);
    }

    #[test]
    fn two_window_side_by_side_uses_split_ratio() {
        let result = frames(2, region(), 8.0, 0.0, 0.5, LayoutVariant::SideBySide);
        assert_eq!(result[0].origin.x, 0.0 + 4.0);
        assert_eq!(result[1].origin.x, 960.0 + 4.0);
        assert_eq!(result[0].size.width, 960.0 - 8.0);
    }

    #[test]
    fn three_window_side_by_side_master_and_two_halves() {
        let result = frames(3, region(), 8.0, 0.0, 0.6, LayoutVariant::SideBySide);
        assert_eq!(result[0].size.width, 1920.0 * 0.6 - 8.0);
        assert_eq!(result[1].size.height, 540.0 - 8.0);
        assert_eq!(result[2].origin.y, 540.0 + 4.0);
    }

    #[test]
    fn three_window_stacked_ignores_split_ratio() {
        let a = frames(3, region(), 8.0, 0.0, 0.2, LayoutVariant::Stacked);
        let b = frames(3, region(), 8.0, 0.0, 0.8, LayoutVariant::Stacked);
        assert_eq!(a, b);
        for f in &a {
            assert_eq!(f.size.height, 1080.0 / 3.0 - 8.0);
        }
    }

    #[test]
    fn four_or_more_side_by_side_overlap_bottom_right() {
        let result = frames(6, region(), 8.0, 0.0, 0.5, LayoutVariant::SideBySide);
        assert_eq!(result[3], result[4]);
        assert_eq!(result[4], result[5]);
    }

    #[test]
    fn non_monocle_positions_do_not_overlap() {
        for n in 2..=4 {
            let result = frames(n, region(), 8.0, 0.0, 0.5, LayoutVariant::SideBySide);
            let distinct: std::collections::HashSet<_> = result.iter().take(4.min(n)).map(|r| {
                (r.origin.x as i64, r.origin.y as i64)
            }).collect();
            assert_eq!(distinct.len(), 4.min(n));
        }
    }

    #[test]
    fn single_window_with_zero_padding_fills_region() {
        let result = frames(1, region(), 8.0, 0.0, 0.5, LayoutVariant::SideBySide);
        assert_eq!(result[0], region());
    }

    #[test]
    fn single_window_with_padding_insets() {
        let result = frames(1, region(), 8.0, 20.0, 0.5, LayoutVariant::SideBySide);
        assert_eq!(result[0].origin.x, 20.0);
        assert_eq!(result[0].size.width, 1920.0 - 40.0);
    }
}
