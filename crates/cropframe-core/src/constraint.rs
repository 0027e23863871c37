//! Aspect-locked resize solver.
//!
//! Given the current crop rectangle, the handle being dragged and a pointer
//! delta, [`resize`] computes the next valid rectangle. The solve runs in two
//! passes: first the edges implied by the handle are adjusted independently,
//! each bounded by the minimum size and the container; then, if the adjusted
//! rectangle has drifted off the target aspect ratio, the dependent dimension
//! is recomputed from the other and the position re-clamped. A single-pass
//! resize on corner handles drifts off the ratio because both dimensions
//! move independently.

use crate::geometry::{CropRect, ASPECT_TOLERANCE, FULL_EXTENT, MIN_SIZE_PCT};
use crate::interaction::Handle;

/// Resize `rect` by a pointer delta applied at `handle`.
///
/// `dx`/`dy` are incremental percentage deltas since the previous pointer
/// event. The result always satisfies the resting invariants: in bounds, at
/// least the minimum size on both axes, and on the target ratio whenever the
/// minimum size permits it.
pub fn resize(rect: &CropRect, handle: Handle, dx: f64, dy: f64, aspect_ratio: f64) -> CropRect {
    let mut x = rect.x;
    let mut y = rect.y;
    let mut width = rect.width;
    let mut height = rect.height;

    // First pass: move the implied edges, each bounded by the minimum size
    // and the container. Opposite edges stay fixed.
    match handle {
        Handle::East | Handle::NorthEast | Handle::SouthEast => {
            width = (width + dx).clamp(MIN_SIZE_PCT, FULL_EXTENT - x);
        }
        Handle::West | Handle::NorthWest | Handle::SouthWest => {
            let shift = dx.clamp(-x, width - MIN_SIZE_PCT);
            x += shift;
            width -= shift;
        }
        _ => {}
    }
    match handle {
        Handle::South | Handle::SouthEast | Handle::SouthWest => {
            height = (height + dy).clamp(MIN_SIZE_PCT, FULL_EXTENT - y);
        }
        Handle::North | Handle::NorthEast | Handle::NorthWest => {
            let shift = dy.clamp(-y, height - MIN_SIZE_PCT);
            y += shift;
            height -= shift;
        }
        _ => {}
    }

    // Second pass: restore the exact ratio when the adjustment drifted past
    // the tolerance. Edge handles on the vertical axis drive width from
    // height; everything else drives height from width.
    if (width / height - aspect_ratio).abs() > ASPECT_TOLERANCE {
        match handle {
            Handle::North | Handle::South => width = height * aspect_ratio,
            _ => height = width / aspect_ratio,
        }
    }

    // The recomputed dimension may now violate the size limits. Restore them
    // pairwise so the ratio survives wherever both limits can hold at once.
    if width < MIN_SIZE_PCT {
        width = MIN_SIZE_PCT;
        height = width / aspect_ratio;
    }
    if height < MIN_SIZE_PCT {
        height = MIN_SIZE_PCT;
        width = height * aspect_ratio;
    }
    if width > FULL_EXTENT {
        width = FULL_EXTENT;
        height = width / aspect_ratio;
    }
    if height > FULL_EXTENT {
        height = FULL_EXTENT;
        width = height * aspect_ratio;
    }

    // Re-clamp the position so the corrected rectangle does not cross the
    // container on either axis.
    x = x.min(FULL_EXTENT - width).max(0.0);
    y = y.min(FULL_EXTENT - height).max(0.0);

    CropRect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDESCREEN: f64 = 1.778;

    fn widescreen_rect() -> CropRect {
        CropRect::new(10.0, 10.0, 60.0, 33.75)
    }

    #[test]
    fn test_south_east_grows_from_fixed_top_left() {
        // Growing the east edge by 10 recomputes the height to keep the
        // ratio; the anchored top-left corner does not move.
        let next = resize(&widescreen_rect(), Handle::SouthEast, 10.0, 0.0, WIDESCREEN);

        assert_eq!(next.x, 10.0);
        assert_eq!(next.y, 10.0);
        assert_eq!(next.width, 70.0);
        assert!((next.height - 70.0 / WIDESCREEN).abs() < 0.01, "height was {}", next.height);
    }

    #[test]
    fn test_west_handle_moves_left_edge_only() {
        let next = resize(&widescreen_rect(), Handle::West, -5.0, 0.0, WIDESCREEN);

        assert_eq!(next.x, 5.0);
        assert_eq!(next.width, 65.0);
        // Height follows to hold the ratio.
        assert!((next.aspect() - WIDESCREEN).abs() <= ASPECT_TOLERANCE);
    }

    #[test]
    fn test_north_handle_drives_width_from_height() {
        let next = resize(&widescreen_rect(), Handle::North, 0.0, -6.0, WIDESCREEN);

        assert_eq!(next.y, 4.0);
        assert!((next.height - 39.75).abs() < 0.01);
        assert!((next.width - 39.75 * WIDESCREEN).abs() < 0.01, "width was {}", next.width);
    }

    #[test]
    fn test_shrink_stops_at_minimum_size() {
        let rect = CropRect::new(40.0, 40.0, 20.0, 20.0);
        let next = resize(&rect, Handle::SouthEast, -50.0, -50.0, 1.0);

        assert_eq!(next.width, MIN_SIZE_PCT);
        assert_eq!(next.height, MIN_SIZE_PCT);
        assert_eq!(next.x, 40.0);
        assert_eq!(next.y, 40.0);
    }

    #[test]
    fn test_grow_stops_at_container_edge() {
        let rect = CropRect::new(70.0, 70.0, 20.0, 20.0);
        let next = resize(&rect, Handle::SouthEast, 50.0, 50.0, 1.0);

        assert_eq!(next.width, 30.0);
        assert_eq!(next.height, 30.0);
        assert_eq!(next.right(), 100.0);
        assert_eq!(next.bottom(), 100.0);
    }

    #[test]
    fn test_west_handle_cannot_cross_left_boundary() {
        let rect = CropRect::new(5.0, 30.0, 40.0, 40.0);
        let next = resize(&rect, Handle::West, -20.0, 0.0, 1.0);

        assert_eq!(next.x, 0.0);
        assert_eq!(next.width, 45.0);
    }

    #[test]
    fn test_small_delta_within_tolerance_skips_correction() {
        // A square rect under a square ratio nudged by a sub-tolerance
        // amount keeps the independently adjusted dimensions.
        let rect = CropRect::new(10.0, 10.0, 50.0, 50.0);
        let next = resize(&rect, Handle::East, 1.0, 0.0, 1.0);

        assert_eq!(next.width, 51.0);
        assert_eq!(next.height, 50.0);
        assert!((next.aspect() - 1.0).abs() <= ASPECT_TOLERANCE);
    }

    #[test]
    fn test_correction_reclamps_position() {
        // Dragging north near the bottom of the container grows the width
        // past the right edge; the position must slide back in.
        let rect = CropRect::new(60.0, 40.0, 35.0, 19.69);
        let next = resize(&rect, Handle::North, 0.0, -30.0, WIDESCREEN);

        assert!(next.right() <= 100.0 + 1e-9, "right was {}", next.right());
        assert!(next.bottom() <= 100.0 + 1e-9);
        assert!((next.aspect() - WIDESCREEN).abs() <= ASPECT_TOLERANCE);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
