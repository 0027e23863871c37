//! The crop rectangle in normalized percentage coordinates.
//!
//! A [`CropRect`] describes the selected sub-region of the source image as
//! percentages (0 to 100) of the image's displayed bounding box, making the
//! selection independent of the on-screen pixel size.
//!
//! # Coordinate System
//!
//! - (0, 0) = top-left corner of the image
//! - (100, 100) = bottom-right corner
//! - `width`/`height` are percentages of the image dimensions
//!
//! All coordinates are rounded to two decimal places on construction so that
//! floating-point drift from many small drag deltas never accumulates into
//! visible jitter.

use serde::{Deserialize, Serialize};

/// Smallest allowed crop dimension, in percent of the container.
pub const MIN_SIZE_PCT: f64 = 15.0;

/// Full extent of the container on either axis, in percent.
pub const FULL_EXTENT: f64 = 100.0;

/// Maximum allowed deviation of `width / height` from the configured aspect
/// ratio for a rectangle at rest.
pub const ASPECT_TOLERANCE: f64 = 0.05;

/// Round a percentage coordinate to two decimal places.
#[inline]
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The selected sub-region of the source image, in percentage coordinates.
///
/// Construction clamps the rectangle into the container and enforces the
/// minimum size, so a `CropRect` obtained from [`CropRect::new`] always
/// satisfies:
///
/// - `0 <= x`, `0 <= y`
/// - `x + width <= 100`, `y + height <= 100`
/// - `width >= 15`, `height >= 15`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    /// Left edge, percent of container width.
    pub x: f64,
    /// Top edge, percent of container height.
    pub y: f64,
    /// Width, percent of container width.
    pub width: f64,
    /// Height, percent of container height.
    pub height: f64,
}

impl CropRect {
    /// Create a rectangle, rounding to two decimals and clamping into bounds.
    ///
    /// Dimensions are clamped to `[MIN_SIZE_PCT, 100]` first, then the
    /// position is clamped so the rectangle stays fully inside the container.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        let width = round2(width.clamp(MIN_SIZE_PCT, FULL_EXTENT));
        let height = round2(height.clamp(MIN_SIZE_PCT, FULL_EXTENT));
        let x = round2(x.clamp(0.0, FULL_EXTENT - width));
        let y = round2(y.clamp(0.0, FULL_EXTENT - height));
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Compute the default centered crop for a freshly loaded image.
    ///
    /// The rectangle is inscribed in the image and matches `aspect_ratio`:
    /// a source wider than the target spans the full image height with a
    /// horizontally centered slice; a narrower source spans the full width
    /// with a vertically centered slice. The result never exceeds the image
    /// bounds.
    pub fn centered_default(natural_width: u32, natural_height: u32, aspect_ratio: f64) -> Self {
        if natural_width == 0 || natural_height == 0 {
            return Self::new(0.0, 0.0, FULL_EXTENT, FULL_EXTENT);
        }

        let image_aspect = natural_width as f64 / natural_height as f64;
        if image_aspect > aspect_ratio {
            // Source is wider than the target: full height, centered slice.
            let width = aspect_ratio / image_aspect * FULL_EXTENT;
            Self::new((FULL_EXTENT - width) / 2.0, 0.0, width, FULL_EXTENT)
        } else {
            // Source is narrower (or equal): full width, centered slice.
            let height = image_aspect / aspect_ratio * FULL_EXTENT;
            Self::new(0.0, (FULL_EXTENT - height) / 2.0, FULL_EXTENT, height)
        }
    }

    /// Right edge (`x + width`), percent.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`), percent.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Current `width / height` ratio.
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Whether the point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Translate the rectangle to a new top-left corner, clamped so it stays
    /// fully inside the container. The size is unchanged.
    pub fn moved_to(&self, x: f64, y: f64) -> Self {
        Self::new(x, y, self.width, self.height)
    }

    /// Convert to source-pixel coordinates for an image of the given natural
    /// size.
    ///
    /// The region is defensively clamped so it never exceeds the actual
    /// image bounds and is never zero-sized, regardless of how the
    /// percentages were produced.
    pub fn to_pixels(&self, natural_width: u32, natural_height: u32) -> PixelRegion {
        let src_w = natural_width as f64;
        let src_h = natural_height as f64;

        let px_x = (self.x / FULL_EXTENT * src_w).round() as u32;
        let px_y = (self.y / FULL_EXTENT * src_h).round() as u32;
        let px_w = (self.width / FULL_EXTENT * src_w).round() as u32;
        let px_h = (self.height / FULL_EXTENT * src_h).round() as u32;

        let px_x = px_x.min(natural_width.saturating_sub(1));
        let px_y = px_y.min(natural_height.saturating_sub(1));
        let right = (px_x + px_w).min(natural_width);
        let bottom = (px_y + px_h).min(natural_height);

        PixelRegion {
            x: px_x,
            y: px_y,
            width: right.saturating_sub(px_x).max(1),
            height: bottom.saturating_sub(px_y).max(1),
        }
    }
}

/// A rectangular region of the source image, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rounds_to_two_decimals() {
        let rect = CropRect::new(10.006, 20.004, 30.126, 40.333);
        assert_eq!(rect.x, 10.01);
        assert_eq!(rect.y, 20.0);
        assert_eq!(rect.width, 30.13);
        assert_eq!(rect.height, 40.33);
    }

    #[test]
    fn test_new_clamps_position_into_container() {
        let rect = CropRect::new(130.0, -5.0, 15.0, 15.0);
        assert_eq!(rect.x, 85.0);
        assert_eq!(rect.y, 0.0);
    }

    #[test]
    fn test_new_enforces_minimum_size() {
        let rect = CropRect::new(0.0, 0.0, 1.0, 200.0);
        assert_eq!(rect.width, MIN_SIZE_PCT);
        assert_eq!(rect.height, FULL_EXTENT);
    }

    #[test]
    fn test_moved_to_stops_at_boundary() {
        // Dragging right by 50 from x=80 must clamp to 100 - width, not 130.
        let rect = CropRect::new(80.0, 10.0, 15.0, 15.0);
        let moved = rect.moved_to(130.0, 10.0);
        assert_eq!(moved.x, 85.0);
        assert_eq!(moved.y, 10.0);
        assert_eq!(moved.width, 15.0);
        assert_eq!(moved.height, 15.0);
    }

    #[test]
    fn test_contains_edges_inclusive() {
        let rect = CropRect::new(20.0, 20.0, 40.0, 30.0);
        assert!(rect.contains(20.0, 20.0));
        assert!(rect.contains(60.0, 50.0));
        assert!(rect.contains(40.0, 35.0));
        assert!(!rect.contains(19.9, 35.0));
        assert!(!rect.contains(40.0, 50.1));
    }

    #[test]
    fn test_centered_default_matching_aspect_covers_image() {
        // 1600x900 source with a matching 1.778 target: the default crop
        // covers (essentially) the whole image.
        let rect = CropRect::centered_default(1600, 900, 1.778);
        assert!(rect.x.abs() < 0.1, "x was {}", rect.x);
        assert!(rect.y.abs() < 0.1, "y was {}", rect.y);
        assert!(rect.width > 99.9, "width was {}", rect.width);
        assert!(rect.height > 99.9, "height was {}", rect.height);
    }

    #[test]
    fn test_centered_default_wider_source() {
        // 2:1 source, square target: full height, horizontally centered.
        let rect = CropRect::centered_default(2000, 1000, 1.0);
        assert_eq!(rect.height, 100.0);
        assert_eq!(rect.width, 50.0);
        assert_eq!(rect.x, 25.0);
        assert_eq!(rect.y, 0.0);
    }

    #[test]
    fn test_centered_default_narrower_source() {
        // 1:2 source, square target: full width, vertically centered.
        let rect = CropRect::centered_default(1000, 2000, 1.0);
        assert_eq!(rect.width, 100.0);
        assert_eq!(rect.height, 50.0);
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 25.0);
    }

    #[test]
    fn test_centered_default_zero_dimension_source() {
        let rect = CropRect::centered_default(0, 900, 1.0);
        assert_eq!(rect.width, 100.0);
        assert_eq!(rect.height, 100.0);
    }

    #[test]
    fn test_to_pixels_basic() {
        let rect = CropRect::new(25.0, 25.0, 50.0, 50.0);
        let region = rect.to_pixels(200, 100);
        assert_eq!(
            region,
            PixelRegion {
                x: 50,
                y: 25,
                width: 100,
                height: 50
            }
        );
    }

    #[test]
    fn test_to_pixels_clamps_to_source_bounds() {
        // A rectangle hugging the right edge must never request pixels
        // outside the image, even with rounding slack.
        let rect = CropRect::new(85.0, 85.0, 15.0, 15.0);
        let region = rect.to_pixels(333, 333);
        assert!(region.x + region.width <= 333);
        assert!(region.y + region.height <= 333);
    }

    #[test]
    fn test_to_pixels_never_zero_sized() {
        let rect = CropRect::new(0.0, 0.0, 15.0, 15.0);
        let region = rect.to_pixels(3, 3);
        assert!(region.width >= 1);
        assert!(region.height >= 1);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
