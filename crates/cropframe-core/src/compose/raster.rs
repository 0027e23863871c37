//! Software drawing surface.
//!
//! [`RasterSurface`] renders the crop without any browser or GPU: each
//! output pixel is inverse-mapped through the center rotation/scale
//! transform into the clamped source region and sampled bilinearly. The
//! finished surface encodes to JPEG bytes.
//!
//! For rotation by angle θ about the surface center C at scale s, a source
//! point p lands at `C + R(θ) * (s * p)`, so the inverse mapping used here is
//! `p = R(-θ) * (screen - C) / s`.

use super::{DestRect, Surface, SurfaceError};
use crate::geometry::{PixelRegion, Rotation};
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

/// An RGB8 pixel buffer (3 bytes per pixel, row-major order).
#[derive(Debug, Clone)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGB pixel data; length is `width * height * 3`.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a bitmap from dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width * height * 3) as usize,
            "pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a bitmap from an `image::RgbImage`.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert back to an `image::RgbImage`.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    #[inline]
    fn pixel_f64(&self, x: u32, y: u32) -> [f64; 3] {
        let idx = ((y * self.width + x) * 3) as usize;
        [
            f64::from(self.pixels[idx]),
            f64::from(self.pixels[idx + 1]),
            f64::from(self.pixels[idx + 2]),
        ]
    }
}

/// A finished render: JPEG bytes plus their decoded pixel dimensions.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Software implementation of [`Surface`] over an owned source [`Bitmap`].
///
/// The surface binds the source image; draw commands carry only
/// coordinates. `ExportBlocked` never occurs here - it is the browser
/// surface's failure mode.
#[derive(Debug)]
pub struct RasterSurface {
    source: Bitmap,
    target_width: u32,
    target_height: u32,
    output: Vec<u8>,
    rotation: Rotation,
    scale: f64,
}

impl RasterSurface {
    pub fn new(source: Bitmap, target_width: u32, target_height: u32) -> Self {
        Self {
            source,
            target_width,
            target_height,
            output: vec![0u8; (target_width * target_height * 3) as usize],
            rotation: Rotation::Deg0,
            scale: 1.0,
        }
    }

    /// Bilinear sample at pixel-center coordinates, clamped to `region`.
    fn sample_bilinear(&self, x: f64, y: f64, region: &PixelRegion) -> [u8; 3] {
        let min_x = f64::from(region.x);
        let min_y = f64::from(region.y);
        let max_x = f64::from(region.x + region.width - 1);
        let max_y = f64::from(region.y + region.height - 1);

        let x = x.clamp(min_x, max_x);
        let y = y.clamp(min_y, max_y);

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(region.x + region.width - 1);
        let y1 = (y0 + 1).min(region.y + region.height - 1);

        let fx = x - f64::from(x0);
        let fy = y - f64::from(y0);

        let p00 = self.source.pixel_f64(x0, y0);
        let p10 = self.source.pixel_f64(x1, y0);
        let p01 = self.source.pixel_f64(x0, y1);
        let p11 = self.source.pixel_f64(x1, y1);

        let mut result = [0u8; 3];
        for i in 0..3 {
            let v = p00[i] * (1.0 - fx) * (1.0 - fy)
                + p10[i] * fx * (1.0 - fy)
                + p01[i] * (1.0 - fx) * fy
                + p11[i] * fx * fy;
            result[i] = v.clamp(0.0, 255.0).round() as u8;
        }
        result
    }
}

impl Surface for RasterSurface {
    type Raster = EncodedImage;

    fn begin(&mut self, background: [u8; 3]) -> Result<(), SurfaceError> {
        for px in self.output.chunks_exact_mut(3) {
            px.copy_from_slice(&background);
        }
        self.rotation = Rotation::Deg0;
        self.scale = 1.0;
        Ok(())
    }

    fn apply_transform(&mut self, rotation: Rotation, scale: f64) -> Result<(), SurfaceError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(SurfaceError::DrawFailed(format!(
                "invalid scale factor {scale}"
            )));
        }
        self.rotation = rotation;
        self.scale = scale;
        Ok(())
    }

    fn draw_image(&mut self, source: PixelRegion, dest: DestRect) -> Result<(), SurfaceError> {
        if self.source.is_empty() {
            return Err(SurfaceError::DrawFailed("source bitmap is empty".into()));
        }
        if dest.width <= 0.0 || dest.height <= 0.0 {
            return Err(SurfaceError::DrawFailed(
                "destination rectangle has no area".into(),
            ));
        }

        // Trust but clamp: a region from CropRect::to_pixels is already in
        // bounds, but the surface must never read outside its bitmap.
        let x = source.x.min(self.source.width.saturating_sub(1));
        let y = source.y.min(self.source.height.saturating_sub(1));
        let region = PixelRegion {
            x,
            y,
            width: source.width.min(self.source.width - x).max(1),
            height: source.height.min(self.source.height - y).max(1),
        };

        let cx = f64::from(self.target_width) / 2.0;
        let cy = f64::from(self.target_height) / 2.0;
        let (sin, cos) = self.rotation.radians().sin_cos();

        for oy in 0..self.target_height {
            for ox in 0..self.target_width {
                // Screen position of this pixel's center, relative to C.
                let vx = f64::from(ox) + 0.5 - cx;
                let vy = f64::from(oy) + 0.5 - cy;

                // Inverse rotation, then inverse scale.
                let px = (vx * cos + vy * sin) / self.scale;
                let py = (vy * cos - vx * sin) / self.scale;

                // Fractional position inside the destination rectangle.
                let fx = (px - dest.x) / dest.width;
                let fy = (py - dest.y) / dest.height;
                if !(0.0..1.0).contains(&fx) || !(0.0..1.0).contains(&fy) {
                    continue;
                }

                let sx = f64::from(region.x) + fx * f64::from(region.width);
                let sy = f64::from(region.y) + fy * f64::from(region.height);
                let rgb = self.sample_bilinear(sx - 0.5, sy - 0.5, &region);

                let idx = ((oy * self.target_width + ox) * 3) as usize;
                self.output[idx..idx + 3].copy_from_slice(&rgb);
            }
        }
        Ok(())
    }

    fn finish(&mut self, quality: u8) -> Result<EncodedImage, SurfaceError> {
        let bytes = encode_jpeg(
            &self.output,
            self.target_width,
            self.target_height,
            quality,
        )?;
        Ok(EncodedImage {
            width: self.target_width,
            height: self.target_height,
            bytes,
        })
    }
}

/// Encode RGB pixel data to JPEG bytes.
///
/// Quality is clamped to 1-100. Dimension and buffer-length mismatches are
/// rejected rather than fed to the encoder.
fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, SurfaceError> {
    if width == 0 || height == 0 {
        return Err(SurfaceError::EncodingFailed(format!(
            "dimensions must be non-zero, got {width}x{height}"
        )));
    }
    let expected_len = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected_len {
        return Err(SurfaceError::EncodingFailed(format!(
            "expected {expected_len} bytes of pixel data, got {}",
            pixels.len()
        )));
    }

    let quality = quality.clamp(1, 100);
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| SurfaceError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::compose::render;
    use crate::geometry::{CropRect, TransformState};
    use crate::EditorConfig;
    use proptest::prelude::*;

    fn gradient_bitmap(width: u32, height: u32) -> Bitmap {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push(((x + y) % 256) as u8);
            }
        }
        Bitmap::new(width, height, pixels)
    }

    proptest! {
        /// Property: The encoded output always decodes to exactly the target
        /// dimensions, for any source size, crop and transform.
        #[test]
        fn prop_output_always_matches_target_size(
            source_w in 8u32..=120,
            source_h in 8u32..=120,
            target_w in 4u32..=64,
            target_h in 4u32..=64,
            crop_x in 0.0f64..=80.0,
            crop_y in 0.0f64..=80.0,
            crop_size in 15.0f64..=100.0,
            quarter_turns in 0u32..=3,
            scale in 0.5f64..=3.0,
        ) {
            let config = EditorConfig::new(
                f64::from(target_w) / f64::from(target_h),
                target_w,
                target_h,
            ).unwrap();
            let crop = CropRect::new(crop_x, crop_y, crop_size, crop_size);
            let mut transform = TransformState::new();
            for _ in 0..quarter_turns {
                transform.rotate_quarter_turn();
            }
            transform.set_scale(scale);

            let mut surface = RasterSurface::new(
                gradient_bitmap(source_w, source_h),
                target_w,
                target_h,
            );
            let encoded = render(
                &mut surface,
                &crop,
                &transform,
                source_w,
                source_h,
                &config,
            ).unwrap();

            prop_assert_eq!(encoded.width, target_w);
            prop_assert_eq!(encoded.height, target_h);

            let decoded = image::load_from_memory(&encoded.bytes).unwrap();
            prop_assert_eq!(decoded.width(), target_w);
            prop_assert_eq!(decoded.height(), target_h);
        }

        /// Property: Rendering is deterministic.
        #[test]
        fn prop_render_is_deterministic(
            source_w in 8u32..=60,
            source_h in 8u32..=60,
            quarter_turns in 0u32..=3,
        ) {
            let config = EditorConfig::new(1.0, 16, 16).unwrap();
            let crop = CropRect::new(10.0, 10.0, 50.0, 50.0);
            let mut transform = TransformState::new();
            for _ in 0..quarter_turns {
                transform.rotate_quarter_turn();
            }

            let run = || {
                let mut surface = RasterSurface::new(
                    gradient_bitmap(source_w, source_h),
                    16,
                    16,
                );
                render(&mut surface, &crop, &transform, source_w, source_h, &config)
                    .unwrap()
                    .bytes
            };

            prop_assert_eq!(run(), run());
        }
    }
}
