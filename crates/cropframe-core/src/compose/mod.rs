//! Transform & compositing engine.
//!
//! [`render`] turns the current `(CropRect, TransformState, source size,
//! EditorConfig)` into a raster of exactly `target_width x target_height`
//! pixels. The drawing surface is an injected capability ([`Surface`]) so the
//! engine runs identically against the browser canvas, the software
//! [`RasterSurface`], or a recording fake in unit tests.
//!
//! # Render Sequence
//!
//! 1. Fill the surface with a neutral background so rounding slack at the
//!    edges never shows as an artifact.
//! 2. Move the origin to the surface center and apply rotation, then scale.
//! 3. Convert the crop rectangle to source pixels, clamped to the image.
//! 4. Draw the clamped region into a destination rectangle centered on the
//!    transformed origin, sized to fill the whole target.
//! 5. Encode the surface. The same pass serves the live preview and the
//!    confirm-time export.

mod raster;

pub use raster::{Bitmap, EncodedImage, RasterSurface};

use crate::geometry::{CropRect, PixelRegion, Rotation, TransformState};
use crate::EditorConfig;
use thiserror::Error;

/// JPEG quality used for both preview and export encodes.
pub const EXPORT_QUALITY: u8 = 90;

/// Neutral background behind the drawn region. Opaque white: the output is
/// JPEG, which has no alpha, and white reads as padding rather than damage.
pub const BACKGROUND_RGB: [u8; 3] = [255, 255, 255];

/// Errors raised by a drawing surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The surface contains cross-origin pixel data and refuses readback.
    /// Recoverable: cropping keeps working without a preview, export stays
    /// unavailable until the source is served with permission.
    #[error("export blocked: surface is tainted by cross-origin pixel data")]
    ExportBlocked,

    /// A draw command failed.
    #[error("draw failed: {0}")]
    DrawFailed(String),

    /// Encoding the finished surface failed.
    #[error("encoding failed: {0}")]
    EncodingFailed(String),
}

/// Destination rectangle for a draw, in output-surface units relative to the
/// transformed origin at the surface center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DestRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// An exclusively-owned drawing surface for one editor session.
///
/// Implementations interpret the calls in the order [`render`] issues them:
/// `begin`, `apply_transform`, `draw_image`, `finish`. The associated
/// `Raster` is whatever encoded form the surface naturally produces - JPEG
/// bytes for the software surface, a data URL for the browser canvas.
pub trait Surface {
    type Raster;

    /// Reset the surface and fill it with the background color.
    fn begin(&mut self, background: [u8; 3]) -> Result<(), SurfaceError>;

    /// Move the origin to the surface center, then rotate and scale about it.
    fn apply_transform(&mut self, rotation: Rotation, scale: f64) -> Result<(), SurfaceError>;

    /// Draw the given source region into `dest`, under the current transform.
    fn draw_image(&mut self, source: PixelRegion, dest: DestRect) -> Result<(), SurfaceError>;

    /// Encode the surface contents as a raster.
    fn finish(&mut self, quality: u8) -> Result<Self::Raster, SurfaceError>;
}

/// Execute one full render pass against `surface`.
///
/// The output raster always measures `config.target_width` by
/// `config.target_height` pixels, regardless of the source size or the
/// selected region.
pub fn render<S: Surface>(
    surface: &mut S,
    crop: &CropRect,
    transform: &TransformState,
    natural_width: u32,
    natural_height: u32,
    config: &EditorConfig,
) -> Result<S::Raster, SurfaceError> {
    surface.begin(BACKGROUND_RGB)?;
    surface.apply_transform(transform.rotation(), transform.scale())?;

    let source = crop.to_pixels(natural_width, natural_height);
    let dest = DestRect {
        x: -f64::from(config.target_width) / 2.0,
        y: -f64::from(config.target_height) / 2.0,
        width: f64::from(config.target_width),
        height: f64::from(config.target_height),
    };
    surface.draw_image(source, dest)?;

    let raster = surface.finish(EXPORT_QUALITY);
    if let Err(SurfaceError::ExportBlocked) = &raster {
        log::warn!("surface readback blocked; continuing in crop-only mode");
    }
    raster
}
