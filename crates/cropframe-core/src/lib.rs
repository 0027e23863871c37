//! Cropframe Core - interactive crop/transform editor engine
//!
//! This crate provides the engine behind the Cropframe image editor: the
//! geometry model for an aspect-locked crop selection, pointer interaction
//! and constraint solving, and the compositing pass that produces a raster
//! of an exact pixel size. The drawing surface is injected (see
//! [`compose::Surface`]), so the engine runs against a browser canvas, the
//! built-in software renderer, or a test fake.

pub mod compose;
pub mod constraint;
pub mod geometry;
pub mod interaction;
pub mod session;

pub use compose::{render, Bitmap, EncodedImage, RasterSurface, Surface, SurfaceError};
pub use geometry::{CropRect, PixelRegion, Rotation, TransformState};
pub use interaction::{DragState, Handle, InteractionController};
pub use session::{EditorSession, ImageLoadError, LoadState, RenderError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors rejecting an editor configuration. Fatal at session start: the
/// editor must not open with an invalid target.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Aspect ratio must be a positive, finite number.
    #[error("invalid aspect ratio {0}: must be positive and finite")]
    InvalidAspectRatio(f64),

    /// Target dimensions must both be non-zero.
    #[error("invalid target size {width}x{height}: dimensions must be non-zero")]
    InvalidTargetSize { width: u32, height: u32 },
}

/// Caller-supplied editor configuration, immutable for the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Required `width / height` ratio of the crop selection.
    pub aspect_ratio: f64,
    /// Exact pixel width of the output raster.
    pub target_width: u32,
    /// Exact pixel height of the output raster.
    pub target_height: u32,
}

impl EditorConfig {
    /// Validate and build a configuration.
    pub fn new(
        aspect_ratio: f64,
        target_width: u32,
        target_height: u32,
    ) -> Result<Self, ConfigError> {
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            return Err(ConfigError::InvalidAspectRatio(aspect_ratio));
        }
        if target_width == 0 || target_height == 0 {
            return Err(ConfigError::InvalidTargetSize {
                width: target_width,
                height: target_height,
            });
        }
        Ok(Self {
            aspect_ratio,
            target_width,
            target_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_accepts_valid_input() {
        let config = EditorConfig::new(1.778, 800, 450).unwrap();
        assert_eq!(config.aspect_ratio, 1.778);
        assert_eq!(config.target_width, 800);
        assert_eq!(config.target_height, 450);
    }

    #[test]
    fn test_config_rejects_bad_aspect_ratio() {
        assert_eq!(
            EditorConfig::new(0.0, 800, 450),
            Err(ConfigError::InvalidAspectRatio(0.0))
        );
        assert!(matches!(
            EditorConfig::new(-1.5, 800, 450),
            Err(ConfigError::InvalidAspectRatio(_))
        ));
        assert!(matches!(
            EditorConfig::new(f64::NAN, 800, 450),
            Err(ConfigError::InvalidAspectRatio(_))
        ));
        assert!(matches!(
            EditorConfig::new(f64::INFINITY, 800, 450),
            Err(ConfigError::InvalidAspectRatio(_))
        ));
    }

    #[test]
    fn test_config_rejects_zero_target_dimensions() {
        assert_eq!(
            EditorConfig::new(1.0, 0, 450),
            Err(ConfigError::InvalidTargetSize {
                width: 0,
                height: 450
            })
        );
        assert!(EditorConfig::new(1.0, 800, 0).is_err());
        assert!(EditorConfig::new(1.0, 0, 0).is_err());
    }

    #[test]
    fn test_config_error_display() {
        let err = EditorConfig::new(1.0, 0, 450).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid target size 0x450: dimensions must be non-zero"
        );
    }
}
