//! Rotation and scale state applied on top of the crop selection.

use serde::{Deserialize, Serialize};

/// Lower bound for the zoom factor.
pub const SCALE_MIN: f64 = 0.5;

/// Upper bound for the zoom factor.
pub const SCALE_MAX: f64 = 3.0;

/// Quarter-turn rotation applied during compositing.
///
/// Rotation advances in +90 degree steps and wraps modulo 360. Angles are
/// clockwise, matching the y-down output surface coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    /// No rotation.
    #[default]
    Deg0,
    /// Quarter turn clockwise.
    Deg90,
    /// Half turn.
    Deg180,
    /// Three-quarter turn clockwise.
    Deg270,
}

impl Rotation {
    /// Angle in degrees (0, 90, 180 or 270).
    pub fn degrees(self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Angle in radians.
    pub fn radians(self) -> f64 {
        f64::from(self.degrees()).to_radians()
    }

    /// The next quarter turn (+90 degrees, wrapping past 270 back to 0).
    pub fn advanced(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// Whether this rotation swaps the horizontal and vertical axes.
    #[inline]
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl From<u32> for Rotation {
    fn from(degrees: u32) -> Self {
        match degrees % 360 {
            90 => Rotation::Deg90,
            180 => Rotation::Deg180,
            270 => Rotation::Deg270,
            _ => Rotation::Deg0,
        }
    }
}

/// Rotation plus zoom, mutated only through the clamping setters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    rotation: Rotation,
    scale: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            rotation: Rotation::Deg0,
            scale: 1.0,
        }
    }
}

impl TransformState {
    /// Identity transform: no rotation, scale 1.0.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Advance the rotation by a quarter turn.
    pub fn rotate_quarter_turn(&mut self) {
        self.rotation = self.rotation.advanced();
    }

    /// Set the zoom factor, clamped to `[SCALE_MIN, SCALE_MAX]`.
    ///
    /// Non-finite input is ignored and the previous value kept.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = scale.clamp(SCALE_MIN, SCALE_MAX);
        }
    }

    /// Whether the transform has no visible effect.
    pub fn is_identity(&self) -> bool {
        self.rotation == Rotation::Deg0 && self.scale == 1.0
    }
}
