//! Editor session lifecycle and error handling.
//!
//! A session is created when the editor opens with a validated
//! [`EditorConfig`], waits for the source image to load, then routes user
//! gestures into the geometry model until the caller confirms or cancels.
//! Loading the image is the only asynchronous step and it happens outside
//! this crate: the host performs the load and reports the outcome through
//! [`EditorSession::source_ready`] / [`EditorSession::source_failed`].
//!
//! State transitions never leave the model half-updated: every mutation
//! either produces a whole new valid rectangle/transform or is not applied
//! at all, and a retry after a failed load starts from a fully reset model.

use crate::compose::{self, Surface, SurfaceError};
use crate::geometry::{CropRect, TransformState};
use crate::interaction::InteractionController;
use crate::EditorConfig;
use serde::Serialize;
use thiserror::Error;

/// A failed source-image load. Recoverable: the host offers a retry which
/// re-issues the same load request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("image load failed: {reason}")]
pub struct ImageLoadError {
    pub reason: String,
}

/// Externally visible load state of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Loading,
    Ready,
    Failed,
}

/// Source image ownership: natural dimensions once ready, the failure
/// otherwise.
#[derive(Debug, Clone, PartialEq)]
enum SourceImage {
    Loading,
    Ready {
        natural_width: u32,
        natural_height: u32,
    },
    Failed(ImageLoadError),
}

/// Errors from rendering a preview or the final export.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The source image has not reached the ready state.
    #[error("source image is not ready")]
    SourceNotReady,

    /// The drawing surface failed; see [`SurfaceError`] for recoverability.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// One interactive crop/transform editing session.
///
/// The session exclusively owns its state; nothing persists across sessions
/// except what the caller keeps from the returned raster.
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    source: SourceImage,
    crop: Option<CropRect>,
    transform: TransformState,
    controller: InteractionController,
}

impl EditorSession {
    /// Open a session with an already validated configuration.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            source: SourceImage::Loading,
            crop: None,
            transform: TransformState::new(),
            controller: InteractionController::new(),
        }
    }

    pub fn config(&self) -> EditorConfig {
        self.config
    }

    pub fn load_state(&self) -> LoadState {
        match self.source {
            SourceImage::Loading => LoadState::Loading,
            SourceImage::Ready { .. } => LoadState::Ready,
            SourceImage::Failed(_) => LoadState::Failed,
        }
    }

    /// The load failure, while in the failed state.
    pub fn load_error(&self) -> Option<&ImageLoadError> {
        match &self.source {
            SourceImage::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Natural pixel dimensions of the source, once ready.
    pub fn natural_size(&self) -> Option<(u32, u32)> {
        match self.source {
            SourceImage::Ready {
                natural_width,
                natural_height,
            } => Some((natural_width, natural_height)),
            _ => None,
        }
    }

    /// The current crop rectangle; `None` until the source is ready.
    pub fn crop(&self) -> Option<CropRect> {
        self.crop
    }

    pub fn transform(&self) -> TransformState {
        self.transform
    }

    /// The source image finished loading: initialize the default centered
    /// crop and a clean transform.
    pub fn source_ready(&mut self, natural_width: u32, natural_height: u32) {
        log::debug!("source ready at {natural_width}x{natural_height}");
        self.source = SourceImage::Ready {
            natural_width,
            natural_height,
        };
        self.crop = Some(CropRect::centered_default(
            natural_width,
            natural_height,
            self.config.aspect_ratio,
        ));
        self.transform = TransformState::new();
        self.controller.pointer_up();
    }

    /// The source image failed to load.
    pub fn source_failed(&mut self, reason: impl Into<String>) {
        let error = ImageLoadError {
            reason: reason.into(),
        };
        log::warn!("{error}");
        self.source = SourceImage::Failed(error);
        self.crop = None;
        self.transform = TransformState::new();
        self.controller.pointer_up();
    }

    /// Re-enter the loading state after a failure.
    ///
    /// The model is reset, not patched: no state from the failed attempt
    /// leaks into a subsequent successful load.
    pub fn retry(&mut self) {
        if matches!(self.source, SourceImage::Failed(_)) {
            log::debug!("retrying source load");
            self.source = SourceImage::Loading;
            self.crop = None;
            self.transform = TransformState::new();
            self.controller.pointer_up();
        }
    }

    /// Begin a pointer gesture at container percentage coordinates.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if let Some(crop) = &self.crop {
            self.controller.pointer_down(crop, x, y);
        }
    }

    /// Advance the active gesture. Returns `true` when the crop rectangle
    /// changed and the preview should re-render.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        let Some(current) = self.crop else {
            return false;
        };
        match self
            .controller
            .pointer_move(&current, x, y, self.config.aspect_ratio)
        {
            Some(next) if next != current => {
                self.crop = Some(next);
                true
            }
            _ => false,
        }
    }

    /// End the active gesture.
    pub fn pointer_up(&mut self) {
        self.controller.pointer_up();
    }

    /// Advance the rotation by a quarter turn.
    pub fn rotate_quarter_turn(&mut self) {
        self.transform.rotate_quarter_turn();
    }

    /// Set the zoom factor (clamped by the transform state).
    pub fn set_scale(&mut self, scale: f64) {
        self.transform.set_scale(scale);
    }

    /// Restore the default centered crop and identity transform.
    pub fn reset(&mut self) {
        if let Some((natural_width, natural_height)) = self.natural_size() {
            self.crop = Some(CropRect::centered_default(
                natural_width,
                natural_height,
                self.config.aspect_ratio,
            ));
            self.transform = TransformState::new();
            self.controller.pointer_up();
        }
    }

    /// Render the current state onto `surface` for the live preview.
    pub fn render_preview<S: Surface>(&self, surface: &mut S) -> Result<S::Raster, RenderError> {
        let (natural_width, natural_height) =
            self.natural_size().ok_or(RenderError::SourceNotReady)?;
        let crop = self.crop.ok_or(RenderError::SourceNotReady)?;
        let raster = compose::render(
            surface,
            &crop,
            &self.transform,
            natural_width,
            natural_height,
            &self.config,
        )?;
        Ok(raster)
    }

    /// Perform the confirm-time render.
    ///
    /// Identical to the preview pass by design, so what the user saw is what
    /// the caller gets. On success the caller hands the raster to its
    /// confirm path and drops the session; on [`SurfaceError::ExportBlocked`]
    /// the session stays usable in crop-only mode.
    pub fn confirm<S: Surface>(&self, surface: &mut S) -> Result<S::Raster, RenderError> {
        let raster = self.render_preview(surface)?;
        log::debug!("session confirmed");
        Ok(raster)
    }

    /// Close the session, discarding all state. No side effects on the
    /// caller.
    pub fn cancel(self) {
        log::debug!("session cancelled");
    }
}
