//! Editor session WASM bindings.
//!
//! [`CropSession`] wraps the core [`EditorSession`] for JavaScript. The host
//! page feeds it pointer events in container percentage coordinates, reports
//! the outcome of the image load, and asks it to render into a canvas for
//! the live preview and the confirm-time export.
//!
//! The host owns the session object and frees it (or lets the finalizer run)
//! when the editor closes; cancellation is simply dropping the object.

use cropframe_core::session::{EditorSession, LoadState};
use cropframe_core::{EditorConfig, RenderError, SurfaceError};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlImageElement};

use crate::surface::CanvasSurface;

/// One interactive crop/transform editing session, driven from JavaScript.
#[wasm_bindgen]
pub struct CropSession {
    inner: EditorSession,
}

#[wasm_bindgen]
impl CropSession {
    /// Open a session.
    ///
    /// # Arguments
    ///
    /// * `aspect_ratio` - Required `width / height` ratio of the selection
    /// * `target_width` - Exact pixel width of the output raster
    /// * `target_height` - Exact pixel height of the output raster
    ///
    /// # Errors
    ///
    /// Rejects non-positive aspect ratios and zero target dimensions; the
    /// editor must not open with an invalid configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(
        aspect_ratio: f64,
        target_width: u32,
        target_height: u32,
    ) -> Result<CropSession, JsValue> {
        let config = EditorConfig::new(aspect_ratio, target_width, target_height)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(CropSession {
            inner: EditorSession::new(config),
        })
    }

    /// Report that the source image finished loading.
    pub fn source_ready(&mut self, natural_width: u32, natural_height: u32) {
        self.inner.source_ready(natural_width, natural_height);
    }

    /// Report that the source image failed to load.
    pub fn source_failed(&mut self, reason: String) {
        self.inner.source_failed(reason);
    }

    /// Re-enter the loading state after a failure, for a retry.
    pub fn retry(&mut self) {
        self.inner.retry();
    }

    /// Current load state: `"loading"`, `"ready"` or `"failed"`.
    #[wasm_bindgen(getter)]
    pub fn load_state(&self) -> String {
        match self.inner.load_state() {
            LoadState::Loading => "loading",
            LoadState::Ready => "ready",
            LoadState::Failed => "failed",
        }
        .to_string()
    }

    /// The load failure message, while in the failed state.
    #[wasm_bindgen(getter)]
    pub fn load_error(&self) -> Option<String> {
        self.inner.load_error().map(|e| e.reason.clone())
    }

    /// Begin a pointer gesture. Coordinates are percentages of the display
    /// container.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.inner.pointer_down(x, y);
    }

    /// Advance the active gesture. Returns `true` when the crop changed and
    /// the preview should re-render.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.inner.pointer_move(x, y)
    }

    /// End the active gesture.
    pub fn pointer_up(&mut self) {
        self.inner.pointer_up();
    }

    /// Advance the rotation by a quarter turn (+90 degrees, wrapping).
    pub fn rotate(&mut self) {
        self.inner.rotate_quarter_turn();
    }

    /// Set the zoom factor; values outside `[0.5, 3.0]` are clamped.
    pub fn set_scale(&mut self, scale: f64) {
        self.inner.set_scale(scale);
    }

    /// Restore the default centered crop and identity transform.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Current rotation in degrees (0, 90, 180 or 270).
    #[wasm_bindgen(getter)]
    pub fn rotation_degrees(&self) -> u32 {
        self.inner.transform().rotation().degrees()
    }

    /// Current zoom factor.
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.transform().scale()
    }

    /// Snapshot of the crop rectangle as `{x, y, width, height}` percentage
    /// values, or `null` until the source is ready. The host positions its
    /// selection chrome and handles from this.
    pub fn crop_rect(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.crop())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Render the current state into `canvas` and return the JPEG data URL
    /// for the live preview.
    ///
    /// # Errors
    ///
    /// `"source image is not ready"` while loading or failed; an
    /// export-blocked message when the canvas is tainted by cross-origin
    /// pixels (cropping keeps working, the preview does not).
    pub fn render_preview(
        &self,
        canvas: &HtmlCanvasElement,
        image: &HtmlImageElement,
    ) -> Result<String, JsValue> {
        let mut surface = self.bind_surface(canvas, image)?;
        self.inner
            .render_preview(&mut surface)
            .map_err(render_error_to_js)
    }

    /// Perform the confirm-time render and return the final JPEG data URL.
    ///
    /// The pass is identical to the preview, so the returned raster is
    /// exactly what the user saw. On success the host hands the data URL to
    /// its confirm callback and frees the session.
    pub fn confirm(
        &self,
        canvas: &HtmlCanvasElement,
        image: &HtmlImageElement,
    ) -> Result<String, JsValue> {
        let mut surface = self.bind_surface(canvas, image)?;
        self.inner.confirm(&mut surface).map_err(render_error_to_js)
    }
}

impl CropSession {
    fn bind_surface(
        &self,
        canvas: &HtmlCanvasElement,
        image: &HtmlImageElement,
    ) -> Result<CanvasSurface, JsValue> {
        let config = self.inner.config();
        CanvasSurface::create(canvas, image, config.target_width, config.target_height)
    }
}

fn render_error_to_js(err: RenderError) -> JsValue {
    // Keep the export-blocked case recognizable so the host can switch to
    // crop-only mode rather than treating it as fatal.
    match err {
        RenderError::Surface(SurfaceError::ExportBlocked) => {
            JsValue::from_str("export-blocked: canvas is tainted by cross-origin pixel data")
        }
        other => JsValue::from_str(&other.to_string()),
    }
}
