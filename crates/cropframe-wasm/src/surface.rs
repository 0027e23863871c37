//! Canvas implementation of the core drawing-surface trait.
//!
//! [`CanvasSurface`] binds an off-screen `HtmlCanvasElement` sized to the
//! output target and the loaded source `HtmlImageElement`. The core engine
//! issues the same call sequence it issues to the software renderer; here
//! each call maps directly onto the 2D context API, and `finish` exports the
//! canvas as a JPEG data URL.
//!
//! A canvas painted with cross-origin pixels that were loaded without
//! permission refuses `toDataURL` with a `SecurityError`; that case is
//! mapped to [`SurfaceError::ExportBlocked`] so the editor can drop into
//! crop-only mode instead of crashing.

use cropframe_core::compose::{DestRect, Surface, SurfaceError};
use cropframe_core::geometry::{PixelRegion, Rotation};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

/// Drawing surface over a 2D canvas context, exclusively owned by one
/// editor session.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    image: HtmlImageElement,
    target_width: u32,
    target_height: u32,
}

impl CanvasSurface {
    /// Bind a canvas and a loaded source image, resizing the canvas to the
    /// output target.
    pub fn create(
        canvas: &HtmlCanvasElement,
        image: &HtmlImageElement,
        target_width: u32,
        target_height: u32,
    ) -> Result<CanvasSurface, JsValue> {
        canvas.set_width(target_width);
        canvas.set_height(target_height);

        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d canvas context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(CanvasSurface {
            canvas: canvas.clone(),
            context,
            image: image.clone(),
            target_width,
            target_height,
        })
    }
}

impl Surface for CanvasSurface {
    type Raster = String;

    fn begin(&mut self, background: [u8; 3]) -> Result<(), SurfaceError> {
        self.context
            .set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
            .map_err(draw_failed)?;
        self.context.set_fill_style_str(&format!(
            "rgb({},{},{})",
            background[0], background[1], background[2]
        ));
        self.context.fill_rect(
            0.0,
            0.0,
            f64::from(self.target_width),
            f64::from(self.target_height),
        );
        Ok(())
    }

    fn apply_transform(&mut self, rotation: Rotation, scale: f64) -> Result<(), SurfaceError> {
        self.context
            .translate(
                f64::from(self.target_width) / 2.0,
                f64::from(self.target_height) / 2.0,
            )
            .map_err(draw_failed)?;
        self.context.rotate(rotation.radians()).map_err(draw_failed)?;
        self.context.scale(scale, scale).map_err(draw_failed)?;
        Ok(())
    }

    fn draw_image(&mut self, source: PixelRegion, dest: DestRect) -> Result<(), SurfaceError> {
        self.context
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &self.image,
                f64::from(source.x),
                f64::from(source.y),
                f64::from(source.width),
                f64::from(source.height),
                dest.x,
                dest.y,
                dest.width,
                dest.height,
            )
            .map_err(draw_failed)
    }

    fn finish(&mut self, quality: u8) -> Result<String, SurfaceError> {
        let quality = f64::from(quality.clamp(1, 100)) / 100.0;
        self.canvas
            .to_data_url_with_type_and_encoder_options("image/jpeg", &JsValue::from_f64(quality))
            .map_err(|err| {
                if is_security_error(&err) {
                    SurfaceError::ExportBlocked
                } else {
                    SurfaceError::EncodingFailed(format!("{err:?}"))
                }
            })
    }
}

fn draw_failed(err: JsValue) -> SurfaceError {
    SurfaceError::DrawFailed(format!("{err:?}"))
}

/// `toDataURL` throws a DOMException named `SecurityError` exactly when the
/// canvas is tainted by cross-origin pixel data.
fn is_security_error(err: &JsValue) -> bool {
    err.dyn_ref::<js_sys::Error>()
        .map(|e| e.name() == "SecurityError")
        .unwrap_or(false)
}
