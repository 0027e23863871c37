//! Cross-origin source image loading.
//!
//! Image loading is the only asynchronous step of an editor session and it
//! stays on the JavaScript side: this module hands the host a correctly
//! configured `HtmlImageElement` and the host wires `onload`/`onerror` to
//! [`CropSession::source_ready`] / [`CropSession::source_failed`]. A retry
//! re-issues the same request with a fresh element.
//!
//! [`CropSession::source_ready`]: crate::CropSession::source_ready
//! [`CropSession::source_failed`]: crate::CropSession::source_failed

use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

/// Create an image element loading `url` in permissive cross-origin mode.
///
/// `crossOrigin = "anonymous"` asks the server for CORS clearance, which is
/// what later allows the canvas to be exported. Sources served without the
/// header still load and crop; only export is blocked.
#[wasm_bindgen]
pub fn request_source(url: &str) -> Result<HtmlImageElement, JsValue> {
    let image = HtmlImageElement::new()?;
    image.set_cross_origin(Some("anonymous"));
    image.set_src(url);
    Ok(image)
}
