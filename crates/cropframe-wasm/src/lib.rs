//! Cropframe WASM - WebAssembly bindings for the Cropframe crop editor
//!
//! This crate exposes the cropframe-core editor session to
//! JavaScript/TypeScript applications and provides the browser-side
//! implementation of the core drawing-surface trait over a 2D canvas
//! context.
//!
//! # Module Structure
//!
//! - `session` - The editor session wrapper driven by pointer events
//! - `surface` - `Surface` implementation over `CanvasRenderingContext2d`
//! - `loader` - Cross-origin source image loading
//!
//! # Usage
//!
//! ```typescript
//! import init, { CropSession, request_source } from '@cropframe/wasm';
//!
//! await init();
//!
//! const session = new CropSession(16 / 9, 800, 450);
//! const image = request_source(url);
//! image.onload = () => session.source_ready(image.naturalWidth, image.naturalHeight);
//! image.onerror = () => session.source_failed('image failed to load');
//! ```

use wasm_bindgen::prelude::*;

mod loader;
mod session;
mod surface;

// Re-export public types
pub use loader::request_source;
pub use session::CropSession;
pub use surface::CanvasSurface;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
