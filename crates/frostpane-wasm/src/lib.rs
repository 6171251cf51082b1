//! Frostpane WASM - WebAssembly bindings for Frostpane
//!
//! This crate provides WASM bindings to expose the frostpane-core blur
//! overlay engine to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `overlay` - The blur overlay controller (push backgrounds, animate, tick)
//! - `easing` - Easing curve evaluation for UI previews
//! - `types` - WASM-compatible wrapper types for image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsBlurOverlay } from '@frostpane/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const overlay = new JsBlurOverlay();
//! overlay.push_background(width, height, devicePixelRatio, rgbPixels);
//!
//! // Fade the blur out over 350ms
//! overlay.animate_to(0.0, 0.35, 0, 0, (finished) => {
//!   console.log(`fade done: ${finished}`);
//! });
//! ```

use wasm_bindgen::prelude::*;

mod easing;
mod overlay;
mod types;

// Re-export public types
pub use easing::{curve_samples, evaluate_curve};
pub use overlay::JsBlurOverlay;
pub use types::JsRasterImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&"frostpane wasm initialized".into());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
