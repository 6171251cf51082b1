//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core
//! Frostpane types, handling the conversion between Rust and JavaScript
//! data representations.

use frostpane_core::{AnimationCurve, BlurStyle, RasterImage};
use wasm_bindgen::prelude::*;

/// A raster image wrapper for JavaScript.
///
/// This type wraps the core `RasterImage` type and provides a
/// JavaScript-friendly interface for accessing image dimensions and pixel
/// data.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy
/// is made to JavaScript memory as a `Uint8Array`. For performance-critical
/// code, keep the image in WASM memory and only extract pixels when needed.
///
/// The `free()` method can be called to explicitly release WASM memory, but
/// this is optional as wasm-bindgen's finalizer will handle cleanup
/// automatically.
#[wasm_bindgen]
pub struct JsRasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRasterImage {
    /// Create a new JsRasterImage from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsRasterImage {
        JsRasterImage {
            width,
            height,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 3 for RGB)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup
    /// automatically. Call this to immediately release a large frame.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsRasterImage {
    /// Create a JsRasterImage from a core RasterImage.
    pub(crate) fn from_raster(image: RasterImage) -> Self {
        Self {
            width: image.width,
            height: image.height,
            pixels: image.pixels,
        }
    }
}

/// Convert a u8 style value to the core BlurStyle enum.
///
/// Values:
/// - 0 = Light (blurred content under a white tint)
/// - 1 = Dark (blurred content under a black tint)
///
/// Any other value defaults to Light.
pub(crate) fn style_from_u8(value: u8) -> BlurStyle {
    match value {
        1 => BlurStyle::Dark,
        _ => BlurStyle::Light, // Default
    }
}

/// Convert a core BlurStyle back to its u8 value.
pub(crate) fn style_to_u8(style: BlurStyle) -> u8 {
    match style {
        BlurStyle::Light => 0,
        BlurStyle::Dark => 1,
    }
}

/// Convert a u8 curve value to the core AnimationCurve enum.
///
/// Values:
/// - 0 = EaseInOut (slow start and end)
/// - 1 = EaseIn (slow start)
/// - 2 = EaseOut (slow end)
/// - 3 = Linear (even pace)
///
/// Any other value defaults to EaseInOut.
pub(crate) fn curve_from_u8(value: u8) -> AnimationCurve {
    match value {
        1 => AnimationCurve::EaseIn,
        2 => AnimationCurve::EaseOut,
        3 => AnimationCurve::Linear,
        _ => AnimationCurve::EaseInOut, // Default
    }
}
