//! Blur overlay WASM bindings.
//!
//! The browser cannot be snapshotted from inside WASM, so the JavaScript
//! host pushes the pixels behind the overlay in and drives ticks from
//! requestAnimationFrame; the engine hands back composited frames.
//!
//! # Example (TypeScript)
//! ```typescript
//! const overlay = new JsBlurOverlay();
//! overlay.push_background(width, height, devicePixelRatio, rgbPixels);
//! overlay.animate_to(0.0, 0.35, 0, 0, null);
//!
//! function onFrame(now: number) {
//!   if (overlay.tick(now)) {
//!     drawFrame(overlay.frame());
//!   }
//!   requestAnimationFrame(onFrame);
//! }
//! requestAnimationFrame(onFrame);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use frostpane_core::{
    BlurOverlay, Capture, CaptureError, CaptureSource, CompletionHandler, OverlayConfig,
    RasterImage, SurfaceEvent,
};
use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::types::{curve_from_u8, style_from_u8, style_to_u8, JsRasterImage};

/// Capture source fed by JavaScript.
///
/// The host pushes snapshots into the shared slot; the engine pulls the
/// latest one whenever its background must be refreshed.
#[derive(Clone, Default)]
struct PushedBackground {
    slot: Rc<RefCell<Option<Capture>>>,
}

impl CaptureSource for PushedBackground {
    fn capture(&mut self) -> Result<Capture, CaptureError> {
        self.slot.borrow().clone().ok_or(CaptureError::Detached)
    }
}

/// Helper struct for deserializing a JS config object via serde.
#[derive(serde::Deserialize)]
#[serde(default)]
struct OverlayConfigJs {
    ladder_steps: usize,
    max_sigma: f32,
    style: u8,
    level: f32,
}

impl Default for OverlayConfigJs {
    fn default() -> Self {
        let config = OverlayConfig::default();
        Self {
            ladder_steps: config.ladder_steps,
            max_sigma: config.max_sigma,
            style: style_to_u8(config.style),
            level: config.level,
        }
    }
}

impl OverlayConfigJs {
    fn into_config(self) -> OverlayConfig {
        OverlayConfig {
            ladder_steps: self.ladder_steps,
            max_sigma: self.max_sigma,
            style: style_from_u8(self.style),
            level: self.level,
        }
    }
}

/// An animatable blurred overlay driven from JavaScript.
#[wasm_bindgen]
pub struct JsBlurOverlay {
    inner: BlurOverlay<PushedBackground>,
    background: PushedBackground,
}

#[wasm_bindgen]
impl JsBlurOverlay {
    /// Create an overlay with the default configuration (5 rendition steps,
    /// light style, full blur).
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsBlurOverlay {
        Self::from_config(OverlayConfig::default())
    }

    /// Create an overlay from a config object.
    ///
    /// # Arguments
    /// * `config` - Object with optional fields `ladder_steps`, `max_sigma`,
    ///   `style` (0 = Light, 1 = Dark) and `level`
    ///
    /// # Errors
    /// Returns error if the config cannot be deserialized
    pub fn with_config(config: JsValue) -> Result<JsBlurOverlay, JsValue> {
        let config: OverlayConfigJs = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid overlay config: {}", e)))?;
        Ok(Self::from_config(config.into_config()))
    }

    /// Push a background snapshot and rebuild the blur renditions from it.
    ///
    /// # Arguments
    /// * `width` - Snapshot width in pixels
    /// * `height` - Snapshot height in pixels
    /// * `scale` - Device pixels per CSS pixel at capture time
    /// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
    ///
    /// # Errors
    /// Returns error if the pixel buffer does not match the dimensions
    pub fn push_background(
        &mut self,
        width: u32,
        height: u32,
        scale: f32,
        pixels: Vec<u8>,
    ) -> Result<(), JsValue> {
        let expected = (width as usize) * (height as usize) * 3;
        if pixels.len() != expected {
            return Err(JsValue::from_str(&format!(
                "Pixel buffer is {} bytes, expected {} for {}x{} RGB",
                pixels.len(),
                expected,
                width,
                height
            )));
        }

        let capture = Capture::new(RasterImage::new(width, height, pixels), scale);
        *self.background.slot.borrow_mut() = Some(capture);
        self.inner.refresh_background();
        Ok(())
    }

    /// Re-pull the last pushed background and rebuild the renditions.
    ///
    /// A no-op when nothing has been pushed yet.
    pub fn refresh_background(&mut self) {
        self.inner.refresh_background();
    }

    /// Notify the overlay that it was attached to its surface.
    pub fn attached(&mut self) {
        self.inner.handle_surface_event(SurfaceEvent::Attached);
    }

    /// Notify the overlay that its element moved or resized.
    pub fn frame_changed(&mut self) {
        self.inner.handle_surface_event(SurfaceEvent::FrameChanged);
    }

    /// The blur level currently displayed (0.0 to 1.0)
    #[wasm_bindgen(getter)]
    pub fn level(&self) -> f32 {
        self.inner.level()
    }

    /// The current blur style (0 = Light, 1 = Dark)
    #[wasm_bindgen(getter)]
    pub fn style(&self) -> u8 {
        style_to_u8(self.inner.style())
    }

    /// Whether a blur animation is pending or in flight
    #[wasm_bindgen(getter)]
    pub fn is_animating(&self) -> bool {
        self.inner.is_animating()
    }

    /// Device pixels per CSS pixel of the snapshot behind the current
    /// frame, or undefined before the first successful push
    #[wasm_bindgen(getter)]
    pub fn capture_scale(&self) -> Option<f32> {
        self.inner.capture_scale()
    }

    /// Set the blur level directly, superseding any animation.
    pub fn set_level(&mut self, level: f32) {
        self.inner.set_level(level);
    }

    /// Switch the blur style, rebuilding the renditions from the retained
    /// snapshot.
    ///
    /// # Arguments
    /// * `style` - 0 = Light, 1 = Dark (unknown values mean Light)
    pub fn set_style(&mut self, style: u8) {
        self.inner.set_style(style_from_u8(style));
    }

    /// Animate the blur level toward a target.
    ///
    /// An animation already in flight is superseded; its completion callback
    /// is invoked with `false` first.
    ///
    /// # Arguments
    /// * `level` - Target blur level (0.0 to 1.0)
    /// * `duration` - Animation length in seconds
    /// * `delay` - Seconds to wait before the motion starts
    /// * `curve` - 0 = EaseInOut, 1 = EaseIn, 2 = EaseOut, 3 = Linear
    /// * `completion` - Optional callback invoked once with a boolean
    ///   `finished` flag
    pub fn animate_to(
        &mut self,
        level: f32,
        duration: f64,
        delay: f64,
        curve: u8,
        completion: Option<Function>,
    ) {
        let completion = completion.map(|callback| {
            Box::new(move |finished: bool| {
                let _ = callback.call1(&JsValue::NULL, &JsValue::from_bool(finished));
            }) as CompletionHandler
        });
        self.inner
            .animate_to(level, duration, delay, curve_from_u8(curve), completion);
    }

    /// Advance animations to `now_ms` (a performance.now() timestamp).
    ///
    /// # Returns
    /// `true` when the displayed frame changed and should be redrawn
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.inner.tick(now_ms / 1000.0)
    }

    /// The current composited frame, or undefined before the first
    /// successful push.
    ///
    /// Note: This copies the frame out of WASM memory.
    pub fn frame(&self) -> Option<JsRasterImage> {
        self.inner
            .frame()
            .map(|frame| JsRasterImage::from_raster(frame.clone()))
    }
}

impl JsBlurOverlay {
    fn from_config(config: OverlayConfig) -> Self {
        let background = PushedBackground::default();
        Self {
            inner: BlurOverlay::with_config(background.clone(), config),
            background,
        }
    }
}

impl Default for JsBlurOverlay {
    fn default() -> Self {
        Self::new()
    }
}
