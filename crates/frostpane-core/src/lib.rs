//! Frostpane Core - Animatable blur overlay engine
//!
//! This crate provides the engine behind Frostpane's blurred overlays:
//! capturing a snapshot of the content behind an overlay region, deriving a
//! small ladder of precomputed blur renditions from that capture, and
//! crossfading between the two renditions adjacent to the current blur level
//! while a time-based animation moves the level. The expensive blur filter
//! runs a handful of times per capture instead of once per displayed frame;
//! each frame costs a single pixel-wise blend.

pub mod animator;
pub mod capture;
pub mod compositor;
pub mod easing;
pub mod filter;
pub mod ladder;
pub mod overlay;

pub use animator::{BlurAnimator, CompletionHandler};
pub use capture::{Capture, CaptureError, CaptureSource, RasterImage};
pub use compositor::{blend_images, sample};
pub use easing::AnimationCurve;
pub use filter::{apply_tint, BlurFilter, FilterError, GaussianBlurFilter};
pub use ladder::RenditionLadder;
pub use overlay::{BlurOverlay, SurfaceEvent};

/// Number of precomputed blur renditions derived from each capture.
///
/// More steps make the crossfade finer at the cost of memory and rebuild
/// time; fewer steps lean harder on the per-frame blend.
pub const DEFAULT_LADDER_STEPS: usize = 5;

/// Gaussian sigma applied at blur intensity 1.0.
pub const DEFAULT_MAX_SIGMA: f32 = 16.0;

/// Blur level a freshly constructed overlay displays.
pub const DEFAULT_BLUR_LEVEL: f32 = 1.0;

/// Visual variant of the blurred material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum BlurStyle {
    /// Bright material: blurred content under a translucent white tint.
    #[default]
    Light,
    /// Dim material: blurred content under a translucent black tint.
    Dark,
}

impl BlurStyle {
    /// The tint composited over the blurred capture for this style.
    pub fn tint(self) -> Tint {
        match self {
            BlurStyle::Light => Tint::new(255, 255, 255, 0.30),
            BlurStyle::Dark => Tint::new(0, 0, 0, 0.45),
        }
    }
}

/// An RGB color with an opacity, composited over blurred pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
    /// Opacity (0.0 to 1.0); 0 leaves pixels untouched
    pub alpha: f32,
}

impl Tint {
    /// Create a new tint. Opacity is clamped to [0, 1].
    pub fn new(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self {
            r,
            g,
            b,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// This tint with its opacity scaled by `factor`.
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            alpha: (self.alpha * factor).clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Configuration for a blur overlay.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayConfig {
    /// Number of rendition steps per capture (minimum 1)
    pub ladder_steps: usize,
    /// Gaussian sigma at blur intensity 1.0
    pub max_sigma: f32,
    /// Initial blur style
    pub style: BlurStyle,
    /// Initial blur level (0.0 = no blur, 1.0 = full blur)
    pub level: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            ladder_steps: DEFAULT_LADDER_STEPS,
            max_sigma: DEFAULT_MAX_SIGMA,
            style: BlurStyle::default(),
            level: DEFAULT_BLUR_LEVEL,
        }
    }
}

impl OverlayConfig {
    /// Create a new OverlayConfig with default values
    pub fn new() -> Self {
        Self::default()
    }
}
