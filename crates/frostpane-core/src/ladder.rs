//! Precomputed blur renditions.
//!
//! A [`RenditionLadder`] holds N renditions of one capture, blurred at
//! evenly spaced intensities from 0 (untouched) to 1 (full sigma, full
//! tint). The blur filter runs exactly once per step when the ladder is
//! built; after that, any intermediate intensity is reached by blending the
//! two steps bracketing it, so animating the blur level never re-runs the
//! filter.

use crate::capture::{Capture, RasterImage};
use crate::filter::{BlurFilter, FilterError};
use crate::BlurStyle;

/// The pair of ladder steps bracketing an intensity, with the blend
/// fraction between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Index of the lower step
    pub lo: usize,
    /// Index of the upper step
    pub hi: usize,
    /// Blend fraction (0.0 = all `lo`, 1.0 = all `hi`)
    pub t: f32,
}

/// A capture plus the blur renditions derived from it.
pub struct RenditionLadder {
    capture: Capture,
    style: BlurStyle,
    steps: Vec<RasterImage>,
}

impl RenditionLadder {
    /// Build a ladder from a capture.
    ///
    /// Runs `filter` once per step, at sigma `intensity * max_sigma` and
    /// with the style tint scaled by the step intensity. Fails only if the
    /// filter fails, in which case the capture is dropped along with any
    /// partial work.
    ///
    /// # Arguments
    /// * `capture` - The background snapshot the ladder renders
    /// * `style` - Visual style applied to every blurred step
    /// * `filter` - Blur backend
    /// * `steps` - Number of renditions (values below 1 are raised to 1)
    /// * `max_sigma` - Gaussian sigma at intensity 1.0
    pub fn build<F: BlurFilter>(
        capture: Capture,
        style: BlurStyle,
        filter: &F,
        steps: usize,
        max_sigma: f32,
    ) -> Result<Self, FilterError> {
        let count = steps.max(1);
        let mut images = Vec::with_capacity(count);
        for index in 0..count {
            let intensity = step_intensity(index, count);
            let tint = style.tint().scaled(intensity);
            images.push(filter.blur(&capture.image, intensity * max_sigma, tint)?);
        }
        Ok(Self {
            capture,
            style,
            steps: images,
        })
    }

    /// The capture this ladder was built from.
    pub fn capture(&self) -> &Capture {
        &self.capture
    }

    /// The style the renditions were tinted with.
    pub fn style(&self) -> BlurStyle {
        self.style
    }

    /// Number of renditions.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// The rendition at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn step(&self, index: usize) -> &RasterImage {
        &self.steps[index]
    }

    /// Blur intensity represented by the rendition at `index`.
    pub fn intensity_of(&self, index: usize) -> f32 {
        step_intensity(index, self.steps.len())
    }

    /// The two steps bracketing `intensity` and the blend fraction between
    /// them. Intensity is clamped to [0, 1]; NaN is treated as 0.
    pub fn bracket(&self, intensity: f32) -> Bracket {
        let count = self.steps.len();
        if count == 1 {
            return Bracket {
                lo: 0,
                hi: 0,
                t: 0.0,
            };
        }

        let intensity = if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, 1.0)
        };
        let position = intensity * (count - 1) as f32;
        let lo = (position.floor() as usize).min(count - 2);
        Bracket {
            lo,
            hi: lo + 1,
            t: position - lo as f32,
        }
    }
}

/// Intensity of step `index` in a ladder of `count` steps.
///
/// Steps are spaced uniformly; a single-step ladder is fully blurred.
#[inline]
fn step_intensity(index: usize, count: usize) -> f32 {
    if count <= 1 {
        1.0
    } else {
        index as f32 / (count - 1) as f32
    }
}
