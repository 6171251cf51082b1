//! Blur filtering.
//!
//! [`BlurFilter`] is the seam between the engine and whatever actually
//! blurs pixels. The bundled [`GaussianBlurFilter`] runs on the CPU via the
//! `image` crate; hosts with a faster path (GPU, platform effect) implement
//! the trait themselves and the rest of the engine never knows.

use image::imageops;
use thiserror::Error;

use crate::capture::RasterImage;
use crate::Tint;

/// Error types for blur filtering
#[derive(Debug, Error)]
pub enum FilterError {
    /// The source image has no pixels
    #[error("source image is empty")]
    EmptySource,

    /// The filter backend failed
    #[error("blur backend failed: {0}")]
    Backend(String),
}

/// Blur backend invoked once per ladder step.
///
/// `sigma` is the Gaussian radius for the step and `tint` the style tint to
/// composite over the result, already scaled for the step. Implementations
/// are free to use any backend as long as a sigma of zero returns the source
/// unchanged apart from the tint.
pub trait BlurFilter {
    /// Blur `source` by `sigma`, then composite `tint` over the result.
    fn blur(
        &self,
        source: &RasterImage,
        sigma: f32,
        tint: Tint,
    ) -> Result<RasterImage, FilterError>;
}

/// CPU Gaussian blur backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianBlurFilter;

impl BlurFilter for GaussianBlurFilter {
    fn blur(
        &self,
        source: &RasterImage,
        sigma: f32,
        tint: Tint,
    ) -> Result<RasterImage, FilterError> {
        if source.is_empty() {
            return Err(FilterError::EmptySource);
        }

        let mut output = if sigma.is_finite() && sigma > 0.0 {
            let buffer = source.to_rgb_image().ok_or_else(|| {
                FilterError::Backend("pixel buffer does not match dimensions".to_string())
            })?;
            RasterImage::from_rgb_image(imageops::blur(&buffer, sigma))
        } else {
            // imageops::blur substitutes sigma 1.0 for non-positive values;
            // zero blur must be an exact copy of the source.
            source.clone()
        };

        apply_tint(&mut output.pixels, tint);
        Ok(output)
    }
}

/// Composite a tint over RGB pixels in place.
///
/// Plain source-over with a constant opacity; a zero-opacity tint is a no-op.
pub fn apply_tint(pixels: &mut [u8], tint: Tint) {
    if tint.alpha <= 0.0 {
        return;
    }

    let alpha = tint.alpha.clamp(0.0, 1.0);
    let inverse = 1.0 - alpha;
    let r = tint.r as f32 * alpha;
    let g = tint.g as f32 * alpha;
    let b = tint.b as f32 * alpha;

    for pixel in pixels.chunks_exact_mut(3) {
        pixel[0] = (pixel[0] as f32 * inverse + r).round() as u8;
        pixel[1] = (pixel[1] as f32 * inverse + g).round() as u8;
        pixel[2] = (pixel[2] as f32 * inverse + b).round() as u8;
    }
}
