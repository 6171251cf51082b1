//! Frame compositing.
//!
//! Turns a ladder plus a blur intensity into the image to display. An
//! intensity between two ladder steps costs one pixel-wise blend of the
//! bracketing renditions; exact steps and the endpoints come back as plain
//! copies of the stored rendition.

use crate::capture::RasterImage;
use crate::ladder::RenditionLadder;

/// The image to display for `intensity`.
///
/// Intensity is clamped to [0, 1]. Endpoints and exact ladder steps return
/// a copy of the stored rendition, bit-identical to what the ladder build
/// produced. Sampling never mutates the ladder, so repeated calls with the
/// same intensity give identical output.
pub fn sample(ladder: &RenditionLadder, intensity: f32) -> RasterImage {
    let bracket = ladder.bracket(intensity);
    if bracket.t <= 0.0 {
        return ladder.step(bracket.lo).clone();
    }
    if bracket.t >= 1.0 {
        return ladder.step(bracket.hi).clone();
    }
    blend_images(ladder.step(bracket.lo), ladder.step(bracket.hi), bracket.t)
}

/// Pixel-wise convex blend of two equally sized images.
///
/// Each output byte is `a * (1 - t) + b * t`, rounded. `t` is clamped to
/// [0, 1], so no output byte can leave the range its two inputs span.
pub fn blend_images(a: &RasterImage, b: &RasterImage, t: f32) -> RasterImage {
    debug_assert_eq!(
        (a.width, a.height),
        (b.width, b.height),
        "Blend size mismatch"
    );

    let t = t.clamp(0.0, 1.0);
    let inverse = 1.0 - t;
    let pixels = a
        .pixels
        .iter()
        .zip(&b.pixels)
        .map(|(&pa, &pb)| (pa as f32 * inverse + pb as f32 * t).round() as u8)
        .collect();
    RasterImage::new(a.width, a.height, pixels)
}
