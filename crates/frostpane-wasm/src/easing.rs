//! Easing curve WASM bindings.
//!
//! Lets the web UI preview animation pacing without running an animation,
//! for example to draw the curve behind a duration control.

use wasm_bindgen::prelude::*;

use crate::types::curve_from_u8;

/// Evaluate an easing curve at a single point.
///
/// # Arguments
/// * `curve` - 0 = EaseInOut, 1 = EaseIn, 2 = EaseOut, 3 = Linear
/// * `progress` - Normalized elapsed time, clamped to [0, 1]
///
/// # Returns
/// The eased value in [0, 1]
#[wasm_bindgen]
pub fn evaluate_curve(curve: u8, progress: f32) -> f32 {
    curve_from_u8(curve).evaluate(progress)
}

/// Sample an easing curve at evenly spaced points.
///
/// Returns `count` outputs covering progress 0.0 through 1.0 inclusive, for
/// drawing curve previews. Counts below 2 are raised to 2.
///
/// # Example (TypeScript)
/// ```typescript
/// const samples = curve_samples(0, 64);
/// ctx.beginPath();
/// samples.forEach((y, i) => {
///   ctx.lineTo((i / 63) * w, (1 - y) * h);
/// });
/// ctx.stroke();
/// ```
#[wasm_bindgen]
pub fn curve_samples(curve: u8, count: u32) -> Vec<f32> {
    let curve = curve_from_u8(curve);
    let count = count.max(2) as usize;
    (0..count)
        .map(|i| curve.evaluate(i as f32 / (count - 1) as f32))
        .collect()
}
