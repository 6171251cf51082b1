//! Easing curves for blur animations.
//!
//! Every curve maps normalized progress in [0, 1] to normalized output in
//! [0, 1], starts at exactly 0, ends at exactly 1, and never decreases in
//! between. The animator feeds the eased value straight into the blend, so
//! those endpoint guarantees are what make animations land bit-exact on
//! their targets.

use serde::{Deserialize, Serialize};

/// Pacing of an animated blur transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationCurve {
    /// Start slowly, accelerate through the middle, slow again at the end
    #[default]
    EaseInOut,
    /// Start slowly, then speed up toward the end
    EaseIn,
    /// Start quickly, then slow toward the end
    EaseOut,
    /// Even pace over the whole duration
    Linear,
}

impl AnimationCurve {
    /// Evaluate the curve at `progress`.
    ///
    /// # Arguments
    /// * `progress` - Normalized elapsed time, clamped to [0, 1]
    ///
    /// # Returns
    /// The eased value in [0, 1]
    #[inline]
    pub fn evaluate(self, progress: f32) -> f32 {
        let t = progress.clamp(0.0, 1.0);
        match self {
            AnimationCurve::EaseInOut => t * t * (3.0 - 2.0 * t),
            AnimationCurve::EaseIn => t * t,
            AnimationCurve::EaseOut => t * (2.0 - t),
            AnimationCurve::Linear => t,
        }
    }
}
