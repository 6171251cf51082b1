//! Time-based blur level animation.
//!
//! [`BlurAnimator`] owns the displayed blur level and moves it toward a
//! target as host ticks arrive. It never schedules anything itself: the
//! host calls [`BlurAnimator::tick`] with its frame timestamps (seconds on
//! a monotonic clock) and the animator does the rest, including firing the
//! one-shot completion handlers.
//!
//! Completion guarantees:
//! - a handler fires at most once, with `true` on natural completion and
//!   `false` when the animation was superseded before finishing
//! - a superseded handler fires before the superseding request is armed
//! - a zero-duration animation applies its level synchronously but parks
//!   its handler until the next tick, so it never runs re-entrantly
//! - handlers still pending when the animator is dropped are discarded

use std::mem;

use crate::easing::AnimationCurve;

/// One-shot handler invoked when an animation ends.
///
/// The flag is `true` when the animation ran to natural completion and
/// `false` when it was superseded by a newer request.
pub type CompletionHandler = Box<dyn FnOnce(bool)>;

/// A request waiting out its delay.
struct PendingAnimation {
    start_at: f64,
    duration: f64,
    target: f32,
    curve: AnimationCurve,
    completion: Option<CompletionHandler>,
}

/// A request actively interpolating toward its target.
struct RunningAnimation {
    start: f64,
    duration: f64,
    from: f32,
    target: f32,
    curve: AnimationCurve,
    completion: Option<CompletionHandler>,
}

enum Phase {
    /// Nothing in flight
    Idle,
    /// Waiting out the request's delay; the displayed level is unchanged
    Delaying(PendingAnimation),
    /// Interpolating between `from` and `target`
    Running(RunningAnimation),
    /// Motion finished synchronously; the completion fires on the next tick
    Completed {
        completion: Option<CompletionHandler>,
    },
}

/// Drives the displayed blur level from host ticks.
pub struct BlurAnimator {
    displayed: f32,
    phase: Phase,
}

impl BlurAnimator {
    /// Create an animator displaying `level` (clamped to [0, 1]).
    pub fn new(level: f32) -> Self {
        Self {
            displayed: sanitize_level(level, 0.0),
            phase: Phase::Idle,
        }
    }

    /// The blur level currently displayed.
    pub fn displayed(&self) -> f32 {
        self.displayed
    }

    /// Whether an animation is pending or in flight.
    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Delaying(_) | Phase::Running(_))
    }

    /// Set the displayed level directly, superseding any animation.
    ///
    /// # Returns
    /// `true` when the displayed level changed
    pub fn set(&mut self, level: f32) -> bool {
        self.supersede();
        let level = sanitize_level(level, self.displayed);
        if level == self.displayed {
            return false;
        }
        self.displayed = level;
        true
    }

    /// Begin animating toward `level`.
    ///
    /// # Arguments
    /// * `level` - Target blur level, clamped to [0, 1] (NaN keeps the
    ///   current level)
    /// * `duration` - Animation length in seconds; zero or negative applies
    ///   the target synchronously
    /// * `delay` - Seconds to wait before the motion starts
    /// * `curve` - Easing curve
    /// * `completion` - Optional one-shot completion handler
    /// * `now` - Current host timestamp in seconds
    ///
    /// # Returns
    /// `true` when the displayed level changed synchronously (the
    /// zero-duration case), meaning the frame should be recomposited
    pub fn animate_to(
        &mut self,
        level: f32,
        duration: f64,
        delay: f64,
        curve: AnimationCurve,
        completion: Option<CompletionHandler>,
        now: f64,
    ) -> bool {
        self.supersede();

        let target = sanitize_level(level, self.displayed);
        let duration = duration.max(0.0);
        let delay = delay.max(0.0);

        if delay > 0.0 {
            self.phase = Phase::Delaying(PendingAnimation {
                start_at: now + delay,
                duration,
                target,
                curve,
                completion,
            });
            return false;
        }

        if duration == 0.0 {
            let changed = target != self.displayed;
            self.displayed = target;
            self.phase = Phase::Completed { completion };
            return changed;
        }

        self.phase = Phase::Running(RunningAnimation {
            start: now,
            duration,
            from: self.displayed,
            target,
            curve,
            completion,
        });
        false
    }

    /// Advance to `now` (seconds, monotonic).
    ///
    /// # Returns
    /// `true` when the displayed level changed
    pub fn tick(&mut self, now: f64) -> bool {
        match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => false,
            Phase::Completed { completion } => {
                if let Some(done) = completion {
                    done(true);
                }
                false
            }
            Phase::Delaying(pending) => {
                if now < pending.start_at {
                    self.phase = Phase::Delaying(pending);
                    return false;
                }
                let running = RunningAnimation {
                    start: pending.start_at,
                    duration: pending.duration,
                    from: self.displayed,
                    target: pending.target,
                    curve: pending.curve,
                    completion: pending.completion,
                };
                self.advance(running, now)
            }
            Phase::Running(running) => self.advance(running, now),
        }
    }

    /// Evaluate a running animation at `now`, completing it when due.
    fn advance(&mut self, mut running: RunningAnimation, now: f64) -> bool {
        let elapsed = now - running.start;
        if running.duration <= 0.0 || elapsed >= running.duration {
            // Snap to the exact target; the eased value carries float error
            let changed = self.displayed != running.target;
            self.displayed = running.target;
            if let Some(done) = running.completion.take() {
                done(true);
            }
            return changed;
        }

        let progress = (elapsed / running.duration).clamp(0.0, 1.0) as f32;
        let eased = running.curve.evaluate(progress);
        let next = running.from + (running.target - running.from) * eased;
        let changed = next != self.displayed;
        self.displayed = next;
        self.phase = Phase::Running(running);
        changed
    }

    /// Resolve the current phase before a new request takes over.
    ///
    /// In-flight animations are cancelled and their completion fires with
    /// `false`; a finished animation still waiting to notify flushes with
    /// `true`. Either way the handler runs before the caller proceeds.
    fn supersede(&mut self) {
        match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => {}
            Phase::Delaying(PendingAnimation { completion, .. })
            | Phase::Running(RunningAnimation { completion, .. }) => {
                if let Some(done) = completion {
                    done(false);
                }
            }
            Phase::Completed { completion } => {
                if let Some(done) = completion {
                    done(true);
                }
            }
        }
    }
}

/// Clamp a requested level to [0, 1], keeping `current` when the value is NaN.
#[inline]
fn sanitize_level(level: f32, current: f32) -> f32 {
    if level.is_nan() {
        current
    } else {
        level.clamp(0.0, 1.0)
    }
}
