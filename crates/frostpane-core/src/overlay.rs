//! The overlay controller.
//!
//! [`BlurOverlay`] ties the engine together: it pulls background captures
//! from the host, keeps the rendition ladder current, drives the animator
//! from host ticks, and hands back the composited frame. Hosts call
//! [`BlurOverlay::tick`] from whatever frame callback they have
//! (requestAnimationFrame, a compositor vsync, a game loop) and redraw
//! [`BlurOverlay::frame`] whenever a call reports a change.

use log::{debug, warn};

use crate::animator::{BlurAnimator, CompletionHandler};
use crate::capture::{Capture, CaptureSource, RasterImage};
use crate::compositor;
use crate::easing::AnimationCurve;
use crate::filter::{BlurFilter, GaussianBlurFilter};
use crate::ladder::RenditionLadder;
use crate::{BlurStyle, OverlayConfig};

/// Host surface notifications that require a background refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The overlay was attached to a surface
    Attached,
    /// The overlay's position or size changed
    FrameChanged,
}

/// An animatable blurred overlay over host content.
///
/// Generic over the capture source `S` and the blur backend `F` so hosts
/// can plug in their own; the default backend is the CPU Gaussian filter.
pub struct BlurOverlay<S, F = GaussianBlurFilter> {
    source: S,
    filter: F,
    config: OverlayConfig,
    style: BlurStyle,
    animator: BlurAnimator,
    ladder: Option<RenditionLadder>,
    frame: Option<RasterImage>,
    frame_time: f64,
}

impl<S: CaptureSource> BlurOverlay<S> {
    /// Create an overlay with the default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, OverlayConfig::default())
    }

    /// Create an overlay with a custom configuration.
    pub fn with_config(source: S, config: OverlayConfig) -> Self {
        Self::with_filter(source, GaussianBlurFilter, config)
    }
}

impl<S: CaptureSource, F: BlurFilter> BlurOverlay<S, F> {
    /// Create an overlay with a custom blur backend.
    pub fn with_filter(source: S, filter: F, config: OverlayConfig) -> Self {
        Self {
            style: config.style,
            animator: BlurAnimator::new(config.level),
            source,
            filter,
            config,
            ladder: None,
            frame: None,
            frame_time: 0.0,
        }
    }

    /// The current composited frame, if a capture has succeeded.
    pub fn frame(&self) -> Option<&RasterImage> {
        self.frame.as_ref()
    }

    /// The blur level currently displayed.
    pub fn level(&self) -> f32 {
        self.animator.displayed()
    }

    /// The current blur style.
    pub fn style(&self) -> BlurStyle {
        self.style
    }

    /// The configuration the overlay was created with.
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Scale of the capture behind the current renditions (raster pixels
    /// per logical point), once a capture has succeeded.
    pub fn capture_scale(&self) -> Option<f32> {
        self.ladder.as_ref().map(|ladder| ladder.capture().scale)
    }

    /// Whether a blur animation is pending or in flight.
    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// Set the blur level directly (clamped to [0, 1]).
    ///
    /// Supersedes any animation in flight. Setting the level already
    /// displayed changes nothing.
    pub fn set_level(&mut self, level: f32) {
        if self.animator.set(level) {
            self.recomposite();
        }
    }

    /// Switch the blur style.
    ///
    /// Rebuilds the renditions from the retained capture, without asking
    /// the host for a new snapshot. Setting the current style is a no-op.
    pub fn set_style(&mut self, style: BlurStyle) {
        if style == self.style {
            return;
        }
        self.style = style;

        let retained = self.ladder.as_ref().map(|l| l.capture().clone());
        if let Some(capture) = retained {
            self.rebuild(capture);
        }
    }

    /// Animate the blur level toward `level`.
    ///
    /// The motion is anchored at the timestamp of the last tick. A zero
    /// `duration` applies the level synchronously; the completion handler
    /// still waits for the next tick. An animation already in flight is
    /// superseded and its handler fires with `false` first.
    ///
    /// # Arguments
    /// * `level` - Target blur level, clamped to [0, 1]
    /// * `duration` - Animation length in seconds
    /// * `delay` - Seconds to wait before the motion starts
    /// * `curve` - Easing curve
    /// * `completion` - Optional one-shot completion handler
    pub fn animate_to(
        &mut self,
        level: f32,
        duration: f64,
        delay: f64,
        curve: AnimationCurve,
        completion: Option<CompletionHandler>,
    ) {
        if self
            .animator
            .animate_to(level, duration, delay, curve, completion, self.frame_time)
        {
            self.recomposite();
        }
    }

    /// Capture a fresh background and rebuild the renditions.
    ///
    /// A capture failure or an empty capture is a no-op: the previous
    /// renditions and frame stay displayed.
    pub fn refresh_background(&mut self) {
        let capture = match self.source.capture() {
            Ok(capture) => capture,
            Err(err) => {
                debug!("background refresh skipped: {err}");
                return;
            }
        };
        if capture.image.is_empty() {
            debug!("background refresh skipped: empty capture");
            return;
        }
        self.rebuild(capture);
    }

    /// React to a host surface notification.
    pub fn handle_surface_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Attached | SurfaceEvent::FrameChanged => self.refresh_background(),
        }
    }

    /// Advance animations to `now` (seconds on the host's monotonic clock).
    ///
    /// # Returns
    /// `true` when the displayed frame changed and should be redrawn
    pub fn tick(&mut self, now: f64) -> bool {
        self.frame_time = now;
        if self.animator.tick(now) {
            self.recomposite();
            return self.frame.is_some();
        }
        false
    }

    /// Build a ladder from `capture` and commit it together with a fresh
    /// frame. On filter failure the previous ladder stays in place.
    fn rebuild(&mut self, capture: Capture) {
        match RenditionLadder::build(
            capture,
            self.style,
            &self.filter,
            self.config.ladder_steps,
            self.config.max_sigma,
        ) {
            Ok(ladder) => {
                debug!(
                    "rebuilt {} blur renditions for {}x{} capture",
                    ladder.step_count(),
                    ladder.capture().image.width,
                    ladder.capture().image.height
                );
                self.ladder = Some(ladder);
                self.recomposite();
            }
            Err(err) => {
                warn!("blur rebuild failed, keeping previous renditions: {err}");
            }
        }
    }

    fn recomposite(&mut self) {
        if let Some(ladder) = &self.ladder {
            self.frame = Some(compositor::sample(ladder, self.animator.displayed()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureError;
    use crate::filter::FilterError;
    use crate::Tint;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn gradient_capture(width: u32, height: u32) -> Capture {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 3);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x * 40 % 256) as u8);
                pixels.push((y * 40 % 256) as u8);
                pixels.push(100);
            }
        }
        Capture::new(RasterImage::new(width, height, pixels), 1.0)
    }

    struct TestSource {
        capture: Rc<RefCell<Capture>>,
        calls: Rc<Cell<usize>>,
        fail: Rc<Cell<bool>>,
    }

    impl TestSource {
        fn new(capture: Capture) -> Self {
            Self {
                capture: Rc::new(RefCell::new(capture)),
                calls: Rc::new(Cell::new(0)),
                fail: Rc::new(Cell::new(false)),
            }
        }
    }

    impl CaptureSource for TestSource {
        fn capture(&mut self) -> Result<Capture, CaptureError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(CaptureError::Detached);
            }
            Ok(self.capture.borrow().clone())
        }
    }

    /// Fills the output with a shade derived from sigma, ignoring the
    /// source pixels and tint, and optionally counts or fails
    struct TestFilter {
        calls: Rc<Cell<usize>>,
        fail: Rc<Cell<bool>>,
    }

    impl TestFilter {
        fn new() -> Self {
            Self {
                calls: Rc::new(Cell::new(0)),
                fail: Rc::new(Cell::new(false)),
            }
        }
    }

    impl BlurFilter for TestFilter {
        fn blur(
            &self,
            source: &RasterImage,
            sigma: f32,
            _tint: Tint,
        ) -> Result<RasterImage, FilterError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(FilterError::Backend("boom".to_string()));
            }
            let shade = (sigma * 10.0).round() as u8;
            Ok(RasterImage::new(
                source.width,
                source.height,
                vec![shade; source.pixels.len()],
            ))
        }
    }

    /// Overlay over a 4x4 gradient with the shade test filter: five steps
    /// whose pixels are the uniform shades 0, 20, 40, 60, 80
    fn shade_overlay() -> (BlurOverlay<TestSource, TestFilter>, Rc<Cell<usize>>) {
        let config = OverlayConfig {
            max_sigma: 8.0,
            ..OverlayConfig::default()
        };
        let filter = TestFilter::new();
        let filter_calls = Rc::clone(&filter.calls);
        let overlay =
            BlurOverlay::with_filter(TestSource::new(gradient_capture(4, 4)), filter, config);
        (overlay, filter_calls)
    }

    fn frame_shade(overlay: &BlurOverlay<TestSource, TestFilter>) -> u8 {
        overlay.frame().unwrap().pixels[0]
    }

    #[test]
    fn test_initial_state() {
        let (overlay, _) = shade_overlay();
        assert!(overlay.frame().is_none());
        assert_eq!(overlay.level(), 1.0);
        assert_eq!(overlay.style(), BlurStyle::Light);
        assert!(!overlay.is_animating());
    }

    #[test]
    fn test_refresh_builds_frame_at_current_level() {
        let (mut overlay, filter_calls) = shade_overlay();
        overlay.refresh_background();

        // Default level 1.0 shows the fully blurred step
        assert_eq!(frame_shade(&overlay), 80);
        assert_eq!(filter_calls.get(), 5);
    }

    #[test]
    fn test_refresh_failure_before_first_capture() {
        let source = TestSource::new(gradient_capture(4, 4));
        source.fail.set(true);
        let mut overlay =
            BlurOverlay::with_filter(source, TestFilter::new(), OverlayConfig::default());

        overlay.refresh_background();
        assert!(overlay.frame().is_none());
    }

    #[test]
    fn test_refresh_failure_keeps_previous_frame() {
        let source = TestSource::new(gradient_capture(4, 4));
        let fail = Rc::clone(&source.fail);
        let mut overlay = BlurOverlay::with_filter(
            source,
            TestFilter::new(),
            OverlayConfig {
                max_sigma: 8.0,
                ..OverlayConfig::default()
            },
        );

        overlay.refresh_background();
        let before = overlay.frame().unwrap().pixels.clone();

        fail.set(true);
        overlay.refresh_background();
        assert_eq!(overlay.frame().unwrap().pixels, before);
    }

    #[test]
    fn test_empty_capture_is_skipped() {
        let source = TestSource::new(Capture::new(RasterImage::new(0, 0, vec![]), 1.0));
        let mut overlay =
            BlurOverlay::with_filter(source, TestFilter::new(), OverlayConfig::default());

        overlay.refresh_background();
        assert!(overlay.frame().is_none());
    }

    #[test]
    fn test_filter_failure_keeps_previous_ladder() {
        let (mut overlay, _) = shade_overlay();
        overlay.refresh_background();
        let before = overlay.frame().unwrap().pixels.clone();

        overlay.filter.fail.set(true);
        overlay.refresh_background();
        assert_eq!(overlay.frame().unwrap().pixels, before);

        // A later level change still works against the old ladder
        overlay.set_level(0.5);
        assert_eq!(frame_shade(&overlay), 40);
    }

    #[test]
    fn test_set_level_resamples() {
        let (mut overlay, _) = shade_overlay();
        overlay.refresh_background();

        overlay.set_level(0.5);
        assert_eq!(overlay.level(), 0.5);
        assert_eq!(frame_shade(&overlay), 40);

        // Halfway between steps 0 and 1
        overlay.set_level(0.125);
        assert_eq!(frame_shade(&overlay), 10);
    }

    #[test]
    fn test_set_level_clamps() {
        let (mut overlay, _) = shade_overlay();
        overlay.set_level(5.0);
        assert_eq!(overlay.level(), 1.0);
        overlay.set_level(-2.0);
        assert_eq!(overlay.level(), 0.0);
    }

    #[test]
    fn test_set_level_idempotent_no_filter_reruns() {
        let (mut overlay, filter_calls) = shade_overlay();
        overlay.refresh_background();
        assert_eq!(filter_calls.get(), 5);

        overlay.set_level(0.3);
        let first = overlay.frame().unwrap().pixels.clone();
        overlay.set_level(0.3);

        assert_eq!(overlay.frame().unwrap().pixels, first);
        assert_eq!(filter_calls.get(), 5, "level changes must not re-run the filter");
    }

    #[test]
    fn test_set_style_rebuilds_from_retained_capture() {
        let (mut overlay, filter_calls) = shade_overlay();
        let source_calls = Rc::clone(&overlay.source.calls);
        overlay.refresh_background();
        assert_eq!(source_calls.get(), 1);
        assert_eq!(filter_calls.get(), 5);

        overlay.set_style(BlurStyle::Dark);

        assert_eq!(overlay.style(), BlurStyle::Dark);
        assert_eq!(source_calls.get(), 1, "style change must not recapture");
        assert_eq!(filter_calls.get(), 10, "style change rebuilds every step");
    }

    #[test]
    fn test_set_style_same_style_noop() {
        let (mut overlay, filter_calls) = shade_overlay();
        overlay.refresh_background();

        overlay.set_style(BlurStyle::Light);
        assert_eq!(filter_calls.get(), 5);
    }

    #[test]
    fn test_set_style_changes_pixels() {
        let mut overlay = BlurOverlay::new(TestSource::new(gradient_capture(4, 4)));
        overlay.refresh_background();
        let light_sum: u32 = overlay
            .frame()
            .unwrap()
            .pixels
            .iter()
            .map(|&p| p as u32)
            .sum();

        overlay.set_style(BlurStyle::Dark);
        let dark_sum: u32 = overlay
            .frame()
            .unwrap()
            .pixels
            .iter()
            .map(|&p| p as u32)
            .sum();

        assert!(light_sum > dark_sum);
    }

    #[test]
    fn test_animation_scenario() {
        let (mut overlay, _) = shade_overlay();
        overlay.refresh_background();
        assert_eq!(frame_shade(&overlay), 80);

        overlay.animate_to(0.0, 1.0, 0.0, AnimationCurve::Linear, None);
        assert!(overlay.is_animating());

        assert!(overlay.tick(0.5));
        assert_eq!(overlay.level(), 0.5);
        assert_eq!(frame_shade(&overlay), 40);

        assert!(overlay.tick(1.0));
        assert_eq!(overlay.level(), 0.0);
        assert_eq!(frame_shade(&overlay), 0);
        assert!(!overlay.is_animating());
    }

    #[test]
    fn test_animation_anchors_to_last_tick() {
        let (mut overlay, _) = shade_overlay();
        overlay.refresh_background();
        overlay.set_level(0.0);

        overlay.tick(100.0);
        overlay.animate_to(1.0, 1.0, 0.0, AnimationCurve::Linear, None);

        overlay.tick(100.5);
        assert_eq!(overlay.level(), 0.5);
    }

    #[test]
    fn test_refresh_during_animation_keeps_level() {
        let (mut overlay, _) = shade_overlay();
        overlay.refresh_background();
        overlay.animate_to(0.0, 1.0, 0.0, AnimationCurve::Linear, None);
        overlay.tick(0.5);

        // The background changes size mid-animation
        *overlay.source.capture.borrow_mut() = gradient_capture(6, 2);
        overlay.refresh_background();

        assert_eq!(overlay.level(), 0.5);
        assert!(overlay.is_animating());
        let frame = overlay.frame().unwrap();
        assert_eq!((frame.width, frame.height), (6, 2));
    }

    #[test]
    fn test_capture_scale_exposed() {
        let capture = Capture::new(gradient_capture(4, 4).image, 2.0);
        let mut overlay = BlurOverlay::with_filter(
            TestSource::new(capture),
            TestFilter::new(),
            OverlayConfig::default(),
        );

        assert_eq!(overlay.capture_scale(), None);
        overlay.refresh_background();
        assert_eq!(overlay.capture_scale(), Some(2.0));
    }

    #[test]
    fn test_surface_events_trigger_refresh() {
        let (mut overlay, _) = shade_overlay();
        let source_calls = Rc::clone(&overlay.source.calls);

        overlay.handle_surface_event(SurfaceEvent::Attached);
        overlay.handle_surface_event(SurfaceEvent::FrameChanged);
        assert_eq!(source_calls.get(), 2);
    }

    #[test]
    fn test_zero_duration_updates_frame_immediately() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_handle = Rc::clone(&log);

        let (mut overlay, _) = shade_overlay();
        overlay.refresh_background();
        overlay.animate_to(
            0.5,
            0.0,
            0.0,
            AnimationCurve::Linear,
            Some(Box::new(move |finished| log_handle.borrow_mut().push(finished))),
        );

        assert_eq!(overlay.level(), 0.5);
        assert_eq!(frame_shade(&overlay), 40);
        assert!(log.borrow().is_empty(), "completion must wait for a tick");

        overlay.tick(0.016);
        assert_eq!(*log.borrow(), vec![true]);
    }

    #[test]
    fn test_preemption_through_controller() {
        let log: Rc<RefCell<Vec<(&str, bool)>>> = Rc::new(RefCell::new(Vec::new()));
        let (mut overlay, _) = shade_overlay();
        overlay.refresh_background();

        let log_a = Rc::clone(&log);
        overlay.animate_to(
            0.0,
            1.0,
            0.0,
            AnimationCurve::Linear,
            Some(Box::new(move |finished| log_a.borrow_mut().push(("a", finished)))),
        );
        overlay.tick(0.25);

        let log_b = Rc::clone(&log);
        overlay.animate_to(
            1.0,
            0.5,
            0.0,
            AnimationCurve::Linear,
            Some(Box::new(move |finished| log_b.borrow_mut().push(("b", finished)))),
        );
        assert_eq!(*log.borrow(), vec![("a", false)]);

        overlay.tick(2.0);
        assert_eq!(*log.borrow(), vec![("a", false), ("b", true)]);
    }

    #[test]
    fn test_completion_dropped_on_teardown() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_handle = Rc::clone(&log);

        let (mut overlay, _) = shade_overlay();
        overlay.refresh_background();
        overlay.animate_to(
            0.0,
            1.0,
            0.0,
            AnimationCurve::Linear,
            Some(Box::new(move |finished| log_handle.borrow_mut().push(finished))),
        );
        overlay.tick(0.5);

        drop(overlay);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_tick_without_capture_reports_no_change() {
        let (mut overlay, _) = shade_overlay();
        overlay.animate_to(0.0, 1.0, 0.0, AnimationCurve::Linear, None);

        // The level moves, but there is nothing to draw yet
        assert!(!overlay.tick(0.5));
        assert!(overlay.frame().is_none());
        assert_eq!(overlay.level(), 0.5);
    }

    #[test]
    fn test_custom_config() {
        let config = OverlayConfig {
            ladder_steps: 3,
            max_sigma: 4.0,
            style: BlurStyle::Dark,
            level: 0.25,
        };
        let mut overlay = BlurOverlay::with_filter(
            TestSource::new(gradient_capture(4, 4)),
            TestFilter::new(),
            config,
        );

        assert_eq!(overlay.level(), 0.25);
        assert_eq!(overlay.style(), BlurStyle::Dark);
        assert_eq!(overlay.config().ladder_steps, 3);

        overlay.refresh_background();
        // Steps are shades 0, 20, 40; level 0.25 is halfway to step 1
        assert_eq!(frame_shade(&overlay), 10);
    }
}
