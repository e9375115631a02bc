//! L3 Molecular Layer: creation and replacement of the prompter animation
//!
//! Owns at most one live [`Animation`]. Every replacement cancels the
//! previous run before the new one is built.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::TimingMode;

use super::animation::{Animation, Keyframes, Timeline};

/// Box measurements of the animated element, in rows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxMetrics {
    /// Visible height of the element
    pub client_height: f64,
    /// Full height of the content
    pub scroll_height: f64,
}

impl BoxMetrics {
    pub fn new(client_height: f64, scroll_height: f64) -> Self {
        Self {
            client_height,
            scroll_height,
        }
    }

    /// Content height that does not fit, never negative
    pub fn overflow(&self) -> f64 {
        (self.scroll_height.max(0.0) - self.client_height).max(0.0)
    }
}

/// Translation from the vertical middle of the element up by the content height
pub fn keyframes_for(metrics: &BoxMetrics) -> Keyframes {
    let half = metrics.client_height / 2.0;
    Keyframes {
        from_y: half,
        to_y: half - metrics.scroll_height.max(0.0),
    }
}

/// Run duration for the given measurements.
///
/// Content that fits the element gets a zero duration in every mode.
pub fn run_duration(metrics: &BoxMetrics, timing: TimingMode) -> Duration {
    if metrics.overflow() <= 0.0 {
        return Duration::ZERO;
    }
    match timing {
        TimingMode::Fixed { duration_ms } => Duration::from_millis(duration_ms),
        TimingMode::Speed { lines_per_second } => {
            if !lines_per_second.is_finite() || lines_per_second <= 0.0 {
                warn!(lines_per_second, "Invalid prompter speed, using zero duration");
                return Duration::ZERO;
            }
            match Duration::try_from_secs_f64(metrics.scroll_height / lines_per_second) {
                Ok(duration) => duration,
                Err(_) => {
                    warn!(lines_per_second, "Prompter speed too slow, using zero duration");
                    Duration::ZERO
                }
            }
        }
    }
}

/// Holds the current animation run
#[derive(Debug)]
pub struct AnimationLifecycle {
    timeline: Timeline,
    current: Option<Animation>,
}

impl AnimationLifecycle {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            timeline,
            current: None,
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn current(&self) -> Option<&Animation> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Animation> {
        self.current.as_mut()
    }

    /// Cancel the current run (if any) and build a paused replacement
    pub fn create_or_replace(&mut self, metrics: &BoxMetrics, timing: TimingMode) -> &mut Animation {
        self.dispose();

        let duration = run_duration(metrics, timing);
        let keyframes = keyframes_for(metrics);
        debug!(
            ?duration,
            scroll_height = metrics.scroll_height,
            client_height = metrics.client_height,
            "Creating new animation"
        );
        self.current.insert(self.timeline.animate(keyframes, duration))
    }

    /// Cancel and drop the current run. Idempotent.
    pub fn dispose(&mut self) {
        if let Some(mut anim) = self.current.take() {
            anim.cancel();
        }
    }
}

impl Drop for AnimationLifecycle {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::clock::ManualClock;

    fn lifecycle() -> AnimationLifecycle {
        AnimationLifecycle::new(Timeline::new(Rc::new(ManualClock::new())))
    }

    #[test]
    fn test_keyframes_centre_then_scroll_out() {
        let k = keyframes_for(&BoxMetrics::new(20.0, 100.0));
        assert_eq!(k.from_y, 10.0);
        assert_eq!(k.to_y, -90.0);
    }

    #[test]
    fn test_fixed_duration() {
        let d = run_duration(
            &BoxMetrics::new(20.0, 100.0),
            TimingMode::Fixed { duration_ms: 10_000 },
        );
        assert_eq!(d, Duration::from_millis(10_000));
    }

    #[test]
    fn test_speed_duration() {
        let d = run_duration(
            &BoxMetrics::new(20.0, 100.0),
            TimingMode::Speed { lines_per_second: 2.0 },
        );
        assert_eq!(d, Duration::from_secs(50));
    }

    #[test]
    fn test_content_that_fits_has_zero_duration() {
        for metrics in [BoxMetrics::new(20.0, 20.0), BoxMetrics::new(20.0, 5.0), BoxMetrics::new(20.0, 0.0)] {
            assert_eq!(
                run_duration(&metrics, TimingMode::Fixed { duration_ms: 10_000 }),
                Duration::ZERO
            );
            assert_eq!(
                run_duration(&metrics, TimingMode::Speed { lines_per_second: 1.0 }),
                Duration::ZERO
            );
        }
    }

    #[test]
    fn test_bad_speed_has_zero_duration() {
        let metrics = BoxMetrics::new(20.0, 100.0);
        for speed in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(
                run_duration(&metrics, TimingMode::Speed { lines_per_second: speed }),
                Duration::ZERO
            );
        }
    }

    #[test]
    fn test_tiny_speed_does_not_overflow() {
        let metrics = BoxMetrics::new(20.0, 100.0);
        assert_eq!(
            run_duration(&metrics, TimingMode::Speed { lines_per_second: 1e-19 }),
            Duration::ZERO
        );
        assert_eq!(
            run_duration(&metrics, TimingMode::Speed { lines_per_second: 0.5 }),
            Duration::from_secs(200)
        );
    }

    #[test]
    fn test_replace_cancels_previous_first() {
        let mut lifecycle = lifecycle();
        let metrics = BoxMetrics::new(20.0, 100.0);
        let timing = TimingMode::Fixed { duration_ms: 1000 };

        let first = lifecycle.create_or_replace(&metrics, timing).id();
        assert_eq!(lifecycle.timeline().live(), 1);

        let second = lifecycle.create_or_replace(&metrics, timing);
        assert!(second.is_paused());
        let second = second.id();
        assert_ne!(first, second);
        assert_eq!(lifecycle.timeline().live(), 1);

        lifecycle.dispose();
        lifecycle.dispose();
        assert_eq!(lifecycle.timeline().live(), 0);
        assert!(lifecycle.current().is_none());
    }
}
