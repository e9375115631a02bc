//! L3 Molecular Layer: periodic progress readout while playing

use std::time::Duration;

use tracing::debug;

use super::animation::Animation;
use super::timers::{TimerHandle, Timers};
use super::timing::{as_millis_f64, fraction};

/// One readout of playback position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    pub elapsed_ms: f64,
    pub total_ms: f64,
    pub progress: f64,
}

/// Read elapsed and total time from an animation.
///
/// `None` when there is no animation, it has been cancelled, or its duration is zero.
pub fn sample(anim: Option<&Animation>) -> Option<ProgressSample> {
    let anim = anim?;
    let elapsed = anim.current_time()?;
    let total = anim.duration();
    let progress = fraction(elapsed, total)?;
    Some(ProgressSample {
        elapsed_ms: as_millis_f64(elapsed),
        total_ms: as_millis_f64(total),
        progress,
    })
}

/// Owns the single sampling timer
#[derive(Debug)]
pub struct ProgressSampler {
    interval: Duration,
    timer: Option<TimerHandle>,
}

impl ProgressSampler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            timer: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    /// True when `handle` is the sampler's live timer
    pub fn owns(&self, handle: TimerHandle) -> bool {
        self.timer == Some(handle)
    }

    /// Re-evaluate after an input change: cancel the running timer, then
    /// start a new one only if an animation is present and playing.
    pub fn sync(&mut self, timers: &mut Timers, has_animation: bool, playing: bool, now: Duration) {
        self.stop(timers);
        if has_animation && playing {
            self.timer = Some(timers.schedule(self.interval, now));
            debug!(interval = ?self.interval, "Started progress sampling");
        }
    }

    /// Cancel the timer. Idempotent.
    pub fn stop(&mut self, timers: &mut Timers) {
        if let Some(handle) = self.timer.take() {
            timers.cancel(handle);
            debug!("Stopped progress sampling");
        }
    }
}
