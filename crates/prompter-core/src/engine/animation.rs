//! L3 Molecular Layer: the timed interpolation object
//!
//! An [`Animation`] is one run of a linear vertical translation over a fixed
//! duration. It can be played, paused, seeked and cancelled, holds its end
//! position once finished, and reports completion to its finish listeners
//! exactly once per run. Animations are created through a [`Timeline`],
//! which shares the clock and counts how many are live.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use crate::clock::Clock;

use super::timing::{fraction, lerp};

/// Identity of an animation, unique per timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationId(u64);

/// Identity of a finish listener on one animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type FinishListener = Box<dyn FnMut()>;

/// Start and end of the vertical translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframes {
    pub from_y: f64,
    pub to_y: f64,
}

/// Observable playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Paused,
    Running,
    Finished,
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Paused { hold: Duration },
    /// current time = `base + (now - since)`
    Running { since: Duration, base: Duration },
    Cancelled,
}

pub struct Animation {
    id: AnimationId,
    clock: Rc<dyn Clock>,
    keyframes: Keyframes,
    duration: Duration,
    phase: Phase,
    finish_reported: bool,
    listeners: Vec<(ListenerId, FinishListener)>,
    next_listener: u64,
    live: Rc<Cell<usize>>,
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("id", &self.id)
            .field("keyframes", &self.keyframes)
            .field("duration", &self.duration)
            .field("phase", &self.phase)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Animation {
    pub fn id(&self) -> AnimationId {
        self.id
    }

    pub fn keyframes(&self) -> Keyframes {
        self.keyframes
    }

    /// Total duration of the run
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Elapsed time of the run, `None` once cancelled
    pub fn current_time(&self) -> Option<Duration> {
        match self.phase {
            Phase::Paused { hold } => Some(hold),
            Phase::Running { since, base } => {
                let elapsed = base + self.clock.now().saturating_sub(since);
                Some(elapsed.min(self.duration))
            }
            Phase::Cancelled => None,
        }
    }

    pub fn play_state(&self) -> PlayState {
        match self.phase {
            Phase::Cancelled => PlayState::Cancelled,
            _ if self.is_finished() => PlayState::Finished,
            Phase::Paused { .. } => PlayState::Paused,
            Phase::Running { .. } => PlayState::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.phase, Phase::Paused { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.phase, Phase::Cancelled)
    }

    /// True once the current time has reached the end of the run
    pub fn is_finished(&self) -> bool {
        self.current_time()
            .map(|t| t >= self.duration)
            .unwrap_or(false)
    }

    /// Start or resume the run. No-op when already running or cancelled.
    ///
    /// Playing a finished run with a non-zero duration restarts it from the beginning.
    pub fn play(&mut self) {
        let hold = match self.phase {
            Phase::Paused { hold } => hold,
            Phase::Running { .. } | Phase::Cancelled => return,
        };
        let base = if !self.duration.is_zero() && hold >= self.duration {
            self.finish_reported = false;
            Duration::ZERO
        } else {
            hold
        };
        trace!(id = self.id.0, ?base, "animation play");
        self.phase = Phase::Running {
            since: self.clock.now(),
            base,
        };
    }

    /// Hold the current position. No-op when already paused or cancelled.
    pub fn pause(&mut self) {
        if let Phase::Running { .. } = self.phase {
            let hold = self.current_time().unwrap_or_default();
            trace!(id = self.id.0, ?hold, "animation pause");
            self.phase = Phase::Paused { hold };
        }
    }

    /// Move to `elapsed` (clamped to the duration), keeping the play state
    pub fn seek(&mut self, elapsed: Duration) {
        let elapsed = elapsed.min(self.duration);
        match self.phase {
            Phase::Paused { .. } => self.phase = Phase::Paused { hold: elapsed },
            Phase::Running { .. } => {
                self.phase = Phase::Running {
                    since: self.clock.now(),
                    base: elapsed,
                }
            }
            Phase::Cancelled => return,
        }
        if elapsed < self.duration {
            self.finish_reported = false;
        }
    }

    /// Stop the run for good and drop its effect. Idempotent.
    pub fn cancel(&mut self) {
        if !self.is_cancelled() {
            trace!(id = self.id.0, "animation cancel");
            self.phase = Phase::Cancelled;
            self.live.set(self.live.get().saturating_sub(1));
        }
    }

    /// Vertical offset at the current time, `None` once cancelled
    pub fn translate_y(&self) -> Option<f64> {
        let current = self.current_time()?;
        let t = fraction(current, self.duration).unwrap_or(1.0);
        Some(lerp(self.keyframes.from_y, self.keyframes.to_y, t))
    }

    pub fn add_finish_listener(&mut self, listener: FinishListener) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push((id, listener));
        id
    }

    pub fn remove_finish_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        before != self.listeners.len()
    }

    pub fn finish_listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Notify finish listeners if the run has just reached its end.
    ///
    /// Returns true when listeners were notified. Each run reports at most once.
    pub fn poll_finish(&mut self) -> bool {
        if self.finish_reported || !self.is_finished() {
            return false;
        }
        self.finish_reported = true;
        trace!(id = self.id.0, "animation finished");
        for (_, listener) in &mut self.listeners {
            listener();
        }
        true
    }
}

impl Drop for Animation {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Creates animations against a shared clock and tracks the live ones
#[derive(Clone)]
pub struct Timeline {
    clock: Rc<dyn Clock>,
    live: Rc<Cell<usize>>,
    next_id: Rc<Cell<u64>>,
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("live", &self.live.get())
            .finish()
    }
}

impl Timeline {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            live: Rc::new(Cell::new(0)),
            next_id: Rc::new(Cell::new(0)),
        }
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Create a paused animation at time zero
    pub fn animate(&self, keyframes: Keyframes, duration: Duration) -> Animation {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.live.set(self.live.get() + 1);
        Animation {
            id: AnimationId(id),
            clock: Rc::clone(&self.clock),
            keyframes,
            duration,
            phase: Phase::Paused {
                hold: Duration::ZERO,
            },
            finish_reported: false,
            listeners: Vec::new(),
            next_listener: 0,
            live: Rc::clone(&self.live),
        }
    }

    /// Animations created here that are neither cancelled nor dropped
    pub fn live(&self) -> usize {
        self.live.get()
    }
}
