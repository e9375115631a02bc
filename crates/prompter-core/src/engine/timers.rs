//! L4 Atomic Layer: repeating timers cancellable by handle
//!
//! The host loop asks for `next_deadline()` to bound its poll timeout and
//! collects fired handles with `due(now)`.

use std::time::Duration;

/// Handle to a scheduled repeating task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Entry {
    handle: TimerHandle,
    interval: Duration,
    next_due: Duration,
}

/// Set of repeating timers
#[derive(Debug, Default)]
pub struct Timers {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task repeating every `interval`, first firing at `now + interval`
    pub fn schedule(&mut self, interval: Duration, now: Duration) -> TimerHandle {
        // a zero interval would fire on every poll forever
        let interval = interval.max(Duration::from_millis(1));
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.entries.push(Entry {
            handle,
            interval,
            next_due: now + interval,
        });
        handle
    }

    /// Cancel a timer. Cancelling an unknown or already cancelled handle is a no-op.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        before != self.entries.len()
    }

    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Number of live timers
    pub fn live(&self) -> usize {
        self.entries.len()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.next_due).min()
    }

    /// Handles whose deadline has passed, each reported once.
    ///
    /// A timer that fell behind by several intervals fires once and is
    /// rescheduled one interval after `now`.
    pub fn due(&mut self, now: Duration) -> Vec<TimerHandle> {
        let mut fired = Vec::new();
        for entry in &mut self.entries {
            if entry.next_due <= now {
                fired.push(entry.handle);
                entry.next_due += entry.interval;
                if entry.next_due <= now {
                    entry.next_due = now + entry.interval;
                }
            }
        }
        fired
    }
}
