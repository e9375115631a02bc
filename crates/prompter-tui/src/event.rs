use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};

/// Event handler for terminal events
#[derive(Debug, Clone, Copy)]
pub struct EventHandler {
    tick_rate: Duration,
    /// Frame interval while the prompter is moving
    animation_tick: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self::with_animation_fps(tick_rate_ms, 0)
    }

    /// Create with a frame rate used while playback is running
    pub fn with_animation_fps(tick_rate_ms: u64, fps: u32) -> Self {
        let tick_rate = Duration::from_millis(tick_rate_ms.max(1));
        let animation_tick = if fps == 0 {
            tick_rate
        } else {
            Duration::from_millis((1000 / fps as u64).max(1))
        };
        Self {
            tick_rate,
            animation_tick,
        }
    }

    /// How long to wait for input before the next tick.
    ///
    /// Runs at the animation rate while playing, and never sleeps past the
    /// engine's next timer deadline.
    pub fn timeout(&self, playing: bool, next_deadline: Option<Duration>) -> Duration {
        let base = if playing {
            self.animation_tick.min(self.tick_rate)
        } else {
            self.tick_rate
        };
        match next_deadline {
            Some(deadline) => base.min(deadline),
            None => base,
        }
    }

    /// Wait up to `timeout` for the next event
    pub fn next(&self, timeout: Duration) -> Result<Option<AppEvent>> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    // (crossterm 0.27+ sends release events on some systems)
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Mouse(mouse) => Ok(Some(AppEvent::Mouse(mouse))),
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                Event::FocusLost => Ok(Some(AppEvent::FocusLost)),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Terminal lost focus
    FocusLost,
    /// Nothing arrived before the timeout
    Tick,
}
