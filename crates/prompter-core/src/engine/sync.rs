//! L2 Organism Layer: the progress synchronization engine
//!
//! Wires the lifecycle manager, playback reflector, sampler, restorer,
//! finish notifier, scroll bridge and resize watcher together. Every input
//! change runs the affected rules synchronously, in this order:
//!
//! 1. replace the animation (cancelling the old one first)
//! 2. restore the held progress onto it
//! 3. reflect the playback flag
//! 4. restart the sampler if needed
//! 5. move the finish subscription
//!
//! Progress has one writer at a time: the sampler while playing, the scroll
//! bridge (or an explicit seek) while paused.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::clock::Clock;
use crate::config::{PlaybackConfig, TimingMode};

use super::animation::{Animation, Timeline};
use super::bridge::{progress_from_view, reflect_progress_on_view, ScrollView};
use super::lifecycle::{AnimationLifecycle, BoxMetrics};
use super::notifier::{FinishCallback, FinishNotifier};
use super::playback::{reflect_playback, restore_progress};
use super::resize::ResizeWatcher;
use super::sampler::{sample, ProgressSample, ProgressSampler};
use super::timers::Timers;
use super::timing::{as_millis_f64, clamp};

pub type ProgressCallback = Box<dyn FnMut(ProgressSample)>;

/// Engine settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    pub timing: TimingMode,
    pub sample_interval: Duration,
}

impl EngineOptions {
    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self {
            timing: config.timing_mode(),
            sample_interval: Duration::from_millis(config.sample_interval_ms),
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from_config(&PlaybackConfig::default())
    }
}

/// What happened during one `poll`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// Sampler ticks delivered
    pub ticks: usize,
    /// The current run reached its end during this poll
    pub finished: bool,
}

pub struct ProgressEngine<V: ScrollView> {
    clock: Rc<dyn Clock>,
    lifecycle: AnimationLifecycle,
    timers: Timers,
    sampler: ProgressSampler,
    notifier: FinishNotifier,
    resize: ResizeWatcher,
    element: Option<BoxMetrics>,
    view: Option<V>,
    timing: TimingMode,
    dependencies: Option<u64>,
    playing: bool,
    progress: f64,
    on_progress: Option<ProgressCallback>,
}

impl<V: ScrollView> std::fmt::Debug for ProgressEngine<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressEngine")
            .field("element", &self.element)
            .field("timing", &self.timing)
            .field("playing", &self.playing)
            .field("progress", &self.progress)
            .field("animation", &self.lifecycle.current())
            .field("sampler", &self.sampler)
            .finish()
    }
}

impl<V: ScrollView> ProgressEngine<V> {
    pub fn new(options: EngineOptions, clock: Rc<dyn Clock>) -> Self {
        let timeline = Timeline::new(Rc::clone(&clock));
        Self {
            clock,
            lifecycle: AnimationLifecycle::new(timeline),
            timers: Timers::new(),
            sampler: ProgressSampler::new(options.sample_interval),
            notifier: FinishNotifier::new(),
            resize: ResizeWatcher::new(),
            element: None,
            view: None,
            timing: options.timing,
            dependencies: None,
            playing: false,
            progress: 0.0,
            on_progress: None,
        }
    }

    // ---- lifecycle -------------------------------------------------------

    /// Mount the animated element: first animation plus resize subscription
    pub fn mount(&mut self, metrics: BoxMetrics) {
        debug!(
            client_height = metrics.client_height,
            scroll_height = metrics.scroll_height,
            "Mounting prompter"
        );
        self.resize.observe(metrics);
        self.element = Some(metrics);
        self.recreate();
    }

    /// Tear everything down. Safe to call more than once.
    pub fn unmount(&mut self) {
        self.sampler.stop(&mut self.timers);
        self.notifier.unsubscribe(self.lifecycle.current_mut());
        self.lifecycle.dispose();
        self.resize.disconnect();
        self.element = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.element.is_some()
    }

    /// Size-change notification for the animated element
    pub fn resize(&mut self, metrics: BoxMetrics) {
        if let Some(metrics) = self.resize.notify(metrics) {
            self.element = Some(metrics);
            self.recreate();
        }
    }

    /// Change how the run duration is derived
    pub fn set_timing(&mut self, timing: TimingMode) {
        if self.timing == timing {
            return;
        }
        debug!(?timing, "Timing changed");
        self.timing = timing;
        self.recreate();
    }

    pub fn timing(&self) -> TimingMode {
        self.timing
    }

    /// Watch an opaque set of values (content length, speed, ...). The
    /// animation is rebuilt whenever they change after the first call.
    pub fn watch<H: Hash + ?Sized>(&mut self, dependencies: &H) {
        let mut hasher = DefaultHasher::new();
        dependencies.hash(&mut hasher);
        let fingerprint = hasher.finish();

        match self.dependencies.replace(fingerprint) {
            Some(previous) if previous != fingerprint => {
                debug!("Watched dependencies changed");
                self.recreate();
            }
            _ => {}
        }
    }

    /// Cancel the current run and build a new one for the mounted element
    fn recreate(&mut self) {
        let Some(metrics) = self.element else {
            trace!("No element mounted, skipping animation creation");
            return;
        };

        if self.playing {
            self.capture_progress();
        }
        self.notifier.unsubscribe(self.lifecycle.current_mut());
        self.sampler.stop(&mut self.timers);

        self.lifecycle.create_or_replace(&metrics, self.timing);
        self.restore();
        reflect_playback(self.lifecycle.current_mut(), self.playing);
        self.sync_sampler();
        self.notifier.subscribe(self.lifecycle.current_mut());
    }

    // ---- playback --------------------------------------------------------

    /// Reflect the host's playback flag
    pub fn set_playing(&mut self, playing: bool) {
        if self.playing == playing {
            return;
        }
        self.playing = playing;
        reflect_playback(self.lifecycle.current_mut(), playing);
        if !playing {
            // last sampler write, so the held progress matches where the run stopped
            self.capture_progress();
        }
        self.sync_sampler();
        if !playing {
            self.reflect_on_view();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_sample_interval(&mut self, interval: Duration) {
        if self.sampler.interval() != interval {
            self.sampler.set_interval(interval);
            self.sync_sampler();
        }
    }

    fn sync_sampler(&mut self) {
        let now = self.clock.now();
        let has_animation = self.lifecycle.current().is_some();
        self.sampler
            .sync(&mut self.timers, has_animation, self.playing, now);
    }

    // ---- progress --------------------------------------------------------

    pub fn set_on_progress(&mut self, callback: Option<ProgressCallback>) {
        self.on_progress = callback;
    }

    pub fn set_on_finish(&mut self, callback: Option<FinishCallback>) {
        self.notifier
            .set_callback(callback, self.lifecycle.current_mut());
    }

    /// Normalized playback position in [0, 1]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Explicit scrub to `progress`, honoured in either playback state
    pub fn seek_progress(&mut self, progress: f64) {
        self.write_progress(clamp(progress, 0.0, 1.0));
    }

    /// Scrub by a time offset relative to the current position
    pub fn seek_by(&mut self, delta_ms: i64) {
        let Some(anim) = self.lifecycle.current() else {
            return;
        };
        let total = as_millis_f64(anim.duration());
        if total <= 0.0 {
            return;
        }
        let current = anim.current_time().map(as_millis_f64).unwrap_or(0.0);
        self.seek_progress((current + delta_ms as f64) / total);
    }

    /// Progress written by something other than the sampler: move the
    /// animation there and, while paused, the view as well.
    fn write_progress(&mut self, progress: f64) {
        self.progress = progress;
        self.restore();
        if !self.playing {
            self.reflect_on_view();
        }
    }

    fn restore(&mut self) {
        if let Some(sample) = restore_progress(self.lifecycle.current_mut(), self.progress) {
            self.emit(sample);
        }
    }

    /// Sampler write from the animation's current time
    fn capture_progress(&mut self) {
        if let Some(sample) = sample(self.lifecycle.current()) {
            self.progress = sample.progress;
            self.emit(sample);
        }
    }

    fn emit(&mut self, sample: ProgressSample) {
        if let Some(callback) = self.on_progress.as_mut() {
            callback(sample);
        }
    }

    // ---- timers ----------------------------------------------------------

    /// Deliver due sampler ticks and finish notifications
    pub fn poll(&mut self) -> PollOutcome {
        let mut outcome = PollOutcome::default();
        let now = self.clock.now();

        for handle in self.timers.due(now) {
            if !self.sampler.owns(handle) {
                trace!(?handle, "Ignoring tick from a cancelled timer");
                continue;
            }
            if self.tick() {
                outcome.ticks += 1;
            }
        }

        outcome.finished = self
            .lifecycle
            .current_mut()
            .map(Animation::poll_finish)
            .unwrap_or(false);
        if outcome.finished {
            debug!("Prompter run finished");
        }
        outcome
    }

    /// One sampler tick. Skipped when there is nothing to read.
    fn tick(&mut self) -> bool {
        if !self.playing {
            return false;
        }
        match sample(self.lifecycle.current()) {
            Some(sample) => {
                self.progress = sample.progress;
                self.emit(sample);
                true
            }
            None => false,
        }
    }

    /// When the next timer is due, for the host's poll timeout
    pub fn next_deadline(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.timers
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(now))
    }

    // ---- companion view --------------------------------------------------

    /// Attach the companion view and start listening to its scroll events
    pub fn attach_view(&mut self, view: V) {
        self.view = Some(view);
        if !self.playing {
            self.reflect_on_view();
        }
    }

    pub fn detach_view(&mut self) -> Option<V> {
        self.view.take()
    }

    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    /// Mutable access for layout changes. Scrolling through this reference
    /// is programmatic; call `on_view_scroll` for user scrolls.
    pub fn view_mut(&mut self) -> Option<&mut V> {
        self.view.as_mut()
    }

    /// User scrolled the companion view
    pub fn on_view_scroll(&mut self) {
        if self.playing {
            trace!("Ignoring view scroll while playing");
            return;
        }
        let Some(view) = self.view.as_ref() else {
            return;
        };
        let progress = progress_from_view(view);
        if progress != self.progress {
            self.write_progress(progress);
        }
    }

    /// Scroll the view by `delta` as a user would
    pub fn user_scroll_by(&mut self, delta: f64) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let top = view.scroll_top() + delta;
        view.scroll_to(top);
        self.on_view_scroll();
    }

    /// Re-centre the view on the current progress (used after the view is relaid out)
    pub fn refresh_view(&mut self) {
        if !self.playing {
            self.reflect_on_view();
        }
    }

    fn reflect_on_view(&mut self) {
        if let Some(view) = self.view.as_mut() {
            reflect_progress_on_view(view, self.progress);
        }
    }

    // ---- readouts --------------------------------------------------------

    pub fn animation(&self) -> Option<&Animation> {
        self.lifecycle.current()
    }

    pub fn translate_y(&self) -> Option<f64> {
        self.lifecycle.current().and_then(Animation::translate_y)
    }

    pub fn current_time(&self) -> Option<Duration> {
        self.lifecycle.current().and_then(Animation::current_time)
    }

    pub fn duration(&self) -> Option<Duration> {
        self.lifecycle.current().map(Animation::duration)
    }

    pub fn is_finished(&self) -> bool {
        self.lifecycle
            .current()
            .map(Animation::is_finished)
            .unwrap_or(false)
    }

    /// Animations alive on this engine's timeline
    pub fn live_animations(&self) -> usize {
        self.lifecycle.timeline().live()
    }

    pub fn live_timers(&self) -> usize {
        self.timers.live()
    }

    pub fn is_sampling(&self) -> bool {
        self.sampler.is_active()
    }
}

impl<V: ScrollView> Drop for ProgressEngine<V> {
    fn drop(&mut self) {
        self.unmount();
    }
}
