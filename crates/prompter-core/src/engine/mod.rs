//! Progress synchronization engine
//!
//! Keeps three views of playback position consistent: the prompter
//! animation, a normalized progress value, and the scroll offset of a
//! companion view.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `timing` - clamp, lerp and time/fraction conversions
//! - `timers` - repeating timers cancellable by handle
//!
//! ## L3 Molecular Layer
//! - `animation` - the timed interpolation object and its timeline
//! - `lifecycle` - creation and replacement of the animation
//! - `playback` - playback reflector and progress restorer
//! - `sampler` - periodic progress readout while playing
//! - `notifier` - finish subscription
//! - `bridge` - progress ↔ scroll offset
//! - `resize` - element size observation
//!
//! ## L2 Organism Layer
//! - `sync` - [`ProgressEngine`], wiring the rules together
//!
//! # Usage
//!
//! ```ignore
//! use prompter_core::engine::{BoxMetrics, EngineOptions, ProgressEngine};
//!
//! let mut engine = ProgressEngine::new(EngineOptions::default(), clock);
//! engine.mount(BoxMetrics::new(viewport_rows, content_rows));
//! engine.attach_view(editor);
//! engine.set_playing(true);
//!
//! // In the main loop
//! let outcome = engine.poll();
//! let offset = engine.translate_y();
//! ```

// L4 Atomic Layer
pub mod timers;
pub mod timing;

// L3 Molecular Layer
pub mod animation;
pub mod bridge;
pub mod lifecycle;
pub mod notifier;
pub mod playback;
pub mod resize;
pub mod sampler;

// L2 Organism Layer
pub mod sync;

pub use animation::{Animation, AnimationId, Keyframes, PlayState, Timeline};
pub use bridge::{progress_at, scroll_target, ScrollView};
pub use lifecycle::{run_duration, BoxMetrics};
pub use notifier::FinishCallback;
pub use sampler::ProgressSample;
pub use sync::{EngineOptions, PollOutcome, ProgressCallback, ProgressEngine};
pub use timing::clamp;
