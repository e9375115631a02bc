pub mod clock;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod locale;
pub mod media;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{AppConfig, DurationMode, TimingMode};
pub use error::{Error, Result};
pub use locale::{Locale, LocaleProvider};
