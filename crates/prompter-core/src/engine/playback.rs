//! L3 Molecular Layer: one-directional rules from engine state onto the animation
//!
//! - `reflect_playback`: playback flag → play/pause
//! - `restore_progress`: held progress → seek

use tracing::{debug, trace};

use super::animation::Animation;
use super::sampler::{sample, ProgressSample};
use super::timing::elapsed_at;

/// Apply the playback flag to the animation. Safe to call repeatedly.
pub fn reflect_playback(anim: Option<&mut Animation>, playing: bool) {
    let Some(anim) = anim else {
        trace!("No animation to reflect playback onto");
        return;
    };
    if playing {
        anim.play();
    } else {
        anim.pause();
    }
}

/// Seek the animation to the elapsed time matching `progress`.
///
/// Returns the restored position so observers can be told right away, or
/// `None` when the animation is missing or has no duration.
pub fn restore_progress(anim: Option<&mut Animation>, progress: f64) -> Option<ProgressSample> {
    let anim = anim?;
    let total = anim.duration();
    if total.is_zero() {
        return None;
    }
    let elapsed = elapsed_at(progress, total);
    debug!(?elapsed, progress, "Restoring progress on animation");
    anim.seek(elapsed);
    sample(Some(&*anim)).map(|s| ProgressSample { progress, ..s })
}
