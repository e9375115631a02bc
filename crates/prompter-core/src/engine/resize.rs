//! L3 Molecular Layer: box-size observation of the animated element

use tracing::{debug, trace};

use super::lifecycle::BoxMetrics;

/// One subscription to the element's size changes
#[derive(Debug, Default)]
pub struct ResizeWatcher {
    observing: bool,
    last: Option<BoxMetrics>,
}

impl ResizeWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    pub fn last(&self) -> Option<BoxMetrics> {
        self.last
    }

    /// Start observing with the size seen at mount. Re-observing replaces the
    /// previous subscription rather than adding a second one.
    pub fn observe(&mut self, initial: BoxMetrics) {
        self.observing = true;
        self.last = Some(initial);
    }

    /// Stop observing. Idempotent.
    pub fn disconnect(&mut self) {
        if self.observing {
            debug!("Disconnected resize watcher");
        }
        self.observing = false;
        self.last = None;
    }

    /// Deliver a size notification. Returns the new size when the element
    /// should be rebuilt: observing and the size actually changed.
    pub fn notify(&mut self, metrics: BoxMetrics) -> Option<BoxMetrics> {
        if !self.observing {
            trace!("Resize notification while not observing");
            return None;
        }
        if self.last == Some(metrics) {
            return None;
        }
        debug!(
            client_height = metrics.client_height,
            scroll_height = metrics.scroll_height,
            "Element resized"
        );
        self.last = Some(metrics);
        Some(metrics)
    }
}
