use crate::ScrollMetrics;

/// Debounces the "reached bottom" signal.
///
/// The latch fires on the transition into the bottom region and stays silent while the viewport
/// remains there. Leaving the region re-arms it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BottomEdgeLatch {
    reached: bool,
}

impl BottomEdgeLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_reached(&self) -> bool {
        self.reached
    }

    pub fn reset(&mut self) {
        self.reached = false;
    }

    /// Feeds the current geometry. Returns `true` exactly when the notification should fire.
    pub fn check(&mut self, metrics: ScrollMetrics) -> bool {
        if !metrics.is_at_bottom() {
            self.reached = false;
            return false;
        }
        if self.reached {
            return false;
        }
        vtrace!(
            offset = metrics.content_offset,
            content = metrics.content_height,
            viewport = metrics.viewport_height,
            "BottomEdgeLatch: reached bottom"
        );
        self.reached = true;
        true
    }
}
