/// A snapshot of the scroll geometry reported by the view.
///
/// All values are in the scroll axis (vertical for lists).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollMetrics {
    pub viewport_height: f32,
    pub content_height: f32,
    pub content_offset: f32,
}

impl ScrollMetrics {
    pub const fn new(viewport_height: f32, content_height: f32, content_offset: f32) -> Self {
        Self {
            viewport_height,
            content_height,
            content_offset,
        }
    }

    /// Returns `true` when the remaining content below the offset fits in the viewport.
    pub fn is_at_bottom(&self) -> bool {
        (self.content_height - self.content_offset) <= self.viewport_height
    }
}
