use sectionlist::{ItemUniqueKey, ListKey, Snapshot};

use crate::ListView;

/// A scroll anchor that preserves visual position across data changes.
///
/// Typical use cases:
/// - timeline "load older" prepends without content jumping
/// - section reorders where the viewport should stay on the same item
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollAnchor {
    pub key: ItemUniqueKey,
    /// The distance from the anchor item's leading edge to the viewport's top.
    pub offset_in_viewport: f32,
}

/// Captures an anchor for the first visible item of `snapshot`.
///
/// Returns `None` if the view cannot report its first visible row or the row is not part of
/// `snapshot`.
pub fn capture_first_visible_anchor<S: ListKey>(
    view: &dyn ListView,
    snapshot: &Snapshot<S>,
) -> Option<ScrollAnchor> {
    let visible = view.first_visible_item()?;
    let key = snapshot.item_key_at(visible.position)?;
    Some(ScrollAnchor {
        key,
        offset_in_viewport: visible.offset_in_viewport,
    })
}

/// Re-applies a previously captured anchor against the *current* snapshot.
///
/// Returns `true` when the anchored item still exists and the view was scrolled to it.
pub fn apply_anchor<S: ListKey>(
    view: &mut dyn ListView,
    anchor: &ScrollAnchor,
    snapshot: &Snapshot<S>,
) -> bool {
    let Some(position) = snapshot.position_of(&anchor.key) else {
        return false;
    };
    view.scroll_item_to(position, anchor.offset_in_viewport);
    true
}
