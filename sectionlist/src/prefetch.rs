use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::Position;

/// Look-ahead signals reported by the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrefetchKind {
    Prefetch,
    Cancel,
}

/// Splits a batch of positions into one group per section index, keeping the incoming order
/// inside each group.
pub fn group_by_section(positions: &[Position]) -> BTreeMap<usize, Vec<Position>> {
    let mut groups: BTreeMap<usize, Vec<Position>> = BTreeMap::new();
    for &position in positions {
        groups.entry(position.section).or_default().push(position);
    }
    groups
}
