use alloc::vec;
use alloc::vec::Vec;

use crate::key::KeyMap;
use crate::{ItemUniqueKey, ListKey, Position, Snapshot};

/// A structural change to the list's sections.
///
/// Indexes follow batch-update conventions: `Delete` and `Move::from` refer to the old snapshot,
/// `Insert` and `Move::to` to the new one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SectionChange {
    Delete { index: usize },
    Insert { index: usize },
    Move { from: usize, to: usize },
}

/// A structural change to the items of a section present in both snapshots.
///
/// `Delete::at` and `Move::from` are old positions; `Insert::at`, `Move::to` and `Reload::at`
/// are new positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemChange {
    Delete {
        key: ItemUniqueKey,
        at: Position,
    },
    Insert {
        key: ItemUniqueKey,
        at: Position,
    },
    Move {
        key: ItemUniqueKey,
        from: Position,
        to: Position,
    },
    Reload {
        key: ItemUniqueKey,
        at: Position,
    },
}

impl ItemChange {
    pub fn key(&self) -> ItemUniqueKey {
        match *self {
            Self::Delete { key, .. }
            | Self::Insert { key, .. }
            | Self::Move { key, .. }
            | Self::Reload { key, .. } => key,
        }
    }
}

/// The ordered mutations that turn one snapshot into the next.
///
/// Within each list, changes are grouped by kind: deletes (descending index), inserts
/// (ascending), moves and reloads (ascending target). The output depends only on the keys and
/// revisions of the two snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Changeset {
    pub sections: Vec<SectionChange>,
    pub items: Vec<ItemChange>,
}

/// Per-kind totals of a [`Changeset`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChangeCounts {
    pub deletes: usize,
    pub inserts: usize,
    pub moves: usize,
    pub reloads: usize,
}

impl Changeset {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sections.len() + self.items.len()
    }

    /// Returns `true` if the changeset only reloads items in place.
    pub fn is_reload_only(&self) -> bool {
        self.sections.is_empty()
            && self
                .items
                .iter()
                .all(|c| matches!(c, ItemChange::Reload { .. }))
    }

    pub fn reloaded_keys(&self) -> impl Iterator<Item = ItemUniqueKey> + '_ {
        self.items.iter().filter_map(|c| match *c {
            ItemChange::Reload { key, .. } => Some(key),
            _ => None,
        })
    }

    /// Totals over both section and item changes.
    pub fn counts(&self) -> ChangeCounts {
        let mut counts = ChangeCounts::default();
        for change in &self.sections {
            match change {
                SectionChange::Delete { .. } => counts.deletes += 1,
                SectionChange::Insert { .. } => counts.inserts += 1,
                SectionChange::Move { .. } => counts.moves += 1,
            }
        }
        for change in &self.items {
            match change {
                ItemChange::Delete { .. } => counts.deletes += 1,
                ItemChange::Insert { .. } => counts.inserts += 1,
                ItemChange::Move { .. } => counts.moves += 1,
                ItemChange::Reload { .. } => counts.reloads += 1,
            }
        }
        counts
    }
}

/// Classification of one keyed sequence against another.
#[derive(Debug, Default)]
pub(crate) struct SequenceDiff {
    /// Old indexes whose key is gone, ascending.
    pub(crate) deleted: Vec<usize>,
    /// New indexes whose key is new, ascending.
    pub(crate) inserted: Vec<usize>,
    /// `(old, new)` pairs for every key present in both, in new order.
    pub(crate) matched: Vec<(usize, usize)>,
    /// Parallel to `matched`: `true` when the pair has to move.
    pub(crate) moved: Vec<bool>,
}

/// Diffs two keyed sequences by identity.
///
/// Kept keys that lie on a longest increasing run of old indexes (taken in new order) stay put;
/// every other kept key is a move. For unique keys this is the longest common subsequence, in
/// `O(n log n)`.
pub(crate) fn diff_sequence<K: ListKey>(old: &[K], new: &[K]) -> SequenceDiff {
    let mut old_index = KeyMap::<&K, usize>::default();
    for (i, key) in old.iter().enumerate() {
        old_index.insert(key, i);
    }
    let mut new_index = KeyMap::<&K, usize>::default();
    for (i, key) in new.iter().enumerate() {
        new_index.insert(key, i);
    }

    let mut out = SequenceDiff::default();
    for (i, key) in old.iter().enumerate() {
        if !new_index.contains_key(key) {
            out.deleted.push(i);
        }
    }
    for (i, key) in new.iter().enumerate() {
        match old_index.get(key) {
            Some(&o) => out.matched.push((o, i)),
            None => out.inserted.push(i),
        }
    }

    let stable = increasing_run_mask(out.matched.iter().map(|&(o, _)| o));
    out.moved = stable.into_iter().map(|keep| !keep).collect();
    out
}

/// Marks the members of one longest strictly increasing subsequence.
fn increasing_run_mask(seq: impl ExactSizeIterator<Item = usize>) -> Vec<bool> {
    let values: Vec<usize> = seq.collect();
    let n = values.len();
    // tails[k] = index into `values` of the smallest tail of a run of length k + 1.
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; n];
    for (i, &v) in values.iter().enumerate() {
        let at = tails.partition_point(|&t| values[t] < v);
        if at > 0 {
            prev[i] = Some(tails[at - 1]);
        }
        if at == tails.len() {
            tails.push(i);
        } else {
            tails[at] = i;
        }
    }

    let mut mask = vec![false; n];
    let mut cur = tails.last().copied();
    while let Some(i) = cur {
        mask[i] = true;
        cur = prev[i];
    }
    mask
}

/// Computes the changes that transform `old` into `new`.
///
/// Sections are matched by identifier. Items are only diffed inside sections present in both
/// snapshots; an item whose section was inserted or deleted travels with it. Items whose key is
/// kept but whose revision changed are reloaded at their new position, also when they moved.
pub fn diff<S: ListKey>(old: &Snapshot<S>, new: &Snapshot<S>) -> Changeset {
    let old_ids: Vec<S> = old.sections().iter().map(|s| s.id().clone()).collect();
    let new_ids: Vec<S> = new.sections().iter().map(|s| s.id().clone()).collect();
    let sections = diff_sequence(&old_ids, &new_ids);

    let mut changes = Changeset::default();
    for &index in sections.deleted.iter().rev() {
        changes.sections.push(SectionChange::Delete { index });
    }
    for &index in &sections.inserted {
        changes.sections.push(SectionChange::Insert { index });
    }
    for (&(from, to), &moved) in sections.matched.iter().zip(&sections.moved) {
        if moved {
            changes.sections.push(SectionChange::Move { from, to });
        }
    }

    let mut deletes = Vec::new();
    let mut inserts = Vec::new();
    let mut moves = Vec::new();
    let mut reloads = Vec::new();
    for &(old_section, new_section) in &sections.matched {
        let (Some(before), Some(after)) = (old.section(old_section), new.section(new_section))
        else {
            continue;
        };
        let items = diff_sequence(&before.keys(), &after.keys());

        for &i in items.deleted.iter().rev() {
            deletes.push(ItemChange::Delete {
                key: before.items()[i].key,
                at: Position::new(old_section, i),
            });
        }
        for &i in &items.inserted {
            inserts.push(ItemChange::Insert {
                key: after.items()[i].key,
                at: Position::new(new_section, i),
            });
        }
        for (&(from, to), &moved) in items.matched.iter().zip(&items.moved) {
            let key = after.items()[to].key;
            if moved {
                moves.push(ItemChange::Move {
                    key,
                    from: Position::new(old_section, from),
                    to: Position::new(new_section, to),
                });
            }
            if before.items()[from].revision != after.items()[to].revision {
                reloads.push(ItemChange::Reload {
                    key,
                    at: Position::new(new_section, to),
                });
            }
        }
    }

    deletes.sort_by(|a, b| position_of(b).cmp(&position_of(a)));
    inserts.sort_by_key(position_of);
    moves.sort_by_key(position_of);
    reloads.sort_by_key(position_of);
    changes.items.extend(deletes);
    changes.items.extend(inserts);
    changes.items.extend(moves);
    changes.items.extend(reloads);
    changes
}

fn position_of(change: &ItemChange) -> Position {
    match *change {
        ItemChange::Delete { at, .. }
        | ItemChange::Insert { at, .. }
        | ItemChange::Reload { at, .. } => at,
        ItemChange::Move { to, .. } => to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increasing_run_keeps_longest_chain() {
        let mask = increasing_run_mask([2usize, 0, 1, 3].into_iter());
        assert_eq!(mask, vec![false, true, true, true]);
    }

    #[test]
    fn sequence_diff_classifies_keys() {
        let d = diff_sequence(&['a', 'b', 'c', 'd'], &['d', 'a', 'c', 'e']);
        assert_eq!(d.deleted, vec![1]);
        assert_eq!(d.inserted, vec![3]);
        assert_eq!(d.matched, vec![(3, 0), (0, 1), (2, 2)]);
        assert_eq!(d.moved, vec![true, false, false]);
    }

    #[test]
    fn duplicate_keys_do_not_panic() {
        let d = diff_sequence(&[1, 1, 2], &[2, 1, 1]);
        assert_eq!(d.matched.len(), 3);
        assert!(d.inserted.is_empty());
    }
}
