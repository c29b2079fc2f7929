use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::key::KeyMap;
use crate::{ListKey, Position, Snapshot};

/// Selected item indexes grouped by section identifier.
///
/// This is a projection of the view's native selection, which stays authoritative; rebuild it
/// with [`Self::from_positions`] after every selection-affecting event.
#[derive(Clone, Debug)]
pub struct SelectionSet<S> {
    sections: KeyMap<S, BTreeSet<usize>>,
}

impl<S> Default for SelectionSet<S> {
    fn default() -> Self {
        Self {
            sections: KeyMap::default(),
        }
    }
}

impl<S: ListKey> PartialEq for SelectionSet<S> {
    fn eq(&self, other: &Self) -> bool {
        self.sections == other.sections
    }
}

impl<S: ListKey> Eq for SelectionSet<S> {}

impl<S: ListKey> SelectionSet<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups view positions by the identifier of their section in `snapshot`.
    ///
    /// Positions whose section index is no longer valid are dropped silently.
    pub fn from_positions(
        positions: impl IntoIterator<Item = Position>,
        snapshot: &Snapshot<S>,
    ) -> Self {
        let mut out = Self::default();
        let mut dropped = 0usize;
        for position in positions {
            match snapshot.section_id(position.section) {
                Some(id) => {
                    out.insert(id.clone(), position.item);
                }
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            vtrace!(dropped, "SelectionSet::from_positions: stale sections");
        }
        out
    }

    /// Converts the projection back into view positions, ascending.
    ///
    /// Sections missing from `snapshot` and item indexes past a section's end are skipped.
    pub fn to_positions(&self, snapshot: &Snapshot<S>) -> Vec<Position> {
        let mut out = Vec::new();
        for (section, s) in snapshot.sections().iter().enumerate() {
            let Some(items) = self.sections.get(s.id()) else {
                continue;
            };
            out.extend(
                items
                    .iter()
                    .take_while(|&&item| item < s.len())
                    .map(|&item| Position::new(section, item)),
            );
        }
        out
    }

    pub fn insert(&mut self, section: S, item: usize) -> bool {
        self.sections.entry(section).or_default().insert(item)
    }

    pub fn remove(&mut self, section: &S, item: usize) -> bool {
        let Some(items) = self.sections.get_mut(section) else {
            return false;
        };
        let removed = items.remove(&item);
        if items.is_empty() {
            self.sections.remove(section);
        }
        removed
    }

    pub fn contains(&self, section: &S, item: usize) -> bool {
        self.sections
            .get(section)
            .is_some_and(|items| items.contains(&item))
    }

    /// The selected item indexes of one section.
    pub fn rows_in(&self, section: &S) -> Option<&BTreeSet<usize>> {
        self.sections.get(section)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Total number of selected items.
    pub fn len(&self) -> usize {
        self.sections.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &BTreeSet<usize>)> {
        self.sections.iter()
    }
}
