use alloc::vec::Vec;
use core::hash::Hash;

use crate::key::{KeySet, hash_id};
use crate::{ItemUniqueKey, ListKey, Position, SnapshotError};

/// One item of a section snapshot: its identity plus a revision of its value.
///
/// The revision only feeds reload detection; it never affects insert/delete/move classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemEntry {
    pub key: ItemUniqueKey,
    pub revision: u64,
}

/// The ordered item keys of one section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionSnapshot<S> {
    id: S,
    hash: u64,
    items: Vec<ItemEntry>,
}

impl<S: ListKey> SectionSnapshot<S> {
    pub fn new(id: S) -> Self {
        let hash = hash_id(&id);
        Self {
            id,
            hash,
            items: Vec::new(),
        }
    }

    /// Builds a section from `(item_id, value)` pairs. Revisions are hashes of the values.
    pub fn with_items<I: Hash, V: Hash>(id: S, items: impl IntoIterator<Item = (I, V)>) -> Self {
        let mut section = Self::new(id);
        for (item_id, value) in items {
            section.push(&item_id, &value);
        }
        section
    }

    /// Appends an item whose revision is the hash of `value`.
    pub fn push<I: Hash + ?Sized, V: Hash + ?Sized>(
        &mut self,
        item_id: &I,
        value: &V,
    ) -> ItemUniqueKey {
        self.push_revision(item_id, hash_id(value))
    }

    /// Appends an item with a caller-supplied revision (e.g. a version counter).
    pub fn push_revision<I: Hash + ?Sized>(&mut self, item_id: &I, revision: u64) -> ItemUniqueKey {
        self.push_hashed(hash_id(item_id), revision)
    }

    /// Appends an item whose id is already hashed.
    pub fn push_hashed(&mut self, item_hash: u64, revision: u64) -> ItemUniqueKey {
        let key = ItemUniqueKey::from_hashes(self.hash, item_hash);
        self.items.push(ItemEntry { key, revision });
        key
    }
}

impl<S> SectionSnapshot<S> {
    pub fn id(&self) -> &S {
        &self.id
    }

    /// Hash of the section identifier; the `section_hash` of every key in this section.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn items(&self) -> &[ItemEntry] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn key(&self, index: usize) -> Option<ItemUniqueKey> {
        self.items.get(index).map(|e| e.key)
    }

    pub fn index_of(&self, key: &ItemUniqueKey) -> Option<usize> {
        if key.section_hash != self.hash {
            return None;
        }
        self.items.iter().position(|e| e.key == *key)
    }

    pub(crate) fn keys(&self) -> Vec<ItemUniqueKey> {
        self.items.iter().map(|e| e.key).collect()
    }
}

/// An immutable description of the list at one point in time: ordered sections, each with its
/// ordered item keys.
///
/// Every lookup is a partial function over currently valid indexes. Out-of-range input yields
/// `None`, so UI events racing a data update resolve to a no-op instead of a fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot<S> {
    sections: Vec<SectionSnapshot<S>>,
}

impl<S> Default for Snapshot<S> {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
        }
    }
}

impl<S: ListKey> Snapshot<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sections(sections: Vec<SectionSnapshot<S>>) -> Self {
        let snapshot = Self { sections };
        if let Err(_err) = snapshot.validate() {
            vwarn!(error = %_err, "snapshot contains duplicate identities; diff output is unspecified");
        }
        snapshot
    }

    pub fn push_section(&mut self, section: SectionSnapshot<S>) {
        self.sections.push(section);
    }

    /// Index of the section with the given identifier.
    pub fn section_index(&self, id: &S) -> Option<usize> {
        self.sections.iter().position(|s| s.id == *id)
    }

    /// Checks that section identifiers and item keys are unique across the snapshot.
    ///
    /// Sections are compared by identifier hash, since that is what item keys carry.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut section_hashes = KeySet::<u64>::default();
        let mut keys = KeySet::<ItemUniqueKey>::default();
        for (section, s) in self.sections.iter().enumerate() {
            if !section_hashes.insert(s.hash) {
                return Err(SnapshotError::DuplicateSection { index: section });
            }
            for (index, entry) in s.items.iter().enumerate() {
                if !keys.insert(entry.key) {
                    return Err(SnapshotError::DuplicateItem { section, index });
                }
            }
        }
        Ok(())
    }
}

impl<S> Snapshot<S> {
    pub fn sections(&self) -> &[SectionSnapshot<S>] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&SectionSnapshot<S>> {
        self.sections.get(index)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn contains_section(&self, index: usize) -> bool {
        index < self.sections.len()
    }

    /// Identifier of the section at `section`, if that index is valid.
    pub fn section_id(&self, section: usize) -> Option<&S> {
        self.sections.get(section).map(|s| &s.id)
    }

    /// Key of the item at (`section`, `item`), if both indexes are valid.
    pub fn item_key(&self, section: usize, item: usize) -> Option<ItemUniqueKey> {
        self.sections.get(section)?.key(item)
    }

    pub fn item_key_at(&self, position: Position) -> Option<ItemUniqueKey> {
        self.item_key(position.section, position.item)
    }

    /// Reverse lookup: the index of the section whose identifier hash matches the key.
    ///
    /// Returns `None` for keys minted against a section that is no longer present.
    pub fn resolve_section(&self, key: &ItemUniqueKey) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.hash == key.section_hash)
    }

    pub fn position_of(&self, key: &ItemUniqueKey) -> Option<Position> {
        let section = self.resolve_section(key)?;
        let item = self.sections[section].index_of(key)?;
        Some(Position { section, item })
    }

    pub fn contains(&self, key: &ItemUniqueKey) -> bool {
        self.position_of(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = ItemUniqueKey> + '_ {
        self.sections
            .iter()
            .flat_map(|s| s.items.iter().map(|e| e.key))
    }
}
