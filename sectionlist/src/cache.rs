use core::hash::Hash;

use crate::key::{KeyMap, KeySet};
use crate::{ItemUniqueKey, ListKey, SectionSnapshot, Snapshot, hash_id};

/// How a [`ControllerCache`] treats entries whose item left the snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CacheEviction {
    /// Evict entries whose key is absent from the latest snapshot.
    #[default]
    Eager,
    /// Keep them until their section disables caching or the cache is cleared.
    Retain,
}

/// Render controllers keyed by item identity.
///
/// The cache has no size or time limit; entries live until the owner invalidates them. Sections
/// opt in individually, so a caller must never read or write entries for a section with caching
/// disabled ([`Self::sync`] drops anything left over).
#[derive(Clone, Debug)]
pub struct ControllerCache<C> {
    entries: KeyMap<ItemUniqueKey, C>,
    configuring: KeySet<ItemUniqueKey>,
}

impl<C> Default for ControllerCache<C> {
    fn default() -> Self {
        Self {
            entries: KeyMap::default(),
            configuring: KeySet::default(),
        }
    }
}

impl<C> ControllerCache<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &ItemUniqueKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &ItemUniqueKey) -> Option<&C> {
        self.entries.get(key)
    }

    /// Stores `controller` for `key`, returning the one it replaced.
    pub fn put(&mut self, key: ItemUniqueKey, controller: C) -> Option<C> {
        self.entries.insert(key, controller)
    }

    pub fn invalidate(&mut self, key: &ItemUniqueKey) -> Option<C> {
        self.entries.remove(key)
    }

    /// Drops every entry minted for the section with the given identifier hash.
    pub fn invalidate_section_hash(&mut self, section_hash: u64) -> usize {
        self.retain(|key, _| key.section_hash != section_hash)
    }

    /// Drops every entry of the section identified by `section_id`.
    pub fn invalidate_section<S: Hash + ?Sized>(&mut self, section_id: &S) -> usize {
        self.invalidate_section_hash(hash_id(section_id))
    }

    /// Keeps the entries for which `keep` returns `true`. Returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&ItemUniqueKey, &C) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, c| keep(k, c));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Reconciles the cache with a freshly applied snapshot.
    ///
    /// Entries of sections where `caching_enabled` is `false` are always dropped. With
    /// [`CacheEviction::Eager`], entries whose key is absent from `snapshot` are dropped too.
    pub fn sync<S: ListKey>(
        &mut self,
        snapshot: &Snapshot<S>,
        eviction: CacheEviction,
        mut caching_enabled: impl FnMut(usize, &SectionSnapshot<S>) -> bool,
    ) -> usize {
        let mut enabled = KeyMap::<u64, bool>::default();
        for (index, section) in snapshot.sections().iter().enumerate() {
            enabled.insert(section.hash(), caching_enabled(index, section));
        }
        let eager = eviction == CacheEviction::Eager;
        let present: KeySet<ItemUniqueKey> = if eager {
            snapshot.keys().collect()
        } else {
            KeySet::default()
        };

        let evicted = self.retain(|key, _| match enabled.get(&key.section_hash) {
            Some(false) => false,
            Some(true) => !eager || present.contains(key),
            None => !eager,
        });
        if evicted > 0 {
            vdebug!(evicted, remaining = self.entries.len(), "ControllerCache::sync");
        }
        evicted
    }

    /// Marks `key` as being configured.
    ///
    /// Returns `false` when a configuration for the same key is already in progress; the caller
    /// must then skip the nested configuration. Only needed by callers whose render step can reach
    /// back into the cache; a caller holding `&mut` for the whole configuration cannot re-enter.
    pub fn begin_configure(&mut self, key: ItemUniqueKey) -> bool {
        self.configuring.insert(key)
    }

    pub fn finish_configure(&mut self, key: &ItemUniqueKey) {
        self.configuring.remove(key);
    }

    pub fn is_configuring(&self, key: &ItemUniqueKey) -> bool {
        self.configuring.contains(key)
    }
}
