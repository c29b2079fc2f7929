use core::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

#[cfg(not(feature = "std"))]
use alloc::collections::{BTreeMap, BTreeSet};
#[cfg(feature = "std")]
use rustc_hash::FxBuildHasher;
#[cfg(feature = "std")]
use std::collections::{HashMap, HashSet};

#[cfg(feature = "std")]
#[doc(hidden)]
pub type KeyMap<K, V> = HashMap<K, V, FxBuildHasher>;
#[cfg(not(feature = "std"))]
#[doc(hidden)]
pub type KeyMap<K, V> = BTreeMap<K, V>;

#[cfg(feature = "std")]
#[doc(hidden)]
pub type KeySet<K> = HashSet<K, FxBuildHasher>;
#[cfg(not(feature = "std"))]
#[doc(hidden)]
pub type KeySet<K> = BTreeSet<K>;

/// Bound for section identifiers.
///
/// With `std` this is `Hash + Eq + Clone`; without it, lookups fall back to ordered maps and the
/// bound becomes `Hash + Ord + Clone`.
#[cfg(feature = "std")]
pub trait ListKey: Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<T: Hash + Eq + Clone> ListKey for T {}

#[cfg(not(feature = "std"))]
pub trait ListKey: Hash + Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<T: Hash + Ord + Clone> ListKey for T {}

/// Hashes an identifier with a fixed, process-independent hasher.
pub fn hash_id<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Identity of an item across the whole list.
///
/// Items only carry a section-scoped identifier; the key pairs it with the hash of the owning
/// section's identifier so two sections may reuse the same item ids. Two items with equal keys
/// are indistinguishable to the diff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemUniqueKey {
    pub section_hash: u64,
    pub item_hash: u64,
}

impl ItemUniqueKey {
    pub fn new<S: Hash + ?Sized, I: Hash + ?Sized>(section_id: &S, item_id: &I) -> Self {
        Self {
            section_hash: hash_id(section_id),
            item_hash: hash_id(item_id),
        }
    }

    pub const fn from_hashes(section_hash: u64, item_hash: u64) -> Self {
        Self {
            section_hash,
            item_hash,
        }
    }

    /// Returns `true` if this key was minted for the section with the given identifier.
    pub fn belongs_to<S: Hash + ?Sized>(&self, section_id: &S) -> bool {
        self.section_hash == hash_id(section_id)
    }
}
