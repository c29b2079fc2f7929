//! Keyed reconciliation for sectioned list views.
//!
//! For the coordinator that drives an actual view (cell reuse, selection bindings, scroll
//! commands), see the `sectionlist-adapter` crate.
//!
//! This crate holds the pieces that decide *what changed* between two descriptions of a list:
//! item identities, immutable snapshots, an identity-based diff with move detection, a render
//! controller cache keyed by identity, and the selection projection.
//!
//! It is UI-agnostic. A view layer is expected to:
//! - build a [`Snapshot`] on every data change
//! - perform the [`Changeset`] returned by [`Reconciler::apply`] as one batch update
//! - report selected positions and scroll geometry back
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod cache;
mod diff;
mod edge;
mod error;
mod key;
mod prefetch;
mod reconcile;
mod selection;
mod snapshot;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use cache::{CacheEviction, ControllerCache};
pub use diff::{ChangeCounts, Changeset, ItemChange, SectionChange, diff};
pub use edge::BottomEdgeLatch;
pub use error::SnapshotError;
pub use key::{ItemUniqueKey, ListKey, hash_id};
pub use prefetch::{PrefetchKind, group_by_section};
pub use reconcile::Reconciler;
pub use selection::SelectionSet;
pub use snapshot::{ItemEntry, SectionSnapshot, Snapshot};
pub use state::ScrollMetrics;
pub use types::{Align, CellKind, Position, SelfSizingConfig, SelfSizingContext};

#[doc(hidden)]
pub use key::{KeyMap, KeySet};
