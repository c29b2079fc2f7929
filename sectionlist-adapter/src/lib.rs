//! Framework-neutral glue between `sectionlist` snapshots and reuse-pool list views.
//!
//! The `sectionlist` crate computes snapshots, changesets and cache/selection bookkeeping. This
//! crate drives an imperative list widget with them:
//!
//! - [`ListCoordinator`]: owns the sections, diffs on every update and answers view events
//! - [`ListView`] / [`ViewEventSink`]: the two directions of the view boundary
//! - [`CellRegistry`]: reusable cells hosting per-item controllers
//! - [`MessageBus`]: cross-component scroll commands
//! - [`Scheduler`]: next-turn deferral for selection write-back
//! - Scroll anchoring across data changes
//!
//! This crate is intentionally framework-agnostic; hosts implement [`ListView`] for their widget.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod bus;
mod cell;
mod coordinator;
mod options;
mod scheduler;
mod scroll;
mod section;
mod selection;
mod view;


pub use anchor::{ScrollAnchor, apply_anchor, capture_first_visible_anchor};
pub use bus::{
    ListCommand, ListId, MessageBus, SCROLL_TO_POSITION, SCROLL_TO_SECTION, Subscription, Topic,
};
pub use cell::{CellId, CellRegistry, ListCell};
pub use coordinator::ListCoordinator;
pub use options::{
    ListOptions, NotifyCallback, RefreshCallback, RefreshCompletion, ScrollCallback,
    SelectionCallback,
};
pub use scheduler::Scheduler;
pub use scroll::ScrollController;
pub use section::{DataSection, DeleteCompletion, Section, SectionDataSource};
pub use selection::SelectionSync;
pub use view::{
    EdgeInsets, ListView, SupplementaryMetrics, ViewEventSink, ViewSettings, VisibleItem,
};
