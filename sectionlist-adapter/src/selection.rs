use alloc::sync::Arc;

use sectionlist::{ListKey, SelectionSet, Snapshot};

use crate::{ListView, Scheduler, SelectionCallback};

/// Mirrors the view's native selection into the host's selection binding.
///
/// The native selection stays authoritative. Writes to the binding are deferred to the next
/// scheduler turn so they never land while the host is computing an update.
pub struct SelectionSync<S> {
    binding: Option<SelectionCallback<S>>,
    scheduler: Scheduler,
}

impl<S> core::fmt::Debug for SelectionSync<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SelectionSync")
            .field("bound", &self.binding.is_some())
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

impl<S: ListKey + 'static> SelectionSync<S> {
    pub fn new(binding: Option<SelectionCallback<S>>, scheduler: Scheduler) -> Self {
        Self { binding, scheduler }
    }

    pub fn set_binding(&mut self, binding: Option<SelectionCallback<S>>) {
        self.binding = binding;
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Projects the view's selection against `snapshot` and schedules the binding write.
    ///
    /// Returns the projection, or `None` when no binding is installed.
    pub fn sync(&self, view: &dyn ListView, snapshot: &Snapshot<S>) -> Option<SelectionSet<S>> {
        let binding = self.binding.as_ref()?;
        let selection = SelectionSet::from_positions(view.selected_positions(), snapshot);
        vtrace!(selected = selection.len(), "SelectionSync: scheduling write");
        let binding = Arc::clone(binding);
        let value = selection.clone();
        self.scheduler.defer(move || binding(&value));
        Some(selection)
    }

    /// Selects every still-valid position of `selection` in the view.
    pub fn restore(
        &self,
        view: &mut dyn ListView,
        selection: &SelectionSet<S>,
        snapshot: &Snapshot<S>,
    ) -> usize {
        let positions = selection.to_positions(snapshot);
        for &position in &positions {
            view.set_selected(position, true);
        }
        positions.len()
    }
}
