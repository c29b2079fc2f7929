use crate::{Changeset, ListKey, Snapshot, diff};

/// Holds the last-applied snapshot and turns each new snapshot into a [`Changeset`].
///
/// The reconciler never talks to a view; the caller hands the returned changes to whatever
/// performs the batch update. Applying the same snapshot twice yields an empty changeset.
#[derive(Clone, Debug)]
pub struct Reconciler<S> {
    applied: Snapshot<S>,
    passes: u64,
}

impl<S> Default for Reconciler<S> {
    fn default() -> Self {
        Self {
            applied: Snapshot::default(),
            passes: 0,
        }
    }
}

impl<S: ListKey> Reconciler<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The snapshot the view currently reflects.
    pub fn applied(&self) -> &Snapshot<S> {
        &self.applied
    }

    /// Number of snapshots applied since creation or the last [`Self::reset`].
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Diffs `next` against the last-applied snapshot and retains `next`.
    pub fn apply(&mut self, next: Snapshot<S>) -> Changeset {
        let changes = diff(&self.applied, &next);
        vdebug!(
            pass = self.passes,
            sections = next.section_count(),
            items = next.item_count(),
            changes = changes.len(),
            "Reconciler::apply"
        );
        self.applied = next;
        self.passes = self.passes.saturating_add(1);
        changes
    }

    /// Forgets the applied snapshot, so the next pass inserts everything.
    pub fn reset(&mut self) {
        self.applied = Snapshot::default();
        self.passes = 0;
    }
}
