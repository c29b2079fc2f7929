use alloc::vec::Vec;

use sectionlist::{
    CellKind, Changeset, ControllerCache, ItemUniqueKey, ListKey, Position, Reconciler,
    ScrollMetrics, SelectionSet, SelfSizingContext, Snapshot, group_by_section,
};

use crate::{
    CellId, CellRegistry, DeleteCompletion, ListCommand, ListOptions, ListView, MessageBus,
    RefreshCompletion, Scheduler, ScrollController, Section, SelectionSync, SupplementaryMetrics,
    ViewEventSink, apply_anchor, capture_first_visible_anchor,
};

/// A framework-neutral coordinator between the host's sections and an imperative list view.
///
/// This type does not hold any UI objects. The host drives it by:
/// - calling [`Self::update`] whenever its sections or options change
/// - forwarding view events through [`ViewEventSink`]
/// - calling [`Self::poll`] and [`Scheduler::run_pending`] once per event-loop turn
///
/// `C` is the per-item controller type hosted in cells; it is cloned into the controller cache,
/// so it should be a cheap handle (e.g. `Rc<..>`).
pub struct ListCoordinator<S, C> {
    sections: Vec<Section<S, C>>,
    options: ListOptions<S>,
    reconciler: Reconciler<S>,
    cache: ControllerCache<C>,
    cells: CellRegistry<C>,
    selection: SelectionSync<S>,
    scroll: ScrollController,
    refreshing: Option<RefreshCompletion>,
    refresh_control_installed: bool,
}

impl<S: core::fmt::Debug, C> core::fmt::Debug for ListCoordinator<S, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListCoordinator")
            .field("sections", &self.sections.len())
            .field("options", &self.options)
            .field("cached_controllers", &self.cache.len())
            .field("cells", &self.cells.len())
            .field("scroll", &self.scroll)
            .field("refreshing", &self.refreshing.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: ListKey + 'static, C: Clone> ListCoordinator<S, C> {
    pub fn new(options: ListOptions<S>, scheduler: Scheduler) -> Self {
        Self {
            sections: Vec::new(),
            selection: SelectionSync::new(options.on_selection_change.clone(), scheduler),
            scroll: ScrollController::new(options.list_id),
            options,
            reconciler: Reconciler::new(),
            cache: ControllerCache::new(),
            cells: CellRegistry::new(),
            refreshing: None,
            refresh_control_installed: false,
        }
    }

    /// Subscribes to scroll commands on `bus`. Commands are handled in [`Self::poll`].
    pub fn listen(&mut self, bus: &MessageBus<ListCommand>) {
        self.scroll.listen(bus);
    }

    pub fn options(&self) -> &ListOptions<S> {
        &self.options
    }

    /// Replaces the options. Takes effect on the next [`Self::update`].
    pub fn set_options(&mut self, options: ListOptions<S>) {
        self.selection.set_binding(options.on_selection_change.clone());
        self.scroll.set_list_id(options.list_id);
        self.options = options;
    }

    pub fn sections(&self) -> &[Section<S, C>] {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut [Section<S, C>] {
        &mut self.sections
    }

    /// The snapshot currently shown by the view.
    pub fn snapshot(&self) -> &Snapshot<S> {
        self.reconciler.applied()
    }

    pub fn cache(&self) -> &ControllerCache<C> {
        &self.cache
    }

    /// Drops the cached controllers of the section identified by `section`.
    pub fn invalidate_controllers(&mut self, section: &S) -> usize {
        self.cache.invalidate_section(section)
    }

    pub fn cells(&self) -> &CellRegistry<C> {
        &self.cells
    }

    pub fn has_done_initial_setup(&self) -> bool {
        self.scroll.has_done_initial_setup()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.is_some()
    }

    /// Builds the snapshot of the current sections.
    pub fn build_snapshot(&self) -> Snapshot<S> {
        Snapshot::from_sections(self.sections.iter().map(Section::snapshot).collect())
    }

    /// Applies new host state: sections, view settings, content and the refresh control.
    pub fn update(&mut self, view: &mut dyn ListView, sections: Vec<Section<S, C>>) {
        self.sections = sections;
        view.apply_settings(&self.options.settings);
        self.update_content(
            view,
            self.options.animate_on_refresh,
            self.options.refresh_visible_cells,
        );
        self.configure_refresh_control(view);
    }

    /// Reconciles the view with the current sections.
    ///
    /// Does nothing before initial setup; the first attachment populates the view instead.
    pub fn update_content(
        &mut self,
        view: &mut dyn ListView,
        animated: bool,
        refresh_existing: bool,
    ) {
        if !self.scroll.has_done_initial_setup() {
            vtrace!("ListCoordinator::update_content before initial setup");
            return;
        }
        if refresh_existing {
            self.reconfigure_visible_cells(view);
        }
        self.populate(view, animated);
        self.selection.sync(view, self.reconciler.applied());
        self.check_reached_bottom(view.scroll_metrics());
    }

    /// Handles pending bus commands and finished refreshes.
    pub fn poll(&mut self, view: &mut dyn ListView) {
        for command in self.scroll.take_commands() {
            self.scroll.execute(view, &command, self.reconciler.applied());
        }
        if self.refreshing.as_ref().is_some_and(RefreshCompletion::is_finished) {
            self.refreshing = None;
            vdebug!("ListCoordinator: refresh finished");
            view.end_refreshing();
        }
    }

    /// Re-applies a host-held selection to the view.
    ///
    /// Entries whose section or row no longer exists are skipped. Returns how many rows were
    /// selected.
    pub fn restore_selection(
        &self,
        view: &mut dyn ListView,
        selection: &SelectionSet<S>,
    ) -> usize {
        self.selection.restore(view, selection, self.reconciler.applied())
    }

    fn populate(&mut self, view: &mut dyn ListView, animated: bool) -> Changeset {
        let anchor = if self.options.preserve_scroll_anchor {
            capture_first_visible_anchor(view, self.reconciler.applied())
        } else {
            None
        };

        let next = self.build_snapshot();
        let changes = self.reconciler.apply(next);
        let sections = &self.sections;
        self.cache.sync(
            self.reconciler.applied(),
            self.options.controller_eviction,
            |index, _| sections.get(index).is_some_and(|s| s.cache_controllers),
        );

        if !changes.is_empty() {
            vdebug!(changes = changes.len(), animated, "ListCoordinator::populate");
            view.perform_updates(&changes, animated);
        }
        if let Some(anchor) = anchor {
            apply_anchor(view, &anchor, self.reconciler.applied());
        }
        changes
    }

    fn reconfigure_visible_cells(&mut self, view: &dyn ListView) {
        for id in view.visible_cells() {
            let Some(cell) = self.cells.get(id) else {
                continue;
            };
            let Some(key) = cell.item_key() else {
                continue;
            };
            let is_selected = cell.is_selected();
            self.configure_cell(id, key, is_selected);
        }
    }

    fn section_index_for(&self, key: &ItemUniqueKey) -> Option<usize> {
        self.sections.iter().position(|s| s.hash() == key.section_hash)
    }

    /// Configures `id` for `key`, reusing and storing the cached controller when the section
    /// caches controllers.
    fn configure_cell(&mut self, id: CellId, key: ItemUniqueKey, is_selected: bool) {
        let Some(section_index) = self.section_index_for(&key) else {
            vtrace!(?key, "ListCoordinator: no section for key");
            return;
        };
        let section = &mut self.sections[section_index];
        if let Some(cell) = self.cells.get_mut(id) {
            cell.bind(key, is_selected);
            let cached = if section.cache_controllers {
                self.cache.get(&key).cloned()
            } else {
                None
            };
            section.source_mut().configure_cell(cell, cached, key, is_selected);
            if section.cache_controllers {
                if let Some(controller) = cell.controller() {
                    self.cache.put(key, controller.clone());
                }
            }
        }
    }

    fn configure_refresh_control(&mut self, view: &mut dyn ListView) {
        let wanted = self.options.on_pull_to_refresh.is_some();
        if wanted != self.refresh_control_installed {
            self.refresh_control_installed = wanted;
            view.set_refresh_control(wanted);
        }
    }

    fn sync_selection(&self, view: &dyn ListView) {
        self.selection.sync(view, self.reconciler.applied());
    }

    fn reconfigure_at(&mut self, view: &dyn ListView, position: Position) {
        let Some(id) = view.cell_at(position) else {
            return;
        };
        let Some(key) = self.cells.get(id).and_then(|c| c.item_key()) else {
            return;
        };
        self.configure_cell(id, key, view.is_selected(position));
    }

    fn check_reached_bottom(&mut self, metrics: ScrollMetrics) {
        if self.scroll.check_reached_bottom(metrics) {
            if let Some(f) = &self.options.on_reached_bottom {
                f();
            }
        }
    }

    fn supplementary_metrics(
        &self,
        section: usize,
        kind: CellKind,
    ) -> Option<SupplementaryMetrics> {
        let s = self.sections.get(section)?;
        let (present, estimate) = match kind {
            CellKind::Header => (s.has_header, s.estimated_header_height),
            CellKind::Footer => (s.has_footer, s.estimated_footer_height),
            CellKind::Content => return None,
        };
        if !present {
            return None;
        }
        let context = SelfSizingContext {
            kind,
            position: Position::new(section, 0),
        };
        Some(SupplementaryMetrics {
            estimated_height: estimate.unwrap_or(self.options.default_supplementary_height),
            self_sizing: s.source().self_sizing(context).unwrap_or_default(),
        })
    }
}

impl<S: ListKey + 'static, C: Clone> ViewEventSink for ListCoordinator<S, C> {
    fn attached(&mut self, view: &mut dyn ListView) {
        if !self.scroll.begin_initial_setup() {
            return;
        }
        vdebug!(sections = self.sections.len(), "ListCoordinator::attached");
        view.apply_settings(&self.options.settings);
        self.configure_refresh_control(view);
        self.populate(view, false);
        if let Some(position) = self.options.initial_position {
            self.scroll.scroll_to_initial(view, position);
        }
        self.check_reached_bottom(view.scroll_metrics());
    }

    fn detached(&mut self) {
        vdebug!("ListCoordinator::detached");
        self.scroll.detach();
    }

    fn cell_for_row(&mut self, view: &mut dyn ListView, position: Position) -> Option<CellId> {
        let key = self.reconciler.applied().item_key_at(position)?;
        let section_index = self.section_index_for(&key)?;
        let context = SelfSizingContext {
            kind: CellKind::Content,
            position,
        };
        let sizing = self.sections[section_index]
            .source()
            .self_sizing(context)
            .unwrap_or_default();

        let id = self.cells.dequeue();
        if let Some(cell) = self.cells.get_mut(id) {
            cell.set_self_sizing(sizing);
        }
        self.configure_cell(id, key, view.is_selected(position));
        Some(id)
    }

    fn will_display(&mut self, _cell: CellId, position: Position) {
        if let Some(section) = self.sections.get_mut(position.section) {
            section.source_mut().on_appear(position);
        }
    }

    fn did_end_display(&mut self, cell: CellId, position: Position) {
        if let Some(section) = self.sections.get_mut(position.section) {
            section.source_mut().on_disappear(position);
        }
        self.cells.recycle(cell);
    }

    fn did_select(&mut self, view: &mut dyn ListView, position: Position) {
        self.sync_selection(view);
        self.reconfigure_at(view, position);
    }

    fn did_deselect(&mut self, view: &mut dyn ListView, position: Position) {
        self.sync_selection(view);
        self.reconfigure_at(view, position);
    }

    fn prefetch(&mut self, positions: &[Position]) {
        for (section, group) in group_by_section(positions) {
            let Some(s) = self.sections.get_mut(section) else {
                vtrace!(section, "ListCoordinator: prefetch for missing section");
                continue;
            };
            s.source_mut().prefetch(&group);
        }
    }

    fn cancel_prefetch(&mut self, positions: &[Position]) {
        for (section, group) in group_by_section(positions) {
            if let Some(s) = self.sections.get_mut(section) {
                s.source_mut().cancel_prefetch(&group);
            }
        }
    }

    fn supports_delete(&self, position: Position) -> bool {
        self.sections
            .get(position.section)
            .is_some_and(|s| s.source().supports_delete(position))
    }

    fn commit_delete(&mut self, position: Position, completion: DeleteCompletion) {
        match self.sections.get_mut(position.section) {
            Some(s) => s.source_mut().on_delete(position, completion),
            None => completion(false),
        }
    }

    fn did_scroll(&mut self, metrics: ScrollMetrics) {
        if let Some(f) = &self.options.on_scroll {
            f(metrics.content_offset);
        }
        self.check_reached_bottom(metrics);
    }

    fn will_begin_dragging(&mut self) {
        if let Some(f) = &self.options.on_begin_drag {
            f();
        }
    }

    fn did_pull_to_refresh(&mut self) {
        let Some(f) = &self.options.on_pull_to_refresh else {
            return;
        };
        let completion = RefreshCompletion::new();
        self.refreshing = Some(completion.clone());
        f(completion);
    }

    fn cell_needs_layout(&mut self, view: &mut dyn ListView, cell: CellId) {
        if self.cells.is_in_use(cell) {
            view.relayout();
        }
    }

    fn estimated_row_height(&self, section: usize) -> f32 {
        self.sections
            .get(section)
            .and_then(|s| s.estimated_row_height)
            .unwrap_or(self.options.default_row_height)
    }

    fn header_metrics(&self, section: usize) -> Option<SupplementaryMetrics> {
        self.supplementary_metrics(section, CellKind::Header)
    }

    fn footer_metrics(&self, section: usize) -> Option<SupplementaryMetrics> {
        self.supplementary_metrics(section, CellKind::Footer)
    }
}
