use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, Ordering};

use sectionlist::{CacheEviction, Position, SelectionSet};

use crate::{ListId, ViewSettings};

/// Called with the vertical content offset on every scroll event.
pub type ScrollCallback = Arc<dyn Fn(f32) + Send + Sync>;

/// A payload-free notification (drag began, bottom reached).
pub type NotifyCallback = Arc<dyn Fn() + Send + Sync>;

/// Called when the user pulls to refresh. Finish the returned handle once the refresh is done.
pub type RefreshCallback = Arc<dyn Fn(RefreshCompletion) + Send + Sync>;

/// The host's selection binding: receives the section-keyed projection after every change.
pub type SelectionCallback<S> = Arc<dyn Fn(&SelectionSet<S>) + Send + Sync>;

/// Completion handle for an in-flight pull-to-refresh.
///
/// Finishing is thread-safe; the refresh indicator is dismissed on the list's next
/// [`crate::ListCoordinator::poll`].
#[derive(Clone, Debug, Default)]
pub struct RefreshCompletion {
    finished: Arc<AtomicBool>,
}

impl RefreshCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(&self) {
        self.finished.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }
}

/// Configuration for [`crate::ListCoordinator`].
///
/// Callbacks are stored in `Arc`s so hosts can clone the options, change a few fields, and hand
/// them back with `ListCoordinator::set_options`.
pub struct ListOptions<S> {
    pub settings: ViewSettings,
    /// Animate batch updates caused by data refreshes.
    pub animate_on_refresh: bool,
    /// Scrolled to (centered, not animated) once, on first attachment.
    pub initial_position: Option<Position>,
    /// Address for targeted bus commands.
    pub list_id: Option<ListId>,
    /// Re-configure every visible cell on each update before diffing.
    pub refresh_visible_cells: bool,
    /// Keep the first visible item in place across updates.
    pub preserve_scroll_anchor: bool,
    pub controller_eviction: CacheEviction,
    /// Fallback when a section has no row-height estimate.
    pub default_row_height: f32,
    /// Fallback when a section has no header/footer height estimate.
    pub default_supplementary_height: f32,
    pub on_pull_to_refresh: Option<RefreshCallback>,
    pub on_scroll: Option<ScrollCallback>,
    pub on_begin_drag: Option<NotifyCallback>,
    pub on_reached_bottom: Option<NotifyCallback>,
    pub on_selection_change: Option<SelectionCallback<S>>,
}

impl<S> Clone for ListOptions<S> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings,
            animate_on_refresh: self.animate_on_refresh,
            initial_position: self.initial_position,
            list_id: self.list_id,
            refresh_visible_cells: self.refresh_visible_cells,
            preserve_scroll_anchor: self.preserve_scroll_anchor,
            controller_eviction: self.controller_eviction,
            default_row_height: self.default_row_height,
            default_supplementary_height: self.default_supplementary_height,
            on_pull_to_refresh: self.on_pull_to_refresh.clone(),
            on_scroll: self.on_scroll.clone(),
            on_begin_drag: self.on_begin_drag.clone(),
            on_reached_bottom: self.on_reached_bottom.clone(),
            on_selection_change: self.on_selection_change.clone(),
        }
    }
}

impl<S> Default for ListOptions<S> {
    fn default() -> Self {
        Self {
            settings: ViewSettings::default(),
            animate_on_refresh: true,
            initial_position: None,
            list_id: None,
            refresh_visible_cells: true,
            preserve_scroll_anchor: false,
            controller_eviction: CacheEviction::default(),
            default_row_height: 50.0,
            default_supplementary_height: 50.0,
            on_pull_to_refresh: None,
            on_scroll: None,
            on_begin_drag: None,
            on_reached_bottom: None,
            on_selection_change: None,
        }
    }
}

impl<S> ListOptions<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: ViewSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_editing(mut self, editing: bool) -> Self {
        self.settings.editing = editing;
        self
    }

    pub fn with_animate_on_refresh(mut self, animate: bool) -> Self {
        self.animate_on_refresh = animate;
        self
    }

    pub fn with_initial_position(mut self, position: Option<Position>) -> Self {
        self.initial_position = position;
        self
    }

    pub fn with_list_id(mut self, id: Option<ListId>) -> Self {
        self.list_id = id;
        self
    }

    pub fn with_refresh_visible_cells(mut self, refresh: bool) -> Self {
        self.refresh_visible_cells = refresh;
        self
    }

    pub fn with_preserve_scroll_anchor(mut self, preserve: bool) -> Self {
        self.preserve_scroll_anchor = preserve;
        self
    }

    pub fn with_controller_eviction(mut self, eviction: CacheEviction) -> Self {
        self.controller_eviction = eviction;
        self
    }

    pub fn with_default_heights(mut self, row: f32, supplementary: f32) -> Self {
        self.default_row_height = row;
        self.default_supplementary_height = supplementary;
        self
    }

    pub fn with_on_pull_to_refresh(
        mut self,
        f: Option<impl Fn(RefreshCompletion) + Send + Sync + 'static>,
    ) -> Self {
        self.on_pull_to_refresh = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_scroll(mut self, f: Option<impl Fn(f32) + Send + Sync + 'static>) -> Self {
        self.on_scroll = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_begin_drag(mut self, f: Option<impl Fn() + Send + Sync + 'static>) -> Self {
        self.on_begin_drag = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_reached_bottom(
        mut self,
        f: Option<impl Fn() + Send + Sync + 'static>,
    ) -> Self {
        self.on_reached_bottom = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_selection_change(
        mut self,
        f: Option<impl Fn(&SelectionSet<S>) + Send + Sync + 'static>,
    ) -> Self {
        self.on_selection_change = f.map(|f| Arc::new(f) as _);
        self
    }
}

impl<S> core::fmt::Debug for ListOptions<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListOptions")
            .field("settings", &self.settings)
            .field("animate_on_refresh", &self.animate_on_refresh)
            .field("initial_position", &self.initial_position)
            .field("list_id", &self.list_id)
            .field("refresh_visible_cells", &self.refresh_visible_cells)
            .field("preserve_scroll_anchor", &self.preserve_scroll_anchor)
            .field("controller_eviction", &self.controller_eviction)
            .field("default_row_height", &self.default_row_height)
            .field(
                "default_supplementary_height",
                &self.default_supplementary_height,
            )
            .field("on_pull_to_refresh", &self.on_pull_to_refresh.is_some())
            .field("on_scroll", &self.on_scroll.is_some())
            .field("on_begin_drag", &self.on_begin_drag.is_some())
            .field("on_reached_bottom", &self.on_reached_bottom.is_some())
            .field("on_selection_change", &self.on_selection_change.is_some())
            .finish()
    }
}
