use alloc::vec::Vec;

use sectionlist::{Align, Changeset, Position, ScrollMetrics, SelfSizingConfig};

use crate::{CellId, DeleteCompletion};

/// Content insets of the scroll view, in points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeInsets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

/// Pass-through appearance settings pushed to the view on every update.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewSettings {
    pub separators_enabled: bool,
    pub content_insets: EdgeInsets,
    pub always_bounce_vertical: bool,
    pub scroll_indicators_enabled: bool,
    /// Edit mode. Selection (single and multiple) is only available while editing.
    pub editing: bool,
}

impl ViewSettings {
    pub fn allows_selection(&self) -> bool {
        self.editing
    }

    pub fn allows_multiple_selection(&self) -> bool {
        self.editing
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            separators_enabled: true,
            content_insets: EdgeInsets::default(),
            always_bounce_vertical: false,
            scroll_indicators_enabled: true,
            editing: false,
        }
    }
}

/// The first row in the viewport and how far the viewport has scrolled past its leading edge.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleItem {
    pub position: Position,
    pub offset_in_viewport: f32,
}

/// The imperative list view driven by [`crate::ListCoordinator`].
///
/// Implementations wrap a platform table/list widget. They must not call back into the
/// coordinator from inside these methods; cells for inserted or reloaded rows are requested
/// later through [`crate::ViewEventSink::cell_for_row`].
pub trait ListView {
    /// Performs `changes` as one batch update.
    ///
    /// With `animated == false` no transition may be animated, but every change is still applied.
    fn perform_updates(&mut self, changes: &Changeset, animated: bool);

    /// The natively selected positions. This is the authoritative selection state.
    fn selected_positions(&self) -> Vec<Position>;

    fn is_selected(&self, position: Position) -> bool {
        self.selected_positions().contains(&position)
    }

    fn set_selected(&mut self, position: Position, selected: bool);

    /// Cells currently on screen.
    fn visible_cells(&self) -> Vec<CellId>;

    /// The cell displayed at `position`, if it is on screen.
    fn cell_at(&self, position: Position) -> Option<CellId>;

    fn scroll_metrics(&self) -> ScrollMetrics;

    fn scroll_to_position(&mut self, position: Position, align: Align, animated: bool);

    /// Scrolls so the leading edge of `section` lines up with `align`.
    fn scroll_to_section(&mut self, section: usize, align: Align, animated: bool);

    fn apply_settings(&mut self, settings: &ViewSettings);

    /// Installs (`true`) or removes the pull-to-refresh control.
    fn set_refresh_control(&mut self, installed: bool);

    fn end_refreshing(&mut self);

    /// Re-runs layout without changing the data (row heights may have changed).
    fn relayout(&mut self);

    /// Views that cannot report this disable scroll anchoring.
    fn first_visible_item(&self) -> Option<VisibleItem> {
        None
    }

    fn scroll_item_to(&mut self, position: Position, offset_in_viewport: f32) {
        let _ = (position, offset_in_viewport);
    }
}

/// Layout metrics of a section header or footer.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupplementaryMetrics {
    pub estimated_height: f32,
    pub self_sizing: SelfSizingConfig,
}

/// Events and queries the list view sends to its coordinator.
pub trait ViewEventSink {
    /// The view entered the hierarchy.
    fn attached(&mut self, view: &mut dyn ListView);

    /// The view left the hierarchy.
    fn detached(&mut self);

    /// Returns a configured cell for `position`, or `None` if the position is stale.
    fn cell_for_row(&mut self, view: &mut dyn ListView, position: Position) -> Option<CellId>;

    fn will_display(&mut self, cell: CellId, position: Position);

    /// The cell scrolled off screen and may be reused.
    fn did_end_display(&mut self, cell: CellId, position: Position);

    fn did_select(&mut self, view: &mut dyn ListView, position: Position);

    fn did_deselect(&mut self, view: &mut dyn ListView, position: Position);

    fn prefetch(&mut self, positions: &[Position]);

    fn cancel_prefetch(&mut self, positions: &[Position]);

    fn supports_delete(&self, position: Position) -> bool;

    fn commit_delete(&mut self, position: Position, completion: DeleteCompletion);

    fn did_scroll(&mut self, metrics: ScrollMetrics);

    fn will_begin_dragging(&mut self);

    fn did_pull_to_refresh(&mut self);

    /// A cell's content changed size.
    fn cell_needs_layout(&mut self, view: &mut dyn ListView, cell: CellId);

    fn estimated_row_height(&self, section: usize) -> f32;

    /// `None` when the section has no header.
    fn header_metrics(&self, section: usize) -> Option<SupplementaryMetrics>;

    /// `None` when the section has no footer.
    fn footer_metrics(&self, section: usize) -> Option<SupplementaryMetrics>;
}
