use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use sectionlist::{
    ItemUniqueKey, KeyMap, ListKey, Position, SectionSnapshot, SelfSizingConfig,
    SelfSizingContext, hash_id,
};

use crate::ListCell;

/// Reports the outcome of a swipe-to-delete: `true` if the row was removed.
pub type DeleteCompletion = Box<dyn FnOnce(bool)>;

/// Provides the items of one section and hosts their content in cells.
///
/// Only `for_each_item` and `configure_cell` are required; the remaining hooks default to
/// doing nothing.
pub trait SectionDataSource<C> {
    /// Emits `(item_hash, revision)` for every item, in display order.
    ///
    /// `item_hash` is the hashed item identifier; `revision` changes whenever the item's rendered
    /// value does.
    fn for_each_item(&self, emit: &mut dyn FnMut(u64, u64));

    /// Fills `cell` with the content for `key`.
    ///
    /// `cached` is the controller previously stored for `key` when the section caches
    /// controllers. Keys this source no longer knows must leave the cell untouched.
    fn configure_cell(
        &mut self,
        cell: &mut ListCell<C>,
        cached: Option<C>,
        key: ItemUniqueKey,
        is_selected: bool,
    );

    fn on_appear(&mut self, position: Position) {
        let _ = position;
    }

    fn on_disappear(&mut self, position: Position) {
        let _ = position;
    }

    /// Positions are all in this section.
    fn prefetch(&mut self, positions: &[Position]) {
        let _ = positions;
    }

    fn cancel_prefetch(&mut self, positions: &[Position]) {
        let _ = positions;
    }

    fn supports_delete(&self, position: Position) -> bool {
        let _ = position;
        false
    }

    fn on_delete(&mut self, position: Position, completion: DeleteCompletion) {
        let _ = position;
        completion(false);
    }

    /// `None` falls back to [`SelfSizingConfig::default`].
    fn self_sizing(&self, context: SelfSizingContext) -> Option<SelfSizingConfig> {
        let _ = context;
        None
    }
}

/// One section of the list: identifier, data source and layout metadata.
pub struct Section<S, C> {
    id: S,
    hash: u64,
    source: Box<dyn SectionDataSource<C>>,
    /// Keep item controllers in the [`sectionlist::ControllerCache`] across updates.
    pub cache_controllers: bool,
    pub estimated_row_height: Option<f32>,
    pub estimated_header_height: Option<f32>,
    pub estimated_footer_height: Option<f32>,
    pub has_header: bool,
    pub has_footer: bool,
}

impl<S: fmt::Debug, C> fmt::Debug for Section<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("id", &self.id)
            .field("cache_controllers", &self.cache_controllers)
            .field("estimated_row_height", &self.estimated_row_height)
            .field("has_header", &self.has_header)
            .field("has_footer", &self.has_footer)
            .finish_non_exhaustive()
    }
}

impl<S: ListKey, C> Section<S, C> {
    pub fn new(id: S, source: impl SectionDataSource<C> + 'static) -> Self {
        let hash = hash_id(&id);
        Self {
            id,
            hash,
            source: Box::new(source),
            cache_controllers: false,
            estimated_row_height: None,
            estimated_header_height: None,
            estimated_footer_height: None,
            has_header: false,
            has_footer: false,
        }
    }

    pub fn id(&self) -> &S {
        &self.id
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn source(&self) -> &dyn SectionDataSource<C> {
        self.source.as_ref()
    }

    pub fn source_mut(&mut self) -> &mut dyn SectionDataSource<C> {
        self.source.as_mut()
    }

    pub fn with_controller_caching(mut self, enabled: bool) -> Self {
        self.cache_controllers = enabled;
        self
    }

    pub fn with_estimated_row_height(mut self, height: Option<f32>) -> Self {
        self.estimated_row_height = height;
        self
    }

    pub fn with_header(mut self, estimated_height: Option<f32>) -> Self {
        self.has_header = true;
        self.estimated_header_height = estimated_height;
        self
    }

    pub fn with_footer(mut self, estimated_height: Option<f32>) -> Self {
        self.has_footer = true;
        self.estimated_footer_height = estimated_height;
        self
    }

    /// Builds this section's snapshot from the data source.
    pub fn snapshot(&self) -> SectionSnapshot<S> {
        let mut out = SectionSnapshot::new(self.id.clone());
        self.source.for_each_item(&mut |hash, revision| {
            out.push_hashed(hash, revision);
        });
        out
    }
}

type ItemHashFn<T> = Box<dyn Fn(&T) -> u64>;
type RenderFn<T, C> = Box<dyn Fn(&T, Option<C>, bool) -> C>;
type DeleteFn<T> = Box<dyn FnMut(&T, usize, DeleteCompletion)>;

/// A [`SectionDataSource`] over a `Vec` of values.
///
/// Items are identified by `item_id`, and a value's hash is its revision.
pub struct DataSection<T, C> {
    data: Vec<T>,
    item_hash: ItemHashFn<T>,
    revision: ItemHashFn<T>,
    render: RenderFn<T, C>,
    on_delete: Option<DeleteFn<T>>,
    self_sizing: Option<SelfSizingConfig>,
    index: KeyMap<u64, usize>,
}

impl<T, C> fmt::Debug for DataSection<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSection")
            .field("len", &self.data.len())
            .field("deletable", &self.on_delete.is_some())
            .field("self_sizing", &self.self_sizing)
            .finish_non_exhaustive()
    }
}

impl<T: Hash + 'static, C: 'static> DataSection<T, C> {
    /// `render(value, cached, is_selected)` produces the controller shown in the cell.
    pub fn new<I: Hash + 'static>(
        data: Vec<T>,
        item_id: impl Fn(&T) -> I + 'static,
        render: impl Fn(&T, Option<C>, bool) -> C + 'static,
    ) -> Self {
        let mut section = Self {
            data: Vec::new(),
            item_hash: Box::new(move |value| hash_id(&item_id(value))),
            revision: Box::new(|value| hash_id(value)),
            render: Box::new(render),
            on_delete: None,
            self_sizing: None,
            index: KeyMap::default(),
        };
        section.set_data(data);
        section
    }
}

impl<T: 'static, C: 'static> DataSection<T, C> {
    /// Replaces the default revision (the value's hash).
    pub fn with_revision<R: Hash + 'static>(mut self, revision: impl Fn(&T) -> R + 'static) -> Self {
        self.revision = Box::new(move |value| hash_id(&revision(value)));
        self
    }

    /// Enables swipe-to-delete. The handler receives the value and its index.
    pub fn with_on_delete(mut self, f: impl FnMut(&T, usize, DeleteCompletion) + 'static) -> Self {
        self.on_delete = Some(Box::new(f));
        self
    }

    pub fn with_self_sizing(mut self, config: SelfSizingConfig) -> Self {
        self.self_sizing = Some(config);
        self
    }
}

impl<T, C> DataSection<T, C> {
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn set_data(&mut self, data: Vec<T>) {
        self.index.clear();
        for (i, value) in data.iter().enumerate() {
            self.index.insert((self.item_hash)(value), i);
        }
        self.data = data;
    }

    pub fn index_of(&self, item_hash: u64) -> Option<usize> {
        self.index.get(&item_hash).copied()
    }
}

impl<T, C> SectionDataSource<C> for DataSection<T, C> {
    fn for_each_item(&self, emit: &mut dyn FnMut(u64, u64)) {
        for value in &self.data {
            emit((self.item_hash)(value), (self.revision)(value));
        }
    }

    fn configure_cell(
        &mut self,
        cell: &mut ListCell<C>,
        cached: Option<C>,
        key: ItemUniqueKey,
        is_selected: bool,
    ) {
        let Some(value) = self.index_of(key.item_hash).and_then(|i| self.data.get(i)) else {
            return;
        };
        cell.set_controller((self.render)(value, cached, is_selected));
    }

    fn supports_delete(&self, position: Position) -> bool {
        self.on_delete.is_some() && position.item < self.data.len()
    }

    fn on_delete(&mut self, position: Position, completion: DeleteCompletion) {
        match (self.on_delete.as_mut(), self.data.get(position.item)) {
            (Some(handler), Some(value)) => handler(value, position.item, completion),
            _ => completion(false),
        }
    }

    fn self_sizing(&self, _context: SelfSizingContext) -> Option<SelfSizingConfig> {
        self.self_sizing
    }
}
