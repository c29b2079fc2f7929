use alloc::vec::Vec;

use sectionlist::{ItemUniqueKey, SelfSizingConfig};
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle of a cell owned by a [`CellRegistry`].
    pub struct CellId;
}

/// A reusable row cell: the item it currently shows plus the controller hosting its content.
#[derive(Clone, Debug)]
pub struct ListCell<C> {
    item_key: Option<ItemUniqueKey>,
    controller: Option<C>,
    is_selected: bool,
    self_sizing: SelfSizingConfig,
    pooled: bool,
}

impl<C> Default for ListCell<C> {
    fn default() -> Self {
        Self {
            item_key: None,
            controller: None,
            is_selected: false,
            self_sizing: SelfSizingConfig::default(),
            pooled: false,
        }
    }
}

impl<C> ListCell<C> {
    pub fn item_key(&self) -> Option<ItemUniqueKey> {
        self.item_key
    }

    pub fn controller(&self) -> Option<&C> {
        self.controller.as_ref()
    }

    pub fn controller_mut(&mut self) -> Option<&mut C> {
        self.controller.as_mut()
    }

    pub fn set_controller(&mut self, controller: C) {
        self.controller = Some(controller);
    }

    pub fn take_controller(&mut self) -> Option<C> {
        self.controller.take()
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    pub fn self_sizing(&self) -> SelfSizingConfig {
        self.self_sizing
    }

    pub(crate) fn bind(&mut self, key: ItemUniqueKey, is_selected: bool) {
        self.item_key = Some(key);
        self.is_selected = is_selected;
    }

    pub(crate) fn set_self_sizing(&mut self, config: SelfSizingConfig) {
        self.self_sizing = config;
    }

    fn prepare_for_reuse(&mut self) {
        self.item_key = None;
        self.controller = None;
        self.is_selected = false;
        self.self_sizing = SelfSizingConfig::default();
    }
}

/// Owns every row cell and hands recycled ones back out before allocating.
#[derive(Clone, Debug)]
pub struct CellRegistry<C> {
    cells: SlotMap<CellId, ListCell<C>>,
    reusable: Vec<CellId>,
}

impl<C> Default for CellRegistry<C> {
    fn default() -> Self {
        Self {
            cells: SlotMap::with_key(),
            reusable: Vec::new(),
        }
    }
}

impl<C> CellRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a blank cell, reusing a recycled one when available.
    pub fn dequeue(&mut self) -> CellId {
        while let Some(id) = self.reusable.pop() {
            if let Some(cell) = self.cells.get_mut(id) {
                cell.pooled = false;
                return id;
            }
        }
        self.cells.insert(ListCell::default())
    }

    /// Clears `id` and puts it back into the reuse pool.
    ///
    /// Returns `false` for unknown or already recycled cells.
    pub fn recycle(&mut self, id: CellId) -> bool {
        let Some(cell) = self.cells.get_mut(id) else {
            return false;
        };
        if cell.pooled {
            return false;
        }
        cell.prepare_for_reuse();
        cell.pooled = true;
        self.reusable.push(id);
        true
    }

    pub fn get(&self, id: CellId) -> Option<&ListCell<C>> {
        self.cells.get(id)
    }

    pub fn get_mut(&mut self, id: CellId) -> Option<&mut ListCell<C>> {
        self.cells.get_mut(id)
    }

    /// Total cells ever allocated and still owned.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn in_use(&self) -> usize {
        self.cells.len() - self.reusable.len()
    }

    pub fn is_in_use(&self, id: CellId) -> bool {
        self.cells.get(id).is_some_and(|cell| !cell.pooled)
    }
}
