//! Inventory owned by an actor.
//!
//! The inventory is the only owner of the items it holds; equipment slots
//! refer back into it by id.

use crate::config::GameConfig;
use crate::state::types::{EntityId, ItemState};

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryState {
    capacity: usize,
    items: Vec<ItemState>,
}

impl InventoryState {
    /// Capacity is clamped to [`GameConfig::MAX_INVENTORY`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.min(GameConfig::MAX_INVENTORY),
            items: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn items(&self) -> &[ItemState] {
        &self.items
    }

    pub fn get(&self, id: EntityId) -> Option<&ItemState> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut ItemState> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Item at a display slot (0-based).
    pub fn slot(&self, index: usize) -> Option<&ItemState> {
        self.items.get(index)
    }

    /// Adds an item, handing it back if there is no room.
    pub fn insert(&mut self, item: ItemState) -> Result<(), ItemState> {
        if self.is_full() {
            return Err(item);
        }
        self.items.push(item);
        Ok(())
    }

    pub fn remove(&mut self, id: EntityId) -> Option<ItemState> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn first_healing(&self) -> Option<&ItemState> {
        self.items.iter().find(|item| item.is_healing())
    }
}
