//! Inventory item stacks.

use crate::RegistryKey;
use serde::{Deserialize, Serialize};

/// An item stack held by a player or produced into the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item identifier.
    pub item: RegistryKey,
    /// Quantity in stack.
    pub count: u32,
}

impl ItemStack {
    /// Create a new item stack.
    pub fn new(item: RegistryKey, count: u32) -> Self {
        Self { item, count }
    }

    /// Whether this stack holds `item`.
    pub fn is(&self, item: &RegistryKey) -> bool {
        &self.item == item
    }

    /// Take one item off the stack. Returns `None` once the stack is used up,
    /// which is how hosts represent an emptied slot.
    pub fn consume_one(mut self) -> Option<Self> {
        self.count = self.count.saturating_sub(1);
        (self.count > 0).then_some(self)
    }
}
