//! # Inventory Ledger
//!
//! Stock levels, the restock threshold, and the single code path that draws
//! stock down.
//!
//! ## Stock Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Stock Level Rules                              │
//! │                                                                         │
//! │  update_inventory_quantity(id, q)   stores max(q, 0)                   │
//! │  consume(requirements)              each level floored at 0,           │
//! │                                     shortfalls reported, not refused   │
//! │                                                                         │
//! │  low stock  ⇔  quantity <= min_quantity     (derived, never cached)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use cafe_core::validation::validate_stock_quantity;
use cafe_core::{
    CoreError, CoreResult, InventoryItem, InventoryItemUpdate, NewInventoryItem, ValidationError,
};

use crate::events::StoreEvent;
use crate::store::{new_id, Store, StoreState};

// =============================================================================
// Types
// =============================================================================

/// An amount of one stocked item to draw down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockRequirement {
    pub inventory_item_id: String,
    pub quantity: f64,
}

impl StockRequirement {
    pub fn new(inventory_item_id: impl Into<String>, quantity: f64) -> Self {
        StockRequirement {
            inventory_item_id: inventory_item_id.into(),
            quantity,
        }
    }
}

/// Stock that was asked for but not on hand.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Shortfall {
    pub inventory_item_id: String,
    pub name: String,
    pub requested: f64,
    pub available: f64,
}

impl Shortfall {
    /// How much was missing.
    pub fn missing(&self) -> f64 {
        self.requested - self.available
    }
}

// =============================================================================
// Ledger (lock held)
// =============================================================================

impl StoreState {
    /// Draws stock down, flooring each level at zero.
    ///
    /// Unknown item ids are skipped with a warning; the public entry point
    /// rejects them before getting here.
    pub(crate) fn consume(&mut self, requirements: &[StockRequirement]) -> Vec<Shortfall> {
        let mut shortfalls = Vec::new();

        for req in requirements {
            let Some(item) = self
                .inventory
                .iter_mut()
                .find(|i| i.id == req.inventory_item_id)
            else {
                warn!(inventory_item_id = %req.inventory_item_id, "Unknown inventory item in requirement");
                continue;
            };

            if req.quantity > item.quantity {
                shortfalls.push(Shortfall {
                    inventory_item_id: item.id.clone(),
                    name: item.name.clone(),
                    requested: req.quantity,
                    available: item.quantity,
                });
            }
            item.quantity = (item.quantity - req.quantity).max(0.0);
        }

        shortfalls
    }
}

/// Low stock filter in store order.
pub fn low_stock(items: &[InventoryItem]) -> Vec<InventoryItem> {
    items.iter().filter(|i| i.is_low_stock()).cloned().collect()
}

// =============================================================================
// Store Operations
// =============================================================================

impl Store {
    /// Adds a stocked item.
    pub fn add_inventory_item(&self, input: NewInventoryItem) -> CoreResult<InventoryItem> {
        input.validate()?;

        self.mutate(|m| {
            let item = InventoryItem {
                id: new_id(),
                name: input.name.trim().to_string(),
                quantity: input.quantity,
                unit: input.unit.trim().to_string(),
                min_quantity: input.min_quantity,
                cost_cents: input.cost_cents,
            };
            debug!(inventory_item_id = %item.id, name = %item.name, "Inventory item added");

            m.state.inventory.push(item.clone());
            m.emit(StoreEvent::InventoryItemAdded {
                inventory_item_id: item.id.clone(),
            });
            Ok(item)
        })
    }

    /// Sets the stock level. Negative values are stored as zero.
    ///
    /// ## Errors
    /// - `Validation` if `quantity` is NaN or infinite
    /// - `NotFound` if the item does not exist
    pub fn update_inventory_quantity(&self, id: &str, quantity: f64) -> CoreResult<InventoryItem> {
        // Negative input is clamped, not refused.
        if !quantity.is_finite() {
            return Err(CoreError::Validation(ValidationError::InvalidFormat {
                field: "quantity".to_string(),
                reason: "must be a finite number".to_string(),
            }));
        }

        self.mutate(|m| {
            let idx = m.state.inventory_index(id)?;
            let item = &mut m.state.inventory[idx];
            item.quantity = quantity.max(0.0);
            debug!(inventory_item_id = %id, quantity = item.quantity, "Stock level set");

            let item = item.clone();
            m.emit(StoreEvent::InventoryItemUpdated {
                inventory_item_id: item.id.clone(),
            });
            Ok(item)
        })
    }

    /// Edits the descriptive fields from the inventory form.
    pub fn update_inventory_item(
        &self,
        id: &str,
        update: InventoryItemUpdate,
    ) -> CoreResult<InventoryItem> {
        update.validate()?;

        self.mutate(|m| {
            let idx = m.state.inventory_index(id)?;
            let item = &mut m.state.inventory[idx];

            if let Some(name) = update.name {
                item.name = name.trim().to_string();
            }
            if let Some(unit) = update.unit {
                item.unit = unit.trim().to_string();
            }
            if let Some(min) = update.min_quantity {
                item.min_quantity = min;
            }
            if let Some(cost) = update.cost_cents {
                item.cost_cents = cost;
            }
            debug!(inventory_item_id = %id, "Inventory item updated");

            let item = item.clone();
            m.emit(StoreEvent::InventoryItemUpdated {
                inventory_item_id: item.id.clone(),
            });
            Ok(item)
        })
    }

    /// Items at or below their restock threshold, in store order.
    pub fn low_stock_items(&self) -> Vec<InventoryItem> {
        self.read(|s| low_stock(&s.inventory))
    }

    /// Draws stock down by hand (waste, staff meals, recipe runs).
    ///
    /// Every requirement is checked before any level changes. Levels are
    /// floored at zero; what could not be covered comes back as shortfalls.
    ///
    /// ## Errors
    /// - `NotFound` for an unknown inventory item
    /// - `Validation` for a negative or non-finite quantity
    pub fn consume(&self, requirements: &[StockRequirement]) -> CoreResult<Vec<Shortfall>> {
        for req in requirements {
            validate_stock_quantity("quantity", req.quantity)?;
        }

        self.mutate(|m| {
            for req in requirements {
                m.state.inventory_index(&req.inventory_item_id)?;
            }

            let shortfalls = m.state.consume(requirements);
            for shortfall in &shortfalls {
                warn!(
                    inventory_item_id = %shortfall.inventory_item_id,
                    missing = shortfall.missing(),
                    "Consumed more than on hand"
                );
            }

            let mut ids: Vec<String> = Vec::new();
            for req in requirements {
                if !ids.contains(&req.inventory_item_id) {
                    ids.push(req.inventory_item_id.clone());
                }
            }
            if !ids.is_empty() {
                m.emit(StoreEvent::InventoryConsumed {
                    inventory_item_ids: ids,
                });
            }
            Ok(shortfalls)
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
