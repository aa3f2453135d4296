//! # Store Change Notifications
//!
//! Every successful mutation bumps the store version and broadcasts what
//! changed. Screens either subscribe or poll `version()`.
//!
//! ## Notification Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Change Notification Flow                           │
//! │                                                                         │
//! │  store.complete_order(id)                                              │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  write guard held ──► order + table updated ──► version += 1           │
//! │                                                    │                    │
//! │                                                    ▼                    │
//! │                         StoreChange { version, OrderCompleted }        │
//! │                                                    │                    │
//! │                 ┌──────────────────┬───────────────┘                    │
//! │                 ▼                  ▼                                    │
//! │            KOT display        Dashboard        (broadcast receivers)   │
//! │                                                                         │
//! │  Pollers: compare store.version() with the last version they rendered. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failed mutations publish nothing and leave the version alone.

use serde::Serialize;
use tokio::sync::broadcast;
use ts_rs::TS;

use cafe_core::{OrderItemStatus, TableStatus};

/// Default number of changes a slow subscriber may fall behind by.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

// =============================================================================
// Events
// =============================================================================

/// What a mutation changed.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    TableStatusChanged {
        table_id: String,
        status: TableStatus,
    },
    MenuItemAdded {
        menu_item_id: String,
    },
    MenuItemUpdated {
        menu_item_id: String,
    },
    MenuItemDeleted {
        menu_item_id: String,
        /// Id of the recipe removed along with the item.
        recipe_id: Option<String>,
    },
    InventoryItemAdded {
        inventory_item_id: String,
    },
    InventoryItemUpdated {
        inventory_item_id: String,
    },
    /// Stock drawn down, by hand or through the consumption hook.
    InventoryConsumed {
        inventory_item_ids: Vec<String>,
    },
    RecipeSaved {
        recipe_id: String,
        menu_item_id: String,
    },
    OrderCreated {
        order_id: String,
        table_id: String,
    },
    OrderItemAdded {
        order_id: String,
        menu_item_id: String,
    },
    OrderItemsReplaced {
        order_id: String,
    },
    OrderItemStatusChanged {
        order_id: String,
        menu_item_id: String,
        status: OrderItemStatus,
    },
    OrderCompleted {
        order_id: String,
        table_id: String,
    },
    OrderCancelled {
        order_id: String,
        table_id: String,
    },
}

/// A versioned event as seen by subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StoreChange {
    /// Store version after this change was applied.
    #[ts(type = "number")]
    pub version: u64,
    pub event: StoreEvent,
}

// =============================================================================
// Event Bus
// =============================================================================

/// Broadcast side of the store's change feed.
#[derive(Debug)]
pub(crate) struct EventBus {
    tx: broadcast::Sender<StoreChange>,
}

impl EventBus {
    pub(crate) fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        EventBus { tx }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.tx.subscribe()
    }

    /// Publishes a change. Having no subscribers is fine.
    pub(crate) fn publish(&self, change: StoreChange) {
        let _ = self.tx.send(change);
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
