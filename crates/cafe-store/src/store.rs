//! # Entity Store
//!
//! The single owner of every collection in the back office.
//!
//! ## Thread Safety
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Store Locking Model                              │
//! │                                                                         │
//! │   Store (Clone) ──► Arc<Inner>                                         │
//! │                       ├── RwLock<StoreState>   tables, menu, stock,    │
//! │                       │                        recipes, orders, version│
//! │                       ├── StoreSettings        fixed at construction   │
//! │                       └── EventBus             broadcast::Sender       │
//! │                                                                         │
//! │   Queries   ──► read guard  ──► clone snapshot ──► release            │
//! │   Mutations ──► write guard ──► validate ──► apply ──► publish        │
//! │                                                                         │
//! │   A multi-record change (order + table, order + stock) happens under   │
//! │   ONE write guard, so no reader ever sees half of it.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A poisoned lock is recovered rather than propagated: every mutation
//! validates before it writes, so a panic cannot leave a half-applied change.
//!
//! The mutations themselves live next to their domain: [`crate::tables`],
//! [`crate::menu`], [`crate::inventory`], [`crate::recipes`],
//! [`crate::orders`].

use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use cafe_core::validation::{validate_capacity, validate_tax_rate_bps};
use cafe_core::{
    CoreError, CoreResult, EntityKind, InventoryItem, MenuItem, Order, Recipe, Table, TaxRate,
    ValidationError,
};

use crate::config::StoreConfig;
use crate::consumption::ConsumptionPolicy;
use crate::events::{EventBus, StoreChange, StoreEvent, DEFAULT_CHANNEL_CAPACITY};

// =============================================================================
// Store State
// =============================================================================

/// Everything behind the lock. Collections keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub(crate) tables: Vec<Table>,
    pub(crate) menu_items: Vec<MenuItem>,
    pub(crate) inventory: Vec<InventoryItem>,
    pub(crate) recipes: Vec<Recipe>,
    pub(crate) orders: Vec<Order>,
    pub(crate) version: u64,
}

impl StoreState {
    pub(crate) fn table_index(&self, id: &str) -> CoreResult<usize> {
        self.tables
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Table, id))
    }

    pub(crate) fn menu_item_index(&self, id: &str) -> CoreResult<usize> {
        self.menu_items
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| CoreError::not_found(EntityKind::MenuItem, id))
    }

    pub(crate) fn inventory_index(&self, id: &str) -> CoreResult<usize> {
        self.inventory
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| CoreError::not_found(EntityKind::InventoryItem, id))
    }

    pub(crate) fn recipe_index(&self, id: &str) -> CoreResult<usize> {
        self.recipes
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Recipe, id))
    }

    pub(crate) fn order_index(&self, id: &str) -> CoreResult<usize> {
        self.orders
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Order, id))
    }
}

/// Owned copy of the whole store, for export and debugging.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub version: u64,
    pub tables: Vec<Table>,
    pub menu_items: Vec<MenuItem>,
    pub inventory: Vec<InventoryItem>,
    pub recipes: Vec<Recipe>,
    pub orders: Vec<Order>,
}

// =============================================================================
// Settings
// =============================================================================

/// Behaviour fixed when the store is built.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    /// Printed on bills.
    pub name: String,
    pub tax_rate: TaxRate,
    pub consumption: ConsumptionPolicy,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: "Cafe POS".to_string(),
            tax_rate: TaxRate::default(),
            consumption: ConsumptionPolicy::default(),
        }
    }
}

impl From<&StoreConfig> for StoreSettings {
    fn from(config: &StoreConfig) -> Self {
        StoreSettings {
            name: config.store.name.clone(),
            tax_rate: config.tax_rate(),
            consumption: config.inventory.consumption,
        }
    }
}

// =============================================================================
// Mutation Context
// =============================================================================

/// Handed to mutation closures while the write guard is held.
pub(crate) struct Mutation<'a> {
    pub(crate) state: &'a mut StoreState,
    pub(crate) settings: &'a StoreSettings,
    events: Vec<StoreEvent>,
}

impl Mutation<'_> {
    /// Queues an event; published only if the closure succeeds.
    pub(crate) fn emit(&mut self, event: StoreEvent) {
        self.events.push(event);
    }
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Store
// =============================================================================

#[derive(Debug)]
struct Inner {
    state: RwLock<StoreState>,
    settings: StoreSettings,
    events: EventBus,
}

/// The shared domain store.
///
/// Cheap to clone; every clone sees the same state.
///
/// ## Example
/// ```rust
/// use cafe_store::{Store, StoreConfig};
///
/// let store = Store::new(&StoreConfig::default()).unwrap();
/// let table = store.tables()[0].clone();
///
/// let order = store.create_order(&table.id, "Alice").unwrap();
/// assert!(store.table(&table.id).unwrap().is_occupied());
/// assert_eq!(store.order(&order.id).unwrap().total_cents, 0);
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

impl Store {
    /// Builds a store with the tables and settings from `config`.
    ///
    /// ## Errors
    /// - `Validation` for no tables, a seat count outside 1..=50, a tax
    ///   rate above 100% or an event channel capacity of 0
    pub fn new(config: &StoreConfig) -> CoreResult<Self> {
        if config.tables.seats.is_empty() {
            return Err(ValidationError::Required {
                field: "tables".to_string(),
            }
            .into());
        }
        for capacity in &config.tables.seats {
            validate_capacity(*capacity)?;
        }
        validate_tax_rate_bps(config.billing.tax_rate_bps)?;
        if config.events.channel_capacity == 0 {
            return Err(ValidationError::MustBePositive {
                field: "event channel capacity".to_string(),
            }
            .into());
        }

        let store = Self::from_parts(
            StoreSettings::from(config),
            &config.tables.seats,
            config.events.channel_capacity,
        );
        info!(
            name = %config.store.name,
            tables = config.tables.seats.len(),
            consumption = %config.inventory.consumption,
            "Store initialized"
        );
        Ok(store)
    }

    /// Builds a store with default settings and one table per capacity,
    /// numbered from 1.
    pub fn with_tables(capacities: &[u32]) -> CoreResult<Self> {
        for capacity in capacities {
            validate_capacity(*capacity)?;
        }
        Ok(Self::from_parts(
            StoreSettings::default(),
            capacities,
            DEFAULT_CHANNEL_CAPACITY,
        ))
    }

    /// Builds a store with explicit settings.
    pub fn with_settings(settings: StoreSettings, capacities: &[u32]) -> CoreResult<Self> {
        for capacity in capacities {
            validate_capacity(*capacity)?;
        }
        Ok(Self::from_parts(settings, capacities, DEFAULT_CHANNEL_CAPACITY))
    }

    fn from_parts(settings: StoreSettings, capacities: &[u32], channel_capacity: usize) -> Self {
        let tables = capacities
            .iter()
            .zip(1u32..)
            .map(|(capacity, number)| Table::new(new_id(), number, *capacity))
            .collect();

        Store {
            inner: Arc::new(Inner {
                state: RwLock::new(StoreState {
                    tables,
                    ..StoreState::default()
                }),
                settings,
                events: EventBus::new(channel_capacity),
            }),
        }
    }

    /// Settings the store was built with.
    pub fn settings(&self) -> &StoreSettings {
        &self.inner.settings
    }

    // =========================================================================
    // Locking
    // =========================================================================

    fn read_state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` under the read guard.
    pub(crate) fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        let guard = self.read_state();
        f(&guard)
    }

    /// Runs `f` under the write guard, then bumps the version and publishes
    /// once per emitted event. On error nothing is published.
    pub(crate) fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Mutation<'_>) -> CoreResult<T>,
    ) -> CoreResult<T> {
        let mut guard = self.write_state();

        let mut mutation = Mutation {
            state: &mut *guard,
            settings: &self.inner.settings,
            events: Vec::new(),
        };
        let value = f(&mut mutation)?;
        let events = mutation.events;

        for event in events {
            guard.version += 1;
            debug!(version = guard.version, ?event, "Store changed");
            self.inner.events.publish(StoreChange {
                version: guard.version,
                event,
            });
        }

        Ok(value)
    }

    // =========================================================================
    // Change Notifications
    // =========================================================================

    /// Subscribes to every change published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.inner.events.subscribe()
    }

    /// Live receivers on the change feed.
    pub fn subscriber_count(&self) -> usize {
        self.inner.events.subscriber_count()
    }

    /// Monotonic change counter.
    pub fn version(&self) -> u64 {
        self.read(|s| s.version)
    }

    /// True if anything changed after `version` was observed.
    pub fn changed_since(&self, version: u64) -> bool {
        self.version() > version
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn tables(&self) -> Vec<Table> {
        self.read(|s| s.tables.clone())
    }

    pub fn table(&self, id: &str) -> Option<Table> {
        self.read(|s| s.tables.iter().find(|t| t.id == id).cloned())
    }

    pub fn menu_items(&self) -> Vec<MenuItem> {
        self.read(|s| s.menu_items.clone())
    }

    pub fn menu_item(&self, id: &str) -> Option<MenuItem> {
        self.read(|s| s.menu_items.iter().find(|m| m.id == id).cloned())
    }

    pub fn inventory(&self) -> Vec<InventoryItem> {
        self.read(|s| s.inventory.clone())
    }

    pub fn inventory_item(&self, id: &str) -> Option<InventoryItem> {
        self.read(|s| s.inventory.iter().find(|i| i.id == id).cloned())
    }

    pub fn recipes(&self) -> Vec<Recipe> {
        self.read(|s| s.recipes.clone())
    }

    pub fn recipe(&self, id: &str) -> Option<Recipe> {
        self.read(|s| s.recipes.iter().find(|r| r.id == id).cloned())
    }

    pub fn recipe_for_menu_item(&self, menu_item_id: &str) -> Option<Recipe> {
        self.read(|s| {
            s.recipes
                .iter()
                .find(|r| r.menu_item_id == menu_item_id)
                .cloned()
        })
    }

    pub fn orders(&self) -> Vec<Order> {
        self.read(|s| s.orders.clone())
    }

    pub fn order(&self, id: &str) -> Option<Order> {
        self.read(|s| s.orders.iter().find(|o| o.id == id).cloned())
    }

    /// Orders still open, in creation order.
    pub fn active_orders(&self) -> Vec<Order> {
        self.read(|s| s.orders.iter().filter(|o| o.is_active()).cloned().collect())
    }

    /// Consistent copy of every collection taken under one read guard.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.read(|s| StoreSnapshot {
            version: s.version,
            tables: s.tables.clone(),
            menu_items: s.menu_items.clone(),
            inventory: s.inventory.clone(),
            recipes: s.recipes.clone(),
            orders: s.orders.clone(),
        })
    }
}

impl Default for Store {
    fn default() -> Self {
        let config = StoreConfig::default();
        Self::from_parts(
            StoreSettings::from(&config),
            &config.tables.seats,
            config.events.channel_capacity,
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_core::TableStatus;

    #[test]
    fn test_new_rejects_bad_seat_counts() {
        let mut config = StoreConfig::default();
        config.tables.seats = vec![4, 0];
        let err = Store::new(&config).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MustBePositive { .. })
        ));

        config.tables.seats.clear();
        assert!(matches!(
            Store::new(&config),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }

    #[test]
    fn test_new_rejects_zero_channel_capacity() {
        let mut config = StoreConfig::default();
        config.events.channel_capacity = 0;
        let err = Store::new(&config).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MustBePositive { ref field })
                if field == "event channel capacity"
        ));

        config.events.channel_capacity = 1;
        config.billing.tax_rate_bps = 10_001;
        assert!(Store::new(&config).is_err());

        config.billing.tax_rate_bps = 1_000;
        assert_eq!(Store::new(&config).unwrap().tables().len(), 8);
    }

    #[test]
    fn test_with_tables_numbers_from_one() {
        let store = Store::with_tables(&[2, 4, 6]).unwrap();
        let tables = store.tables();

        assert_eq!(tables.len(), 3);
        assert_eq!(
            tables.iter().map(|t| t.number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(tables[2].capacity, 6);
        assert!(tables.iter().all(|t| t.status == TableStatus::Available));
        assert!(tables.iter().all(|t| t.current_order_id.is_none()));
    }

    #[test]
    fn test_with_tables_rejects_zero_capacity() {
        assert!(Store::with_tables(&[4, 0]).is_err());
    }

    #[test]
    fn test_default_store_uses_default_config() {
        let store = Store::default();
        assert_eq!(store.tables().len(), 8);
        assert_eq!(store.settings().tax_rate.bps(), 1000);
        assert_eq!(store.settings().consumption, ConsumptionPolicy::Disabled);
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_missing_lookups_return_none() {
        let store = Store::with_tables(&[2]).unwrap();
        assert!(store.table("nope").is_none());
        assert!(store.order("nope").is_none());
        assert!(store.menu_item("nope").is_none());
        assert!(store.inventory_item("nope").is_none());
        assert!(store.recipe("nope").is_none());
        assert!(store.recipe_for_menu_item("nope").is_none());
    }

    #[test]
    fn test_failed_mutation_publishes_nothing() {
        let store = Store::with_tables(&[2]).unwrap();
        let mut rx = store.subscribe();

        let result: CoreResult<()> = store.mutate(|m| {
            m.emit(StoreEvent::OrderItemsReplaced {
                order_id: "o-1".to_string(),
            });
            Err(CoreError::not_found(EntityKind::Order, "o-1"))
        });

        assert!(result.is_err());
        assert_eq!(store.version(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_clones_share_state() {
        let store = Store::with_tables(&[2]).unwrap();
        let other = store.clone();
        let table_id = store.tables()[0].id.clone();

        other.create_order(&table_id, "Alice").unwrap();
        assert!(store.table(&table_id).unwrap().is_occupied());
        assert!(store.changed_since(0));
    }
}
