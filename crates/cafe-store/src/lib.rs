//! # cafe-store: Shared Domain Store for the Cafe POS Back Office
//!
//! One [`Store`] owns every table, menu item, stock item, recipe and order.
//! Screens query it, mutate it, and subscribe to its change feed.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      cafe-store Architecture                            │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         Store (store.rs)                         │  │
//! │  │        Arc<RwLock<StoreState>> + settings + EventBus             │  │
//! │  └───────┬──────────┬──────────┬──────────┬──────────┬─────────────┘  │
//! │          │          │          │          │          │                 │
//! │     ┌────▼───┐ ┌────▼───┐ ┌────▼────┐ ┌───▼────┐ ┌───▼────┐           │
//! │     │ tables │ │  menu  │ │inventory│ │recipes │ │ orders │           │
//! │     └────────┘ └────────┘ └────▲────┘ └────────┘ └───┬────┘           │
//! │                                │                     │                 │
//! │                                └──── consumption ◄───┘                 │
//! │                                                                         │
//! │  reports: dashboard · kitchen queue · bill     (read-only projections) │
//! │  events:  StoreChange { version, event }       (tokio broadcast)       │
//! │  config:  store.toml + CAFE_* env              (loaded once at start)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use cafe_core::{MenuCategory, NewMenuItem, OrderItemStatus};
//! use cafe_store::{Store, StoreConfig};
//!
//! let store = Store::new(&StoreConfig::default()).unwrap();
//! let latte = store
//!     .add_menu_item(NewMenuItem::new("Latte", MenuCategory::Coffee, 450))
//!     .unwrap();
//!
//! let table = store.tables()[0].clone();
//! let order = store.create_order(&table.id, "Alice").unwrap();
//! let order = store.add_item_to_order(&order.id, &latte.id, 2, None).unwrap();
//! assert_eq!(order.total_cents, 900);
//!
//! store
//!     .update_order_item_status(&order.id, &latte.id, OrderItemStatus::Preparing)
//!     .unwrap();
//! store.complete_order(&order.id).unwrap();
//! assert!(!store.table(&table.id).unwrap().is_occupied());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod consumption;
pub mod error;
pub mod events;
pub mod inventory;
pub mod menu;
pub mod orders;
pub mod recipes;
pub mod reports;
pub mod seed;
pub mod store;
pub mod tables;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::StoreConfig;
pub use consumption::ConsumptionPolicy;
pub use error::{ConfigError, ConfigResult};
pub use events::{StoreChange, StoreEvent};
pub use inventory::{Shortfall, StockRequirement};
pub use reports::{
    BillLine, BillSummary, DashboardStats, KitchenFilter, KitchenQueue, RECENT_ORDERS_LIMIT,
};
pub use store::{Store, StoreSettings, StoreSnapshot};
pub use tables::TableSummary;
