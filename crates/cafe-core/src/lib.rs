//! # cafe-core: Pure Domain Model for the Cafe POS Back Office
//!
//! This crate holds every type the back office screens exchange with the
//! store, together with the pure rules that govern them. It has zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Cafe POS Back Office                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Screens (external): Dashboard, Tables, Orders, Menu,           │   │
//! │  │  Inventory, Recipes, KOT Display, Waiter Mode                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ queries / mutations                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    cafe-store (Store service)                   │   │
//! │  │  tables · menu · inventory · recipes · orders · events          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cafe-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   input   │  │ validation│  │   │
//! │  │   │  Table    │  │   Money   │  │ NewMenu.. │  │   rules   │  │   │
//! │  │   │  Order    │  │  TaxRate  │  │ ..Update  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO SHARED STATE • PURE FUNCTIONS                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Table, MenuItem, InventoryItem, Recipe, Order)
//! - [`input`] - Create/update payloads accepted by the store
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use cafe_core::money::Money;
//! use cafe_core::types::TaxRate;
//!
//! // A latte at $4.50, two of them
//! let line = Money::from_major_minor(4, 50) * 2_i64;
//! assert_eq!(line.cents(), 900);
//!
//! // 10% service tax on the bill
//! let tax = line.calculate_tax(TaxRate::from_bps(1000));
//! assert_eq!(tax.cents(), 90);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod input;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, EntityKind, ErrorKind, ValidationError};
pub use input::*;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single order line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest menu price, in cents ($100,000).
///
/// Keeps every order total well inside `i64` cents:
/// 100 lines × 999 portions × this price < 10^13.
pub const MAX_PRICE_CENTS: i64 = 10_000_000;

/// Maximum number of lines on a single order.
pub const MAX_ORDER_LINES: usize = 100;

/// Default bill tax rate in basis points (10%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 1000;

/// Longest prep time a menu item may declare, in minutes.
pub const MAX_PREP_TIME_MINUTES: u32 = 240;

/// Largest party a single table may seat.
pub const MAX_TABLE_CAPACITY: u32 = 50;
