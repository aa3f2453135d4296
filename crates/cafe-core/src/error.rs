//! # Error Types
//!
//! Domain-specific error types for cafe-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cafe-core errors (this file)                                          │
//! │  ├── CoreError        - Store mutation failures                        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  cafe-store errors (separate crate)                                    │
//! │  └── ConfigError      - Config file / environment failures             │
//! │                                                                         │
//! │  Every CoreError maps onto one of three kinds the screens act on:      │
//! │    NotFound · InvalidTransition · ValidationFailure                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Propagation Policy
//! Queries never fail: a missing record is `None` or an empty list.
//! Mutations fail fast with a typed error instead of silently doing nothing.

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use ts_rs::TS;

use crate::types::OrderStatus;

// =============================================================================
// Entity Kind
// =============================================================================

/// The kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Table,
    MenuItem,
    InventoryItem,
    Recipe,
    Order,
    OrderItem,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Table => "Table",
            EntityKind::MenuItem => "Menu item",
            EntityKind::InventoryItem => "Inventory item",
            EntityKind::Recipe => "Recipe",
            EntityKind::Order => "Order",
            EntityKind::OrderItem => "Order item",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Error Kind
// =============================================================================

/// Machine-readable classification of a [`CoreError`].
///
/// ## Usage in Frontend
/// ```typescript
/// switch (e.kind) {
///   case 'NOT_FOUND':          refreshList(); break;
///   case 'INVALID_TRANSITION': showStatusHint(e.message); break;
///   case 'VALIDATION_FAILURE': highlightForm(e.message); break;
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Identity does not resolve to a record.
    NotFound,
    /// Status change is not permitted from the current state.
    InvalidTransition,
    /// Missing required field or out-of-range value.
    ValidationFailure,
}

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by store mutations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Identity does not resolve to a record.
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },

    /// A status change that the state machine does not allow.
    ///
    /// ## When This Occurs
    /// - KOT line moved backwards (ready → preparing)
    /// - KOT line skipped a step (pending → ready)
    /// - Table marked occupied by hand, or freed while an order is attached
    #[error("{entity} {id} cannot move from {from} to {to}")]
    InvalidTransition {
        entity: EntityKind,
        id: String,
        from: String,
        to: String,
    },

    /// Table already carries an open order.
    ///
    /// ## User Workflow
    /// ```text
    /// Waiter taps Table 4 (occupied)
    ///      │
    ///      ▼
    /// create_order(T4, "Bob")
    ///      │
    ///      ▼
    /// TableOccupied { number: 4, order_id: "..." }
    ///      │
    ///      ▼
    /// UI opens the existing order instead
    /// ```
    #[error("Table {number} already has an open order ({order_id})")]
    TableOccupied { number: u32, order_id: String },

    /// Order is completed or cancelled and can no longer change.
    #[error("Order {order_id} is {status}, cannot perform operation")]
    OrderNotActive { order_id: String, status: OrderStatus },

    /// Menu item exists but is switched off.
    #[error("Menu item {name} is not available")]
    MenuItemUnavailable { menu_item_id: String, name: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a given entity kind and ID.
    pub fn not_found(entity: EntityKind, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates an InvalidTransition error.
    pub fn invalid_transition(
        entity: EntityKind,
        id: impl Into<String>,
        from: impl fmt::Display,
        to: impl fmt::Display,
    ) -> Self {
        CoreError::InvalidTransition {
            entity,
            id: id.into(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Classifies this error for the caller.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::InvalidTransition { .. }
            | CoreError::TableOccupied { .. }
            | CoreError::OrderNotActive { .. } => ErrorKind::InvalidTransition,
            CoreError::MenuItemUnavailable { .. } | CoreError::Validation(_) => {
                ErrorKind::ValidationFailure
            }
        }
    }

    /// Returns true if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// They are raised before any state is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., NaN quantity, malformed list).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Value collides with an existing record.
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
