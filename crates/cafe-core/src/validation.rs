//! # Validation Module
//!
//! Input validation rules for store mutations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Screens (TypeScript)                                         │
//! │  ├── Disabled buttons, clamped number inputs                           │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required text, length limits                                      │
//! │  └── Quantity / price / time ranges                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store (cafe-store)                                           │
//! │  ├── Identity resolution (NotFound)                                    │
//! │  └── State machine checks (InvalidTransition)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cafe_core::validation::{validate_quantity, validate_waiter_name};
//!
//! assert!(validate_waiter_name("Alice").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_ITEM_QUANTITY, MAX_PREP_TIME_MINUTES, MAX_PRICE_CENTS, MAX_TABLE_CAPACITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a menu or inventory item name.
///
/// ## Rules
/// - Must not be empty
/// - At most 100 characters
///
/// ## Example
/// ```rust
/// use cafe_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Flat White").is_ok());
/// assert!(validate_item_name("").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_required_text("name", name, 100)
}

/// Validates the waiter name an order is opened under.
pub fn validate_waiter_name(name: &str) -> ValidationResult<()> {
    validate_required_text("waiter name", name, 60)
}

/// Validates a stock unit label ("kg", "L", "pieces").
pub fn validate_unit(unit: &str) -> ValidationResult<()> {
    validate_required_text("unit", unit, 20)
}

/// Validates kitchen notes. Empty notes are fine.
pub fn validate_notes(notes: &str) -> ValidationResult<()> {
    if notes.trim().chars().count() > 500 {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: 500,
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// Waiter taps "+" on a cart line ──► quantity 3
///      │
///      ▼
/// validate_quantity(3) ← THIS FUNCTION
///      │
///      ├── qty <= 0?  → MustBePositive
///      ├── qty > 999? → OutOfRange
///      └── OK → add_item_to_order
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (tap water, staff meals)
/// - At most MAX_PRICE_CENTS ($100,000)
///
/// ## Example
/// ```rust
/// use cafe_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(450).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// assert!(validate_price_cents(i64::MAX / 2).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    if cents > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a per-unit inventory cost in cents.
pub fn validate_cost_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: "cost".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock amount: finite and not negative.
pub fn validate_stock_quantity(field: &str, quantity: f64) -> ValidationResult<()> {
    if !quantity.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if quantity < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a menu item's prep time in minutes.
pub fn validate_prep_time(minutes: u32) -> ValidationResult<()> {
    if minutes > MAX_PREP_TIME_MINUTES {
        return Err(ValidationError::OutOfRange {
            field: "prep time".to_string(),
            min: 0,
            max: MAX_PREP_TIME_MINUTES as i64,
        });
    }

    Ok(())
}

/// Validates table capacity.
///
/// ## Rules
/// - Must be positive
/// - At most MAX_TABLE_CAPACITY (50)
pub fn validate_capacity(capacity: u32) -> ValidationResult<()> {
    if capacity == 0 {
        return Err(ValidationError::MustBePositive {
            field: "capacity".to_string(),
        });
    }

    if capacity > MAX_TABLE_CAPACITY {
        return Err(ValidationError::OutOfRange {
            field: "capacity".to_string(),
            min: 1,
            max: MAX_TABLE_CAPACITY as i64,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Cappuccino").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("   ").is_err());
        assert!(validate_item_name(&"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_waiter_name() {
        assert!(validate_waiter_name("Alice").is_ok());
        assert!(matches!(
            validate_waiter_name(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(MAX_PRICE_CENTS).is_ok());
        assert!(matches!(
            validate_price_cents(-1),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            validate_price_cents(MAX_PRICE_CENTS + 1),
            Err(ValidationError::OutOfRange { max: MAX_PRICE_CENTS, .. })
        ));
    }

    #[test]
    fn test_validate_stock_quantity() {
        assert!(validate_stock_quantity("quantity", 0.0).is_ok());
        assert!(validate_stock_quantity("quantity", 12.5).is_ok());
        assert!(validate_stock_quantity("quantity", -0.1).is_err());
        assert!(validate_stock_quantity("quantity", f64::INFINITY).is_err());
        assert!(validate_stock_quantity("quantity", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_capacity() {
        assert!(validate_capacity(4).is_ok());
        assert!(validate_capacity(0).is_err());
        assert!(validate_capacity(51).is_err());
    }

    #[test]
    fn test_validate_prep_time_and_notes() {
        assert!(validate_prep_time(0).is_ok());
        assert!(validate_prep_time(241).is_err());
        assert!(validate_notes("").is_ok());
        assert!(validate_notes(&"x".repeat(501)).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(1000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }
}
