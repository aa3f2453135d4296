//! # Store Inputs
//!
//! Payloads the management screens submit to create or edit records.
//!
//! Create payloads carry every field. Update payloads carry `Option`s:
//! `None` leaves the stored value alone. Each payload validates itself
//! before the store touches any state.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{MenuCategory, RecipeIngredient};
use crate::validation::{
    validate_cost_cents, validate_item_name, validate_notes, validate_prep_time,
    validate_price_cents, validate_quantity, validate_stock_quantity, validate_unit,
    ValidationResult,
};

// =============================================================================
// Menu
// =============================================================================

/// Fields for a new menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewMenuItem {
    pub name: String,
    pub category: MenuCategory,
    pub price_cents: i64,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default = "default_prep_time")]
    pub prep_time_minutes: u32,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

fn default_available() -> bool {
    true
}

fn default_prep_time() -> u32 {
    5
}

impl NewMenuItem {
    /// Shorthand for an available item with the default prep time.
    pub fn new(name: impl Into<String>, category: MenuCategory, price_cents: i64) -> Self {
        NewMenuItem {
            name: name.into(),
            category,
            price_cents,
            available: default_available(),
            prep_time_minutes: default_prep_time(),
            ingredients: Vec::new(),
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_item_name(&self.name)?;
        validate_price_cents(self.price_cents)?;
        validate_prep_time(self.prep_time_minutes)?;
        Ok(())
    }
}

/// Partial update of a menu item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub category: Option<MenuCategory>,
    pub price_cents: Option<i64>,
    pub available: Option<bool>,
    pub prep_time_minutes: Option<u32>,
    pub ingredients: Option<Vec<String>>,
}

impl MenuItemUpdate {
    /// Toggles availability only (the menu screen's switch).
    pub fn availability(available: bool) -> Self {
        MenuItemUpdate {
            available: Some(available),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.name {
            validate_item_name(name)?;
        }
        if let Some(price) = self.price_cents {
            validate_price_cents(price)?;
        }
        if let Some(prep) = self.prep_time_minutes {
            validate_prep_time(prep)?;
        }
        Ok(())
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// Fields for a new inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub min_quantity: f64,
    #[serde(default)]
    pub cost_cents: i64,
}

impl NewInventoryItem {
    pub fn new(
        name: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        min_quantity: f64,
    ) -> Self {
        NewInventoryItem {
            name: name.into(),
            quantity,
            unit: unit.into(),
            min_quantity,
            cost_cents: 0,
        }
    }

    pub fn with_cost(mut self, cost_cents: i64) -> Self {
        self.cost_cents = cost_cents;
        self
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_item_name(&self.name)?;
        validate_stock_quantity("quantity", self.quantity)?;
        validate_unit(&self.unit)?;
        validate_stock_quantity("minimum quantity", self.min_quantity)?;
        validate_cost_cents(self.cost_cents)?;
        Ok(())
    }
}

/// Partial update of an inventory item's descriptive fields.
///
/// Stock level changes go through `update_inventory_quantity`, which
/// enforces the zero floor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub min_quantity: Option<f64>,
    pub cost_cents: Option<i64>,
}

impl InventoryItemUpdate {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.name {
            validate_item_name(name)?;
        }
        if let Some(unit) = &self.unit {
            validate_unit(unit)?;
        }
        if let Some(min) = self.min_quantity {
            validate_stock_quantity("minimum quantity", min)?;
        }
        if let Some(cost) = self.cost_cents {
            validate_cost_cents(cost)?;
        }
        Ok(())
    }
}

// =============================================================================
// Recipe
// =============================================================================

/// Partial update of a recipe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RecipeUpdate {
    /// Moves the recipe to another menu item.
    pub menu_item_id: Option<String>,
    /// Replaces the ingredient list.
    pub ingredients: Option<Vec<RecipeIngredient>>,
}

// =============================================================================
// Order Lines
// =============================================================================

/// A waiter cart line submitted in one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub menu_item_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl OrderLine {
    pub fn new(menu_item_id: impl Into<String>, quantity: i64) -> Self {
        OrderLine {
            menu_item_id: menu_item_id.into(),
            quantity,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Validates a line that will be kept (quantity already known > 0).
    pub fn validate(&self) -> ValidationResult<()> {
        if self.menu_item_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "menu item".to_string(),
            });
        }
        validate_quantity(self.quantity)?;
        if let Some(notes) = &self.notes {
            validate_notes(notes)?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
