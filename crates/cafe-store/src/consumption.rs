//! # Inventory Consumption Hook
//!
//! Decides when, if ever, an order draws stock down through recipes.
//!
//! ## Trigger Points
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Consumption Policy Triggers                          │
//! │                                                                         │
//! │  KOT line ──► preparing ──► ready ──────► served                       │
//! │                              │              │                           │
//! │                        on_item_ready   on_item_served                  │
//! │                                                                         │
//! │  Order ─────────────────────────────────► completed                    │
//! │                                              │                          │
//! │                                      on_order_completed                │
//! │                                                                         │
//! │  disabled (default): orders never touch inventory                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Consumption runs inside the same write guard as the order change that
//! triggered it. Cancelled orders never consume.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use cafe_core::{OrderItem, ValidationError};

use crate::events::StoreEvent;
use crate::inventory::{Shortfall, StockRequirement};
use crate::store::StoreState;

// =============================================================================
// Policy
// =============================================================================

/// When recipe-driven stock deduction happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionPolicy {
    /// Orders never touch inventory.
    #[default]
    Disabled,

    /// Deduct a line's recipe when the kitchen marks it ready.
    OnItemReady,

    /// Deduct a line's recipe when it is served.
    OnItemServed,

    /// Deduct every line's recipe when the order is completed.
    OnOrderCompleted,
}

impl ConsumptionPolicy {
    /// Returns true if orders can ever touch inventory.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, ConsumptionPolicy::Disabled)
    }
}

impl fmt::Display for ConsumptionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsumptionPolicy::Disabled => write!(f, "disabled"),
            ConsumptionPolicy::OnItemReady => write!(f, "on_item_ready"),
            ConsumptionPolicy::OnItemServed => write!(f, "on_item_served"),
            ConsumptionPolicy::OnOrderCompleted => write!(f, "on_order_completed"),
        }
    }
}

impl FromStr for ConsumptionPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "disabled" | "off" | "none" => Ok(ConsumptionPolicy::Disabled),
            "on_item_ready" | "ready" => Ok(ConsumptionPolicy::OnItemReady),
            "on_item_served" | "served" => Ok(ConsumptionPolicy::OnItemServed),
            "on_order_completed" | "completed" => Ok(ConsumptionPolicy::OnOrderCompleted),
            _ => Err(ValidationError::NotAllowed {
                field: "consumption".to_string(),
                allowed: vec![
                    "disabled".to_string(),
                    "on_item_ready".to_string(),
                    "on_item_served".to_string(),
                    "on_order_completed".to_string(),
                ],
            }),
        }
    }
}

// =============================================================================
// Trigger
// =============================================================================

/// The order event that just happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Trigger {
    ItemReady,
    ItemServed,
    OrderCompleted,
}

impl ConsumptionPolicy {
    fn fires_on(&self, trigger: Trigger) -> bool {
        matches!(
            (self, trigger),
            (ConsumptionPolicy::OnItemReady, Trigger::ItemReady)
                | (ConsumptionPolicy::OnItemServed, Trigger::ItemServed)
                | (ConsumptionPolicy::OnOrderCompleted, Trigger::OrderCompleted)
        )
    }
}

/// What one hook run drew down.
#[derive(Debug, Default)]
pub(crate) struct Consumed {
    /// Stock items touched, first-touch order, no repeats.
    pub(crate) inventory_item_ids: Vec<String>,
    pub(crate) shortfalls: Vec<Shortfall>,
}

/// Runs the hook for `lines` if the policy fires on `trigger`.
///
/// Lines without a recipe consume nothing. Stock is floored at zero and
/// shortfalls are logged.
pub(crate) fn apply(
    state: &mut StoreState,
    policy: ConsumptionPolicy,
    trigger: Trigger,
    lines: &[OrderItem],
) -> Consumed {
    if !policy.fires_on(trigger) {
        return Consumed::default();
    }

    let requirements: Vec<StockRequirement> = lines
        .iter()
        .flat_map(|line| state.requirements_for(&line.menu_item_id, line.quantity))
        .collect();

    if requirements.is_empty() {
        return Consumed::default();
    }

    debug!(
        policy = %policy,
        requirements = requirements.len(),
        "Consuming inventory for order lines"
    );

    let shortfalls = state.consume(&requirements);
    for shortfall in &shortfalls {
        warn!(
            inventory_item_id = %shortfall.inventory_item_id,
            name = %shortfall.name,
            requested = shortfall.requested,
            available = shortfall.available,
            "Stock shortfall while consuming recipe"
        );
    }

    let mut inventory_item_ids: Vec<String> = Vec::new();
    for req in requirements {
        if !inventory_item_ids.contains(&req.inventory_item_id) {
            inventory_item_ids.push(req.inventory_item_id);
        }
    }

    Consumed {
        inventory_item_ids,
        shortfalls,
    }
}

impl Consumed {
    /// The event to publish, if anything was drawn down.
    pub(crate) fn into_event(self) -> Option<StoreEvent> {
        if self.inventory_item_ids.is_empty() {
            None
        } else {
            Some(StoreEvent::InventoryConsumed {
                inventory_item_ids: self.inventory_item_ids,
            })
        }
    }
}
