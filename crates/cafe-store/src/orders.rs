//! # Order Lifecycle
//!
//! Opening, filling, progressing and closing table orders.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Order Lifecycle                                  │
//! │                                                                         │
//! │  1. OPEN                                                               │
//! │     └── create_order() → Order { status: Active, total: 0 }           │
//! │         table: available/reserved → occupied (same write guard)        │
//! │                                                                         │
//! │  2. FILL                                                               │
//! │     └── add_item_to_order() → pending line, snapshot of menu item     │
//! │     └── replace_order_items() → waiter re-saves the whole cart        │
//! │         total recomputed after every change                            │
//! │                                                                         │
//! │  3. KITCHEN                                                            │
//! │     └── update_order_item_status() pending→preparing→ready→served     │
//! │                                                                         │
//! │  4. CLOSE                                                              │
//! │     └── complete_order() → Completed, table released                  │
//! │     └── cancel_order()   → Cancelled, table released                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation validates everything it needs before it changes
//! anything, so a failed call leaves the store exactly as it was.

use chrono::Utc;
use tracing::{debug, info};

use cafe_core::validation::{validate_quantity, validate_waiter_name};
use cafe_core::{
    CoreError, CoreResult, EntityKind, Order, OrderItem, OrderItemStatus, OrderLine, OrderStatus,
    TableStatus, ValidationError, MAX_ORDER_LINES,
};

use crate::consumption::{self, Trigger};
use crate::events::StoreEvent;
use crate::store::{new_id, Store, StoreState};

fn too_many_lines() -> CoreError {
    ValidationError::OutOfRange {
        field: "order lines".to_string(),
        min: 0,
        max: MAX_ORDER_LINES as i64,
    }
    .into()
}

impl StoreState {
    /// Frees whichever table holds `order_id`. Returns its id.
    fn release_table(&mut self, order_id: &str) -> Option<String> {
        let table = self
            .tables
            .iter_mut()
            .find(|t| t.current_order_id.as_deref() == Some(order_id))?;
        table.status = TableStatus::Available;
        table.current_order_id = None;
        Some(table.id.clone())
    }

    /// Builds a pending line, refusing missing or switched-off menu items.
    fn order_item_for(
        &self,
        menu_item_id: &str,
        quantity: i64,
        notes: Option<String>,
    ) -> CoreResult<OrderItem> {
        let menu_item = &self.menu_items[self.menu_item_index(menu_item_id)?];
        if !menu_item.available {
            return Err(CoreError::MenuItemUnavailable {
                menu_item_id: menu_item.id.clone(),
                name: menu_item.name.clone(),
            });
        }
        Ok(OrderItem::from_menu_item(menu_item, quantity, notes))
    }
}

impl Store {
    /// Opens an order on a table and marks the table occupied.
    ///
    /// Reserved tables can be opened; the reservation has arrived.
    ///
    /// ## Errors
    /// - `Validation` for an empty waiter name
    /// - `NotFound` if the table does not exist
    /// - `TableOccupied` if the table already has an open order
    pub fn create_order(&self, table_id: &str, waiter_name: &str) -> CoreResult<Order> {
        validate_waiter_name(waiter_name)?;

        self.mutate(|m| {
            let idx = m.state.table_index(table_id)?;
            let table = &m.state.tables[idx];

            if let Some(order_id) = &table.current_order_id {
                return Err(CoreError::TableOccupied {
                    number: table.number,
                    order_id: order_id.clone(),
                });
            }
            if table.is_occupied() {
                return Err(CoreError::invalid_transition(
                    EntityKind::Table,
                    table_id,
                    table.status,
                    TableStatus::Occupied,
                ));
            }

            let order = Order::open(new_id(), table, waiter_name.trim(), Utc::now());

            let table = &mut m.state.tables[idx];
            table.status = TableStatus::Occupied;
            table.current_order_id = Some(order.id.clone());
            m.state.orders.push(order.clone());

            info!(
                order_id = %order.id,
                table = order.table_number,
                waiter = %order.waiter_name,
                "Order opened"
            );
            m.emit(StoreEvent::OrderCreated {
                order_id: order.id.clone(),
                table_id: order.table_id.clone(),
            });
            Ok(order)
        })
    }

    /// Appends a pending line for `quantity` portions of a menu item.
    ///
    /// The menu item is snapshotted now; later menu edits do not reach it.
    ///
    /// ## Errors
    /// - `Validation` for a quantity outside 1..=999, a full order, or a
    ///   total outside the `i64` cents range
    /// - `NotFound` for a missing order or menu item
    /// - `OrderNotActive` once the order is closed
    /// - `MenuItemUnavailable` for a switched-off item
    pub fn add_item_to_order(
        &self,
        order_id: &str,
        menu_item_id: &str,
        quantity: i64,
        notes: Option<String>,
    ) -> CoreResult<Order> {
        validate_quantity(quantity)?;
        if let Some(notes) = &notes {
            cafe_core::validation::validate_notes(notes)?;
        }

        self.mutate(|m| {
            let idx = m.state.order_index(order_id)?;
            m.state.orders[idx].ensure_active()?;
            if m.state.orders[idx].items.len() >= MAX_ORDER_LINES {
                return Err(too_many_lines());
            }

            let line = m.state.order_item_for(menu_item_id, quantity, notes)?;

            let order = &mut m.state.orders[idx];
            debug!(
                order_id = %order_id,
                menu_item = %line.menu_item.name,
                quantity,
                "Item added to order"
            );
            order.push_item(line)?;

            let order = order.clone();
            m.emit(StoreEvent::OrderItemAdded {
                order_id: order.id.clone(),
                menu_item_id: menu_item_id.to_string(),
            });
            Ok(order)
        })
    }

    /// Replaces every line with fresh pending snapshots of `lines`.
    ///
    /// Lines with quantity 0 are dropped, the way decrementing a cart line
    /// to zero removes it.
    ///
    /// ## Errors
    /// Same as [`Store::add_item_to_order`], checked for every line before
    /// the order is touched.
    pub fn replace_order_items(&self, order_id: &str, lines: Vec<OrderLine>) -> CoreResult<Order> {
        let lines: Vec<OrderLine> = lines.into_iter().filter(|l| l.quantity != 0).collect();
        for line in &lines {
            line.validate()?;
        }
        if lines.len() > MAX_ORDER_LINES {
            return Err(too_many_lines());
        }

        self.mutate(|m| {
            let idx = m.state.order_index(order_id)?;
            m.state.orders[idx].ensure_active()?;

            let items = lines
                .into_iter()
                .map(|l| m.state.order_item_for(&l.menu_item_id, l.quantity, l.notes))
                .collect::<CoreResult<Vec<_>>>()?;

            let order = &mut m.state.orders[idx];
            order.set_items(items)?;
            debug!(order_id = %order_id, lines = order.items.len(), "Order items replaced");

            let order = order.clone();
            m.emit(StoreEvent::OrderItemsReplaced {
                order_id: order.id.clone(),
            });
            Ok(order)
        })
    }

    /// Moves a KOT line one step forward.
    ///
    /// When several lines share the menu item, the first one for which the
    /// move is legal is advanced.
    ///
    /// ## Errors
    /// - `NotFound` for a missing order, or no line with that menu item
    /// - `OrderNotActive` once the order is closed
    /// - `InvalidTransition` when no line can make this move (skip,
    ///   reverse or repeat)
    pub fn update_order_item_status(
        &self,
        order_id: &str,
        menu_item_id: &str,
        status: OrderItemStatus,
    ) -> CoreResult<Order> {
        self.mutate(|m| {
            let idx = m.state.order_index(order_id)?;
            let order = &m.state.orders[idx];
            order.ensure_active()?;

            let first_match = order
                .items
                .iter()
                .find(|i| i.menu_item_id == menu_item_id)
                .ok_or_else(|| CoreError::not_found(EntityKind::OrderItem, menu_item_id))?;

            let line_idx = order
                .items
                .iter()
                .position(|i| i.menu_item_id == menu_item_id && i.status.can_advance_to(status))
                .ok_or_else(|| {
                    CoreError::invalid_transition(
                        EntityKind::OrderItem,
                        menu_item_id,
                        first_match.status,
                        status,
                    )
                })?;

            let line = &mut m.state.orders[idx].items[line_idx];
            let from = line.status;
            line.status = status;
            let advanced = line.clone();
            debug!(
                order_id = %order_id,
                menu_item = %advanced.menu_item.name,
                %from,
                to = %status,
                "KOT line advanced"
            );

            let trigger = match status {
                OrderItemStatus::Ready => Some(Trigger::ItemReady),
                OrderItemStatus::Served => Some(Trigger::ItemServed),
                _ => None,
            };
            let consumed = match trigger {
                Some(trigger) => {
                    let policy = m.settings.consumption;
                    consumption::apply(m.state, policy, trigger, std::slice::from_ref(&advanced))
                }
                None => Default::default(),
            };

            let order = m.state.orders[idx].clone();
            m.emit(StoreEvent::OrderItemStatusChanged {
                order_id: order.id.clone(),
                menu_item_id: menu_item_id.to_string(),
                status,
            });
            if let Some(event) = consumed.into_event() {
                m.emit(event);
            }
            Ok(order)
        })
    }

    /// Completes an active order and releases its table.
    ///
    /// ## Errors
    /// - `NotFound` for a missing order
    /// - `OrderNotActive` if it is already completed or cancelled
    pub fn complete_order(&self, order_id: &str) -> CoreResult<Order> {
        self.close_order(order_id, OrderStatus::Completed)
    }

    /// Cancels an active order and releases its table. Stock is untouched.
    pub fn cancel_order(&self, order_id: &str) -> CoreResult<Order> {
        self.close_order(order_id, OrderStatus::Cancelled)
    }

    fn close_order(&self, order_id: &str, status: OrderStatus) -> CoreResult<Order> {
        self.mutate(|m| {
            let idx = m.state.order_index(order_id)?;
            m.state.orders[idx].ensure_active()?;

            let order = &mut m.state.orders[idx];
            order.status = status;
            order.completed_at = Some(Utc::now());
            let order = order.clone();

            let table_id = m
                .state
                .release_table(order_id)
                .unwrap_or_else(|| order.table_id.clone());

            let consumed = if status == OrderStatus::Completed {
                let policy = m.settings.consumption;
                consumption::apply(m.state, policy, Trigger::OrderCompleted, &order.items)
            } else {
                Default::default()
            };

            info!(
                order_id = %order_id,
                table = order.table_number,
                total = %order.total(),
                status = %status,
                shortfalls = consumed.shortfalls.len(),
                "Order closed"
            );
            let event = if status == OrderStatus::Completed {
                StoreEvent::OrderCompleted {
                    order_id: order.id.clone(),
                    table_id,
                }
            } else {
                StoreEvent::OrderCancelled {
                    order_id: order.id.clone(),
                    table_id,
                }
            };
            m.emit(event);
            if let Some(event) = consumed.into_event() {
                m.emit(event);
            }
            Ok(order)
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
