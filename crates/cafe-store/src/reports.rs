//! # Reporting Projections
//!
//! Read models the screens render: dashboard tiles, the kitchen queue and
//! the bill. Every projection is a pure function over snapshots; the
//! `Store` methods just take one read guard and hand the collections over.
//!
//! ## Screen Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Dashboard    ──► DashboardStats + recent_orders(5)                    │
//! │  KOT Display  ──► KitchenQueue (all / pending / preparing)             │
//! │  Orders       ──► BillSummary (subtotal, tax, total)                   │
//! │  Tables       ──► TableSummary (see tables.rs)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use cafe_core::{InventoryItem, Money, Order, OrderItemStatus, OrderStatus, Table, TaxRate};

use crate::store::Store;

/// How many orders the dashboard lists.
pub const RECENT_ORDERS_LIMIT: usize = 5;

// =============================================================================
// Dashboard
// =============================================================================

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_orders: usize,
    pub occupied_tables: usize,
    /// Completed orders created on the given day, in cents.
    pub revenue_cents: i64,
    pub low_stock_items: usize,
    /// KOT lines still waiting for the kitchen, across active orders.
    pub pending_kot_items: usize,
}

impl DashboardStats {
    /// Computes the tiles for `day` as a calendar day in `tz`.
    ///
    /// Revenue counts completed orders whose `created_at`, seen from `tz`,
    /// falls on `day`.
    pub fn compute<Tz: TimeZone>(
        orders: &[Order],
        tables: &[Table],
        inventory: &[InventoryItem],
        day: NaiveDate,
        tz: &Tz,
    ) -> Self {
        let active = orders.iter().filter(|o| o.is_active());

        DashboardStats {
            active_orders: active.clone().count(),
            occupied_tables: tables.iter().filter(|t| t.is_occupied()).count(),
            revenue_cents: orders
                .iter()
                .filter(|o| o.status == OrderStatus::Completed)
                .filter(|o| o.created_at.with_timezone(tz).date_naive() == day)
                .map(Order::total)
                .sum::<Money>()
                .cents(),
            low_stock_items: inventory.iter().filter(|i| i.is_low_stock()).count(),
            pending_kot_items: active
                .map(|o| o.count_items_with_status(OrderItemStatus::Pending))
                .sum(),
        }
    }

    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }
}

/// The `limit` newest orders, newest first.
pub fn recent_orders(orders: &[Order], limit: usize) -> Vec<Order> {
    let mut sorted: Vec<Order> = orders.to_vec();
    // Stable sort keeps insertion order for equal timestamps; reverse after
    // so later inserts win ties.
    sorted.reverse();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

// =============================================================================
// Kitchen Queue
// =============================================================================

/// KOT display filter chip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum KitchenFilter {
    #[default]
    All,
    Pending,
    Preparing,
}

impl KitchenFilter {
    fn admits(&self, status: OrderItemStatus) -> bool {
        match self {
            KitchenFilter::All => true,
            KitchenFilter::Pending => status == OrderItemStatus::Pending,
            KitchenFilter::Preparing => status == OrderItemStatus::Preparing,
        }
    }
}

/// What the kitchen screen shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct KitchenQueue {
    /// Active orders, lines narrowed to the filter. Orders with no
    /// matching line are left out.
    pub tickets: Vec<Order>,
    /// Pending lines across all active orders, regardless of filter.
    pub pending_count: usize,
    /// Preparing lines across all active orders, regardless of filter.
    pub preparing_count: usize,
}

impl KitchenQueue {
    pub fn build(orders: &[Order], filter: KitchenFilter) -> Self {
        let mut queue = KitchenQueue::default();

        for order in orders.iter().filter(|o| o.is_active()) {
            queue.pending_count += order.count_items_with_status(OrderItemStatus::Pending);
            queue.preparing_count += order.count_items_with_status(OrderItemStatus::Preparing);

            let mut ticket = order.clone();
            ticket.items.retain(|i| filter.admits(i.status));
            if filter == KitchenFilter::All || !ticket.items.is_empty() {
                queue.tickets.push(ticket);
            }
        }

        queue
    }
}

// =============================================================================
// Bill
// =============================================================================

/// One printed bill line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

/// Everything a bill renderer needs. Rendering itself is not done here.
///
/// ## Bill Math
/// ```text
/// subtotal = Σ line totals         (= order.total_cents)
/// tax      = subtotal × rate       (integer bps, round half up)
/// total    = subtotal + tax
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillSummary {
    pub store_name: String,
    pub order_id: String,
    pub table_number: u32,
    pub waiter_name: String,
    pub lines: Vec<BillLine>,
    pub subtotal_cents: i64,
    pub tax_rate_bps: u32,
    pub tax_cents: i64,
    pub total_cents: i64,
}

impl BillSummary {
    pub fn for_order(order: &Order, tax_rate: TaxRate, store_name: &str) -> Self {
        let subtotal = order.computed_total();
        let tax = subtotal.calculate_tax(tax_rate);

        BillSummary {
            store_name: store_name.to_string(),
            order_id: order.id.clone(),
            table_number: order.table_number,
            waiter_name: order.waiter_name.clone(),
            lines: order
                .items
                .iter()
                .map(|i| BillLine {
                    name: i.menu_item.name.clone(),
                    quantity: i.quantity,
                    unit_price_cents: i.menu_item.price_cents,
                    line_total_cents: i.line_total().cents(),
                })
                .collect(),
            subtotal_cents: subtotal.cents(),
            tax_rate_bps: tax_rate.bps(),
            tax_cents: tax.cents(),
            total_cents: (subtotal + tax).cents(),
        }
    }
}

// =============================================================================
// Store Accessors
// =============================================================================

impl Store {
    /// Dashboard tiles, revenue counted for `day` (UTC).
    pub fn dashboard_stats(&self, day: NaiveDate) -> DashboardStats {
        self.dashboard_stats_in(day, &Utc)
    }

    /// Dashboard tiles, revenue counted for `day` in `tz`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::{FixedOffset, NaiveDate};
    /// use cafe_store::Store;
    ///
    /// let store = Store::with_tables(&[4]).unwrap();
    /// let karachi = FixedOffset::east_opt(5 * 3600).unwrap();
    /// let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
    /// assert_eq!(store.dashboard_stats_in(day, &karachi).revenue_cents, 0);
    /// ```
    pub fn dashboard_stats_in<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> DashboardStats {
        self.read(|s| DashboardStats::compute(&s.orders, &s.tables, &s.inventory, day, tz))
    }

    /// Dashboard tiles for today on the machine's local clock.
    pub fn dashboard_stats_today(&self) -> DashboardStats {
        self.dashboard_stats_in(Local::now().date_naive(), &Local)
    }

    pub fn recent_orders(&self, limit: usize) -> Vec<Order> {
        self.read(|s| recent_orders(&s.orders, limit))
    }

    pub fn kitchen_queue(&self, filter: KitchenFilter) -> KitchenQueue {
        self.read(|s| KitchenQueue::build(&s.orders, filter))
    }

    /// Bill for an order at the configured tax rate. `None` if it is missing.
    pub fn bill(&self, order_id: &str) -> Option<BillSummary> {
        let settings = self.settings();
        self.read(|s| {
            s.orders
                .iter()
                .find(|o| o.id == order_id)
                .map(|o| BillSummary::for_order(o, settings.tax_rate, &settings.name))
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};
    use cafe_core::{MenuCategory, MenuItem, OrderItem};

    fn menu_item(name: &str, price_cents: i64) -> MenuItem {
        MenuItem {
            id: format!("m-{}", name.to_lowercase()),
            name: name.to_string(),
            category: MenuCategory::Coffee,
            price_cents,
            available: true,
            prep_time_minutes: 3,
            ingredients: vec![],
        }
    }

    fn order(id: &str, table: &Table, minutes: i64, status: OrderStatus) -> Order {
        let base = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();
        let mut order = Order::open(id, table, "Alice", base + Duration::minutes(minutes));
        order
            .items
            .push(OrderItem::from_menu_item(&menu_item("Latte", 450), 2, None));
        order.recompute_total();
        order.status = status;
        order
    }

    #[test]
    fn test_dashboard_stats() {
        let mut t1 = Table::new("t-1", 1, 4);
        t1.status = cafe_core::TableStatus::Occupied;
        let t2 = Table::new("t-2", 2, 2);

        let mut active = order("o-1", &t1, 0, OrderStatus::Active);
        active.items[0].status = OrderItemStatus::Preparing;
        active
            .items
            .push(OrderItem::from_menu_item(&menu_item("Mocha", 480), 1, None));
        active.recompute_total();

        let orders = vec![
            active,
            order("o-2", &t2, 10, OrderStatus::Completed),
            order("o-3", &t2, 20, OrderStatus::Completed),
            order("o-4", &t2, 30, OrderStatus::Cancelled),
        ];
        let inventory = vec![InventoryItem {
            id: "i-1".into(),
            name: "Milk".into(),
            quantity: 5.0,
            unit: "L".into(),
            min_quantity: 10.0,
            cost_cents: 0,
        }];

        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let stats = DashboardStats::compute(&orders, &[t1, t2], &inventory, day, &Utc);

        assert_eq!(stats.active_orders, 1);
        assert_eq!(stats.occupied_tables, 1);
        assert_eq!(stats.revenue_cents, 1800);
        assert_eq!(stats.low_stock_items, 1);
        assert_eq!(stats.pending_kot_items, 1);

        let other_day = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let stats = DashboardStats::compute(&orders, &[], &inventory, other_day, &Utc);
        assert_eq!(stats.revenue_cents, 0);
    }

    #[test]
    fn test_revenue_day_follows_the_timezone() {
        let table = Table::new("t-1", 1, 4);
        // 21:30 UTC on the 14th is 02:30 on the 15th at UTC+05:00
        let late = order("o-1", &table, 12 * 60 + 30, OrderStatus::Completed);
        let orders = vec![late];
        let karachi = FixedOffset::east_opt(5 * 3600).unwrap();
        let the_14th = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let the_15th = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();

        let utc_14 = DashboardStats::compute(&orders, &[], &[], the_14th, &Utc);
        assert_eq!(utc_14.revenue_cents, 900);

        let local_14 = DashboardStats::compute(&orders, &[], &[], the_14th, &karachi);
        let local_15 = DashboardStats::compute(&orders, &[], &[], the_15th, &karachi);
        assert_eq!(local_14.revenue_cents, 0);
        assert_eq!(local_15.revenue_cents, 900);
    }

    #[test]
    fn test_recent_orders_newest_first() {
        let table = Table::new("t-1", 1, 4);
        let orders: Vec<Order> = (0..7)
            .map(|i| order(&format!("o-{}", i), &table, i, OrderStatus::Completed))
            .collect();

        let recent = recent_orders(&orders, RECENT_ORDERS_LIMIT);
        let ids: Vec<&str> = recent.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["o-6", "o-5", "o-4", "o-3", "o-2"]);
    }

    #[test]
    fn test_recent_orders_ties_prefer_later_inserts() {
        let table = Table::new("t-1", 1, 4);
        let orders = vec![
            order("o-a", &table, 0, OrderStatus::Active),
            order("o-b", &table, 0, OrderStatus::Active),
        ];
        let recent = recent_orders(&orders, 1);
        assert_eq!(recent[0].id, "o-b");
    }

    #[test]
    fn test_kitchen_queue_filters() {
        let table = Table::new("t-1", 1, 4);
        let mut first = order("o-1", &table, 0, OrderStatus::Active);
        first
            .items
            .push(OrderItem::from_menu_item(&menu_item("Mocha", 480), 1, None));
        first.items[1].status = OrderItemStatus::Preparing;
        let second = order("o-2", &table, 5, OrderStatus::Active);
        let closed = order("o-3", &table, 9, OrderStatus::Completed);
        let orders = vec![first, second, closed];

        let all = KitchenQueue::build(&orders, KitchenFilter::All);
        assert_eq!(all.tickets.len(), 2);
        assert_eq!(all.pending_count, 2);
        assert_eq!(all.preparing_count, 1);

        let preparing = KitchenQueue::build(&orders, KitchenFilter::Preparing);
        assert_eq!(preparing.tickets.len(), 1);
        assert_eq!(preparing.tickets[0].items.len(), 1);
        assert_eq!(preparing.tickets[0].items[0].menu_item.name, "Mocha");
        assert_eq!(preparing.pending_count, 2);

        let pending = KitchenQueue::build(&orders, KitchenFilter::Pending);
        assert_eq!(pending.tickets.len(), 2);
    }

    #[test]
    fn test_bill_summary() {
        let table = Table::new("t-3", 3, 4);
        let mut o = order("o-1", &table, 0, OrderStatus::Active);
        o.items
            .push(OrderItem::from_menu_item(&menu_item("Scone", 305), 1, None));
        o.recompute_total();

        let bill = BillSummary::for_order(&o, TaxRate::from_bps(1000), "Cafe POS");
        assert_eq!(bill.table_number, 3);
        assert_eq!(bill.lines.len(), 2);
        assert_eq!(bill.lines[0].line_total_cents, 900);
        assert_eq!(bill.subtotal_cents, 1205);
        // 120.5 rounds half up
        assert_eq!(bill.tax_cents, 121);
        assert_eq!(bill.total_cents, 1326);
    }
}
