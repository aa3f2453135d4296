//! # Table Allocator
//!
//! Manual table status changes from the floor plan screen.
//!
//! ## Allowed Manual Changes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Manual Table Status Changes                         │
//! │                                                                         │
//! │      available ◄──────────────► reserved        (host stand)           │
//! │                                                                         │
//! │      occupied  ◄── create_order / complete_order / cancel_order ONLY   │
//! │                                                                         │
//! │  • Setting occupied by hand          → InvalidTransition               │
//! │  • Changing a table with an order    → InvalidTransition               │
//! │  • Setting the current status again  → no-op                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use cafe_core::{CoreError, CoreResult, EntityKind, Table, TableStatus};

use crate::events::StoreEvent;
use crate::store::Store;

/// Number of tables in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub total: usize,
    pub available: usize,
    pub occupied: usize,
    pub reserved: usize,
}

impl TableSummary {
    pub fn from_tables(tables: &[Table]) -> Self {
        tables.iter().fold(TableSummary::default(), |mut acc, t| {
            acc.total += 1;
            match t.status {
                TableStatus::Available => acc.available += 1,
                TableStatus::Occupied => acc.occupied += 1,
                TableStatus::Reserved => acc.reserved += 1,
            }
            acc
        })
    }
}

impl Store {
    /// Changes a table's status by hand.
    ///
    /// ## Errors
    /// - `NotFound` if the table does not exist
    /// - `InvalidTransition` when asked for `occupied`, or when an order is
    ///   attached to the table
    pub fn update_table_status(&self, table_id: &str, status: TableStatus) -> CoreResult<Table> {
        self.mutate(|m| {
            let idx = m.state.table_index(table_id)?;
            let table = &m.state.tables[idx];

            if table.status == status {
                return Ok(table.clone());
            }

            if status == TableStatus::Occupied || table.current_order_id.is_some() {
                return Err(CoreError::invalid_transition(
                    EntityKind::Table,
                    table_id,
                    table.status,
                    status,
                ));
            }

            let table = &mut m.state.tables[idx];
            let from = table.status;
            table.status = status;
            debug!(table_id = %table_id, %from, to = %status, "Table status changed");

            let table = table.clone();
            m.emit(StoreEvent::TableStatusChanged {
                table_id: table.id.clone(),
                status,
            });
            Ok(table)
        })
    }

    /// Tables per status.
    pub fn table_summary(&self) -> TableSummary {
        self.read(|s| TableSummary::from_tables(&s.tables))
    }
}
