//! Quick-Order Table Provisioner
//!
//! Walk-up and to-go business has no seat on the floor plan. The first
//! save/send of such an order allocates a fresh ephemeral table numbered
//! `QO<n>`, where `n` is one past the highest existing suffix. The table
//! is used once and never recycled.
//!
//! Scan-and-increment leaves a race window between two sessions
//! provisioning at the same instant; closing it needs a server-side
//! sequence. Within one session the cached table in `SessionState` keeps
//! this from ever running twice.

use crate::session::{SessionError, SessionResult};
use shared::models::{QUICK_ORDER_PREFIX, Table, TableCreate, TableStatus};
use shared::models::table::QUICK_ORDER_SECTION;
use shared::store::OrderStore;

/// Derive the next quick-order display number from the existing tables.
///
/// `{QO1, QO3}` → `QO4`; no quick orders at all → `QO1`.
pub fn next_quick_order_number(tables: &[Table]) -> String {
    let next = tables
        .iter()
        .filter_map(|t| t.quick_order_suffix())
        .max()
        .map_or(1, |n| n + 1);
    format!("{}{}", QUICK_ORDER_PREFIX, next)
}

/// Allocate a fresh ephemeral table for an order with no seating.
pub async fn provision_quick_order_table(store: &dyn OrderStore) -> SessionResult<Table> {
    let tables = store
        .get_tables()
        .await
        .map_err(|e| SessionError::Provisioning(format!("table scan failed: {}", e)))?;

    let number = next_quick_order_number(&tables);
    tracing::info!(number = %number, "Provisioning quick-order table");

    let table = store
        .create_table(TableCreate {
            number,
            section: QUICK_ORDER_SECTION.to_string(),
            seat_count: 0,
            status: TableStatus::Available,
            quick_order: true,
        })
        .await
        .map_err(|e| SessionError::Provisioning(format!("table creation failed: {}", e)))?;

    Ok(table)
}
