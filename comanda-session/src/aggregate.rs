//! Order/Table Aggregator
//!
//! A table can hold more than one concurrently open order (split
//! scenarios leave extras behind). The composition screen must present a
//! single unified bill, so on load we flatten the items of *every* open
//! order while new writes keep targeting one canonical order: the
//! earliest-created open one.

use futures::future::try_join_all;
use shared::models::Order;
use shared::order::ItemLine;
use shared::store::{OrderFilter, OrderStore, StoreResult};

/// Aggregated view of one occupied table
#[derive(Debug, Clone, Default)]
pub struct TableView {
    /// Earliest-created open order; receives new item writes
    pub canonical_order_id: Option<i64>,
    /// Items of all open orders, flattened
    pub items: Vec<ItemLine>,
}

/// Load and merge all open orders of a table.
///
/// A table with no open orders yields an empty view, not an error.
pub async fn load_table_view(store: &dyn OrderStore, table_id: i64) -> StoreResult<TableView> {
    let orders = store.get_orders(OrderFilter::open_for_table(table_id)).await?;

    let mut open: Vec<&Order> = orders.iter().filter(|o| o.is_open()).collect();
    let Some(canonical) = open.iter().min_by_key(|o| o.created_at).map(|o| o.id) else {
        tracing::debug!(table_id, "No open orders for table");
        return Ok(TableView::default());
    };
    open.sort_by_key(|o| o.created_at);

    let menu = store.list_menu_items().await?;
    let per_order = try_join_all(open.iter().map(|o| store.get_order_items(o.id))).await?;

    let items: Vec<ItemLine> = per_order
        .iter()
        .flatten()
        .map(|record| ItemLine::from_record(record, &menu))
        .collect();

    tracing::info!(
        table_id,
        open_orders = open.len(),
        items = items.len(),
        canonical_order_id = canonical,
        "Aggregated open orders for table"
    );

    Ok(TableView {
        canonical_order_id: Some(canonical),
        items,
    })
}
