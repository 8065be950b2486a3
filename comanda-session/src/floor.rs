//! Floor Watcher
//!
//! Periodic refresh of the floor overview: which tables are occupied,
//! how far their items have progressed, what the running bill is. The
//! refresh is a cancellable background task with an explicit stop
//! handle; the latest snapshot is published over a `watch` channel so
//! consumers read it without blocking the refresher.

use futures::future::try_join_all;
use rust_decimal::prelude::*;
use serde::Serialize;
use shared::models::{Order, OrderStatus, Table, TableStatus};
use shared::order::{ItemStatus, OrderItemRecord};
use shared::store::{OrderFilter, OrderStore, StoreResult};
use shared::util::now_millis;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Default refresh cadence
pub const FLOOR_REFRESH_SECS: u64 = 3;

/// Attention color of a table tile
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TileAttention {
    /// Nothing in flight
    #[default]
    Default,
    /// Every item completed
    Green,
    /// Items still inside the edit window
    Purple,
    /// Items locked or cooking
    Yellow,
}

/// One occupied table on the floor overview
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TableTile {
    pub table: Table,
    pub item_count: usize,
    pub limbo_count: usize,
    pub pending_count: usize,
    pub fired_count: usize,
    pub completed_count: usize,
    /// Running bill across all open orders of the table
    pub total: f64,
    /// Creation instant of the oldest open order (Unix millis)
    pub oldest_order_at: i64,
    pub attention: TileAttention,
}

/// Published floor overview
#[derive(Debug, Clone, Serialize, Default)]
pub struct FloorSnapshot {
    pub tables: Vec<TableTile>,
    pub refreshed_at: i64,
}

/// Cancellable periodic floor refresher
pub struct FloorWatcher {
    rx: watch::Receiver<FloorSnapshot>,
    shutdown: CancellationToken,
}

impl FloorWatcher {
    /// Spawn the refresh task with the default cadence
    pub fn spawn(store: Arc<dyn OrderStore>) -> Self {
        Self::spawn_with_interval(store, Duration::from_secs(FLOOR_REFRESH_SECS))
    }

    /// Spawn the refresh task with an explicit cadence (tests shorten it)
    pub fn spawn_with_interval(store: Arc<dyn OrderStore>, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(FloorSnapshot::default());
        let shutdown = CancellationToken::new();

        tokio::spawn(run_loop(store, tx, interval, shutdown.clone()));

        Self { rx, shutdown }
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> FloorSnapshot {
        self.rx.borrow().clone()
    }

    /// Receiver for change notifications
    pub fn subscribe(&self) -> watch::Receiver<FloorSnapshot> {
        self.rx.clone()
    }

    /// Stop the refresher; no work continues afterwards
    pub fn stop(&self) {
        self.shutdown.cancel();
    }
}

async fn run_loop(
    store: Arc<dyn OrderStore>,
    tx: watch::Sender<FloorSnapshot>,
    interval: Duration,
    shutdown: CancellationToken,
) {
    tracing::info!("Floor watcher started");

    loop {
        match refresh(store.as_ref()).await {
            Ok(snapshot) => {
                let _ = tx.send(snapshot);
            }
            Err(e) => tracing::warn!(error = %e, "Floor refresh failed"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("Floor watcher stopped");
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

async fn refresh(store: &dyn OrderStore) -> StoreResult<FloorSnapshot> {
    let tables = store.get_tables().await?;
    let orders = store
        .get_orders(OrderFilter {
            table_id: None,
            status: Some(OrderStatus::Open),
        })
        .await?;

    let per_order = try_join_all(orders.iter().map(|o| store.get_order_items(o.id))).await?;
    let items_by_order: HashMap<i64, Vec<OrderItemRecord>> = orders
        .iter()
        .map(|o| o.id)
        .zip(per_order)
        .collect();

    Ok(build_snapshot(&tables, &orders, &items_by_order))
}

/// Compose the floor overview from already-fetched data.
pub fn build_snapshot(
    tables: &[Table],
    open_orders: &[Order],
    items_by_order: &HashMap<i64, Vec<OrderItemRecord>>,
) -> FloorSnapshot {
    let mut tiles = Vec::new();

    for table in tables {
        let table_orders: Vec<&Order> = open_orders
            .iter()
            .filter(|o| o.table_id == table.id && o.is_open())
            .collect();
        if table.status != TableStatus::Occupied || table_orders.is_empty() {
            continue;
        }

        let items: Vec<&OrderItemRecord> = table_orders
            .iter()
            .filter_map(|o| items_by_order.get(&o.id))
            .flatten()
            .collect();

        let count_status =
            |status: ItemStatus| items.iter().filter(|i| i.status == status).count();
        let limbo_count = count_status(ItemStatus::Limbo);
        let pending_count = count_status(ItemStatus::Pending);
        let fired_count = count_status(ItemStatus::Fired);
        let completed_count = count_status(ItemStatus::Completed);

        let total: Decimal = items
            .iter()
            .map(|i| Decimal::from_f64(i.price).unwrap_or_default() * Decimal::from(i.quantity))
            .sum();

        let oldest_order_at = table_orders
            .iter()
            .map(|o| o.created_at)
            .min()
            .unwrap_or_else(now_millis);

        tiles.push(TableTile {
            table: table.clone(),
            item_count: items.len(),
            limbo_count,
            pending_count,
            fired_count,
            completed_count,
            total: total.to_f64().unwrap_or(0.0),
            oldest_order_at,
            attention: classify(items.len(), limbo_count, pending_count, fired_count, completed_count),
        });
    }

    FloorSnapshot {
        tables: tiles,
        refreshed_at: now_millis(),
    }
}

/// Attention ladder: all done → green, anything still editable →
/// purple, anything locked or cooking → yellow.
fn classify(
    item_count: usize,
    limbo: usize,
    pending: usize,
    fired: usize,
    completed: usize,
) -> TileAttention {
    if completed == item_count && item_count > 0 {
        TileAttention::Green
    } else if limbo > 0 {
        TileAttention::Purple
    } else if pending > 0 || fired > 0 {
        TileAttention::Yellow
    } else {
        TileAttention::Default
    }
}
