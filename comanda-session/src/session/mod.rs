//! OrderSession - composition state and release coordination
//!
//! One `OrderSession` backs one order-entry screen. It owns the
//! optimistic item list, the edit-window timer and the cached
//! table/order references, and it sequences the release saga:
//!
//! ```text
//! send_order()
//!     ├─ 1. Ensure table (provision a quick-order table if absent)
//!     ├─ 2. Ensure order (create, then mark the table occupied)
//!     ├─ 3. Persist unpersisted draft items (parallel, all-or-nothing)
//!     ├─ 4. Collaborator send → transmitted items + grace expiry
//!     ├─ 5. Arm the edit-window timer from that expiry
//!     └─ 6. Flip local drafts to limbo
//! ```
//!
//! Each step is gated on the previous one succeeding. Whatever a failed
//! run already committed (table, order) stays cached, so re-triggering
//! the action resumes instead of duplicating.
//!
//! All user-triggered operations serialize through one async mutex; the
//! shared countdown therefore sees resets in a defined order (last one
//! wins) and provisioning can never run twice concurrently.

mod error;
pub use error::*;

#[cfg(test)]
mod tests;

use crate::aggregate;
use crate::config::SessionConfig;
use crate::money::{self, OrderTotals};
use crate::provision;
use crate::state::{Notice, SessionState};
use crate::timer::EditWindowTimer;
use parking_lot::RwLock;
use shared::models::{MenuItem, OrderCreate, OrderStatus, OrderType, Table, TableStatus};
use shared::order::{ItemLine, ItemStatus, OrderItemCreate};
use shared::store::OrderStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Order-composition session for one entry screen
pub struct OrderSession {
    store: Arc<dyn OrderStore>,
    state: Arc<RwLock<SessionState>>,
    timer: EditWindowTimer,
    config: SessionConfig,
    /// Serializes user-triggered operations
    ops: Mutex<()>,
    /// Cancels the timer task and every notice-clear task on teardown
    shutdown: CancellationToken,
    /// Unique instance id, mainly for log correlation
    epoch: String,
}

impl std::fmt::Debug for OrderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderSession")
            .field("epoch", &self.epoch)
            .field("order_id", &self.state.read().order_id)
            .finish()
    }
}

impl OrderSession {
    /// Open a session with production configuration.
    ///
    /// With an occupied `selected_table` the aggregator reconstructs the
    /// unified item view from all of the table's open orders. With
    /// `None`, the session starts bare and a quick-order table is
    /// provisioned on the first save/send.
    pub async fn open(
        store: Arc<dyn OrderStore>,
        selected_table: Option<Table>,
        server_name: impl Into<String>,
    ) -> SessionResult<Self> {
        Self::open_with_config(store, selected_table, server_name, SessionConfig::default()).await
    }

    /// Open a session with explicit configuration (tests shorten windows)
    pub async fn open_with_config(
        store: Arc<dyn OrderStore>,
        selected_table: Option<Table>,
        server_name: impl Into<String>,
        config: SessionConfig,
    ) -> SessionResult<Self> {
        let state = Arc::new(RwLock::new(SessionState::new(server_name)));
        let shutdown = CancellationToken::new();
        let timer = EditWindowTimer::spawn(state.clone(), shutdown.child_token());
        let epoch = uuid::Uuid::new_v4().to_string();

        if let Some(table) = selected_table {
            if table.status == TableStatus::Occupied {
                let view = aggregate::load_table_view(store.as_ref(), table.id).await?;
                let mut guard = state.write();
                guard.order_id = view.canonical_order_id;
                guard.items = view.items;
            }
            state.write().table = Some(table);
        }

        tracing::info!(epoch = %epoch, "Order session opened");

        Ok(Self {
            store,
            state,
            timer,
            config,
            ops: Mutex::new(()),
            shutdown,
            epoch,
        })
    }

    /// Unique session instance id
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    // ========================================================================
    // User operations
    // ========================================================================

    /// Add a menu selection to the order.
    ///
    /// With no countdown running the line stays a local `draft`. While
    /// the edit window is live the item is persisted and transmitted
    /// immediately (it joins the batch already travelling to the
    /// kitchen), enters `limbo` directly and restarts the shared window.
    pub async fn add_item(&self, menu_item: &MenuItem) -> SessionResult<()> {
        let _op = self.ops.lock().await;
        self.ensure_live()?;

        let order_id = self.state.read().order_id;
        if let (true, Some(order_id)) = (self.timer.is_armed(), order_id) {
            let record = self
                .store
                .create_order_item(OrderItemCreate::draft(
                    order_id,
                    menu_item.id,
                    1,
                    menu_item.price,
                ))
                .await?;
            let sent = self.store.send_draft_items(order_id).await?;

            let mut line = ItemLine::draft(menu_item);
            line.item_id = Some(record.id);
            line.status = ItemStatus::Limbo;
            {
                let mut guard = self.state.write();
                guard.items.push(line);
                guard.window_elapsed = false;
            }

            // The window restarts, it does not accumulate; the
            // collaborator's expiry wins when it reported one.
            match sent.iter().map(|s| s.release_expiry).max() {
                Some(expiry) => self.timer.arm_until(expiry),
                None => self.timer.reset(self.config.edit_window_secs),
            }
            tracing::debug!(menu_item_id = menu_item.id, "Item sent into live window");
        } else {
            let mut guard = self.state.write();
            guard.items.push(ItemLine::draft(menu_item));
            guard.window_elapsed = false;
        }

        Ok(())
    }

    /// Remove the line at `index`.
    ///
    /// Persisted editable lines are deleted through the store first; if
    /// the delete fails the line stays in place so the user can retry.
    /// Removing the last `limbo` item cancels the countdown outright.
    pub async fn remove_item(&self, index: usize) -> SessionResult<()> {
        let _op = self.ops.lock().await;
        self.ensure_live()?;

        let line = self
            .state
            .read()
            .items
            .get(index)
            .cloned()
            .ok_or_else(|| SessionError::InvalidOperation(format!("no item at index {}", index)))?;

        if line.status.is_locked() {
            return Err(SessionError::InvalidOperation(
                "item is locked and can no longer be removed".to_string(),
            ));
        }

        if let Some(item_id) = line.item_id {
            self.store.delete_order_item(item_id).await?;
        }

        let still_limbo = {
            let mut guard = self.state.write();
            if index < guard.items.len() {
                guard.items.remove(index);
            }
            guard.has_limbo_items()
        };

        if self.timer.is_armed() {
            if still_limbo {
                self.timer.reset(self.config.edit_window_secs);
            } else {
                self.timer.cancel();
            }
        }

        Ok(())
    }

    /// Persist the current drafts without releasing anything.
    ///
    /// Ensures table and order exist, stores every unpersisted draft and
    /// raises the transient draft-saved confirmation.
    pub async fn save_draft(&self) -> SessionResult<()> {
        let _op = self.ops.lock().await;
        self.ensure_live()?;

        let table = self.ensure_table().await?;
        let order_id = self.ensure_order(&table).await?;
        self.persist_drafts(order_id).await?;

        let generation = {
            let mut guard = self.state.write();
            guard.draft_saved = true;
            guard.draft_notice_generation += 1;
            guard.draft_notice_generation
        };
        self.spawn_notice_clear(generation);

        tracing::info!(order_id, "Draft saved");
        Ok(())
    }

    /// Release the order: run the full saga and start the edit window.
    pub async fn send_order(&self) -> SessionResult<()> {
        let _op = self.ops.lock().await;
        self.ensure_live()?;

        self.state.write().draft_saved = false;

        let table = self.ensure_table().await?;
        let order_id = self.ensure_order(&table).await?;
        self.persist_drafts(order_id).await?;

        let had_drafts = self
            .state
            .read()
            .items
            .iter()
            .any(|i| i.status == ItemStatus::Draft);

        let sent = self.store.send_draft_items(order_id).await?;

        match sent.iter().map(|s| s.release_expiry).max() {
            Some(expiry) => {
                self.timer.arm_until(expiry);
                self.state.write().window_elapsed = false;
            }
            None if had_drafts => {
                return Err(SessionError::InconsistentState(
                    "send reported no transmitted items for pending drafts".to_string(),
                ));
            }
            None => {}
        }

        let mut guard = self.state.write();
        for item in guard.items.iter_mut() {
            if item.status == ItemStatus::Draft {
                item.status = ItemStatus::Limbo;
            }
        }
        drop(guard);

        tracing::info!(order_id, sent = sent.len(), "Order sent, edit window open");
        Ok(())
    }

    /// Release early, bypassing the remaining grace period.
    ///
    /// Valid only while the countdown is live. After the collaborator
    /// accepts, local optimistic state is discarded and the item list is
    /// refetched authoritatively; server-side statuses may have diverged
    /// from the local guess.
    pub async fn send_now(&self) -> SessionResult<()> {
        let _op = self.ops.lock().await;
        self.ensure_live()?;

        let order_id = self.state.read().order_id.ok_or_else(|| {
            SessionError::InvalidOperation("no open order to release".to_string())
        })?;
        if !self.timer.is_armed() {
            return Err(SessionError::InvalidOperation(
                "no edit window is running".to_string(),
            ));
        }

        self.store.send_now(order_id).await?;
        self.timer.force_expire();

        // Authoritative refresh, no partial merge
        let menu = self.store.list_menu_items().await?;
        let records = self.store.get_order_items(order_id).await?;
        let mut guard = self.state.write();
        guard.items = records
            .iter()
            .map(|r| ItemLine::from_record(r, &menu))
            .collect();
        drop(guard);

        tracing::info!(order_id, "Order released early");
        Ok(())
    }

    /// Tear the session down: stop all background work and drop state.
    ///
    /// Called on navigation away and on payment completion. Nothing
    /// mutates the session afterwards; further operations return
    /// [`SessionError::TornDown`].
    pub async fn teardown(&self) {
        let _op = self.ops.lock().await;

        self.shutdown.cancel();
        self.timer.cancel();

        let mut guard = self.state.write();
        guard.torn_down = true;
        guard.items.clear();
        guard.order_id = None;
        guard.table = None;
        guard.draft_saved = false;
        guard.window_elapsed = false;

        tracing::info!(epoch = %self.epoch, "Order session torn down");
    }

    // ========================================================================
    // Projections
    // ========================================================================

    /// Current item lines with status
    pub fn items(&self) -> Vec<ItemLine> {
        self.state.read().items.clone()
    }

    pub fn table(&self) -> Option<Table> {
        self.state.read().table.clone()
    }

    pub fn order_id(&self) -> Option<i64> {
        self.state.read().order_id
    }

    /// Remaining whole seconds of the edit window. `Some(0)` after the
    /// window elapsed, `None` while no window is in play.
    pub fn seconds_left(&self) -> Option<i64> {
        if let Some(seconds) = self.timer.seconds_left() {
            return Some(seconds);
        }
        if self.state.read().window_elapsed {
            Some(0)
        } else {
            None
        }
    }

    pub fn draft_saved(&self) -> bool {
        self.state.read().draft_saved
    }

    /// Derived subtotal / tax / total
    pub fn totals(&self) -> OrderTotals {
        money::totals(&self.state.read().items)
    }

    /// Notification line for the order panel
    pub fn notice(&self) -> Notice {
        let seconds = self.seconds_left();
        let guard = self.state.read();

        if guard.draft_saved {
            Notice::DraftSaved
        } else if let Some(seconds) = seconds {
            if seconds > 0 {
                Notice::Countdown { seconds }
            } else {
                Notice::Locked
            }
        } else if guard.items.is_empty() {
            Notice::Empty
        } else {
            Notice::Ready
        }
    }

    // ========================================================================
    // Saga steps
    // ========================================================================

    fn ensure_live(&self) -> SessionResult<()> {
        if self.state.read().torn_down {
            return Err(SessionError::TornDown);
        }
        Ok(())
    }

    /// Cached table, provisioning a quick-order one on first need.
    ///
    /// The cached-result check is the concurrency guard: once assigned
    /// (pre-selected or provisioned) the table is never re-derived.
    async fn ensure_table(&self) -> SessionResult<Table> {
        if let Some(table) = self.state.read().table.clone() {
            return Ok(table);
        }

        let table = provision::provision_quick_order_table(self.store.as_ref()).await?;
        self.state.write().table = Some(table.clone());
        Ok(table)
    }

    /// Cached order, creating one (and occupying the table) on first need
    async fn ensure_order(&self, table: &Table) -> SessionResult<i64> {
        if let Some(order_id) = self.state.read().order_id {
            return Ok(order_id);
        }

        let server_name = self.state.read().server_name.clone();
        let order = self
            .store
            .create_order(OrderCreate {
                table_id: table.id,
                order_type: OrderType::DineIn,
                status: OrderStatus::Open,
                server_name,
            })
            .await
            .map_err(|e| SessionError::Provisioning(format!("order creation failed: {}", e)))?;

        self.state.write().order_id = Some(order.id);
        tracing::info!(order_id = order.id, table_id = table.id, "Order created");

        let occupied = self
            .store
            .update_table_status(table.id, TableStatus::Occupied)
            .await
            .map_err(|e| SessionError::Provisioning(format!("table occupation failed: {}", e)))?;
        self.state.write().table = Some(occupied);

        Ok(order.id)
    }

    /// Persist every draft line that has never been stored, in parallel.
    /// All creations are awaited before anything proceeds to send.
    async fn persist_drafts(&self, order_id: i64) -> SessionResult<()> {
        let pending: Vec<(usize, OrderItemCreate)> = {
            let guard = self.state.read();
            guard
                .items
                .iter()
                .enumerate()
                .filter(|(_, line)| line.status == ItemStatus::Draft && !line.is_persisted())
                .map(|(index, line)| {
                    (
                        index,
                        OrderItemCreate::draft(order_id, line.menu_item_id, line.quantity, line.price),
                    )
                })
                .collect()
        };
        if pending.is_empty() {
            return Ok(());
        }

        let records = futures::future::try_join_all(
            pending
                .iter()
                .map(|(_, create)| self.store.create_order_item(create.clone())),
        )
        .await?;

        let mut guard = self.state.write();
        for ((index, _), record) in pending.iter().zip(records) {
            if let Some(line) = guard.items.get_mut(*index) {
                line.item_id = Some(record.id);
            }
        }

        tracing::debug!(order_id, persisted = pending.len(), "Draft items persisted");
        Ok(())
    }

    /// Auto-clear the draft-saved confirmation after its display window.
    /// The generation check keeps a stale task from clearing a newer
    /// confirmation; teardown cancels the task entirely.
    fn spawn_notice_clear(&self, generation: u64) {
        let state = self.state.clone();
        let shutdown = self.shutdown.child_token();
        let secs = self.config.draft_notice_secs;

        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {
                    let mut guard = state.write();
                    if guard.draft_notice_generation == generation {
                        guard.draft_saved = false;
                    }
                }
            }
        });
    }
}
