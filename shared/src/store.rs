//! Collaborator store contract
//!
//! The order/table/menu store and the preparation queue are external
//! collaborators; this trait is the only surface through which the
//! session core talks to them. `comanda-client` provides the HTTP
//! implementation; tests substitute an in-memory one.

use crate::models::{MenuItem, Order, OrderCreate, OrderStatus, Table, TableCreate, TableStatus};
use crate::order::{OrderItemCreate, OrderItemRecord, SentItem};
use async_trait::async_trait;
use thiserror::Error;

/// Store error type
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Transport-level failure (connection refused, timeout, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// Collaborator rejected the request
    #[error("Store returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Server-side filter for order listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub table_id: Option<i64>,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    /// Open orders of one table
    pub fn open_for_table(table_id: i64) -> Self {
        Self {
            table_id: Some(table_id),
            status: Some(OrderStatus::Open),
        }
    }
}

/// Logical operations of the collaborator store/API.
///
/// Exact wire shapes are owned by the collaborator; every call is awaited
/// once with the error surfaced to the caller, no automatic retry.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn list_menu_items(&self) -> StoreResult<Vec<MenuItem>>;

    async fn get_tables(&self) -> StoreResult<Vec<Table>>;
    async fn create_table(&self, table: TableCreate) -> StoreResult<Table>;
    async fn update_table_status(&self, id: i64, status: TableStatus) -> StoreResult<Table>;

    async fn get_orders(&self, filter: OrderFilter) -> StoreResult<Vec<Order>>;
    async fn create_order(&self, order: OrderCreate) -> StoreResult<Order>;

    async fn get_order_items(&self, order_id: i64) -> StoreResult<Vec<OrderItemRecord>>;
    async fn create_order_item(&self, item: OrderItemCreate) -> StoreResult<OrderItemRecord>;
    async fn delete_order_item(&self, id: i64) -> StoreResult<()>;

    /// Transmit all `draft` items of the order toward the kitchen and
    /// return the items actually sent with their grace-period expiry.
    async fn send_draft_items(&self, order_id: i64) -> StoreResult<Vec<SentItem>>;

    /// Force immediate release, bypassing the remaining grace period.
    async fn send_now(&self, order_id: i64) -> StoreResult<()>;
}
