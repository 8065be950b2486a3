//! `OrderStore` implementation over the backend REST API

use crate::HttpClient;
use async_trait::async_trait;
use shared::models::{MenuItem, Order, OrderCreate, Table, TableCreate, TableStatus, TableUpdate};
use shared::order::{OrderItemCreate, OrderItemRecord, SentItem};
use shared::store::{OrderFilter, OrderStore, StoreResult};

#[async_trait]
impl OrderStore for HttpClient {
    async fn list_menu_items(&self) -> StoreResult<Vec<MenuItem>> {
        Ok(self.get("api/menu-items").await?)
    }

    async fn get_tables(&self) -> StoreResult<Vec<Table>> {
        Ok(self.get("api/tables").await?)
    }

    async fn create_table(&self, table: TableCreate) -> StoreResult<Table> {
        tracing::debug!(number = %table.number, "Creating table");
        Ok(self.post("api/tables", &table).await?)
    }

    async fn update_table_status(&self, id: i64, status: TableStatus) -> StoreResult<Table> {
        let update = TableUpdate { status };
        Ok(self.put(&format!("api/tables/{}", id), &update).await?)
    }

    async fn get_orders(&self, filter: OrderFilter) -> StoreResult<Vec<Order>> {
        let mut path = String::from("api/orders");
        let mut params = Vec::new();
        if let Some(table_id) = filter.table_id {
            params.push(format!("tableId={}", table_id));
        }
        if let Some(status) = filter.status {
            let value = match status {
                shared::models::OrderStatus::Open => "open",
                shared::models::OrderStatus::Closed => "closed",
            };
            params.push(format!("status={}", value));
        }
        if !params.is_empty() {
            path = format!("{}?{}", path, params.join("&"));
        }
        Ok(self.get(&path).await?)
    }

    async fn create_order(&self, order: OrderCreate) -> StoreResult<Order> {
        tracing::debug!(table_id = order.table_id, "Creating order");
        Ok(self.post("api/orders", &order).await?)
    }

    async fn get_order_items(&self, order_id: i64) -> StoreResult<Vec<OrderItemRecord>> {
        Ok(self
            .get(&format!("api/order-items/order/{}", order_id))
            .await?)
    }

    async fn create_order_item(&self, item: OrderItemCreate) -> StoreResult<OrderItemRecord> {
        Ok(self.post("api/order-items", &item).await?)
    }

    async fn delete_order_item(&self, id: i64) -> StoreResult<()> {
        Ok(self.delete(&format!("api/order-items/{}", id)).await?)
    }

    async fn send_draft_items(&self, order_id: i64) -> StoreResult<Vec<SentItem>> {
        tracing::debug!(order_id, "Sending draft items");
        Ok(self
            .post_empty(&format!("api/order-items/order/{}/send", order_id))
            .await?)
    }

    async fn send_now(&self, order_id: i64) -> StoreResult<()> {
        tracing::debug!(order_id, "Forcing immediate release");
        Ok(self
            .post_no_content(&format!("api/order-items/order/{}/send-now", order_id))
            .await?)
    }
}
