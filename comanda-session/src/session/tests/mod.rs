use super::*;
use crate::state::Notice;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared::models::{MenuItem, Order, OrderCreate, Table, TableCreate};
use shared::order::{OrderItemRecord, SentItem};
use shared::store::{OrderFilter, StoreError, StoreResult};
use shared::util::now_millis;

// ========================================================================
// In-memory mock store
// ========================================================================

#[derive(Default)]
struct MockData {
    tables: Vec<Table>,
    orders: Vec<Order>,
    items: Vec<OrderItemRecord>,
    menu: Vec<MenuItem>,
    next_id: i64,
    tables_created: usize,
    orders_created: usize,
    send_calls: usize,
    send_now_calls: usize,
    fail_delete: bool,
    fail_send: bool,
    window_millis: i64,
}

/// In-memory collaborator standing in for the backend REST API
pub(super) struct MockStore {
    data: Mutex<MockData>,
}

impl MockStore {
    /// Store with the production-like 15 s grace window
    fn new() -> Arc<Self> {
        Self::with_window(15_000)
    }

    /// Store whose `send` responses expire `window_millis` from now
    fn with_window(window_millis: i64) -> Arc<Self> {
        let store = Self {
            data: Mutex::new(MockData {
                next_id: 1000,
                window_millis,
                ..MockData::default()
            }),
        };
        store.seed_menu(menu_item(1, "Latte", 4.50));
        store.seed_menu(menu_item(2, "Espresso", 2.50));
        store.seed_menu(menu_item(3, "Croissant", 3.25));
        Arc::new(store)
    }

    fn next_id(data: &mut MockData) -> i64 {
        data.next_id += 1;
        data.next_id
    }

    fn seed_menu(&self, item: MenuItem) {
        self.data.lock().menu.push(item);
    }

    fn seed_table(&self, table: Table) {
        self.data.lock().tables.push(table);
    }

    fn seed_order(&self, order: Order) {
        self.data.lock().orders.push(order);
    }

    fn seed_item(&self, record: OrderItemRecord) {
        self.data.lock().items.push(record);
    }

    fn set_fail_delete(&self, fail: bool) {
        self.data.lock().fail_delete = fail;
    }

    fn set_fail_send(&self, fail: bool) {
        self.data.lock().fail_send = fail;
    }

    fn tables_created(&self) -> usize {
        self.data.lock().tables_created
    }

    fn orders_created(&self) -> usize {
        self.data.lock().orders_created
    }

    fn send_calls(&self) -> usize {
        self.data.lock().send_calls
    }

    fn send_now_calls(&self) -> usize {
        self.data.lock().send_now_calls
    }

    fn stored_tables(&self) -> Vec<Table> {
        self.data.lock().tables.clone()
    }

    fn stored_items(&self) -> Vec<OrderItemRecord> {
        self.data.lock().items.clone()
    }
}

#[async_trait]
impl OrderStore for MockStore {
    async fn list_menu_items(&self) -> StoreResult<Vec<MenuItem>> {
        Ok(self.data.lock().menu.clone())
    }

    async fn get_tables(&self) -> StoreResult<Vec<Table>> {
        Ok(self.data.lock().tables.clone())
    }

    async fn create_table(&self, table: TableCreate) -> StoreResult<Table> {
        let mut data = self.data.lock();
        let created = Table {
            id: Self::next_id(&mut data),
            number: table.number,
            section: table.section,
            seat_count: table.seat_count,
            status: table.status,
            quick_order: table.quick_order,
        };
        data.tables.push(created.clone());
        data.tables_created += 1;
        Ok(created)
    }

    async fn update_table_status(&self, id: i64, status: TableStatus) -> StoreResult<Table> {
        let mut data = self.data.lock();
        let table = data
            .tables
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("table {}", id)))?;
        table.status = status;
        Ok(table.clone())
    }

    async fn get_orders(&self, filter: OrderFilter) -> StoreResult<Vec<Order>> {
        let data = self.data.lock();
        Ok(data
            .orders
            .iter()
            .filter(|o| filter.table_id.is_none_or(|id| o.table_id == id))
            .filter(|o| filter.status.is_none_or(|s| o.status == s))
            .cloned()
            .collect())
    }

    async fn create_order(&self, order: OrderCreate) -> StoreResult<Order> {
        let mut data = self.data.lock();
        let created = Order {
            id: Self::next_id(&mut data),
            table_id: order.table_id,
            order_type: order.order_type,
            status: order.status,
            server_name: order.server_name,
            created_at: now_millis(),
            closed_at: None,
        };
        data.orders.push(created.clone());
        data.orders_created += 1;
        Ok(created)
    }

    async fn get_order_items(&self, order_id: i64) -> StoreResult<Vec<OrderItemRecord>> {
        let data = self.data.lock();
        Ok(data
            .items
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn create_order_item(&self, item: OrderItemCreate) -> StoreResult<OrderItemRecord> {
        let mut data = self.data.lock();
        let record = OrderItemRecord {
            id: Self::next_id(&mut data),
            order_id: item.order_id,
            menu_item_id: item.menu_item_id,
            price: item.price,
            quantity: item.quantity,
            status: item.status,
        };
        data.items.push(record.clone());
        Ok(record)
    }

    async fn delete_order_item(&self, id: i64) -> StoreResult<()> {
        let mut data = self.data.lock();
        if data.fail_delete {
            return Err(StoreError::Network("connection reset".to_string()));
        }
        data.items.retain(|i| i.id != id);
        Ok(())
    }

    async fn send_draft_items(&self, order_id: i64) -> StoreResult<Vec<SentItem>> {
        let mut data = self.data.lock();
        if data.fail_send {
            return Err(StoreError::Network("connection refused".to_string()));
        }
        data.send_calls += 1;
        let expiry = now_millis() + data.window_millis;
        let mut sent = Vec::new();
        for item in data.items.iter_mut() {
            if item.order_id == order_id && item.status == ItemStatus::Draft {
                item.status = ItemStatus::Limbo;
                sent.push(SentItem {
                    item_id: item.id,
                    release_expiry: expiry,
                });
            }
        }
        Ok(sent)
    }

    async fn send_now(&self, order_id: i64) -> StoreResult<()> {
        let mut data = self.data.lock();
        data.send_now_calls += 1;
        for item in data.items.iter_mut() {
            if item.order_id == order_id && item.status.is_editable() {
                item.status = ItemStatus::Pending;
            }
        }
        Ok(())
    }
}

// ========================================================================
// Fixtures
// ========================================================================

fn menu_item(id: i64, name: &str, price: f64) -> MenuItem {
    MenuItem {
        id,
        name: name.to_string(),
        price,
        category: "Coffee".to_string(),
    }
}

fn latte() -> MenuItem {
    menu_item(1, "Latte", 4.50)
}

fn espresso() -> MenuItem {
    menu_item(2, "Espresso", 2.50)
}

fn floor_table(id: i64, number: &str, status: TableStatus) -> Table {
    Table {
        id,
        number: number.to_string(),
        section: "Main".to_string(),
        seat_count: 4,
        status,
        quick_order: false,
    }
}

fn quick_table(id: i64, number: &str) -> Table {
    Table {
        id,
        number: number.to_string(),
        section: "Quick Orders".to_string(),
        seat_count: 0,
        status: TableStatus::Available,
        quick_order: true,
    }
}

fn open_order(id: i64, table_id: i64, created_at: i64) -> Order {
    Order {
        id,
        table_id,
        order_type: shared::models::OrderType::DineIn,
        status: OrderStatus::Open,
        server_name: "Alex".to_string(),
        created_at,
        closed_at: None,
    }
}

fn stored_item(id: i64, order_id: i64, menu_item_id: i64, status: ItemStatus) -> OrderItemRecord {
    OrderItemRecord {
        id,
        order_id,
        menu_item_id,
        price: 4.50,
        quantity: 1,
        status,
    }
}

/// Short windows so expiry-path tests stay fast
fn test_config() -> SessionConfig {
    SessionConfig {
        edit_window_secs: 1,
        draft_notice_secs: 1,
    }
}

/// Bare session: no table selected, quick order provisioned on demand
async fn open_bare_session(store: Arc<MockStore>) -> OrderSession {
    OrderSession::open_with_config(store, None, "Test Server", test_config())
        .await
        .unwrap()
}

async fn open_table_session(store: Arc<MockStore>, table: Table) -> OrderSession {
    OrderSession::open_with_config(store, Some(table), "Test Server", test_config())
        .await
        .unwrap()
}

mod test_flows;
