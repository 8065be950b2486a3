//! Order Model
//!
//! One order is one tab against a table. An order stays `open` for the
//! whole visit and is closed by payment. A table can legitimately hold
//! more than one concurrently open order (split scenarios); the session
//! aggregator is responsible for merging them into a single view.

use serde::{Deserialize, Serialize};

/// 服务类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// 堂食
    #[default]
    DineIn,
    /// 外卖/打包
    Takeout,
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Open,
    Closed,
}

/// Order entity (订单)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "orderId")]
    pub id: i64,
    pub table_id: i64,
    pub order_type: OrderType,
    pub status: OrderStatus,
    #[serde(default)]
    pub server_name: String,
    /// Creation timestamp (Unix millis)
    pub created_at: i64,
    /// Close timestamp (Unix millis), set by payment settlement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<i64>,
}

impl Order {
    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub table_id: i64,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub server_name: String,
}
