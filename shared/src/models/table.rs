//! Service Table Model
//!
//! A table is either a physical seat on the floor plan or an ephemeral
//! quick-order placeholder (see [`Table::is_quick_order`]). Quick-order
//! tables carry a `QO<n>` display number and are never reused once their
//! order closes.

use serde::{Deserialize, Serialize};

/// 快速单桌号前缀
pub const QUICK_ORDER_PREFIX: &str = "QO";

/// Section name assigned to provisioned quick-order tables
pub const QUICK_ORDER_SECTION: &str = "Quick Orders";

/// Table occupancy status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
}

/// Service table entity (桌台)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(rename = "tableId")]
    pub id: i64,
    /// Display number, e.g. `"T12"` or `"QO3"`
    #[serde(rename = "tableNumber")]
    pub number: String,
    pub section: String,
    pub seat_count: i32,
    pub status: TableStatus,
    /// Ephemeral flag: created on demand, never reused
    #[serde(rename = "isQuickOrder", default)]
    pub quick_order: bool,
}

impl Table {
    pub fn is_quick_order(&self) -> bool {
        self.quick_order || self.number.starts_with(QUICK_ORDER_PREFIX)
    }

    /// Numeric suffix of a quick-order number (`"QO7"` → `Some(7)`)
    pub fn quick_order_suffix(&self) -> Option<u32> {
        quick_order_suffix(&self.number)
    }
}

/// Parse the numeric suffix of a quick-order display number.
///
/// Non-quick-order numbers and malformed suffixes yield `None`.
pub fn quick_order_suffix(number: &str) -> Option<u32> {
    number
        .strip_prefix(QUICK_ORDER_PREFIX)
        .and_then(|suffix| suffix.parse().ok())
}

/// Create table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCreate {
    #[serde(rename = "tableNumber")]
    pub number: String,
    pub section: String,
    pub seat_count: i32,
    pub status: TableStatus,
    #[serde(rename = "isQuickOrder")]
    pub quick_order: bool,
}

/// Update table payload (status only from this surface)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableUpdate {
    pub status: TableStatus,
}
