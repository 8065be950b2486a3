//! Order-item state machine and line types
//!
//! A line item moves strictly forward through its lifecycle:
//!
//! ```text
//! draft → limbo → pending → fired → completed
//! ```
//!
//! No status ever regresses; the only way back is deletion, and deletion
//! is only allowed while the line is still editable (`draft`/`limbo`).
//! `pending`, `fired` and `completed` are driven by the preparation-queue
//! collaborator; this core accepts whatever status the collaborator
//! reports without validating the transition source.

use crate::models::MenuItem;
use serde::{Deserialize, Serialize};

/// Line item status (状态机)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Selected locally, not yet guaranteed persisted
    #[default]
    Draft,
    /// Persisted and transmitted, still inside the edit window
    Limbo,
    /// Edit window elapsed, locked, awaiting kitchen acknowledgment
    Pending,
    /// Accepted by the preparation system
    Fired,
    /// Marked done by the preparation system
    Completed,
}

impl ItemStatus {
    /// Position in the forward-only lifecycle
    pub fn rank(self) -> u8 {
        match self {
            ItemStatus::Draft => 0,
            ItemStatus::Limbo => 1,
            ItemStatus::Pending => 2,
            ItemStatus::Fired => 3,
            ItemStatus::Completed => 4,
        }
    }

    /// Editable (and deletable) from the order-entry surface
    pub fn is_editable(self) -> bool {
        matches!(self, ItemStatus::Draft | ItemStatus::Limbo)
    }

    /// Locked read-only downstream state
    pub fn is_locked(self) -> bool {
        !self.is_editable()
    }

    /// Whether moving to `next` respects the no-regression invariant
    pub fn can_advance_to(self, next: ItemStatus) -> bool {
        next.rank() >= self.rank()
    }
}

/// Persisted order-item record as returned by the collaborator store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRecord {
    #[serde(rename = "orderItemId")]
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub price: f64,
    pub quantity: i32,
    pub status: ItemStatus,
}

/// Create order-item payload (always enters the store as `draft`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemCreate {
    pub order_id: i64,
    pub menu_item_id: i64,
    pub quantity: i32,
    pub price: f64,
    pub status: ItemStatus,
}

impl OrderItemCreate {
    pub fn draft(order_id: i64, menu_item_id: i64, quantity: i32, price: f64) -> Self {
        Self {
            order_id,
            menu_item_id,
            quantity,
            price,
            status: ItemStatus::Draft,
        }
    }
}

/// One entry of the `send_draft_items` response: the item actually
/// transmitted toward the kitchen plus its grace-period expiry instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentItem {
    #[serde(rename = "itemId")]
    pub item_id: i64,
    /// Grace-period expiry (Unix millis)
    #[serde(rename = "releaseExpiry")]
    pub release_expiry: i64,
}

/// In-memory editable line of the composition view.
///
/// `item_id == None` means the line has never been persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemLine {
    #[serde(rename = "orderItemId", skip_serializing_if = "Option::is_none")]
    pub item_id: Option<i64>,
    pub menu_item_id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub status: ItemStatus,
}

impl ItemLine {
    /// New local draft line from a menu selection
    pub fn draft(menu_item: &MenuItem) -> Self {
        Self {
            item_id: None,
            menu_item_id: menu_item.id,
            name: menu_item.name.clone(),
            price: menu_item.price,
            quantity: 1,
            status: ItemStatus::Draft,
        }
    }

    /// Rebuild a line from a persisted record, resolving the display name
    /// through the menu catalog. Unresolvable ids keep a fallback label
    /// instead of failing the whole load.
    pub fn from_record(record: &OrderItemRecord, menu: &[MenuItem]) -> Self {
        let name = menu
            .iter()
            .find(|m| m.id == record.menu_item_id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| format!("#{}", record.menu_item_id));
        Self {
            item_id: Some(record.id),
            menu_item_id: record.menu_item_id,
            name,
            price: record.price,
            quantity: record.quantity,
            status: record.status,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.item_id.is_some()
    }
}
