//! Session state and the pure expiry transition
//!
//! The expiry transition is deliberately a pure function over the item
//! list so the state machine stays testable independently of the
//! scheduling mechanism that invokes it.

use serde::Serialize;
use shared::models::Table;
use shared::order::{ItemLine, ItemStatus};

/// In-memory state of one order-composition screen.
///
/// Lifecycle: created on table selection (or bare for quick orders),
/// discarded on navigation away or payment completion.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Assigned table; `None` until a quick order provisions one
    pub table: Option<Table>,
    /// Canonical order receiving new items; `None` until first save/send
    pub order_id: Option<i64>,
    pub server_name: String,
    pub items: Vec<ItemLine>,
    /// Transient draft-saved confirmation flag
    pub draft_saved: bool,
    /// Bumped on every save; stale clear tasks compare against it
    pub draft_notice_generation: u64,
    /// The edit window has elapsed and nothing was added since
    pub window_elapsed: bool,
    /// Set by teardown; every operation afterwards is rejected
    pub torn_down: bool,
}

impl SessionState {
    pub fn new(server_name: impl Into<String>) -> Self {
        Self {
            server_name: server_name.into(),
            ..Self::default()
        }
    }

    pub fn has_limbo_items(&self) -> bool {
        self.items.iter().any(|i| i.status == ItemStatus::Limbo)
    }
}

/// Transition every `limbo` item to `pending`, leaving all other
/// statuses untouched. Returns the number of items locked.
///
/// Invoked by the timer at fire time over the live item list, never over
/// a list captured when the countdown was armed.
pub fn apply_expiry(items: &mut [ItemLine]) -> usize {
    let mut locked = 0;
    for item in items.iter_mut() {
        if item.status == ItemStatus::Limbo {
            item.status = ItemStatus::Pending;
            locked += 1;
        }
    }
    locked
}

/// Notification line of the composition view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// No items yet
    Empty,
    /// Items present, nothing in flight
    Ready,
    /// Draft persisted, confirmation window running
    DraftSaved,
    /// Edit window counting down
    Countdown { seconds: i64 },
    /// Window elapsed, items released
    Locked,
}

impl Notice {
    /// Display text as shown in the order panel
    pub fn text(&self) -> String {
        match self {
            Notice::Empty => "Add items to order".to_string(),
            Notice::Ready => "Ready to send or save as draft".to_string(),
            Notice::DraftSaved => "Draft saved! Items remain editable".to_string(),
            Notice::Countdown { seconds } => format!("{} seconds to edit", seconds),
            Notice::Locked => "Items locked and sent to prep station".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(status: ItemStatus) -> ItemLine {
        ItemLine {
            item_id: Some(1),
            menu_item_id: 1,
            name: "Test".to_string(),
            price: 1.0,
            quantity: 1,
            status,
        }
    }

    #[test]
    fn expiry_locks_exactly_the_limbo_items() {
        let mut items = vec![
            line(ItemStatus::Draft),
            line(ItemStatus::Limbo),
            line(ItemStatus::Limbo),
            line(ItemStatus::Pending),
            line(ItemStatus::Fired),
            line(ItemStatus::Completed),
        ];

        let locked = apply_expiry(&mut items);

        assert_eq!(locked, 2);
        assert_eq!(items[0].status, ItemStatus::Draft);
        assert_eq!(items[1].status, ItemStatus::Pending);
        assert_eq!(items[2].status, ItemStatus::Pending);
        assert_eq!(items[3].status, ItemStatus::Pending);
        assert_eq!(items[4].status, ItemStatus::Fired);
        assert_eq!(items[5].status, ItemStatus::Completed);
    }

    #[test]
    fn expiry_on_empty_list_locks_nothing() {
        let mut items = Vec::new();
        assert_eq!(apply_expiry(&mut items), 0);
    }

    #[test]
    fn notice_text_matches_order_panel() {
        assert_eq!(
            Notice::Countdown { seconds: 7 }.text(),
            "7 seconds to edit"
        );
        assert_eq!(
            Notice::Locked.text(),
            "Items locked and sent to prep station"
        );
    }
}
