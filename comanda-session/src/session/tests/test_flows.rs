use super::*;
use std::time::Duration;

#[tokio::test]
async fn walk_up_send_provisions_releases_and_starts_countdown() {
    let store = MockStore::new();
    store.seed_table(quick_table(1, "QO1"));

    let session = open_bare_session(store.clone()).await;
    session.add_item(&latte()).await.unwrap();
    session.send_order().await.unwrap();

    // One table past the current max, one order, one persisted item
    let table = session.table().unwrap();
    assert_eq!(table.number, "QO2");
    assert_eq!(table.status, TableStatus::Occupied);
    assert_eq!(store.orders_created(), 1);

    let stored = store.stored_items();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status, ItemStatus::Limbo);

    // Local line entered limbo and the 15 s countdown is running
    let items = session.items();
    assert_eq!(items[0].status, ItemStatus::Limbo);
    assert!(items[0].is_persisted());
    assert_eq!(session.seconds_left(), Some(15));
    assert_eq!(session.notice(), Notice::Countdown { seconds: 15 });
}

#[tokio::test]
async fn expiry_locks_both_limbo_items_and_flips_the_notice() {
    let store = MockStore::with_window(400);
    let session = open_bare_session(store.clone()).await;

    session.add_item(&latte()).await.unwrap();
    session.add_item(&espresso()).await.unwrap();
    session.send_order().await.unwrap();

    let text = session.notice().text();
    assert!(text.ends_with("seconds to edit"), "unexpected notice: {}", text);

    tokio::time::sleep(Duration::from_millis(800)).await;

    let items = session.items();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.status == ItemStatus::Pending));
    assert_eq!(session.seconds_left(), Some(0));
    assert_eq!(
        session.notice().text(),
        "Items locked and sent to prep station"
    );
}

#[tokio::test]
async fn expiry_leaves_later_drafts_untouched() {
    let store = MockStore::with_window(400);
    let session = open_bare_session(store.clone()).await;

    session.add_item(&latte()).await.unwrap();
    session.send_order().await.unwrap();
    tokio::time::sleep(Duration::from_millis(800)).await;

    // Window elapsed; a fresh selection starts a new draft round
    session.add_item(&espresso()).await.unwrap();

    let items = session.items();
    assert_eq!(items[0].status, ItemStatus::Pending);
    assert_eq!(items[1].status, ItemStatus::Draft);
    // The elapsed-window notice is gone once composing resumes
    assert_eq!(session.notice(), Notice::Ready);
}

#[tokio::test]
async fn adding_during_the_window_sends_immediately_and_resets_it() {
    let store = MockStore::new();
    let session = open_bare_session(store.clone()).await;

    session.add_item(&latte()).await.unwrap();
    session.send_order().await.unwrap();
    assert_eq!(store.send_calls(), 1);

    tokio::time::sleep(Duration::from_millis(1200)).await;
    let before = session.seconds_left().unwrap();
    assert!(before < 15, "countdown should have progressed, got {}", before);

    session.add_item(&espresso()).await.unwrap();

    // No batching wait: persisted and transmitted at once, limbo directly
    assert_eq!(store.send_calls(), 2);
    let items = session.items();
    assert_eq!(items[1].status, ItemStatus::Limbo);
    assert!(items[1].is_persisted());

    // The shared window restarted at the full constant, it did not stack
    assert_eq!(session.seconds_left(), Some(15));
}

#[tokio::test]
async fn removing_a_limbo_item_resets_the_window_for_the_rest() {
    let store = MockStore::new();
    let session = open_bare_session(store.clone()).await;

    session.add_item(&latte()).await.unwrap();
    session.add_item(&espresso()).await.unwrap();
    session.send_order().await.unwrap();

    tokio::time::sleep(Duration::from_millis(1200)).await;
    session.remove_item(0).await.unwrap();

    // Deleted remotely and locally; the survivor keeps a fresh window
    assert_eq!(store.stored_items().len(), 1);
    let items = session.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].status, ItemStatus::Limbo);
    // Reset arms the fixed 1 s test window, not the store's 15 s expiry
    assert!(session.seconds_left().unwrap() <= 1);
}

#[tokio::test]
async fn removing_the_last_limbo_item_cancels_the_timer() {
    let store = MockStore::new();
    let session = open_bare_session(store.clone()).await;

    session.add_item(&latte()).await.unwrap();
    session.send_order().await.unwrap();
    assert!(session.seconds_left().is_some());

    session.remove_item(0).await.unwrap();

    assert!(store.stored_items().is_empty());
    assert!(session.items().is_empty());
    // Cancelled, not merely reset: no countdown and no locked notice
    assert_eq!(session.seconds_left(), None);
    assert_eq!(session.notice(), Notice::Empty);
}

#[tokio::test]
async fn send_now_releases_early_and_resyncs_from_the_store() {
    let store = MockStore::new();
    let session = open_bare_session(store.clone()).await;

    session.add_item(&latte()).await.unwrap();
    session.add_item(&espresso()).await.unwrap();
    session.send_order().await.unwrap();
    assert!(session.seconds_left().unwrap() > 0);

    session.send_now().await.unwrap();

    assert_eq!(store.send_now_calls(), 1);
    // Authoritative refresh: statuses come from the store, not the guess
    let items = session.items();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.status == ItemStatus::Pending));
    assert_eq!(session.seconds_left(), Some(0));
    assert_eq!(session.notice(), Notice::Locked);
}

#[tokio::test]
async fn draft_saved_confirmation_clears_when_sending() {
    let store = MockStore::new();
    let session = open_bare_session(store.clone()).await;

    session.add_item(&latte()).await.unwrap();
    session.save_draft().await.unwrap();
    assert_eq!(session.notice(), Notice::DraftSaved);

    session.send_order().await.unwrap();

    // Countdown outranks the stale confirmation
    assert!(matches!(session.notice(), Notice::Countdown { .. }));
}
