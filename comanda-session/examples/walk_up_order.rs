//! Walk-up order demo against a running backend
//!
//! Demonstrates the full quick-order flow:
//! 1. Connect to the POS backend
//! 2. Open a bare session (no table selected)
//! 3. Add the first item from the menu catalog
//! 4. Send the order and watch the edit window count down
//!
//! Run: cargo run --example walk_up_order
//!
//! The backend URL defaults to http://localhost:8080 and can be
//! overridden with the COMANDA_BACKEND environment variable.

use comanda_client::ClientConfig;
use comanda_session::{Notice, OrderSession, logger};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init_logger();

    let base_url =
        std::env::var("COMANDA_BACKEND").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let store = Arc::new(ClientConfig::new(&base_url).build_http_client());

    println!("Connecting to {}", base_url);
    let menu = comanda_session::OrderStore::list_menu_items(store.as_ref()).await?;
    let Some(first) = menu.first() else {
        return Err("menu catalog is empty".into());
    };
    println!("Ordering 1x {} ({:.2})", first.name, first.price);

    let session = OrderSession::open(store, None, "Demo Server").await?;
    session.add_item(first).await?;
    session.send_order().await?;

    let table = session.table().ok_or("no table assigned")?;
    println!(
        "Quick order {} opened, order #{}",
        table.number,
        session.order_id().ok_or("no order created")?
    );

    loop {
        match session.notice() {
            Notice::Countdown { seconds } => println!("{} seconds to edit", seconds),
            notice @ Notice::Locked => {
                println!("{}", notice.text());
                break;
            }
            notice => println!("{}", notice.text()),
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    let totals = session.totals();
    println!(
        "Subtotal {:.2}  Tax {:.2}  Total {:.2}",
        totals.subtotal, totals.tax, totals.total
    );

    session.teardown().await;
    Ok(())
}
