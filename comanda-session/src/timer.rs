//! Edit-Window Timer Controller
//!
//! One timer per order, not per item. The countdown owns the sole
//! mechanism that ends the grace period: on expiry every item that is
//! `limbo` *at fire time* becomes `pending`. Arming while a countdown is
//! live replaces the expiry (the window restarts, it never accumulates).
//!
//! The background task sleeps until the armed instant and re-evaluates
//! whenever the arm cell changes, so a reset during a pending wakeup
//! simply pushes the deadline out. Firing takes the armed expiry out of
//! the cell under its lock, which makes the transition run exactly once
//! even when a natural expiry races a forced one.

use crate::state::{SessionState, apply_expiry};
use parking_lot::RwLock;
use shared::util::now_millis;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// Armed expiry instant (Unix millis); `None` while idle
#[derive(Default)]
struct ArmCell {
    expiry: RwLock<Option<i64>>,
}

/// Countdown controller for one composition session
pub struct EditWindowTimer {
    cell: Arc<ArmCell>,
    rearm: Arc<Notify>,
    state: Arc<RwLock<SessionState>>,
}

impl EditWindowTimer {
    /// Spawn the countdown task for a session. The task exits when
    /// `shutdown` is cancelled.
    pub fn spawn(state: Arc<RwLock<SessionState>>, shutdown: CancellationToken) -> Self {
        let cell = Arc::new(ArmCell::default());
        let rearm = Arc::new(Notify::new());

        tokio::spawn(run_loop(
            cell.clone(),
            rearm.clone(),
            state.clone(),
            shutdown,
        ));

        Self { cell, rearm, state }
    }

    /// Begin a countdown of `duration_secs` from now
    pub fn start(&self, duration_secs: i64) {
        self.arm_until(now_millis() + duration_secs * 1000);
    }

    /// Replace the current expiry with a fresh window of `duration_secs`
    pub fn reset(&self, duration_secs: i64) {
        self.start(duration_secs);
    }

    /// Arm (or re-arm) the countdown to fire at `expiry_millis`
    pub fn arm_until(&self, expiry_millis: i64) {
        *self.cell.expiry.write() = Some(expiry_millis);
        self.rearm.notify_one();
        tracing::debug!(expiry_millis, "Edit window armed");
    }

    /// Clear the countdown without transitioning any item
    pub fn cancel(&self) {
        *self.cell.expiry.write() = None;
        self.rearm.notify_one();
        tracing::debug!("Edit window cancelled");
    }

    /// Perform the expiry transition immediately ("send now").
    ///
    /// Returns the number of items locked; 0 when no countdown was armed
    /// (the natural expiry already fired, or nothing was ever armed).
    pub fn force_expire(&self) -> usize {
        if self.cell.expiry.write().take().is_none() {
            return 0;
        }
        self.rearm.notify_one();
        fire(&self.state)
    }

    pub fn is_armed(&self) -> bool {
        self.cell.expiry.read().is_some()
    }

    /// Remaining whole seconds of the edit window, rounded up.
    /// `None` while idle; never negative.
    pub fn seconds_left(&self) -> Option<i64> {
        let expiry = (*self.cell.expiry.read())?;
        Some(((expiry - now_millis()).max(0) + 999) / 1000)
    }
}

/// Apply the expiry transition over the live item list.
fn fire(state: &RwLock<SessionState>) -> usize {
    let mut guard = state.write();
    let locked = apply_expiry(&mut guard.items);
    guard.window_elapsed = true;
    tracing::info!(locked, "Edit window expired, limbo items locked");
    locked
}

async fn run_loop(
    cell: Arc<ArmCell>,
    rearm: Arc<Notify>,
    state: Arc<RwLock<SessionState>>,
    shutdown: CancellationToken,
) {
    loop {
        let armed = *cell.expiry.read();

        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::debug!("Edit-window timer stopped");
                return;
            }
            _ = rearm.notified() => {
                // Arm cell changed; recompute the deadline
                continue;
            }
            _ = sleep_until(armed) => {
                fire_if_due(&cell, &state);
            }
        }
    }
}

/// Sleep until the armed instant, or forever while idle
async fn sleep_until(armed: Option<i64>) {
    match armed {
        Some(expiry) => {
            let remaining = expiry - now_millis();
            if remaining > 0 {
                tokio::time::sleep(Duration::from_millis(remaining as u64)).await;
            }
        }
        None => std::future::pending().await,
    }
}

/// Fire the expiry transition if the armed deadline has truly passed.
///
/// A reset that landed while we slept moves the deadline into the
/// future; in that case nothing is taken and the loop re-arms.
fn fire_if_due(cell: &ArmCell, state: &RwLock<SessionState>) {
    {
        let mut armed = cell.expiry.write();
        match *armed {
            Some(expiry) if now_millis() >= expiry => {
                *armed = None;
            }
            _ => return,
        }
    }
    fire(state);
}
