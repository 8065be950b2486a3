//! Shared types for the comanda workspace
//!
//! Common types used across multiple crates: domain models, the order-line
//! state machine, the collaborator store contract, and utility helpers.

pub mod models;
pub mod order;
pub mod store;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Store contract re-exports (for convenient access)
pub use store::{OrderFilter, OrderStore, StoreError, StoreResult};
