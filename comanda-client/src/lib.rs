//! Comanda Client - HTTP client for the POS backend
//!
//! Provides network-based HTTP calls to the order/table/menu store and
//! implements the [`shared::store::OrderStore`] contract on top of them.

pub mod config;
pub mod error;
pub mod http;
mod store;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;

// Re-export shared store contract for convenience
pub use shared::store::{OrderStore, StoreError, StoreResult};
