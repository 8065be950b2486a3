//! Order-line types shared between the session core and the store client

pub mod item;

pub use item::{ItemLine, ItemStatus, OrderItemCreate, OrderItemRecord, SentItem};
