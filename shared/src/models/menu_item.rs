//! Menu Catalog Item Model
//!
//! Catalog management is a collaborator concern; this core only reads the
//! catalog to resolve display names and prices at add-to-order time.

use serde::{Deserialize, Serialize};

/// Menu catalog entry (菜单项)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    #[serde(rename = "menuItemId")]
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category: String,
}
