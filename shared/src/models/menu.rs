//! Menu Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// Dish or drink sold to guests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub price: Decimal,
    /// Name printed on kitchen tickets, falls back to `name`
    #[serde(default)]
    pub kitchen_name: Option<String>,
    #[serde(default)]
    pub is_available: bool,
}

impl MenuItem {
    pub fn ticket_name(&self) -> &str {
        self.kitchen_name.as_deref().unwrap_or(&self.name)
    }
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kitchen_name: Option<String>,
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kitchen_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}
