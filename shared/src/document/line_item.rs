//! Line items of a document

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use super::error::{WorkflowError, WorkflowResult};
use crate::types::EntityId;

/// Identity of a line item
///
/// Rows added locally carry a transient key until the server confirms them
/// and hands back a persisted id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineItemId {
    Persisted(EntityId),
    Transient(Uuid),
}

impl LineItemId {
    pub fn transient() -> Self {
        Self::Transient(crate::util::transient_key())
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted(_))
    }

    pub fn persisted(&self) -> Option<EntityId> {
        match self {
            Self::Persisted(id) => Some(*id),
            Self::Transient(_) => None,
        }
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persisted(id) => write!(f, "#{}", id),
            Self::Transient(key) => write!(f, "~{}", key),
        }
    }
}

/// Where a row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemOrigin {
    #[default]
    Manual,
    /// Copied from a purchase order when the receivable was created
    OrderDerived { order_id: EntityId },
    /// Summed from one or more captain orders
    Aggregated,
}

/// One row of a document
///
/// `key` is the product (purchasing, requisitions) or menu (captain orders,
/// cash receipts) the row refers to; it is unique within a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    #[serde(rename = "ref_id", alias = "product_id", alias = "menu_id")]
    pub key: EntityId,
    /// Product or menu name snapshot, used when printing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default)]
    pub origin: ItemOrigin,
}

impl LineItem {
    /// Build a fresh transient row from validated input
    pub fn from_input(input: LineItemInput) -> WorkflowResult<Self> {
        input.check()?;
        Ok(Self {
            id: LineItemId::transient(),
            key: input.key,
            name: input.name,
            quantity: input.quantity,
            unit_price: input.unit_price,
            remark: input.remark,
            origin: ItemOrigin::Manual,
        })
    }

    /// Same rules as [`LineItemInput::check`], for rows built elsewhere
    pub fn check(&self) -> WorkflowResult<()> {
        if self.quantity == 0 {
            return Err(WorkflowError::InvalidQuantity);
        }
        if self.unit_price < Decimal::ZERO {
            return Err(WorkflowError::InvalidPrice);
        }
        Ok(())
    }

    /// Always `quantity * unit_price`, never stored
    pub fn total_price(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }

    /// Rows copied from a source order may not be deleted
    pub fn is_locked(&self) -> bool {
        matches!(self.origin, ItemOrigin::OrderDerived { .. })
    }

    pub fn apply(&mut self, input: LineItemInput) {
        self.key = input.key;
        self.quantity = input.quantity;
        self.unit_price = input.unit_price;
        self.remark = input.remark;
        if input.name.is_some() {
            self.name = input.name;
        }
    }

    pub fn to_input(&self) -> LineItemInput {
        LineItemInput {
            key: self.key,
            name: self.name.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            remark: self.remark.clone(),
        }
    }
}

/// Payload for adding or editing a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LineItemInput {
    #[serde(rename = "ref_id", alias = "product_id", alias = "menu_id")]
    pub key: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200))]
    pub name: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 255))]
    pub remark: Option<String>,
}

impl LineItemInput {
    pub fn new(key: EntityId, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            key,
            name: None,
            quantity,
            unit_price,
            remark: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        let remark = remark.into();
        self.remark = (!remark.trim().is_empty()).then_some(remark);
        self
    }

    /// Quantity must be positive and the price non-negative
    pub fn check(&self) -> WorkflowResult<()> {
        if self.quantity == 0 {
            return Err(WorkflowError::InvalidQuantity);
        }
        if self.unit_price < Decimal::ZERO {
            return Err(WorkflowError::InvalidPrice);
        }
        self.validate()?;
        Ok(())
    }
}
