//! Document header and the five concrete document kinds

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::action::{DocumentKind, WorkflowAction};
use super::error::{WorkflowError, WorkflowResult};
use super::gate::{self, Transition};
use super::items::LineItems;
use super::line_item::{LineItem, LineItemId, LineItemInput};
use super::status::{
    CaptainOrderStatus, CashReceiptStatus, PurchaseOrderStatus, ReceivableStatus,
    RequisitionStatus, WorkflowStatus,
};
use crate::types::{Actor, EntityId};

/// A header-plus-items document
///
/// `S` carries the status chain, `P` the kind-specific parties (supplier,
/// waiter, department...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<S, P> {
    /// `None` until the server has saved the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub number: String,
    pub date: NaiveDate,
    pub status: S,
    pub created_by: EntityId,
    #[serde(flatten)]
    pub parties: P,
    #[serde(default)]
    pub items: LineItems,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl<S: WorkflowStatus, P> Document<S, P> {
    pub fn new(number: impl Into<String>, date: NaiveDate, created_by: EntityId, parties: P) -> Self {
        Self {
            id: None,
            number: number.into(),
            date,
            status: S::initial(),
            created_by,
            parties,
            items: LineItems::new(),
            remark: None,
            rejection_reason: None,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        S::KIND
    }

    /// Whether a UI should offer add/edit/delete on the rows
    pub fn can_edit_items(&self) -> bool {
        self.status.is_editable()
    }

    pub fn ensure_editable(&self) -> WorkflowResult<()> {
        if self.can_edit_items() {
            Ok(())
        } else {
            Err(WorkflowError::NotEditable {
                kind: S::KIND,
                status: self.status.to_string(),
            })
        }
    }

    pub fn add_item(&mut self, input: LineItemInput) -> WorkflowResult<&LineItem> {
        self.ensure_editable()?;
        self.items.add(input)
    }

    pub fn edit_item(&mut self, id: LineItemId, input: LineItemInput) -> WorkflowResult<&LineItem> {
        self.ensure_editable()?;
        self.items.edit(id, input)
    }

    pub fn remove_item(&mut self, id: LineItemId) -> WorkflowResult<LineItem> {
        self.ensure_editable()?;
        self.items.remove(id)
    }

    /// Validate `action` without touching the document
    pub fn check_action(
        &self,
        action: WorkflowAction,
        actor: &Actor,
        reason: Option<&str>,
    ) -> WorkflowResult<Transition<S>> {
        gate::transition(self.status, action, actor, self.created_by, reason)
    }

    /// Record an accepted transition
    pub fn commit(&mut self, transition: &Transition<S>) {
        self.status = transition.to;
        if transition.action == WorkflowAction::Reject {
            self.rejection_reason = transition.reason.clone();
        }
    }

    /// Validate and apply `action` locally
    pub fn apply(
        &mut self,
        action: WorkflowAction,
        actor: &Actor,
        reason: Option<&str>,
    ) -> WorkflowResult<Transition<S>> {
        let transition = self.check_action(action, actor, reason)?;
        self.commit(&transition);
        Ok(transition)
    }

    /// Actions valid from the current status, regardless of who asks
    pub fn allowed_actions(&self) -> Vec<WorkflowAction> {
        self.status.allowed_actions()
    }

    /// Actions `actor` may run right now
    pub fn available_actions(&self, actor: &Actor) -> Vec<WorkflowAction> {
        gate::available_actions(self.status, actor, self.created_by)
    }

    pub fn total(&self) -> Decimal {
        self.items.total()
    }
}

// ============================================================================
// Parties per kind
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderParties {
    pub supplier_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivableParties {
    pub supplier_id: EntityId,
    /// Purchase order the items were taken from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptainOrderParties {
    pub waiter_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CashReceiptParties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiter_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    /// Captain orders whose items were summed into this receipt
    #[serde(default)]
    pub captain_order_ids: Vec<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequisitionParties {
    pub department_id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<EntityId>,
}

pub type PurchaseOrder = Document<PurchaseOrderStatus, OrderParties>;
pub type PurchaseReceivable = Document<ReceivableStatus, ReceivableParties>;
pub type CaptainOrder = Document<CaptainOrderStatus, CaptainOrderParties>;
pub type CashReceipt = Document<CashReceiptStatus, CashReceiptParties>;
pub type StoreRequisition = Document<RequisitionStatus, RequisitionParties>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Permission;
    use rust_decimal_macros::dec;

    fn order() -> PurchaseOrder {
        PurchaseOrder::new(
            "PO-0001",
            NaiveDate::from_ymd_opt(2026, 5, 4).unwrap(),
            1,
            OrderParties {
                supplier_id: 8,
                department_id: None,
                expected_date: None,
            },
        )
    }

    fn manager() -> Actor {
        Actor::new(2, [Permission::new("purchase_order:*")])
    }

    #[test]
    fn test_new_document_starts_in_initial_status() {
        let po = order();
        assert_eq!(po.status, PurchaseOrderStatus::Requested);
        assert_eq!(po.kind(), DocumentKind::PurchaseOrder);
        assert!(po.items.is_empty());
    }

    #[test]
    fn test_items_locked_after_leaving_editable_status() {
        let mut po = order();
        po.add_item(LineItemInput::new(1, 2, dec!(3))).unwrap();
        po.apply(WorkflowAction::Check, &manager(), None).unwrap();

        let err = po.add_item(LineItemInput::new(2, 1, dec!(1))).unwrap_err();
        assert!(matches!(err, WorkflowError::NotEditable { .. }));
        assert_eq!(po.items.len(), 1);
    }

    #[test]
    fn test_rejected_order_keeps_reason_and_is_editable() {
        let mut po = order();
        po.apply(WorkflowAction::Check, &manager(), None).unwrap();
        po.apply(WorkflowAction::Reject, &manager(), Some("wrong supplier"))
            .unwrap();
        assert_eq!(po.status, PurchaseOrderStatus::Rejected);
        assert_eq!(po.rejection_reason.as_deref(), Some("wrong supplier"));
        assert!(po.add_item(LineItemInput::new(1, 1, dec!(1))).is_ok());
    }

    #[test]
    fn test_failed_action_leaves_status() {
        let mut po = order();
        assert!(po.apply(WorkflowAction::Approve, &manager(), None).is_err());
        assert_eq!(po.status, PurchaseOrderStatus::Requested);
    }

    #[test]
    fn test_document_json_shape() {
        let json = r#"{
            "id": 4, "number": "SR-12", "date": "2026-05-04", "status": "APPROVED",
            "created_by": 3, "department_id": 6,
            "items": [{"id": 1, "product_id": 2, "quantity": 5, "unit_price": 0}]
        }"#;
        let doc: StoreRequisition = serde_json::from_str(json).unwrap();
        assert_eq!(doc.status, RequisitionStatus::Approved);
        assert_eq!(doc.parties.department_id, 6);
        assert_eq!(doc.items.len(), 1);
        assert!(!doc.can_edit_items());
        assert_eq!(doc.allowed_actions(), vec![WorkflowAction::Release]);
    }

    #[test]
    fn test_checked_order_refuses_item_edit_and_remove() {
        let mut po = order();
        let id = po.add_item(LineItemInput::new(1, 2, dec!(3))).unwrap().id;
        po.apply(WorkflowAction::Check, &manager(), None).unwrap();

        let err = po.edit_item(id, LineItemInput::new(1, 9, dec!(3))).unwrap_err();
        assert!(matches!(err, WorkflowError::NotEditable { .. }));
        let err = po.remove_item(id).unwrap_err();
        assert!(matches!(err, WorkflowError::NotEditable { .. }));

        let row = po.items.get(id).unwrap();
        assert_eq!(row.quantity, 2);
        assert_eq!(po.total(), dec!(6));
    }

    #[test]
    fn test_document_with_duplicate_keys_does_not_decode() {
        let json = r#"{
            "id": 4, "number": "SR-12", "date": "2026-05-04", "status": "REQUESTED",
            "created_by": 3, "department_id": 6,
            "items": [
                {"id": 1, "product_id": 2, "quantity": 5, "unit_price": 0},
                {"id": 2, "product_id": 2, "quantity": 1, "unit_price": 0}
            ]
        }"#;
        assert!(serde_json::from_str::<StoreRequisition>(json).is_err());
    }
}
