//! Document kinds and workflow actions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every header-plus-items document that follows an approval workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    PurchaseOrder,
    PurchaseReceivable,
    CaptainOrder,
    CashReceipt,
    StoreRequisition,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::PurchaseOrder,
        DocumentKind::PurchaseReceivable,
        DocumentKind::CaptainOrder,
        DocumentKind::CashReceipt,
        DocumentKind::StoreRequisition,
    ];

    /// REST collection path segment
    pub fn resource(&self) -> &'static str {
        match self {
            Self::PurchaseOrder => "purchase-orders",
            Self::PurchaseReceivable => "purchase-receivables",
            Self::CaptainOrder => "captain-orders",
            Self::CashReceipt => "cash-receipts",
            Self::StoreRequisition => "store-requisitions",
        }
    }

    /// Prefix of the permission strings guarding this kind
    pub fn permission_scope(&self) -> &'static str {
        match self {
            Self::PurchaseOrder => "purchase_order",
            Self::PurchaseReceivable => "purchase_receivable",
            Self::CaptainOrder => "captain_order",
            Self::CashReceipt => "cash_receipt",
            Self::StoreRequisition => "store_requisition",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PurchaseOrder => "purchase order",
            Self::PurchaseReceivable => "purchase receivable",
            Self::CaptainOrder => "captain order",
            Self::CashReceipt => "cash receipt",
            Self::StoreRequisition => "store requisition",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    /// Accepts the REST resource name or the snake_case name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.resource() == s || k.permission_scope() == s)
            .ok_or_else(|| format!("unknown document kind: {}", s))
    }
}

/// Action token requested against a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowAction {
    Check,
    Approve,
    Reject,
    Print,
    /// Return a printed document to its editable status
    Reopen,
    Release,
}

impl WorkflowAction {
    pub const ALL: [WorkflowAction; 6] = [
        WorkflowAction::Check,
        WorkflowAction::Approve,
        WorkflowAction::Reject,
        WorkflowAction::Print,
        WorkflowAction::Reopen,
        WorkflowAction::Release,
    ];

    /// Token used in the `PATCH /<resource>/:id/<action>` path
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Print => "print",
            Self::Reopen => "reopen",
            Self::Release => "release",
        }
    }

    /// Permission string required to run this action on `kind`
    pub fn permission(&self, kind: DocumentKind) -> String {
        format!("{}:{}", kind.permission_scope(), self.as_str())
    }
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == lower)
            .ok_or_else(|| format!("unknown action: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_string() {
        assert_eq!(
            WorkflowAction::Approve.permission(DocumentKind::PurchaseOrder),
            "purchase_order:approve"
        );
        assert_eq!(
            WorkflowAction::Release.permission(DocumentKind::StoreRequisition),
            "store_requisition:release"
        );
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            "cash-receipts".parse::<DocumentKind>(),
            Ok(DocumentKind::CashReceipt)
        );
        assert_eq!(
            "captain_order".parse::<DocumentKind>(),
            Ok(DocumentKind::CaptainOrder)
        );
        assert!("invoices".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn test_action_from_str_is_case_insensitive() {
        assert_eq!("APPROVE".parse::<WorkflowAction>(), Ok(WorkflowAction::Approve));
        assert!("cancel".parse::<WorkflowAction>().is_err());
    }

    #[test]
    fn test_action_serde() {
        let json = serde_json::to_string(&WorkflowAction::Reopen).unwrap();
        assert_eq!(json, "\"reopen\"");
    }
}
