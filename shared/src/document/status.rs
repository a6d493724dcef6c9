//! Status chains of each document kind

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::action::{DocumentKind, WorkflowAction};

/// A document status enum together with its transition table
///
/// `next` is the whole state machine of a kind: it answers which status an
/// action leads to, or `None` when the action is a skip, a reversal or
/// otherwise not part of the chain.
pub trait WorkflowStatus:
    Copy + Eq + fmt::Debug + fmt::Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: DocumentKind;

    /// Status a freshly created document starts in
    fn initial() -> Self;

    /// Whether line items may be added, edited or deleted
    fn is_editable(&self) -> bool;

    fn next(&self, action: WorkflowAction) -> Option<Self>;

    /// Actions that are valid from this status
    fn allowed_actions(&self) -> Vec<WorkflowAction> {
        WorkflowAction::ALL
            .into_iter()
            .filter(|a| self.next(*a).is_some())
            .collect()
    }

    fn is_terminal(&self) -> bool {
        self.allowed_actions().is_empty()
    }
}

macro_rules! status_display {
    ($ty:ty { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(match self {
                    $(Self::$variant => $text,)+
                })
            }
        }
    };
}

// ============================================================================
// Purchase Order: Requested -> Checked -> Approved, Rejected branch
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOrderStatus {
    #[default]
    Requested,
    Checked,
    Approved,
    Rejected,
}

status_display!(PurchaseOrderStatus {
    Requested => "REQUESTED",
    Checked => "CHECKED",
    Approved => "APPROVED",
    Rejected => "REJECTED",
});

impl WorkflowStatus for PurchaseOrderStatus {
    const KIND: DocumentKind = DocumentKind::PurchaseOrder;

    fn initial() -> Self {
        Self::Requested
    }

    fn is_editable(&self) -> bool {
        matches!(self, Self::Requested | Self::Rejected)
    }

    fn next(&self, action: WorkflowAction) -> Option<Self> {
        use WorkflowAction::*;
        match (self, action) {
            (Self::Requested, Check) => Some(Self::Checked),
            (Self::Checked, Approve) => Some(Self::Approved),
            (Self::Requested | Self::Checked, Reject) => Some(Self::Rejected),
            _ => None,
        }
    }
}

// ============================================================================
// Purchase Receivable (GRV): Requested -> Approved
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceivableStatus {
    #[default]
    Requested,
    Approved,
}

status_display!(ReceivableStatus {
    Requested => "REQUESTED",
    Approved => "APPROVED",
});

impl WorkflowStatus for ReceivableStatus {
    const KIND: DocumentKind = DocumentKind::PurchaseReceivable;

    fn initial() -> Self {
        Self::Requested
    }

    fn is_editable(&self) -> bool {
        matches!(self, Self::Requested)
    }

    fn next(&self, action: WorkflowAction) -> Option<Self> {
        match (self, action) {
            (Self::Requested, WorkflowAction::Approve) => Some(Self::Approved),
            _ => None,
        }
    }
}

// ============================================================================
// Print-only documents: toggle between open and printed
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaptainOrderStatus {
    #[default]
    #[serde(alias = "CREATED")]
    Pending,
    Printed,
}

status_display!(CaptainOrderStatus {
    Pending => "PENDING",
    Printed => "PRINTED",
});

impl WorkflowStatus for CaptainOrderStatus {
    const KIND: DocumentKind = DocumentKind::CaptainOrder;

    fn initial() -> Self {
        Self::Pending
    }

    fn is_editable(&self) -> bool {
        matches!(self, Self::Pending)
    }

    fn next(&self, action: WorkflowAction) -> Option<Self> {
        match action {
            // reprinting leaves the status where it is
            WorkflowAction::Print => Some(Self::Printed),
            WorkflowAction::Reopen if *self == Self::Printed => Some(Self::Pending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashReceiptStatus {
    #[default]
    Created,
    Printed,
}

status_display!(CashReceiptStatus {
    Created => "CREATED",
    Printed => "PRINTED",
});

impl WorkflowStatus for CashReceiptStatus {
    const KIND: DocumentKind = DocumentKind::CashReceipt;

    fn initial() -> Self {
        Self::Created
    }

    fn is_editable(&self) -> bool {
        matches!(self, Self::Created)
    }

    fn next(&self, action: WorkflowAction) -> Option<Self> {
        match action {
            WorkflowAction::Print => Some(Self::Printed),
            WorkflowAction::Reopen if *self == Self::Printed => Some(Self::Created),
            _ => None,
        }
    }
}

// ============================================================================
// Store Requisition: Requested -> Approved -> Released
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequisitionStatus {
    #[default]
    Requested,
    Approved,
    Released,
}

status_display!(RequisitionStatus {
    Requested => "REQUESTED",
    Approved => "APPROVED",
    Released => "RELEASED",
});

impl WorkflowStatus for RequisitionStatus {
    const KIND: DocumentKind = DocumentKind::StoreRequisition;

    fn initial() -> Self {
        Self::Requested
    }

    fn is_editable(&self) -> bool {
        matches!(self, Self::Requested)
    }

    fn next(&self, action: WorkflowAction) -> Option<Self> {
        use WorkflowAction::*;
        match (self, action) {
            (Self::Requested, Approve) => Some(Self::Approved),
            (Self::Approved, Release) => Some(Self::Released),
            _ => None,
        }
    }
}
