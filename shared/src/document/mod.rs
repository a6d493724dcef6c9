//! Approval-workflow documents
//!
//! Every business document (purchase orders, receivables, captain orders,
//! cash receipts, store requisitions) is a header plus line items moving
//! along a fixed status chain. This module owns the chains, the gate that
//! decides whether an action may run, the line-item rules and the merge
//! logic used to build one document from others.
//!
//! # Example
//!
//! ```
//! use shared::document::{PurchaseOrder, OrderParties, WorkflowAction, LineItemInput};
//! use shared::types::{Actor, Permission};
//! use rust_decimal::Decimal;
//!
//! let mut po = PurchaseOrder::new(
//!     "PO-0001",
//!     chrono::NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
//!     1,
//!     OrderParties { supplier_id: 4, department_id: None, expected_date: None },
//! );
//! po.add_item(LineItemInput::new(10, 3, Decimal::new(250, 2))).unwrap();
//!
//! let checker = Actor::new(2, [Permission::new("purchase_order:check")]);
//! po.apply(WorkflowAction::Check, &checker, None).unwrap();
//! assert!(!po.can_edit_items());
//! ```

pub mod action;
pub mod error;
pub mod gate;
pub mod header;
pub mod items;
pub mod line_item;
pub mod merge;
pub mod status;

pub use action::{DocumentKind, WorkflowAction};
pub use error::{WorkflowError, WorkflowResult};
pub use gate::{RejectReason, Transition};
pub use header::{
    CaptainOrder, CaptainOrderParties, CashReceipt, CashReceiptParties, Document, OrderParties,
    PurchaseOrder, PurchaseReceivable, ReceivableParties, RequisitionParties, StoreRequisition,
};
pub use items::LineItems;
pub use line_item::{ItemOrigin, LineItem, LineItemId, LineItemInput};
pub use merge::{ItemAggregator, ReceiptBuilder};
pub use status::{
    CaptainOrderStatus, CashReceiptStatus, PurchaseOrderStatus, ReceivableStatus,
    RequisitionStatus, WorkflowStatus,
};
