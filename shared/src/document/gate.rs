//! Transition gate: validates an action against status, actor and reason

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::action::WorkflowAction;
use super::error::{WorkflowError, WorkflowResult};
use super::status::WorkflowStatus;
use crate::types::{Actor, EntityId};

/// Maximum length of a rejection reason
pub const MAX_REASON_LEN: usize = 500;

/// Body sent with `PATCH /<resource>/:id/reject`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RejectReason {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

impl RejectReason {
    /// Trim and validate a user-entered reason
    pub fn parse(raw: Option<&str>) -> WorkflowResult<Self> {
        let reason = raw.map(str::trim).unwrap_or_default().to_string();
        if reason.is_empty() {
            return Err(WorkflowError::ReasonRequired);
        }
        let body = Self { reason };
        body.validate()?;
        Ok(body)
    }
}

/// An accepted transition, ready to be sent to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<S> {
    pub from: S,
    pub to: S,
    pub action: WorkflowAction,
    pub reason: Option<String>,
}

/// Owner of the document, or a holder of `<scope>:<action>`
pub fn authorize<S: WorkflowStatus>(
    action: WorkflowAction,
    actor: &Actor,
    owner: EntityId,
) -> WorkflowResult<()> {
    if actor.user_id == owner {
        return Ok(());
    }
    let permission = action.permission(S::KIND);
    if actor.can(&permission) {
        Ok(())
    } else {
        Err(WorkflowError::PermissionDenied { permission })
    }
}

/// Decide whether `action` may move a document out of `current`
///
/// The chain is checked first, then authorization, then the reject reason.
pub fn transition<S: WorkflowStatus>(
    current: S,
    action: WorkflowAction,
    actor: &Actor,
    owner: EntityId,
    reason: Option<&str>,
) -> WorkflowResult<Transition<S>> {
    let to = current
        .next(action)
        .ok_or_else(|| WorkflowError::InvalidTransition {
            kind: S::KIND,
            from: current.to_string(),
            action,
        })?;

    authorize::<S>(action, actor, owner)?;

    let reason = match action {
        WorkflowAction::Reject => Some(RejectReason::parse(reason)?.reason),
        _ => None,
    };

    Ok(Transition {
        from: current,
        to,
        action,
        reason,
    })
}

/// Actions this actor could run right now, in button order
pub fn available_actions<S: WorkflowStatus>(
    current: S,
    actor: &Actor,
    owner: EntityId,
) -> Vec<WorkflowAction> {
    current
        .allowed_actions()
        .into_iter()
        .filter(|action| authorize::<S>(*action, actor, owner).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::status::{PurchaseOrderStatus, RequisitionStatus};
    use crate::types::Permission;

    const OWNER: EntityId = 1;

    fn clerk() -> Actor {
        Actor::new(2, [])
    }

    fn manager() -> Actor {
        Actor::new(3, [Permission::new("purchase_order:*")])
    }

    #[test]
    fn test_skip_is_invalid_even_for_admins() {
        let admin = Actor::new(9, [Permission::new("*")]);
        let err = transition(
            PurchaseOrderStatus::Requested,
            WorkflowAction::Approve,
            &admin,
            OWNER,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
    }

    #[test]
    fn test_non_owner_without_permission_is_denied() {
        let err = transition(
            PurchaseOrderStatus::Requested,
            WorkflowAction::Check,
            &clerk(),
            OWNER,
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::PermissionDenied {
                permission: "purchase_order:check".into()
            }
        );
    }

    #[test]
    fn test_owner_or_permission_holder_may_act() {
        let owner = Actor::new(OWNER, []);
        let t = transition(
            PurchaseOrderStatus::Requested,
            WorkflowAction::Check,
            &owner,
            OWNER,
            None,
        )
        .unwrap();
        assert_eq!(t.to, PurchaseOrderStatus::Checked);

        let t = transition(
            PurchaseOrderStatus::Checked,
            WorkflowAction::Approve,
            &manager(),
            OWNER,
            None,
        )
        .unwrap();
        assert_eq!(t.to, PurchaseOrderStatus::Approved);
        assert!(t.reason.is_none());
    }

    #[test]
    fn test_reject_requires_reason() {
        for reason in [None, Some(""), Some("   ")] {
            let err = transition(
                PurchaseOrderStatus::Checked,
                WorkflowAction::Reject,
                &manager(),
                OWNER,
                reason,
            )
            .unwrap_err();
            assert_eq!(err, WorkflowError::ReasonRequired);
        }

        let t = transition(
            PurchaseOrderStatus::Checked,
            WorkflowAction::Reject,
            &manager(),
            OWNER,
            Some("  price too high "),
        )
        .unwrap();
        assert_eq!(t.reason.as_deref(), Some("price too high"));
    }

    #[test]
    fn test_overlong_reason_is_rejected() {
        let long = "x".repeat(MAX_REASON_LEN + 1);
        let err = RejectReason::parse(Some(&long)).unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert!(RejectReason::parse(Some(&"x".repeat(MAX_REASON_LEN))).is_ok());
    }

    #[test]
    fn test_available_actions_filters_by_permission() {
        let releaser = Actor::new(5, [Permission::new("store_requisition:release")]);
        assert_eq!(
            available_actions(RequisitionStatus::Approved, &releaser, OWNER),
            vec![WorkflowAction::Release]
        );
        assert!(available_actions(RequisitionStatus::Requested, &releaser, OWNER).is_empty());
    }
}
