//! Resolution of individual approve/reject actions.
//!
//! This module validates a single approver's action against a workflow step
//! and produces the audit data for the mutation. Persistence and the
//! follow-on completion evaluation happen at the storage seam, inside one
//! database transaction.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::approval::error::WorkflowError;
use crate::approval::types::{ApprovalAction, ExpenseStatus};

/// Outcome of resolving a step, with audit trail information.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The step's new status.
    pub new_status: ExpenseStatus,
    /// Optional comments from the approver.
    pub comments: Option<String>,
    /// When the step was resolved.
    pub resolved_at: DateTime<Utc>,
}

/// Stateless service validating step resolutions.
pub struct WorkflowService;

impl WorkflowService {
    /// Resolves a pending step with an approver's action.
    ///
    /// Preconditions, all checked here: the acting user must be the step's
    /// designated approver and the step must still be Pending. A violation
    /// reports "not found or already resolved" without revealing which
    /// precondition failed; the caller must not mutate anything.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NotFoundOrResolved` on any precondition
    /// violation.
    pub fn resolve(
        approval_id: Uuid,
        step_status: ExpenseStatus,
        step_approver_id: Uuid,
        actor_id: Uuid,
        action: ApprovalAction,
        comments: Option<String>,
    ) -> Result<Resolution, WorkflowError> {
        if step_approver_id != actor_id || step_status != ExpenseStatus::Pending {
            return Err(WorkflowError::NotFoundOrResolved(approval_id));
        }

        Ok(Resolution {
            new_status: action.resolved_status(),
            comments,
            resolved_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approve_pending_step() {
        let approver = Uuid::new_v4();
        let resolution = WorkflowService::resolve(
            Uuid::new_v4(),
            ExpenseStatus::Pending,
            approver,
            approver,
            ApprovalAction::Approve,
            Some("looks good".to_string()),
        )
        .unwrap();

        assert_eq!(resolution.new_status, ExpenseStatus::Approved);
        assert_eq!(resolution.comments.as_deref(), Some("looks good"));
    }

    #[test]
    fn test_reject_pending_step() {
        let approver = Uuid::new_v4();
        let resolution = WorkflowService::resolve(
            Uuid::new_v4(),
            ExpenseStatus::Pending,
            approver,
            approver,
            ApprovalAction::Reject,
            None,
        )
        .unwrap();

        assert_eq!(resolution.new_status, ExpenseStatus::Rejected);
    }

    #[test]
    fn test_wrong_actor_fails() {
        let result = WorkflowService::resolve(
            Uuid::new_v4(),
            ExpenseStatus::Pending,
            Uuid::new_v4(),
            Uuid::new_v4(),
            ApprovalAction::Approve,
            None,
        );
        assert!(matches!(result, Err(WorkflowError::NotFoundOrResolved(_))));
    }

    #[test]
    fn test_already_resolved_step_fails() {
        let approver = Uuid::new_v4();
        for status in [ExpenseStatus::Approved, ExpenseStatus::Rejected] {
            let result = WorkflowService::resolve(
                Uuid::new_v4(),
                status,
                approver,
                approver,
                ApprovalAction::Approve,
                None,
            );
            assert!(matches!(result, Err(WorkflowError::NotFoundOrResolved(_))));
        }
    }
}
