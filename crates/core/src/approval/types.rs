//! Workflow domain types for the expense approval lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Status of an expense or of a single approval step.
///
/// Both share the same lifecycle: created Pending, resolved exactly once to
/// Approved or Rejected. Terminal states are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    /// Awaiting one or more approval decisions.
    Pending,
    /// Fully approved (terminal).
    Approved,
    /// Rejected by at least one approver (terminal).
    Rejected,
}

impl ExpenseStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if the status is Approved or Rejected.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An approver's decision on a single workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalAction {
    /// Approve the step.
    Approve,
    /// Reject the step (and the whole expense).
    Reject,
}

impl ApprovalAction {
    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    /// Parses an action from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }

    /// Returns the step status this action resolves to.
    #[must_use]
    pub const fn resolved_status(&self) -> ExpenseStatus {
        match self {
            Self::Approve => ExpenseStatus::Approved,
            Self::Reject => ExpenseStatus::Rejected,
        }
    }
}

impl fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A step produced by workflow planning, before persistence.
///
/// `sequence` groups steps by the rule that produced them; it is NOT an
/// execution gate - any pending step may be acted upon at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedStep {
    /// The user who must act on this step.
    pub approver_id: Uuid,
    /// Construction-order group, starting at 1.
    pub sequence: i32,
}

/// A workflow step as the engine sees it during completion evaluation:
/// who the step targets and how (or whether) they have acted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalStep {
    /// The designated approver.
    pub approver_id: Uuid,
    /// Current status of the step.
    pub status: ExpenseStatus,
}

impl ApprovalStep {
    /// Creates a pending step for an approver.
    #[must_use]
    pub const fn pending(approver_id: Uuid) -> Self {
        Self {
            approver_id,
            status: ExpenseStatus::Pending,
        }
    }

    /// Creates an approved step for an approver.
    #[must_use]
    pub const fn approved(approver_id: Uuid) -> Self {
        Self {
            approver_id,
            status: ExpenseStatus::Approved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(ExpenseStatus::Pending.as_str(), "pending");
        assert_eq!(ExpenseStatus::Approved.as_str(), "approved");
        assert_eq!(ExpenseStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(ExpenseStatus::parse("pending"), Some(ExpenseStatus::Pending));
        assert_eq!(
            ExpenseStatus::parse("APPROVED"),
            Some(ExpenseStatus::Approved)
        );
        assert_eq!(
            ExpenseStatus::parse("Rejected"),
            Some(ExpenseStatus::Rejected)
        );
        assert_eq!(ExpenseStatus::parse("draft"), None);
    }

    #[test]
    fn test_status_terminal() {
        assert!(!ExpenseStatus::Pending.is_terminal());
        assert!(ExpenseStatus::Approved.is_terminal());
        assert!(ExpenseStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", ExpenseStatus::Pending), "pending");
    }

    #[test]
    fn test_action_parse_and_resolve() {
        assert_eq!(ApprovalAction::parse("approve"), Some(ApprovalAction::Approve));
        assert_eq!(ApprovalAction::parse("REJECT"), Some(ApprovalAction::Reject));
        assert_eq!(ApprovalAction::parse("defer"), None);

        assert_eq!(
            ApprovalAction::Approve.resolved_status(),
            ExpenseStatus::Approved
        );
        assert_eq!(
            ApprovalAction::Reject.resolved_status(),
            ExpenseStatus::Rejected
        );
    }
}
