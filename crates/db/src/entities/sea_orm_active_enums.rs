//! Postgres enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status of an expense or approval step.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "expense_status")]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    /// Awaiting approval decisions.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Fully approved (terminal).
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected (terminal).
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// User role within a company.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Company administrator: manages users and approval rules.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Manages direct reports and approves their expenses.
    #[sea_orm(string_value = "manager")]
    Manager,
    /// Submits expenses.
    #[sea_orm(string_value = "employee")]
    Employee,
}

/// How an approval rule's completion condition is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "approval_rule_type")]
#[serde(rename_all = "snake_case")]
pub enum ApprovalRuleType {
    /// One designated approver completes the workflow.
    #[sea_orm(string_value = "specific_approver")]
    SpecificApprover,
    /// A percentage of listed approvers completes the workflow.
    #[sea_orm(string_value = "percentage")]
    Percentage,
    /// Either condition completes the workflow.
    #[sea_orm(string_value = "hybrid")]
    Hybrid,
}
