//! Approval workflow engine for expense authorization.
//!
//! This module implements the decision logic that routes an expense through
//! its multi-step approval workflow:
//!
//! - `types` - Workflow domain types (ExpenseStatus, ApprovalAction, steps)
//! - `rules` - Approval rule model and amount-window matching
//! - `engine` - Step planning and completion evaluation
//! - `service` - Resolution of individual approve/reject actions
//! - `error` - Workflow-specific error types

pub mod engine;
pub mod error;
pub mod rules;
pub mod service;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::WorkflowEngine;
pub use error::WorkflowError;
pub use rules::{ApprovalRule, RuleApprover, RuleKind};
pub use service::{Resolution, WorkflowService};
pub use types::{ApprovalAction, ApprovalStep, ExpenseStatus, PlannedStep};
