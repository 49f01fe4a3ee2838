//! Workflow error types for the expense approval lifecycle.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The approval step does not exist, is not owned by the acting user,
    /// or was already resolved. Deliberately indistinguishable: the action
    /// is a no-op either way.
    #[error("Approval {0} not found or already resolved")]
    NotFoundOrResolved(Uuid),

    /// The expense the step belongs to does not exist.
    #[error("Expense {0} not found")]
    ExpenseNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFoundOrResolved(_) | Self::ExpenseNotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFoundOrResolved(_) => "NOT_FOUND_OR_ALREADY_RESOLVED",
            Self::ExpenseNotFound(_) => "EXPENSE_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
