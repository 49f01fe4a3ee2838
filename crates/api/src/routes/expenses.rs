//! Expense submission and listing routes.
//!
//! Submission converts the amount into the company's base currency before
//! persisting; a conversion failure aborts the whole submission.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use spendra_core::approval::WorkflowError;
use spendra_db::{
    CompanyRepository, ExpenseRepository,
    entities::{approvals, expenses, sea_orm_active_enums::ExpenseStatus},
    repositories::expense::CreateExpenseInput,
};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", post(create_expense))
        .route("/expenses", get(list_my_expenses))
        .route("/expenses/team", get(list_team_expenses))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for submitting an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Amount in the submitted currency.
    pub amount: String,
    /// Currency of the amount (ISO 4217).
    pub currency: String,
    /// Expense category.
    pub category: String,
    /// Free-text description.
    pub description: String,
    /// Date the expense was incurred (YYYY-MM-DD).
    pub expense_date: chrono::NaiveDate,
}

/// Response for an expense.
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    /// Expense ID.
    pub id: Uuid,
    /// Submitting employee.
    pub employee_id: Uuid,
    /// Amount as submitted.
    pub amount: String,
    /// Currency of the submitted amount.
    pub currency: String,
    /// Amount in the company's base currency.
    pub amount_company_currency: String,
    /// Category.
    pub category: String,
    /// Description.
    pub description: String,
    /// Date incurred.
    pub expense_date: String,
    /// Current status.
    pub status: String,
    /// Created at timestamp.
    pub created_at: String,
}

/// One approval step in a workflow response.
#[derive(Debug, Serialize)]
pub struct ApprovalStepResponse {
    /// Step ID.
    pub id: Uuid,
    /// Designated approver.
    pub approver_id: Uuid,
    /// Step status.
    pub status: String,
    /// Rule-group sequence.
    pub sequence: i32,
}

pub(crate) fn expense_to_response(expense: expenses::Model) -> ExpenseResponse {
    ExpenseResponse {
        id: expense.id,
        employee_id: expense.employee_id,
        amount: expense.amount.to_string(),
        currency: expense.currency,
        amount_company_currency: expense.amount_company_currency.to_string(),
        category: expense.category,
        description: expense.description,
        expense_date: expense.expense_date.to_string(),
        status: status_to_string(&expense.status),
        created_at: expense.created_at.to_rfc3339(),
    }
}

pub(crate) fn step_to_response(step: approvals::Model) -> ApprovalStepResponse {
    ApprovalStepResponse {
        id: step.id,
        approver_id: step.approver_id,
        status: status_to_string(&step.status),
        sequence: step.sequence,
    }
}

pub(crate) fn status_to_string(status: &ExpenseStatus) -> String {
    match status {
        ExpenseStatus::Pending => "pending".to_string(),
        ExpenseStatus::Approved => "approved".to_string(),
        ExpenseStatus::Rejected => "rejected".to_string(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /expenses - Submit an expense and plan its approval workflow.
async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    let amount = match Decimal::from_str(&payload.amount) {
        Ok(a) if a > Decimal::ZERO => a,
        Ok(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_amount",
                    "message": "Amount must be positive"
                })),
            )
                .into_response();
        }
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_amount",
                    "message": "Invalid amount format"
                })),
            )
                .into_response();
        }
    };

    let currency = payload.currency.to_uppercase();
    if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_uppercase()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_currency",
                "message": "Currency must be a 3-letter ISO 4217 code"
            })),
        )
            .into_response();
    }

    // Look up the company's base currency
    let company_repo = CompanyRepository::new((*state.db).clone());
    let company = match company_repo.find(auth.company_id()).await {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Failed to load company for expense submission");
            return internal_error();
        }
    };

    // Convert to company currency; failure aborts the submission
    let amount_company_currency = match state
        .rates
        .convert(amount, &currency, &company.currency)
        .await
    {
        Ok(a) => a,
        Err(e) => {
            error!(error = %e, from = %currency, to = %company.currency,
                "Exchange rate lookup failed; rejecting expense submission");
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": "exchange_rate_unavailable",
                    "message": "Could not convert the amount to the company currency"
                })),
            )
                .into_response();
        }
    };

    let repo = ExpenseRepository::new((*state.db).clone());
    let input = CreateExpenseInput {
        amount,
        currency,
        amount_company_currency,
        category: payload.category,
        description: payload.description,
        expense_date: payload.expense_date,
    };

    match repo
        .create_with_workflow(auth.user_id(), auth.company_id(), input)
        .await
    {
        Ok((expense, steps)) => {
            info!(
                expense_id = %expense.id,
                employee_id = %expense.employee_id,
                steps = steps.len(),
                "Expense submitted"
            );

            let steps: Vec<ApprovalStepResponse> =
                steps.into_iter().map(step_to_response).collect();

            (
                StatusCode::CREATED,
                Json(json!({
                    "expense": expense_to_response(expense),
                    "approvals": steps
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to submit expense");
            workflow_error_response(&e)
        }
    }
}

/// GET /expenses - List the caller's own expenses.
async fn list_my_expenses(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());

    match repo.list_for_employee(auth.user_id()).await {
        Ok(expenses) => {
            let items: Vec<ExpenseResponse> =
                expenses.into_iter().map(expense_to_response).collect();
            (StatusCode::OK, Json(json!({ "data": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list expenses");
            workflow_error_response(&e)
        }
    }
}

/// GET /expenses/team - List expenses of the caller's direct reports.
async fn list_team_expenses(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());

    match repo.team_expenses(auth.user_id()).await {
        Ok(expenses) => {
            let items: Vec<ExpenseResponse> =
                expenses.into_iter().map(expense_to_response).collect();
            (StatusCode::OK, Json(json!({ "data": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list team expenses");
            workflow_error_response(&e)
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

pub(crate) fn workflow_error_response(e: &WorkflowError) -> Response {
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = match e {
        WorkflowError::Database(_) => "An error occurred".to_string(),
        other => other.to_string(),
    };

    (
        status,
        Json(json!({
            "error": e.error_code(),
            "message": message
        })),
    )
        .into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}
