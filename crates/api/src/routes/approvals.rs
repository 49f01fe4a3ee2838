//! Approval decision routes.
//!
//! Approvers list their pending steps and submit decisions. A decision is
//! applied and the expense's completion re-evaluated in one database
//! transaction.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::routes::expenses::{
    expense_to_response, status_to_string, step_to_response, workflow_error_response,
};
use crate::{AppState, middleware::AuthUser};
use spendra_core::approval::ApprovalAction;
use spendra_db::ApprovalRepository;

/// Creates the approval routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/approvals/pending", get(list_pending))
        .route("/approvals/{approval_id}/decision", post(decide))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for an approval decision.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    /// The action: approve or reject.
    pub action: String,
    /// Optional comments recorded on the step.
    pub comments: Option<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /approvals/pending - List the caller's pending approval steps.
async fn list_pending(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = ApprovalRepository::new((*state.db).clone());

    match repo.list_pending(auth.user_id()).await {
        Ok(pending) => {
            let items: Vec<serde_json::Value> = pending
                .into_iter()
                .map(|p| {
                    json!({
                        "approval": step_to_response(p.approval),
                        "expense": expense_to_response(p.expense)
                    })
                })
                .collect();

            (StatusCode::OK, Json(json!({ "data": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list pending approvals");
            workflow_error_response(&e)
        }
    }
}

/// POST /approvals/{approval_id}/decision - Approve or reject a step.
async fn decide(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(approval_id): Path<Uuid>,
    Json(payload): Json<DecisionRequest>,
) -> impl IntoResponse {
    let Some(action) = ApprovalAction::parse(&payload.action) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_action",
                "message": "Action must be approve or reject"
            })),
        )
            .into_response();
    };

    let repo = ApprovalRepository::new((*state.db).clone());

    match repo
        .decide(approval_id, auth.user_id(), action, payload.comments)
        .await
    {
        Ok(outcome) => {
            info!(
                approval_id = %approval_id,
                expense_id = %outcome.expense.id,
                action = %action,
                expense_status = %status_to_string(&outcome.expense.status),
                "Approval decision recorded"
            );

            (
                StatusCode::OK,
                Json(json!({
                    "approval": step_to_response(outcome.approval),
                    "expense": expense_to_response(outcome.expense)
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, approval_id = %approval_id, "Failed to apply decision");
            workflow_error_response(&e)
        }
    }
}
