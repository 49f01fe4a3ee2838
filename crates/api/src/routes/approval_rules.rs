//! Approval rule management routes.
//!
//! Admins configure the rules that route expenses through their approval
//! workflows. Rules are matched by company-currency amount windows; three
//! rule types control how completion is evaluated.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use spendra_db::{
    entities::{approval_rule_approvers, approval_rules, sea_orm_active_enums::ApprovalRuleType},
    repositories::approval_rule::{
        ApprovalRuleError, ApprovalRuleRepository, CreateApprovalRuleInput, UpdateApprovalRuleInput,
    },
};

/// Creates the approval rules routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/approval-rules", get(list_approval_rules))
        .route("/approval-rules", post(create_approval_rule))
        .route("/approval-rules/{rule_id}", get(get_approval_rule))
        .route("/approval-rules/{rule_id}", patch(update_approval_rule))
        .route("/approval-rules/{rule_id}", delete(delete_approval_rule))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating an approval rule.
#[derive(Debug, Deserialize)]
pub struct CreateApprovalRuleRequest {
    /// Name of the approval rule.
    pub name: String,
    /// Rule type: specific_approver, percentage, or hybrid.
    pub rule_type: String,
    /// Minimum amount threshold (inclusive).
    pub min_amount: Option<String>,
    /// Maximum amount threshold (inclusive).
    pub max_amount: Option<String>,
    /// Percentage of approvers required (percentage and hybrid).
    pub percentage_required: Option<i32>,
    /// Designated approver (specific_approver and hybrid).
    pub specific_approver_id: Option<Uuid>,
    /// Ordered approver list (percentage and hybrid).
    #[serde(default)]
    pub approver_ids: Vec<Uuid>,
}

/// Request body for updating an approval rule.
#[derive(Debug, Deserialize)]
pub struct UpdateApprovalRuleRequest {
    /// New name.
    pub name: Option<String>,
    /// New minimum amount.
    pub min_amount: Option<String>,
    /// New maximum amount.
    pub max_amount: Option<String>,
    /// New percentage threshold.
    pub percentage_required: Option<i32>,
    /// New designated approver.
    pub specific_approver_id: Option<Uuid>,
    /// Replacement approver list.
    pub approver_ids: Option<Vec<Uuid>>,
    /// Active status.
    pub is_active: Option<bool>,
}

/// Response for an approval rule.
#[derive(Debug, Serialize)]
pub struct ApprovalRuleResponse {
    /// Rule ID.
    pub id: Uuid,
    /// Name.
    pub name: String,
    /// Rule type.
    pub rule_type: String,
    /// Minimum amount threshold.
    pub min_amount: Option<String>,
    /// Maximum amount threshold.
    pub max_amount: Option<String>,
    /// Percentage threshold.
    pub percentage_required: Option<i32>,
    /// Designated approver.
    pub specific_approver_id: Option<Uuid>,
    /// Approver list, in rule order.
    pub approver_ids: Vec<Uuid>,
    /// Active status.
    pub is_active: bool,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

fn rule_to_response(
    rule: approval_rules::Model,
    approvers: &[approval_rule_approvers::Model],
) -> ApprovalRuleResponse {
    ApprovalRuleResponse {
        id: rule.id,
        name: rule.name,
        rule_type: match rule.rule_type {
            ApprovalRuleType::SpecificApprover => "specific_approver".to_string(),
            ApprovalRuleType::Percentage => "percentage".to_string(),
            ApprovalRuleType::Hybrid => "hybrid".to_string(),
        },
        min_amount: rule.min_amount.map(|a| a.to_string()),
        max_amount: rule.max_amount.map(|a| a.to_string()),
        percentage_required: rule.percentage_required,
        specific_approver_id: rule.specific_approver_id,
        approver_ids: approvers.iter().map(|a| a.approver_id).collect(),
        is_active: rule.is_active,
        created_at: rule.created_at.to_rfc3339(),
        updated_at: rule.updated_at.to_rfc3339(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /approval-rules - List the company's active rules.
async fn list_approval_rules(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let repo = ApprovalRuleRepository::new((*state.db).clone());

    match repo.list_rules(auth.company_id()).await {
        Ok(rules) => {
            let items: Vec<ApprovalRuleResponse> = rules
                .into_iter()
                .map(|rule| rule_to_response(rule, &[]))
                .collect();

            (StatusCode::OK, Json(json!({ "data": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list approval rules");
            approval_rule_error_response(&e)
        }
    }
}

/// POST /approval-rules - Create an approval rule.
async fn create_approval_rule(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateApprovalRuleRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "name_required",
                "message": "Name is required"
            })),
        )
            .into_response();
    }

    let Some(rule_type) = parse_rule_type(&payload.rule_type) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_rule_type",
                "message": format!("Invalid rule type: {}", payload.rule_type)
            })),
        )
            .into_response();
    };

    if let Some(p) = payload.percentage_required
        && !(1..=100).contains(&p)
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_percentage",
                "message": "percentage_required must be between 1 and 100"
            })),
        )
            .into_response();
    }

    let min_amount = match parse_optional_decimal(payload.min_amount.as_deref()) {
        Ok(a) => a,
        Err(e) => return e,
    };

    let max_amount = match parse_optional_decimal(payload.max_amount.as_deref()) {
        Ok(a) => a,
        Err(e) => return e,
    };

    if let (Some(min), Some(max)) = (min_amount, max_amount)
        && min > max
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_amount_range",
                "message": "min_amount cannot be greater than max_amount"
            })),
        )
            .into_response();
    }

    let repo = ApprovalRuleRepository::new((*state.db).clone());

    let input = CreateApprovalRuleInput {
        name: payload.name,
        rule_type,
        min_amount,
        max_amount,
        percentage_required: payload.percentage_required,
        specific_approver_id: payload.specific_approver_id,
        approver_ids: payload.approver_ids,
    };

    match repo.create_rule(auth.company_id(), input).await {
        Ok(rule) => {
            info!(
                company_id = %auth.company_id(),
                rule_id = %rule.id,
                "Approval rule created"
            );

            let rule_id = rule.id;
            match repo.get_rule(auth.company_id(), rule_id).await {
                Ok((rule, approvers)) => {
                    (StatusCode::CREATED, Json(rule_to_response(rule, &approvers)))
                        .into_response()
                }
                Err(e) => {
                    error!(error = %e, "Failed to reload created approval rule");
                    approval_rule_error_response(&e)
                }
            }
        }
        Err(e) => {
            error!(error = %e, "Failed to create approval rule");
            approval_rule_error_response(&e)
        }
    }
}

/// GET /approval-rules/{rule_id} - Get an approval rule.
async fn get_approval_rule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(rule_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let repo = ApprovalRuleRepository::new((*state.db).clone());

    match repo.get_rule(auth.company_id(), rule_id).await {
        Ok((rule, approvers)) => {
            (StatusCode::OK, Json(rule_to_response(rule, &approvers))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to get approval rule");
            approval_rule_error_response(&e)
        }
    }
}

/// PATCH /approval-rules/{rule_id} - Update an approval rule.
async fn update_approval_rule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(rule_id): Path<Uuid>,
    Json(payload): Json<UpdateApprovalRuleRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let min_amount = match payload.min_amount.as_deref() {
        Some(s) => match parse_optional_decimal(Some(s)) {
            Ok(a) => Some(a),
            Err(e) => return e,
        },
        None => None,
    };

    let max_amount = match payload.max_amount.as_deref() {
        Some(s) => match parse_optional_decimal(Some(s)) {
            Ok(a) => Some(a),
            Err(e) => return e,
        },
        None => None,
    };

    let repo = ApprovalRuleRepository::new((*state.db).clone());

    let input = UpdateApprovalRuleInput {
        name: payload.name,
        min_amount,
        max_amount,
        percentage_required: payload.percentage_required.map(Some),
        specific_approver_id: payload.specific_approver_id.map(Some),
        approver_ids: payload.approver_ids,
        is_active: payload.is_active,
    };

    match repo.update_rule(auth.company_id(), rule_id, input).await {
        Ok(_) => {
            info!(
                company_id = %auth.company_id(),
                rule_id = %rule_id,
                "Approval rule updated"
            );

            match repo.get_rule(auth.company_id(), rule_id).await {
                Ok((rule, approvers)) => {
                    (StatusCode::OK, Json(rule_to_response(rule, &approvers))).into_response()
                }
                Err(e) => {
                    error!(error = %e, "Failed to reload updated approval rule");
                    approval_rule_error_response(&e)
                }
            }
        }
        Err(e) => {
            error!(error = %e, "Failed to update approval rule");
            approval_rule_error_response(&e)
        }
    }
}

/// DELETE /approval-rules/{rule_id} - Deactivate an approval rule.
async fn delete_approval_rule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(rule_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let repo = ApprovalRuleRepository::new((*state.db).clone());

    match repo.delete_rule(auth.company_id(), rule_id).await {
        Ok(()) => {
            info!(
                company_id = %auth.company_id(),
                rule_id = %rule_id,
                "Approval rule deactivated"
            );

            (StatusCode::NO_CONTENT, ()).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete approval rule");
            approval_rule_error_response(&e)
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_rule_type(s: &str) -> Option<ApprovalRuleType> {
    match s.to_lowercase().as_str() {
        "specific_approver" => Some(ApprovalRuleType::SpecificApprover),
        "percentage" => Some(ApprovalRuleType::Percentage),
        "hybrid" => Some(ApprovalRuleType::Hybrid),
        _ => None,
    }
}

#[allow(clippy::result_large_err)]
fn require_admin(auth: &AuthUser) -> Result<(), Response> {
    if auth.is_admin() {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "admin_required",
                "message": "Admin role required for this operation"
            })),
        )
            .into_response())
    }
}

#[allow(clippy::result_large_err)]
fn parse_optional_decimal(s: Option<&str>) -> Result<Option<Decimal>, Response> {
    match s {
        Some(s) if !s.is_empty() => match Decimal::from_str(s) {
            Ok(d) if d >= Decimal::ZERO => Ok(Some(d)),
            Ok(_) => Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_amount",
                    "message": "Amount must be non-negative"
                })),
            )
                .into_response()),
            Err(_) => Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_amount",
                    "message": "Invalid amount format"
                })),
            )
                .into_response()),
        },
        _ => Ok(None),
    }
}

fn approval_rule_error_response(e: &ApprovalRuleError) -> Response {
    match e {
        ApprovalRuleError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Approval rule not found"
            })),
        )
            .into_response(),
        ApprovalRuleError::InvalidConfiguration(msg) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_configuration",
                "message": msg
            })),
        )
            .into_response(),
        ApprovalRuleError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rule_type() {
        assert_eq!(
            parse_rule_type("specific_approver"),
            Some(ApprovalRuleType::SpecificApprover)
        );
        assert_eq!(
            parse_rule_type("PERCENTAGE"),
            Some(ApprovalRuleType::Percentage)
        );
        assert_eq!(parse_rule_type("Hybrid"), Some(ApprovalRuleType::Hybrid));
        assert_eq!(parse_rule_type("sequential"), None);
    }
}
