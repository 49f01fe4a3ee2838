//! User management routes.
//!
//! Admins create employees and managers, assign reporting lines, and
//! deactivate accounts. The reporting line feeds the default approval
//! workflow when no rule matches an expense.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use spendra_core::auth::hash_password;
use spendra_db::{
    UserRepository,
    entities::{sea_orm_active_enums::UserRole, users},
    repositories::user::{CreateUserInput, UpdateUserInput, UserError},
};

/// Creates the user management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users", post(create_user))
        .route("/users/{user_id}", patch(update_user))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Email (unique).
    pub email: String,
    /// Initial password.
    pub password: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Role: admin, manager, or employee.
    pub role: String,
    /// Direct manager, if any.
    pub manager_id: Option<Uuid>,
}

/// Request body for updating a user.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// New role.
    pub role: Option<String>,
    /// New manager assignment.
    pub manager_id: Option<Uuid>,
    /// Active status.
    pub is_active: Option<bool>,
}

/// Response for a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Email.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Role.
    pub role: String,
    /// Direct manager.
    pub manager_id: Option<Uuid>,
    /// Active status.
    pub is_active: bool,
    /// Created at timestamp.
    pub created_at: String,
}

fn user_to_response(user: users::Model) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        role: match user.role {
            UserRole::Admin => "admin".to_string(),
            UserRole::Manager => "manager".to_string(),
            UserRole::Employee => "employee".to_string(),
        },
        manager_id: user.manager_id,
        is_active: user.is_active,
        created_at: user.created_at.to_rfc3339(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /users - List all users of the caller's company.
async fn list_users(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = UserRepository::new((*state.db).clone());

    match repo.list_company_users(auth.company_id()).await {
        Ok(users) => {
            let items: Vec<UserResponse> = users.into_iter().map(user_to_response).collect();
            (StatusCode::OK, Json(json!({ "data": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list users");
            user_error_response(&e)
        }
    }
}

/// POST /users - Create a user in the caller's company (admin only).
async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let Some(role) = parse_role(&payload.role) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_role",
                "message": format!("Invalid role: {}", payload.role)
            })),
        )
            .into_response();
    };

    if payload.password.len() < 8 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "weak_password",
                "message": "Password must be at least 8 characters"
            })),
        )
            .into_response();
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error();
        }
    };

    let repo = UserRepository::new((*state.db).clone());
    let input = CreateUserInput {
        email: payload.email,
        password_hash,
        first_name: payload.first_name,
        last_name: payload.last_name,
        role,
        manager_id: payload.manager_id,
    };

    match repo.create_user(auth.company_id(), input).await {
        Ok(user) => {
            info!(company_id = %auth.company_id(), user_id = %user.id, "User created");
            (StatusCode::CREATED, Json(user_to_response(user))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create user");
            user_error_response(&e)
        }
    }
}

/// PATCH /users/{user_id} - Update a user's role, manager, or status
/// (admin only).
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let role = match payload.role.as_deref() {
        Some(r) => match parse_role(r) {
            Some(role) => Some(role),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_role",
                        "message": format!("Invalid role: {r}")
                    })),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let repo = UserRepository::new((*state.db).clone());
    let input = UpdateUserInput {
        role,
        manager_id: payload.manager_id.map(Some),
        is_active: payload.is_active,
    };

    match repo.update_user(auth.company_id(), user_id, input).await {
        Ok(user) => {
            info!(company_id = %auth.company_id(), user_id = %user_id, "User updated");
            (StatusCode::OK, Json(user_to_response(user))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update user");
            user_error_response(&e)
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_role(role: &str) -> Option<UserRole> {
    match role.to_lowercase().as_str() {
        "admin" => Some(UserRole::Admin),
        "manager" => Some(UserRole::Manager),
        "employee" => Some(UserRole::Employee),
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

fn user_error_response(e: &UserError) -> Response {
    match e {
        UserError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "User not found"
            })),
        )
            .into_response(),
        UserError::EmailTaken(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "email_taken",
                "message": "Email is already registered"
            })),
        )
            .into_response(),
        UserError::Database(_) => internal_error(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("admin"), Some(UserRole::Admin));
        assert_eq!(parse_role("MANAGER"), Some(UserRole::Manager));
        assert_eq!(parse_role("Employee"), Some(UserRole::Employee));
        assert_eq!(parse_role("owner"), None);
    }
}
