//! Authentication routes for signup and login.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use spendra_core::auth::{hash_password, verify_password};
use spendra_db::{
    CompanyRepository, UserRepository, entities::users, repositories::company::SignupInput,
};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for company signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    /// Company name.
    pub company_name: String,
    /// Company country.
    pub country: String,
    /// Company base currency (ISO 4217).
    pub currency: String,
    /// Admin email.
    pub email: String,
    /// Admin password.
    pub password: String,
    /// Admin first name.
    pub first_name: String,
    /// Admin last name.
    pub last_name: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Authenticated user info returned by auth endpoints.
#[derive(Debug, Serialize)]
pub struct UserInfo {
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
    /// Company ID.
    pub company_id: Uuid,
}

/// Response for successful authentication.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Bearer access token.
    pub access_token: String,
    /// Token type, always "Bearer".
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    /// The authenticated user.
    pub user: UserInfo,
}

fn user_info(user: &users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        role: role_to_string(&user.role),
        company_id: user.company_id,
    }
}

fn role_to_string(role: &spendra_db::entities::sea_orm_active_enums::UserRole) -> String {
    use spendra_db::entities::sea_orm_active_enums::UserRole;
    match role {
        UserRole::Admin => "admin".to_string(),
        UserRole::Manager => "manager".to_string(),
        UserRole::Employee => "employee".to_string(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /auth/signup - Create a company and its admin user.
async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> impl IntoResponse {
    if payload.company_name.trim().is_empty() || payload.email.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_request",
                "message": "Company name and email are required"
            })),
        )
            .into_response();
    }

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

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error();
        }
    };

    let company_repo = CompanyRepository::new((*state.db).clone());
    let input = SignupInput {
        company_name: payload.company_name,
        country: payload.country,
        currency,
        email: payload.email,
        password_hash,
        first_name: payload.first_name,
        last_name: payload.last_name,
    };

    match company_repo.create_with_admin(input).await {
        Ok((company, admin)) => {
            info!(company_id = %company.id, user_id = %admin.id, "Company registered");

            match state
                .jwt_service
                .generate_access_token(admin.id, company.id, "admin")
            {
                Ok(token) => (
                    StatusCode::CREATED,
                    Json(AuthResponse {
                        access_token: token,
                        token_type: "Bearer",
                        expires_in: state.jwt_service.access_token_expires_in(),
                        user: user_info(&admin),
                    }),
                )
                    .into_response(),
                Err(e) => {
                    error!(error = %e, "Failed to generate access token");
                    internal_error()
                }
            }
        }
        Err(e) => {
            error!(error = %e, "Failed to register company");
            internal_error()
        }
    }
}

/// POST /auth/login - Authenticate a user and return a token.
async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> Response {
    let user_repo = UserRepository::new((*state.db).clone());

    // Find user by email
    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error();
        }
    };

    // Verify password
    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    let role = role_to_string(&user.role);
    match state
        .jwt_service
        .generate_access_token(user.id, user.company_id, &role)
    {
        Ok(token) => (
            StatusCode::OK,
            Json(AuthResponse {
                access_token: token,
                token_type: "Bearer",
                expires_in: state.jwt_service.access_token_expires_in(),
                user: user_info(&user),
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            internal_error()
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn invalid_credentials() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid email or password"
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
