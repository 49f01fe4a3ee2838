//! User repository.
//!
//! Provides user CRUD plus the manager-lookup queries the workflow planner
//! relies on.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::UserRole, users};

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// User not found.
    #[error("User {0} not found")]
    NotFound(Uuid),

    /// Email is already registered.
    #[error("Email {0} is already registered")]
    EmailTaken(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// User email (unique).
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Role within the company.
    pub role: UserRole,
    /// Direct manager, if any.
    pub manager_id: Option<Uuid>,
}

/// Input for updating a user.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    /// New role.
    pub role: Option<UserRole>,
    /// New manager assignment.
    pub manager_id: Option<Option<Uuid>>,
    /// Active status.
    pub is_active: Option<bool>,
}

/// Repository for user operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new `UserRepository`.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a user within a company.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmailTaken` if the email is already registered.
    pub async fn create_user(
        &self,
        company_id: Uuid,
        input: CreateUserInput,
    ) -> Result<users::Model, UserError> {
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(&input.email))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(UserError::EmailTaken(input.email));
        }

        let now = chrono::Utc::now();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            role: Set(input.role),
            is_active: Set(true),
            company_id: Set(company_id),
            manager_id: Set(input.manager_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await?;

        Ok(user)
    }

    /// Gets a user by ID, scoped to a company.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if no such user exists in the company.
    pub async fn find(&self, company_id: Uuid, user_id: Uuid) -> Result<users::Model, UserError> {
        users::Entity::find_by_id(user_id)
            .filter(users::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound(user_id))
    }

    /// Gets an active user by email, for login.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, UserError> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .filter(users::Column::IsActive.eq(true))
            .one(&self.db)
            .await?;
        Ok(user)
    }

    /// Lists all users of a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_company_users(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<users::Model>, UserError> {
        let users = users::Entity::find()
            .filter(users::Column::CompanyId.eq(company_id))
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(users)
    }

    /// Updates a user's role, manager, or active status.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if no such user exists in the company.
    pub async fn update_user(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        input: UpdateUserInput,
    ) -> Result<users::Model, UserError> {
        let existing = self.find(company_id, user_id).await?;

        let mut user: users::ActiveModel = existing.into();
        if let Some(role) = input.role {
            user.role = Set(role);
        }
        if let Some(manager_id) = input.manager_id {
            user.manager_id = Set(manager_id);
        }
        if let Some(is_active) = input.is_active {
            user.is_active = Set(is_active);
        }
        user.updated_at = Set(chrono::Utc::now().into());

        let updated = user.update(&self.db).await?;
        Ok(updated)
    }

    /// Lists the IDs of a manager's direct reports.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn direct_reports(&self, manager_id: Uuid) -> Result<Vec<Uuid>, UserError> {
        let reports = users::Entity::find()
            .filter(users::Column::ManagerId.eq(manager_id))
            .all(&self.db)
            .await?;
        Ok(reports.into_iter().map(|u| u.id).collect())
    }
}

/// Looks up a user's manager, usable inside an open transaction.
///
/// Returns None when the user has no manager or does not exist.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn manager_of<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> Result<Option<Uuid>, sea_orm::DbErr> {
    let user = users::Entity::find_by_id(user_id).one(conn).await?;
    Ok(user.and_then(|u| u.manager_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UserError::NotFound(Uuid::new_v4());
        assert!(err.to_string().contains("not found"));

        let err = UserError::EmailTaken("a@b.com".to_string());
        assert!(err.to_string().contains("already registered"));
    }
}
