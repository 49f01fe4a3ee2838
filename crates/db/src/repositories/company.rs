//! Company repository.
//!
//! Companies are the tenancy boundary: users, expenses, and approval rules
//! all hang off a company.

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{
    companies,
    sea_orm_active_enums::UserRole,
    users,
};

/// Errors that can occur during company operations.
#[derive(Debug, Error)]
pub enum CompanyError {
    /// Company not found.
    #[error("Company {0} not found")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Input for creating a company together with its first admin user.
#[derive(Debug, Clone)]
pub struct SignupInput {
    /// Company name.
    pub company_name: String,
    /// Company country.
    pub country: String,
    /// Company base currency (ISO 4217).
    pub currency: String,
    /// Admin email.
    pub email: String,
    /// Pre-hashed admin password.
    pub password_hash: String,
    /// Admin first name.
    pub first_name: String,
    /// Admin last name.
    pub last_name: String,
}

/// Repository for company operations.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    /// Creates a new `CompanyRepository`.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a company and its admin user in one transaction.
    ///
    /// The first user of a company is always an admin with no manager.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_with_admin(
        &self,
        input: SignupInput,
    ) -> Result<(companies::Model, users::Model), CompanyError> {
        let txn = self.db.begin().await?;
        let now = chrono::Utc::now();

        let company = companies::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.company_name),
            country: Set(input.country),
            currency: Set(input.currency),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        let admin = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            role: Set(UserRole::Admin),
            is_active: Set(true),
            company_id: Set(company.id),
            manager_id: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok((company, admin))
    }

    /// Gets a company by ID.
    ///
    /// # Errors
    ///
    /// Returns `CompanyError::NotFound` if the company does not exist.
    pub async fn find(&self, company_id: Uuid) -> Result<companies::Model, CompanyError> {
        companies::Entity::find_by_id(company_id)
            .one(&self.db)
            .await?
            .ok_or(CompanyError::NotFound(company_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CompanyError::NotFound(Uuid::new_v4());
        assert!(err.to_string().contains("not found"));
    }
}
