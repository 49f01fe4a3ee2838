//! Expense repository.
//!
//! Expense submission creates the expense row and plans its approval
//! workflow in one database transaction, so an expense is never visible
//! without its steps.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::warn;
use uuid::Uuid;

use spendra_core::approval::{WorkflowEngine, WorkflowError};

use crate::entities::{approvals, expenses, sea_orm_active_enums::ExpenseStatus, users};
use crate::repositories::approval_rule::load_company_rules;
use crate::repositories::user::manager_of;

/// Input for submitting an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Amount as submitted.
    pub amount: Decimal,
    /// Currency of the submitted amount (ISO 4217).
    pub currency: String,
    /// Amount converted into the company's base currency.
    pub amount_company_currency: Decimal,
    /// Expense category.
    pub category: String,
    /// Free-text description.
    pub description: String,
    /// Date the expense was incurred.
    pub expense_date: chrono::NaiveDate,
}

/// Repository for expense operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new `ExpenseRepository`.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Submits an expense and plans its approval workflow atomically.
    ///
    /// Rule selection uses the company-currency amount. When no rule
    /// matches, the workflow falls back to the employee's manager; an
    /// employee with no manager gets an empty workflow and the expense
    /// stays pending until operator intervention.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn create_with_workflow(
        &self,
        employee_id: Uuid,
        company_id: Uuid,
        input: CreateExpenseInput,
    ) -> Result<(expenses::Model, Vec<approvals::Model>), WorkflowError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        let now = chrono::Utc::now();
        let expense = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(employee_id),
            company_id: Set(company_id),
            amount: Set(input.amount),
            currency: Set(input.currency),
            amount_company_currency: Set(input.amount_company_currency),
            category: Set(input.category),
            description: Set(input.description),
            expense_date: Set(input.expense_date),
            status: Set(ExpenseStatus::Pending),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await
        .map_err(|e| WorkflowError::Database(e.to_string()))?;

        let rules = load_company_rules(&txn, company_id)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;
        let manager_id = manager_of(&txn, employee_id)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        let plan =
            WorkflowEngine::plan_workflow(&rules, expense.amount_company_currency, manager_id);

        if plan.is_empty() {
            warn!(
                expense_id = %expense.id,
                employee_id = %employee_id,
                "no applicable rules and no manager; expense has no approval steps"
            );
        }

        let mut steps = Vec::with_capacity(plan.len());
        for planned in plan {
            let step = approvals::ActiveModel {
                id: Set(Uuid::new_v4()),
                expense_id: Set(expense.id),
                approver_id: Set(planned.approver_id),
                status: Set(ExpenseStatus::Pending),
                sequence: Set(planned.sequence),
                comments: Set(None),
                resolved_at: Set(None),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;
            steps.push(step);
        }

        txn.commit()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        Ok((expense, steps))
    }

    /// Gets an expense by ID, scoped to a company.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::ExpenseNotFound` if the expense does not
    /// exist in the company.
    pub async fn find(
        &self,
        company_id: Uuid,
        expense_id: Uuid,
    ) -> Result<expenses::Model, WorkflowError> {
        expenses::Entity::find_by_id(expense_id)
            .filter(expenses::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?
            .ok_or(WorkflowError::ExpenseNotFound(expense_id))
    }

    /// Lists an employee's own expenses, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_employee(
        &self,
        employee_id: Uuid,
    ) -> Result<Vec<expenses::Model>, WorkflowError> {
        expenses::Entity::find()
            .filter(expenses::Column::EmployeeId.eq(employee_id))
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))
    }

    /// Lists expenses submitted by a manager's direct reports, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn team_expenses(
        &self,
        manager_id: Uuid,
    ) -> Result<Vec<expenses::Model>, WorkflowError> {
        let report_ids: Vec<Uuid> = users::Entity::find()
            .filter(users::Column::ManagerId.eq(manager_id))
            .all(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?
            .into_iter()
            .map(|u| u.id)
            .collect();

        if report_ids.is_empty() {
            return Ok(vec![]);
        }

        expenses::Entity::find()
            .filter(expenses::Column::EmployeeId.is_in(report_ids))
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))
    }
}
