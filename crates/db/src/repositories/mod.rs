//! Repository layer for data access.
//!
//! Repositories own a database connection and orchestrate the pure workflow
//! logic from `spendra-core` inside database transactions.

pub mod approval;
pub mod approval_rule;
pub mod company;
pub mod expense;
pub mod user;

pub use approval::ApprovalRepository;
pub use approval_rule::ApprovalRuleRepository;
pub use company::CompanyRepository;
pub use expense::ExpenseRepository;
pub use user::UserRepository;
