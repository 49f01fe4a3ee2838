//! `SeaORM` entity definitions.

pub mod approval_rule_approvers;
pub mod approval_rules;
pub mod approvals;
pub mod companies;
pub mod expenses;
pub mod sea_orm_active_enums;
pub mod users;
