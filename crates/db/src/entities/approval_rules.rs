//! `SeaORM` Entity for the approval_rules table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ApprovalRuleType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "approval_rules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub rule_type: ApprovalRuleType,
    /// Inclusive lower bound of the amount window, in company currency.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub min_amount: Option<Decimal>,
    /// Inclusive upper bound of the amount window, in company currency.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub max_amount: Option<Decimal>,
    /// Percentage of listed approvers required, for percentage and hybrid rules.
    pub percentage_required: Option<i32>,
    /// Short-circuit approver, for specific_approver and hybrid rules.
    pub specific_approver_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
    #[sea_orm(has_many = "super::approval_rule_approvers::Entity")]
    ApprovalRuleApprovers,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::approval_rule_approvers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApprovalRuleApprovers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
