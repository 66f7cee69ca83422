//! `SeaORM` Entity for fixed_expenses table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fixed_expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub family_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    pub category: String,
    pub due_day: i16,
    pub is_recurring: bool,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fixed_expense_payments::Entity")]
    FixedExpensePayments,
}

impl Related<super::fixed_expense_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FixedExpensePayments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
