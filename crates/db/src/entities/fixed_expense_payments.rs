//! `SeaORM` Entity for fixed_expense_payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fixed_expense_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub family_id: Uuid,
    pub fixed_expense_id: Uuid,
    /// Month key, `YYYY-MM`.
    pub month: String,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    pub paid_by: Uuid,
    pub paid_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fixed_expenses::Entity",
        from = "Column::FixedExpenseId",
        to = "super::fixed_expenses::Column::Id",
        on_delete = "Cascade"
    )]
    FixedExpenses,
}

impl Related<super::fixed_expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FixedExpenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
