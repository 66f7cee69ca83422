//! `SeaORM` Entity for expenses table.

use super::sea_orm_active_enums::SplitKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub family_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    pub date: Date,
    pub category: String,
    pub description: Option<String>,
    pub paid_by: Uuid,
    pub split: SplitKind,
    pub for_member: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expense_notes::Entity")]
    ExpenseNotes,
}

impl Related<super::expense_notes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseNotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
