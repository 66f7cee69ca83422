//! Category budget repository.

use hogar_core::budget::{BudgetReport, BudgetService, CategoryBudget, CategorySpend};
use hogar_core::month::MonthKey;
use hogar_shared::types::{BudgetId, FamilyId};
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set};

use super::expense::ExpenseRepository;
use crate::entities::category_budgets;

/// Error types for budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetRepoError {
    /// No budget for the category.
    #[error("No budget for category '{0}'")]
    NotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Budget repository.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Budgets of the family, by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, family_id: FamilyId) -> Result<Vec<category_budgets::Model>, DbErr> {
        category_budgets::Entity::find()
            .filter(category_budgets::Column::FamilyId.eq(family_id.into_inner()))
            .order_by_asc(category_budgets::Column::Category)
            .all(&self.db)
            .await
    }

    /// Sets the monthly amount for a category, creating the budget if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn upsert(
        &self,
        family_id: FamilyId,
        category: &str,
        amount: Decimal,
    ) -> Result<category_budgets::Model, BudgetRepoError> {
        let now = chrono::Utc::now().into();
        let model = category_budgets::ActiveModel {
            id: Set(BudgetId::new().into_inner()),
            family_id: Set(family_id.into_inner()),
            category: Set(category.to_string()),
            amount: Set(amount),
            created_at: Set(now),
            updated_at: Set(now),
        };

        category_budgets::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    category_budgets::Column::FamilyId,
                    category_budgets::Column::Category,
                ])
                .update_columns([
                    category_budgets::Column::Amount,
                    category_budgets::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        category_budgets::Entity::find()
            .filter(category_budgets::Column::FamilyId.eq(family_id.into_inner()))
            .filter(category_budgets::Column::Category.eq(category))
            .one(&self.db)
            .await?
            .ok_or_else(|| BudgetRepoError::NotFound(category.to_string()))
    }

    /// Removes the budget for a category.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the category has no budget.
    pub async fn delete(&self, family_id: FamilyId, category: &str) -> Result<(), BudgetRepoError> {
        let result = category_budgets::Entity::delete_many()
            .filter(category_budgets::Column::FamilyId.eq(family_id.into_inner()))
            .filter(category_budgets::Column::Category.eq(category))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(BudgetRepoError::NotFound(category.to_string()));
        }
        Ok(())
    }

    /// Budget usage for `month` against the month's expenses.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn usage(&self, family_id: FamilyId, month: MonthKey) -> Result<BudgetReport, DbErr> {
        let expenses = ExpenseRepository::new(self.db.clone());
        let (budgets, spent) = tokio::try_join!(
            self.list(family_id),
            expenses.list_by_month(family_id, month)
        )?;

        let budgets: Vec<CategoryBudget> = budgets
            .into_iter()
            .map(|b| CategoryBudget {
                category: b.category,
                amount: b.amount,
            })
            .collect();
        let spent: Vec<CategorySpend> = spent
            .into_iter()
            .map(|e| CategorySpend {
                category: e.category,
                amount: e.amount,
            })
            .collect();

        Ok(BudgetService::report(&budgets, &spent))
    }
}
