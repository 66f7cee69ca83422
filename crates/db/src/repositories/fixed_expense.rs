//! Fixed expense repository: recurring bills and their monthly payments.

use std::collections::HashMap;

use chrono::NaiveDate;
use hogar_core::month::MonthKey;
use hogar_core::schedule::{FixedExpenseLine, Reminder, ScheduleService};
use hogar_shared::types::{FamilyId, FixedExpenseId, UserId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::is_unique_violation;
use crate::entities::{fixed_expense_payments, fixed_expenses};
use crate::rls::RlsConnection;

/// Error types for fixed expense operations.
#[derive(Debug, thiserror::Error)]
pub enum FixedExpenseRepoError {
    /// Fixed expense not found in the family.
    #[error("Fixed expense not found: {0}")]
    NotFound(FixedExpenseId),

    /// A payment for the month already exists.
    #[error("Already paid for {0}")]
    AlreadyPaid(MonthKey),

    /// No payment recorded for the month.
    #[error("No payment recorded for {0}")]
    NotPaid(MonthKey),

    /// Due day does not fit the column.
    #[error("Invalid due day: {0}")]
    InvalidDueDay(u32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Editable fields of a fixed expense, already validated.
#[derive(Debug, Clone)]
pub struct FixedExpenseFields {
    /// Bill name.
    pub name: String,
    /// Expected amount.
    pub amount: Decimal,
    /// Category.
    pub category: String,
    /// Day of month it is due, 1..=31.
    pub due_day: u32,
    /// Due every month.
    pub recurring: bool,
    /// Produces reminders.
    pub active: bool,
}

/// Fixed expense repository.
#[derive(Debug, Clone)]
pub struct FixedExpenseRepository {
    db: DatabaseConnection,
}

impl FixedExpenseRepository {
    /// Creates a new fixed expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fixed expenses of the family, by due day.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, family_id: FamilyId) -> Result<Vec<fixed_expenses::Model>, DbErr> {
        fixed_expenses::Entity::find()
            .filter(fixed_expenses::Column::FamilyId.eq(family_id.into_inner()))
            .order_by_asc(fixed_expenses::Column::DueDay)
            .order_by_asc(fixed_expenses::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a fixed expense in the family.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn find(
        &self,
        family_id: FamilyId,
        id: FixedExpenseId,
    ) -> Result<fixed_expenses::Model, FixedExpenseRepoError> {
        fixed_expenses::Entity::find_by_id(id.into_inner())
            .filter(fixed_expenses::Column::FamilyId.eq(family_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(FixedExpenseRepoError::NotFound(id))
    }

    /// Creates a fixed expense.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        family_id: FamilyId,
        created_by: UserId,
        fields: FixedExpenseFields,
    ) -> Result<fixed_expenses::Model, FixedExpenseRepoError> {
        let due_day = due_day_column(fields.due_day)?;
        let now = chrono::Utc::now().into();
        let model = fixed_expenses::ActiveModel {
            id: Set(FixedExpenseId::new().into_inner()),
            family_id: Set(family_id.into_inner()),
            name: Set(fields.name),
            amount: Set(fields.amount),
            category: Set(fields.category),
            due_day: Set(due_day),
            is_recurring: Set(fields.recurring),
            is_active: Set(fields.active),
            created_by: Set(created_by.into_inner()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Replaces the editable fields of a fixed expense.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn update(
        &self,
        family_id: FamilyId,
        id: FixedExpenseId,
        fields: FixedExpenseFields,
    ) -> Result<fixed_expenses::Model, FixedExpenseRepoError> {
        let due_day = due_day_column(fields.due_day)?;
        let mut active = self.find(family_id, id).await?.into_active_model();
        active.name = Set(fields.name);
        active.amount = Set(fields.amount);
        active.category = Set(fields.category);
        active.due_day = Set(due_day);
        active.is_recurring = Set(fields.recurring);
        active.is_active = Set(fields.active);
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Deletes a fixed expense and its payments.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn delete(
        &self,
        family_id: FamilyId,
        id: FixedExpenseId,
    ) -> Result<(), FixedExpenseRepoError> {
        let result = fixed_expenses::Entity::delete_many()
            .filter(fixed_expenses::Column::Id.eq(id.into_inner()))
            .filter(fixed_expenses::Column::FamilyId.eq(family_id.into_inner()))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(FixedExpenseRepoError::NotFound(id));
        }
        Ok(())
    }

    /// Marks a fixed expense as paid for `month`.
    ///
    /// `amount` defaults to the bill's expected amount.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `AlreadyPaid` when the month already has a payment.
    pub async fn record_payment(
        &self,
        family_id: FamilyId,
        id: FixedExpenseId,
        month: MonthKey,
        amount: Option<Decimal>,
        paid_by: UserId,
    ) -> Result<fixed_expense_payments::Model, FixedExpenseRepoError> {
        let rls = RlsConnection::new(&self.db, family_id).await?;
        let txn = rls.transaction();

        let bill = fixed_expenses::Entity::find_by_id(id.into_inner())
            .filter(fixed_expenses::Column::FamilyId.eq(family_id.into_inner()))
            .one(txn)
            .await?
            .ok_or(FixedExpenseRepoError::NotFound(id))?;

        let payment = fixed_expense_payments::ActiveModel {
            id: Set(Uuid::now_v7()),
            family_id: Set(family_id.into_inner()),
            fixed_expense_id: Set(bill.id),
            month: Set(month.to_string()),
            amount: Set(amount.unwrap_or(bill.amount)),
            paid_by: Set(paid_by.into_inner()),
            paid_at: Set(chrono::Utc::now().into()),
        }
        .insert(txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                FixedExpenseRepoError::AlreadyPaid(month)
            } else {
                FixedExpenseRepoError::Database(e)
            }
        })?;

        rls.commit().await?;

        tracing::info!(
            family_id = %family_id,
            fixed_expense_id = %id,
            month = %month,
            "fixed expense paid"
        );
        Ok(payment)
    }

    /// Removes the payment for `month`.
    ///
    /// # Errors
    ///
    /// Returns `NotPaid` when the month has no payment.
    pub async fn delete_payment(
        &self,
        family_id: FamilyId,
        id: FixedExpenseId,
        month: MonthKey,
    ) -> Result<(), FixedExpenseRepoError> {
        let result = fixed_expense_payments::Entity::delete_many()
            .filter(fixed_expense_payments::Column::FamilyId.eq(family_id.into_inner()))
            .filter(fixed_expense_payments::Column::FixedExpenseId.eq(id.into_inner()))
            .filter(fixed_expense_payments::Column::Month.eq(month.to_string()))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(FixedExpenseRepoError::NotPaid(month));
        }
        Ok(())
    }

    /// Fixed expenses with their paid months, as the scheduler sees them.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn lines(&self, family_id: FamilyId) -> Result<Vec<FixedExpenseLine>, DbErr> {
        let payments_query = fixed_expense_payments::Entity::find()
            .filter(fixed_expense_payments::Column::FamilyId.eq(family_id.into_inner()))
            .all(&self.db);
        let (bills, payments) = tokio::try_join!(self.list(family_id), payments_query)?;

        let mut paid: HashMap<Uuid, Vec<MonthKey>> = HashMap::new();
        for payment in payments {
            match payment.month.parse::<MonthKey>() {
                Ok(month) => paid.entry(payment.fixed_expense_id).or_default().push(month),
                Err(e) => tracing::warn!(
                    payment_id = %payment.id,
                    error = %e,
                    "skipping payment with bad month"
                ),
            }
        }

        Ok(bills
            .into_iter()
            .map(|bill| FixedExpenseLine {
                id: FixedExpenseId::from_uuid(bill.id),
                paid_months: paid.remove(&bill.id).unwrap_or_default(),
                name: bill.name,
                amount: bill.amount,
                due_day: u32::from(bill.due_day.unsigned_abs()),
                recurring: bill.is_recurring,
                active: bill.is_active,
            })
            .collect())
    }

    /// Unpaid bills due within `within_days` of `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn reminders(
        &self,
        family_id: FamilyId,
        today: NaiveDate,
        within_days: u32,
    ) -> Result<Vec<Reminder>, DbErr> {
        let lines = self.lines(family_id).await?;
        Ok(ScheduleService::upcoming(&lines, today, within_days))
    }
}

fn due_day_column(due_day: u32) -> Result<i16, FixedExpenseRepoError> {
    i16::try_from(due_day).map_err(|_| FixedExpenseRepoError::InvalidDueDay(due_day))
}
