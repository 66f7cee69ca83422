//! Savings account repository.

use std::collections::HashMap;

use chrono::NaiveDate;
use hogar_core::dashboard::SavingsBrief;
use hogar_core::savings::{
    SavingsError, SavingsMovementKind, SavingsSummary, validate_movement, validate_removal,
};
use hogar_shared::types::{FamilyId, SavingsAccountId, UserId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, IntoActiveModel, ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{savings_accounts, savings_movements};
use crate::rls::RlsConnection;

/// Error types for savings operations.
#[derive(Debug, thiserror::Error)]
pub enum SavingsRepoError {
    /// Account not found in the family.
    #[error("Savings account not found: {0}")]
    NotFound(SavingsAccountId),

    /// Movement not found on the account.
    #[error("Savings movement not found: {0}")]
    MovementNotFound(Uuid),

    /// Movement rejected against the current balance.
    #[error(transparent)]
    Rejected(#[from] SavingsError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Editable fields of a savings account, already validated.
#[derive(Debug, Clone)]
pub struct SavingsAccountFields {
    /// Display name.
    pub name: String,
    /// Optional target amount.
    pub goal: Option<Decimal>,
}

/// A deposit or withdrawal to record.
#[derive(Debug, Clone)]
pub struct NewSavingsMovement {
    /// Deposit or withdrawal.
    pub kind: SavingsMovementKind,
    /// Amount.
    pub amount: Decimal,
    /// Date.
    pub date: NaiveDate,
    /// Optional note.
    pub note: Option<String>,
}

/// Savings repository.
#[derive(Debug, Clone)]
pub struct SavingsRepository {
    db: DatabaseConnection,
}

impl SavingsRepository {
    /// Creates a new savings repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Accounts owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_owner(
        &self,
        family_id: FamilyId,
        owner_id: UserId,
    ) -> Result<Vec<savings_accounts::Model>, DbErr> {
        savings_accounts::Entity::find()
            .filter(savings_accounts::Column::FamilyId.eq(family_id.into_inner()))
            .filter(savings_accounts::Column::OwnerId.eq(owner_id.into_inner()))
            .order_by_asc(savings_accounts::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds an account in the family.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn find(
        &self,
        family_id: FamilyId,
        id: SavingsAccountId,
    ) -> Result<savings_accounts::Model, SavingsRepoError> {
        find_account(&self.db, family_id, id).await
    }

    /// Opens an account for `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        family_id: FamilyId,
        owner_id: UserId,
        fields: SavingsAccountFields,
    ) -> Result<savings_accounts::Model, DbErr> {
        let now = chrono::Utc::now().into();
        savings_accounts::ActiveModel {
            id: Set(SavingsAccountId::new().into_inner()),
            family_id: Set(family_id.into_inner()),
            owner_id: Set(owner_id.into_inner()),
            name: Set(fields.name),
            goal: Set(fields.goal),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Renames an account or changes its goal.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn update(
        &self,
        family_id: FamilyId,
        id: SavingsAccountId,
        fields: SavingsAccountFields,
    ) -> Result<savings_accounts::Model, SavingsRepoError> {
        let mut active = self.find(family_id, id).await?.into_active_model();
        active.name = Set(fields.name);
        active.goal = Set(fields.goal);
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Deletes an account and its movements.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn delete(
        &self,
        family_id: FamilyId,
        id: SavingsAccountId,
    ) -> Result<(), SavingsRepoError> {
        let result = savings_accounts::Entity::delete_many()
            .filter(savings_accounts::Column::Id.eq(id.into_inner()))
            .filter(savings_accounts::Column::FamilyId.eq(family_id.into_inner()))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(SavingsRepoError::NotFound(id));
        }
        Ok(())
    }

    /// Records a movement, rejecting withdrawals above the balance.
    ///
    /// The account row is locked while the balance is checked.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `Rejected` for a non-positive amount or
    /// insufficient funds.
    pub async fn add_movement(
        &self,
        family_id: FamilyId,
        account_id: SavingsAccountId,
        input: NewSavingsMovement,
    ) -> Result<savings_movements::Model, SavingsRepoError> {
        let rls = RlsConnection::new(&self.db, family_id).await?;
        let txn = rls.transaction();

        lock_account(txn, family_id, account_id).await?;

        let movements = movements_of(txn, family_id, account_id).await?;
        let balance = SavingsSummary::rollup(None, &pairs(&movements)).balance;
        validate_movement(balance, input.kind, input.amount)?;

        let movement = savings_movements::ActiveModel {
            id: Set(Uuid::now_v7()),
            family_id: Set(family_id.into_inner()),
            account_id: Set(account_id.into_inner()),
            kind: Set(input.kind.into()),
            amount: Set(input.amount),
            date: Set(input.date),
            note: Set(input.note),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(txn)
        .await?;

        rls.commit().await?;
        Ok(movement)
    }

    /// Movements on an account, newest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist in this family.
    pub async fn list_movements(
        &self,
        family_id: FamilyId,
        account_id: SavingsAccountId,
    ) -> Result<Vec<savings_movements::Model>, SavingsRepoError> {
        self.find(family_id, account_id).await?;
        Ok(movements_of(&self.db, family_id, account_id).await?)
    }

    /// Deletes a movement.
    ///
    /// The account row is locked while the balance is checked, so removing
    /// a deposit can never leave the withdrawals above what was saved.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `MovementNotFound` if the account has no such
    /// movement, or `Rejected` when the balance would go negative.
    pub async fn delete_movement(
        &self,
        family_id: FamilyId,
        account_id: SavingsAccountId,
        movement_id: Uuid,
    ) -> Result<(), SavingsRepoError> {
        let rls = RlsConnection::new(&self.db, family_id).await?;
        let txn = rls.transaction();

        lock_account(txn, family_id, account_id).await?;

        let movements = movements_of(txn, family_id, account_id).await?;
        let balance = SavingsSummary::rollup(None, &pairs(&movements)).balance;
        let movement = movements
            .into_iter()
            .find(|m| m.id == movement_id)
            .ok_or(SavingsRepoError::MovementNotFound(movement_id))?;
        validate_removal(balance, movement.kind.into(), movement.amount)?;

        movement.delete(txn).await?;

        rls.commit().await?;
        tracing::info!(
            family_id = %family_id,
            account_id = %account_id,
            movement_id = %movement_id,
            "savings movement deleted"
        );
        Ok(())
    }

    /// Balance and goal progress of one account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist in this family.
    pub async fn summary(
        &self,
        family_id: FamilyId,
        account_id: SavingsAccountId,
    ) -> Result<SavingsSummary, SavingsRepoError> {
        let account = self.find(family_id, account_id).await?;
        let movements = movements_of(&self.db, family_id, account_id).await?;
        Ok(SavingsSummary::rollup(account.goal, &pairs(&movements)))
    }

    /// Every account of `owner_id` with its rollup.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn briefs_for_owner(
        &self,
        family_id: FamilyId,
        owner_id: UserId,
    ) -> Result<Vec<SavingsBrief>, DbErr> {
        let accounts = self.list_for_owner(family_id, owner_id).await?;
        let ids: Vec<Uuid> = accounts.iter().map(|a| a.id).collect();

        let movements = savings_movements::Entity::find()
            .filter(savings_movements::Column::FamilyId.eq(family_id.into_inner()))
            .filter(savings_movements::Column::AccountId.is_in(ids))
            .all(&self.db)
            .await?;

        let mut by_account: HashMap<Uuid, Vec<savings_movements::Model>> = HashMap::new();
        for movement in movements {
            by_account.entry(movement.account_id).or_default().push(movement);
        }

        Ok(accounts
            .into_iter()
            .map(|account| {
                let movements = by_account.remove(&account.id).unwrap_or_default();
                SavingsBrief {
                    id: SavingsAccountId::from_uuid(account.id),
                    summary: SavingsSummary::rollup(account.goal, &pairs(&movements)),
                    name: account.name,
                }
            })
            .collect())
    }
}

async fn lock_account(
    txn: &DatabaseTransaction,
    family_id: FamilyId,
    id: SavingsAccountId,
) -> Result<savings_accounts::Model, SavingsRepoError> {
    savings_accounts::Entity::find_by_id(id.into_inner())
        .filter(savings_accounts::Column::FamilyId.eq(family_id.into_inner()))
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(SavingsRepoError::NotFound(id))
}

async fn find_account<C: ConnectionTrait>(
    conn: &C,
    family_id: FamilyId,
    id: SavingsAccountId,
) -> Result<savings_accounts::Model, SavingsRepoError> {
    savings_accounts::Entity::find_by_id(id.into_inner())
        .filter(savings_accounts::Column::FamilyId.eq(family_id.into_inner()))
        .one(conn)
        .await?
        .ok_or(SavingsRepoError::NotFound(id))
}

async fn movements_of<C: ConnectionTrait>(
    conn: &C,
    family_id: FamilyId,
    account_id: SavingsAccountId,
) -> Result<Vec<savings_movements::Model>, DbErr> {
    savings_movements::Entity::find()
        .filter(savings_movements::Column::FamilyId.eq(family_id.into_inner()))
        .filter(savings_movements::Column::AccountId.eq(account_id.into_inner()))
        .order_by_desc(savings_movements::Column::Date)
        .order_by_desc(savings_movements::Column::CreatedAt)
        .all(conn)
        .await
}

fn pairs(movements: &[savings_movements::Model]) -> Vec<(SavingsMovementKind, Decimal)> {
    movements.iter().map(|m| (m.kind.into(), m.amount)).collect()
}
