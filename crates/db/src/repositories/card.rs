//! Credit card repository.

use std::collections::HashMap;

use chrono::NaiveDate;
use hogar_core::card::{CardMovementKind, CardMovementLine, CardSummary};
use hogar_core::dashboard::CardBrief;
use hogar_shared::types::{CardId, FamilyId, UserId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{card_movements, credit_cards};

/// Error types for card operations.
#[derive(Debug, thiserror::Error)]
pub enum CardRepoError {
    /// Card not found in the family.
    #[error("Card not found: {0}")]
    NotFound(CardId),

    /// Movement not found on the card.
    #[error("Card movement not found: {0}")]
    MovementNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Editable fields of a card, already validated.
#[derive(Debug, Clone)]
pub struct CardFields {
    /// Display name.
    pub name: String,
    /// Credit limit, zero or more.
    pub credit_limit: Decimal,
    /// Balance carried in when the card was added.
    pub initial_balance: Decimal,
}

/// A validated card movement.
#[derive(Debug, Clone)]
pub struct NewCardMovement {
    /// Charge or payment.
    pub kind: CardMovementKind,
    /// Amount, greater than zero.
    pub amount: Decimal,
    /// Date.
    pub date: NaiveDate,
    /// Free text.
    pub description: Option<String>,
}

/// Credit card repository.
#[derive(Debug, Clone)]
pub struct CardRepository {
    db: DatabaseConnection,
}

impl CardRepository {
    /// Creates a new card repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Cards owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_owner(
        &self,
        family_id: FamilyId,
        owner_id: UserId,
    ) -> Result<Vec<credit_cards::Model>, DbErr> {
        credit_cards::Entity::find()
            .filter(credit_cards::Column::FamilyId.eq(family_id.into_inner()))
            .filter(credit_cards::Column::OwnerId.eq(owner_id.into_inner()))
            .order_by_asc(credit_cards::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a card in the family.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn find(
        &self,
        family_id: FamilyId,
        id: CardId,
    ) -> Result<credit_cards::Model, CardRepoError> {
        credit_cards::Entity::find_by_id(id.into_inner())
            .filter(credit_cards::Column::FamilyId.eq(family_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(CardRepoError::NotFound(id))
    }

    /// Adds a card for `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        family_id: FamilyId,
        owner_id: UserId,
        fields: CardFields,
    ) -> Result<credit_cards::Model, DbErr> {
        let now = chrono::Utc::now().into();
        credit_cards::ActiveModel {
            id: Set(CardId::new().into_inner()),
            family_id: Set(family_id.into_inner()),
            owner_id: Set(owner_id.into_inner()),
            name: Set(fields.name),
            credit_limit: Set(fields.credit_limit),
            initial_balance: Set(fields.initial_balance),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Replaces the editable fields of a card.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn update(
        &self,
        family_id: FamilyId,
        id: CardId,
        fields: CardFields,
    ) -> Result<credit_cards::Model, CardRepoError> {
        let mut active = self.find(family_id, id).await?.into_active_model();
        active.name = Set(fields.name);
        active.credit_limit = Set(fields.credit_limit);
        active.initial_balance = Set(fields.initial_balance);
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Deletes a card and its movements.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn delete(&self, family_id: FamilyId, id: CardId) -> Result<(), CardRepoError> {
        let result = credit_cards::Entity::delete_many()
            .filter(credit_cards::Column::Id.eq(id.into_inner()))
            .filter(credit_cards::Column::FamilyId.eq(family_id.into_inner()))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(CardRepoError::NotFound(id));
        }
        Ok(())
    }

    /// Records a charge or payment on a card.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the card does not exist in this family.
    pub async fn add_movement(
        &self,
        family_id: FamilyId,
        card_id: CardId,
        created_by: UserId,
        input: NewCardMovement,
    ) -> Result<card_movements::Model, CardRepoError> {
        self.find(family_id, card_id).await?;
        let movement = card_movements::ActiveModel {
            id: Set(Uuid::now_v7()),
            family_id: Set(family_id.into_inner()),
            card_id: Set(card_id.into_inner()),
            kind: Set(input.kind.into()),
            amount: Set(input.amount),
            date: Set(input.date),
            description: Set(input.description),
            created_by: Set(created_by.into_inner()),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        tracing::debug!(
            card_id = %card_id,
            kind = input.kind.as_str(),
            amount = %movement.amount,
            "card movement recorded"
        );
        Ok(movement)
    }

    /// Movements on a card, newest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the card does not exist in this family.
    pub async fn list_movements(
        &self,
        family_id: FamilyId,
        card_id: CardId,
    ) -> Result<Vec<card_movements::Model>, CardRepoError> {
        self.find(family_id, card_id).await?;
        Ok(card_movements::Entity::find()
            .filter(card_movements::Column::FamilyId.eq(family_id.into_inner()))
            .filter(card_movements::Column::CardId.eq(card_id.into_inner()))
            .order_by_desc(card_movements::Column::Date)
            .order_by_desc(card_movements::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Deletes a movement from a card.
    ///
    /// # Errors
    ///
    /// Returns `MovementNotFound` if the card has no such movement.
    pub async fn delete_movement(
        &self,
        family_id: FamilyId,
        card_id: CardId,
        movement_id: Uuid,
    ) -> Result<(), CardRepoError> {
        let result = card_movements::Entity::delete_many()
            .filter(card_movements::Column::Id.eq(movement_id))
            .filter(card_movements::Column::CardId.eq(card_id.into_inner()))
            .filter(card_movements::Column::FamilyId.eq(family_id.into_inner()))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(CardRepoError::MovementNotFound(movement_id));
        }
        Ok(())
    }

    /// Balance, available credit and usage of one card.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the card does not exist in this family.
    pub async fn summary(
        &self,
        family_id: FamilyId,
        card_id: CardId,
    ) -> Result<CardSummary, CardRepoError> {
        let card = self.find(family_id, card_id).await?;
        let movements = self.list_movements(family_id, card_id).await?;
        let lines: Vec<CardMovementLine> = movements.iter().map(movement_line).collect();
        Ok(CardSummary::rollup(card.initial_balance, card.credit_limit, &lines))
    }

    /// Every card of `owner_id` with its rollup.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn briefs_for_owner(
        &self,
        family_id: FamilyId,
        owner_id: UserId,
    ) -> Result<Vec<CardBrief>, DbErr> {
        let cards = self.list_for_owner(family_id, owner_id).await?;
        let card_ids: Vec<Uuid> = cards.iter().map(|c| c.id).collect();

        let movements = card_movements::Entity::find()
            .filter(card_movements::Column::FamilyId.eq(family_id.into_inner()))
            .filter(card_movements::Column::CardId.is_in(card_ids))
            .all(&self.db)
            .await?;

        let mut by_card: HashMap<Uuid, Vec<CardMovementLine>> = HashMap::new();
        for movement in &movements {
            by_card.entry(movement.card_id).or_default().push(movement_line(movement));
        }

        Ok(cards
            .into_iter()
            .map(|card| {
                let lines = by_card.remove(&card.id).unwrap_or_default();
                CardBrief {
                    id: CardId::from_uuid(card.id),
                    summary: CardSummary::rollup(card.initial_balance, card.credit_limit, &lines),
                    name: card.name,
                }
            })
            .collect())
    }
}

fn movement_line(movement: &card_movements::Model) -> CardMovementLine {
    CardMovementLine {
        kind: movement.kind.into(),
        amount: movement.amount,
    }
}
