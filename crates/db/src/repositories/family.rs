//! Family repository: creation, invite codes and membership.

use hogar_core::balance::Member;
use hogar_shared::types::{Currency, FamilyId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::is_unique_violation;
use crate::entities::{families, family_members, sea_orm_active_enums::FamilyRole, users};

/// Error types for family operations.
#[derive(Debug, thiserror::Error)]
pub enum FamilyRepoError {
    /// Family not found.
    #[error("Family not found: {0}")]
    NotFound(FamilyId),

    /// No family uses the invite code.
    #[error("No family uses that invite code")]
    InviteCodeNotFound,

    /// Generated invite code collided with an existing one.
    #[error("Invite code already in use")]
    InviteCodeTaken,

    /// The user is already a member of a family.
    #[error("User already belongs to a family")]
    AlreadyInFamily,

    /// Stored currency code is not one the app knows.
    #[error("Family has an unknown currency: {0}")]
    UnknownCurrency(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Family repository.
#[derive(Debug, Clone)]
pub struct FamilyRepository {
    db: DatabaseConnection,
}

impl FamilyRepository {
    /// Creates a new family repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a family by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: FamilyId) -> Result<Option<families::Model>, DbErr> {
        families::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// The family's display currency.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown family and `UnknownCurrency` when
    /// the stored code does not parse.
    pub async fn currency(&self, id: FamilyId) -> Result<Currency, FamilyRepoError> {
        let family = self
            .find_by_id(id)
            .await?
            .ok_or(FamilyRepoError::NotFound(id))?;
        family
            .currency
            .parse()
            .map_err(|_| FamilyRepoError::UnknownCurrency(family.currency))
    }

    /// Creates a family with `owner_id` as its owner.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyInFamily` if the owner already has a family and
    /// `InviteCodeTaken` if the code collides; the caller retries with a
    /// fresh code.
    pub async fn create_with_owner(
        &self,
        name: &str,
        currency: &str,
        owner_id: UserId,
        invite_code: &str,
    ) -> Result<families::Model, FamilyRepoError> {
        let txn = self.db.begin().await?;

        let existing = family_members::Entity::find()
            .filter(family_members::Column::UserId.eq(owner_id.into_inner()))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(FamilyRepoError::AlreadyInFamily);
        }

        let now = chrono::Utc::now().into();
        let family_id = FamilyId::new().into_inner();

        let family = families::ActiveModel {
            id: Set(family_id),
            name: Set(name.to_string()),
            invite_code: Set(invite_code.to_string()),
            currency: Set(currency.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                FamilyRepoError::InviteCodeTaken
            } else {
                FamilyRepoError::Database(e)
            }
        })?;

        family_members::ActiveModel {
            family_id: Set(family_id),
            user_id: Set(owner_id.into_inner()),
            role: Set(FamilyRole::Owner),
            joined_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(family_id = %family_id, owner_id = %owner_id, "family created");
        Ok(family)
    }

    /// Adds `user_id` to the family holding `invite_code`.
    ///
    /// # Errors
    ///
    /// Returns `InviteCodeNotFound` for an unknown code and `AlreadyInFamily`
    /// when the user already has a family.
    pub async fn join(
        &self,
        invite_code: &str,
        user_id: UserId,
    ) -> Result<families::Model, FamilyRepoError> {
        let txn = self.db.begin().await?;

        let family = families::Entity::find()
            .filter(families::Column::InviteCode.eq(invite_code))
            .one(&txn)
            .await?
            .ok_or(FamilyRepoError::InviteCodeNotFound)?;

        let inserted = family_members::ActiveModel {
            family_id: Set(family.id),
            user_id: Set(user_id.into_inner()),
            role: Set(FamilyRole::Member),
            joined_at: Set(chrono::Utc::now().into()),
        }
        .insert(&txn)
        .await;

        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => return Err(FamilyRepoError::AlreadyInFamily),
            Err(e) => return Err(e.into()),
        }

        txn.commit().await?;

        tracing::info!(family_id = %family.id, user_id = %user_id, "member joined family");
        Ok(family)
    }

    /// Replaces the family's invite code.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `InviteCodeTaken` when the new code collides.
    pub async fn set_invite_code(
        &self,
        family_id: FamilyId,
        invite_code: &str,
    ) -> Result<families::Model, FamilyRepoError> {
        let family = self
            .find_by_id(family_id)
            .await?
            .ok_or(FamilyRepoError::NotFound(family_id))?;

        let mut active = family.into_active_model();
        active.invite_code = Set(invite_code.to_string());
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                FamilyRepoError::InviteCodeTaken
            } else {
                FamilyRepoError::Database(e)
            }
        })
    }

    /// Members with their user rows, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn members(
        &self,
        family_id: FamilyId,
    ) -> Result<Vec<(users::Model, family_members::Model)>, DbErr> {
        family_members::Entity::find()
            .filter(family_members::Column::FamilyId.eq(family_id.into_inner()))
            .order_by_asc(family_members::Column::JoinedAt)
            .find_also_related(users::Entity)
            .all(&self.db)
            .await
            .map(|results| {
                results
                    .into_iter()
                    .filter_map(|(member, user)| user.map(|u| (u, member)))
                    .collect()
            })
    }

    /// Members as the balance computation sees them.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn balance_members(&self, family_id: FamilyId) -> Result<Vec<Member>, DbErr> {
        Ok(self
            .members(family_id)
            .await?
            .into_iter()
            .map(|(user, _)| Member::new(UserId::from_uuid(user.id), user.display_name))
            .collect())
    }

    /// Member ids, for split and settlement validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn member_ids(&self, family_id: FamilyId) -> Result<Vec<UserId>, DbErr> {
        let rows = family_members::Entity::find()
            .filter(family_members::Column::FamilyId.eq(family_id.into_inner()))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|m| UserId::from_uuid(m.user_id)).collect())
    }

    /// A user's membership in a specific family.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn membership(
        &self,
        family_id: FamilyId,
        user_id: UserId,
    ) -> Result<Option<family_members::Model>, DbErr> {
        family_members::Entity::find()
            .filter(family_members::Column::FamilyId.eq(family_id.into_inner()))
            .filter(family_members::Column::UserId.eq(user_id.into_inner()))
            .one(&self.db)
            .await
    }
}
