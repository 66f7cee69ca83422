//! Shared shopping list repository.

use hogar_shared::types::{FamilyId, ShoppingItemId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::shopping_items;

/// Error types for shopping list operations.
#[derive(Debug, thiserror::Error)]
pub enum ShoppingRepoError {
    /// Item not found in the family.
    #[error("Shopping item not found: {0}")]
    NotFound(ShoppingItemId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Shopping list repository.
#[derive(Debug, Clone)]
pub struct ShoppingRepository {
    db: DatabaseConnection,
}

impl ShoppingRepository {
    /// Creates a new shopping list repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Items on the list, unchecked first, then oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, family_id: FamilyId) -> Result<Vec<shopping_items::Model>, DbErr> {
        shopping_items::Entity::find()
            .filter(shopping_items::Column::FamilyId.eq(family_id.into_inner()))
            .order_by_asc(shopping_items::Column::IsChecked)
            .order_by_asc(shopping_items::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Adds an item.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn add(
        &self,
        family_id: FamilyId,
        added_by: UserId,
        name: &str,
        quantity: Option<String>,
    ) -> Result<shopping_items::Model, DbErr> {
        let now = chrono::Utc::now().into();
        shopping_items::ActiveModel {
            id: Set(ShoppingItemId::new().into_inner()),
            family_id: Set(family_id.into_inner()),
            name: Set(name.to_string()),
            quantity: Set(quantity),
            is_checked: Set(false),
            added_by: Set(added_by.into_inner()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Flips the checked flag of an item.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn toggle(
        &self,
        family_id: FamilyId,
        id: ShoppingItemId,
    ) -> Result<shopping_items::Model, ShoppingRepoError> {
        let item = shopping_items::Entity::find_by_id(id.into_inner())
            .filter(shopping_items::Column::FamilyId.eq(family_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(ShoppingRepoError::NotFound(id))?;

        let checked = !item.is_checked;
        let mut active = item.into_active_model();
        active.is_checked = Set(checked);
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Removes an item.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn delete(
        &self,
        family_id: FamilyId,
        id: ShoppingItemId,
    ) -> Result<(), ShoppingRepoError> {
        let result = shopping_items::Entity::delete_many()
            .filter(shopping_items::Column::Id.eq(id.into_inner()))
            .filter(shopping_items::Column::FamilyId.eq(family_id.into_inner()))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ShoppingRepoError::NotFound(id));
        }
        Ok(())
    }

    /// Removes every checked item and returns how many went.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn clear_checked(&self, family_id: FamilyId) -> Result<u64, DbErr> {
        let result = shopping_items::Entity::delete_many()
            .filter(shopping_items::Column::FamilyId.eq(family_id.into_inner()))
            .filter(shopping_items::Column::IsChecked.eq(true))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
