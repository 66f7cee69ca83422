//! Family calendar repository.

use chrono::{NaiveDate, NaiveTime};
use hogar_core::dashboard::EventBrief;
use hogar_core::month::MonthKey;
use hogar_shared::types::{EventId, FamilyId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::family_events;

/// Error types for event operations.
#[derive(Debug, thiserror::Error)]
pub enum EventRepoError {
    /// Event not found in the family.
    #[error("Event not found: {0}")]
    NotFound(EventId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Editable fields of an event.
#[derive(Debug, Clone)]
pub struct EventFields {
    /// Title.
    pub title: String,
    /// Day of the event.
    pub date: NaiveDate,
    /// Optional start time.
    pub time: Option<NaiveTime>,
    /// Free text.
    pub description: Option<String>,
}

/// Event repository.
#[derive(Debug, Clone)]
pub struct EventRepository {
    db: DatabaseConnection,
}

impl EventRepository {
    /// Creates a new event repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Events in `month`, in calendar order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_month(
        &self,
        family_id: FamilyId,
        month: MonthKey,
    ) -> Result<Vec<family_events::Model>, DbErr> {
        let (start, end) = month.range();
        self.between(family_id, start, end).await
    }

    /// Events from `today` to the end of its month, as dashboard briefs.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn upcoming(
        &self,
        family_id: FamilyId,
        today: NaiveDate,
    ) -> Result<Vec<EventBrief>, DbErr> {
        let (_, end) = MonthKey::of(today).range();
        let events = self.between(family_id, today, end).await?;
        Ok(events
            .into_iter()
            .map(|e| EventBrief {
                id: EventId::from_uuid(e.id),
                title: e.title,
                date: e.date,
            })
            .collect())
    }

    async fn between(
        &self,
        family_id: FamilyId,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<family_events::Model>, DbErr> {
        family_events::Entity::find()
            .filter(family_events::Column::FamilyId.eq(family_id.into_inner()))
            .filter(family_events::Column::Date.gte(from))
            .filter(family_events::Column::Date.lt(until))
            .order_by_asc(family_events::Column::Date)
            .order_by_asc(family_events::Column::Time)
            .all(&self.db)
            .await
    }

    /// Finds an event in the family.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn find(
        &self,
        family_id: FamilyId,
        id: EventId,
    ) -> Result<family_events::Model, EventRepoError> {
        family_events::Entity::find_by_id(id.into_inner())
            .filter(family_events::Column::FamilyId.eq(family_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(EventRepoError::NotFound(id))
    }

    /// Creates an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        family_id: FamilyId,
        created_by: UserId,
        fields: EventFields,
    ) -> Result<family_events::Model, DbErr> {
        let now = chrono::Utc::now().into();
        family_events::ActiveModel {
            id: Set(EventId::new().into_inner()),
            family_id: Set(family_id.into_inner()),
            title: Set(fields.title),
            date: Set(fields.date),
            time: Set(fields.time),
            description: Set(fields.description),
            created_by: Set(created_by.into_inner()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Replaces the editable fields of an event.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn update(
        &self,
        family_id: FamilyId,
        id: EventId,
        fields: EventFields,
    ) -> Result<family_events::Model, EventRepoError> {
        let mut active = self.find(family_id, id).await?.into_active_model();
        active.title = Set(fields.title);
        active.date = Set(fields.date);
        active.time = Set(fields.time);
        active.description = Set(fields.description);
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Deletes an event.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn delete(&self, family_id: FamilyId, id: EventId) -> Result<(), EventRepoError> {
        let result = family_events::Entity::delete_many()
            .filter(family_events::Column::Id.eq(id.into_inner()))
            .filter(family_events::Column::FamilyId.eq(family_id.into_inner()))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(EventRepoError::NotFound(id));
        }
        Ok(())
    }
}
