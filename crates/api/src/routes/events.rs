//! Family calendar routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::{NaiveDate, NaiveTime};
use hogar_core::dashboard::EventBrief;
use hogar_db::EventRepository;
use hogar_db::entities::family_events;
use hogar_db::repositories::EventFields;
use hogar_shared::types::EventId;
use serde::Deserialize;
use uuid::Uuid;

use super::common::{clean_text, required_text};
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{FamilyMember, MonthParam, today};

/// Creates the event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/families/{family_id}/events",
            get(list_events).post(create_event),
        )
        .route("/families/{family_id}/events/upcoming", get(upcoming_events))
        .route(
            "/families/{family_id}/events/{event_id}",
            get(get_event).put(update_event).delete(delete_event),
        )
}

/// Body for creating or replacing an event.
#[derive(Debug, Deserialize)]
pub struct EventRequest {
    /// What is happening.
    pub title: String,
    /// Day of the event.
    pub date: NaiveDate,
    /// Optional time of day.
    #[serde(default)]
    pub time: Option<NaiveTime>,
    /// Free text.
    #[serde(default)]
    pub description: Option<String>,
}

fn event_fields(payload: EventRequest) -> ApiResult<EventFields> {
    Ok(EventFields {
        title: required_text("title", &payload.title)?,
        date: payload.date,
        time: payload.time,
        description: clean_text(payload.description),
    })
}

/// GET /families/{family_id}/events?month=YYYY-MM
async fn list_events(
    State(state): State<AppState>,
    member: FamilyMember,
    MonthParam(month): MonthParam,
) -> ApiResult<Json<Vec<family_events::Model>>> {
    let events = EventRepository::new((*state.db).clone())
        .list_by_month(member.family_id, month)
        .await?;
    Ok(Json(events))
}

/// GET /families/{family_id}/events/upcoming
async fn upcoming_events(
    State(state): State<AppState>,
    member: FamilyMember,
) -> ApiResult<Json<Vec<EventBrief>>> {
    let events = EventRepository::new((*state.db).clone())
        .upcoming(member.family_id, today())
        .await?;
    Ok(Json(events))
}

/// POST /families/{family_id}/events
async fn create_event(
    State(state): State<AppState>,
    member: FamilyMember,
    Json(payload): Json<EventRequest>,
) -> ApiResult<(StatusCode, Json<family_events::Model>)> {
    let fields = event_fields(payload)?;
    let event = EventRepository::new((*state.db).clone())
        .create(member.family_id, member.user_id(), fields)
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /families/{family_id}/events/{event_id}
async fn get_event(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, event_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<family_events::Model>> {
    let event = EventRepository::new((*state.db).clone())
        .find(member.family_id, EventId::from_uuid(event_id))
        .await?;
    Ok(Json(event))
}

/// PUT /families/{family_id}/events/{event_id}
async fn update_event(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, event_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<EventRequest>,
) -> ApiResult<Json<family_events::Model>> {
    let fields = event_fields(payload)?;
    let event = EventRepository::new((*state.db).clone())
        .update(member.family_id, EventId::from_uuid(event_id), fields)
        .await?;
    Ok(Json(event))
}

/// DELETE /families/{family_id}/events/{event_id}
async fn delete_event(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, event_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    EventRepository::new((*state.db).clone())
        .delete(member.family_id, EventId::from_uuid(event_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
