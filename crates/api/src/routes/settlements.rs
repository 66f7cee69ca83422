//! Settlement routes: recorded paybacks between members.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::NaiveDate;
use hogar_core::validation::validate_settlement;
use hogar_db::SettlementRepository;
use hogar_db::entities::settlements;
use hogar_db::repositories::NewSettlement;
use hogar_shared::types::{SettlementId, UserId};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::common::{clean_text, member_ids};
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{FamilyMember, MonthParam};

/// Creates the settlement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/families/{family_id}/settlements",
            get(list_settlements).post(create_settlement),
        )
        .route(
            "/families/{family_id}/settlements/{settlement_id}",
            get(get_settlement).delete(delete_settlement),
        )
}

/// Body for recording a settlement.
#[derive(Debug, Deserialize)]
pub struct SettlementRequest {
    /// Member paying back; defaults to the caller.
    #[serde(default)]
    pub from_user: Option<Uuid>,
    /// Member being paid.
    pub to_user: Uuid,
    /// Amount.
    pub amount: Decimal,
    /// Day paid.
    pub date: NaiveDate,
    /// Optional note.
    #[serde(default)]
    pub note: Option<String>,
}

/// GET /families/{family_id}/settlements?month=YYYY-MM
async fn list_settlements(
    State(state): State<AppState>,
    member: FamilyMember,
    MonthParam(month): MonthParam,
) -> ApiResult<Json<Vec<settlements::Model>>> {
    let settlements = SettlementRepository::new((*state.db).clone())
        .list_by_month(member.family_id, month)
        .await?;
    Ok(Json(settlements))
}

/// POST /families/{family_id}/settlements
async fn create_settlement(
    State(state): State<AppState>,
    member: FamilyMember,
    Json(payload): Json<SettlementRequest>,
) -> ApiResult<(StatusCode, Json<settlements::Model>)> {
    let from_user = payload.from_user.map_or(member.user_id(), UserId::from_uuid);
    let to_user = UserId::from_uuid(payload.to_user);
    validate_settlement(
        from_user,
        to_user,
        payload.amount,
        &member_ids(&state, member.family_id).await?,
    )?;

    let settlement = SettlementRepository::new((*state.db).clone())
        .create(
            member.family_id,
            member.user_id(),
            NewSettlement {
                from_user,
                to_user,
                amount: payload.amount,
                date: payload.date,
                note: clean_text(payload.note),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(settlement)))
}

/// GET /families/{family_id}/settlements/{settlement_id}
async fn get_settlement(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, settlement_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<settlements::Model>> {
    let settlement = SettlementRepository::new((*state.db).clone())
        .find(member.family_id, SettlementId::from_uuid(settlement_id))
        .await?;
    Ok(Json(settlement))
}

/// DELETE /families/{family_id}/settlements/{settlement_id}
///
/// Only the member who recorded it may delete a settlement.
async fn delete_settlement(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, settlement_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let repo = SettlementRepository::new((*state.db).clone());
    let settlement_id = SettlementId::from_uuid(settlement_id);

    let settlement = repo.find(member.family_id, settlement_id).await?;
    member
        .actor
        .can_delete_settlement(UserId::from_uuid(settlement.created_by))?;
    repo.delete(member.family_id, settlement_id).await?;

    info!(family_id = %member.family_id, settlement_id = %settlement_id, "Settlement deleted");
    Ok(StatusCode::NO_CONTENT)
}
