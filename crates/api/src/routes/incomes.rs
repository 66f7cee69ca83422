//! Income routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use hogar_core::validation::{validate_amount, validate_category, validate_split};
use hogar_db::IncomeRepository;
use hogar_db::entities::incomes;
use hogar_db::repositories::IncomeFields;
use hogar_db::repositories::income::income_split;
use hogar_shared::types::{IncomeId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::common::{clean_text, member_ids, split_mode};
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{FamilyMember, MonthParam};

/// Creates the income routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/families/{family_id}/incomes",
            get(list_incomes).post(create_income),
        )
        .route(
            "/families/{family_id}/incomes/{income_id}",
            get(get_income).put(update_income).delete(delete_income),
        )
}

/// Body for creating or replacing an income.
#[derive(Debug, Deserialize)]
pub struct IncomeRequest {
    /// Amount, positive with at most two decimals.
    pub amount: Decimal,
    /// Day received.
    pub date: NaiveDate,
    /// Where it came from (salary, freelance, ...).
    pub source: String,
    /// Free text.
    #[serde(default)]
    pub description: Option<String>,
    /// Member who received it; defaults to the caller.
    #[serde(default)]
    pub received_by: Option<Uuid>,
    /// `50/50` (default), `personal` or `para_otro`.
    #[serde(default)]
    pub split: Option<String>,
    /// Beneficiary for `para_otro`.
    #[serde(default)]
    pub for_member: Option<Uuid>,
}

/// An income.
#[derive(Debug, Serialize)]
pub struct IncomeResponse {
    /// Income ID.
    pub id: Uuid,
    /// Amount.
    pub amount: Decimal,
    /// Day received.
    pub date: NaiveDate,
    /// Source.
    pub source: String,
    /// Free text.
    pub description: Option<String>,
    /// Member who received it.
    pub received_by: Uuid,
    /// Split tag.
    pub split: &'static str,
    /// Beneficiary for `para_otro`.
    pub for_member: Option<Uuid>,
    /// Creation time.
    pub created_at: DateTime<FixedOffset>,
}

impl IncomeResponse {
    fn from_model(income: incomes::Model) -> ApiResult<Self> {
        let split = income_split(&income)?;
        Ok(Self {
            id: income.id,
            amount: income.amount,
            date: income.date,
            source: income.source,
            description: income.description,
            received_by: income.received_by,
            split: split.tag(),
            for_member: income.for_member,
            created_at: income.created_at,
        })
    }
}

async fn income_fields(
    state: &AppState,
    member: &FamilyMember,
    payload: IncomeRequest,
) -> ApiResult<IncomeFields> {
    validate_amount(payload.amount)?;
    let source = validate_category(&payload.source)?;
    let split = split_mode(payload.split.as_deref(), payload.for_member)?;
    let received_by = payload.received_by.map_or(member.user_id(), UserId::from_uuid);
    validate_split(split, received_by, &member_ids(state, member.family_id).await?)?;

    Ok(IncomeFields {
        amount: payload.amount,
        date: payload.date,
        source,
        description: clean_text(payload.description),
        received_by,
        split,
    })
}

/// GET /families/{family_id}/incomes?month=YYYY-MM
async fn list_incomes(
    State(state): State<AppState>,
    member: FamilyMember,
    MonthParam(month): MonthParam,
) -> ApiResult<Json<Vec<IncomeResponse>>> {
    let incomes = IncomeRepository::new((*state.db).clone())
        .list_by_month(member.family_id, month)
        .await?;
    Ok(Json(
        incomes
            .into_iter()
            .map(IncomeResponse::from_model)
            .collect::<ApiResult<_>>()?,
    ))
}

/// POST /families/{family_id}/incomes
async fn create_income(
    State(state): State<AppState>,
    member: FamilyMember,
    Json(payload): Json<IncomeRequest>,
) -> ApiResult<(StatusCode, Json<IncomeResponse>)> {
    let fields = income_fields(&state, &member, payload).await?;
    let income = IncomeRepository::new((*state.db).clone())
        .create(member.family_id, member.user_id(), fields)
        .await?;

    info!(family_id = %member.family_id, income_id = %income.id, "Income created");
    Ok((StatusCode::CREATED, Json(IncomeResponse::from_model(income)?)))
}

/// GET /families/{family_id}/incomes/{income_id}
async fn get_income(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, income_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<IncomeResponse>> {
    let income = IncomeRepository::new((*state.db).clone())
        .find(member.family_id, IncomeId::from_uuid(income_id))
        .await?;
    Ok(Json(IncomeResponse::from_model(income)?))
}

/// PUT /families/{family_id}/incomes/{income_id}
async fn update_income(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, income_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<IncomeRequest>,
) -> ApiResult<Json<IncomeResponse>> {
    let fields = income_fields(&state, &member, payload).await?;
    let income = IncomeRepository::new((*state.db).clone())
        .update(member.family_id, IncomeId::from_uuid(income_id), fields)
        .await?;
    Ok(Json(IncomeResponse::from_model(income)?))
}

/// DELETE /families/{family_id}/incomes/{income_id}
///
/// Only the member who received it may delete an income.
async fn delete_income(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, income_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let repo = IncomeRepository::new((*state.db).clone());
    let income_id = IncomeId::from_uuid(income_id);

    let income = repo.find(member.family_id, income_id).await?;
    member
        .actor
        .can_delete_income(UserId::from_uuid(income.received_by))?;
    repo.delete(member.family_id, income_id).await?;

    info!(family_id = %member.family_id, income_id = %income_id, "Income deleted");
    Ok(StatusCode::NO_CONTENT)
}
