//! Savings account routes. Accounts are personal to their owner.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use chrono::NaiveDate;
use hogar_core::savings::{SavingsMovementKind, SavingsSummary, validate_goal};
use hogar_db::SavingsRepository;
use hogar_db::entities::{savings_accounts, savings_movements};
use hogar_db::repositories::{NewSavingsMovement, SavingsAccountFields};
use hogar_shared::types::{SavingsAccountId, UserId};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::common::{clean_text, required_text};
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::FamilyMember;

/// Creates the savings routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/families/{family_id}/savings",
            get(list_accounts).post(create_account),
        )
        .route(
            "/families/{family_id}/savings/{account_id}",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route(
            "/families/{family_id}/savings/{account_id}/movements",
            get(list_movements).post(add_movement),
        )
        .route(
            "/families/{family_id}/savings/{account_id}/movements/{movement_id}",
            delete(delete_movement),
        )
        .route(
            "/families/{family_id}/savings/{account_id}/summary",
            get(get_summary),
        )
}

/// Body for opening or editing an account.
#[derive(Debug, Deserialize)]
pub struct AccountRequest {
    /// Account name.
    pub name: String,
    /// Target balance.
    #[serde(default)]
    pub goal: Option<Decimal>,
}

/// Body for a deposit or withdrawal.
#[derive(Debug, Deserialize)]
pub struct SavingsMovementRequest {
    /// `deposit` or `withdrawal`.
    pub kind: String,
    /// Amount, positive.
    pub amount: Decimal,
    /// Day of the movement.
    pub date: NaiveDate,
    /// Free text.
    #[serde(default)]
    pub note: Option<String>,
}

fn account_fields(payload: AccountRequest) -> ApiResult<SavingsAccountFields> {
    validate_goal(payload.goal)?;
    Ok(SavingsAccountFields {
        name: required_text("name", &payload.name)?,
        goal: payload.goal,
    })
}

async fn owned_account(
    repo: &SavingsRepository,
    member: &FamilyMember,
    account_id: SavingsAccountId,
) -> ApiResult<savings_accounts::Model> {
    let account = repo.find(member.family_id, account_id).await?;
    member
        .actor
        .can_manage_personal(UserId::from_uuid(account.owner_id))?;
    Ok(account)
}

/// GET /families/{family_id}/savings - The caller's accounts.
async fn list_accounts(
    State(state): State<AppState>,
    member: FamilyMember,
) -> ApiResult<Json<Vec<savings_accounts::Model>>> {
    let accounts = SavingsRepository::new((*state.db).clone())
        .list_for_owner(member.family_id, member.user_id())
        .await?;
    Ok(Json(accounts))
}

/// POST /families/{family_id}/savings
async fn create_account(
    State(state): State<AppState>,
    member: FamilyMember,
    Json(payload): Json<AccountRequest>,
) -> ApiResult<(StatusCode, Json<savings_accounts::Model>)> {
    let fields = account_fields(payload)?;
    let account = SavingsRepository::new((*state.db).clone())
        .create(member.family_id, member.user_id(), fields)
        .await?;

    info!(family_id = %member.family_id, account_id = %account.id, "Savings account opened");
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /families/{family_id}/savings/{account_id}
async fn get_account(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, account_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<savings_accounts::Model>> {
    let repo = SavingsRepository::new((*state.db).clone());
    Ok(Json(
        owned_account(&repo, &member, SavingsAccountId::from_uuid(account_id)).await?,
    ))
}

/// PUT /families/{family_id}/savings/{account_id}
async fn update_account(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, account_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AccountRequest>,
) -> ApiResult<Json<savings_accounts::Model>> {
    let fields = account_fields(payload)?;
    let repo = SavingsRepository::new((*state.db).clone());
    let account_id = SavingsAccountId::from_uuid(account_id);
    owned_account(&repo, &member, account_id).await?;
    Ok(Json(repo.update(member.family_id, account_id, fields).await?))
}

/// DELETE /families/{family_id}/savings/{account_id}
async fn delete_account(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, account_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let repo = SavingsRepository::new((*state.db).clone());
    let account_id = SavingsAccountId::from_uuid(account_id);
    owned_account(&repo, &member, account_id).await?;
    repo.delete(member.family_id, account_id).await?;

    info!(family_id = %member.family_id, account_id = %account_id, "Savings account closed");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /families/{family_id}/savings/{account_id}/movements
async fn list_movements(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, account_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Vec<savings_movements::Model>>> {
    let repo = SavingsRepository::new((*state.db).clone());
    let account_id = SavingsAccountId::from_uuid(account_id);
    owned_account(&repo, &member, account_id).await?;
    Ok(Json(repo.list_movements(member.family_id, account_id).await?))
}

/// POST /families/{family_id}/savings/{account_id}/movements
///
/// A withdrawal larger than the balance is rejected with 422.
async fn add_movement(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, account_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SavingsMovementRequest>,
) -> ApiResult<(StatusCode, Json<savings_movements::Model>)> {
    let kind: SavingsMovementKind = payload.kind.trim().parse()?;

    let repo = SavingsRepository::new((*state.db).clone());
    let account_id = SavingsAccountId::from_uuid(account_id);
    owned_account(&repo, &member, account_id).await?;

    let movement = repo
        .add_movement(
            member.family_id,
            account_id,
            NewSavingsMovement {
                kind,
                amount: payload.amount,
                date: payload.date,
                note: clean_text(payload.note),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

/// DELETE /families/{family_id}/savings/{account_id}/movements/{movement_id}
async fn delete_movement(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, account_id, movement_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let repo = SavingsRepository::new((*state.db).clone());
    let account_id = SavingsAccountId::from_uuid(account_id);
    owned_account(&repo, &member, account_id).await?;
    repo.delete_movement(member.family_id, account_id, movement_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /families/{family_id}/savings/{account_id}/summary
async fn get_summary(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, account_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<SavingsSummary>> {
    let repo = SavingsRepository::new((*state.db).clone());
    let account_id = SavingsAccountId::from_uuid(account_id);
    owned_account(&repo, &member, account_id).await?;
    Ok(Json(repo.summary(member.family_id, account_id).await?))
}
