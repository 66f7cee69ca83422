//! Credit card routes.
//!
//! Cards are personal: members only see and edit their own.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use chrono::NaiveDate;
use hogar_core::card::{CardMovementKind, CardSummary, validate_limit, validate_movement};
use hogar_db::CardRepository;
use hogar_db::entities::{card_movements, credit_cards};
use hogar_db::repositories::{CardFields, NewCardMovement};
use hogar_shared::types::{CardId, UserId};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::common::{clean_text, required_text};
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::FamilyMember;

/// Creates the credit card routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/families/{family_id}/cards", get(list_cards).post(create_card))
        .route(
            "/families/{family_id}/cards/{card_id}",
            get(get_card).put(update_card).delete(delete_card),
        )
        .route(
            "/families/{family_id}/cards/{card_id}/movements",
            get(list_movements).post(add_movement),
        )
        .route(
            "/families/{family_id}/cards/{card_id}/movements/{movement_id}",
            delete(delete_movement),
        )
        .route("/families/{family_id}/cards/{card_id}/summary", get(get_summary))
}

/// Body for creating or replacing a card.
#[derive(Debug, Deserialize)]
pub struct CardRequest {
    /// Card name.
    pub name: String,
    /// Credit limit, zero or more.
    pub credit_limit: Decimal,
    /// Balance owed when the card was added.
    #[serde(default)]
    pub initial_balance: Decimal,
}

/// Body for recording a charge or payment.
#[derive(Debug, Deserialize)]
pub struct MovementRequest {
    /// `cargo` or `pago`.
    pub kind: String,
    /// Amount, positive.
    pub amount: Decimal,
    /// Day of the movement.
    pub date: NaiveDate,
    /// Free text.
    #[serde(default)]
    pub description: Option<String>,
}

fn card_fields(payload: CardRequest) -> ApiResult<CardFields> {
    validate_limit(payload.credit_limit)?;
    Ok(CardFields {
        name: required_text("name", &payload.name)?,
        credit_limit: payload.credit_limit,
        initial_balance: payload.initial_balance,
    })
}

/// Loads a card and checks the caller owns it.
async fn owned_card(
    repo: &CardRepository,
    member: &FamilyMember,
    card_id: CardId,
) -> ApiResult<credit_cards::Model> {
    let card = repo.find(member.family_id, card_id).await?;
    member
        .actor
        .can_manage_personal(UserId::from_uuid(card.owner_id))?;
    Ok(card)
}

/// GET /families/{family_id}/cards - The caller's cards.
async fn list_cards(
    State(state): State<AppState>,
    member: FamilyMember,
) -> ApiResult<Json<Vec<credit_cards::Model>>> {
    let cards = CardRepository::new((*state.db).clone())
        .list_for_owner(member.family_id, member.user_id())
        .await?;
    Ok(Json(cards))
}

/// POST /families/{family_id}/cards
async fn create_card(
    State(state): State<AppState>,
    member: FamilyMember,
    Json(payload): Json<CardRequest>,
) -> ApiResult<(StatusCode, Json<credit_cards::Model>)> {
    let fields = card_fields(payload)?;
    let card = CardRepository::new((*state.db).clone())
        .create(member.family_id, member.user_id(), fields)
        .await?;

    info!(family_id = %member.family_id, card_id = %card.id, "Card created");
    Ok((StatusCode::CREATED, Json(card)))
}

/// GET /families/{family_id}/cards/{card_id}
async fn get_card(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, card_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<credit_cards::Model>> {
    let repo = CardRepository::new((*state.db).clone());
    Ok(Json(owned_card(&repo, &member, CardId::from_uuid(card_id)).await?))
}

/// PUT /families/{family_id}/cards/{card_id}
async fn update_card(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, card_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CardRequest>,
) -> ApiResult<Json<credit_cards::Model>> {
    let fields = card_fields(payload)?;
    let repo = CardRepository::new((*state.db).clone());
    let card_id = CardId::from_uuid(card_id);
    owned_card(&repo, &member, card_id).await?;
    Ok(Json(repo.update(member.family_id, card_id, fields).await?))
}

/// DELETE /families/{family_id}/cards/{card_id}
async fn delete_card(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, card_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let repo = CardRepository::new((*state.db).clone());
    let card_id = CardId::from_uuid(card_id);
    owned_card(&repo, &member, card_id).await?;
    repo.delete(member.family_id, card_id).await?;

    info!(family_id = %member.family_id, card_id = %card_id, "Card deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /families/{family_id}/cards/{card_id}/movements
async fn list_movements(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, card_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Vec<card_movements::Model>>> {
    let repo = CardRepository::new((*state.db).clone());
    let card_id = CardId::from_uuid(card_id);
    owned_card(&repo, &member, card_id).await?;
    Ok(Json(repo.list_movements(member.family_id, card_id).await?))
}

/// POST /families/{family_id}/cards/{card_id}/movements
async fn add_movement(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, card_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<MovementRequest>,
) -> ApiResult<(StatusCode, Json<card_movements::Model>)> {
    let kind: CardMovementKind = payload.kind.trim().parse()?;
    validate_movement(payload.amount)?;

    let repo = CardRepository::new((*state.db).clone());
    let card_id = CardId::from_uuid(card_id);
    owned_card(&repo, &member, card_id).await?;

    let movement = repo
        .add_movement(
            member.family_id,
            card_id,
            member.user_id(),
            NewCardMovement {
                kind,
                amount: payload.amount,
                date: payload.date,
                description: clean_text(payload.description),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

/// DELETE /families/{family_id}/cards/{card_id}/movements/{movement_id}
async fn delete_movement(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, card_id, movement_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let repo = CardRepository::new((*state.db).clone());
    let card_id = CardId::from_uuid(card_id);
    owned_card(&repo, &member, card_id).await?;
    repo.delete_movement(member.family_id, card_id, movement_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /families/{family_id}/cards/{card_id}/summary
async fn get_summary(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, card_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<CardSummary>> {
    let repo = CardRepository::new((*state.db).clone());
    let card_id = CardId::from_uuid(card_id);
    owned_card(&repo, &member, card_id).await?;
    Ok(Json(repo.summary(member.family_id, card_id).await?))
}
