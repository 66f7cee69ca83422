//! Shared shopping list routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use hogar_db::ShoppingRepository;
use hogar_db::entities::shopping_items;
use hogar_shared::types::ShoppingItemId;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::common::{clean_text, required_text};
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::FamilyMember;

/// Creates the shopping list routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/families/{family_id}/shopping",
            get(list_items).post(add_item),
        )
        .route("/families/{family_id}/shopping/checked", delete(clear_checked))
        .route(
            "/families/{family_id}/shopping/{item_id}",
            delete(delete_item),
        )
        .route(
            "/families/{family_id}/shopping/{item_id}/toggle",
            post(toggle_item),
        )
}

/// Body for adding an item.
#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    /// What to buy.
    pub name: String,
    /// Free-form quantity such as "2 kg".
    #[serde(default)]
    pub quantity: Option<String>,
}

/// Result of clearing checked items.
#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    /// Items removed.
    pub removed: u64,
}

/// GET /families/{family_id}/shopping - Unchecked first, oldest first.
async fn list_items(
    State(state): State<AppState>,
    member: FamilyMember,
) -> ApiResult<Json<Vec<shopping_items::Model>>> {
    let items = ShoppingRepository::new((*state.db).clone())
        .list(member.family_id)
        .await?;
    Ok(Json(items))
}

/// POST /families/{family_id}/shopping
async fn add_item(
    State(state): State<AppState>,
    member: FamilyMember,
    Json(payload): Json<ItemRequest>,
) -> ApiResult<(StatusCode, Json<shopping_items::Model>)> {
    let name = required_text("name", &payload.name)?;
    let item = ShoppingRepository::new((*state.db).clone())
        .add(member.family_id, member.user_id(), &name, clean_text(payload.quantity))
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// POST /families/{family_id}/shopping/{item_id}/toggle
async fn toggle_item(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, item_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<shopping_items::Model>> {
    let item = ShoppingRepository::new((*state.db).clone())
        .toggle(member.family_id, ShoppingItemId::from_uuid(item_id))
        .await?;
    Ok(Json(item))
}

/// DELETE /families/{family_id}/shopping/{item_id}
async fn delete_item(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, item_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    ShoppingRepository::new((*state.db).clone())
        .delete(member.family_id, ShoppingItemId::from_uuid(item_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /families/{family_id}/shopping/checked
async fn clear_checked(
    State(state): State<AppState>,
    member: FamilyMember,
) -> ApiResult<Json<ClearedResponse>> {
    let removed = ShoppingRepository::new((*state.db).clone())
        .clear_checked(member.family_id)
        .await?;

    info!(family_id = %member.family_id, removed, "Checked shopping items cleared");
    Ok(Json(ClearedResponse { removed }))
}
