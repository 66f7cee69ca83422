//! Family routes: create, join by invite code, members and invite codes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset};
use hogar_core::family::{FamilyRole, ensure_can_join, generate_invite_code, normalize_invite_code};
use hogar_db::entities::families;
use hogar_db::repositories::FamilyRepoError;
use hogar_db::{FamilyRepository, UserRepository};
use hogar_shared::AppError;
use hogar_shared::auth::{AuthResponse, CreateFamilyRequest, JoinFamilyRequest};
use hogar_shared::types::{Currency, FamilyId, UserId};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::auth::auth_response;
use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::FamilyMember;
use crate::middleware::AuthUser;

/// Invite code collisions are retried this many times.
const INVITE_CODE_ATTEMPTS: usize = 3;

/// Creates the family routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/families", post(create_family))
        .route("/families/join", post(join_family))
        .route("/families/{family_id}", get(get_family))
        .route("/families/{family_id}/members", get(list_members))
        .route("/families/{family_id}/invite-code", post(regenerate_invite_code))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// A family as shown to its members.
#[derive(Debug, Serialize)]
pub struct FamilyResponse {
    /// Family ID.
    pub id: Uuid,
    /// Name.
    pub name: String,
    /// Code other members join with.
    pub invite_code: String,
    /// Display currency.
    pub currency: String,
    /// Creation time.
    pub created_at: DateTime<FixedOffset>,
}

impl From<families::Model> for FamilyResponse {
    fn from(family: families::Model) -> Self {
        Self {
            id: family.id,
            name: family.name,
            invite_code: family.invite_code,
            currency: family.currency,
            created_at: family.created_at,
        }
    }
}

/// A family member.
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    /// User ID.
    pub user_id: Uuid,
    /// Display name.
    pub display_name: String,
    /// `owner` or `member`.
    pub role: FamilyRole,
    /// When they joined.
    pub joined_at: DateTime<FixedOffset>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /families - Create a family owned by the caller.
///
/// Returns fresh tokens carrying the new family.
async fn create_family(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateFamilyRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    payload.validate()?;
    let currency: Currency = payload
        .currency
        .parse()
        .map_err(|e: String| ApiError(AppError::Validation(e)))?;
    let name = payload.name.trim();

    let user_repo = UserRepository::new((*state.db).clone());
    ensure_can_join(
        user_repo
            .get_family(auth.user_id())
            .await?
            .map(|(family, _)| FamilyId::from_uuid(family.id)),
    )?;

    let family_repo = FamilyRepository::new((*state.db).clone());
    let mut attempt = 0;
    let family = loop {
        attempt += 1;
        let code = generate_invite_code(&mut rand::rng());
        match family_repo
            .create_with_owner(name, &currency.to_string(), auth.user_id(), &code)
            .await
        {
            Err(FamilyRepoError::InviteCodeTaken) if attempt < INVITE_CODE_ATTEMPTS => {}
            result => break result?,
        }
    };

    info!(family_id = %family.id, user_id = %auth.user_id(), "Family created");
    let response = login_into_family(&state, auth.user_id()).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /families/join - Join a family with its invite code.
async fn join_family(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<JoinFamilyRequest>,
) -> ApiResult<Json<AuthResponse>> {
    payload.validate()?;
    let code = normalize_invite_code(&payload.invite_code)?;

    let family = FamilyRepository::new((*state.db).clone())
        .join(&code, auth.user_id())
        .await?;

    info!(family_id = %family.id, user_id = %auth.user_id(), "User joined family");
    Ok(Json(login_into_family(&state, auth.user_id()).await?))
}

/// GET /families/{family_id}
async fn get_family(
    State(state): State<AppState>,
    member: FamilyMember,
) -> ApiResult<Json<FamilyResponse>> {
    let family = FamilyRepository::new((*state.db).clone())
        .find_by_id(member.family_id)
        .await?
        .ok_or_else(|| AppError::not_found("family", member.family_id))?;
    Ok(Json(family.into()))
}

/// GET /families/{family_id}/members - Members in joining order.
async fn list_members(
    State(state): State<AppState>,
    member: FamilyMember,
) -> ApiResult<Json<Vec<MemberResponse>>> {
    let members = FamilyRepository::new((*state.db).clone())
        .members(member.family_id)
        .await?;

    Ok(Json(
        members
            .into_iter()
            .map(|(user, membership)| MemberResponse {
                user_id: user.id,
                display_name: user.display_name,
                role: membership.role.into(),
                joined_at: membership.joined_at,
            })
            .collect(),
    ))
}

/// POST /families/{family_id}/invite-code - Replace the invite code.
///
/// Only the owner may do this; the old code stops working immediately.
async fn regenerate_invite_code(
    State(state): State<AppState>,
    member: FamilyMember,
) -> ApiResult<Json<FamilyResponse>> {
    member.actor.can_regenerate_invite()?;

    let family_repo = FamilyRepository::new((*state.db).clone());
    let mut attempt = 0;
    let family = loop {
        attempt += 1;
        let code = generate_invite_code(&mut rand::rng());
        match family_repo.set_invite_code(member.family_id, &code).await {
            Err(FamilyRepoError::InviteCodeTaken) if attempt < INVITE_CODE_ATTEMPTS => {}
            result => break result?,
        }
    };

    info!(family_id = %member.family_id, "Invite code regenerated");
    Ok(Json(family.into()))
}

/// Reloads the user with their new family and issues tokens for it.
async fn login_into_family(state: &AppState, user_id: UserId) -> ApiResult<AuthResponse> {
    let user_repo = UserRepository::new((*state.db).clone());
    let user = user_repo
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("user", user_id))?;
    let family = user_repo.get_family(user_id).await?;
    auth_response(state, &user, family.as_ref())
}
