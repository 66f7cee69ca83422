//! Authentication routes for register, login, token refresh and the
//! current user.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use hogar_core::auth::{check_strength, hash_password, normalize_email, verify_password};
use hogar_core::family::FamilyRole;
use hogar_db::UserRepository;
use hogar_db::entities::{families, family_members, users};
use hogar_shared::AppError;
use hogar_shared::auth::{
    AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, TokenKind, UserFamily, UserInfo,
};
use hogar_shared::types::UserId;
use tracing::info;
use validator::Validate;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/refresh", post(refresh))
}

/// Auth routes that need a valid access token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

type Membership = (families::Model, family_members::Model);

/// Builds the user info block of auth responses.
pub(crate) fn user_info(user: &users::Model, family: Option<&Membership>) -> UserInfo {
    UserInfo {
        id: user.id,
        email: user.email.clone(),
        display_name: user.display_name.clone(),
        family: family.map(|(family, membership)| UserFamily {
            id: family.id,
            name: family.name.clone(),
            role: FamilyRole::from(membership.role).to_string(),
        }),
    }
}

/// Issues a token pair for the user and wraps it with their info.
pub(crate) fn auth_response(
    state: &AppState,
    user: &users::Model,
    family: Option<&Membership>,
) -> ApiResult<AuthResponse> {
    let claims_family = family
        .map(|(family, membership)| (family.id, FamilyRole::from(membership.role).as_str()));
    let pair = state.jwt_service.issue_pair(user.id, claims_family)?;

    Ok(AuthResponse {
        user: user_info(user, family),
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        expires_in: pair.expires_in,
    })
}

/// POST /auth/register - Create an account and sign in.
///
/// The new user has no family yet; the tokens carry no family claim.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    payload.validate()?;
    check_strength(&payload.password)?;

    let email = normalize_email(&payload.email);
    let user_repo = UserRepository::new((*state.db).clone());
    if user_repo.email_exists(&email).await? {
        return Err(ApiError(AppError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = user_repo
        .create(&email, &password_hash, payload.display_name.trim())
        .await?;

    info!(user_id = %user.id, "New user registered");
    Ok((StatusCode::CREATED, Json(auth_response(&state, &user, None)?)))
}

/// POST /auth/login - Authenticate and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    payload.validate()?;

    let invalid = || ApiError(AppError::Unauthorized("Invalid email or password".into()));
    let user_repo = UserRepository::new((*state.db).clone());

    let Some(user) = user_repo.find_by_email(&normalize_email(&payload.email)).await? else {
        info!("Login attempt for unknown email");
        return Err(invalid());
    };
    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(invalid());
    }
    if !user.is_active {
        return Err(ApiError(AppError::Unauthorized(
            "This account has been disabled".into(),
        )));
    }

    let family = user_repo.get_family(UserId::from_uuid(user.id)).await?;

    info!(user_id = %user.id, "User logged in");
    Ok(Json(auth_response(&state, &user, family.as_ref())?))
}

/// POST /auth/refresh - Exchange a refresh token for a new pair.
///
/// The family claim is reloaded, so a user who joined a family since the
/// last login gets it in the new tokens.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let claims = state
        .jwt_service
        .validate_kind(&payload.refresh_token, TokenKind::Refresh)?;

    let user_repo = UserRepository::new((*state.db).clone());
    let user_id = UserId::from_uuid(claims.user_id());
    let user = user_repo
        .find_by_id(user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError(AppError::Unauthorized("Account no longer active".into())))?;
    let family = user_repo.get_family(user_id).await?;

    Ok(Json(auth_response(&state, &user, family.as_ref())?))
}

/// GET /auth/me - The current user and their family.
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserInfo>> {
    let user_repo = UserRepository::new((*state.db).clone());
    let user = user_repo
        .find_by_id(auth.user_id())
        .await?
        .ok_or_else(|| AppError::not_found("user", auth.user_id()))?;
    let family = user_repo.get_family(auth.user_id()).await?;

    Ok(Json(user_info(&user, family.as_ref())))
}
