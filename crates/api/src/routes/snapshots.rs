//! Monthly snapshot routes: close a month and read frozen summaries.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use hogar_core::month::MonthKey;
use hogar_core::snapshot::MonthlySummary;
use hogar_db::SnapshotRepository;
use hogar_db::entities::monthly_snapshots;
use hogar_db::repositories::SnapshotRepoError;
use hogar_db::repositories::snapshot::stored_summary;
use hogar_shared::AppError;
use hogar_shared::types::{PageRequest, PageResponse};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{FamilyMember, today};

/// Creates the snapshot routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/families/{family_id}/snapshots",
            get(list_snapshots).post(close_month),
        )
        .route("/families/{family_id}/snapshots/{month}", get(get_snapshot))
}

/// Body for closing a month.
#[derive(Debug, Deserialize)]
pub struct CloseMonthRequest {
    /// Month to close, `YYYY-MM`.
    pub month: String,
}

/// A closed month.
#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    /// Snapshot ID.
    pub id: Uuid,
    /// Month as `YYYY-MM`.
    pub month: String,
    /// Totals frozen at close time.
    pub summary: MonthlySummary,
    /// Member who closed it.
    pub closed_by: Uuid,
    /// When it was closed.
    pub closed_at: DateTime<FixedOffset>,
}

impl SnapshotResponse {
    fn from_model(snapshot: monthly_snapshots::Model) -> ApiResult<Self> {
        let summary = stored_summary(&snapshot).map_err(SnapshotRepoError::from)?;
        Ok(Self {
            id: snapshot.id,
            month: snapshot.month,
            summary,
            closed_by: snapshot.closed_by,
            closed_at: snapshot.closed_at,
        })
    }
}

fn parse_month(raw: &str) -> ApiResult<MonthKey> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError(AppError::Validation(format!("month must be YYYY-MM, got '{raw}'"))))
}

/// GET /families/{family_id}/snapshots?page=1&per_page=20 - Newest first.
async fn list_snapshots(
    State(state): State<AppState>,
    member: FamilyMember,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<SnapshotResponse>>> {
    let (snapshots, total) = SnapshotRepository::new((*state.db).clone())
        .list_page(member.family_id, &page)
        .await?;
    let data = snapshots
        .into_iter()
        .map(SnapshotResponse::from_model)
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(PageResponse::new(data, page.page, page.per_page, total)))
}

/// POST /families/{family_id}/snapshots - Close a month.
///
/// Closing a month twice is a conflict; a future month cannot be closed.
async fn close_month(
    State(state): State<AppState>,
    member: FamilyMember,
    Json(payload): Json<CloseMonthRequest>,
) -> ApiResult<(StatusCode, Json<SnapshotResponse>)> {
    let month = parse_month(&payload.month)?;
    let snapshot = SnapshotRepository::new((*state.db).clone())
        .close(member.family_id, month, MonthKey::of(today()), member.user_id())
        .await?;

    info!(family_id = %member.family_id, month = %month, "Month closed");
    Ok((StatusCode::CREATED, Json(SnapshotResponse::from_model(snapshot)?)))
}

/// GET /families/{family_id}/snapshots/{month}
async fn get_snapshot(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, month)): Path<(Uuid, String)>,
) -> ApiResult<Json<SnapshotResponse>> {
    let month = parse_month(&month)?;
    let snapshot = SnapshotRepository::new((*state.db).clone())
        .find(member.family_id, month)
        .await?
        .ok_or_else(|| AppError::not_found("snapshot", month))?;
    Ok(Json(SnapshotResponse::from_model(snapshot)?))
}
