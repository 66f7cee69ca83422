//! Household dashboard route.

use axum::{Json, Router, extract::State, routing::get};
use hogar_core::dashboard::HouseholdDashboard;
use hogar_db::DashboardRepository;

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{FamilyMember, MonthParam, today};

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/families/{family_id}/dashboard", get(get_dashboard))
}

/// GET /families/{family_id}/dashboard?month=YYYY-MM
///
/// Month totals, balances, budget usage, bills due this week, upcoming
/// events and the caller's own cards and savings.
async fn get_dashboard(
    State(state): State<AppState>,
    member: FamilyMember,
    MonthParam(month): MonthParam,
) -> ApiResult<Json<HouseholdDashboard>> {
    let dashboard = DashboardRepository::new((*state.db).clone())
        .load(member.family_id, member.user_id(), month, today())
        .await?;
    Ok(Json(dashboard))
}
