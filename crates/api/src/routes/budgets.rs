//! Category budget routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use hogar_core::budget::{BudgetReport, BudgetService};
use hogar_db::BudgetRepository;
use hogar_db::entities::category_budgets;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{FamilyMember, MonthParam};

/// Creates the budget routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/families/{family_id}/budgets", get(list_budgets))
        .route("/families/{family_id}/budgets/usage", get(get_usage))
        .route(
            "/families/{family_id}/budgets/{category}",
            put(set_budget).delete(delete_budget),
        )
}

/// Body for setting a category's monthly amount.
#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    /// Monthly amount, zero or more.
    pub amount: Decimal,
}

/// GET /families/{family_id}/budgets
async fn list_budgets(
    State(state): State<AppState>,
    member: FamilyMember,
) -> ApiResult<Json<Vec<category_budgets::Model>>> {
    let budgets = BudgetRepository::new((*state.db).clone())
        .list(member.family_id)
        .await?;
    Ok(Json(budgets))
}

/// PUT /families/{family_id}/budgets/{category} - Create or replace.
async fn set_budget(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, category)): Path<(Uuid, String)>,
    Json(payload): Json<BudgetRequest>,
) -> ApiResult<Json<category_budgets::Model>> {
    let category = BudgetService::validate(&category, payload.amount)?;
    let budget = BudgetRepository::new((*state.db).clone())
        .upsert(member.family_id, &category, payload.amount)
        .await?;

    info!(
        family_id = %member.family_id,
        category = %budget.category,
        amount = %budget.amount,
        "Budget set"
    );
    Ok(Json(budget))
}

/// DELETE /families/{family_id}/budgets/{category}
async fn delete_budget(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, category)): Path<(Uuid, String)>,
) -> ApiResult<StatusCode> {
    BudgetRepository::new((*state.db).clone())
        .delete(member.family_id, category.trim())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /families/{family_id}/budgets/usage?month=YYYY-MM
async fn get_usage(
    State(state): State<AppState>,
    member: FamilyMember,
    MonthParam(month): MonthParam,
) -> ApiResult<Json<BudgetReport>> {
    let report = BudgetRepository::new((*state.db).clone())
        .usage(member.family_id, month)
        .await?;
    Ok(Json(report))
}
