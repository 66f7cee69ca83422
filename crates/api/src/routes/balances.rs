//! Balance route: who paid what and who owes whom for a month.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use hogar_core::balance::{BalanceService, BalanceSheet, Debt, SharePolicy};
use hogar_db::{BalanceRepository, FamilyRepository};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{FamilyMember, MonthParam};

/// Creates the balance routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/families/{family_id}/balances", get(get_balances))
}

#[derive(Debug, Deserialize)]
struct PolicyQuery {
    policy: Option<String>,
}

/// Balance sheet plus the settling transfer, if any.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Month as `YYYY-MM`.
    pub month: String,
    /// Per-member balances.
    #[serde(flatten)]
    pub sheet: BalanceSheet,
    /// Transfer that settles the most indebted member.
    pub debt: Option<Debt>,
    /// The same transfer as a sentence.
    pub summary: Option<String>,
}

/// GET /families/{family_id}/balances?month=YYYY-MM&policy=all_expenses|by_split_mode
async fn get_balances(
    State(state): State<AppState>,
    member: FamilyMember,
    MonthParam(month): MonthParam,
    Query(query): Query<PolicyQuery>,
) -> ApiResult<Json<BalanceResponse>> {
    let policy = query
        .policy
        .as_deref()
        .map(str::parse::<SharePolicy>)
        .transpose()?
        .unwrap_or_default();

    let (sheet, currency) = tokio::try_join!(
        async {
            ApiResult::Ok(
                BalanceRepository::new((*state.db).clone())
                    .sheet(member.family_id, month, policy)
                    .await?,
            )
        },
        async {
            ApiResult::Ok(
                FamilyRepository::new((*state.db).clone())
                    .currency(member.family_id)
                    .await?,
            )
        },
    )?;
    let debt = BalanceService::who_owes_whom(&sheet);

    Ok(Json(BalanceResponse {
        month: month.to_string(),
        summary: debt
            .as_ref()
            .map(|debt| BalanceService::owes_text(debt, currency)),
        debt,
        sheet,
    }))
}
