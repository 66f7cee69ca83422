//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod balances;
pub mod budgets;
pub mod business;
pub mod cards;
mod common;
pub mod dashboard;
pub mod events;
pub mod expenses;
pub mod families;
pub mod fixed_expenses;
pub mod health;
pub mod incomes;
pub mod receipts;
pub mod savings;
pub mod settlements;
pub mod shopping;
pub mod snapshots;

/// Routes that need no token.
pub fn public_routes() -> Router<AppState> {
    Router::new().merge(health::routes()).merge(auth::routes())
}

/// Routes that require an access token. Family routes additionally check
/// membership through the `FamilyMember` extractor.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::protected_routes())
        .merge(families::routes())
        .merge(expenses::routes())
        .merge(incomes::routes())
        .merge(settlements::routes())
        .merge(balances::routes())
        .merge(budgets::routes())
        .merge(fixed_expenses::routes())
        .merge(cards::routes())
        .merge(savings::routes())
        .merge(business::routes())
        .merge(shopping::routes())
        .merge(events::routes())
        .merge(receipts::routes())
        .merge(snapshots::routes())
        .merge(dashboard::routes())
}

/// Creates the API router with the auth middleware bound to `state`.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected = protected_routes().layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ));

    Router::new().merge(public_routes()).merge(protected)
}
