//! Fixed expense routes: recurring bills, monthly payments and reminders.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use hogar_core::month::MonthKey;
use hogar_core::schedule::{PaidStatus, Reminder, ScheduleService};
use hogar_core::validation::{validate_amount, validate_category};
use hogar_db::FixedExpenseRepository;
use hogar_db::entities::{fixed_expense_payments, fixed_expenses};
use hogar_db::repositories::FixedExpenseFields;
use hogar_db::repositories::dashboard::REMINDER_WINDOW_DAYS;
use hogar_shared::AppError;
use hogar_shared::types::FixedExpenseId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::common::required_text;
use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{FamilyMember, MonthParam, today};

/// Creates the fixed expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/families/{family_id}/fixed-expenses",
            get(list_fixed_expenses).post(create_fixed_expense),
        )
        .route(
            "/families/{family_id}/fixed-expenses/reminders",
            get(list_reminders),
        )
        .route(
            "/families/{family_id}/fixed-expenses/{fixed_expense_id}",
            get(get_fixed_expense)
                .put(update_fixed_expense)
                .delete(delete_fixed_expense),
        )
        .route(
            "/families/{family_id}/fixed-expenses/{fixed_expense_id}/payments",
            post(record_payment),
        )
        .route(
            "/families/{family_id}/fixed-expenses/{fixed_expense_id}/payments/{month}",
            delete(delete_payment),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body for creating or replacing a fixed expense.
#[derive(Debug, Deserialize)]
pub struct FixedExpenseRequest {
    /// Bill name.
    pub name: String,
    /// Expected monthly amount.
    pub amount: Decimal,
    /// Category.
    pub category: String,
    /// Day of month it is due, 1..=31.
    pub due_day: u32,
    /// Due every month.
    #[serde(default = "default_true")]
    pub recurring: bool,
    /// Produces reminders.
    #[serde(default = "default_true")]
    pub active: bool,
}

const fn default_true() -> bool {
    true
}

/// A fixed expense with its status in the requested month.
#[derive(Debug, Serialize)]
pub struct FixedExpenseResponse {
    /// The bill.
    #[serde(flatten)]
    pub bill: fixed_expenses::Model,
    /// Month the status refers to.
    pub month: String,
    /// Paid, pending or overdue.
    pub status: PaidStatus,
}

/// Body for marking a bill paid.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    /// Month paid, `YYYY-MM`; defaults to the current month.
    #[serde(default)]
    pub month: Option<String>,
    /// Amount paid; defaults to the bill amount.
    #[serde(default)]
    pub amount: Option<Decimal>,
}

fn fixed_expense_fields(payload: FixedExpenseRequest) -> ApiResult<FixedExpenseFields> {
    validate_amount(payload.amount)?;
    ScheduleService::validate_due_day(payload.due_day)?;
    Ok(FixedExpenseFields {
        name: required_text("name", &payload.name)?,
        amount: payload.amount,
        category: validate_category(&payload.category)?,
        due_day: payload.due_day,
        recurring: payload.recurring,
        active: payload.active,
    })
}

fn parse_month(raw: &str) -> ApiResult<MonthKey> {
    raw.parse()
        .map_err(|_| ApiError(AppError::Validation(format!("month must be YYYY-MM, got '{raw}'"))))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /families/{family_id}/fixed-expenses?month=YYYY-MM
async fn list_fixed_expenses(
    State(state): State<AppState>,
    member: FamilyMember,
    MonthParam(month): MonthParam,
) -> ApiResult<Json<Vec<FixedExpenseResponse>>> {
    let repo = FixedExpenseRepository::new((*state.db).clone());
    let (bills, lines) =
        tokio::try_join!(repo.list(member.family_id), repo.lines(member.family_id))?;

    let today = today();
    let mut statuses: HashMap<FixedExpenseId, PaidStatus> = lines
        .iter()
        .map(|line| (line.id, ScheduleService::paid_status(line, month, today)))
        .collect();

    Ok(Json(
        bills
            .into_iter()
            .map(|bill| FixedExpenseResponse {
                status: statuses
                    .remove(&FixedExpenseId::from_uuid(bill.id))
                    .unwrap_or(PaidStatus::Pending),
                month: month.to_string(),
                bill,
            })
            .collect(),
    ))
}

/// POST /families/{family_id}/fixed-expenses
async fn create_fixed_expense(
    State(state): State<AppState>,
    member: FamilyMember,
    Json(payload): Json<FixedExpenseRequest>,
) -> ApiResult<(StatusCode, Json<fixed_expenses::Model>)> {
    let fields = fixed_expense_fields(payload)?;
    let bill = FixedExpenseRepository::new((*state.db).clone())
        .create(member.family_id, member.user_id(), fields)
        .await?;

    info!(family_id = %member.family_id, fixed_expense_id = %bill.id, "Fixed expense created");
    Ok((StatusCode::CREATED, Json(bill)))
}

/// GET /families/{family_id}/fixed-expenses/{fixed_expense_id}
async fn get_fixed_expense(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<fixed_expenses::Model>> {
    let bill = FixedExpenseRepository::new((*state.db).clone())
        .find(member.family_id, FixedExpenseId::from_uuid(id))
        .await?;
    Ok(Json(bill))
}

/// PUT /families/{family_id}/fixed-expenses/{fixed_expense_id}
async fn update_fixed_expense(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<FixedExpenseRequest>,
) -> ApiResult<Json<fixed_expenses::Model>> {
    let fields = fixed_expense_fields(payload)?;
    let bill = FixedExpenseRepository::new((*state.db).clone())
        .update(member.family_id, FixedExpenseId::from_uuid(id), fields)
        .await?;
    Ok(Json(bill))
}

/// DELETE /families/{family_id}/fixed-expenses/{fixed_expense_id}
async fn delete_fixed_expense(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let id = FixedExpenseId::from_uuid(id);
    FixedExpenseRepository::new((*state.db).clone())
        .delete(member.family_id, id)
        .await?;

    info!(family_id = %member.family_id, fixed_expense_id = %id, "Fixed expense deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /families/{family_id}/fixed-expenses/{fixed_expense_id}/payments
async fn record_payment(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<PaymentRequest>,
) -> ApiResult<(StatusCode, Json<fixed_expense_payments::Model>)> {
    let month = match payload.month.as_deref() {
        Some(raw) => parse_month(raw)?,
        None => MonthKey::of(today()),
    };
    if let Some(amount) = payload.amount {
        validate_amount(amount)?;
    }

    let payment = FixedExpenseRepository::new((*state.db).clone())
        .record_payment(
            member.family_id,
            FixedExpenseId::from_uuid(id),
            month,
            payload.amount,
            member.user_id(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// DELETE /families/{family_id}/fixed-expenses/{fixed_expense_id}/payments/{month}
async fn delete_payment(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, id, month)): Path<(Uuid, Uuid, String)>,
) -> ApiResult<StatusCode> {
    FixedExpenseRepository::new((*state.db).clone())
        .delete_payment(member.family_id, FixedExpenseId::from_uuid(id), parse_month(&month)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /families/{family_id}/fixed-expenses/reminders
///
/// Unpaid active bills due within the next week, soonest first.
async fn list_reminders(
    State(state): State<AppState>,
    member: FamilyMember,
) -> ApiResult<Json<Vec<Reminder>>> {
    let reminders = FixedExpenseRepository::new((*state.db).clone())
        .reminders(member.family_id, today(), REMINDER_WINDOW_DAYS)
        .await?;
    Ok(Json(reminders))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(due_day: u32) -> FixedExpenseRequest {
        FixedExpenseRequest {
            name: "  Internet ".into(),
            amount: Decimal::new(59900, 2),
            category: "Servicios".into(),
            due_day,
            recurring: true,
            active: true,
        }
    }

    #[test]
    fn test_fields_trim_name() {
        let fields = fixed_expense_fields(request(15)).unwrap();
        assert_eq!(fields.name, "Internet");
        assert_eq!(fields.due_day, 15);
    }

    #[test]
    fn test_fields_reject_due_day_out_of_range() {
        assert!(fixed_expense_fields(request(0)).is_err());
        assert!(fixed_expense_fields(request(32)).is_err());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2026-02").unwrap(), MonthKey::new(2026, 2).unwrap());
        assert_eq!(parse_month("feb").unwrap_err().inner().status_code(), 400);
    }
}
