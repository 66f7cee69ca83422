//! Expense routes: monthly list, CRUD and notes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use hogar_core::validation::{validate_amount, validate_category, validate_split};
use hogar_db::ExpenseRepository;
use hogar_db::entities::{expense_notes, expenses};
use hogar_db::repositories::ExpenseFields;
use hogar_db::repositories::expense::split_of;
use hogar_shared::types::{ExpenseId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::common::{clean_text, member_ids, remove_blobs, required_text, split_mode};
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{FamilyMember, MonthParam};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/families/{family_id}/expenses",
            get(list_expenses).post(create_expense),
        )
        .route(
            "/families/{family_id}/expenses/{expense_id}",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
        .route(
            "/families/{family_id}/expenses/{expense_id}/notes",
            get(list_notes).post(add_note),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body for creating or replacing an expense.
#[derive(Debug, Deserialize)]
pub struct ExpenseRequest {
    /// Amount, positive with at most two decimals.
    pub amount: Decimal,
    /// Day spent.
    pub date: NaiveDate,
    /// Category name.
    pub category: String,
    /// Free text.
    #[serde(default)]
    pub description: Option<String>,
    /// Member who paid; defaults to the caller.
    #[serde(default)]
    pub paid_by: Option<Uuid>,
    /// `50/50` (default), `personal` or `para_otro`.
    #[serde(default)]
    pub split: Option<String>,
    /// Beneficiary for `para_otro`.
    #[serde(default)]
    pub for_member: Option<Uuid>,
}

/// An expense.
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    /// Expense ID.
    pub id: Uuid,
    /// Amount.
    pub amount: Decimal,
    /// Day spent.
    pub date: NaiveDate,
    /// Category.
    pub category: String,
    /// Free text.
    pub description: Option<String>,
    /// Member who paid.
    pub paid_by: Uuid,
    /// Split tag.
    pub split: &'static str,
    /// Beneficiary for `para_otro`.
    pub for_member: Option<Uuid>,
    /// Member who recorded it.
    pub created_by: Uuid,
    /// Creation time.
    pub created_at: DateTime<FixedOffset>,
}

impl ExpenseResponse {
    fn from_model(expense: expenses::Model) -> ApiResult<Self> {
        let split = split_of(&expense)?;
        Ok(Self {
            id: expense.id,
            amount: expense.amount,
            date: expense.date,
            category: expense.category,
            description: expense.description,
            paid_by: expense.paid_by,
            split: split.tag(),
            for_member: expense.for_member,
            created_by: expense.created_by,
            created_at: expense.created_at,
        })
    }
}

/// Body for adding a note.
#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    /// Note text.
    pub body: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /families/{family_id}/expenses?month=YYYY-MM
async fn list_expenses(
    State(state): State<AppState>,
    member: FamilyMember,
    MonthParam(month): MonthParam,
) -> ApiResult<Json<Vec<ExpenseResponse>>> {
    let expenses = ExpenseRepository::new((*state.db).clone())
        .list_by_month(member.family_id, month)
        .await?;
    let expenses = expenses
        .into_iter()
        .map(ExpenseResponse::from_model)
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(expenses))
}

/// Validates a request against the family's members.
async fn expense_fields(
    state: &AppState,
    member: &FamilyMember,
    payload: ExpenseRequest,
) -> ApiResult<ExpenseFields> {
    validate_amount(payload.amount)?;
    let category = validate_category(&payload.category)?;
    let split = split_mode(payload.split.as_deref(), payload.for_member)?;
    let paid_by = payload.paid_by.map_or(member.user_id(), UserId::from_uuid);
    validate_split(split, paid_by, &member_ids(state, member.family_id).await?)?;

    Ok(ExpenseFields {
        amount: payload.amount,
        date: payload.date,
        category,
        description: clean_text(payload.description),
        paid_by,
        split,
    })
}

/// POST /families/{family_id}/expenses
async fn create_expense(
    State(state): State<AppState>,
    member: FamilyMember,
    Json(payload): Json<ExpenseRequest>,
) -> ApiResult<(StatusCode, Json<ExpenseResponse>)> {
    let fields = expense_fields(&state, &member, payload).await?;
    let expense = ExpenseRepository::new((*state.db).clone())
        .create(member.family_id, member.user_id(), fields)
        .await?;

    info!(
        family_id = %member.family_id,
        expense_id = %expense.id,
        amount = %expense.amount,
        "Expense created"
    );
    Ok((StatusCode::CREATED, Json(ExpenseResponse::from_model(expense)?)))
}

/// GET /families/{family_id}/expenses/{expense_id}
async fn get_expense(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, expense_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<ExpenseResponse>> {
    let expense = ExpenseRepository::new((*state.db).clone())
        .find(member.family_id, ExpenseId::from_uuid(expense_id))
        .await?;
    Ok(Json(ExpenseResponse::from_model(expense)?))
}

/// PUT /families/{family_id}/expenses/{expense_id}
///
/// Any member may edit a shared expense.
async fn update_expense(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, expense_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ExpenseRequest>,
) -> ApiResult<Json<ExpenseResponse>> {
    let fields = expense_fields(&state, &member, payload).await?;
    let expense = ExpenseRepository::new((*state.db).clone())
        .update(member.family_id, ExpenseId::from_uuid(expense_id), fields)
        .await?;

    info!(family_id = %member.family_id, expense_id = %expense.id, "Expense updated");
    Ok(Json(ExpenseResponse::from_model(expense)?))
}

/// DELETE /families/{family_id}/expenses/{expense_id}
///
/// Only the payer may delete; attached receipts go with it.
async fn delete_expense(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, expense_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let repo = ExpenseRepository::new((*state.db).clone());
    let expense_id = ExpenseId::from_uuid(expense_id);

    let expense = repo.find(member.family_id, expense_id).await?;
    member
        .actor
        .can_delete_expense(UserId::from_uuid(expense.paid_by))?;

    let removed = repo.delete(member.family_id, expense_id).await?;
    remove_blobs(&state, removed).await;

    info!(family_id = %member.family_id, expense_id = %expense_id, "Expense deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /families/{family_id}/expenses/{expense_id}/notes
async fn list_notes(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, expense_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Vec<expense_notes::Model>>> {
    let notes = ExpenseRepository::new((*state.db).clone())
        .list_notes(member.family_id, ExpenseId::from_uuid(expense_id))
        .await?;
    Ok(Json(notes))
}

/// POST /families/{family_id}/expenses/{expense_id}/notes
async fn add_note(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, expense_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<NoteRequest>,
) -> ApiResult<(StatusCode, Json<expense_notes::Model>)> {
    let body = required_text("body", &payload.body)?;
    let note = ExpenseRepository::new((*state.db).clone())
        .add_note(
            member.family_id,
            ExpenseId::from_uuid(expense_id),
            member.user_id(),
            &body,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(note)))
}
