//! Receipt routes: presigned upload, confirmation, download and delete.
//!
//! The file itself never passes through the API. Clients `PUT` it to the
//! presigned URL and then confirm with the same file details.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use hogar_core::receipt::{
    ConfirmUploadInput, Receipt, ReceiptService, ReceiptTarget, RequestUploadInput,
    RequestUploadResult,
};
use hogar_core::storage::PresignedUrl;
use hogar_db::ReceiptRepository;
use hogar_shared::AppError;
use hogar_shared::types::ReceiptId;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::common::storage;
use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::FamilyMember;

/// Creates the receipt routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/families/{family_id}/receipts", get(list_receipts))
        .route("/families/{family_id}/receipts/upload", post(request_upload))
        .route(
            "/families/{family_id}/receipts/{receipt_id}",
            get(get_receipt).delete(delete_receipt),
        )
        .route(
            "/families/{family_id}/receipts/{receipt_id}/confirm",
            post(confirm_upload),
        )
        .route(
            "/families/{family_id}/receipts/{receipt_id}/download",
            get(download_url),
        )
}

/// File details sent when requesting and again when confirming an upload.
#[derive(Debug, Deserialize)]
pub struct UploadRequestBody {
    /// `expense` or `business_transaction`.
    pub target_kind: String,
    /// Id of the expense or transaction.
    pub target_id: Uuid,
    /// Client filename.
    pub filename: String,
    /// MIME type.
    pub content_type: String,
    /// Size in bytes.
    pub file_size: u64,
}

/// `?target_kind=&target_id=`
#[derive(Debug, Deserialize)]
pub struct TargetQuery {
    /// `expense` or `business_transaction`.
    pub target_kind: String,
    /// Id of the target row.
    pub target_id: Uuid,
}

fn target(kind: &str, id: Uuid) -> ApiResult<ReceiptTarget> {
    ReceiptTarget::from_parts(kind, id).ok_or_else(|| {
        ApiError(AppError::Validation(format!(
            "target_kind must be expense or business_transaction, got '{kind}'"
        )))
    })
}

fn receipt_service(state: &AppState) -> ApiResult<ReceiptService<ReceiptRepository>> {
    Ok(ReceiptService::new(
        storage(state)?,
        Arc::new(ReceiptRepository::new((*state.db).clone())),
    ))
}

/// POST /families/{family_id}/receipts/upload - Reserve an id and get a
/// presigned upload URL.
async fn request_upload(
    State(state): State<AppState>,
    member: FamilyMember,
    Json(payload): Json<UploadRequestBody>,
) -> ApiResult<Json<RequestUploadResult>> {
    let target = target(&payload.target_kind, payload.target_id)?;
    let result = receipt_service(&state)?
        .request_upload(RequestUploadInput {
            family_id: member.family_id,
            owner_id: member.user_id(),
            target,
            filename: payload.filename,
            content_type: payload.content_type,
            file_size: payload.file_size,
        })
        .await?;
    Ok(Json(result))
}

/// POST /families/{family_id}/receipts/{receipt_id}/confirm
///
/// Checks the uploaded object exists with the declared size, then records
/// the receipt.
async fn confirm_upload(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, receipt_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UploadRequestBody>,
) -> ApiResult<(StatusCode, Json<Receipt>)> {
    let target = target(&payload.target_kind, payload.target_id)?;
    let receipt = receipt_service(&state)?
        .confirm_upload(ConfirmUploadInput {
            receipt_id: ReceiptId::from_uuid(receipt_id),
            family_id: member.family_id,
            owner_id: member.user_id(),
            target,
            filename: payload.filename,
            content_type: payload.content_type,
            file_size: payload.file_size,
        })
        .await?;

    info!(
        family_id = %member.family_id,
        receipt_id = %receipt.id,
        target = %target,
        "Receipt uploaded"
    );
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// GET /families/{family_id}/receipts?target_kind=expense&target_id=...
async fn list_receipts(
    State(state): State<AppState>,
    member: FamilyMember,
    Query(query): Query<TargetQuery>,
) -> ApiResult<Json<Vec<Receipt>>> {
    let target = target(&query.target_kind, query.target_id)?;
    let receipts = receipt_service(&state)?
        .list_for(target, member.family_id)
        .await?;
    Ok(Json(receipts))
}

/// GET /families/{family_id}/receipts/{receipt_id}
async fn get_receipt(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, receipt_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Receipt>> {
    let receipt = receipt_service(&state)?
        .get(ReceiptId::from_uuid(receipt_id), member.family_id)
        .await?;
    Ok(Json(receipt))
}

/// GET /families/{family_id}/receipts/{receipt_id}/download - Presigned
/// download URL, valid for an hour.
async fn download_url(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, receipt_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<PresignedUrl>> {
    let url = receipt_service(&state)?
        .download_url(ReceiptId::from_uuid(receipt_id), member.family_id)
        .await?;
    Ok(Json(url))
}

/// DELETE /families/{family_id}/receipts/{receipt_id}
async fn delete_receipt(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, receipt_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let receipt_id = ReceiptId::from_uuid(receipt_id);
    receipt_service(&state)?
        .delete(receipt_id, member.family_id)
        .await?;

    info!(family_id = %member.family_id, receipt_id = %receipt_id, "Receipt deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_parses_known_kinds() {
        let id = Uuid::now_v7();
        assert_eq!(target("expense", id).unwrap().kind(), "expense");
        assert_eq!(
            target("business_transaction", id).unwrap().id(),
            id
        );
    }

    #[test]
    fn test_target_rejects_other_rows() {
        let err = target("income", Uuid::nil()).unwrap_err();
        assert_eq!(err.inner().status_code(), 400);
    }
}
