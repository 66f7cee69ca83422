//! Small-business routes: products, sales and purchases.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::NaiveDate;
use hogar_core::inventory::{BusinessSummary, BusinessTransactionKind, InventoryError};
use hogar_db::InventoryRepository;
use hogar_db::entities::{business_transactions, products};
use hogar_db::repositories::{NewBusinessTransaction, ProductFields};
use hogar_shared::types::{BusinessTransactionId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::common::{clean_text, remove_blobs, required_text};
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{FamilyMember, MonthParam};

/// Creates the business routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/families/{family_id}/business/products",
            get(list_products).post(create_product),
        )
        .route(
            "/families/{family_id}/business/products/{product_id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route(
            "/families/{family_id}/business/transactions",
            get(list_transactions).post(record_transaction),
        )
        .route(
            "/families/{family_id}/business/transactions/{transaction_id}",
            get(get_transaction).delete(delete_transaction),
        )
        .route("/families/{family_id}/business/summary", get(get_summary))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body for creating or replacing a product.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    /// Stock keeping unit, unique in the family.
    pub sku: String,
    /// Product name.
    pub name: String,
    /// Default sale price.
    pub unit_price: Decimal,
    /// Default purchase cost.
    pub unit_cost: Decimal,
    /// Units on hand when created; ignored on update.
    #[serde(default)]
    pub opening_stock: i32,
}

/// Body for a sale or purchase.
#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    /// Product sold or bought.
    pub product_id: Uuid,
    /// `sale` or `purchase`.
    pub kind: String,
    /// Units, at least one.
    pub quantity: i32,
    /// Price per unit; defaults to the product's price or cost.
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    /// Day of the transaction.
    pub date: NaiveDate,
    /// Free text.
    #[serde(default)]
    pub note: Option<String>,
}

/// A recorded transaction with the product's new stock.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// The ledger row.
    pub transaction: business_transactions::Model,
    /// The product after the stock change.
    pub product: products::Model,
}

/// Month results plus the value of stock on hand.
#[derive(Debug, Serialize)]
pub struct BusinessSummaryResponse {
    /// Month as `YYYY-MM`.
    pub month: String,
    /// Revenue, cost and profit.
    #[serde(flatten)]
    pub summary: BusinessSummary,
    /// Stock valued at unit cost.
    pub stock_value: Decimal,
}

fn product_fields(payload: &ProductRequest) -> ApiResult<ProductFields> {
    if payload.unit_price < Decimal::ZERO || payload.unit_cost < Decimal::ZERO {
        return Err(InventoryError::NegativePrice.into());
    }
    Ok(ProductFields {
        sku: required_text("sku", &payload.sku)?,
        name: required_text("name", &payload.name)?,
        unit_price: payload.unit_price,
        unit_cost: payload.unit_cost,
    })
}

// ============================================================================
// Products
// ============================================================================

/// GET /families/{family_id}/business/products
async fn list_products(
    State(state): State<AppState>,
    member: FamilyMember,
) -> ApiResult<Json<Vec<products::Model>>> {
    let products = InventoryRepository::new((*state.db).clone())
        .list_products(member.family_id)
        .await?;
    Ok(Json(products))
}

/// POST /families/{family_id}/business/products
async fn create_product(
    State(state): State<AppState>,
    member: FamilyMember,
    Json(payload): Json<ProductRequest>,
) -> ApiResult<(StatusCode, Json<products::Model>)> {
    let fields = product_fields(&payload)?;
    let product = InventoryRepository::new((*state.db).clone())
        .create_product(member.family_id, fields, payload.opening_stock)
        .await?;

    info!(
        family_id = %member.family_id,
        product_id = %product.id,
        sku = %product.sku,
        "Product created"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /families/{family_id}/business/products/{product_id}
async fn get_product(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, product_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<products::Model>> {
    let product = InventoryRepository::new((*state.db).clone())
        .find_product(member.family_id, ProductId::from_uuid(product_id))
        .await?;
    Ok(Json(product))
}

/// PUT /families/{family_id}/business/products/{product_id}
async fn update_product(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, product_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ProductRequest>,
) -> ApiResult<Json<products::Model>> {
    let fields = product_fields(&payload)?;
    let product = InventoryRepository::new((*state.db).clone())
        .update_product(member.family_id, ProductId::from_uuid(product_id), fields)
        .await?;
    Ok(Json(product))
}

/// DELETE /families/{family_id}/business/products/{product_id}
///
/// Products with transactions cannot be deleted.
async fn delete_product(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, product_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    InventoryRepository::new((*state.db).clone())
        .delete_product(member.family_id, ProductId::from_uuid(product_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Transactions
// ============================================================================

/// GET /families/{family_id}/business/transactions?month=YYYY-MM
async fn list_transactions(
    State(state): State<AppState>,
    member: FamilyMember,
    MonthParam(month): MonthParam,
) -> ApiResult<Json<Vec<business_transactions::Model>>> {
    let transactions = InventoryRepository::new((*state.db).clone())
        .list_transactions(member.family_id, month)
        .await?;
    Ok(Json(transactions))
}

/// POST /families/{family_id}/business/transactions
async fn record_transaction(
    State(state): State<AppState>,
    member: FamilyMember,
    Json(payload): Json<TransactionRequest>,
) -> ApiResult<(StatusCode, Json<TransactionResponse>)> {
    let kind: BusinessTransactionKind = payload.kind.trim().parse()?;
    let (transaction, product) = InventoryRepository::new((*state.db).clone())
        .record(
            member.family_id,
            member.user_id(),
            NewBusinessTransaction {
                product_id: ProductId::from_uuid(payload.product_id),
                kind,
                quantity: payload.quantity,
                unit_price: payload.unit_price,
                date: payload.date,
                note: clean_text(payload.note),
            },
        )
        .await?;

    info!(
        family_id = %member.family_id,
        transaction_id = %transaction.id,
        kind = kind.as_str(),
        stock = product.stock,
        "Business transaction recorded"
    );
    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse {
            transaction,
            product,
        }),
    ))
}

/// GET /families/{family_id}/business/transactions/{transaction_id}
async fn get_transaction(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, transaction_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<business_transactions::Model>> {
    let transaction = InventoryRepository::new((*state.db).clone())
        .find_transaction(member.family_id, BusinessTransactionId::from_uuid(transaction_id))
        .await?;
    Ok(Json(transaction))
}

/// DELETE /families/{family_id}/business/transactions/{transaction_id}
///
/// Reverts the stock change and removes attached receipts.
async fn delete_transaction(
    State(state): State<AppState>,
    member: FamilyMember,
    Path((_, transaction_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let removed = InventoryRepository::new((*state.db).clone())
        .delete_transaction(member.family_id, BusinessTransactionId::from_uuid(transaction_id))
        .await?;
    remove_blobs(&state, removed).await;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /families/{family_id}/business/summary?month=YYYY-MM
async fn get_summary(
    State(state): State<AppState>,
    member: FamilyMember,
    MonthParam(month): MonthParam,
) -> ApiResult<Json<BusinessSummaryResponse>> {
    let repo = InventoryRepository::new((*state.db).clone());
    let (summary, stock_value) = tokio::try_join!(
        repo.summary(member.family_id, month),
        repo.stock_value(member.family_id),
    )?;
    Ok(Json(BusinessSummaryResponse {
        month: month.to_string(),
        summary,
        stock_value,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(unit_price: Decimal, unit_cost: Decimal) -> ProductRequest {
        ProductRequest {
            sku: " TAM-01 ".into(),
            name: "Tamales".into(),
            unit_price,
            unit_cost,
            opening_stock: 10,
        }
    }

    #[test]
    fn test_product_fields_trim_sku() {
        let fields =
            product_fields(&product(Decimal::new(2500, 2), Decimal::new(1200, 2))).unwrap();
        assert_eq!(fields.sku, "TAM-01");
    }

    #[test]
    fn test_product_fields_reject_negative_prices() {
        let err = product_fields(&product(Decimal::new(-1, 0), Decimal::ONE)).unwrap_err();
        assert_eq!(err.inner().status_code(), 400);
        assert!(product_fields(&product(Decimal::ONE, Decimal::new(-1, 0))).is_err());
    }
}
