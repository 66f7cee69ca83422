//! Business inventory repository: products, sales and purchases.
//!
//! Recording or deleting a transaction updates the product's stock in the
//! same family-scoped transaction, with the product row locked.

use chrono::NaiveDate;
use hogar_core::inventory::{
    BusinessSummary, BusinessTransactionKind, BusinessTransactionLine, InventoryError,
    InventoryService,
};
use hogar_core::month::MonthKey;
use hogar_shared::types::{BusinessTransactionId, FamilyId, ProductId, UserId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};

use super::expense::RemovedReceiptKeys;
use crate::entities::{
    business_transactions, products, receipts, sea_orm_active_enums::ReceiptTargetKind,
};
use crate::rls::RlsConnection;

/// Error types for inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryRepoError {
    /// Product not found in the family.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Transaction not found in the family.
    #[error("Business transaction not found: {0}")]
    TransactionNotFound(BusinessTransactionId),

    /// SKU already used by another product of the family.
    #[error("SKU already exists: {0}")]
    DuplicateSku(String),

    /// Product still has recorded transactions.
    #[error("Product has recorded transactions and cannot be deleted")]
    ProductInUse,

    /// Stock arithmetic rejected the change.
    #[error(transparent)]
    Stock(#[from] InventoryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Editable fields of a product, already validated.
#[derive(Debug, Clone)]
pub struct ProductFields {
    /// Stock keeping unit, unique within the family.
    pub sku: String,
    /// Name.
    pub name: String,
    /// Default sale price.
    pub unit_price: Decimal,
    /// Default purchase cost.
    pub unit_cost: Decimal,
}

/// A sale or purchase to record.
#[derive(Debug, Clone)]
pub struct NewBusinessTransaction {
    /// Product sold or bought.
    pub product_id: ProductId,
    /// Sale or purchase.
    pub kind: BusinessTransactionKind,
    /// Units, greater than zero.
    pub quantity: i32,
    /// Price per unit; defaults to the product's price for a sale and its
    /// cost for a purchase.
    pub unit_price: Option<Decimal>,
    /// Date.
    pub date: NaiveDate,
    /// Optional note.
    pub note: Option<String>,
}

/// Inventory repository.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    db: DatabaseConnection,
}

impl InventoryRepository {
    /// Creates a new inventory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Products
    // ========================================================================

    /// Products of the family, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_products(&self, family_id: FamilyId) -> Result<Vec<products::Model>, DbErr> {
        products::Entity::find()
            .filter(products::Column::FamilyId.eq(family_id.into_inner()))
            .order_by_asc(products::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a product in the family.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if it does not exist in this family.
    pub async fn find_product(
        &self,
        family_id: FamilyId,
        id: ProductId,
    ) -> Result<products::Model, InventoryRepoError> {
        products::Entity::find_by_id(id.into_inner())
            .filter(products::Column::FamilyId.eq(family_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(InventoryRepoError::ProductNotFound(id))
    }

    /// Adds a product with an opening stock.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateSku` when the SKU is taken.
    pub async fn create_product(
        &self,
        family_id: FamilyId,
        fields: ProductFields,
        opening_stock: i32,
    ) -> Result<products::Model, InventoryRepoError> {
        let sku = fields.sku.clone();
        let now = chrono::Utc::now().into();
        products::ActiveModel {
            id: Set(ProductId::new().into_inner()),
            family_id: Set(family_id.into_inner()),
            sku: Set(fields.sku),
            name: Set(fields.name),
            unit_price: Set(fields.unit_price),
            unit_cost: Set(fields.unit_cost),
            stock: Set(opening_stock),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| sku_error(e, sku))
    }

    /// Replaces the editable fields of a product. Stock only changes
    /// through transactions.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` or `DuplicateSku`.
    pub async fn update_product(
        &self,
        family_id: FamilyId,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<products::Model, InventoryRepoError> {
        let sku = fields.sku.clone();
        let mut active = self.find_product(family_id, id).await?.into_active_model();
        active.sku = Set(fields.sku);
        active.name = Set(fields.name);
        active.unit_price = Set(fields.unit_price);
        active.unit_cost = Set(fields.unit_cost);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&self.db).await.map_err(|e| sku_error(e, sku))
    }

    /// Deletes a product without transactions.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound`, or `ProductInUse` when it has transactions.
    pub async fn delete_product(
        &self,
        family_id: FamilyId,
        id: ProductId,
    ) -> Result<(), InventoryRepoError> {
        let result = products::Entity::delete_many()
            .filter(products::Column::Id.eq(id.into_inner()))
            .filter(products::Column::FamilyId.eq(family_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => InventoryRepoError::ProductInUse,
                _ => InventoryRepoError::Database(e),
            })?;
        if result.rows_affected == 0 {
            return Err(InventoryRepoError::ProductNotFound(id));
        }
        Ok(())
    }

    /// Stock valued at unit cost.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn stock_value(&self, family_id: FamilyId) -> Result<Decimal, DbErr> {
        let products = self.list_products(family_id).await?;
        let stock: Vec<(i32, Decimal)> = products.iter().map(|p| (p.stock, p.unit_cost)).collect();
        Ok(InventoryService::stock_value(&stock))
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Records a sale or purchase and moves the product's stock.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound`, or `Stock` when the quantity or price is
    /// rejected.
    pub async fn record(
        &self,
        family_id: FamilyId,
        created_by: UserId,
        input: NewBusinessTransaction,
    ) -> Result<(business_transactions::Model, products::Model), InventoryRepoError> {
        let rls = RlsConnection::new(&self.db, family_id).await?;
        let txn = rls.transaction();

        let product = products::Entity::find_by_id(input.product_id.into_inner())
            .filter(products::Column::FamilyId.eq(family_id.into_inner()))
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(InventoryRepoError::ProductNotFound(input.product_id))?;

        let unit_price = input.unit_price.unwrap_or(match input.kind {
            BusinessTransactionKind::Sale => product.unit_price,
            BusinessTransactionKind::Purchase => product.unit_cost,
        });
        let change =
            InventoryService::apply(product.stock, input.kind, input.quantity, unit_price)?;

        let transaction = business_transactions::ActiveModel {
            id: Set(BusinessTransactionId::new().into_inner()),
            family_id: Set(family_id.into_inner()),
            product_id: Set(product.id),
            kind: Set(input.kind.into()),
            quantity: Set(input.quantity),
            unit_price: Set(unit_price),
            total: Set(change.total),
            date: Set(input.date),
            note: Set(input.note),
            created_by: Set(created_by.into_inner()),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(txn)
        .await?;

        let mut active = product.into_active_model();
        active.stock = Set(change.after);
        active.updated_at = Set(chrono::Utc::now().into());
        let product = active.update(txn).await?;

        rls.commit().await?;

        tracing::info!(
            family_id = %family_id,
            product_id = %product.id,
            kind = input.kind.as_str(),
            quantity = input.quantity,
            stock_before = change.before,
            stock_after = change.after,
            "business transaction recorded"
        );
        Ok((transaction, product))
    }

    /// Deletes a transaction, reverting its stock change and removing its
    /// receipt rows.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if it does not exist in this family.
    pub async fn delete_transaction(
        &self,
        family_id: FamilyId,
        id: BusinessTransactionId,
    ) -> Result<RemovedReceiptKeys, InventoryRepoError> {
        let rls = RlsConnection::new(&self.db, family_id).await?;
        let txn = rls.transaction();

        let transaction = business_transactions::Entity::find_by_id(id.into_inner())
            .filter(business_transactions::Column::FamilyId.eq(family_id.into_inner()))
            .one(txn)
            .await?
            .ok_or(InventoryRepoError::TransactionNotFound(id))?;

        let product = products::Entity::find_by_id(transaction.product_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(InventoryRepoError::ProductNotFound(ProductId::from_uuid(
                transaction.product_id,
            )))?;

        let stock = InventoryService::revert(
            product.stock,
            transaction.kind.into(),
            transaction.quantity,
        )?;
        let mut active = product.into_active_model();
        active.stock = Set(stock);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(txn).await?;

        business_transactions::Entity::delete_by_id(transaction.id).exec(txn).await?;

        let receipt_filter = receipts::Column::FamilyId
            .eq(family_id.into_inner())
            .and(receipts::Column::TargetKind.eq(ReceiptTargetKind::BusinessTransaction))
            .and(receipts::Column::TargetId.eq(transaction.id));
        let removed = receipts::Entity::find().filter(receipt_filter.clone()).all(txn).await?;
        receipts::Entity::delete_many().filter(receipt_filter).exec(txn).await?;

        rls.commit().await?;

        tracing::info!(
            family_id = %family_id,
            transaction_id = %id,
            stock_after = stock,
            "business transaction deleted"
        );
        Ok(removed.into_iter().map(|r| r.storage_key).collect())
    }

    /// Finds a transaction in the family.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if it does not exist in this family.
    pub async fn find_transaction(
        &self,
        family_id: FamilyId,
        id: BusinessTransactionId,
    ) -> Result<business_transactions::Model, InventoryRepoError> {
        business_transactions::Entity::find_by_id(id.into_inner())
            .filter(business_transactions::Column::FamilyId.eq(family_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(InventoryRepoError::TransactionNotFound(id))
    }

    /// Transactions dated within `month`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transactions(
        &self,
        family_id: FamilyId,
        month: MonthKey,
    ) -> Result<Vec<business_transactions::Model>, DbErr> {
        let (start, end) = month.range();
        business_transactions::Entity::find()
            .filter(business_transactions::Column::FamilyId.eq(family_id.into_inner()))
            .filter(business_transactions::Column::Date.gte(start))
            .filter(business_transactions::Column::Date.lt(end))
            .order_by_desc(business_transactions::Column::Date)
            .order_by_desc(business_transactions::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Revenue, cost and profit for `month`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn summary(
        &self,
        family_id: FamilyId,
        month: MonthKey,
    ) -> Result<BusinessSummary, DbErr> {
        let transactions = self.list_transactions(family_id, month).await?;
        let lines: Vec<BusinessTransactionLine> = transactions
            .iter()
            .map(|t| BusinessTransactionLine {
                kind: t.kind.into(),
                quantity: t.quantity,
                total: t.total,
            })
            .collect();
        Ok(InventoryService::summarize(&lines))
    }
}

fn sku_error(e: DbErr, sku: String) -> InventoryRepoError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => InventoryRepoError::DuplicateSku(sku),
        _ => InventoryRepoError::Database(e),
    }
}
