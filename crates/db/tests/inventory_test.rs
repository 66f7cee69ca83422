//! Integration tests for business stock and savings balances.

mod common;

use chrono::NaiveDate;
use hogar_core::inventory::BusinessTransactionKind;
use hogar_core::savings::{SavingsError, SavingsMovementKind};
use hogar_db::repositories::{
    NewBusinessTransaction, NewSavingsMovement, ProductFields, SavingsAccountFields,
    SavingsRepoError,
};
use hogar_db::{InventoryRepository, SavingsRepository};
use hogar_shared::types::{BusinessTransactionId, ProductId, SavingsAccountId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn movement(kind: SavingsMovementKind, amount: Decimal, d: u32) -> NewSavingsMovement {
    NewSavingsMovement {
        kind,
        amount,
        date: day(d),
        note: None,
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_sale_and_purchase_update_stock() {
    let db = common::connect().await;
    let (family_id, ana, _) = common::ana_and_luis(&db).await;
    let inventory = InventoryRepository::new(db.clone());

    let product = inventory
        .create_product(
            family_id,
            ProductFields {
                sku: format!("JAB-{}", Uuid::new_v4()),
                name: "Jabón artesanal".into(),
                unit_price: dec!(45),
                unit_cost: dec!(20),
            },
            10,
        )
        .await
        .expect("Failed to create product");
    let product_id = ProductId::from_uuid(product.id);

    let (sale, after_sale) = inventory
        .record(
            family_id,
            ana,
            NewBusinessTransaction {
                product_id,
                kind: BusinessTransactionKind::Sale,
                quantity: 3,
                unit_price: None,
                date: day(5),
                note: None,
            },
        )
        .await
        .expect("Failed to record sale");
    assert_eq!(after_sale.stock, 7);
    assert_eq!(sale.total, dec!(135));

    let (_, after_purchase) = inventory
        .record(
            family_id,
            ana,
            NewBusinessTransaction {
                product_id,
                kind: BusinessTransactionKind::Purchase,
                quantity: 5,
                unit_price: None,
                date: day(6),
                note: None,
            },
        )
        .await
        .expect("Failed to record purchase");
    assert_eq!(after_purchase.stock, 12);

    inventory
        .delete_transaction(family_id, BusinessTransactionId::from_uuid(sale.id))
        .await
        .expect("Failed to delete sale");
    let reloaded = inventory.find_product(family_id, product_id).await.unwrap();
    assert_eq!(reloaded.stock, 15);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_withdrawal_over_balance_rejected() {
    let db = common::connect().await;
    let (family_id, ana, _) = common::ana_and_luis(&db).await;
    let savings = SavingsRepository::new(db.clone());

    let account = savings
        .create(
            family_id,
            ana,
            SavingsAccountFields {
                name: "Viaje".into(),
                goal: Some(dec!(1000)),
            },
        )
        .await
        .unwrap();
    let account_id = SavingsAccountId::from_uuid(account.id);

    savings
        .add_movement(
            family_id,
            account_id,
            movement(SavingsMovementKind::Deposit, dec!(100), 1),
        )
        .await
        .unwrap();

    let result = savings
        .add_movement(
            family_id,
            account_id,
            movement(SavingsMovementKind::Withdrawal, dec!(150), 2),
        )
        .await;
    assert!(matches!(
        result,
        Err(SavingsRepoError::Rejected(SavingsError::InsufficientFunds { .. }))
    ));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_deleting_deposit_cannot_overdraw() {
    let db = common::connect().await;
    let (family_id, _, luis) = common::ana_and_luis(&db).await;
    let savings = SavingsRepository::new(db.clone());

    let account = savings
        .create(
            family_id,
            luis,
            SavingsAccountFields {
                name: "Emergencias".into(),
                goal: None,
            },
        )
        .await
        .unwrap();
    let account_id = SavingsAccountId::from_uuid(account.id);

    let deposit = savings
        .add_movement(family_id, account_id, movement(SavingsMovementKind::Deposit, dec!(100), 1))
        .await
        .unwrap();
    let withdrawal = savings
        .add_movement(
            family_id,
            account_id,
            movement(SavingsMovementKind::Withdrawal, dec!(80), 2),
        )
        .await
        .unwrap();

    let result = savings.delete_movement(family_id, account_id, deposit.id).await;
    assert!(
        matches!(
            &result,
            Err(SavingsRepoError::Rejected(SavingsError::InsufficientFunds { balance, requested }))
                if *balance == dec!(20) && *requested == dec!(100)
        ),
        "expected InsufficientFunds, got {result:?}"
    );
    let summary = savings.summary(family_id, account_id).await.unwrap();
    assert_eq!(summary.balance, dec!(20));

    savings
        .delete_movement(family_id, account_id, withdrawal.id)
        .await
        .expect("Removing a withdrawal only raises the balance");
    savings
        .delete_movement(family_id, account_id, deposit.id)
        .await
        .expect("With the withdrawal gone the deposit can go too");
    let summary = savings.summary(family_id, account_id).await.unwrap();
    assert_eq!(summary.balance, dec!(0));

    let missing = savings.delete_movement(family_id, account_id, deposit.id).await;
    assert!(matches!(missing, Err(SavingsRepoError::MovementNotFound(_))));
}
