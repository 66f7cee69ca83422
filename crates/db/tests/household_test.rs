//! Integration tests for families, expenses and balances.

mod common;

use chrono::NaiveDate;
use hogar_core::balance::{BalanceService, SharePolicy};
use hogar_core::month::MonthKey;
use hogar_core::snapshot::SnapshotError;
use hogar_core::split::SplitMode;
use hogar_db::repositories::{
    ExpenseFields, FamilyRepoError, FixedExpenseFields, FixedExpenseRepoError, SnapshotRepoError,
};
use hogar_db::{
    BalanceRepository, ExpenseRepository, FamilyRepository, FixedExpenseRepository,
    SnapshotRepository,
};
use hogar_shared::types::{Currency, ExpenseId, FixedExpenseId};
use rust_decimal_macros::dec;

fn march() -> MonthKey {
    MonthKey::new(2026, 3).unwrap()
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_join_second_family_rejected() {
    let db = common::connect().await;
    let (_, ana, _) = common::ana_and_luis(&db).await;

    let other_owner = common::create_user(&db, "Marta").await;
    let other = common::create_family(&db, other_owner).await;
    let families = FamilyRepository::new(db.clone());
    let code = families.find_by_id(other).await.unwrap().unwrap().invite_code;

    let result = families.join(&code, ana).await;
    assert!(matches!(result, Err(FamilyRepoError::AlreadyInFamily)));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_expense_create_then_delete_restores_balances() {
    let db = common::connect().await;
    let (family_id, ana, luis) = common::ana_and_luis(&db).await;
    let expenses = ExpenseRepository::new(db.clone());
    let balances = BalanceRepository::new(db.clone());

    let before = balances.sheet(family_id, march(), SharePolicy::AllExpenses).await.unwrap();

    let expense = expenses
        .create(
            family_id,
            ana,
            ExpenseFields {
                amount: dec!(100),
                date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
                category: "super".into(),
                description: None,
                paid_by: ana,
                split: SplitMode::EqualSplit,
            },
        )
        .await
        .expect("Failed to create expense");

    let during = balances.sheet(family_id, march(), SharePolicy::AllExpenses).await.unwrap();
    assert_eq!(during.member(ana).unwrap().balance, dec!(50));
    assert_eq!(during.member(luis).unwrap().balance, dec!(-50));
    let debt = BalanceService::who_owes_whom(&during).expect("Luis should owe Ana");
    let currency = FamilyRepository::new(db.clone())
        .currency(family_id)
        .await
        .expect("Family currency should parse");
    assert_eq!(currency, Currency::Mxn);
    assert_eq!(
        BalanceService::owes_text(&debt, currency),
        "Luis owes Ana $50.00"
    );

    let removed = expenses
        .delete(family_id, ExpenseId::from_uuid(expense.id))
        .await
        .expect("Failed to delete expense");
    assert!(removed.is_empty());

    let after = balances.sheet(family_id, march(), SharePolicy::AllExpenses).await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_expense_for_member_roundtrip() {
    let db = common::connect().await;
    let (family_id, ana, luis) = common::ana_and_luis(&db).await;
    let expenses = ExpenseRepository::new(db.clone());

    let created = expenses
        .create(
            family_id,
            ana,
            ExpenseFields {
                amount: dec!(35.50),
                date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                category: "farmacia".into(),
                description: Some("para Luis".into()),
                paid_by: ana,
                split: SplitMode::ForMember(luis),
            },
        )
        .await
        .unwrap();

    let found = expenses.find(family_id, ExpenseId::from_uuid(created.id)).await.unwrap();
    assert_eq!(found.for_member, Some(luis.into_inner()));
    assert_eq!(found.amount, dec!(35.50));
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_close_month_twice_conflicts() {
    let db = common::connect().await;
    let (family_id, ana, _) = common::ana_and_luis(&db).await;
    let snapshots = SnapshotRepository::new(db.clone());
    let current = MonthKey::new(2026, 4).unwrap();

    let first = snapshots.close(family_id, march(), current, ana).await.expect("first close");
    assert_eq!(first.month, "2026-03");

    let second = snapshots.close(family_id, march(), current, ana).await;
    assert!(
        matches!(
            &second,
            Err(SnapshotRepoError::Rejected(SnapshotError::AlreadyClosed(month)))
                if *month == march()
        ),
        "expected AlreadyClosed, got {second:?}"
    );
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_fixed_expense_paid_once_per_month() {
    let db = common::connect().await;
    let (family_id, ana, luis) = common::ana_and_luis(&db).await;
    let bills = FixedExpenseRepository::new(db.clone());

    let rent = bills
        .create(
            family_id,
            ana,
            FixedExpenseFields {
                name: "Renta".to_string(),
                amount: dec!(1200),
                category: "vivienda".to_string(),
                due_day: 31,
                recurring: true,
                active: true,
            },
        )
        .await
        .expect("create bill");
    let rent_id = FixedExpenseId::from_uuid(rent.id);

    let payment = bills
        .record_payment(family_id, rent_id, march(), None, luis)
        .await
        .expect("first payment");
    assert_eq!(payment.amount, dec!(1200));
    assert_eq!(payment.month, "2026-03");

    let second = bills.record_payment(family_id, rent_id, march(), Some(dec!(10)), ana).await;
    assert!(
        matches!(&second, Err(FixedExpenseRepoError::AlreadyPaid(month)) if *month == march()),
        "expected AlreadyPaid, got {second:?}"
    );

    let other_family = common::create_family(&db, common::create_user(&db, "Marta").await).await;
    let foreign = bills.record_payment(other_family, rent_id, march(), None, ana).await;
    assert!(
        matches!(&foreign, Err(FixedExpenseRepoError::NotFound(id)) if *id == rent_id),
        "expected NotFound, got {foreign:?}"
    );
}
