//! Integration tests for the family context on transactions.

mod common;

use hogar_db::rls::RlsConnection;
use sea_orm::{ConnectionTrait, DbBackend, Statement};

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_rls_context_is_transaction_local() {
    let db = common::connect().await;
    let owner = common::create_user(&db, "Ana").await;
    let family_id = common::create_family(&db, owner).await;

    let rls = RlsConnection::new(&db, family_id).await.expect("Failed to open RLS connection");
    let row = rls
        .transaction()
        .query_one(Statement::from_string(
            DbBackend::Postgres,
            "SELECT current_setting('app.current_family_id', true) AS family",
        ))
        .await
        .unwrap()
        .expect("setting row");
    let family: String = row.try_get("", "family").unwrap();
    assert_eq!(family, family_id.to_string());
    rls.commit().await.unwrap();

    let row = db
        .query_one(Statement::from_string(
            DbBackend::Postgres,
            "SELECT COALESCE(current_setting('app.current_family_id', true), '') AS family",
        ))
        .await
        .unwrap()
        .expect("setting row");
    let family: String = row.try_get("", "family").unwrap();
    assert!(family.is_empty());
}
