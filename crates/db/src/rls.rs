//! Row-level security context for family isolation.
//!
//! Every tenant table carries a `tenant_isolation` policy on
//! `app.current_family_id`. Repositories also filter by `family_id`
//! explicitly; multi-step writes additionally run inside an
//! [`RlsConnection`] so the policy applies to everything they touch.
//!
//! ```ignore
//! let rls = RlsConnection::new(&db, family_id).await?;
//! let products = Products::find().all(rls.transaction()).await?;
//! rls.commit().await?;
//! ```

use hogar_shared::types::FamilyId;
use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

/// A transaction with the family context set.
pub struct RlsConnection {
    txn: DatabaseTransaction,
}

impl RlsConnection {
    /// Begins a transaction and sets `app.current_family_id` with `SET LOCAL`,
    /// so the setting ends with the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the context
    /// cannot be set.
    pub async fn new(db: &DatabaseConnection, family_id: FamilyId) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        set_rls_context(&txn, family_id).await?;
        Ok(Self { txn })
    }

    /// The transaction to run queries on.
    #[must_use]
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Commits the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }
}

async fn set_rls_context(txn: &DatabaseTransaction, family_id: FamilyId) -> Result<(), DbErr> {
    txn.execute_unprepared(&context_sql(family_id)).await?;
    Ok(())
}

// A formatted `Uuid` is always hex and dashes, so interpolation is safe.
fn context_sql(family_id: FamilyId) -> String {
    format!("SET LOCAL app.current_family_id = '{family_id}'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_context_sql() {
        let family_id =
            FamilyId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap());
        assert_eq!(
            context_sql(family_id),
            "SET LOCAL app.current_family_id = '550e8400-e29b-41d4-a716-446655440000'"
        );
    }
}
