//! Row-level security scoping.
//!
//! Both budget tables carry a `user_isolation` policy comparing `user_id`
//! with the `app.current_user_id` setting. Every store call opens a
//! transaction, sets that value with `SET LOCAL` and runs its queries
//! inside it, so the setting never outlives the transaction and never
//! leaks to the next user of a pooled connection.
//!
//! ```ignore
//! use budgetly_db::rls::RlsExt;
//!
//! let rls = db.with_rls(user_id).await?;
//! let rows = MonthlyBudgets::find().all(rls.transaction()).await?;
//! rls.commit().await?;
//! ```

use budgetly_shared::types::UserId;
use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

/// A transaction in which only one user's rows are visible.
pub struct RlsConnection {
    txn: DatabaseTransaction,
}

impl RlsConnection {
    /// Begins a transaction scoped to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the
    /// setting cannot be applied.
    pub async fn new(db: &DatabaseConnection, user_id: UserId) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        txn.execute_unprepared(&set_user_sql(user_id)).await?;
        Ok(Self { txn })
    }

    /// The scoped transaction.
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

    /// Rolls the transaction back.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}

/// Opens user-scoped transactions on a connection pool.
#[async_trait::async_trait]
pub trait RlsExt {
    /// Begins a transaction scoped to `user_id`.
    ///
    /// # Errors
    ///
    /// See [`RlsConnection::new`].
    async fn with_rls(&self, user_id: UserId) -> Result<RlsConnection, DbErr>;
}

#[async_trait::async_trait]
impl RlsExt for DatabaseConnection {
    async fn with_rls(&self, user_id: UserId) -> Result<RlsConnection, DbErr> {
        RlsConnection::new(self, user_id).await
    }
}

// A UUID renders as hex digits and dashes only, so inlining it is safe.
fn set_user_sql(user_id: UserId) -> String {
    format!("SET LOCAL app.current_user_id = '{user_id}'")
}
