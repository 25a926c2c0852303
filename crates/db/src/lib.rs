//! Database layer with `SeaORM` entities and the budget store.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - [`PgBudgetStore`], the PostgreSQL `BudgetStore`
//! - Row-level security scoping per user
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod rls;
pub mod store;

pub use migration::Migrator;
pub use store::PgBudgetStore;

use std::time::Duration;

use budgetly_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(options).await
}
