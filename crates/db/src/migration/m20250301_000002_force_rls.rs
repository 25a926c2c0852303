//! Migration to enable FORCE ROW LEVEL SECURITY on the budget tables.
//!
//! Makes the policies apply to the table owner as well.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(FORCE_RLS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DISABLE_FORCE_RLS_SQL).await?;
        Ok(())
    }
}

const FORCE_RLS_SQL: &str = r"
ALTER TABLE monthly_budgets FORCE ROW LEVEL SECURITY;
ALTER TABLE foreign_expenses FORCE ROW LEVEL SECURITY;
";

const DISABLE_FORCE_RLS_SQL: &str = r"
ALTER TABLE monthly_budgets NO FORCE ROW LEVEL SECURITY;
ALTER TABLE foreign_expenses NO FORCE ROW LEVEL SECURITY;
";
