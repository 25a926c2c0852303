//! Migration adding consistency checks on stored budget totals.
//!
//! `NUMERIC(19, 4)` already caps magnitude and scale; these checks keep the
//! derived totals in step with the columns they are summed from.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(ADD_CHECKS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_CHECKS_SQL).await?;
        Ok(())
    }
}

const ADD_CHECKS_SQL: &str = r"
ALTER TABLE monthly_budgets
    ADD CONSTRAINT monthly_budgets_total_income_sum
    CHECK (total_income = salary_income + bonus_income + extra_income);
";

const DROP_CHECKS_SQL: &str = r"
ALTER TABLE monthly_budgets DROP CONSTRAINT monthly_budgets_total_income_sum;
";
