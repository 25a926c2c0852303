//! Initial database migration.
//!
//! Creates the budget tables, their uniqueness rules and RLS policies.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: TABLES
        // ============================================================
        db.execute_unprepared(MONTHLY_BUDGETS_SQL).await?;
        db.execute_unprepared(FOREIGN_EXPENSES_SQL).await?;

        // ============================================================
        // PART 2: ROW-LEVEL SECURITY
        // ============================================================
        db.execute_unprepared(RLS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const MONTHLY_BUDGETS_SQL: &str = r"
-- ============================================================
-- MONTHLY BUDGETS
-- One template row per user (is_template, no month) plus one row
-- per materialized (user, year, month).
-- ============================================================
CREATE TABLE monthly_budgets (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    is_template BOOLEAN NOT NULL DEFAULT FALSE,
    year INTEGER,
    month SMALLINT,

    salary_income NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (salary_income >= 0),
    bonus_income NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (bonus_income >= 0),
    extra_income NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (extra_income >= 0),
    rent NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (rent >= 0),
    utilities NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (utilities >= 0),
    groceries NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (groceries >= 0),
    transport NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (transport >= 0),
    entertainment NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (entertainment >= 0),
    shopping NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (shopping >= 0),
    miscellaneous NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (miscellaneous >= 0),
    foreign_expenses NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (foreign_expenses >= 0),
    savings NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (savings >= 0),

    actual_salary_income NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (actual_salary_income >= 0),
    actual_bonus_income NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (actual_bonus_income >= 0),
    actual_extra_income NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (actual_extra_income >= 0),
    actual_rent NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (actual_rent >= 0),
    actual_utilities NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (actual_utilities >= 0),
    actual_groceries NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (actual_groceries >= 0),
    actual_transport NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (actual_transport >= 0),
    actual_entertainment NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (actual_entertainment >= 0),
    actual_shopping NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (actual_shopping >= 0),
    actual_miscellaneous NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (actual_miscellaneous >= 0),
    actual_foreign_expenses NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (actual_foreign_expenses >= 0),
    actual_savings NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (actual_savings >= 0),

    total_income NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_template_has_no_month CHECK (
        (is_template AND year IS NULL AND month IS NULL)
        OR (NOT is_template AND year BETWEEN 2000 AND 2100 AND month BETWEEN 1 AND 12)
    )
);

-- At most one template per user
CREATE UNIQUE INDEX uq_monthly_budgets_template
    ON monthly_budgets (user_id) WHERE is_template;

-- At most one budget per user and month
CREATE UNIQUE INDEX uq_monthly_budgets_month
    ON monthly_budgets (user_id, year, month) WHERE NOT is_template;
";

const FOREIGN_EXPENSES_SQL: &str = r"
-- ============================================================
-- FOREIGN EXPENSES
-- Per-month expenses in the foreign currency and their converted total
-- ============================================================
CREATE TABLE foreign_expenses (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    year INTEGER NOT NULL CHECK (year BETWEEN 2000 AND 2100),
    month SMALLINT NOT NULL CHECK (month BETWEEN 1 AND 12),
    items JSONB NOT NULL DEFAULT '[]'::JSONB,
    exchange_rate NUMERIC(19, 8) NOT NULL CHECK (exchange_rate > 0),
    total_foreign NUMERIC(19, 4) NOT NULL CHECK (total_foreign >= 0),
    total_primary NUMERIC(19, 4) NOT NULL CHECK (total_primary >= 0),
    foreign_currency VARCHAR(3) NOT NULL,
    primary_currency VARCHAR(3) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_foreign_expenses_month UNIQUE (user_id, year, month)
);
";

const RLS_SQL: &str = r"
-- ============================================================
-- ROW-LEVEL SECURITY POLICIES
-- Application sets context per transaction:
-- SET LOCAL app.current_user_id = 'user-uuid';
-- ============================================================

ALTER TABLE monthly_budgets ENABLE ROW LEVEL SECURITY;
ALTER TABLE foreign_expenses ENABLE ROW LEVEL SECURITY;

CREATE POLICY user_isolation ON monthly_budgets
    USING (user_id = current_setting('app.current_user_id', true)::UUID)
    WITH CHECK (user_id = current_setting('app.current_user_id', true)::UUID);

CREATE POLICY user_isolation ON foreign_expenses
    USING (user_id = current_setting('app.current_user_id', true)::UUID)
    WITH CHECK (user_id = current_setting('app.current_user_id', true)::UUID);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS foreign_expenses CASCADE;
DROP TABLE IF EXISTS monthly_budgets CASCADE;
";
