//! `SeaORM` entities.

pub mod foreign_expenses;
pub mod monthly_budgets;
