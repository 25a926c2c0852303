//! `SeaORM` Entity for monthly_budgets table.
//!
//! Holds both the per-user template (`is_template = true`, no month) and
//! the materialized months.

use budgetly_core::budget::Amounts;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "monthly_budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub is_template: bool,
    pub year: Option<i32>,
    pub month: Option<i16>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub salary_income: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub bonus_income: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub extra_income: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub rent: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub utilities: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub groceries: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub transport: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub entertainment: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub shopping: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub miscellaneous: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub foreign_expenses: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub savings: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub actual_salary_income: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub actual_bonus_income: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub actual_extra_income: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub actual_rent: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub actual_utilities: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub actual_groceries: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub actual_transport: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub actual_entertainment: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub actual_shopping: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub actual_miscellaneous: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub actual_foreign_expenses: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub actual_savings: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_income: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Planned amounts of the row.
    #[must_use]
    pub fn planned(&self) -> Amounts {
        Amounts {
            salary_income: self.salary_income,
            bonus_income: self.bonus_income,
            extra_income: self.extra_income,
            rent: self.rent,
            utilities: self.utilities,
            groceries: self.groceries,
            transport: self.transport,
            entertainment: self.entertainment,
            shopping: self.shopping,
            miscellaneous: self.miscellaneous,
            foreign_expenses: self.foreign_expenses,
            savings: self.savings,
        }
    }

    /// Actual amounts of the row.
    #[must_use]
    pub fn actual(&self) -> Amounts {
        Amounts {
            salary_income: self.actual_salary_income,
            bonus_income: self.actual_bonus_income,
            extra_income: self.actual_extra_income,
            rent: self.actual_rent,
            utilities: self.actual_utilities,
            groceries: self.actual_groceries,
            transport: self.actual_transport,
            entertainment: self.actual_entertainment,
            shopping: self.actual_shopping,
            miscellaneous: self.actual_miscellaneous,
            foreign_expenses: self.actual_foreign_expenses,
            savings: self.actual_savings,
        }
    }
}
