//! Planned versus actual figures for one monthly budget.

use rust_decimal::Decimal;
use serde::Serialize;

use super::schema::{BudgetField, FIELD_SCHEMA, Section};
use super::types::{BudgetMonth, MonthlyBudget};

/// Variance status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceStatus {
    /// Under plan for spending, over plan for income and savings.
    Favorable,
    /// Over plan for spending, under plan for income and savings.
    Unfavorable,
    /// Exactly on plan.
    OnBudget,
}

impl VarianceStatus {
    /// Classifies `actual` against `planned` for a section.
    #[must_use]
    pub fn classify(section: Section, planned: Decimal, actual: Decimal) -> Self {
        let ordering = match section {
            Section::Expense => planned.cmp(&actual),
            Section::Income | Section::Savings => actual.cmp(&planned),
        };

        match ordering {
            std::cmp::Ordering::Greater => Self::Favorable,
            std::cmp::Ordering::Less => Self::Unfavorable,
            std::cmp::Ordering::Equal => Self::OnBudget,
        }
    }
}

/// Figures for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineSummary {
    /// Category.
    pub field: BudgetField,
    /// Display label.
    pub label: &'static str,
    /// Section.
    pub section: Section,
    /// Planned amount.
    pub planned: Decimal,
    /// Actual amount.
    pub actual: Decimal,
    /// `planned - actual`.
    pub remaining: Decimal,
    /// `actual / planned * 100`, two decimals; zero when nothing was planned.
    pub progress_percent: Decimal,
    /// Variance status.
    pub status: VarianceStatus,
}

/// Totals for one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SectionTotals {
    /// Planned total.
    pub planned: Decimal,
    /// Actual total.
    pub actual: Decimal,
    /// `planned - actual`.
    pub remaining: Decimal,
}

/// Summary of a monthly budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetSummary {
    /// Month summarized.
    pub month: BudgetMonth,
    /// One line per category, in schema order.
    pub lines: Vec<LineSummary>,
    /// Income totals.
    pub income: SectionTotals,
    /// Expense totals.
    pub expenses: SectionTotals,
    /// Savings totals.
    pub savings: SectionTotals,
}

/// Utilization of a plan, rounded to two decimals.
///
/// Saturates at `Decimal::MAX` when the ratio does not fit.
#[must_use]
pub fn progress_percent(planned: Decimal, actual: Decimal) -> Decimal {
    if planned <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    actual
        .checked_div(planned)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Decimal::MAX, |percent| percent.round_dp(2))
}

impl BudgetSummary {
    /// Summarizes a budget.
    #[must_use]
    pub fn from_budget(budget: &MonthlyBudget) -> Self {
        let lines = FIELD_SCHEMA
            .iter()
            .map(|spec| {
                let planned = budget.planned.get(spec.field);
                let actual = budget.actual.get(spec.field);
                LineSummary {
                    field: spec.field,
                    label: spec.label,
                    section: spec.section,
                    planned,
                    actual,
                    remaining: planned.saturating_sub(actual),
                    progress_percent: progress_percent(planned, actual),
                    status: VarianceStatus::classify(spec.section, planned, actual),
                }
            })
            .collect();

        let totals = |section| {
            let planned = budget.planned.section_total(section);
            let actual = budget.actual.section_total(section);
            SectionTotals {
                planned,
                actual,
                remaining: planned.saturating_sub(actual),
            }
        };

        Self {
            month: budget.month,
            lines,
            income: totals(Section::Income),
            expenses: totals(Section::Expense),
            savings: totals(Section::Savings),
        }
    }

    /// Line for one category.
    #[must_use]
    pub fn line(&self, field: BudgetField) -> Option<&LineSummary> {
        self.lines.iter().find(|line| line.field == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::types::Amounts;
    use budgetly_shared::types::{BudgetId, UserId};
    use chrono::Utc;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn budget(planned: Amounts, actual: Amounts) -> MonthlyBudget {
        MonthlyBudget {
            id: BudgetId::new(),
            user_id: UserId::new(),
            month: BudgetMonth::new(2025, 3).unwrap(),
            planned,
            actual,
            total_income: planned.total_income(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    #[case(Section::Expense, dec!(1000), dec!(800), VarianceStatus::Favorable)]
    #[case(Section::Expense, dec!(1000), dec!(1200), VarianceStatus::Unfavorable)]
    #[case(Section::Income, dec!(3000), dec!(3200), VarianceStatus::Favorable)]
    #[case(Section::Income, dec!(3000), dec!(2000), VarianceStatus::Unfavorable)]
    #[case(Section::Savings, dec!(500), dec!(500), VarianceStatus::OnBudget)]
    fn test_variance_status(
        #[case] section: Section,
        #[case] planned: Decimal,
        #[case] actual: Decimal,
        #[case] expected: VarianceStatus,
    ) {
        assert_eq!(VarianceStatus::classify(section, planned, actual), expected);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(dec!(1000), dec!(800)), dec!(80.00));
        assert_eq!(progress_percent(dec!(3), dec!(1)), dec!(33.33));
        assert_eq!(progress_percent(dec!(0), dec!(500)), dec!(0));
    }

    #[test]
    fn test_extreme_amounts_saturate() {
        assert_eq!(progress_percent(dec!(0.0001), Decimal::MAX), Decimal::MAX);

        let planned = Amounts::ZERO
            .with(BudgetField::Rent, dec!(0.0001))
            .with(BudgetField::SalaryIncome, Decimal::MAX)
            .with(BudgetField::BonusIncome, Decimal::MAX);
        let actual = Amounts::ZERO
            .with(BudgetField::Rent, Decimal::MAX)
            .with(BudgetField::Savings, Decimal::MAX);

        let summary = BudgetSummary::from_budget(&budget(planned, actual));

        assert_eq!(summary.income.planned, Decimal::MAX);
        assert_eq!(summary.savings.remaining, Decimal::MIN);
        let rent = summary.line(BudgetField::Rent).unwrap();
        assert_eq!(rent.progress_percent, Decimal::MAX);
        assert_eq!(rent.status, VarianceStatus::Unfavorable);
    }

    #[test]
    fn test_summary_lines_and_totals() {
        let planned = Amounts::ZERO
            .with(BudgetField::SalaryIncome, dec!(3000))
            .with(BudgetField::BonusIncome, dec!(200))
            .with(BudgetField::Rent, dec!(1000))
            .with(BudgetField::Groceries, dec!(400))
            .with(BudgetField::Savings, dec!(300));
        let actual = Amounts::ZERO
            .with(BudgetField::SalaryIncome, dec!(3000))
            .with(BudgetField::Rent, dec!(1000))
            .with(BudgetField::Groceries, dec!(450.25));

        let summary = BudgetSummary::from_budget(&budget(planned, actual));

        assert_eq!(summary.lines.len(), FIELD_SCHEMA.len());
        assert_eq!(summary.income.planned, dec!(3200));
        assert_eq!(summary.income.actual, dec!(3000));
        assert_eq!(summary.income.remaining, dec!(200));
        assert_eq!(summary.expenses.planned, dec!(1400));
        assert_eq!(summary.expenses.actual, dec!(1450.25));
        assert_eq!(summary.savings.remaining, dec!(300));

        let groceries = summary.line(BudgetField::Groceries).unwrap();
        assert_eq!(groceries.label, "Groceries");
        assert_eq!(groceries.remaining, dec!(-50.25));
        assert_eq!(groceries.progress_percent, dec!(112.56));
        assert_eq!(groceries.status, VarianceStatus::Unfavorable);
    }
}
