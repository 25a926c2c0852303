//! Budget service for materialization.

use super::types::{Amounts, BudgetMonth, BudgetTemplate, NewMonthlyBudget};

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Builds the monthly budget a template produces for `month`.
    ///
    /// Planned amounts are copied verbatim, every actual amount starts at
    /// zero and `total_income` is derived from the planned income.
    #[must_use]
    pub fn materialize(template: &BudgetTemplate, month: BudgetMonth) -> NewMonthlyBudget {
        let planned = template.planned;
        NewMonthlyBudget {
            user_id: template.user_id,
            month,
            planned,
            actual: Amounts::ZERO,
            total_income: planned.total_income(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::schema::BudgetField;
    use budgetly_shared::types::{BudgetId, UserId};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn template(planned: Amounts) -> BudgetTemplate {
        BudgetTemplate {
            id: BudgetId::new(),
            user_id: UserId::new(),
            planned,
            total_income: planned.total_income(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_materialize_copies_planned_and_zeroes_actuals() {
        let planned = Amounts::ZERO
            .with(BudgetField::SalaryIncome, dec!(3000))
            .with(BudgetField::Rent, dec!(1000));
        let template = template(planned);
        let month = BudgetMonth::new(2025, 3).unwrap();

        let budget = BudgetService::materialize(&template, month);

        assert_eq!(budget.user_id, template.user_id);
        assert_eq!(budget.month, month);
        assert_eq!(budget.planned, planned);
        assert_eq!(budget.actual, Amounts::ZERO);
        assert_eq!(budget.total_income, dec!(3000));
    }

    #[test]
    fn test_total_income_ignores_expenses_and_savings() {
        let planned = Amounts::ZERO
            .with(BudgetField::SalaryIncome, dec!(2500))
            .with(BudgetField::BonusIncome, dec!(300.50))
            .with(BudgetField::ExtraIncome, dec!(120))
            .with(BudgetField::Groceries, dec!(400))
            .with(BudgetField::Savings, dec!(500));

        let budget = BudgetService::materialize(&template(planned), BudgetMonth::new(2025, 1).unwrap());

        assert_eq!(budget.total_income, dec!(2920.50));
    }
}
