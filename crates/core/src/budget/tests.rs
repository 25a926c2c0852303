//! Property-based tests for budget module.

use budgetly_shared::types::{BudgetId, UserId};
use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::BudgetError;
use super::schema::{
    BudgetField, Constraint, FIELD_SCHEMA, FormValues, MAX_AMOUNT, amounts_from_form,
    form_from_amounts, validate_form,
};
use super::service::BudgetService;
use super::summary::{BudgetSummary, progress_percent};
use super::types::{Amounts, BudgetMonth, BudgetTemplate};

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000).prop_map(|v| Decimal::new(v, 2))
}

fn amounts_strategy() -> impl Strategy<Value = Amounts> {
    prop::collection::vec(amount_strategy(), FIELD_SCHEMA.len()).prop_map(|values| {
        FIELD_SCHEMA
            .iter()
            .zip(values)
            .fold(Amounts::ZERO, |acc, (spec, value)| acc.with(spec.field, value))
    })
}

fn month_strategy() -> impl Strategy<Value = BudgetMonth> {
    (BudgetMonth::MIN_YEAR..=BudgetMonth::MAX_YEAR, 1u32..=12)
        .prop_map(|(year, month)| BudgetMonth::new(year, month).unwrap())
}

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

proptest! {
    /// A materialized month carries the template's planned values and nothing else.
    #[test]
    fn test_materialize_copies_planned(planned in amounts_strategy(), month in month_strategy()) {
        let template = template(planned);
        let budget = BudgetService::materialize(&template, month);

        prop_assert_eq!(budget.planned, template.planned);
        prop_assert_eq!(budget.actual, Amounts::ZERO);
        prop_assert_eq!(budget.month, month);
        prop_assert_eq!(
            budget.total_income,
            planned.salary_income + planned.bonus_income + planned.extra_income
        );
    }

    /// Remaining is always planned minus actual.
    #[test]
    fn test_summary_remaining(planned in amounts_strategy(), actual in amounts_strategy()) {
        let template = template(planned);
        let new_budget = BudgetService::materialize(&template, BudgetMonth::new(2025, 3).unwrap());
        let budget = super::types::MonthlyBudget {
            id: BudgetId::new(),
            user_id: new_budget.user_id,
            month: new_budget.month,
            planned: new_budget.planned,
            actual,
            total_income: new_budget.total_income,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let summary = BudgetSummary::from_budget(&budget);
        for line in &summary.lines {
            prop_assert_eq!(line.remaining, line.planned - line.actual);
            prop_assert_eq!(line.progress_percent, progress_percent(line.planned, line.actual));
        }
        prop_assert_eq!(summary.income.planned, budget.total_income);
    }

    /// Every valid form converts to amounts and back without loss.
    #[test]
    fn test_form_amounts_agree(amounts in amounts_strategy()) {
        let form = form_from_amounts(&amounts);
        prop_assert_eq!(form.len(), FIELD_SCHEMA.len());
        prop_assert_eq!(amounts_from_form(&form).unwrap(), amounts);
    }

    /// Months walk forward and back consistently.
    #[test]
    fn test_month_navigation(month in month_strategy()) {
        if let Some(next) = month.next() {
            prop_assert_eq!(next.previous(), Some(month));
            prop_assert!(next > month);
        }
        if let Some(previous) = month.previous() {
            prop_assert_eq!(previous.next(), Some(month));
        }
        prop_assert_eq!(month.to_string().parse::<BudgetMonth>().unwrap(), month);
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2025, 0)]
    #[case(2025, 13)]
    fn test_invalid_month(#[case] year: i32, #[case] month: u32) {
        assert_eq!(BudgetMonth::new(year, month), Err(BudgetError::InvalidMonth(month)));
    }

    #[rstest]
    #[case(1999)]
    #[case(2101)]
    fn test_invalid_year(#[case] year: i32) {
        assert_eq!(BudgetMonth::new(year, 6), Err(BudgetError::InvalidYear(year)));
    }

    #[test]
    fn test_month_code_and_display() {
        let month = BudgetMonth::new(2025, 3).unwrap();
        assert_eq!(month.code(), "03");
        assert_eq!(month.to_string(), "2025-03");
    }

    #[test]
    fn test_month_serializes_as_code() {
        let month = BudgetMonth::new(2025, 3).unwrap();
        assert_eq!(serde_json::to_string(&month).unwrap(), r#""2025-03""#);
        assert_eq!(serde_json::from_str::<BudgetMonth>(r#""2025-03""#).unwrap(), month);
        assert!(serde_json::from_str::<BudgetMonth>(r#""2025-13""#).is_err());
        assert!(serde_json::from_str::<BudgetMonth>(r#"{"year":2025,"month":3}"#).is_err());
    }

    #[test]
    fn test_month_from_date() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let month = BudgetMonth::from_date(date).unwrap();
        assert_eq!(month.year(), 2025);
        assert_eq!(month.month(), 12);
        assert_eq!(month.next(), Some(BudgetMonth::new(2026, 1).unwrap()));
    }

    #[test]
    fn test_month_navigation_stops_at_range_edges() {
        assert_eq!(BudgetMonth::new(2000, 1).unwrap().previous(), None);
        assert_eq!(BudgetMonth::new(2100, 12).unwrap().next(), None);
    }

    #[rstest]
    #[case("2025")]
    #[case("2025-xx")]
    #[case("march-2025")]
    fn test_malformed_month(#[case] input: &str) {
        assert_eq!(
            input.parse::<BudgetMonth>(),
            Err(BudgetError::MalformedMonth(input.to_string()))
        );
    }

    #[test]
    fn test_validate_form_collects_every_problem() {
        let mut form = FormValues::new();
        form.insert("rent".to_string(), dec!(-1));
        form.insert("yacht".to_string(), dec!(10));
        form.insert("groceries".to_string(), dec!(300));

        let errors = validate_form(&form).unwrap_err();

        assert_eq!(errors.0.len(), 2);
        assert!(errors.0.iter().any(|e| e.key == "rent"));
        assert!(errors.0.iter().any(|e| e.key == "yacht"));
    }

    #[test]
    fn test_validate_form_accepts_zero_and_returns_schema_order() {
        let mut form = FormValues::new();
        form.insert("savings".to_string(), dec!(0));
        form.insert("salary_income".to_string(), dec!(3000));

        let fields = validate_form(&form).unwrap();

        assert_eq!(
            fields,
            vec![
                (BudgetField::SalaryIncome, dec!(3000)),
                (BudgetField::Savings, dec!(0)),
            ]
        );
    }

    #[test]
    fn test_max_amount_matches_column_precision() {
        assert_eq!(MAX_AMOUNT, dec!(999999999999999.9999));
    }

    #[rstest]
    #[case(dec!(0), None)]
    #[case(dec!(412.30), None)]
    #[case(dec!(1.50000), None)]
    #[case(dec!(999999999999999.9999), None)]
    #[case(dec!(-0.01), Some("must be zero or greater"))]
    #[case(dec!(1000000000000000), Some("must be at most 999999999999999.9999"))]
    #[case(Decimal::MAX, Some("must be at most 999999999999999.9999"))]
    #[case(dec!(0.00005), Some("must have at most 4 decimal places"))]
    fn test_non_negative_constraint(#[case] value: Decimal, #[case] expected: Option<&str>) {
        assert_eq!(Constraint::NonNegative.check(value), expected);
    }

    #[test]
    fn test_unstorable_amounts_rejected_before_summing() {
        let mut form = FormValues::new();
        form.insert("salary_income".to_string(), Decimal::MAX);
        form.insert("bonus_income".to_string(), dec!(1));

        let errors = amounts_from_form(&form).unwrap_err();

        assert_eq!(errors.0.len(), 1);
        assert_eq!(errors.0[0].key, "salary_income");
    }

    #[test]
    fn test_income_total_must_fit_column() {
        let mut form = FormValues::new();
        form.insert("salary_income".to_string(), MAX_AMOUNT);
        form.insert("bonus_income".to_string(), MAX_AMOUNT);

        assert!(validate_form(&form).is_ok());
        let errors = amounts_from_form(&form).unwrap_err();
        assert_eq!(errors.0[0].key, "total_income");
    }

    #[test]
    fn test_sub_cent_precision_rejected() {
        let mut form = FormValues::new();
        for key in ["salary_income", "bonus_income", "extra_income"] {
            form.insert(key.to_string(), dec!(0.00005));
        }

        let errors = validate_form(&form).unwrap_err();
        assert_eq!(errors.0.len(), 3);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let mut form = FormValues::new();
        form.insert("rent".to_string(), dec!(950));

        let amounts = amounts_from_form(&form).unwrap();

        assert_eq!(amounts.rent, dec!(950));
        assert_eq!(amounts.salary_income, Decimal::ZERO);
        assert_eq!(amounts.total_income(), Decimal::ZERO);
    }

    #[test]
    fn test_schema_lookup_matches_declaration_order() {
        for (index, spec) in FIELD_SCHEMA.iter().enumerate() {
            assert_eq!(spec.field as usize, index);
            assert_eq!(BudgetField::from_key(spec.key), Some(spec.field));
            assert_eq!(spec.actual_key, format!("actual_{}", spec.key));
        }
    }

    #[test]
    fn test_amounts_deserialize_missing_as_zero() {
        let amounts: Amounts = serde_json::from_str(r#"{"rent":"1000"}"#).unwrap();
        assert_eq!(amounts.rent, dec!(1000));
        assert_eq!(amounts.savings, Decimal::ZERO);
    }
}
