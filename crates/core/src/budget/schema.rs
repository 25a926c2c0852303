//! Declarative description of the budget categories.
//!
//! [`FIELD_SCHEMA`] is the single list that drives form validation, the
//! storage column names and the labels shown to the user.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::{FieldError, ValidationErrors};
use super::types::Amounts;

/// A budget category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetField {
    /// Salary income.
    SalaryIncome,
    /// Bonus income.
    BonusIncome,
    /// Extra income.
    ExtraIncome,
    /// Rent.
    Rent,
    /// Utilities.
    Utilities,
    /// Groceries.
    Groceries,
    /// Transport.
    Transport,
    /// Entertainment.
    Entertainment,
    /// Shopping.
    Shopping,
    /// Miscellaneous.
    Miscellaneous,
    /// Foreign-currency expenses, converted.
    ForeignExpenses,
    /// Savings.
    Savings,
}

/// Grouping used for totals and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
    /// Money set aside.
    Savings,
}

/// Decimal places an amount may carry (`NUMERIC(19,4)`).
pub const AMOUNT_SCALE: u32 = 4;

/// Largest amount a `NUMERIC(19,4)` column holds: 999999999999999.9999.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x89E7_FFFF, 0x8AC7_2304, 0, false, AMOUNT_SCALE);

/// Rule an amount must satisfy.
///
/// Every rule also bounds the amount to [`MAX_AMOUNT`] and
/// [`AMOUNT_SCALE`] decimal places, so stored values equal submitted ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Zero or more.
    NonNegative,
}

impl Constraint {
    /// Checks a value, returning the violation message.
    #[must_use]
    pub fn check(self, value: Decimal) -> Option<&'static str> {
        match self {
            Self::NonNegative if value.is_sign_negative() && !value.is_zero() => {
                Some("must be zero or greater")
            }
            Self::NonNegative => check_storable(value),
        }
    }
}

/// Checks that `value` fits a `NUMERIC(19,4)` column without rounding.
#[must_use]
pub fn check_storable(value: Decimal) -> Option<&'static str> {
    if value.abs() > MAX_AMOUNT {
        Some("must be at most 999999999999999.9999")
    } else if value.normalize().scale() > AMOUNT_SCALE {
        Some("must have at most 4 decimal places")
    } else {
        None
    }
}

/// Schema entry for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Category.
    pub field: BudgetField,
    /// Form key and planned-amount column.
    pub key: &'static str,
    /// Actual-amount column.
    pub actual_key: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Section.
    pub section: Section,
    /// Validation rule.
    pub constraint: Constraint,
}

const fn spec(
    field: BudgetField,
    key: &'static str,
    actual_key: &'static str,
    label: &'static str,
    section: Section,
) -> FieldSpec {
    FieldSpec {
        field,
        key,
        actual_key,
        label,
        section,
        constraint: Constraint::NonNegative,
    }
}

/// Every budget category, in display order.
#[rustfmt::skip]
pub const FIELD_SCHEMA: [FieldSpec; 12] = [
    spec(BudgetField::SalaryIncome, "salary_income", "actual_salary_income", "Salary Income", Section::Income),
    spec(BudgetField::BonusIncome, "bonus_income", "actual_bonus_income", "Bonus Income", Section::Income),
    spec(BudgetField::ExtraIncome, "extra_income", "actual_extra_income", "Extra Income", Section::Income),
    spec(BudgetField::Rent, "rent", "actual_rent", "Rent", Section::Expense),
    spec(BudgetField::Utilities, "utilities", "actual_utilities", "Utilities", Section::Expense),
    spec(BudgetField::Groceries, "groceries", "actual_groceries", "Groceries", Section::Expense),
    spec(BudgetField::Transport, "transport", "actual_transport", "Transport", Section::Expense),
    spec(BudgetField::Entertainment, "entertainment", "actual_entertainment", "Entertainment", Section::Expense),
    spec(BudgetField::Shopping, "shopping", "actual_shopping", "Shopping", Section::Expense),
    spec(BudgetField::Miscellaneous, "miscellaneous", "actual_miscellaneous", "Miscellaneous", Section::Expense),
    spec(BudgetField::ForeignExpenses, "foreign_expenses", "actual_foreign_expenses", "Foreign Expenses (Total)", Section::Expense),
    spec(BudgetField::Savings, "savings", "actual_savings", "Savings", Section::Savings),
];

impl BudgetField {
    /// Schema entry of this category.
    #[must_use]
    pub fn spec(self) -> &'static FieldSpec {
        // The schema lists every variant exactly once, in declaration order.
        &FIELD_SCHEMA[self as usize]
    }

    /// Form key and planned-amount column.
    #[must_use]
    pub fn key(self) -> &'static str {
        self.spec().key
    }

    /// Actual-amount column.
    #[must_use]
    pub fn actual_key(self) -> &'static str {
        self.spec().actual_key
    }

    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        self.spec().label
    }

    /// Section.
    #[must_use]
    pub fn section(self) -> Section {
        self.spec().section
    }

    /// Looks a category up by form key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        FIELD_SCHEMA
            .iter()
            .find(|spec| spec.key == key)
            .map(|spec| spec.field)
    }
}

/// Raw form input: category key to amount.
pub type FormValues = BTreeMap<String, Decimal>;

/// Validates form input against the schema.
///
/// Returns the recognised categories in schema order. Every problem is
/// collected rather than stopping at the first.
///
/// # Errors
///
/// Returns `ValidationErrors` for unknown keys and constraint violations.
pub fn validate_form(values: &FormValues) -> Result<Vec<(BudgetField, Decimal)>, ValidationErrors> {
    let mut errors = Vec::new();
    let mut fields = Vec::with_capacity(values.len());

    for (key, value) in values {
        match BudgetField::from_key(key) {
            None => errors.push(FieldError::new(key, "is not a budget category")),
            Some(field) => match field.spec().constraint.check(*value) {
                Some(message) => errors.push(FieldError::new(key, message)),
                None => fields.push((field, *value)),
            },
        }
    }

    if errors.is_empty() {
        fields.sort_by_key(|(field, _)| *field);
        Ok(fields)
    } else {
        Err(ValidationErrors(errors))
    }
}

/// Validates a full form; categories left out are zero.
///
/// The income total is stored alongside the categories, so it must fit
/// the same column type.
///
/// # Errors
///
/// Returns `ValidationErrors` for unknown keys, constraint violations and
/// an income total that cannot be stored.
pub fn amounts_from_form(values: &FormValues) -> Result<Amounts, ValidationErrors> {
    let mut amounts = Amounts::ZERO;
    for (field, value) in validate_form(values)? {
        amounts.set(field, value);
    }
    if let Some(message) = check_storable(amounts.total_income()) {
        return Err(ValidationErrors(vec![FieldError::new("total_income", message)]));
    }
    Ok(amounts)
}

/// Converts amounts back into form values, e.g. to pre-fill an edit form.
#[must_use]
pub fn form_from_amounts(amounts: &Amounts) -> FormValues {
    amounts
        .iter()
        .map(|(field, value)| (field.key().to_string(), value))
        .collect()
}
