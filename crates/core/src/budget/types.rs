//! Budget data types.

use std::fmt;
use std::str::FromStr;

use budgetly_shared::types::{BudgetId, UserId};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use super::error::BudgetError;
use super::schema::{BudgetField, FIELD_SCHEMA, Section};

/// A calendar month a budget belongs to.
///
/// Always valid: month is 1..=12 and year is within
/// [`BudgetMonth::MIN_YEAR`]..=[`BudgetMonth::MAX_YEAR`]. Serializes as
/// `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BudgetMonth {
    year: i32,
    month: u32,
}

impl BudgetMonth {
    /// Earliest accepted year.
    pub const MIN_YEAR: i32 = 2000;
    /// Latest accepted year.
    pub const MAX_YEAR: i32 = 2100;

    /// Creates a month, validating both components.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidMonth` or `BudgetError::InvalidYear`.
    pub fn new(year: i32, month: u32) -> Result<Self, BudgetError> {
        if !(1..=12).contains(&month) {
            return Err(BudgetError::InvalidMonth(month));
        }
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            return Err(BudgetError::InvalidYear(year));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidYear` for dates outside the supported range.
    pub fn from_date(date: NaiveDate) -> Result<Self, BudgetError> {
        Self::new(date.year(), date.month())
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Calendar month, 1..=12.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Two-digit month code, e.g. `"03"`.
    #[must_use]
    pub fn code(self) -> String {
        format!("{:02}", self.month)
    }

    /// The month before this one, if still in range.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        if self.month == 1 {
            Self::new(self.year - 1, 12).ok()
        } else {
            Self::new(self.year, self.month - 1).ok()
        }
    }

    /// The month after this one, if still in range.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        if self.month == 12 {
            Self::new(self.year + 1, 1).ok()
        } else {
            Self::new(self.year, self.month + 1).ok()
        }
    }
}

impl fmt::Display for BudgetMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

impl FromStr for BudgetMonth {
    type Err = BudgetError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| BudgetError::MalformedMonth(s.to_string()))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| BudgetError::MalformedMonth(s.to_string()))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| BudgetError::MalformedMonth(s.to_string()))?;
        Self::new(year, month)
    }
}

impl Serialize for BudgetMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BudgetMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// One amount per budget category.
///
/// Used for both the planned and the actual side of a budget. Missing
/// categories deserialize as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Amounts {
    /// Salary income.
    pub salary_income: Decimal,
    /// Bonus income.
    pub bonus_income: Decimal,
    /// Extra income.
    pub extra_income: Decimal,
    /// Rent.
    pub rent: Decimal,
    /// Utilities.
    pub utilities: Decimal,
    /// Groceries.
    pub groceries: Decimal,
    /// Transport.
    pub transport: Decimal,
    /// Entertainment.
    pub entertainment: Decimal,
    /// Shopping.
    pub shopping: Decimal,
    /// Miscellaneous.
    pub miscellaneous: Decimal,
    /// Expenses paid in the foreign currency, converted to the primary one.
    pub foreign_expenses: Decimal,
    /// Savings.
    pub savings: Decimal,
}

impl Amounts {
    /// All categories at zero.
    pub const ZERO: Self = Self {
        salary_income: Decimal::ZERO,
        bonus_income: Decimal::ZERO,
        extra_income: Decimal::ZERO,
        rent: Decimal::ZERO,
        utilities: Decimal::ZERO,
        groceries: Decimal::ZERO,
        transport: Decimal::ZERO,
        entertainment: Decimal::ZERO,
        shopping: Decimal::ZERO,
        miscellaneous: Decimal::ZERO,
        foreign_expenses: Decimal::ZERO,
        savings: Decimal::ZERO,
    };

    /// Reads one category.
    #[must_use]
    pub const fn get(&self, field: BudgetField) -> Decimal {
        match field {
            BudgetField::SalaryIncome => self.salary_income,
            BudgetField::BonusIncome => self.bonus_income,
            BudgetField::ExtraIncome => self.extra_income,
            BudgetField::Rent => self.rent,
            BudgetField::Utilities => self.utilities,
            BudgetField::Groceries => self.groceries,
            BudgetField::Transport => self.transport,
            BudgetField::Entertainment => self.entertainment,
            BudgetField::Shopping => self.shopping,
            BudgetField::Miscellaneous => self.miscellaneous,
            BudgetField::ForeignExpenses => self.foreign_expenses,
            BudgetField::Savings => self.savings,
        }
    }

    /// Writes one category.
    pub fn set(&mut self, field: BudgetField, value: Decimal) {
        let slot = match field {
            BudgetField::SalaryIncome => &mut self.salary_income,
            BudgetField::BonusIncome => &mut self.bonus_income,
            BudgetField::ExtraIncome => &mut self.extra_income,
            BudgetField::Rent => &mut self.rent,
            BudgetField::Utilities => &mut self.utilities,
            BudgetField::Groceries => &mut self.groceries,
            BudgetField::Transport => &mut self.transport,
            BudgetField::Entertainment => &mut self.entertainment,
            BudgetField::Shopping => &mut self.shopping,
            BudgetField::Miscellaneous => &mut self.miscellaneous,
            BudgetField::ForeignExpenses => &mut self.foreign_expenses,
            BudgetField::Savings => &mut self.savings,
        };
        *slot = value;
    }

    /// Returns a copy with one category replaced.
    #[must_use]
    pub fn with(mut self, field: BudgetField, value: Decimal) -> Self {
        self.set(field, value);
        self
    }

    /// Iterates categories in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (BudgetField, Decimal)> + '_ {
        FIELD_SCHEMA
            .iter()
            .map(move |spec| (spec.field, self.get(spec.field)))
    }

    /// Sum of the categories in one section, saturating at the decimal
    /// bounds.
    #[must_use]
    pub fn section_total(&self, section: Section) -> Decimal {
        self.iter()
            .filter(|(field, _)| field.section() == section)
            .fold(Decimal::ZERO, |total, (_, value)| total.saturating_add(value))
    }

    /// Sum of the income categories.
    #[must_use]
    pub fn total_income(&self) -> Decimal {
        self.section_total(Section::Income)
    }
}

/// The user's reusable planned-budget baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetTemplate {
    /// Row ID.
    pub id: BudgetId,
    /// Owning user.
    pub user_id: UserId,
    /// Planned amounts copied into every materialized month.
    pub planned: Amounts,
    /// Sum of planned income, computed when the template was written.
    pub total_income: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A concrete budget for one (user, month).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBudget {
    /// Row ID.
    pub id: BudgetId,
    /// Owning user.
    pub user_id: UserId,
    /// Month the budget covers.
    pub month: BudgetMonth,
    /// Planned amounts, frozen at materialization.
    pub planned: Amounts,
    /// Observed amounts, updated by the user over the month.
    pub actual: Amounts,
    /// Sum of planned income, computed at write time.
    pub total_income: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a monthly budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMonthlyBudget {
    /// Owning user.
    pub user_id: UserId,
    /// Target month.
    pub month: BudgetMonth,
    /// Planned amounts.
    pub planned: Amounts,
    /// Initial actual amounts.
    pub actual: Amounts,
    /// Sum of planned income.
    pub total_income: Decimal,
}
