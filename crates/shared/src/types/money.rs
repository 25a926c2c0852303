//! Amounts tagged with their currency.
//!
//! Amounts are `rust_decimal::Decimal`; floats never touch money.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount in major units (euros, not cents) of one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in major units.
    pub amount: Decimal,
    /// Currency of `amount`.
    pub currency: Currency,
}

impl Money {
    /// Tags `amount` with `currency`.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Currencies a budget can be kept or spent in, serialized as ISO 4217 codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Euro
    Eur,
    /// US Dollar
    Usd,
    /// Brazilian Real
    Brl,
    /// Pound Sterling
    Gbp,
}

impl Currency {
    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
            Self::Brl => "BRL",
            Self::Gbp => "GBP",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    /// Parses an ISO 4217 code, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Eur, Self::Usd, Self::Brl, Self::Gbp]
            .into_iter()
            .find(|currency| currency.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown currency: {s}"))
    }
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
