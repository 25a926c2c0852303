//! Foreign to primary currency conversion.
//!
//! CRITICAL: the rate is quoted as foreign units per primary unit, so the
//! converted amount is a division. Results are rounded with banker's
//! rounding to the storage precision.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use super::types::ForeignExpenseItem;
use crate::budget::{MAX_AMOUNT, check_storable};

/// Decimal places kept for converted amounts (matches `NUMERIC(19,4)`).
pub const PRIMARY_DECIMAL_PLACES: u32 = 4;

/// Decimal places an exchange rate may carry (`NUMERIC(19,8)`).
pub const RATE_DECIMAL_PLACES: u32 = 8;

/// Largest storable exchange rate: 99999999999.99999999.
pub const MAX_RATE: Decimal =
    Decimal::from_parts(0x89E7_FFFF, 0x8AC7_2304, 0, false, RATE_DECIMAL_PLACES);

/// Errors raised while converting foreign expenses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// Rate was zero or negative.
    #[error("Exchange rate must be greater than zero, got {0}")]
    InvalidRate(Decimal),

    /// An item had a negative amount.
    #[error("Amount for '{label}' must be zero or greater, got {amount}")]
    NegativeAmount {
        /// Item label.
        label: String,
        /// Offending amount.
        amount: Decimal,
    },

    /// An item amount cannot be stored as entered.
    #[error("Amount for '{label}' {message}")]
    UnstorableAmount {
        /// Item label.
        label: String,
        /// What is wrong with the amount.
        message: &'static str,
    },

    /// Rate has more than 8 decimal places or exceeds the storable range.
    #[error("Exchange rate {0} cannot be stored; at most 8 decimal places and 99999999999.99999999")]
    UnstorableRate(Decimal),

    /// An item had no label.
    #[error("Expense item {0} has an empty label")]
    EmptyLabel(usize),

    /// The sum or quotient does not fit a stored amount.
    #[error("Foreign expense total is too large")]
    Overflow,
}

/// Totals of a set of foreign expense items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignConversion {
    /// Sum in the foreign currency.
    pub total_foreign: Decimal,
    /// Sum in the primary currency.
    pub total_primary: Decimal,
}

impl ForeignConversion {
    /// Validates the items and rate, then converts.
    ///
    /// The rate is checked first so a bad rate is reported even when items
    /// are also wrong.
    pub fn compute(items: &[ForeignExpenseItem], rate: Decimal) -> Result<Self, ConversionError> {
        if rate <= Decimal::ZERO {
            return Err(ConversionError::InvalidRate(rate));
        }
        if rate > MAX_RATE || rate.normalize().scale() > RATE_DECIMAL_PLACES {
            return Err(ConversionError::UnstorableRate(rate));
        }

        let mut total_foreign = Decimal::ZERO;
        for (index, item) in items.iter().enumerate() {
            if item.label.trim().is_empty() {
                return Err(ConversionError::EmptyLabel(index));
            }
            if item.amount.is_sign_negative() && !item.amount.is_zero() {
                return Err(ConversionError::NegativeAmount {
                    label: item.label.clone(),
                    amount: item.amount,
                });
            }
            if let Some(message) = check_storable(item.amount) {
                return Err(ConversionError::UnstorableAmount {
                    label: item.label.clone(),
                    message,
                });
            }
            total_foreign = total_foreign
                .checked_add(item.amount)
                .ok_or(ConversionError::Overflow)?;
        }

        let total_primary = to_primary(total_foreign, rate)?;
        if total_foreign > MAX_AMOUNT || total_primary > MAX_AMOUNT {
            return Err(ConversionError::Overflow);
        }

        Ok(Self {
            total_foreign,
            total_primary,
        })
    }
}

/// Converts a foreign amount with a foreign-per-primary rate.
pub fn to_primary(amount: Decimal, rate: Decimal) -> Result<Decimal, ConversionError> {
    if rate <= Decimal::ZERO {
        return Err(ConversionError::InvalidRate(rate));
    }
    amount
        .checked_div(rate)
        .map(|value| {
            value.round_dp_with_strategy(PRIMARY_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven)
        })
        .ok_or(ConversionError::Overflow)
}
