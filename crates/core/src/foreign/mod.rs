//! Expenses paid in a second currency.
//!
//! Items are entered in the foreign currency, summed and converted into the
//! primary currency with a user supplied rate. The converted total becomes
//! the actual foreign-expense amount of the month's budget.

pub mod conversion;
pub mod types;

#[cfg(test)]
mod props;

pub use conversion::{ConversionError, ForeignConversion, PRIMARY_DECIMAL_PLACES};
pub use types::{ForeignExpenseItem, ForeignExpenseLedger, NewForeignLedger};
