//! Budget workflows for an authenticated user.

pub mod error;
pub mod service;


pub use error::PlannerError;
pub use service::{BudgetPlanner, CurrencyPair, TemplateSubmission};
