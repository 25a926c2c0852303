//! Core business logic for Budgetly.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `budget` - Budget categories, monthly budgets and summaries
//! - `template` - Template editing with overwrite confirmation
//! - `foreign` - Foreign currency expenses and conversion
//! - `store` - Persistence seam and the in-memory store
//! - `planner` - Workflows combining the above for one user

pub mod budget;
pub mod foreign;
pub mod planner;
pub mod store;
pub mod template;

pub use planner::{BudgetPlanner, CurrencyPair, PlannerError, TemplateSubmission};
pub use store::{BudgetStore, InMemoryBudgetStore, StoreError};
