//! Spending limits per category over a period of time.

mod domain;
mod form;
mod queries;
mod service;

pub use domain::{Budget, BudgetId, BudgetUpdate, NewBudget};
pub use form::{BudgetForm, MAX_BUDGET_NAME_LENGTH};
pub use queries::BudgetQueries;
pub use service::BudgetService;
