//! Read-only totals over transactions, overall, per category and per month.

mod domain;
mod form;
mod queries;
mod service;

pub use domain::{CategoryStatistic, DateRange, MonthlyStatistic, Statistics};
pub use form::DateRangeForm;
pub use queries::StatisticsQueries;
pub use service::StatisticsService;
