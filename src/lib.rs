//! Fintrack is a client for a personal finance tracking REST API.
//!
//! This library provides the data layer for recording income and expense
//! transactions, organising them under categories, managing budgets and
//! viewing aggregate statistics. It consists of:
//!
//! - an HTTP client that normalises every failure into an [ApiError],
//! - one typed service per REST resource,
//! - a [QueryClient] that caches and de-duplicates reads and invalidates
//!   related reads after a successful mutation,
//! - form validation that mirrors the server's rules.

#![warn(missing_docs)]

mod api;
mod api_error;
mod budget;
mod cache;
mod category;
mod client;
mod config;
mod date;
mod format;
mod invalidation;
mod logging;
mod pagination;
mod statistics;
mod timezone;
mod transaction;
mod validation;

#[cfg(test)]
mod test_utils;

pub use api::FinanceApi;
pub use api_error::{ApiError, ApiErrorKind};
pub use budget::{
    Budget, BudgetForm, BudgetId, BudgetQueries, BudgetService, BudgetUpdate,
    MAX_BUDGET_NAME_LENGTH, NewBudget,
};
pub use cache::{
    CacheConfig, DEFAULT_GC_TIME, DEFAULT_STALE_TIME, KeyPart, QueryClient, QueryKey,
    QueryObserver, QueryState,
};
pub use category::{
    Category, CategoryForm, CategoryId, CategoryQueries, CategoryService, CategoryType,
    CategoryUpdate, MAX_CATEGORY_NAME_LENGTH, NewCategory, selectable_categories,
};
pub use client::ApiClient;
pub use config::{
    API_URL_ENV, ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEZONE, TIMEOUT_ENV, TIMEZONE_ENV,
};
pub use date::{format_date, parse_iso_date};
pub use format::{format_amount_with_sign, format_currency};
pub use invalidation::{Resource, affected_resources, invalidate_after_mutation};
pub use logging::LOG_BODY_LENGTH_LIMIT;
pub use pagination::{
    PageRequest, Paginated, PaginationConfig, PaginationIndicator, create_pagination_indicators,
};
pub use statistics::{
    CategoryStatistic, DateRange, DateRangeForm, MonthlyStatistic, Statistics,
    StatisticsQueries, StatisticsService,
};
pub use timezone::{get_local_offset, today_in};
pub use transaction::{
    MAX_DESCRIPTION_LENGTH, MAX_NOTES_LENGTH, NewTransaction, Transaction, TransactionForm,
    TransactionId, TransactionQueries, TransactionService, TransactionType, TransactionUpdate,
};
pub use validation::{FieldError, MAX_AMOUNT, ValidationErrors};

/// The errors that may occur in the application.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Error {
    /// A request to the finance API failed.
    ///
    /// Transport failures and server rejections share this variant, the
    /// [ApiError::kind] says which one it was.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Form input failed local validation and was never sent to the API.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    /// The client configuration is unusable, e.g. the base URL does not
    /// parse or the timezone is not a canonical timezone name.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not acquire the lock on the query cache.
    #[error("could not acquire the query cache lock")]
    CacheLockError,

    /// A cached value was read back as a different type than it was stored
    /// with.
    ///
    /// This indicates two queries were given the same key, which is a bug in
    /// the caller.
    #[error("the cached value for query \"{0}\" has an unexpected type")]
    QueryTypeMismatch(String),

    /// The query was removed from the cache while a caller was waiting on it.
    #[error("the query \"{0}\" was removed from the cache")]
    QueryCancelled(String),

    /// Predefined categories cannot be edited or deleted.
    #[error("category {0} is predefined and cannot be modified")]
    PredefinedCategory(CategoryId),
}
