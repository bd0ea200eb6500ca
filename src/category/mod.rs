//! Categories for grouping transactions.
//!
//! Every user starts with a set of predefined categories which cannot be
//! edited or deleted. Custom categories can be, as long as no transaction
//! uses them.

mod domain;
mod form;
mod queries;
mod service;

pub use domain::{
    Category, CategoryId, CategoryType, CategoryUpdate, NewCategory, selectable_categories,
};
pub use form::{CategoryForm, MAX_CATEGORY_NAME_LENGTH};
pub use queries::CategoryQueries;
pub use service::CategoryService;
