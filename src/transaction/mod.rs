//! Income and expense transactions.
//!
//! This module contains everything related to transactions:
//! - The [Transaction] model and the payloads used to create and update one
//! - The [TransactionService] for the `/transactions` endpoints
//! - [TransactionQueries] for cached reads and invalidating mutations
//! - The [TransactionForm] and its validation rules

mod domain;
mod form;
mod queries;
mod service;

pub use domain::{NewTransaction, Transaction, TransactionId, TransactionType, TransactionUpdate};
pub use form::{MAX_DESCRIPTION_LENGTH, MAX_NOTES_LENGTH, TransactionForm};
pub use queries::TransactionQueries;
pub use service::TransactionService;
