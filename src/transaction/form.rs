//! Validation of the transaction create and edit forms.

use time::Date;

use crate::{
    date::format_iso_date,
    transaction::{NewTransaction, Transaction, TransactionType},
    validation::{ValidationErrors, amount, positive_id, required_date, required_text, text_length},
};

/// The longest description the API accepts.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

/// The longest notes the API accepts.
pub const MAX_NOTES_LENGTH: usize = 500;

/// The transaction form as the user typed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionForm {
    /// The date as `YYYY-MM-DD`.
    pub date: String,
    /// What the transaction was for.
    pub description: String,
    /// The amount, e.g. "42.50".
    pub amount: String,
    /// "income" or "expense".
    pub transaction_type: String,
    /// The ID of the chosen category.
    pub category_id: String,
    /// Optional notes, an empty string means none.
    pub notes: String,
}

impl TransactionForm {
    /// Check every field and build the payload to send to the API.
    ///
    /// `today` is the current date in the user's timezone, transactions
    /// cannot be dated after it.
    ///
    /// # Errors
    ///
    /// Returns the [ValidationErrors] for every invalid field.
    pub fn validate(&self, today: Date) -> Result<NewTransaction, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let date = required_date(&mut errors, "date", &self.date, "Date is required");
        if date.is_some_and(|date| date > today) {
            errors.add("date", "Date cannot be in the future");
        }

        let description = required_text(
            &mut errors,
            "description",
            &self.description,
            MAX_DESCRIPTION_LENGTH,
            "Description is required",
            "Description must be less than 200 characters",
        );

        let amount = amount(&mut errors, "amount", &self.amount);

        let transaction_type = self.transaction_type.parse::<TransactionType>();
        if transaction_type.is_err() {
            errors.add("type", "Invalid transaction type");
        }

        let category_id = positive_id(
            &mut errors,
            "categoryId",
            &self.category_id,
            "Category is required",
        );

        let notes = self.notes.trim();
        if text_length(notes) > MAX_NOTES_LENGTH {
            errors.add("notes", "Notes must be less than 500 characters");
        }

        match (date, transaction_type) {
            (Some(date), Ok(transaction_type)) => errors.into_result(|| NewTransaction {
                date,
                description,
                amount,
                transaction_type,
                category_id,
                notes: (!notes.is_empty()).then(|| notes.to_owned()),
            }),
            _ => Err(errors),
        }
    }
}

impl From<&Transaction> for TransactionForm {
    /// Fill the edit form with the current values of `transaction`.
    fn from(transaction: &Transaction) -> Self {
        Self {
            date: format_iso_date(transaction.date),
            description: transaction.description.clone(),
            amount: format!("{:.2}", transaction.amount),
            transaction_type: transaction.transaction_type.to_string(),
            category_id: transaction.category_id.to_string(),
            notes: transaction.notes.clone().unwrap_or_default(),
        }
    }
}
