//! Field-level validation shared by the forms.
//!
//! The rules mirror the ones the finance API enforces, so a form that passes
//! here should not be rejected by the server for the same reason.

use std::fmt::Display;

use time::Date;

use crate::date::parse_iso_date;

/// The largest amount of money the API accepts for a transaction or budget.
pub const MAX_AMOUNT: f64 = 999_999_999.99;

/// A validation failure for a single form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The name of the field as the API calls it, e.g. "categoryId".
    pub field: &'static str,
    /// The message to show next to the field.
    pub message: String,
}

/// The validation failures for a form, at most one per field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Create an empty set of errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field`, unless the field already has an error.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.0.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    /// The error message for `field`, if there is one.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    /// Whether no field has an error.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of fields with an error.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The errors in the order they were found.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(value)` if there are no errors, otherwise `Err(self)`.
    pub(crate) fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages = self
            .0
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect::<Vec<_>>();

        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// The length of `text` as the API measures it, in UTF-16 code units.
pub(crate) fn text_length(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Check a required, length-limited text field and return the trimmed text.
pub(crate) fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    text: &str,
    max_length: usize,
    required_message: &str,
    too_long_message: &str,
) -> String {
    let text = text.trim();

    if text.is_empty() {
        errors.add(field, required_message);
    } else if text_length(text) > max_length {
        errors.add(field, too_long_message);
    }

    text.to_owned()
}

/// Check an amount of money typed into a form.
///
/// Returns the parsed amount, or 0 if there was an error.
pub(crate) fn amount(errors: &mut ValidationErrors, field: &'static str, text: &str) -> f64 {
    let text = text.trim();

    if text.is_empty() {
        errors.add(field, "Amount is required");
        return 0.0;
    }

    match text.parse::<f64>() {
        Ok(amount) if !amount.is_finite() => {
            errors.add(field, "Amount must be a number");
            0.0
        }
        Ok(amount) if amount <= 0.0 => {
            errors.add(field, "Amount must be greater than 0");
            0.0
        }
        Ok(amount) if amount > MAX_AMOUNT => {
            errors.add(field, "Amount is too large");
            0.0
        }
        Ok(amount) => amount,
        Err(_) => {
            errors.add(field, "Amount must be a number");
            0.0
        }
    }
}

/// Check a reference to another resource, which must be a positive integer.
///
/// Returns the parsed ID, or 0 if there was an error.
pub(crate) fn positive_id(
    errors: &mut ValidationErrors,
    field: &'static str,
    text: &str,
    required_message: &str,
) -> i64 {
    let text = text.trim();

    if text.is_empty() {
        errors.add(field, required_message);
        return 0;
    }

    match text.parse::<i64>() {
        Ok(id) if id > 0 => id,
        Ok(_) => {
            errors.add(field, required_message);
            0
        }
        Err(_) => {
            errors.add(field, "Category ID must be an integer");
            0
        }
    }
}

/// Check a required `YYYY-MM-DD` date.
pub(crate) fn required_date(
    errors: &mut ValidationErrors,
    field: &'static str,
    text: &str,
    required_message: &str,
) -> Option<Date> {
    if text.trim().is_empty() {
        errors.add(field, required_message);
        return None;
    }

    optional_date(errors, field, text)
}

/// Check an optional `YYYY-MM-DD` date, where an empty string means no date.
pub(crate) fn optional_date(
    errors: &mut ValidationErrors,
    field: &'static str,
    text: &str,
) -> Option<Date> {
    if text.trim().is_empty() {
        return None;
    }

    let date = parse_iso_date(text);

    if date.is_none() {
        errors.add(field, "Invalid date");
    }

    date
}
