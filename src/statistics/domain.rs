//! Aggregates the API computes from transactions.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{category::CategoryId, date::iso_date, transaction::TransactionType};

/// Totals over every transaction in a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses, as a positive number.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub balance: f64,
    /// How many transactions were counted.
    pub transaction_count: u64,
}

/// Totals for the transactions in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStatistic {
    /// The ID of the category.
    pub category_id: CategoryId,
    /// The name of the category.
    pub category_name: String,
    /// Whether the totals are income or expenses.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The sum of the transaction amounts.
    pub total_amount: f64,
    /// How many transactions were counted.
    pub transaction_count: u64,
}

/// Totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStatistic {
    /// The year, e.g. 2025.
    pub year: i32,
    /// The month, 1 for January.
    pub month: u8,
    /// The English name of the month, e.g. "January".
    pub month_name: String,
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses, as a positive number.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub balance: f64,
    /// How many transactions were counted.
    pub transaction_count: u64,
}

/// An inclusive, optionally open-ended, range of dates to compute statistics over.
///
/// Sent as the `startDate` and `endDate` query parameters, a missing bound
/// is left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DateRange {
    /// The first date to include.
    #[serde(
        rename = "startDate",
        default,
        with = "iso_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start: Option<Date>,
    /// The last date to include.
    #[serde(
        rename = "endDate",
        default,
        with = "iso_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<Date>,
}

impl DateRange {
    /// A range covering every date.
    pub fn all() -> Self {
        Self::default()
    }

    /// A range from `start` to `end`, both inclusive.
    pub fn new(start: Option<Date>, end: Option<Date>) -> Self {
        Self { start, end }
    }

    /// Whether `date` falls in the range.
    pub fn contains(&self, date: Date) -> bool {
        self.start.is_none_or(|start| start <= date) && self.end.is_none_or(|end| date <= end)
    }
}
