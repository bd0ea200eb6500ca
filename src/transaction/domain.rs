//! Core transaction domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{category::CategoryId, date::iso_date};

/// Server identifier for a transaction.
pub type TransactionId = i64;

/// Whether money was earned or spent.
///
/// Sent over the wire as `0` for income and `1` for expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TransactionType {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl TransactionType {
    /// All transaction types in display order.
    pub const ALL: [TransactionType; 2] = [TransactionType::Income, TransactionType::Expense];
}

impl TryFrom<u8> for TransactionType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TransactionType::Income),
            1 => Ok(TransactionType::Expense),
            other => Err(format!("invalid transaction type {other}")),
        }
    }
}

impl From<TransactionType> for u8 {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Income => 0,
            TransactionType::Expense => 1,
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "0" => Ok(TransactionType::Income),
            "expense" | "1" => Ok(TransactionType::Expense),
            other => Err(format!("invalid transaction type \"{other}\"")),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "Income"),
            TransactionType::Expense => write!(f, "Expense"),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned, always positive.
    pub amount: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// The name of the category, filled in by the server.
    #[serde(default)]
    pub category_name: String,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// When the server created the transaction.
    #[serde(default)]
    pub created_at: String,
    /// When the server last updated the transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// The fields sent to the API to create a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned, always positive.
    pub amount: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The fields sent to the API to update a transaction, which are the same as
/// the ones used to create it.
pub type TransactionUpdate = NewTransaction;

impl From<&Transaction> for NewTransaction {
    fn from(transaction: &Transaction) -> Self {
        Self {
            date: transaction.date,
            description: transaction.description.clone(),
            amount: transaction.amount,
            transaction_type: transaction.transaction_type,
            category_id: transaction.category_id,
            notes: transaction.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use crate::transaction::{NewTransaction, Transaction, TransactionType};

    #[test]
    fn type_uses_numeric_wire_format() {
        assert_eq!(serde_json::to_value(TransactionType::Income).unwrap(), json!(0));
        assert_eq!(serde_json::to_value(TransactionType::Expense).unwrap(), json!(1));
        assert!(serde_json::from_value::<TransactionType>(json!(2)).is_err());
    }

    #[test]
    fn type_parses_names_and_numbers() {
        assert_eq!("income".parse(), Ok(TransactionType::Income));
        assert_eq!("Expense".parse(), Ok(TransactionType::Expense));
        assert_eq!("1".parse(), Ok(TransactionType::Expense));
        assert!("transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn deserializes_server_transaction() {
        let body = json!({
            "id": 7,
            "date": "2025-01-10T00:00:00",
            "description": "Groceries",
            "amount": 42.5,
            "type": 1,
            "categoryId": 3,
            "categoryName": "Groceries",
            "createdAt": "2025-01-10T08:00:00Z"
        });

        let transaction: Transaction = serde_json::from_value(body).unwrap();

        assert_eq!(transaction.id, 7);
        assert_eq!(transaction.date, date!(2025 - 01 - 10));
        assert_eq!(transaction.transaction_type, TransactionType::Expense);
        assert_eq!(transaction.category_name, "Groceries");
        assert_eq!(transaction.notes, None);
        assert_eq!(transaction.updated_at, None);
    }

    #[test]
    fn serializes_new_transaction_in_camel_case() {
        let new_transaction = NewTransaction {
            date: date!(2025 - 01 - 10),
            description: "Groceries".to_owned(),
            amount: 42.5,
            transaction_type: TransactionType::Expense,
            category_id: 3,
            notes: None,
        };

        assert_eq!(
            serde_json::to_value(&new_transaction).unwrap(),
            json!({
                "date": "2025-01-10",
                "description": "Groceries",
                "amount": 42.5,
                "type": 1,
                "categoryId": 3
            })
        );
    }
}
