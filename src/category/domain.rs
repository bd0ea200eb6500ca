//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, transaction::TransactionType};

/// Server identifier for a category.
pub type CategoryId = i64;

/// Which kinds of transaction a category can be used for.
///
/// Sent over the wire as `0` for income, `1` for expense and `2` for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CategoryType {
    /// Only income transactions.
    Income,
    /// Only expense transactions.
    Expense,
    /// Any transaction.
    Both,
}

impl CategoryType {
    /// Whether a transaction of `transaction_type` may use a category of this type.
    pub fn accepts(&self, transaction_type: TransactionType) -> bool {
        matches!(
            (self, transaction_type),
            (CategoryType::Both, _)
                | (CategoryType::Income, TransactionType::Income)
                | (CategoryType::Expense, TransactionType::Expense)
        )
    }
}

impl TryFrom<u8> for CategoryType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CategoryType::Income),
            1 => Ok(CategoryType::Expense),
            2 => Ok(CategoryType::Both),
            other => Err(format!("invalid category type {other}")),
        }
    }
}

impl From<CategoryType> for u8 {
    fn from(value: CategoryType) -> Self {
        match value {
            CategoryType::Income => 0,
            CategoryType::Expense => 1,
            CategoryType::Both => 2,
        }
    }
}

impl FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "0" => Ok(CategoryType::Income),
            "expense" | "1" => Ok(CategoryType::Expense),
            "both" | "2" => Ok(CategoryType::Both),
            other => Err(format!("invalid category type \"{other}\"")),
        }
    }
}

impl Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryType::Income => write!(f, "Income"),
            CategoryType::Expense => write!(f, "Expense"),
            CategoryType::Both => write!(f, "Both"),
        }
    }
}

/// A category for grouping transactions (e.g., 'Groceries', 'Salary').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The display name, unique among categories.
    pub name: String,
    /// Which kinds of transaction may use this category.
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    /// `false` for the categories every user starts with.
    pub is_custom: bool,
    /// When the server created the category.
    #[serde(default)]
    pub created_at: String,
}

impl Category {
    /// Whether this is one of the categories that ship with the API.
    pub fn is_predefined(&self) -> bool {
        !self.is_custom
    }

    /// Check that this category may be edited or deleted.
    ///
    /// # Errors
    ///
    /// Returns [Error::PredefinedCategory] for a predefined category.
    pub fn ensure_custom(&self) -> Result<(), Error> {
        if self.is_predefined() {
            Err(Error::PredefinedCategory(self.id))
        } else {
            Ok(())
        }
    }
}

/// The fields sent to the API to create a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    /// The display name.
    pub name: String,
    /// Which kinds of transaction may use the category.
    #[serde(rename = "type")]
    pub category_type: CategoryType,
}

/// The fields sent to the API to update a category, which are the same as
/// the ones used to create it.
pub type CategoryUpdate = NewCategory;

/// The categories a transaction of `transaction_type` may be assigned to,
/// in their original order.
pub fn selectable_categories(
    categories: &[Category],
    transaction_type: TransactionType,
) -> Vec<&Category> {
    categories
        .iter()
        .filter(|category| category.category_type.accepts(transaction_type))
        .collect()
}
