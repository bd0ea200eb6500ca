use serde::{Deserialize, Serialize};
use time::Date;

use crate::{category::CategoryId, date::iso_date};

/// Server identifier for a budget.
pub type BudgetId = i64;

/// A limit on spending in one category over a period of time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The display name.
    pub name: String,
    /// The most that should be spent over the period.
    pub amount: f64,
    /// The first day of the period.
    #[serde(with = "iso_date")]
    pub start_date: Date,
    /// The last day of the period.
    #[serde(with = "iso_date")]
    pub end_date: Date,
    /// The category whose spending counts against the budget.
    pub category_id: CategoryId,
    /// When the server created the budget.
    #[serde(default)]
    pub created_at: String,
    /// When the server last updated the budget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// The fields sent to the API to create a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    /// The display name.
    pub name: String,
    /// The most that should be spent over the period.
    pub amount: f64,
    /// The first day of the period.
    #[serde(with = "iso_date")]
    pub start_date: Date,
    /// The last day of the period.
    #[serde(with = "iso_date")]
    pub end_date: Date,
    /// The category whose spending counts against the budget.
    pub category_id: CategoryId,
}

/// A partial update to a budget, only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    /// The new display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The new amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// The new first day of the period.
    #[serde(
        default,
        with = "iso_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<Date>,
    /// The new last day of the period.
    #[serde(
        default,
        with = "iso_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<Date>,
    /// The new category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}
