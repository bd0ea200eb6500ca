//! Typed calls to the `/budgets` endpoints.

use crate::{
    api_error::ApiError,
    budget::{Budget, BudgetId, BudgetUpdate, NewBudget},
    client::ApiClient,
};

const PATH: &str = "budgets";

/// Reads and writes budgets through the finance API.
#[derive(Debug, Clone)]
pub struct BudgetService {
    client: ApiClient,
}

impl BudgetService {
    /// Create a service that sends its requests through `client`.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Get every budget.
    pub async fn get_all(&self) -> Result<Vec<Budget>, ApiError> {
        self.client.get(PATH).await
    }

    /// Get the budget with `id`.
    pub async fn get_by_id(&self, id: BudgetId) -> Result<Budget, ApiError> {
        self.client.get(&format!("{PATH}/{id}")).await
    }

    /// Create a budget and return it as the server stored it.
    pub async fn create(&self, budget: &NewBudget) -> Result<Budget, ApiError> {
        self.client.post(PATH, budget).await
    }

    /// Change the fields set in `update` on the budget with `id`.
    pub async fn update(&self, id: BudgetId, update: &BudgetUpdate) -> Result<Budget, ApiError> {
        self.client.put(&format!("{PATH}/{id}"), update).await
    }

    /// Delete the budget with `id`.
    pub async fn delete(&self, id: BudgetId) -> Result<(), ApiError> {
        self.client.delete(&format!("{PATH}/{id}")).await
    }
}
