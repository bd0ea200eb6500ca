//! Cached budget reads and the mutations that invalidate them.

use std::sync::Arc;

use crate::{
    Error,
    budget::{Budget, BudgetId, BudgetService, BudgetUpdate, NewBudget},
    cache::{QueryClient, QueryKey, QueryObserver},
    invalidation::{Resource, invalidate_after_mutation},
};

/// Pairs the [BudgetService] with the query cache.
#[derive(Debug, Clone)]
pub struct BudgetQueries {
    service: BudgetService,
    cache: QueryClient,
}

impl BudgetQueries {
    /// Create queries that read through `cache`.
    pub fn new(service: BudgetService, cache: QueryClient) -> Self {
        Self { service, cache }
    }

    /// The key for the list of all budgets.
    pub fn list_key() -> QueryKey {
        Resource::Budgets.key().with("list")
    }

    /// The key for a single budget.
    pub fn detail_key(id: BudgetId) -> QueryKey {
        Resource::Budgets.key().with("detail").with(id)
    }

    /// Get every budget.
    pub async fn budgets(&self) -> Result<Arc<Vec<Budget>>, Error> {
        let service = self.service.clone();

        self.cache
            .fetch_query(Self::list_key(), move || {
                let service = service.clone();
                async move { service.get_all().await }
            })
            .await
    }

    /// Observe the list of budgets.
    pub fn watch_budgets(&self) -> Result<QueryObserver<Vec<Budget>>, Error> {
        let service = self.service.clone();

        self.cache.watch_query(Self::list_key(), move || {
            let service = service.clone();
            async move { service.get_all().await }
        })
    }

    /// Get the budget with `id`.
    pub async fn budget(&self, id: BudgetId) -> Result<Arc<Budget>, Error> {
        let service = self.service.clone();

        self.cache
            .fetch_query(Self::detail_key(id), move || {
                let service = service.clone();
                async move { service.get_by_id(id).await }
            })
            .await
    }

    /// Create a budget, then invalidate budgets.
    pub async fn create(&self, budget: &NewBudget) -> Result<Budget, Error> {
        let created = self.service.create(budget).await?;
        tracing::info!("Created budget {} \"{}\"", created.id, created.name);
        invalidate_after_mutation(&self.cache, Resource::Budgets)?;

        Ok(created)
    }

    /// Update the budget with `id`, then invalidate budgets.
    pub async fn update(&self, id: BudgetId, update: &BudgetUpdate) -> Result<Budget, Error> {
        let updated = self.service.update(id, update).await?;
        tracing::info!("Updated budget {id}");
        invalidate_after_mutation(&self.cache, Resource::Budgets)?;

        Ok(updated)
    }

    /// Delete the budget with `id`, then invalidate budgets.
    pub async fn delete(&self, id: BudgetId) -> Result<(), Error> {
        self.service.delete(id).await?;
        tracing::info!("Deleted budget {id}");
        invalidate_after_mutation(&self.cache, Resource::Budgets)?;

        Ok(())
    }
}
