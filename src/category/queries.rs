//! Cached category reads and the mutations that invalidate them.

use std::sync::Arc;

use crate::{
    Error,
    cache::{QueryClient, QueryKey, QueryObserver},
    category::{Category, CategoryId, CategoryService, CategoryUpdate, NewCategory},
    invalidation::{Resource, invalidate_after_mutation},
};

/// Pairs the [CategoryService] with the query cache.
#[derive(Debug, Clone)]
pub struct CategoryQueries {
    service: CategoryService,
    cache: QueryClient,
}

impl CategoryQueries {
    /// Create queries that read through `cache`.
    pub fn new(service: CategoryService, cache: QueryClient) -> Self {
        Self { service, cache }
    }

    /// The key for the list of all categories.
    pub fn list_key() -> QueryKey {
        Resource::Categories.key().with("list")
    }

    /// The key for a single category.
    pub fn detail_key(id: CategoryId) -> QueryKey {
        Resource::Categories.key().with("detail").with(id)
    }

    /// Get every category.
    pub async fn categories(&self) -> Result<Arc<Vec<Category>>, Error> {
        let service = self.service.clone();

        self.cache
            .fetch_query(Self::list_key(), move || {
                let service = service.clone();
                async move { service.get_all().await }
            })
            .await
    }

    /// Observe the list of categories.
    pub fn watch_categories(&self) -> Result<QueryObserver<Vec<Category>>, Error> {
        let service = self.service.clone();

        self.cache.watch_query(Self::list_key(), move || {
            let service = service.clone();
            async move { service.get_all().await }
        })
    }

    /// Get the category with `id`.
    pub async fn category(&self, id: CategoryId) -> Result<Arc<Category>, Error> {
        let service = self.service.clone();

        self.cache
            .fetch_query(Self::detail_key(id), move || {
                let service = service.clone();
                async move { service.get_by_id(id).await }
            })
            .await
    }

    /// Create a category, then invalidate categories and statistics.
    pub async fn create(&self, category: &NewCategory) -> Result<Category, Error> {
        let created = self.service.create(category).await?;
        tracing::info!("Created category {} \"{}\"", created.id, created.name);
        invalidate_after_mutation(&self.cache, Resource::Categories)?;

        Ok(created)
    }

    /// Update the category with `id`, then invalidate categories and statistics.
    pub async fn update(&self, id: CategoryId, category: &CategoryUpdate) -> Result<Category, Error> {
        let updated = self.service.update(id, category).await?;
        tracing::info!("Updated category {id}");
        invalidate_after_mutation(&self.cache, Resource::Categories)?;

        Ok(updated)
    }

    /// Delete the category with `id`, then invalidate categories and statistics.
    ///
    /// A category that transactions still use is rejected by the server with
    /// a conflict, in which case nothing is invalidated.
    pub async fn delete(&self, id: CategoryId) -> Result<(), Error> {
        self.service.delete(id).await?;
        tracing::info!("Deleted category {id}");
        invalidate_after_mutation(&self.cache, Resource::Categories)?;

        Ok(())
    }
}
