//! Cached transaction reads and the mutations that invalidate them.

use std::sync::Arc;

use crate::{
    Error,
    cache::{QueryClient, QueryKey, QueryObserver},
    invalidation::{Resource, invalidate_after_mutation},
    pagination::{PageRequest, Paginated},
    transaction::{NewTransaction, Transaction, TransactionId, TransactionService, TransactionUpdate},
};

/// Pairs the [TransactionService] with the query cache.
#[derive(Debug, Clone)]
pub struct TransactionQueries {
    service: TransactionService,
    cache: QueryClient,
}

impl TransactionQueries {
    /// Create queries that read through `cache`.
    pub fn new(service: TransactionService, cache: QueryClient) -> Self {
        Self { service, cache }
    }

    /// The key for one page of the transaction list.
    pub fn list_key(page: PageRequest) -> QueryKey {
        Resource::Transactions
            .key()
            .with("list")
            .with(page.page_number)
            .with(page.page_size)
    }

    /// The key for a single transaction.
    pub fn detail_key(id: TransactionId) -> QueryKey {
        Resource::Transactions.key().with("detail").with(id)
    }

    /// Get one page of transactions.
    pub async fn transactions(&self, page: PageRequest) -> Result<Arc<Paginated<Transaction>>, Error> {
        let service = self.service.clone();

        self.cache
            .fetch_query(Self::list_key(page), move || {
                let service = service.clone();
                async move { service.get_all(page).await }
            })
            .await
    }

    /// Observe one page of transactions.
    pub fn watch_transactions(
        &self,
        page: PageRequest,
    ) -> Result<QueryObserver<Paginated<Transaction>>, Error> {
        let service = self.service.clone();

        self.cache.watch_query(Self::list_key(page), move || {
            let service = service.clone();
            async move { service.get_all(page).await }
        })
    }

    /// Get the transaction with `id`.
    pub async fn transaction(&self, id: TransactionId) -> Result<Arc<Transaction>, Error> {
        let service = self.service.clone();

        self.cache
            .fetch_query(Self::detail_key(id), move || {
                let service = service.clone();
                async move { service.get_by_id(id).await }
            })
            .await
    }

    /// Create a transaction, then invalidate transaction lists and statistics.
    pub async fn create(&self, transaction: &NewTransaction) -> Result<Transaction, Error> {
        let created = self.service.create(transaction).await?;
        tracing::info!("Created transaction {}", created.id);
        invalidate_after_mutation(&self.cache, Resource::Transactions)?;

        Ok(created)
    }

    /// Update the transaction with `id`, then invalidate transactions and
    /// statistics.
    pub async fn update(
        &self,
        id: TransactionId,
        transaction: &TransactionUpdate,
    ) -> Result<Transaction, Error> {
        let updated = self.service.update(id, transaction).await?;
        tracing::info!("Updated transaction {id}");
        invalidate_after_mutation(&self.cache, Resource::Transactions)?;

        Ok(updated)
    }

    /// Delete the transaction with `id`, then invalidate transactions and
    /// statistics.
    pub async fn delete(&self, id: TransactionId) -> Result<(), Error> {
        self.service.delete(id).await?;
        tracing::info!("Deleted transaction {id}");
        invalidate_after_mutation(&self.cache, Resource::Transactions)?;

        Ok(())
    }
}
