//! Typed calls to the `/transactions` endpoints.

use crate::{
    api_error::ApiError,
    client::ApiClient,
    pagination::{PageRequest, Paginated},
    transaction::{NewTransaction, Transaction, TransactionId, TransactionUpdate},
};

const PATH: &str = "transactions";

/// Reads and writes transactions through the finance API.
#[derive(Debug, Clone)]
pub struct TransactionService {
    client: ApiClient,
}

impl TransactionService {
    /// Create a service that sends its requests through `client`.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Get one page of transactions, newest first.
    pub async fn get_all(&self, page: PageRequest) -> Result<Paginated<Transaction>, ApiError> {
        self.client.get_with_query(PATH, &page).await
    }

    /// Get the transaction with `id`.
    ///
    /// # Errors
    ///
    /// Returns a 404 [ApiError] if there is no such transaction.
    pub async fn get_by_id(&self, id: TransactionId) -> Result<Transaction, ApiError> {
        self.client.get(&format!("{PATH}/{id}")).await
    }

    /// Create a transaction and return it as the server stored it.
    pub async fn create(&self, transaction: &NewTransaction) -> Result<Transaction, ApiError> {
        self.client.post(PATH, transaction).await
    }

    /// Replace the fields of the transaction with `id`.
    pub async fn update(
        &self,
        id: TransactionId,
        transaction: &TransactionUpdate,
    ) -> Result<Transaction, ApiError> {
        self.client.put(&format!("{PATH}/{id}"), transaction).await
    }

    /// Delete the transaction with `id`.
    pub async fn delete(&self, id: TransactionId) -> Result<(), ApiError> {
        self.client.delete(&format!("{PATH}/{id}")).await
    }
}
