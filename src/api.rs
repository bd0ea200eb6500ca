//! One entry point to every resource, sharing a single client and cache.

use crate::{
    Error,
    budget::{BudgetQueries, BudgetService},
    cache::QueryClient,
    category::{CategoryQueries, CategoryService},
    client::ApiClient,
    config::ClientConfig,
    statistics::{StatisticsQueries, StatisticsService},
    transaction::{TransactionQueries, TransactionService},
};

/// The finance API with cached reads.
///
/// All resources share one [QueryClient], so a mutation through one of them
/// invalidates the cached reads of the others it affects.
#[derive(Debug, Clone)]
pub struct FinanceApi {
    config: ClientConfig,
    client: ApiClient,
    cache: QueryClient,
    transactions: TransactionQueries,
    categories: CategoryQueries,
    statistics: StatisticsQueries,
    budgets: BudgetQueries,
}

impl FinanceApi {
    /// Connect to the API described by `config` with an empty cache.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidConfig] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let client = ApiClient::new(config)?;
        let cache = QueryClient::new(config.cache.clone());

        Ok(Self::with_client(config.clone(), client, cache))
    }

    fn with_client(config: ClientConfig, client: ApiClient, cache: QueryClient) -> Self {
        Self {
            transactions: TransactionQueries::new(
                TransactionService::new(client.clone()),
                cache.clone(),
            ),
            categories: CategoryQueries::new(CategoryService::new(client.clone()), cache.clone()),
            statistics: StatisticsQueries::new(
                StatisticsService::new(client.clone()),
                cache.clone(),
            ),
            budgets: BudgetQueries::new(BudgetService::new(client.clone()), cache.clone()),
            config,
            client,
            cache,
        }
    }

    /// Transactions.
    pub fn transactions(&self) -> &TransactionQueries {
        &self.transactions
    }

    /// Categories.
    pub fn categories(&self) -> &CategoryQueries {
        &self.categories
    }

    /// Statistics.
    pub fn statistics(&self) -> &StatisticsQueries {
        &self.statistics
    }

    /// Budgets.
    pub fn budgets(&self) -> &BudgetQueries {
        &self.budgets
    }

    /// The cache shared by every resource.
    pub fn cache(&self) -> &QueryClient {
        &self.cache
    }

    /// The HTTP client shared by every resource.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The config this API was created with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
