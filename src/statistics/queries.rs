//! Cached statistics reads.
//!
//! Statistics are never written directly. They go stale whenever a
//! transaction or category changes, see [crate::affected_resources].

use std::sync::Arc;

use crate::{
    Error,
    cache::{QueryClient, QueryKey, QueryObserver},
    invalidation::Resource,
    statistics::{CategoryStatistic, DateRange, MonthlyStatistic, Statistics, StatisticsService},
};

/// Pairs the [StatisticsService] with the query cache.
#[derive(Debug, Clone)]
pub struct StatisticsQueries {
    service: StatisticsService,
    cache: QueryClient,
}

impl StatisticsQueries {
    /// Create queries that read through `cache`.
    pub fn new(service: StatisticsService, cache: QueryClient) -> Self {
        Self { service, cache }
    }

    /// The key for the overall totals over `range`.
    pub fn overall_key(range: DateRange) -> QueryKey {
        Resource::Statistics
            .key()
            .with("overall")
            .with(range.start)
            .with(range.end)
    }

    /// The key for the per-category totals over `range`.
    pub fn by_category_key(range: DateRange) -> QueryKey {
        Resource::Statistics
            .key()
            .with("by-category")
            .with(range.start)
            .with(range.end)
    }

    /// The key for the per-month totals of `year`.
    pub fn monthly_key(year: Option<i32>) -> QueryKey {
        Resource::Statistics.key().with("monthly").with(year)
    }

    /// Get the overall totals over `range`.
    pub async fn overall(&self, range: DateRange) -> Result<Arc<Statistics>, Error> {
        let service = self.service.clone();

        self.cache
            .fetch_query(Self::overall_key(range), move || {
                let service = service.clone();
                async move { service.get_overall(range).await }
            })
            .await
    }

    /// Observe the overall totals over `range`.
    pub fn watch_overall(&self, range: DateRange) -> Result<QueryObserver<Statistics>, Error> {
        let service = self.service.clone();

        self.cache.watch_query(Self::overall_key(range), move || {
            let service = service.clone();
            async move { service.get_overall(range).await }
        })
    }

    /// Get the per-category totals over `range`.
    pub async fn by_category(&self, range: DateRange) -> Result<Arc<Vec<CategoryStatistic>>, Error> {
        let service = self.service.clone();

        self.cache
            .fetch_query(Self::by_category_key(range), move || {
                let service = service.clone();
                async move { service.get_by_category(range).await }
            })
            .await
    }

    /// Observe the per-category totals over `range`.
    pub fn watch_by_category(
        &self,
        range: DateRange,
    ) -> Result<QueryObserver<Vec<CategoryStatistic>>, Error> {
        let service = self.service.clone();

        self.cache.watch_query(Self::by_category_key(range), move || {
            let service = service.clone();
            async move { service.get_by_category(range).await }
        })
    }

    /// Get the per-month totals of `year`.
    pub async fn monthly(&self, year: Option<i32>) -> Result<Arc<Vec<MonthlyStatistic>>, Error> {
        let service = self.service.clone();

        self.cache
            .fetch_query(Self::monthly_key(year), move || {
                let service = service.clone();
                async move { service.get_monthly(year).await }
            })
            .await
    }

    /// Observe the per-month totals of `year`.
    pub fn watch_monthly(
        &self,
        year: Option<i32>,
    ) -> Result<QueryObserver<Vec<MonthlyStatistic>>, Error> {
        let service = self.service.clone();

        self.cache.watch_query(Self::monthly_key(year), move || {
            let service = service.clone();
            async move { service.get_monthly(year).await }
        })
    }
}
