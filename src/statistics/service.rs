//! Typed calls to the read-only `/statistics` endpoints.

use serde::Serialize;

use crate::{
    api_error::ApiError,
    client::ApiClient,
    statistics::{CategoryStatistic, DateRange, MonthlyStatistic, Statistics},
};

#[derive(Serialize)]
struct YearFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<i32>,
}

/// Reads statistics from the finance API.
#[derive(Debug, Clone)]
pub struct StatisticsService {
    client: ApiClient,
}

impl StatisticsService {
    /// Create a service that sends its requests through `client`.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Get the totals over every transaction in `range`.
    pub async fn get_overall(&self, range: DateRange) -> Result<Statistics, ApiError> {
        self.client.get_with_query("statistics", &range).await
    }

    /// Get the totals per category for the transactions in `range`.
    pub async fn get_by_category(&self, range: DateRange) -> Result<Vec<CategoryStatistic>, ApiError> {
        self.client
            .get_with_query("statistics/by-category", &range)
            .await
    }

    /// Get the totals per month, for `year` or the server's default year.
    pub async fn get_monthly(&self, year: Option<i32>) -> Result<Vec<MonthlyStatistic>, ApiError> {
        self.client
            .get_with_query("statistics/monthly", &YearFilter { year })
            .await
    }
}
