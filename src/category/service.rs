//! Typed calls to the `/categories` endpoints.

use crate::{
    api_error::ApiError,
    category::{Category, CategoryId, CategoryUpdate, NewCategory},
    client::ApiClient,
};

const PATH: &str = "categories";

/// Reads and writes categories through the finance API.
#[derive(Debug, Clone)]
pub struct CategoryService {
    client: ApiClient,
}

impl CategoryService {
    /// Create a service that sends its requests through `client`.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Get every category, predefined ones included.
    pub async fn get_all(&self) -> Result<Vec<Category>, ApiError> {
        self.client.get(PATH).await
    }

    /// Get the category with `id`.
    pub async fn get_by_id(&self, id: CategoryId) -> Result<Category, ApiError> {
        self.client.get(&format!("{PATH}/{id}")).await
    }

    /// Create a custom category and return it as the server stored it.
    pub async fn create(&self, category: &NewCategory) -> Result<Category, ApiError> {
        self.client.post(PATH, category).await
    }

    /// Rename or retype the category with `id`.
    pub async fn update(
        &self,
        id: CategoryId,
        category: &CategoryUpdate,
    ) -> Result<Category, ApiError> {
        self.client.put(&format!("{PATH}/{id}"), category).await
    }

    /// Delete the category with `id`.
    ///
    /// # Errors
    ///
    /// Returns a 409 [ApiError] if transactions still use the category.
    pub async fn delete(&self, id: CategoryId) -> Result<(), ApiError> {
        self.client.delete(&format!("{PATH}/{id}")).await
    }
}
