//! The HTTP client that every resource service sends its requests through.

use reqwest::{
    Method, RequestBuilder, StatusCode, Url,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    Error,
    api_error::ApiError,
    config::ClientConfig,
    logging::{log_request, log_response},
};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Sends requests to the finance API and decodes the JSON responses.
///
/// Cloning is cheap, clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the API described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidConfig] if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|error| Error::InvalidConfig(format!("could not build HTTP client: {error}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// The URL request paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send a GET request to `path` and decode the response body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path, None)?;
        let (status, body) = self.send(Method::GET, url, None::<&()>).await?;

        decode(status, &body)
    }

    /// Send a GET request to `path` with `query` encoded as query parameters.
    ///
    /// Fields of `query` that serialize as `None` are left out.
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let query = serde_urlencoded::to_string(query)
            .map_err(|error| {
                ApiError::invalid_request(format!("could not encode query: {error}"))
            })?;
        let url = self.url(path, Some(&query))?;
        let (status, body) = self.send(Method::GET, url, None::<&()>).await?;

        decode(status, &body)
    }

    /// Send a POST request to `path` with `body` as JSON and decode the response body.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path, None)?;
        let (status, body) = self.send(Method::POST, url, Some(body)).await?;

        decode(status, &body)
    }

    /// Send a PUT request to `path` with `body` as JSON and decode the response body.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path, None)?;
        let (status, body) = self.send(Method::PUT, url, Some(body)).await?;

        decode(status, &body)
    }

    /// Send a DELETE request to `path`, ignoring any response body.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path, None)?;
        self.send(Method::DELETE, url, None::<&()>).await?;

        Ok(())
    }

    fn url(&self, path: &str, query: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|error| {
                ApiError::invalid_request(format!("invalid request path \"{path}\": {error}"))
            })?;

        if let Some(query) = query.filter(|query| !query.is_empty()) {
            url.set_query(Some(query));
        }

        Ok(url)
    }

    /// Send a request and return the status and raw body of a 2xx response.
    async fn send<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<(StatusCode, Vec<u8>), ApiError>
    where
        B: Serialize + ?Sized,
    {
        log_request(&method, &url);

        let mut request: RequestBuilder = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|error| {
            tracing::warn!("{method} {url} failed: {error}");
            ApiError::network(error)
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(ApiError::network)?
            .to_vec();

        log_response(&method, &url, status, &body);

        if status.is_success() {
            Ok((status, body))
        } else {
            Err(ApiError::from_response(status, &body))
        }
    }
}

fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|error| ApiError::malformed(status, error))
}
