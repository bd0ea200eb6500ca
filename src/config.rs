//! Configuration for connecting to the finance API.

use std::{env, time::Duration};

use reqwest::Url;

use crate::{
    Error, cache::CacheConfig, pagination::PaginationConfig, timezone::get_local_offset,
};

/// The API used when no base URL is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// The timezone used to decide what "today" is when none is configured.
pub const DEFAULT_TIMEZONE: &str = "Etc/UTC";

/// Environment variable holding the base URL of the finance API.
pub const API_URL_ENV: &str = "FINTRACK_API_URL";

/// Environment variable holding the canonical timezone name, e.g. "Pacific/Auckland".
pub const TIMEZONE_ENV: &str = "FINTRACK_TIMEZONE";

/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "FINTRACK_TIMEOUT_SECS";

/// Everything needed to talk to the finance API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The URL all request paths are relative to, always ending in a slash.
    pub base_url: Url,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// Used to work out today's date when validating transaction dates.
    pub timezone: String,

    /// The transport timeout for a single request, if any.
    pub timeout: Option<Duration>,

    /// The config that controls how to request pages of data.
    pub pagination: PaginationConfig,

    /// The config for the query cache.
    pub cache: CacheConfig,
}

impl ClientConfig {
    /// Create a config for the API at `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidConfig] if `base_url` is not an absolute HTTP(S) URL.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timezone: DEFAULT_TIMEZONE.to_owned(),
            timeout: None,
            pagination: PaginationConfig::default(),
            cache: CacheConfig::default(),
        })
    }

    /// Create a config from the `FINTRACK_*` environment variables, falling
    /// back to defaults for any that are not set.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidConfig] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, Error> {
        let base_url = env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        let mut config = Self::new(&base_url)?;

        if let Ok(timezone) = env::var(TIMEZONE_ENV) {
            config = config.with_timezone(&timezone)?;
        }

        if let Ok(timeout) = env::var(TIMEOUT_ENV) {
            let seconds = timeout.parse::<u64>().map_err(|error| {
                Error::InvalidConfig(format!("{TIMEOUT_ENV}=\"{timeout}\": {error}"))
            })?;
            config.timeout = Some(Duration::from_secs(seconds));
        }

        Ok(config)
    }

    /// Set the local timezone.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidConfig] if `timezone` is not a canonical timezone name.
    pub fn with_timezone(mut self, timezone: &str) -> Result<Self, Error> {
        if get_local_offset(timezone).is_none() {
            return Err(Error::InvalidConfig(format!("invalid timezone \"{timezone}\"")));
        }

        self.timezone = timezone.to_owned();
        Ok(self)
    }

    /// Set the transport timeout for a single request.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the query cache config.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(&format!("{DEFAULT_API_URL}/"))
                .expect("the default API URL should be valid"),
            timezone: DEFAULT_TIMEZONE.to_owned(),
            timeout: None,
            pagination: PaginationConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

/// Parse `base_url`, adding a trailing slash so relative paths are joined
/// onto it rather than replacing its last segment.
fn parse_base_url(base_url: &str) -> Result<Url, Error> {
    let mut url = Url::parse(base_url)
        .map_err(|error| Error::InvalidConfig(format!("invalid API URL \"{base_url}\": {error}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidConfig(format!(
            "invalid API URL \"{base_url}\": expected an http or https URL"
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
