//! Installation and per-resource configuration.

use std::env;
use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::error::{Result, RqError};
use crate::traits::{ErrorHook, Interceptor, Response, SuccessHook};

/// Base URL used until a configuration is installed.
pub const DEFAULT_URL: &str = "https://jsonplaceholder.typicode.com";

/// Environment variable for the base URL.
pub const URL_ENV: &str = "RQBUILDER_URL";

/// Environment variable for the default API-prefix flag.
pub const APPEND_API_ENV: &str = "RQBUILDER_APPEND_API";

/// Configuration installed into a [`Client`](crate::Client).
///
/// # Example
///
/// ```
/// use rqbuilder::Config;
///
/// let config = Config::default()
///     .with_url("https://test.com")
///     .append_api_to_request(false)
///     .on_error(|err| Err(err));
/// assert_eq!(config.url(), "https://test.com");
/// ```
#[derive(Clone)]
pub struct Config {
    url: String,
    append_api_to_request: bool,
    on_success: Option<SuccessHook>,
    on_error: Option<ErrorHook>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            append_api_to_request: true,
            on_success: None,
            on_error: None,
            interceptors: Vec::new(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.url)
            .field("append_api_to_request", &self.append_api_to_request)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

impl Config {
    pub fn new(url: impl Into<String>, append_api_to_request: bool) -> Self {
        Self {
            url: url.into(),
            append_api_to_request,
            ..Default::default()
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// Uses `RQBUILDER_URL` for the base URL and `RQBUILDER_APPEND_API`
    /// (`true`/`false`/`1`/`0`) for the prefix flag. Unset variables keep
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `RQBUILDER_APPEND_API` is not a boolean.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var(URL_ENV) {
            config.url = url;
        }
        if let Ok(flag) = env::var(APPEND_API_ENV) {
            config.append_api_to_request = parse_flag(&flag)?;
        }

        Ok(config)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn append_api_to_request(mut self, enabled: bool) -> Self {
        self.append_api_to_request = enabled;
        self
    }

    /// Run `f` on every successful response.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(Response) -> Result<Response> + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(f));
        self
    }

    /// Run `f` on every failed request.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(RqError) -> Result<Response> + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(f));
        self
    }

    /// Add an interceptor. Interceptors run after the closure hooks, in
    /// the order they were added.
    pub fn with_interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn appends_api(&self) -> bool {
        self.append_api_to_request
    }

    /// Validated base URL without a trailing `/`.
    pub(crate) fn base_url(&self) -> Result<String> {
        Url::parse(&self.url)
            .map_err(|e| RqError::InvalidConfig(format!("base url '{}': {e}", self.url)))?;
        Ok(self.url.trim_end_matches('/').to_string())
    }

    pub(crate) fn into_hooks(
        self,
    ) -> (Option<SuccessHook>, Option<ErrorHook>, Vec<Arc<dyn Interceptor>>) {
        (self.on_success, self.on_error, self.interceptors)
    }
}

/// Per-resource overrides passed to [`Client::make_with`](crate::Client::make_with).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceConfig {
    /// Overrides the installed API-prefix default when set.
    pub append_api_to_request: Option<bool>,
}

impl ResourceConfig {
    pub fn append_api_to_request(enabled: bool) -> Self {
        Self {
            append_api_to_request: Some(enabled),
        }
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(RqError::InvalidConfig(format!(
            "{APPEND_API_ENV} must be a boolean, got '{other}'"
        ))),
    }
}
