//! Installed configuration and request dispatch.
//!
//! A [`Client`] is the single place configuration enters the library.
//! Builders made from it copy what they need at construction time, so
//! installing a new configuration later never changes existing builders.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::builder::{Builder, Chained, Raw};
use crate::config::{Config, ResourceConfig};
use crate::error::Result;
use crate::http::ReqwestTransport;
use crate::path::join_url;
use crate::traits::{FnInterceptor, Interceptor, Method, Request, Response, Transport};

/// Sends requests through a transport and its interceptors.
#[derive(Clone)]
pub(crate) struct Dispatcher {
    transport: Arc<dyn Transport>,
    interceptors: Arc<[Arc<dyn Interceptor>]>,
}

impl Dispatcher {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub(crate) async fn dispatch(&self, request: Request) -> Result<Response> {
        let mut outcome = self.transport.send(request).await;

        for interceptor in self.interceptors.iter() {
            outcome = match outcome {
                Ok(response) => interceptor.on_success(response).await,
                Err(err) => {
                    tracing::debug!(error = %err, "Running error interceptor");
                    let recovered = interceptor.on_error(err).await;
                    if recovered.is_ok() {
                        tracing::warn!("Error interceptor recovered a failed request");
                    }
                    recovered
                }
            };
        }

        outcome
    }
}

/// Entry point for building resource requests.
///
/// Holds the base URL, the default API-prefix flag, the transport and the
/// response interceptors. This struct is cheaply cloneable.
///
/// # Example
///
/// ```no_run
/// use rqbuilder::{Client, Config, SortDirection};
///
/// # async fn example() -> rqbuilder::Result<()> {
/// let client = Client::install(Config::new("https://test.com", true))?;
///
/// let users = client
///     .make("users")
///     .filter("username", "ahmed")?
///     .order_by("created_at", SortDirection::Desc)
///     .get()
///     .await?;
/// println!("{:?}", users.data());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    base_url: Arc<str>,
    api_prefix: bool,
    dispatcher: Dispatcher,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("api_prefix", &self.api_prefix)
            .field("interceptors", &self.dispatcher.interceptors.len())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Client with default configuration and the reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::install(Config::default())
    }

    /// Create a client from environment variables.
    ///
    /// See [`Config::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::install(Config::from_env()?)
    }

    /// Install `config` with the default reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn install(config: Config) -> Result<Self> {
        Self::install_with_transport(config, ReqwestTransport::new()?)
    }

    /// Install `config` with a caller-provided transport.
    pub fn install_with_transport(config: Config, transport: impl Transport + 'static) -> Result<Self> {
        let base_url = config.base_url()?;
        let api_prefix = config.appends_api();
        let (on_success, on_error, custom) = config.into_hooks();

        let mut interceptors: Vec<Arc<dyn Interceptor>> = Vec::with_capacity(custom.len() + 1);
        let hooks = FnInterceptor::from_hooks(on_success, on_error);
        if !hooks.is_empty() {
            interceptors.push(Arc::new(hooks));
        }
        interceptors.extend(custom);

        tracing::debug!(%base_url, api_prefix, interceptors = interceptors.len(), "Installed client");

        Ok(Self {
            base_url: base_url.into(),
            api_prefix,
            dispatcher: Dispatcher {
                transport: Arc::new(transport),
                interceptors: interceptors.into(),
            },
        })
    }

    /// Base URL without trailing `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether builders prefix resources with `api/` by default.
    pub fn api_prefix(&self) -> bool {
        self.api_prefix
    }

    /// Start a builder for `resource` using the installed prefix default.
    pub fn make(&self, resource: impl Into<String>) -> Builder<Chained> {
        self.make_with(resource, ResourceConfig::default())
    }

    /// Start a builder for `resource`, overriding the prefix flag if
    /// `config` sets one.
    pub fn make_with(&self, resource: impl Into<String>, config: ResourceConfig) -> Builder<Chained> {
        let api_prefix = config.append_api_to_request.unwrap_or(self.api_prefix);
        Builder::new(
            resource.into(),
            self.base_url.to_string(),
            api_prefix,
            self.dispatcher.clone(),
        )
    }

    /// Start a builder whose terminal operations return the raw payload.
    pub fn make_raw(&self, resource: impl Into<String>) -> Builder<Raw> {
        self.make(resource).raw()
    }

    /// `GET {base_url}/{path}`, bypassing all builder state.
    pub async fn get_path(&self, path: &str) -> Result<Response> {
        self.send_path(Method::Get, path, None).await
    }

    /// `POST {base_url}/{path}` with a JSON body.
    pub async fn post_path<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let body = serde_json::to_value(body)?;
        self.send_path(Method::Post, path, Some(body)).await
    }

    /// `PUT {base_url}/{path}` with a JSON body.
    pub async fn put_path<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let body = serde_json::to_value(body)?;
        self.send_path(Method::Put, path, Some(body)).await
    }

    /// `DELETE {base_url}/{path}`.
    pub async fn delete_path(&self, path: &str) -> Result<Response> {
        self.send_path(Method::Delete, path, None).await
    }

    async fn send_path(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response> {
        let mut request = Request::new(method, join_url(&self.base_url, path));
        request.body = body;
        self.dispatcher.dispatch(request).await
    }
}
