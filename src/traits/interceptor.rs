//! Response interceptors.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Result, RqError};
use crate::traits::Response;

/// Closure run on every successful response.
pub type SuccessHook = Arc<dyn Fn(Response) -> Result<Response> + Send + Sync>;

/// Closure run on every failed request. May recover with a response.
pub type ErrorHook = Arc<dyn Fn(RqError) -> Result<Response> + Send + Sync>;

/// Observes and transforms the outcome of every dispatched request.
///
/// Interceptors run in installation order. A success is passed to
/// `on_success`; a failure to `on_error`, which may recover by returning a
/// response (later interceptors then see a success) or re-raise.
#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn on_success(&self, response: Response) -> Result<Response> {
        Ok(response)
    }

    async fn on_error(&self, error: RqError) -> Result<Response> {
        Err(error)
    }
}

/// Interceptor built from optional closures.
#[derive(Clone, Default)]
pub struct FnInterceptor {
    on_success: Option<SuccessHook>,
    on_error: Option<ErrorHook>,
}

impl FnInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_hook<F>(mut self, f: F) -> Self
    where
        F: Fn(Response) -> Result<Response> + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(f));
        self
    }

    pub fn error_hook<F>(mut self, f: F) -> Self
    where
        F: Fn(RqError) -> Result<Response> + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(f));
        self
    }

    pub(crate) fn from_hooks(on_success: Option<SuccessHook>, on_error: Option<ErrorHook>) -> Self {
        Self {
            on_success,
            on_error,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.on_success.is_none() && self.on_error.is_none()
    }
}

impl fmt::Debug for FnInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnInterceptor")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

#[async_trait]
impl Interceptor for FnInterceptor {
    async fn on_success(&self, response: Response) -> Result<Response> {
        match &self.on_success {
            Some(hook) => hook(response),
            None => Ok(response),
        }
    }

    async fn on_error(&self, error: RqError) -> Result<Response> {
        match &self.on_error {
            Some(hook) => hook(error),
            None => Err(error),
        }
    }
}
