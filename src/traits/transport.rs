//! Transport trait for sending resource requests.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// HTTP verbs used by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    pub method: Method,
    /// Absolute URL, including the query string.
    pub url: String,
    /// JSON body for `POST` and `PUT`.
    pub body: Option<Value>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A response received for a [`Request`].
///
/// Keeps the request's method, URL and body next to the decoded payload so
/// callers can see exactly what was sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub method: Method,
    pub url: String,
    /// Body that was sent with the request.
    pub body: Option<Value>,
    pub status: u16,
    /// Decoded response payload.
    pub data: Value,
}

impl Response {
    /// Build a response for `request` with the given status and payload.
    pub fn for_request(request: Request, status: u16, data: Value) -> Self {
        Self {
            method: request.method,
            url: request.url,
            body: request.body,
            status,
            data,
        }
    }
}

/// Sends requests over some HTTP stack.
///
/// Implementations own connection handling, timeouts, auth and retries.
/// Failures are returned as-is to the caller after interceptors run.
///
/// # Example
///
/// ```ignore
/// use rqbuilder::{Request, Response, Transport};
///
/// struct Canned;
///
/// #[async_trait::async_trait]
/// impl Transport for Canned {
///     async fn send(&self, request: Request) -> rqbuilder::Result<Response> {
///         Ok(Response::for_request(request, 200, serde_json::json!([])))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and wait for the response.
    async fn send(&self, request: Request) -> Result<Response>;

    async fn get(&self, url: &str) -> Result<Response> {
        self.send(Request::new(Method::Get, url)).await
    }

    async fn post(&self, url: &str, body: Value) -> Result<Response> {
        self.send(Request::new(Method::Post, url).with_body(body)).await
    }

    async fn put(&self, url: &str, body: Value) -> Result<Response> {
        self.send(Request::new(Method::Put, url).with_body(body)).await
    }

    async fn delete(&self, url: &str) -> Result<Response> {
        self.send(Request::new(Method::Delete, url)).await
    }
}
