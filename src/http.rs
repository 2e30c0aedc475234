//! Default reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::{Result, RqError};
use crate::traits::{Method, Request, Response, Transport};

const USER_AGENT: &str = concat!("rqbuilder/", env!("CARGO_PKG_VERSION"));

/// Transport that sends requests with a shared `reqwest` client.
///
/// Sends and accepts JSON. Non-success statuses become
/// [`RqError::ApiError`] (or [`RqError::RateLimited`] for 429).
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Create a transport with JSON headers and a 300 second timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(RqError::HttpError)?;

        Ok(Self { http })
    }

    /// Wrap an existing reqwest client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    /// Check response status and convert errors.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(RqError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let message = Self::extract_error_message(response, status).await;
        Err(RqError::ApiError {
            message,
            status_code: Some(status.as_u16()),
        })
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(
        response: reqwest::Response,
        status: reqwest::StatusCode,
    ) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        if let Ok(json) = serde_json::from_str::<Value>(&body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
        }

        if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body
        }
    }

    /// Decode a payload: JSON if possible, `null` when empty, text otherwise.
    fn decode_payload(body: &str) -> Value {
        if body.trim().is_empty() {
            return Value::Null;
        }
        serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: Request) -> Result<Response> {
        let url = Url::parse(&request.url)?;

        let builder = match request.method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
            Method::Put => self.http.put(url),
            Method::Delete => self.http.delete(url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await.map_err(RqError::HttpError)?;
        let response = Self::check_response(response).await?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(RqError::HttpError)?;

        tracing::debug!(status, bytes = text.len(), "Received response");

        Ok(Response::for_request(
            request,
            status,
            Self::decode_payload(&text),
        ))
    }
}
