//! Fluent query builder for JSON-API style REST resources.
//!
//! Chain filters, includes, sorts and pagination onto a resource, then
//! serialize them into one canonical URL or dispatch the request through an
//! injectable transport.
//!
//! # Quick Start
//!
//! ```no_run
//! use rqbuilder::{Client, Config, SortDirection};
//!
//! #[tokio::main]
//! async fn main() -> rqbuilder::Result<()> {
//!     let client = Client::install(Config::new("https://test.com", true))?;
//!
//!     let builder = client
//!         .make("users")
//!         .filter("username", "ahmed")?
//!         .filter_in("conversation_id", [2, 3])?
//!         .with(["posts", "items"])?
//!         .order_by("created_at", SortDirection::Desc)
//!         .page(2)
//!         .per_page(5);
//!
//!     assert_eq!(
//!         builder.parse_path()?,
//!         "/api/users?include=posts,items&sort=-created_at\
//!          &filter[username]=ahmed&filter[conversation_id]=2,3&page=2&perPage=5"
//!     );
//!
//!     let users = builder.get().await?;
//!     println!("{:?}", users.data());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Params`] accumulates the facets of one request.
//! - [`Query`] serializes them in a fixed order.
//! - [`ResourcePath`] composes the path, including relationship nesting
//!   (`/api/users/1/posts`) and the optional `api/` prefix.
//! - [`Client`] holds installed configuration and hands requests to a
//!   [`Transport`], running [`Interceptor`]s on every outcome.
//!
//! # Configuration
//!
//! [`Config::from_env`] reads:
//!
//! - `RQBUILDER_URL` (optional) - Base URL (defaults to `https://jsonplaceholder.typicode.com`)
//! - `RQBUILDER_APPEND_API` (optional) - Prefix resources with `api/` (defaults to `true`)

mod builder;
mod client;
mod config;
mod error;
mod http;
mod pagination;
mod params;
mod path;
mod query;
mod traits;

pub mod cli;

// Re-export core types
pub use builder::{Builder, Chained, Mode, Raw};
pub use client::Client;
pub use config::{Config, ResourceConfig, DEFAULT_URL};
pub use error::{Result, RqError};
pub use http::ReqwestTransport;

// Re-export query model
pub use pagination::{Count, Pagination};
pub use params::{KeyedValues, ParamValue, Params, Relationship, SortDirection};
pub use path::{ResourcePath, API_PREFIX};
pub use query::Query;

// Re-export traits
pub use traits::{ErrorHook, FnInterceptor, Interceptor, Method, Request, Response, SuccessHook, Transport};
