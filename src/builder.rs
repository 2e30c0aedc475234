//! Fluent resource request builder.
//!
//! Setters consume and return the builder so calls chain. Setters that can
//! reject their input return [`Result`], so a chain reads
//! `client.make("users").filter("role", "admin")?.page(2)`.
//!
//! Terminal operations (`get`, `find`, `all`, `create`, `update`,
//! `delete`) take a snapshot of the accumulated [`Params`], compose the URL
//! and dispatch it. What they return depends on the builder's [`Mode`].

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::Dispatcher;
use crate::error::Result;
use crate::pagination::Count;
use crate::params::{ParamValue, Params, SortDirection};
use crate::path::{join_url, resource_segment, ResourcePath};
use crate::query::Query;
use crate::traits::{Method, Request, Response};

/// Decides what a builder's terminal operations return.
pub trait Mode: Sized + Send + 'static {
    type Output: Send;

    fn finish(builder: Builder<Self>) -> Self::Output;
}

/// Terminal operations return the builder, with the response stored on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chained;

/// Terminal operations return the response payload only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Raw;

impl Mode for Chained {
    type Output = Builder<Chained>;

    fn finish(builder: Builder<Self>) -> Self::Output {
        builder
    }
}

impl Mode for Raw {
    type Output = Value;

    fn finish(builder: Builder<Self>) -> Self::Output {
        builder.response.map(|r| r.data).unwrap_or(Value::Null)
    }
}

/// Builder for a single resource request.
///
/// Made by [`Client::make`](crate::Client::make). A builder is meant for one
/// logical request: terminal operations consume it.
pub struct Builder<M: Mode = Chained> {
    resource: String,
    base_url: String,
    api_prefix: bool,
    params: Params,
    dispatcher: Dispatcher,
    response: Option<Response>,
    mode: PhantomData<M>,
}

impl<M: Mode> std::fmt::Debug for Builder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("resource", &self.resource)
            .field("base_url", &self.base_url)
            .field("api_prefix", &self.api_prefix)
            .field("params", &self.params)
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}

impl Builder<Chained> {
    pub(crate) fn new(
        resource: String,
        base_url: String,
        api_prefix: bool,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            resource: resource_segment(&resource, api_prefix),
            base_url,
            api_prefix,
            params: Params::new(),
            dispatcher,
            response: None,
            mode: PhantomData,
        }
    }

    /// Switch to returning raw payloads from terminal operations.
    pub fn raw(self) -> Builder<Raw> {
        self.into_mode()
    }

    /// Response of the last terminal operation.
    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// Payload of the last terminal operation.
    pub fn data(&self) -> Option<&Value> {
        self.response.as_ref().map(|r| &r.data)
    }

    /// Deserialize the payload of the last terminal operation.
    ///
    /// A builder that has not dispatched anything decodes from `null`.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T> {
        let data = self.response.map(|r| r.data).unwrap_or(Value::Null);
        Ok(serde_json::from_value(data)?)
    }
}

impl<M: Mode> Builder<M> {
    fn into_mode<N: Mode>(self) -> Builder<N> {
        Builder {
            resource: self.resource,
            base_url: self.base_url,
            api_prefix: self.api_prefix,
            params: self.params,
            dispatcher: self.dispatcher,
            response: self.response,
            mode: PhantomData,
        }
    }

    /// Resource segment, including the `api/` prefix when enabled.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether this builder prefixes its resource with `api/`.
    pub fn api_prefix(&self) -> bool {
        self.api_prefix
    }

    pub(crate) fn with_resource_id(mut self, id: impl Into<ParamValue>) -> Self {
        self.params.set_resource_id(id.into());
        self
    }

    /// Immutable copy of the accumulated facets.
    pub fn snapshot(&self) -> Params {
        self.params.clone()
    }

    /// Filter on `column = value`. Re-filtering a column replaces its value.
    ///
    /// # Errors
    ///
    /// Returns [`RqError::InvalidArgument`](crate::RqError::InvalidArgument)
    /// if `column` is empty.
    #[doc(alias = "where")]
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<ParamValue>) -> Result<Self> {
        self.params.set_filter(column.into(), value.into())?;
        Ok(self)
    }

    /// Filter on `column` being any of `values`, sent comma-joined.
    ///
    /// # Errors
    ///
    /// Returns [`RqError::InvalidArgument`](crate::RqError::InvalidArgument)
    /// if `column` is empty.
    #[doc(alias = "whereIn")]
    pub fn filter_in<I, V>(mut self, column: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        self.params
            .set_filter_in(column.into(), values.into_iter().map(Into::into))?;
        Ok(self)
    }

    /// Include related resources.
    ///
    /// # Errors
    ///
    /// Returns [`RqError::InvalidArgument`](crate::RqError::InvalidArgument)
    /// if `related` is empty.
    #[doc(alias = "include")]
    pub fn with<I, S>(mut self, related: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params
            .push_includes(related.into_iter().map(Into::into))?;
        Ok(self)
    }

    pub fn order_by(mut self, field: impl AsRef<str>, direction: SortDirection) -> Self {
        self.params.push_sort(field.as_ref(), direction);
        self
    }

    /// Set the page. Non-integral input is ignored.
    pub fn page(mut self, page: impl Count) -> Self {
        self.params.set_page(page);
        self
    }

    /// Set the page size. Non-integral input is ignored.
    pub fn per_page(mut self, count: impl Count) -> Self {
        self.params.set_per_page(count);
        self
    }

    /// # Errors
    ///
    /// Returns [`RqError::InvalidArgument`](crate::RqError::InvalidArgument)
    /// if `value` is not an integer.
    pub fn limit(mut self, value: impl Count) -> Result<Self> {
        self.params.set_limit(value)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`RqError::InvalidArgument`](crate::RqError::InvalidArgument)
    /// if `value` is not an integer.
    pub fn offset(mut self, value: impl Count) -> Result<Self> {
        self.params.set_offset(value)?;
        Ok(self)
    }

    /// Add an arbitrary top-level query key.
    pub fn append(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.set_append(key.into(), value.into());
        self
    }

    /// Nest the request under `related/id`.
    pub fn from(mut self, related: impl Into<String>, id: impl Into<ParamValue>) -> Self {
        self.params.set_relationship(related.into(), id.into());
        self
    }

    /// Canonical query string, without the leading `?`.
    pub fn parse_query(&self) -> String {
        Query::new(&self.params).to_string()
    }

    /// Path and query, e.g. `/api/users?page=2`.
    ///
    /// # Errors
    ///
    /// Returns [`RqError::MissingResource`](crate::RqError::MissingResource)
    /// if the builder has no resource name.
    pub fn parse_path(&self) -> Result<String> {
        Ok(ResourcePath::new(&self.resource, &self.params)?.with_query())
    }

    /// Full request URL.
    pub fn url(&self) -> Result<String> {
        Ok(format!("{}{}", self.base_url, self.parse_path()?))
    }

    /// `GET` the composed URL.
    pub async fn get(self) -> Result<M::Output> {
        self.send(Method::Get, None).await
    }

    /// `GET` a single record by id.
    pub async fn find(mut self, id: impl Into<ParamValue>) -> Result<M::Output> {
        self.params.set_resource_id(id.into());
        self.get().await
    }

    /// `GET {base_url}/{resource}`, ignoring every facet set on the builder.
    pub async fn all(mut self) -> Result<M::Output> {
        ResourcePath::new(&self.resource, &self.params)?;
        let url = join_url(&self.base_url, &self.resource);
        let response = self.dispatcher.dispatch(Request::new(Method::Get, url)).await?;
        self.response = Some(response);
        Ok(M::finish(self))
    }

    /// `POST` `data` to the composed URL.
    pub async fn create<B: Serialize + ?Sized>(self, data: &B) -> Result<M::Output> {
        let body = serde_json::to_value(data)?;
        self.send(Method::Post, Some(body)).await
    }

    /// `PUT` `data` to the record with `id`.
    pub async fn update<B: Serialize + ?Sized>(
        mut self,
        id: impl Into<ParamValue>,
        data: &B,
    ) -> Result<M::Output> {
        self.params.set_resource_id(id.into());
        let body = serde_json::to_value(data)?;
        self.send(Method::Put, Some(body)).await
    }

    /// `DELETE` the record with `id`.
    pub async fn delete(mut self, id: impl Into<ParamValue>) -> Result<M::Output> {
        self.params.set_resource_id(id.into());
        self.send(Method::Delete, None).await
    }

    async fn send(mut self, method: Method, body: Option<Value>) -> Result<M::Output> {
        let url = self.url()?;
        tracing::debug!(%method, %url, "Dispatching resource request");

        let mut request = Request::new(method, url);
        request.body = body;

        let response = self.dispatcher.dispatch(request).await?;
        self.response = Some(response);
        Ok(M::finish(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ResourceConfig};
    use crate::error::RqError;
    use crate::traits::Transport;
    use crate::Client;
    use async_trait::async_trait;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl Transport for Echo {
        async fn send(&self, request: Request) -> Result<Response> {
            let data = json!({"data": ["id"]});
            Ok(Response::for_request(request, 200, data))
        }
    }

    fn client(append_api: bool) -> Client {
        Client::install_with_transport(Config::new("https://test.com", append_api), Echo).unwrap()
    }

    #[test]
    fn test_builds_a_complex_query() {
        let builder = client(true)
            .make("users")
            .filter("username", "ahmed")
            .unwrap()
            .filter_in("conversation_id", [2, 3])
            .unwrap()
            .order_by("created_at", SortDirection::Desc)
            .offset(5)
            .unwrap()
            .per_page(5)
            .page(2)
            .append("search", "searchkey")
            .with(["posts", "items"])
            .unwrap()
            .limit(4)
            .unwrap();

        let query = "search=searchkey&include=posts,items&sort=-created_at&filter[username]=ahmed&filter[conversation_id]=2,3&page=2&perPage=5&limit=4&offset=5";

        assert_eq!(builder.parse_query(), query);
        assert_eq!(builder.parse_path().unwrap(), format!("/api/users?{query}"));
        assert_eq!(
            builder.url().unwrap(),
            format!("https://test.com/api/users?{query}")
        );
    }

    #[test]
    fn test_single_facets() {
        let c = client(true);
        assert_eq!(c.make("users").page(1).parse_query(), "page=1");
        assert_eq!(c.make("users").per_page(5).parse_query(), "perPage=5");
        assert_eq!(c.make("users").limit(5).unwrap().parse_query(), "limit=5");
        assert_eq!(c.make("users").offset(5).unwrap().parse_query(), "offset=5");
        assert_eq!(
            c.make("users").append("search", "ahmed").parse_query(),
            "search=ahmed"
        );
        assert_eq!(
            c.make("users").filter("role", "admin").unwrap().parse_query(),
            "filter[role]=admin"
        );
        assert_eq!(
            c.make("users")
                .filter_in("role", ["admin", "moderator"])
                .unwrap()
                .parse_query(),
            "filter[role]=admin,moderator"
        );
        assert_eq!(
            c.make("users").with(["posts", "likes"]).unwrap().parse_query(),
            "include=posts,likes"
        );
    }

    #[test]
    fn test_order_by() {
        let c = client(true);
        assert_eq!(
            c.make("users")
                .order_by("created_at", SortDirection::Asc)
                .parse_query(),
            "sort=created_at"
        );
        assert_eq!(
            c.make("users")
                .order_by("created_at", SortDirection::Desc)
                .parse_query(),
            "sort=-created_at"
        );
    }

    #[test]
    fn test_from_nests_path() {
        let c = client(true);
        assert_eq!(
            c.make("posts").from("users", 1).parse_path().unwrap(),
            "/api/users/1/posts?"
        );
        assert_eq!(
            c.make_with("posts", ResourceConfig::append_api_to_request(false))
                .from("users", 1)
                .parse_path()
                .unwrap(),
            "/users/1/posts?"
        );
    }

    #[test]
    fn test_empty_builder() {
        let builder = client(false).make("users");
        assert_eq!(builder.parse_query(), "");
        assert_eq!(builder.parse_path().unwrap(), "/users?");
    }

    #[test]
    fn test_invalid_arguments() {
        let c = client(true);
        assert!(matches!(c.make("users").limit(2.5), Err(RqError::InvalidArgument(_))));
        assert!(matches!(c.make("users").offset(-1.1), Err(RqError::InvalidArgument(_))));
        assert!(matches!(c.make("users").filter("", "x"), Err(RqError::InvalidArgument(_))));
        assert!(matches!(
            c.make("users").filter_in("", [1, 2]),
            Err(RqError::InvalidArgument(_))
        ));
        assert!(matches!(
            c.make("users").with(Vec::<String>::new()),
            Err(RqError::InvalidArgument(_))
        ));
        assert_eq!(c.make("users").page(2.5).parse_query(), "");
    }

    #[test]
    fn test_missing_resource() {
        let builder = client(false).make("");
        assert_eq!(builder.parse_query(), "");
        assert!(matches!(builder.parse_path(), Err(RqError::MissingResource)));
        assert!(matches!(builder.url(), Err(RqError::MissingResource)));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let builder = client(true).make("users").page(1);
        let snapshot = builder.snapshot();
        let builder = builder.page(3);
        assert_eq!(snapshot.pagination.page, Some(1));
        assert_eq!(builder.snapshot().pagination.page, Some(3));
    }

    #[tokio::test]
    async fn test_find_stores_response() {
        let builder = client(false).make("users").find(1).await.unwrap();
        let response = builder.response().unwrap();
        assert_eq!(response.method, Method::Get);
        assert_eq!(response.url, "https://test.com/users/1?");
        assert_eq!(builder.data(), Some(&json!({"data": ["id"]})));
    }

    #[tokio::test]
    async fn test_all_ignores_facets() {
        let builder = client(false)
            .make("users")
            .with(["sa"])
            .unwrap()
            .filter("role", "admin")
            .unwrap()
            .all()
            .await
            .unwrap();
        assert_eq!(builder.response().unwrap().url, "https://test.com/users");
    }

    #[tokio::test]
    async fn test_raw_mode_returns_payload() {
        let data = client(false).make_raw("users").get().await.unwrap();
        assert_eq!(data, json!({"data": ["id"]}));
    }

    #[tokio::test]
    async fn test_into_data_deserializes() {
        #[derive(serde::Deserialize)]
        struct Envelope {
            data: Vec<String>,
        }

        let envelope: Envelope = client(false)
            .make("users")
            .get()
            .await
            .unwrap()
            .into_data()
            .unwrap();
        assert_eq!(envelope.data, vec!["id"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_set_resource_id() {
        let c = client(false);
        let updated = c.make("users").update(1, &json!({"name": "ds"})).await.unwrap();
        let response = updated.response().unwrap();
        assert_eq!(response.method, Method::Put);
        assert_eq!(response.url, "https://test.com/users/1?");
        assert_eq!(response.body, Some(json!({"name": "ds"})));

        let deleted = c.make("users").delete("abc").await.unwrap();
        assert_eq!(deleted.response().unwrap().url, "https://test.com/users/abc?");
    }
}
