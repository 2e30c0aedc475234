//! Resource path composition.

use crate::error::{Result, RqError};
use crate::params::Params;
use crate::query::Query;

/// Segment prepended to resource names when the API prefix is enabled.
pub const API_PREFIX: &str = "api/";

/// Path of a resource request, without base URL or query.
///
/// The resource segment is `resource` or `api/resource`. Relationship
/// nesting moves the prefix in front of the parent:
///
/// - `/api/posts/7`
/// - `/api/users/1/posts`
#[derive(Debug, Clone, Copy)]
pub struct ResourcePath<'a> {
    segment: &'a str,
    params: &'a Params,
}

impl<'a> ResourcePath<'a> {
    /// Create a path for `segment`, the resource name with any API prefix
    /// already applied.
    ///
    /// # Errors
    ///
    /// Returns [`RqError::MissingResource`] if the segment names no resource.
    pub fn new(segment: &'a str, params: &'a Params) -> Result<Self> {
        if segment.is_empty() || segment == API_PREFIX {
            return Err(RqError::MissingResource);
        }
        Ok(Self { segment, params })
    }

    /// Render the path, starting with `/`.
    pub fn render(&self) -> String {
        match &self.params.relationship {
            None => match &self.params.resource_id {
                Some(id) => format!("/{}/{}", self.segment, id),
                None => format!("/{}", self.segment),
            },
            Some(rel) => match self.segment.strip_prefix(API_PREFIX) {
                Some(resource) => format!("/{API_PREFIX}{}/{}/{resource}", rel.related, rel.id),
                None => format!("/{}/{}/{}", rel.related, rel.id, self.segment),
            },
        }
    }

    /// Render `path?query`. The `?` is always present.
    pub fn with_query(&self) -> String {
        format!("{}?{}", self.render(), Query::new(self.params))
    }
}

/// Apply the API prefix to a resource name.
pub fn resource_segment(resource: &str, api_prefix: bool) -> String {
    if api_prefix {
        format!("{API_PREFIX}{resource}")
    } else {
        resource.to_string()
    }
}

/// Join a base URL and a path with exactly one `/` between them.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
