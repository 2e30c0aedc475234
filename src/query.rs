//! Canonical query-string serialization.
//!
//! Facets are always rendered in the same order:
//!
//! 1. appended top-level keys, in insertion order
//! 2. `include`
//! 3. `sort`
//! 4. `filter[column]`, in insertion order
//! 5. `page`, `perPage`, `limit`, `offset`
//!
//! Empty facets are omitted. Values are written verbatim: commas and
//! brackets are not percent-encoded. Use [`Query::encoded`] for a strictly
//! escaped form.

use std::fmt;

use crate::params::Params;

/// Serialized query facets of a [`Params`] snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Serialize `params` into canonical `(key, value)` pairs.
    pub fn new(params: &Params) -> Self {
        let mut pairs = Vec::new();

        for (key, value) in params.appends.iter() {
            pairs.push((key.to_string(), value.to_string()));
        }

        if !params.includes.is_empty() {
            pairs.push(("include".to_string(), params.includes.join(",")));
        }

        if !params.sorts.is_empty() {
            pairs.push(("sort".to_string(), params.sorts.join(",")));
        }

        for (column, value) in params.filters.iter() {
            pairs.push((format!("filter[{column}]"), value.to_string()));
        }

        for (key, value) in params.pagination.pairs() {
            pairs.push((key.to_string(), value.to_string()));
        }

        Self { pairs }
    }

    /// The rendered pairs in canonical order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Percent-encoded form of the query, escaping keys and values.
    pub fn encoded(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

impl From<&Params> for Query {
    fn from(params: &Params) -> Self {
        Self::new(params)
    }
}
