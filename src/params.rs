//! Accumulated query state for a single resource request.
//!
//! [`Params`] holds every facet a builder collects: filters, includes,
//! sorts, pagination, extra top-level keys, the resource id and an optional
//! parent relationship. None of its methods perform I/O.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{Result, RqError};
use crate::pagination::{Count, Pagination};

/// A scalar query value: text or a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

macro_rules! impl_param_value_for_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ParamValue {
                fn from(value: $t) -> Self {
                    match i64::try_from(value) {
                        Ok(n) => Self::Integer(n),
                        Err(_) => Self::Text(value.to_string()),
                    }
                }
            }
        )*
    };
}

impl_param_value_for_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Sort direction for [`Params::push_sort`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Render `field` with the direction's sign (`-` for descending).
    pub fn apply(self, field: &str) -> String {
        match self {
            Self::Asc => field.to_string(),
            Self::Desc => format!("-{field}"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = RqError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(RqError::invalid(format!(
                "orderBy() direction must be 'asc' or 'desc', got '{other}'"
            ))),
        }
    }
}

/// Parent resource a request is nested under, e.g. `users/1` in `/users/1/posts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
    pub related: String,
    pub id: ParamValue,
}

/// String-keyed values that keep first-insertion order.
///
/// Re-inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyedValues {
    entries: Vec<(String, ParamValue)>,
}

impl KeyedValues {
    pub fn insert(&mut self, key: String, value: ParamValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for KeyedValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Query facets accumulated by a builder.
///
/// A clone of this struct is the immutable snapshot handed to the query
/// serializer and the path composer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Params {
    pub resource_id: Option<ParamValue>,
    pub includes: Vec<String>,
    pub sorts: Vec<String>,
    pub filters: KeyedValues,
    pub pagination: Pagination,
    pub relationship: Option<Relationship>,
    pub appends: KeyedValues,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `filter[column] = value`, replacing any earlier value.
    pub fn set_filter(&mut self, column: String, value: ParamValue) -> Result<()> {
        if column.is_empty() {
            return Err(RqError::invalid(
                "The where() function takes 2 arguments both of string values.",
            ));
        }
        self.filters.insert(column, value);
        Ok(())
    }

    /// Set `filter[column]` to the comma-joined `values`.
    pub fn set_filter_in<I>(&mut self, column: String, values: I) -> Result<()>
    where
        I: IntoIterator<Item = ParamValue>,
    {
        if column.is_empty() {
            return Err(RqError::invalid(
                "The first argument for the whereIn() function must be a non-empty string.",
            ));
        }
        let joined = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.filters.insert(column, ParamValue::Text(joined));
        Ok(())
    }

    /// Append related resources to the include list. Duplicates are kept.
    pub fn push_includes<I>(&mut self, related: I) -> Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        let before = self.includes.len();
        self.includes.extend(related);
        if self.includes.len() == before {
            return Err(RqError::invalid(
                "The with() function takes at least one argument.",
            ));
        }
        Ok(())
    }

    pub fn push_sort(&mut self, field: &str, direction: SortDirection) {
        self.sorts.push(direction.apply(field));
    }

    /// Set the page. Non-integral input is ignored.
    pub fn set_page(&mut self, page: impl Count) {
        if let Some(n) = page.to_integer() {
            self.pagination.page = Some(n);
        }
    }

    /// Set the page size. Non-integral input is ignored.
    pub fn set_per_page(&mut self, count: impl Count) {
        if let Some(n) = count.to_integer() {
            self.pagination.per_page = Some(n);
        }
    }

    pub fn set_limit(&mut self, value: impl Count) -> Result<()> {
        let n = value.to_integer().ok_or_else(|| {
            RqError::invalid("The limit() function takes a single argument of an integer.")
        })?;
        self.pagination.limit = Some(n);
        Ok(())
    }

    pub fn set_offset(&mut self, value: impl Count) -> Result<()> {
        let n = value.to_integer().ok_or_else(|| {
            RqError::invalid("The offset() function takes a single argument of an integer.")
        })?;
        self.pagination.offset = Some(n);
        Ok(())
    }

    pub fn set_append(&mut self, key: String, value: ParamValue) {
        self.appends.insert(key, value);
    }

    pub fn set_relationship(&mut self, related: String, id: ParamValue) {
        self.relationship = Some(Relationship { related, id });
    }

    pub fn set_resource_id(&mut self, id: ParamValue) {
        self.resource_id = Some(id);
    }
}
