//! Pagination facets: `page`, `perPage`, `limit` and `offset`.

use serde::{Deserialize, Serialize};

/// Numeric input accepted by the pagination setters.
///
/// Integers always convert. Floats convert only when they are finite and
/// integral, so `4.0` is accepted while `2.5` is not.
pub trait Count: Copy {
    /// The integral value, or `None` if the input is not an integer.
    fn to_integer(self) -> Option<i64>;
}

macro_rules! impl_count_for_int {
    ($($t:ty),*) => {
        $(
            impl Count for $t {
                fn to_integer(self) -> Option<i64> {
                    i64::try_from(self).ok()
                }
            }
        )*
    };
}

impl_count_for_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Count for f64 {
    fn to_integer(self) -> Option<i64> {
        if self.is_finite() && self.fract() == 0.0 && self.abs() <= i64::MAX as f64 {
            Some(self as i64)
        } else {
            None
        }
    }
}

impl Count for f32 {
    fn to_integer(self) -> Option<i64> {
        f64::from(self).to_integer()
    }
}

/// Pagination parameters for a resource query.
///
/// Each field is independently optional; an absent field is omitted from
/// the query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Number of items per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    /// Maximum number of items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    /// Number of items to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl Pagination {
    /// Create pagination params for a specific page.
    #[must_use]
    pub fn for_page(page: i64, per_page: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            ..Default::default()
        }
    }

    /// Returns true if no pagination facet is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.page.is_none() && self.per_page.is_none() && self.limit.is_none() && self.offset.is_none()
    }

    /// The set facets as `(key, value)` pairs in canonical order.
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, i64)> {
        [
            ("page", self.page),
            ("perPage", self.per_page),
            ("limit", self.limit),
            ("offset", self.offset),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
    }
}
