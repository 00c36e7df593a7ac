//! List view: sort, filter and page parameters for collection GETs
//!
//! Recognized query parameters (names are case-insensitive):
//!
//! | Parameter    | Meaning                                                        |
//! |--------------|----------------------------------------------------------------|
//! | `_sortField` | Field name, exposed to custom handlers                         |
//! | `_sortDir`   | `ASC` (any case) or absent sorts ascending, anything else desc |
//! | `_page`      | 1-based page; absent or unparsable returns the full list       |
//! | `_perPage`   | Positive page size; invalid values use the default             |
//! | `_filters`   | JSON object turned into a [`PropertyFilter`]                   |
//!
//! # Example
//!
//! ```rust
//! use restmux::handlers::{ListParams, SortOrder};
//!
//! let params = ListParams::new(30).with_order(SortOrder::Desc).with_page(2).with_per_page(2);
//! let page = params.apply(vec![1, 5, 3, 2, 4], &|a: &i32, b: &i32| a.cmp(b));
//! assert_eq!(page, vec![3, 2]);
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use crate::repository::PropertyFilter;

/// Sort field parameter
pub const SORT_FIELD: &str = "_sortfield";
/// Sort direction parameter
pub const SORT_DIR: &str = "_sortdir";
/// Page number parameter
pub const PAGE: &str = "_page";
/// Page size parameter
pub const PER_PAGE: &str = "_perpage";
/// Property filter parameter
pub const FILTERS: &str = "_filters";

/// Page size used when none is configured
pub const DEFAULT_PER_PAGE: usize = 30;

/// Sort direction for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Non-decreasing
    #[default]
    Asc,
    /// Non-increasing
    Desc,
}

impl SortOrder {
    /// Absent or `ASC` (any case) is ascending; any other value is descending
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            None => Self::Asc,
            Some(v) if v.eq_ignore_ascii_case("asc") => Self::Asc,
            Some(_) => Self::Desc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Parsed list parameters for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Requested sort field, if any
    pub sort_field: Option<String>,
    /// Sort direction
    pub order: SortOrder,
    /// Requested page; `None` returns the full list
    pub page: Option<i64>,
    /// Items per page, always positive
    pub per_page: usize,
    /// Filter handed to the provider
    pub filter: PropertyFilter,
}

impl ListParams {
    /// No sorting preference, no paging, empty filter
    #[must_use]
    pub fn new(default_per_page: usize) -> Self {
        Self {
            sort_field: None,
            order: SortOrder::Asc,
            page: None,
            per_page: default_per_page.max(1),
            filter: PropertyFilter::new(),
        }
    }

    /// Read the list parameters from a request's query string
    pub fn from_context(ctx: &RequestContext, default_per_page: usize) -> Self {
        let defaults = Self::new(default_per_page);

        let per_page = ctx
            .query_first(PER_PAGE)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(defaults.per_page);

        let page = ctx
            .query_first(PAGE)
            .and_then(|v| v.trim().parse::<i64>().ok());

        let filter = ctx
            .query_first(FILTERS)
            .map(PropertyFilter::parse_json)
            .unwrap_or_default();

        Self {
            sort_field: ctx.query_first(SORT_FIELD).map(str::to_string),
            order: SortOrder::from_param(ctx.query_first(SORT_DIR)),
            page,
            per_page,
            filter,
        }
    }

    /// Set the sort direction
    #[must_use]
    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Set the page
    #[must_use]
    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size; non-positive sizes are ignored
    #[must_use]
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        if per_page > 0 {
            self.per_page = per_page;
        }
        self
    }

    /// Set the filter
    #[must_use]
    pub fn with_filter(mut self, filter: PropertyFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sort then page `items`
    pub fn apply<V>(&self, mut items: Vec<V>, compare: &dyn Fn(&V, &V) -> Ordering) -> Vec<V> {
        sort_items(&mut items, self.order, compare);
        match self.page {
            Some(page) => page_items(items, page, self.per_page),
            None => items,
        }
    }
}

/// Sort in place; lists of zero or one element are left untouched
///
/// The sort is stable, so equal elements keep their provider order.
pub fn sort_items<V>(items: &mut [V], order: SortOrder, compare: &dyn Fn(&V, &V) -> Ordering) {
    if items.len() < 2 {
        return;
    }
    match order {
        SortOrder::Asc => items.sort_by(|a, b| compare(a, b)),
        SortOrder::Desc => items.sort_by(|a, b| compare(b, a)),
    }
}

/// The slice `[(page-1)*per_page, page*per_page)` clipped to bounds
///
/// Pages below one and pages past the end yield an empty list.
pub fn page_items<V>(items: Vec<V>, page: i64, per_page: usize) -> Vec<V> {
    if page < 1 || per_page == 0 {
        return Vec::new();
    }
    let start = usize::try_from(page - 1)
        .ok()
        .and_then(|p| p.checked_mul(per_page));
    let Some(start) = start.filter(|s| *s < items.len()) else {
        return Vec::new();
    };
    items.into_iter().skip(start).take(per_page).collect()
}
