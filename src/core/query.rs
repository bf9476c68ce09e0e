//! List query parameters, page bounds and pagination links
//!
//! A collection endpoint accepts `fields`, `sort`, `page` and `limit` query
//! parameters. [`ListQuery::from_params`] validates them against the
//! resource's declared field table and produces a request-scoped value the
//! executor can trust. [`PageBounds`] and [`Pagination`] turn a record count
//! into storage bounds and self-describing page links.
//!
//! Policy of record:
//! - `limit` is clamped silently to `[1, max_limit]`; out-of-range input is
//!   never an error.
//! - `page` must be an integer ≥ 1; anything else is a validation error.
//! - A `page` past the last one yields an empty record set, not an error.

use serde::Deserialize;
use serde_json::Value;

use crate::core::error::ApiError;
use crate::core::field::FieldTable;
use crate::core::sort::{SortKey, parse_sort};

/// Raw query-string parameters of a list request
///
/// Everything is kept as the originally supplied string so that page links
/// can echo the parameters byte for byte.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub fields: Option<String>,
    pub sort: Option<String>,
}

/// Pagination limits taken from configuration
#[derive(Debug, Clone, Copy)]
pub struct PageConfig {
    /// Page size when no `limit` is supplied
    pub default_limit: u64,
    /// Upper clamp for `limit`
    pub max_limit: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            default_limit: 5,
            max_limit: 100,
        }
    }
}

/// A validated list query, constructed once per request
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Requested field subset; empty means all declared fields
    pub fields: Vec<String>,
    /// Parsed sort spec; never empty (defaults to primary key ascending)
    pub sort: Vec<SortKey>,
    /// Requested page, 1-based
    pub page: u64,
    /// Effective page size after clamping
    pub limit: u64,
    /// Originally supplied `fields`, for link reconstruction
    pub raw_fields: Option<String>,
    /// Originally supplied `sort`, for link reconstruction
    pub raw_sort: Option<String>,
    /// Originally supplied `limit`, for link reconstruction
    pub raw_limit: Option<String>,
}

impl ListQuery {
    /// Validate raw parameters against a declared field table
    pub fn from_params(
        params: &ListParams,
        table: &FieldTable,
        config: &PageConfig,
    ) -> Result<Self, ApiError> {
        let page = match params.page.as_deref() {
            None => 1,
            Some(raw) => {
                let page: u64 = raw
                    .parse()
                    .map_err(|_| ApiError::field("page", "Not a valid integer."))?;
                if page < 1 {
                    return Err(ApiError::field(
                        "page",
                        "Must be greater than or equal to 1.",
                    ));
                }
                page
            }
        };

        // Out-of-range limits are clamped, never rejected; negative input
        // clamps to 1 like zero does.
        let limit = match params.limit.as_deref() {
            None => config.default_limit,
            Some(raw) => {
                let limit: i128 = raw
                    .parse()
                    .map_err(|_| ApiError::field("limit", "Not a valid integer."))?;
                limit.clamp(1, config.max_limit as i128) as u64
            }
        };

        let fields = match params.fields.as_deref() {
            None => Vec::new(),
            Some(raw) => {
                let mut fields: Vec<String> = Vec::new();
                for name in raw.split(',').map(str::trim) {
                    if !table.is_selectable(name) {
                        return Err(ApiError::field(
                            "fields",
                            format!("'{name}' is not a valid field"),
                        ));
                    }
                    if !fields.iter().any(|f| f == name) {
                        fields.push(name.to_string());
                    }
                }
                fields
            }
        };

        let sort = parse_sort(params.sort.as_deref(), table)?;

        Ok(Self {
            fields,
            sort,
            page,
            limit,
            raw_fields: params.fields.clone(),
            raw_sort: params.sort.clone(),
            raw_limit: params.limit.clone(),
        })
    }
}

/// Computed bounds of one result page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub total_records: u64,
    /// `ceil(total_records / limit)`, 0 when the collection is empty
    pub total_pages: u64,
    /// Storage offset: `(page - 1) * limit`, saturating at `u64::MAX`
    pub offset: u64,
}

impl PageBounds {
    pub fn compute(total_records: u64, page: u64, limit: u64) -> Self {
        let total_pages = if total_records == 0 {
            0
        } else {
            total_records.div_ceil(limit)
        };
        Self {
            total_records,
            total_pages,
            // A saturated offset is far past any real page and yields an
            // empty fetch, same as an ordinary page overrun.
            offset: (page - 1).saturating_mul(limit),
        }
    }
}

/// The pagination block of a list envelope
///
/// `current_page` always reflects the request's own path and parameters;
/// neighbour links recompute only `page`, echoing `fields`, `sort` and
/// `limit` exactly as supplied. Parameter order in link strings is fixed:
/// `page`, `fields`, `sort`, `limit`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Pagination {
    pub total_pages: u64,
    pub total_records: u64,
    pub current_page: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<String>,
}

impl Pagination {
    /// Build the pagination block for a validated query and computed bounds
    pub fn build(base_path: &str, query: &ListQuery, bounds: &PageBounds) -> Self {
        let next_page = (bounds.total_pages > 0 && query.page < bounds.total_pages)
            .then(|| page_link(base_path, query, query.page + 1));
        let previous_page = (bounds.total_pages > 0 && query.page > 1)
            .then(|| page_link(base_path, query, query.page - 1));

        Self {
            total_pages: bounds.total_pages,
            total_records: bounds.total_records,
            current_page: page_link(base_path, query, query.page),
            next_page,
            previous_page,
        }
    }
}

/// Serialize a page link: `page` first, then every other originally-supplied
/// parameter in fixed order, omitted when absent.
fn page_link(base_path: &str, query: &ListQuery, page: u64) -> String {
    let mut link = format!("{base_path}?page={page}");
    if let Some(fields) = &query.raw_fields {
        link.push_str(&format!("&fields={fields}"));
    }
    if let Some(sort) = &query.raw_sort {
        link.push_str(&format!("&sort={sort}"));
    }
    if let Some(limit) = &query.raw_limit {
        link.push_str(&format!("&limit={limit}"));
    }
    link
}

impl Pagination {
    /// The block as a JSON value (handy in tests)
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, Resource};

    fn params(
        page: Option<&str>,
        limit: Option<&str>,
        fields: Option<&str>,
        sort: Option<&str>,
    ) -> ListParams {
        ListParams {
            page: page.map(String::from),
            limit: limit.map(String::from),
            fields: fields.map(String::from),
            sort: sort.map(String::from),
        }
    }

    fn query(raw: &ListParams) -> ListQuery {
        ListQuery::from_params(raw, Author::field_table(), &PageConfig::default())
            .expect("should validate")
    }

    #[test]
    fn test_defaults() {
        let q = query(&params(None, None, None, None));
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 5);
        assert!(q.fields.is_empty());
        assert_eq!(q.sort.len(), 1);
        assert_eq!(q.sort[0].field, "id");
    }

    #[test]
    fn test_limit_clamped_high_and_low() {
        let q = query(&params(None, Some("5000"), None, None));
        assert_eq!(q.limit, 100);
        assert_eq!(q.raw_limit.as_deref(), Some("5000"));

        let q = query(&params(None, Some("0"), None, None));
        assert_eq!(q.limit, 1);
    }

    #[test]
    fn test_negative_limit_clamped_not_rejected() {
        let q = query(&params(None, Some("-1"), None, None));
        assert_eq!(q.limit, 1);
        assert_eq!(q.raw_limit.as_deref(), Some("-1"));

        let q = query(&params(None, Some("-5000"), None, None));
        assert_eq!(q.limit, 1);
    }

    #[test]
    fn test_page_zero_rejected() {
        let err = ListQuery::from_params(
            &params(Some("0"), None, None, None),
            Author::field_table(),
            &PageConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_non_numeric_page_rejected() {
        let err = ListQuery::from_params(
            &params(Some("two"), None, None, None),
            Author::field_table(),
            &PageConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_unknown_selected_field_rejected() {
        let err = ListQuery::from_params(
            &params(None, None, Some("first_name,shoe_size"), None),
            Author::field_table(),
            &PageConfig::default(),
        )
        .unwrap_err();
        match err {
            ApiError::Validation(map) => assert!(map["fields"][0].contains("shoe_size")),
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_page_bounds_ceiling_division() {
        let bounds = PageBounds::compute(11, 1, 5);
        assert_eq!(bounds.total_pages, 3);
        assert_eq!(bounds.offset, 0);

        let bounds = PageBounds::compute(10, 2, 5);
        assert_eq!(bounds.total_pages, 2);
        assert_eq!(bounds.offset, 5);

        let bounds = PageBounds::compute(11, 2, 2);
        assert_eq!(bounds.total_pages, 6);
        assert_eq!(bounds.offset, 2);
    }

    #[test]
    fn test_page_bounds_offset_saturates_on_huge_page() {
        let bounds = PageBounds::compute(11, u64::MAX, 100);
        assert_eq!(bounds.offset, u64::MAX);
        assert_eq!(bounds.total_pages, 1);
        assert_eq!(bounds.total_records, 11);
    }

    #[test]
    fn test_page_bounds_empty_collection() {
        let bounds = PageBounds::compute(0, 1, 5);
        assert_eq!(bounds.total_pages, 0);
        assert_eq!(bounds.total_records, 0);
    }

    #[test]
    fn test_links_first_page() {
        let q = query(&params(None, None, None, None));
        let bounds = PageBounds::compute(11, 1, 5);
        let p = Pagination::build("/api/v1/authors", &q, &bounds);
        assert_eq!(p.current_page, "/api/v1/authors?page=1");
        assert_eq!(p.next_page.as_deref(), Some("/api/v1/authors?page=2"));
        assert_eq!(p.previous_page, None);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.total_records, 11);
    }

    #[test]
    fn test_links_preserve_other_params_in_fixed_order() {
        let raw = params(Some("2"), Some("2"), Some("first_name"), Some("-id"));
        let q = query(&raw);
        let bounds = PageBounds::compute(11, 2, 2);
        let p = Pagination::build("/api/v1/authors", &q, &bounds);
        assert_eq!(
            p.current_page,
            "/api/v1/authors?page=2&fields=first_name&sort=-id&limit=2"
        );
        assert_eq!(
            p.next_page.as_deref(),
            Some("/api/v1/authors?page=3&fields=first_name&sort=-id&limit=2")
        );
        assert_eq!(
            p.previous_page.as_deref(),
            Some("/api/v1/authors?page=1&fields=first_name&sort=-id&limit=2")
        );
        assert_eq!(p.total_pages, 6);
    }

    #[test]
    fn test_no_links_when_collection_empty() {
        let q = query(&params(Some("3"), None, None, None));
        let bounds = PageBounds::compute(0, 3, 5);
        let p = Pagination::build("/api/v1/authors", &q, &bounds);
        assert_eq!(p.next_page, None);
        assert_eq!(p.previous_page, None);
        assert_eq!(p.current_page, "/api/v1/authors?page=3");
    }

    #[test]
    fn test_page_past_the_end_keeps_current_link_and_previous() {
        let q = query(&params(Some("5"), None, None, None));
        let bounds = PageBounds::compute(11, 5, 5);
        let p = Pagination::build("/api/v1/authors", &q, &bounds);
        assert_eq!(p.current_page, "/api/v1/authors?page=5");
        assert_eq!(p.next_page, None);
        assert_eq!(p.previous_page.as_deref(), Some("/api/v1/authors?page=4"));
    }

    #[test]
    fn test_previous_present_iff_page_greater_than_one() {
        let q = query(&params(Some("2"), None, None, None));
        let bounds = PageBounds::compute(11, 2, 5);
        let p = Pagination::build("/api/v1/authors", &q, &bounds);
        assert_eq!(p.previous_page.as_deref(), Some("/api/v1/authors?page=1"));
        assert_eq!(p.next_page.as_deref(), Some("/api/v1/authors?page=3"));
    }
}
