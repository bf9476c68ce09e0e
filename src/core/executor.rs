//! The list-query executor
//!
//! Glues the validated query, the repository and the response builder
//! together: count (unaffected by offset/limit) → page bounds → bounded,
//! ordered fetch → per-record field selection → list envelope with
//! pagination links. Every collection endpoint funnels through
//! [`run_list_query`].

use serde_json::Value;

use crate::core::error::ApiError;
use crate::core::field::select_fields;
use crate::core::query::{ListParams, ListQuery, PageBounds, PageConfig, Pagination};
use crate::core::response::ListEnvelope;
use crate::models::Resource;
use crate::storage::{RecordFilter, RecordStore};

/// Execute a full list query and assemble the response envelope
///
/// `base_path` is the resource path used to construct page links; the
/// originally supplied parameters are echoed into them unchanged. A `page`
/// past the last one yields an empty `data` array with intact pagination
/// metadata, per the pagination policy.
pub async fn run_list_query<T, S>(
    store: &S,
    filter: &RecordFilter,
    params: &ListParams,
    config: &PageConfig,
    base_path: &str,
) -> Result<ListEnvelope, ApiError>
where
    T: Resource,
    S: RecordStore<T> + ?Sized,
{
    let table = T::field_table();
    let query = ListQuery::from_params(params, table, config)?;

    let total = store.count(filter).await?;
    let bounds = PageBounds::compute(total, query.page, query.limit);

    let records = store
        .fetch(filter, &query.sort, bounds.offset, query.limit)
        .await?;

    let mut data = Vec::with_capacity(records.len());
    for record in &records {
        let reduced = select_fields(&record.to_json(), &query.fields, table)?;
        data.push(Value::Object(reduced));
    }

    let pagination = Pagination::build(base_path, &query, &bounds);
    Ok(ListEnvelope::new(data, pagination))
}

/// Fetch one record by primary key, mapping absence to `NotFound`
pub async fn fetch_record<T, S>(store: &S, resource: &str, id: i64) -> Result<T, ApiError>
where
    T: Resource,
    S: RecordStore<T> + ?Sized,
{
    store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(resource, id))
}
