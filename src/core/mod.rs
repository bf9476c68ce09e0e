//! Core module: the list-query engine and its supporting types

pub mod auth;
pub mod error;
pub mod executor;
pub mod extractors;
pub mod field;
pub mod query;
pub mod response;
pub mod sort;
pub mod validation;

pub use auth::{AuthUser, TokenSigner};
pub use error::{ApiError, FieldErrors};
pub use executor::{fetch_record, run_list_query};
pub use extractors::JsonPayload;
pub use field::{FieldDef, FieldKind, FieldTable, FieldValue, select_fields};
pub use query::{ListParams, ListQuery, PageBounds, PageConfig, Pagination};
pub use response::{ListEnvelope, RecordEnvelope, TokenEnvelope};
pub use sort::{SortDirection, SortKey, parse_sort, sort_records};
