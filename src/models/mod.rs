//! Resource records and their declared field tables

pub mod author;
pub mod book;
pub mod user;

pub use author::{Author, AuthorPayload, BIRTH_DATE_FORMAT};
pub use book::{Book, BookPayload};
pub use user::User;

use crate::core::field::{FieldTable, FieldValue};
use serde_json::{Map, Value};

/// A record of one of the catalog's resource kinds.
///
/// Every resource has an immutable positive-integer primary key and a static
/// declared field table the query engine validates parameters against.
/// Serialization and sorting both go through the table, never through
/// dynamic attribute access.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Singular name used in error messages (e.g. "author")
    fn resource_name() -> &'static str;

    /// The declared field set of this resource kind
    fn field_table() -> &'static FieldTable;

    /// Primary key
    fn id(&self) -> i64;

    /// Stores assign primary keys on insert
    fn set_id(&mut self, id: i64);

    /// Typed value of a declared field, for ordering
    fn field_value(&self, field: &str) -> FieldValue;

    /// The record in declared-field JSON form
    fn to_json(&self) -> Map<String, Value>;
}
