//! Declared field tables and polymorphic field values
//!
//! Every resource kind declares a static table of its fields (name, kind,
//! selectable/sortable flags). Query parameters are checked against that
//! table before any storage access, and record serialization/ordering goes
//! through [`FieldValue`] so the engine never touches dynamic attributes.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Declared type of a resource field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    Date,
    DateTime,
}

/// One declared field of a resource kind
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    /// Field name as it appears in query parameters and JSON output
    pub name: &'static str,
    pub kind: FieldKind,
    /// Eligible for the `fields=` selection parameter
    pub selectable: bool,
    /// Eligible for the `sort=` parameter
    pub sortable: bool,
}

/// Static declared field set of one resource kind
#[derive(Debug, Clone, Copy)]
pub struct FieldTable {
    /// Primary key field name; default sort order is ascending on this
    pub primary_key: &'static str,
    pub fields: &'static [FieldDef],
}

impl FieldTable {
    /// Look up a declared field by name
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `name` can appear in `fields=`
    pub fn is_selectable(&self, name: &str) -> bool {
        self.get(name).is_some_and(|f| f.selectable)
    }

    /// Whether `name` can appear in `sort=`
    pub fn is_sortable(&self, name: &str) -> bool {
        self.get(name).is_some_and(|f| f.sortable)
    }
}

/// A typed field value extracted from a record, used for ordering
///
/// Values of the same variant compare naturally. `Null` sorts before
/// everything else; mismatched variants fall back to a fixed variant rank so
/// the comparator stays total (a well-typed store never produces that case).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    fn rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Integer(_) => 1,
            FieldValue::Text(_) => 2,
            FieldValue::Date(_) => 3,
            FieldValue::DateTime(_) => 4,
        }
    }

    /// Total ordering across field values
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Reduce a serialized record to the requested field subset
///
/// - An empty request returns the record unchanged (all declared fields).
/// - Any name absent from `table` fails with a validation error naming the
///   offending field; no partial result is produced.
/// - Otherwise the output contains exactly the requested fields, in request
///   order, with their original values. Duplicate names keep the first
///   occurrence.
pub fn select_fields(
    record: &Map<String, Value>,
    requested: &[String],
    table: &FieldTable,
) -> Result<Map<String, Value>, crate::core::error::ApiError> {
    if requested.is_empty() {
        return Ok(record.clone());
    }

    let mut reduced = Map::new();
    for name in requested {
        if !table.is_selectable(name) {
            return Err(crate::core::error::ApiError::field(
                "fields",
                format!("'{name}' is not a valid field"),
            ));
        }
        if let Some(value) = record.get(name.as_str()) {
            reduced.insert(name.clone(), value.clone());
        }
    }
    Ok(reduced)
}
