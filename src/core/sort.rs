//! Sort expression parsing and record ordering
//!
//! A sort expression is a comma-separated list of field names; a leading `-`
//! marks descending order. Every bare name must be a declared, sortable field
//! of the resource. An empty or absent expression falls back to ascending
//! order on the primary key.
//!
//! Duplicate field names are permitted; only the first occurrence's direction
//! is honored (stable dedup), so `sort=id,-id` orders by ascending id.

use crate::core::error::ApiError;
use crate::core::field::FieldTable;
use crate::models::Resource;
use std::cmp::Ordering;

/// Sort direction marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One (field, direction) pair of a parsed sort spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Parse and validate a sort expression against a declared field table
pub fn parse_sort(expr: Option<&str>, table: &FieldTable) -> Result<Vec<SortKey>, ApiError> {
    let expr = match expr {
        Some(e) if !e.trim().is_empty() => e,
        _ => return Ok(vec![SortKey::asc(table.primary_key)]),
    };

    let mut keys: Vec<SortKey> = Vec::new();
    for token in expr.split(',') {
        let token = token.trim();
        let (name, direction) = match token.strip_prefix('-') {
            Some(bare) => (bare, SortDirection::Desc),
            None => (token, SortDirection::Asc),
        };

        if !table.is_sortable(name) {
            return Err(ApiError::field(
                "sort",
                format!("'{name}' is not a sortable field"),
            ));
        }

        // First occurrence wins; later duplicates are dropped.
        if !keys.iter().any(|k| k.field == name) {
            keys.push(SortKey {
                field: name.to_string(),
                direction,
            });
        }
    }

    Ok(keys)
}

/// Order records in place according to a parsed sort spec
///
/// The sort is stable, so records equal under every key keep their incoming
/// (primary-key) order.
pub fn sort_records<T: Resource>(records: &mut [T], keys: &[SortKey]) {
    records.sort_by(|a, b| {
        for key in keys {
            let ordering = a
                .field_value(&key.field)
                .compare(&b.field_value(&key.field));
            let ordering = match key.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Author;
    use chrono::NaiveDate;

    fn table() -> &'static FieldTable {
        Author::field_table()
    }

    fn author(id: i64, first_name: &str, year: i32) -> Author {
        Author {
            id,
            first_name: first_name.to_string(),
            last_name: "Test".to_string(),
            birth_date: NaiveDate::from_ymd_opt(year, 1, 1).expect("valid date"),
        }
    }

    #[test]
    fn test_absent_expression_defaults_to_primary_key_asc() {
        let keys = parse_sort(None, table()).expect("should succeed");
        assert_eq!(keys, vec![SortKey::asc("id")]);
    }

    #[test]
    fn test_empty_expression_defaults_to_primary_key_asc() {
        let keys = parse_sort(Some(""), table()).expect("should succeed");
        assert_eq!(keys, vec![SortKey::asc("id")]);
    }

    #[test]
    fn test_descending_prefix() {
        let keys = parse_sort(Some("-id"), table()).expect("should succeed");
        assert_eq!(keys, vec![SortKey::desc("id")]);
    }

    #[test]
    fn test_multi_key_expression() {
        let keys = parse_sort(Some("last_name,-birth_date"), table()).expect("should succeed");
        assert_eq!(
            keys,
            vec![SortKey::asc("last_name"), SortKey::desc("birth_date")]
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = parse_sort(Some("shoe_size"), table()).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_unknown_field_rejected_with_direction_prefix() {
        let err = parse_sort(Some("-shoe_size"), table()).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_duplicate_field_first_direction_wins() {
        let keys = parse_sort(Some("id,-id"), table()).expect("should succeed");
        assert_eq!(keys, vec![SortKey::asc("id")]);

        let keys = parse_sort(Some("-id,id"), table()).expect("should succeed");
        assert_eq!(keys, vec![SortKey::desc("id")]);
    }

    #[test]
    fn test_sort_records_descending_by_id() {
        let mut records = vec![author(1, "A", 1990), author(3, "C", 1970), author(2, "B", 1980)];
        sort_records(&mut records, &[SortKey::desc("id")]);
        let ids: Vec<i64> = records.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_records_multi_key_stable() {
        let mut records = vec![
            author(1, "Zoe", 1990),
            author(2, "Amy", 1990),
            author(3, "Amy", 1970),
        ];
        sort_records(
            &mut records,
            &[SortKey::asc("first_name"), SortKey::asc("birth_date")],
        );
        let ids: Vec<i64> = records.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
