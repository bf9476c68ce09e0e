//! Success envelopes for API responses

use serde::Serialize;
use serde_json::Value;

use crate::core::query::Pagination;

/// Envelope of a list endpoint
#[derive(Debug, Serialize)]
pub struct ListEnvelope {
    pub success: bool,
    pub data: Vec<Value>,
    pub number_of_records: usize,
    pub pagination: Pagination,
}

impl ListEnvelope {
    pub fn new(data: Vec<Value>, pagination: Pagination) -> Self {
        Self {
            success: true,
            number_of_records: data.len(),
            data,
            pagination,
        }
    }
}

/// Envelope of a detail or mutation endpoint
#[derive(Debug, Serialize)]
pub struct RecordEnvelope<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> RecordEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Envelope of the credential-issuing auth endpoints
#[derive(Debug, Serialize)]
pub struct TokenEnvelope {
    pub success: bool,
    pub token: String,
}

impl TokenEnvelope {
    pub fn new(token: String) -> Self {
        Self {
            success: true,
            token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::{ListQuery, ListParams, PageBounds, PageConfig, Pagination};
    use crate::models::{Author, Resource};
    use serde_json::json;

    fn pagination() -> Pagination {
        let query = ListQuery::from_params(
            &ListParams::default(),
            Author::field_table(),
            &PageConfig::default(),
        )
        .expect("should validate");
        Pagination::build("/api/v1/authors", &query, &PageBounds::compute(0, 1, 5))
    }

    #[test]
    fn test_list_envelope_counts_records() {
        let envelope = ListEnvelope::new(vec![json!({"id": 1}), json!({"id": 2})], pagination());
        assert!(envelope.success);
        assert_eq!(envelope.number_of_records, 2);
    }

    #[test]
    fn test_empty_list_envelope_serialization() {
        let envelope = ListEnvelope::new(vec![], pagination());
        let value = serde_json::to_value(&envelope).expect("should serialize");
        assert_eq!(
            value,
            json!({
                "success": true,
                "data": [],
                "number_of_records": 0,
                "pagination": {
                    "total_pages": 0,
                    "total_records": 0,
                    "current_page": "/api/v1/authors?page=1"
                }
            })
        );
    }

    #[test]
    fn test_record_envelope() {
        let envelope = RecordEnvelope::new(json!({"id": 1}));
        let value = serde_json::to_value(&envelope).expect("should serialize");
        assert_eq!(value, json!({"success": true, "data": {"id": 1}}));
    }

    #[test]
    fn test_token_envelope() {
        let envelope = TokenEnvelope::new("abc".to_string());
        let value = serde_json::to_value(&envelope).expect("should serialize");
        assert_eq!(value, json!({"success": true, "token": "abc"}));
    }
}
