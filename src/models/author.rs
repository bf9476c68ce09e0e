//! The author resource

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::core::error::ApiError;
use crate::core::field::{FieldDef, FieldKind, FieldTable, FieldValue};
use crate::core::validation::{PayloadRules, date, length, required, text};
use crate::models::{Book, Resource};

/// Wire format of `birth_date`, e.g. `03-08-1998`
pub const BIRTH_DATE_FORMAT: &str = "%d-%m-%Y";

static FIELDS: FieldTable = FieldTable {
    primary_key: "id",
    fields: &[
        FieldDef {
            name: "id",
            kind: FieldKind::Integer,
            selectable: true,
            sortable: true,
        },
        FieldDef {
            name: "first_name",
            kind: FieldKind::Text,
            selectable: true,
            sortable: true,
        },
        FieldDef {
            name: "last_name",
            kind: FieldKind::Text,
            selectable: true,
            sortable: true,
        },
        FieldDef {
            name: "birth_date",
            kind: FieldKind::Date,
            selectable: true,
            sortable: true,
        },
    ],
};

/// An author record
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
}

impl Author {
    /// Detail form: declared fields plus the author's books
    /// (declared-field form, no field selection applied to nested books)
    pub fn detail_json(&self, books: &[Book]) -> Map<String, Value> {
        let mut map = self.to_json();
        map.insert(
            "books".to_string(),
            Value::Array(books.iter().map(|b| Value::Object(b.to_json())).collect()),
        );
        map
    }
}

impl Resource for Author {
    fn resource_name() -> &'static str {
        "author"
    }

    fn field_table() -> &'static FieldTable {
        &FIELDS
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn field_value(&self, field: &str) -> FieldValue {
        match field {
            "id" => FieldValue::Integer(self.id),
            "first_name" => FieldValue::Text(self.first_name.clone()),
            "last_name" => FieldValue::Text(self.last_name.clone()),
            "birth_date" => FieldValue::Date(self.birth_date),
            _ => FieldValue::Null,
        }
    }

    fn to_json(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".to_string(), json!(self.id));
        map.insert("first_name".to_string(), json!(self.first_name));
        map.insert("last_name".to_string(), json!(self.last_name));
        map.insert(
            "birth_date".to_string(),
            json!(self.birth_date.format(BIRTH_DATE_FORMAT).to_string()),
        );
        map
    }
}

/// Validated body of `POST /authors` and `PUT /authors/{id}`
#[derive(Debug, Clone)]
pub struct AuthorPayload {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
}

#[derive(Deserialize)]
struct AuthorWire {
    first_name: String,
    last_name: String,
    birth_date: String,
}

impl AuthorPayload {
    fn rules() -> PayloadRules {
        PayloadRules::new()
            .field("first_name", vec![required(), text(), length(1, 50)])
            .field("last_name", vec![required(), text(), length(1, 50)])
            .field("birth_date", vec![required(), text(), date(BIRTH_DATE_FORMAT)])
    }

    /// Validate a JSON body and extract the typed payload
    pub fn from_value(body: &Value) -> Result<Self, ApiError> {
        Self::rules().validate(body)?;

        let wire: AuthorWire = serde_json::from_value(body.clone())
            .map_err(|e| ApiError::Internal(format!("validated payload failed to parse: {e}")))?;
        let birth_date = NaiveDate::parse_from_str(&wire.birth_date, BIRTH_DATE_FORMAT)
            .map_err(|e| ApiError::Internal(format!("validated date failed to parse: {e}")))?;

        Ok(Self {
            first_name: wire.first_name,
            last_name: wire.last_name,
            birth_date,
        })
    }

    /// Build a record; the store assigns the real primary key on insert
    pub fn into_record(self) -> Author {
        Author {
            id: 0,
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date: self.birth_date,
        }
    }
}
