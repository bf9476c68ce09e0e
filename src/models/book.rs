//! The book resource

use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::core::error::ApiError;
use crate::core::field::{FieldDef, FieldKind, FieldTable, FieldValue};
use crate::core::validation::{PayloadRules, digits, integer, length, positive, required, text};
use crate::models::Resource;

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
            name: "title",
            kind: FieldKind::Text,
            selectable: true,
            sortable: true,
        },
        FieldDef {
            name: "isbn",
            kind: FieldKind::Integer,
            selectable: true,
            sortable: true,
        },
        FieldDef {
            name: "number_of_pages",
            kind: FieldKind::Integer,
            selectable: true,
            sortable: true,
        },
        FieldDef {
            name: "description",
            kind: FieldKind::Text,
            selectable: true,
            sortable: false,
        },
        FieldDef {
            name: "author_id",
            kind: FieldKind::Integer,
            selectable: true,
            sortable: true,
        },
    ],
};

/// A book record, always attached to exactly one author
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: i64,
    pub title: String,
    /// 13-digit ISBN, unique across the catalog
    pub isbn: i64,
    pub number_of_pages: i64,
    pub description: Option<String>,
    pub author_id: i64,
}

impl Resource for Book {
    fn resource_name() -> &'static str {
        "book"
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
            "title" => FieldValue::Text(self.title.clone()),
            "isbn" => FieldValue::Integer(self.isbn),
            "number_of_pages" => FieldValue::Integer(self.number_of_pages),
            "description" => match &self.description {
                Some(text) => FieldValue::Text(text.clone()),
                None => FieldValue::Null,
            },
            "author_id" => FieldValue::Integer(self.author_id),
            _ => FieldValue::Null,
        }
    }

    fn to_json(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".to_string(), json!(self.id));
        map.insert("title".to_string(), json!(self.title));
        map.insert("isbn".to_string(), json!(self.isbn));
        map.insert("number_of_pages".to_string(), json!(self.number_of_pages));
        map.insert("description".to_string(), json!(self.description));
        map.insert("author_id".to_string(), json!(self.author_id));
        map
    }
}

/// Validated body of `POST /books` and `PUT /books/{id}`
#[derive(Debug, Clone)]
pub struct BookPayload {
    pub title: String,
    pub isbn: i64,
    pub number_of_pages: i64,
    pub description: Option<String>,
    pub author_id: i64,
}

#[derive(Deserialize)]
struct BookWire {
    title: String,
    isbn: i64,
    number_of_pages: i64,
    description: Option<String>,
    author_id: i64,
}

impl BookPayload {
    fn rules() -> PayloadRules {
        PayloadRules::new()
            .field("title", vec![required(), text(), length(1, 50)])
            .field("isbn", vec![required(), integer(), digits(13)])
            .field("number_of_pages", vec![required(), integer(), positive()])
            .field("description", vec![text()])
            .field("author_id", vec![required(), integer(), positive()])
    }

    /// Validate a JSON body and extract the typed payload
    pub fn from_value(body: &Value) -> Result<Self, ApiError> {
        Self::rules().validate(body)?;

        let wire: BookWire = serde_json::from_value(body.clone())
            .map_err(|e| ApiError::Internal(format!("validated payload failed to parse: {e}")))?;

        Ok(Self {
            title: wire.title,
            isbn: wire.isbn,
            number_of_pages: wire.number_of_pages,
            description: wire.description,
            author_id: wire.author_id,
        })
    }

    /// Build a record; the store assigns the real primary key on insert
    pub fn into_record(self) -> Book {
        Book {
            id: 0,
            title: self.title,
            isbn: self.isbn,
            number_of_pages: self.number_of_pages,
            description: self.description,
            author_id: self.author_id,
        }
    }
}
