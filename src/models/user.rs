//! The user account record
//!
//! Users exist only for authentication and profile management; they are
//! never exposed as a listable collection, so unlike authors and books they
//! carry no declared field table.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value, json};

/// A registered user
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    /// Unique login name
    pub username: String,
    /// Unique, format-checked at registration
    pub email: String,
    /// Argon2 PHC string; never serialized
    pub password_hash: String,
    pub creation_date: DateTime<Utc>,
}

impl User {
    /// Public form: everything except the password hash
    pub fn public_json(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".to_string(), json!(self.id));
        map.insert("username".to_string(), json!(self.username));
        map.insert("email".to_string(), json!(self.email));
        map.insert(
            "creation_date".to_string(),
            json!(self.creation_date.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_json_omits_password_hash() {
        let user = User {
            id: 1,
            username: "test".to_string(),
            email: "test@gmail.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            creation_date: Utc::now(),
        };
        let map = user.public_json();
        assert_eq!(map["username"], json!("test"));
        assert_eq!(map["email"], json!("test@gmail.com"));
        assert!(map.contains_key("id"));
        assert!(map.contains_key("creation_date"));
        assert!(!map.contains_key("password_hash"));
        assert!(!map.contains_key("password"));
    }
}
