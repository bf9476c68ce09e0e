//! Shared fixtures for the HTTP test suites

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use chrono::NaiveDate;
use serde_json::{Value, json};

use book_catalog::config::ApiConfig;
use book_catalog::core::auth::TokenSigner;
use book_catalog::models::{Author, BIRTH_DATE_FORMAT, Book};
use book_catalog::server::{AppState, build_router};
use book_catalog::storage::{InMemoryStore, RecordStore};

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
}

/// Fresh app over an empty in-memory store
pub fn spawn() -> TestApp {
    let config = ApiConfig {
        secret_key: "test-secret".to_string(),
        ..ApiConfig::default()
    };
    let store = Arc::new(InMemoryStore::new());
    let state = AppState {
        authors: store.clone(),
        books: store.clone(),
        users: store.clone(),
        signer: TokenSigner::new(&config.secret_key, config.token_expiry_minutes),
        pages: config.page_config(),
    };
    let server = TestServer::new(build_router(state));
    TestApp { server, store }
}

/// Eleven authors (ids 1..=11) and three books; Alice Sebold is id 8 with
/// one book, Andrzej Sapkowski id 9 with two
pub async fn seed_sample_data(store: &InMemoryStore) {
    let authors = [
        ("Adam", "Mickiewicz", "24-12-1798"),
        ("Henryk", "Sienkiewicz", "05-05-1846"),
        ("Anna", "Kowalska", "26-04-1903"),
        ("Leo", "Tolstoy", "09-09-1828"),
        ("Wladyslaw", "Reymont", "07-05-1867"),
        ("George", "Orwell", "25-06-1903"),
        ("Olga", "Tokarczuk", "29-01-1962"),
        ("Alice", "Sebold", "06-09-1963"),
        ("Andrzej", "Sapkowski", "21-06-1948"),
        ("Stephen", "King", "21-09-1947"),
        ("Terry", "Pratchett", "28-04-1948"),
    ];
    for (first_name, last_name, birth_date) in authors {
        let author = Author {
            id: 0,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            birth_date: NaiveDate::parse_from_str(birth_date, BIRTH_DATE_FORMAT)
                .expect("valid date"),
        };
        RecordStore::<Author>::insert(store, author)
            .await
            .expect("insert author");
    }

    let books = [
        ("The Lovely Bones", 9780316666343_i64, 328_i64, 8_i64),
        ("The Last Wish", 9780316029186, 400, 9),
        ("Blood of Elves", 9780316029193, 398, 9),
    ];
    for (title, isbn, number_of_pages, author_id) in books {
        let book = Book {
            id: 0,
            title: title.to_string(),
            isbn,
            number_of_pages,
            description: None,
            author_id,
        };
        RecordStore::<Book>::insert(store, book)
            .await
            .expect("insert book");
    }
}

/// Register a throwaway account and return its bearer token
pub async fn register_token(server: &TestServer) -> String {
    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "username": "test",
            "password": "123456",
            "email": "test@gmail.com"
        }))
        .await;
    let body: Value = response.json();
    body["token"].as_str().expect("token in response").to_string()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
