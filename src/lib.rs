//! # Book Catalog API
//!
//! A RESTful catalog of books and their authors, built around a declarative
//! list-query engine.
//!
//! ## Features
//!
//! - **Declared Field Tables**: Each resource declares its fields once; the
//!   query engine validates every parameter against them
//! - **Field Selection**: `?fields=first_name,last_name` trims records to a
//!   requested subset, in request order
//! - **Multi-Key Sorting**: `?sort=-birth_date,last_name` with a leading `-`
//!   for descending order
//! - **Self-Describing Pagination**: every list response carries
//!   `current_page`, `next_page` and `previous_page` links that echo the
//!   request's own parameters
//! - **Bearer-Token Auth**: registration and login issue signed, time-limited
//!   JWTs; every mutation requires one
//! - **Pluggable Storage**: handlers only see repository traits; the bundled
//!   backend is an in-memory store
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use book_catalog::prelude::*;
//!
//! let config = ApiConfig::default();
//! let state = AppState::in_memory(&config);
//! let app = build_router(state);
//!
//! let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod core;
pub mod models;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Query engine ===
    pub use crate::core::{
        auth::{AuthUser, TokenSigner},
        error::{ApiError, FieldErrors},
        executor::{fetch_record, run_list_query},
        extractors::JsonPayload,
        query::{ListParams, ListQuery, PageBounds, PageConfig, Pagination},
        response::{ListEnvelope, RecordEnvelope, TokenEnvelope},
        sort::{SortDirection, SortKey},
    };

    // === Models ===
    pub use crate::models::{Author, AuthorPayload, Book, BookPayload, Resource, User};

    // === Storage ===
    pub use crate::storage::{InMemoryStore, RecordFilter, RecordStore, UserStore};

    // === Config ===
    pub use crate::config::ApiConfig;

    // === Server ===
    pub use crate::server::{AppState, build_router};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use serde::{Deserialize, Serialize};
}
