//! HTTP server: shared state and the versioned router
//!
//! All routes live under `/api/v1`. Handlers reach storage only through the
//! repository trait objects in [`AppState`], so any backend implementing the
//! traits can serve the API.

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::core::auth::TokenSigner;
use crate::core::query::PageConfig;
use crate::models::{Author, Book};
use crate::storage::{InMemoryStore, RecordStore, UserStore};

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub authors: Arc<dyn RecordStore<Author>>,
    pub books: Arc<dyn RecordStore<Book>>,
    pub users: Arc<dyn UserStore>,
    pub signer: TokenSigner,
    pub pages: PageConfig,
}

impl AppState {
    /// Wire every repository to one in-memory store
    pub fn in_memory(config: &ApiConfig) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            authors: store.clone(),
            books: store.clone(),
            users: store,
            signer: TokenSigner::new(&config.secret_key, config.token_expiry_minutes),
            pages: config.page_config(),
        }
    }
}

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/authors",
            get(handlers::authors::list).post(handlers::authors::create),
        )
        .route(
            "/authors/{id}",
            get(handlers::authors::detail)
                .put(handlers::authors::update)
                .delete(handlers::authors::remove),
        )
        .route("/authors/{id}/books", get(handlers::authors::list_books))
        .route(
            "/books",
            get(handlers::books::list).post(handlers::books::create),
        )
        .route(
            "/books/{id}",
            get(handlers::books::detail)
                .put(handlers::books::update)
                .delete(handlers::books::remove),
        )
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/update/password", put(handlers::auth::update_password))
        .route("/auth/update/data", put(handlers::auth::update_data))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
