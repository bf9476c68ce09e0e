//! Book endpoints
//!
//! Reads are public; mutations require a bearer token. A book must reference
//! an existing author and its ISBN is unique across the catalog.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{Value, json};

use crate::core::auth::AuthUser;
use crate::core::error::ApiError;
use crate::core::executor::{fetch_record, run_list_query};
use crate::core::extractors::JsonPayload;
use crate::core::query::ListParams;
use crate::core::response::RecordEnvelope;
use crate::core::sort::SortKey;
use crate::models::{Author, Book, BookPayload, Resource};
use crate::server::AppState;
use crate::storage::RecordFilter;

/// Reject a payload whose ISBN is already used by another book
async fn check_isbn_free(
    state: &AppState,
    isbn: i64,
    exclude_id: Option<i64>,
) -> Result<(), ApiError> {
    let sort = [SortKey::asc("id")];
    let books = state
        .books
        .fetch(&RecordFilter::default(), &sort, 0, u64::MAX)
        .await?;
    let taken = books
        .iter()
        .any(|b| b.isbn == isbn && Some(b.id) != exclude_id);
    if taken {
        return Err(ApiError::Conflict(format!(
            "Book with ISBN {isbn} already exists"
        )));
    }
    Ok(())
}

/// The referenced author must exist before a book can point at it
async fn check_author_exists(state: &AppState, author_id: i64) -> Result<(), ApiError> {
    fetch_record::<Author, _>(state.authors.as_ref(), "author", author_id).await?;
    Ok(())
}

/// `GET /api/v1/books`
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let envelope = run_list_query::<Book, _>(
        state.books.as_ref(),
        &RecordFilter::default(),
        &params,
        &state.pages,
        "/api/v1/books",
    )
    .await?;
    Ok(Json(envelope))
}

/// `GET /api/v1/books/{id}`
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let book = fetch_record::<Book, _>(state.books.as_ref(), "book", id).await?;
    Ok(Json(RecordEnvelope::new(Value::Object(book.to_json()))))
}

/// `POST /api/v1/books`
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    JsonPayload(body): JsonPayload,
) -> Result<impl IntoResponse, ApiError> {
    let payload = BookPayload::from_value(&body)?;
    check_author_exists(&state, payload.author_id).await?;
    check_isbn_free(&state, payload.isbn, None).await?;

    let book = state.books.insert(payload.into_record()).await?;
    Ok((
        StatusCode::CREATED,
        Json(RecordEnvelope::new(Value::Object(book.to_json()))),
    ))
}

/// `PUT /api/v1/books/{id}`
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    JsonPayload(body): JsonPayload,
) -> Result<impl IntoResponse, ApiError> {
    let payload = BookPayload::from_value(&body)?;
    check_author_exists(&state, payload.author_id).await?;
    check_isbn_free(&state, payload.isbn, Some(id)).await?;

    let book = state
        .books
        .update(id, payload.into_record())
        .await?
        .ok_or_else(|| ApiError::not_found("book", id))?;
    Ok(Json(RecordEnvelope::new(Value::Object(book.to_json()))))
}

/// `DELETE /api/v1/books/{id}`
pub async fn remove(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    fetch_record::<Book, _>(state.books.as_ref(), "book", id).await?;
    state.books.delete(id).await?;
    Ok(Json(RecordEnvelope::new(json!(id))))
}
