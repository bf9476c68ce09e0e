//! Author endpoints
//!
//! Reads are public; mutations require a bearer token. An author's detail
//! form embeds the author's books; deleting an author also deletes them.

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
use crate::models::{Author, AuthorPayload, Book};
use crate::server::AppState;
use crate::storage::RecordFilter;

/// Every book of one author, in primary-key order
pub(crate) async fn books_of(state: &AppState, author_id: i64) -> Result<Vec<Book>, ApiError> {
    let filter = RecordFilter::by_author(author_id);
    let sort = [SortKey::asc("id")];
    let books = state.books.fetch(&filter, &sort, 0, u64::MAX).await?;
    Ok(books)
}

/// `GET /api/v1/authors`
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let envelope = run_list_query::<Author, _>(
        state.authors.as_ref(),
        &RecordFilter::default(),
        &params,
        &state.pages,
        "/api/v1/authors",
    )
    .await?;
    Ok(Json(envelope))
}

/// `GET /api/v1/authors/{id}`
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let author = fetch_record::<Author, _>(state.authors.as_ref(), "author", id).await?;
    let books = books_of(&state, id).await?;
    Ok(Json(RecordEnvelope::new(Value::Object(
        author.detail_json(&books),
    ))))
}

/// `GET /api/v1/authors/{id}/books`
pub async fn list_books(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    // The collection of an unknown author is a 404, not an empty list.
    fetch_record::<Author, _>(state.authors.as_ref(), "author", id).await?;

    let envelope = run_list_query::<Book, _>(
        state.books.as_ref(),
        &RecordFilter::by_author(id),
        &params,
        &state.pages,
        &format!("/api/v1/authors/{id}/books"),
    )
    .await?;
    Ok(Json(envelope))
}

/// `POST /api/v1/authors`
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    JsonPayload(body): JsonPayload,
) -> Result<impl IntoResponse, ApiError> {
    let payload = AuthorPayload::from_value(&body)?;
    let author = state.authors.insert(payload.into_record()).await?;
    Ok((
        StatusCode::CREATED,
        Json(RecordEnvelope::new(Value::Object(author.detail_json(&[])))),
    ))
}

/// `PUT /api/v1/authors/{id}`
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    JsonPayload(body): JsonPayload,
) -> Result<impl IntoResponse, ApiError> {
    let payload = AuthorPayload::from_value(&body)?;
    let author = state
        .authors
        .update(id, payload.into_record())
        .await?
        .ok_or_else(|| ApiError::not_found("author", id))?;
    let books = books_of(&state, id).await?;
    Ok(Json(RecordEnvelope::new(Value::Object(
        author.detail_json(&books),
    ))))
}

/// `DELETE /api/v1/authors/{id}`
///
/// Deletes the author's books as well; responds with the deleted id.
pub async fn remove(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    fetch_record::<Author, _>(state.authors.as_ref(), "author", id).await?;

    for book in books_of(&state, id).await? {
        state.books.delete(book.id).await?;
    }
    state.authors.delete(id).await?;

    Ok(Json(RecordEnvelope::new(json!(id))))
}
