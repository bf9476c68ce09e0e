//! Repository traits over the persistent store
//!
//! The API never talks to a database directly: collection endpoints go
//! through [`RecordStore`] (`count` / `fetch` / `get` plus mutations) and the
//! auth endpoints through [`UserStore`]. Implementations own transaction
//! scoping and isolation; callers only see records and counts. `count` is
//! never affected by offset/limit, and `fetch` returns at most `limit`
//! records starting at `offset` in the requested order.

pub mod in_memory;

pub use in_memory::InMemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::sort::SortKey;
use crate::models::{Resource, User};

/// Backend failure; translated to a generic `500` at the boundary
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StorageError>;

/// The fixed filter a collection query can carry.
///
/// The only relation in the catalog is author→books, so the single
/// supported restriction is "books of one author".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub author_id: Option<i64>,
}

impl RecordFilter {
    /// Restrict to the books of one author
    pub fn by_author(author_id: i64) -> Self {
        Self {
            author_id: Some(author_id),
        }
    }
}

/// Repository contract for a listable resource kind
#[async_trait]
pub trait RecordStore<T: Resource>: Send + Sync {
    /// Number of records matching `filter`, ignoring pagination
    async fn count(&self, filter: &RecordFilter) -> StoreResult<u64>;

    /// At most `limit` matching records starting at `offset`, ordered by
    /// `sort` (ties keep primary-key order)
    async fn fetch(
        &self,
        filter: &RecordFilter,
        sort: &[SortKey],
        offset: u64,
        limit: u64,
    ) -> StoreResult<Vec<T>>;

    /// Record by primary key
    async fn get(&self, id: i64) -> StoreResult<Option<T>>;

    /// Insert a record; the store assigns and returns the primary key
    async fn insert(&self, record: T) -> StoreResult<T>;

    /// Replace a record, preserving its primary key; `None` when absent
    async fn update(&self, id: i64, record: T) -> StoreResult<Option<T>>;

    /// Delete by primary key; `false` when absent
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}

/// Repository contract for user accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: i64) -> StoreResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Insert a user; the store assigns and returns the primary key
    async fn insert(&self, user: User) -> StoreResult<User>;

    /// Replace a user, preserving the primary key; `None` when absent
    async fn update(&self, id: i64, user: User) -> StoreResult<Option<User>>;
}
