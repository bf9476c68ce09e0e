//! In-memory reference backend
//!
//! Keeps each resource kind in an `RwLock`-guarded table keyed by primary
//! key. Primary keys are assigned sequentially starting at 1 and are never
//! reused within a process. Suitable for tests and demos; a database-backed
//! store implements the same traits.

use std::sync::RwLock;

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::core::sort::{SortKey, sort_records};
use crate::models::{Author, Book, Resource, User};
use crate::storage::{RecordFilter, RecordStore, StorageError, StoreResult, UserStore};

#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Resource> Table<T> {
    fn insert(&mut self, mut record: T) -> T {
        record.set_id(self.next_id);
        self.next_id += 1;
        self.rows.insert(record.id(), record.clone());
        record
    }

    fn update(&mut self, id: i64, mut record: T) -> Option<T> {
        if !self.rows.contains_key(&id) {
            return None;
        }
        record.set_id(id);
        self.rows.insert(id, record.clone());
        Some(record)
    }

    fn page(
        &self,
        keep: impl Fn(&T) -> bool,
        sort: &[SortKey],
        offset: u64,
        limit: u64,
    ) -> Vec<T> {
        let mut rows: Vec<T> = self.rows.values().filter(|r| keep(r)).cloned().collect();
        sort_records(&mut rows, sort);
        rows.into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect()
    }
}

/// Process-local store backing all three repositories
#[derive(Debug, Default)]
pub struct InMemoryStore {
    authors: RwLock<Table<Author>>,
    books: RwLock<Table<Book>>,
    users: RwLock<Table<User>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> StorageError {
    StorageError::LockPoisoned(err.to_string())
}

#[async_trait]
impl RecordStore<Author> for InMemoryStore {
    async fn count(&self, _filter: &RecordFilter) -> StoreResult<u64> {
        let table = self.authors.read().map_err(poisoned)?;
        Ok(table.rows.len() as u64)
    }

    async fn fetch(
        &self,
        _filter: &RecordFilter,
        sort: &[SortKey],
        offset: u64,
        limit: u64,
    ) -> StoreResult<Vec<Author>> {
        let table = self.authors.read().map_err(poisoned)?;
        Ok(table.page(|_| true, sort, offset, limit))
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Author>> {
        let table = self.authors.read().map_err(poisoned)?;
        Ok(table.rows.get(&id).cloned())
    }

    async fn insert(&self, record: Author) -> StoreResult<Author> {
        let mut table = self.authors.write().map_err(poisoned)?;
        Ok(table.insert(record))
    }

    async fn update(&self, id: i64, record: Author) -> StoreResult<Option<Author>> {
        let mut table = self.authors.write().map_err(poisoned)?;
        Ok(table.update(id, record))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut table = self.authors.write().map_err(poisoned)?;
        Ok(table.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl RecordStore<Book> for InMemoryStore {
    async fn count(&self, filter: &RecordFilter) -> StoreResult<u64> {
        let table = self.books.read().map_err(poisoned)?;
        let count = match filter.author_id {
            Some(author_id) => table
                .rows
                .values()
                .filter(|b| b.author_id == author_id)
                .count(),
            None => table.rows.len(),
        };
        Ok(count as u64)
    }

    async fn fetch(
        &self,
        filter: &RecordFilter,
        sort: &[SortKey],
        offset: u64,
        limit: u64,
    ) -> StoreResult<Vec<Book>> {
        let table = self.books.read().map_err(poisoned)?;
        let author_id = filter.author_id;
        Ok(table.page(
            |b| author_id.is_none_or(|id| b.author_id == id),
            sort,
            offset,
            limit,
        ))
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Book>> {
        let table = self.books.read().map_err(poisoned)?;
        Ok(table.rows.get(&id).cloned())
    }

    async fn insert(&self, record: Book) -> StoreResult<Book> {
        let mut table = self.books.write().map_err(poisoned)?;
        Ok(table.insert(record))
    }

    async fn update(&self, id: i64, record: Book) -> StoreResult<Option<Book>> {
        let mut table = self.books.write().map_err(poisoned)?;
        Ok(table.update(id, record))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut table = self.books.write().map_err(poisoned)?;
        Ok(table.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn get(&self, id: i64) -> StoreResult<Option<User>> {
        let table = self.users.read().map_err(poisoned)?;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let table = self.users.read().map_err(poisoned)?;
        Ok(table.rows.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let table = self.users.read().map_err(poisoned)?;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, mut user: User) -> StoreResult<User> {
        let mut table = self.users.write().map_err(poisoned)?;
        user.id = table.next_id;
        table.next_id += 1;
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, mut user: User) -> StoreResult<Option<User>> {
        let mut table = self.users.write().map_err(poisoned)?;
        if !table.rows.contains_key(&id) {
            return Ok(None);
        }
        user.id = id;
        table.rows.insert(id, user.clone());
        Ok(Some(user))
    }
}
