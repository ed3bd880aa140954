//! In-memory books store
//!
//! Used by the `memory` storage backend and by tests. All state sits behind
//! one lock, so the ISBN check and the insert are a single atomic step.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFilter, Direction, Page, PageRequest},
};

#[derive(Default)]
struct State {
    last_id: i64,
    books: BTreeMap<i64, Book>,
}

impl State {
    fn isbn_taken(&self, isbn: &str, except: Option<i64>) -> bool {
        self.books
            .values()
            .any(|b| b.isbn == isbn && b.id != except)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryBooksRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryBooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored books
    pub async fn len(&self) -> usize {
        self.state.read().await.books.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl BookStore for InMemoryBooksRepository {
    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool> {
        Ok(self.state.read().await.isbn_taken(isbn, None))
    }

    async fn insert(&self, book: &Book) -> AppResult<Book> {
        let mut state = self.state.write().await;
        if state.isbn_taken(&book.isbn, None) {
            return Err(AppError::DuplicateIsbn);
        }
        state.last_id += 1;
        let id = state.last_id;
        let stored = Book {
            id: Some(id),
            ..book.clone()
        };
        state.books.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        Ok(self.state.read().await.books.get(&id).cloned())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.state.write().await.books.remove(&id);
        Ok(())
    }

    async fn update(&self, id: i64, book: &Book) -> AppResult<Book> {
        let mut state = self.state.write().await;
        if !state.books.contains_key(&id) {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        if state.isbn_taken(&book.isbn, Some(id)) {
            return Err(AppError::DuplicateIsbn);
        }
        let stored = Book {
            id: Some(id),
            ..book.clone()
        };
        state.books.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_example(&self, filter: &BookFilter, page: &PageRequest) -> AppResult<Page<Book>> {
        let state = self.state.read().await;
        let criteria = filter.criteria();

        let mut matching: Vec<&Book> = state
            .books
            .values()
            .filter(|b| criteria.iter().all(|c| c.matches(b)))
            .collect();

        // BTreeMap iteration is already id order; a stable sort keeps it as the tiebreak
        matching.sort_by(|a, b| {
            page.sort
                .iter()
                .map(|order| match order.direction {
                    Direction::Asc => order.field.compare(a, b),
                    Direction::Desc => order.field.compare(b, a),
                })
                .find(|o| o.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let total = matching.len() as i64;
        let content = matching
            .into_iter()
            .skip(page.offset().max(0) as usize)
            .take(page.size.max(0) as usize)
            .cloned()
            .collect();

        Ok(Page::new(content, page, total))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
