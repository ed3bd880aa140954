//! Repository layer for book persistence
//!
//! `BookStore` is the gateway the book service talks to. It is implemented
//! over PostgreSQL (`BooksRepository`) and in process memory
//! (`InMemoryBooksRepository`).

pub mod books;
pub mod memory;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Book, BookFilter, Page, PageRequest},
};

pub use books::BooksRepository;
pub use memory::InMemoryBooksRepository;

/// Storage operations for book records.
///
/// Implementations must reject a second book with an ISBN that is already
/// stored, reporting it as `AppError::DuplicateIsbn`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Whether any stored book has exactly this ISBN
    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool>;

    /// Insert a new record and return it with its assigned id
    async fn insert(&self, book: &Book) -> AppResult<Book>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>>;

    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Overwrite the content fields of the record with this id
    async fn update(&self, id: i64, book: &Book) -> AppResult<Book>;

    /// Books matching every criterion of the filter, one page of them,
    /// together with the total number of matches
    async fn find_by_example(&self, filter: &BookFilter, page: &PageRequest) -> AppResult<Page<Book>>;

    /// Connectivity check
    async fn ping(&self) -> AppResult<()>;
}
