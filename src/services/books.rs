//! Book catalog service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFilter, Page, PageRequest},
    repository::BookStore,
};

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn BookStore>,
}

impl BooksService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// Create a book. Fails with `DuplicateIsbn` when another book already
    /// carries the same ISBN, in which case nothing is written.
    pub async fn save(&self, book: Book) -> AppResult<Book> {
        if self.store.exists_by_isbn(&book.isbn).await? {
            tracing::info!("Book create rejected: ISBN {} already registered", book.isbn);
            return Err(AppError::DuplicateIsbn);
        }

        let saved = self.store.insert(&book).await?;
        tracing::info!(id = ?saved.id, isbn = %saved.isbn, "Book created");
        Ok(saved)
    }

    /// Look a book up by id; `None` when there is no such book
    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        self.store.find_by_id(id).await
    }

    pub async fn delete(&self, book: &Book) -> AppResult<()> {
        let id = book.id.ok_or_else(AppError::missing_identity)?;
        self.store.delete(id).await?;
        tracing::info!(id, "Book deleted");
        Ok(())
    }

    pub async fn update(&self, book: Book) -> AppResult<Book> {
        let id = book.id.ok_or_else(AppError::missing_identity)?;
        let updated = self.store.update(id, &book).await?;
        tracing::info!(id, "Book updated");
        Ok(updated)
    }

    /// Books whose set fields contain the filter's values, ignoring case
    pub async fn find(&self, filter: &BookFilter, page: &PageRequest) -> AppResult<Page<Book>> {
        tracing::debug!(criteria = filter.criteria().len(), page = page.page, size = page.size, "Book search");
        self.store.find_by_example(filter, page).await
    }
}
