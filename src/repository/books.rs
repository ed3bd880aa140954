//! PostgreSQL books repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookField, BookFilter, Direction, Page, PageRequest},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Append `WHERE LOWER(col) LIKE $n AND ...` for every criterion
    fn push_criteria(builder: &mut QueryBuilder<'_, Postgres>, filter: &BookFilter) {
        for (i, criterion) in filter.criteria().into_iter().enumerate() {
            builder.push(if i == 0 { " WHERE " } else { " AND " });
            builder.push(format!("LOWER({}) LIKE ", criterion.field.column()));
            builder.push_bind(criterion.like_pattern());
        }
    }

    fn push_order_by(builder: &mut QueryBuilder<'_, Postgres>, page: &PageRequest) {
        builder.push(" ORDER BY ");
        if page.sort.is_empty() {
            builder.push(BookField::Id.column());
            return;
        }
        let clauses: Vec<String> = page
            .sort
            .iter()
            .map(|order| {
                let direction = match order.direction {
                    Direction::Asc => "ASC",
                    Direction::Desc => "DESC",
                };
                format!("{} {}", order.field.column(), direction)
            })
            .collect();
        builder.push(clauses.join(", "));
        // Stable paging when the sort keys tie
        if !page.sort.iter().any(|o| o.field == BookField::Id) {
            builder.push(", id");
        }
    }
}

/// Map a unique-constraint violation on `books` to the business error
fn map_write_error(err: sqlx::Error) -> AppError {
    let err = AppError::from(err);
    if err.is_unique_violation() {
        AppError::DuplicateIsbn
    } else {
        err
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
            .bind(isbn)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn insert(&self, book: &Book) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn)
            VALUES ($1, $2, $3)
            RETURNING id, title, author, isbn
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT id, title, author, isbn FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update(&self, id: i64, book: &Book) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET title = $1, author = $2, isbn = $3
            WHERE id = $4
            RETURNING id, title, author, isbn
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn find_by_example(&self, filter: &BookFilter, page: &PageRequest) -> AppResult<Page<Book>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books");
        Self::push_criteria(&mut count, filter);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT id, title, author, isbn FROM books");
        Self::push_criteria(&mut select, filter);
        Self::push_order_by(&mut select, page);
        select.push(" LIMIT ");
        select.push_bind(page.size);
        select.push(" OFFSET ");
        select.push_bind(page.offset());

        let books = select.build_query_as::<Book>().fetch_all(&self.pool).await?;

        Ok(Page::new(books, page, total))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_shape() {
        let filter = BookFilter {
            title: Some("Rust".into()),
            author: None,
            isbn: Some("978".into()),
        };
        let page = PageRequest::of(2, 10).with_sort(BookField::Title, Direction::Desc);

        let mut select = QueryBuilder::<Postgres>::new("SELECT id, title, author, isbn FROM books");
        BooksRepository::push_criteria(&mut select, &filter);
        BooksRepository::push_order_by(&mut select, &page);

        assert_eq!(
            select.sql(),
            "SELECT id, title, author, isbn FROM books WHERE LOWER(title) LIKE $1 \
             AND LOWER(isbn) LIKE $2 ORDER BY title DESC, id"
        );
    }

    #[test]
    fn test_default_order_is_by_id() {
        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM books");
        BooksRepository::push_criteria(&mut select, &BookFilter::default());
        BooksRepository::push_order_by(&mut select, &PageRequest::of(0, 10));
        assert_eq!(select.sql(), "SELECT * FROM books ORDER BY id");
    }
}
