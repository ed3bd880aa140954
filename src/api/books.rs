//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::{page::BookPage, Book, BookFilter, BookQuery, BookRequest, PageRequest},
};

fn book_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Book {} not found", id))
}

/// Filter books with pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = BookPage),
        (status = 400, description = "Invalid paging or sort parameter", body = ErrorResponse)
    )
)]
pub async fn find_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<BookPage>> {
    let page = PageRequest::from_params(
        query.page,
        query.size,
        query.sort.as_deref(),
        &state.config.pagination,
    )?;
    let filter = BookFilter::from(&query);

    let result = state.services.books.find(&filter, &page).await?;
    Ok(Json(result))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Book>> {
    state
        .services
        .books
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| book_not_found(id))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input or ISBN already registered", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(request): Json<BookRequest>,
) -> AppResult<(StatusCode, Json<Book>)> {
    request.validate()?;

    let created = state.services.books.save(request.into()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input or ISBN already registered", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(request): Json<BookRequest>,
) -> AppResult<Json<Book>> {
    request.validate()?;

    let mut book = state
        .services
        .books
        .get_by_id(id)
        .await?
        .ok_or_else(|| book_not_found(id))?;
    book.apply(request);

    let updated = state.services.books.update(book).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let book = state
        .services
        .books
        .get_by_id(id)
        .await?
        .ok_or_else(|| book_not_found(id))?;

    state.services.books.delete(&book).await?;
    Ok(StatusCode::NO_CONTENT)
}
