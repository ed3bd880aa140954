//! Book model, request payload and example filter

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Catalog book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// Assigned by the store on first insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl Book {
    /// A book that has not been persisted yet
    pub fn new(title: impl Into<String>, author: impl Into<String>, isbn: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Copy the editable fields from a request, keeping the identity
    pub fn apply(&mut self, request: BookRequest) {
        self.title = request.title;
        self.author = request.author;
        self.isbn = request.isbn;
    }
}

/// Create/update book request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "author must not be empty"))]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "isbn must not be empty"))]
    pub isbn: String,
}

/// Explicit `null` is treated like a missing field so it reaches validation
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<BookRequest> for Book {
    fn from(request: BookRequest) -> Self {
        Book::new(request.title, request.author, request.isbn)
    }
}

/// Book query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Case-insensitive substring of the author
    pub author: Option<String>,
    /// Case-insensitive substring of the ISBN
    pub isbn: Option<String>,
    /// Zero-based page number (default: 0)
    pub page: Option<i64>,
    /// Page size (default from configuration)
    pub size: Option<i64>,
    /// Sort order, e.g. `title,desc` or `author,title`
    pub sort: Option<String>,
}

/// Sortable/filterable book columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Id,
    Title,
    Author,
    Isbn,
}

impl BookField {
    pub fn column(&self) -> &'static str {
        match self {
            BookField::Id => "id",
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Isbn => "isbn",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "id" => Some(BookField::Id),
            "title" => Some(BookField::Title),
            "author" => Some(BookField::Author),
            "isbn" => Some(BookField::Isbn),
            _ => None,
        }
    }

    /// Compare two books on this field
    pub fn compare(&self, a: &Book, b: &Book) -> Ordering {
        match self {
            BookField::Id => a.id.cmp(&b.id),
            BookField::Title => a.title.cmp(&b.title),
            BookField::Author => a.author.cmp(&b.author),
            BookField::Isbn => a.isbn.cmp(&b.isbn),
        }
    }

    fn text<'a>(&self, book: &'a Book) -> Option<&'a str> {
        match self {
            BookField::Id => None,
            BookField::Title => Some(&book.title),
            BookField::Author => Some(&book.author),
            BookField::Isbn => Some(&book.isbn),
        }
    }
}

/// One "contains, ignoring case" condition on a text column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    pub field: BookField,
    /// Lower-cased needle
    pub needle: String,
}

impl Criterion {
    pub fn matches(&self, book: &Book) -> bool {
        self.field
            .text(book)
            .map(|value| value.to_lowercase().contains(&self.needle))
            .unwrap_or(false)
    }

    /// `LIKE` pattern for this criterion, with wildcards in the needle escaped
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.needle.len() + 2);
        pattern.push('%');
        for c in self.needle.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

/// Sparse example used to filter books; unset or empty fields are ignored
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

impl BookFilter {
    /// Build the list of conditions, one per field the caller set
    pub fn criteria(&self) -> Vec<Criterion> {
        [
            (BookField::Title, &self.title),
            (BookField::Author, &self.author),
            (BookField::Isbn, &self.isbn),
        ]
        .into_iter()
        .filter_map(|(field, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some(Criterion {
                field,
                needle: v.to_lowercase(),
            }),
            _ => None,
        })
        .collect()
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.criteria().iter().all(|c| c.matches(book))
    }
}

impl From<&BookQuery> for BookFilter {
    fn from(query: &BookQuery) -> Self {
        Self {
            title: query.title.clone(),
            author: query.author.clone(),
            isbn: query.isbn.clone(),
        }
    }
}
