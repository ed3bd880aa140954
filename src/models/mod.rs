//! Data models for the library catalog

pub mod book;
pub mod page;

// Re-export commonly used types
pub use book::{Book, BookField, BookFilter, BookQuery, BookRequest, Criterion};
pub use page::{Direction, Page, PageRequest, Pageable, SortOrder};
