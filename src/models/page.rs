//! Page request and paginated result types

use serde::Serialize;
use utoipa::ToSchema;

use super::book::{Book, BookField};
use crate::{
    config::PaginationConfig,
    error::{AppError, AppResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: BookField,
    pub direction: Direction,
}

/// Requested page: zero-based number, size and sort orders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    pub fn of(page: i64, size: i64) -> Self {
        Self {
            page,
            size,
            sort: Vec::new(),
        }
    }

    pub fn with_sort(mut self, field: BookField, direction: Direction) -> Self {
        self.sort.push(SortOrder { field, direction });
        self
    }

    /// Build a page request from raw query parameters.
    ///
    /// Negative pages become 0, non-positive sizes take the configured default
    /// and sizes above the configured maximum are capped. Pages whose offset
    /// does not fit in an `i64` are rejected. `sort` is `prop[,prop...][,asc|desc]`.
    pub fn from_params(
        page: Option<i64>,
        size: Option<i64>,
        sort: Option<&str>,
        limits: &PaginationConfig,
    ) -> AppResult<Self> {
        let page = page.unwrap_or(0).max(0);
        let size = match size {
            Some(s) if s > 0 => s.min(limits.max_size),
            _ => limits.default_size,
        };
        if page.checked_mul(size).is_none() {
            return Err(AppError::BadRequest(format!("Page {} is out of range", page)));
        }

        Ok(Self {
            page,
            size,
            sort: match sort {
                Some(raw) => parse_sort(raw)?,
                None => Vec::new(),
            },
        })
    }

    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }
}

fn parse_sort(raw: &str) -> AppResult<Vec<SortOrder>> {
    let mut parts: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let direction = match parts.last().map(|p| p.to_ascii_lowercase()) {
        Some(ref d) if d == "asc" => {
            parts.pop();
            Direction::Asc
        }
        Some(ref d) if d == "desc" => {
            parts.pop();
            Direction::Desc
        }
        _ => Direction::Asc,
    };

    parts
        .into_iter()
        .map(|name| {
            BookField::parse(name)
                .map(|field| SortOrder { field, direction })
                .ok_or_else(|| AppError::BadRequest(format!("Unknown sort property: {}", name)))
        })
        .collect()
}

/// Echo of the page request inside a page
#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pageable {
    pub page_number: i64,
    pub page_size: i64,
    pub offset: i64,
}

/// One page of results plus the size of the whole matching set
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[aliases(BookPage = Page<Book>)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub pageable: Pageable,
    pub total_elements: i64,
    pub total_pages: i64,
    pub size: i64,
    pub number: i64,
    pub number_of_elements: i64,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: i64) -> Self {
        let size = request.size;
        let total_pages = if size > 0 {
            total_elements.saturating_add(size - 1) / size
        } else {
            1
        };
        let number_of_elements = content.len() as i64;

        Self {
            pageable: Pageable {
                page_number: request.page,
                page_size: size,
                offset: request.offset(),
            },
            total_elements,
            total_pages,
            size,
            number: request.page,
            number_of_elements,
            first: request.page == 0,
            last: request.page.saturating_add(1) >= total_pages,
            empty: content.is_empty(),
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> PaginationConfig {
        PaginationConfig {
            default_size: 20,
            max_size: 100,
        }
    }

    #[test]
    fn test_defaults_and_clamping() {
        let request = PageRequest::from_params(Some(-3), Some(0), None, &limits()).unwrap();
        assert_eq!(request, PageRequest::of(0, 20));

        let request = PageRequest::from_params(Some(2), Some(5000), None, &limits()).unwrap();
        assert_eq!(request.size, 100);
        assert_eq!(request.offset(), 200);
    }

    #[test]
    fn test_sort_parsing() {
        let request =
            PageRequest::from_params(None, None, Some("author,title,desc"), &limits()).unwrap();
        assert_eq!(
            request.sort,
            vec![
                SortOrder { field: BookField::Author, direction: Direction::Desc },
                SortOrder { field: BookField::Title, direction: Direction::Desc },
            ]
        );

        let request = PageRequest::from_params(None, None, Some("isbn"), &limits()).unwrap();
        assert_eq!(request.sort[0].direction, Direction::Asc);
    }

    #[test]
    fn test_unknown_sort_property_is_rejected() {
        let err = PageRequest::from_params(None, None, Some("price,asc"), &limits()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_page_beyond_offset_range_is_rejected() {
        let err = PageRequest::from_params(Some(i64::MAX), Some(20), None, &limits()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        // Largest page whose offset still fits
        let last = i64::MAX / 20;
        let request = PageRequest::from_params(Some(last), Some(20), None, &limits()).unwrap();
        assert_eq!(request.offset(), last * 20);
    }

    #[test]
    fn test_page_metadata_at_extreme_page_number() {
        let page = Page::new(Vec::<i32>::new(), &PageRequest::of(i64::MAX, 1), 3);
        assert!(page.last);
        assert!(page.empty);
        assert_eq!(page.pageable.offset, i64::MAX);
    }

    #[test]
    fn test_page_metadata() {
        let page = Page::new(vec![1, 2], &PageRequest::of(1, 2), 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.number_of_elements, 2);
        assert!(!page.first);
        assert!(!page.last);

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalElements"], 5);
        assert_eq!(json["pageable"]["pageSize"], 2);
        assert_eq!(json["pageable"]["pageNumber"], 1);
    }
}
