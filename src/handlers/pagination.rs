//! Limit/offset pagination shared by every list endpoint

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// `?limit=&offset=` query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl PageQuery {
    /// Page size, clamped to `1..=MAX_PAGE_SIZE`
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }
}

/// Paginated list response
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub limit: u32,
    pub offset: u32,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(results: Vec<T>, count: i64, page: &PageQuery) -> Self {
        Self {
            count,
            limit: page.limit(),
            offset: page.offset(),
            results,
        }
    }

    /// Convert every item of the page
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            count: self.count,
            limit: self.limit,
            offset: self.offset,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = PageQuery::default();
        assert_eq!(page.limit(), 20);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_limit_is_clamped() {
        let page = PageQuery {
            limit: Some(1000),
            offset: Some(40),
        };
        assert_eq!(page.limit(), 100);
        assert_eq!(page.offset(), 40);

        let page = PageQuery {
            limit: Some(0),
            offset: None,
        };
        assert_eq!(page.limit(), 1);
    }

    #[test]
    fn test_response_shape() {
        let page = PageQuery {
            limit: Some(2),
            offset: Some(2),
        };
        let body = Paginated::new(vec![3, 4], 5, &page).map(|n| n * 10);

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "count": 5, "limit": 2, "offset": 2, "results": [30, 40] })
        );
    }
}
