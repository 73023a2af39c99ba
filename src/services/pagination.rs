use crate::error::ApiError;

pub const DEFAULT_LIMIT: i64 = 25;
pub const DEFAULT_OFFSET: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

fn parse_param(name: &str, raw: Option<&str>, default: i64) -> Result<i64, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<i64>()
            .map_err(|_| ApiError::Validation(format!("{} must be an integer", name))),
    }
}

impl PageRequest {
    /// Parses raw `limit`/`offset` values. A non-positive limit is rejected
    /// here; a negative offset is left for [`paginate`] to reject as an
    /// invalid page.
    pub fn from_params(limit: Option<&str>, offset: Option<&str>) -> Result<Self, ApiError> {
        let limit = parse_param("limit", limit, DEFAULT_LIMIT)?;
        let offset = parse_param("offset", offset, DEFAULT_OFFSET)?;

        if limit <= 0 {
            return Err(ApiError::Validation(
                "limit must be a positive integer".to_string(),
            ));
        }

        Ok(Self { limit, offset })
    }

    /// 1-based page number; only meaningful for `limit > 0`.
    pub fn page_number(&self) -> i64 {
        self.offset.div_euclid(self.limit).saturating_add(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page_number: i64,
    pub offset: i64,
    pub limit: i64,
    pub has_next: bool,
    pub next_offset: Option<i64>,
    /// Not clamped at zero: `0 < offset < limit` gives a negative value.
    pub prev_offset: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    NoResults,
    Page(PageWindow),
}

pub fn page_count(total: i64, limit: i64) -> i64 {
    total / limit + i64::from(total % limit != 0)
}

pub fn paginate(request: PageRequest, total: i64) -> Result<Pagination, ApiError> {
    let PageRequest { limit, offset } = request;
    if limit <= 0 {
        return Err(ApiError::Validation(
            "limit must be a positive integer".to_string(),
        ));
    }

    if total <= 0 {
        return Ok(Pagination::NoResults);
    }

    let page_number = request.page_number();
    if page_number < 1 || page_number > page_count(total, limit) || offset >= total {
        return Err(ApiError::InvalidPage);
    }

    let end = offset.saturating_add(limit);
    let has_next = end < total;

    Ok(Pagination::Page(PageWindow {
        page_number,
        offset,
        limit,
        has_next,
        next_offset: has_next.then_some(end),
        prev_offset: (offset > 0).then_some(offset - limit),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(limit: i64, offset: i64, total: i64) -> PageWindow {
        match paginate(PageRequest { limit, offset }, total) {
            Ok(Pagination::Page(window)) => window,
            other => panic!("expected a page, got {:?}", other),
        }
    }

    #[test]
    fn test_from_params_defaults() {
        let request = PageRequest::from_params(None, None).unwrap();
        assert_eq!(request, PageRequest { limit: 25, offset: 0 });

        let request = PageRequest::from_params(Some(""), Some(" 5 ")).unwrap();
        assert_eq!(request, PageRequest { limit: 25, offset: 5 });
    }

    #[test]
    fn test_from_params_rejects_bad_limit() {
        assert!(matches!(
            PageRequest::from_params(Some("0"), None),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            PageRequest::from_params(Some("-3"), None),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            PageRequest::from_params(Some("ten"), None),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            PageRequest::from_params(None, Some("1.5")),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_page_number() {
        assert_eq!(PageRequest { limit: 25, offset: 0 }.page_number(), 1);
        assert_eq!(PageRequest { limit: 25, offset: 24 }.page_number(), 1);
        assert_eq!(PageRequest { limit: 25, offset: 25 }.page_number(), 2);
        assert_eq!(PageRequest { limit: 10, offset: 1000 }.page_number(), 101);
        assert_eq!(PageRequest { limit: 1, offset: i64::MAX }.page_number(), i64::MAX);
    }

    #[test]
    fn test_first_page_with_more() {
        let page = window(2, 0, 5);

        assert_eq!(page.page_number, 1);
        assert!(page.has_next);
        assert_eq!(page.next_offset, Some(2));
        assert_eq!(page.prev_offset, None);
    }

    #[test]
    fn test_last_page() {
        let page = window(2, 4, 5);

        assert_eq!(page.page_number, 3);
        assert!(!page.has_next);
        assert_eq!(page.next_offset, None);
        assert_eq!(page.prev_offset, Some(2));
    }

    #[test]
    fn test_exact_fit_has_no_next() {
        let page = window(5, 0, 5);
        assert!(!page.has_next);
    }

    #[test]
    fn test_prev_offset_is_not_clamped() {
        let page = window(25, 10, 100);
        assert_eq!(page.prev_offset, Some(-15));
    }

    #[test]
    fn test_zero_total_is_no_results() {
        let outcome = paginate(PageRequest { limit: 10, offset: 1000 }, 0).unwrap();
        assert_eq!(outcome, Pagination::NoResults);
    }

    #[test]
    fn test_offset_beyond_last_page_is_invalid() {
        let outcome = paginate(PageRequest { limit: 10, offset: 1000 }, 50);
        assert!(matches!(outcome, Err(ApiError::InvalidPage)));
    }

    #[test]
    fn test_offset_past_last_row_is_invalid() {
        let outcome = paginate(PageRequest { limit: 5, offset: 9 }, 8);
        assert!(matches!(outcome, Err(ApiError::InvalidPage)));

        let outcome = paginate(PageRequest { limit: 5, offset: 8 }, 8);
        assert!(matches!(outcome, Err(ApiError::InvalidPage)));
    }

    #[test]
    fn test_huge_limit_is_a_single_page() {
        let page = window(i64::MAX, 0, 8);

        assert_eq!(page.page_number, 1);
        assert!(!page.has_next);
        assert_eq!(page.next_offset, None);
        assert_eq!(page_count(8, i64::MAX), 1);
    }

    #[test]
    fn test_huge_limit_with_offset_does_not_overflow() {
        let page = window(i64::MAX, 3, 8);

        assert!(!page.has_next);
        assert_eq!(page.prev_offset, Some(3 - i64::MAX));
    }

    #[test]
    fn test_negative_offset_is_invalid() {
        let outcome = paginate(PageRequest { limit: 25, offset: -24 }, 50);
        assert!(matches!(outcome, Err(ApiError::InvalidPage)));
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let outcome = paginate(PageRequest { limit: 0, offset: 0 }, 50);
        assert!(matches!(outcome, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(5, 2), 3);
        assert_eq!(page_count(4, 2), 2);
        assert_eq!(page_count(1, 25), 1);
        assert_eq!(page_count(i64::MAX, 1), i64::MAX);
    }
}
