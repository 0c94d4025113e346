//! Page/limit parsing and page metadata.
//!
//! Both parameters arrive as raw query strings so that malformed input can be
//! reported with a precise message instead of a generic query rejection.

use crate::errors::AppError;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Largest skip the MongoDB driver accepts; it is sent as a signed 64-bit int.
pub const MAX_SKIP: u64 = i64::MAX as u64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Page must be a positive integer")]
    InvalidPage,

    #[error("Limit must be a positive integer")]
    InvalidLimit,

    #[error("Page is too large for the requested limit")]
    Overflow,
}

impl From<PaginationError> for AppError {
    fn from(err: PaginationError) -> Self {
        AppError::validation(err.to_string())
    }
}

/// Resolved paging window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number
    pub page: u64,
    pub limit: u64,
    /// Documents to skip: `(page - 1) * limit`
    pub skip: u64,
}

fn parse_positive(raw: Option<&str>, default: u64, err: PaginationError) -> Result<u64, PaginationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => match value.parse::<u64>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(err),
        },
    }
}

impl Pagination {
    pub fn new(page: u64, limit: u64) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::InvalidPage);
        }
        if limit == 0 {
            return Err(PaginationError::InvalidLimit);
        }
        let skip = (page - 1)
            .checked_mul(limit)
            .filter(|skip| *skip <= MAX_SKIP)
            .ok_or(PaginationError::Overflow)?;

        Ok(Self { page, limit, skip })
    }

    /// Parse raw `page`/`limit` query values. Absent or empty values take the
    /// defaults; anything else must be an integer >= 1.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, PaginationError> {
        let page = parse_positive(page, DEFAULT_PAGE, PaginationError::InvalidPage)?;
        let limit = parse_positive(limit, DEFAULT_LIMIT, PaginationError::InvalidLimit)?;
        Self::new(page, limit)
    }

    /// `limit` as the driver's signed type, saturating. The driver only
    /// uses it as an upper bound, so clamping does not change the result.
    pub fn limit_i64(&self) -> i64 {
        i64::try_from(self.limit).unwrap_or(i64::MAX)
    }

    pub fn meta(&self, total: u64) -> PaginationMeta {
        PaginationMeta::new(self.page, self.limit, total)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            skip: 0,
        }
    }
}

/// Page metadata returned alongside list results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    /// `ceil(total / limit)`
    pub pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            pages: total.div_ceil(limit.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_absent_or_empty() {
        assert_eq!(Pagination::parse(None, None).unwrap(), Pagination::default());
        assert_eq!(Pagination::parse(Some(""), Some(" ")).unwrap(), Pagination::default());
    }

    #[test]
    fn test_skip_is_page_minus_one_times_limit() {
        for (page, limit) in [(1u64, 1u64), (1, 10), (3, 10), (7, 25), (100, 1000)] {
            let p = Pagination::parse(Some(&page.to_string()), Some(&limit.to_string())).unwrap();
            assert_eq!(p.skip, (page - 1) * limit);
            assert_eq!(p.page, page);
            assert_eq!(p.limit, limit);
        }
    }

    #[test]
    fn test_limit_has_no_upper_bound() {
        let p = Pagination::parse(Some("1"), Some("100000")).unwrap();
        assert_eq!(p.limit, 100_000);
    }

    #[test]
    fn test_rejects_non_positive_and_non_numeric() {
        assert_eq!(Pagination::parse(Some("0"), None), Err(PaginationError::InvalidPage));
        assert_eq!(Pagination::parse(Some("-2"), None), Err(PaginationError::InvalidPage));
        assert_eq!(Pagination::parse(Some("two"), None), Err(PaginationError::InvalidPage));
        assert_eq!(Pagination::parse(None, Some("0")), Err(PaginationError::InvalidLimit));
        assert_eq!(Pagination::parse(None, Some("1.5")), Err(PaginationError::InvalidLimit));
    }

    #[test]
    fn test_overflow_is_rejected() {
        let err = Pagination::parse(Some(&u64::MAX.to_string()), Some("2")).unwrap_err();
        assert_eq!(err, PaginationError::Overflow);
    }

    #[test]
    fn test_skip_must_fit_driver_integer() {
        // 1 * (i64::MAX + 1)
        let err = Pagination::parse(Some("2"), Some("9223372036854775808")).unwrap_err();
        assert_eq!(err, PaginationError::Overflow);

        let p = Pagination::parse(Some("2"), Some(&i64::MAX.to_string())).unwrap();
        assert_eq!(p.skip, MAX_SKIP);

        // A huge limit on the first page skips nothing and stays valid.
        let p = Pagination::parse(Some("1"), Some(&u64::MAX.to_string())).unwrap();
        assert_eq!(p.skip, 0);
        assert_eq!(p.limit_i64(), i64::MAX);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PaginationError::InvalidPage.to_string(),
            "Page must be a positive integer"
        );
        assert_eq!(
            PaginationError::InvalidLimit.to_string(),
            "Limit must be a positive integer"
        );
    }

    #[test]
    fn test_meta_pages_rounds_up() {
        assert_eq!(PaginationMeta::new(1, 10, 0).pages, 0);
        assert_eq!(PaginationMeta::new(1, 10, 10).pages, 1);
        assert_eq!(PaginationMeta::new(1, 10, 11).pages, 2);
        assert_eq!(Pagination::default().meta(95).pages, 10);
    }
}
