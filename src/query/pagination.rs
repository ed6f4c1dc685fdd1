//! Page/limit to skip/take conversion

use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// A requested page of results.
///
/// Expects `page >= 1` and `limit >= 1`. No clamping happens here;
/// `PageParams::resolve` is where raw request values get their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationSpec {
    pub page: i64,
    pub limit: i64,
}

impl PaginationSpec {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    /// Saturates at `i64::MAX` so an absurd page simply lands past the end
    pub fn skip(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn take(&self) -> i64 {
        self.limit
    }
}

/// Raw pagination parameters as they arrive in a query string
#[derive(Debug, Clone, Copy, Default)]
pub struct PageParams<'a> {
    pub page: Option<&'a str>,
    pub limit: Option<&'a str>,
}

impl<'a> PageParams<'a> {
    pub fn new(page: Option<&'a str>, limit: Option<&'a str>) -> Self {
        Self { page, limit }
    }

    /// Parse and default the raw values: anything missing, unparsable or
    /// not positive becomes page 1 / `default_limit`. A non-positive
    /// `default_limit` is treated as 1.
    pub fn resolve(&self, default_limit: i64) -> PaginationSpec {
        let page = self.page.and_then(parse_leading_int).filter(|p| *p > 0);
        let limit = self.limit.and_then(parse_leading_int).filter(|l| *l > 0);
        PaginationSpec::new(page.unwrap_or(DEFAULT_PAGE), limit.unwrap_or(default_limit.max(1)))
    }
}

/// Lenient integer parse: optional sign then leading digits ("12abc" -> 12)
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Number of pages needed to show `total` records, `limit` per page
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    total / limit + i64::from(total % limit != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_take() {
        let spec = PaginationSpec::new(3, 10);
        assert_eq!(spec.skip(), 20);
        assert_eq!(spec.take(), 10);

        let first = PaginationSpec::new(1, 25);
        assert_eq!(first.skip(), 0);
        assert_eq!(first.take(), 25);
    }

    #[test]
    fn test_skip_formula_over_range() {
        for page in 1..=20 {
            for limit in 1..=15 {
                assert_eq!(PaginationSpec::new(page, limit).skip(), (page - 1) * limit);
            }
        }
    }

    #[test]
    fn test_resolve_defaults() {
        assert_eq!(PageParams::default().resolve(10), PaginationSpec::new(1, 10));
        assert_eq!(PageParams::new(Some("abc"), Some("")).resolve(10), PaginationSpec::new(1, 10));
        assert_eq!(PageParams::new(Some("0"), Some("0")).resolve(10), PaginationSpec::new(1, 10));
        assert_eq!(PageParams::new(Some("-2"), Some("-5")).resolve(20), PaginationSpec::new(1, 20));
    }

    #[test]
    fn test_resolve_non_positive_default_limit() {
        assert_eq!(PageParams::default().resolve(0), PaginationSpec::new(1, 1));
        assert_eq!(PageParams::new(None, Some("abc")).resolve(-4), PaginationSpec::new(1, 1));
        assert_eq!(PageParams::new(None, Some("5")).resolve(0), PaginationSpec::new(1, 5));
    }

    #[test]
    fn test_huge_values_do_not_overflow() {
        let max = "9223372036854775807";

        let wide = PageParams::new(None, Some(max)).resolve(10);
        assert_eq!(wide.limit, i64::MAX);
        assert_eq!(total_pages(5, wide.limit), 1);
        assert_eq!(wide.skip(), 0);

        let far = PageParams::new(Some(max), Some("10")).resolve(10);
        assert_eq!(far.skip(), i64::MAX);

        assert_eq!(PaginationSpec::new(i64::MAX, i64::MAX).skip(), i64::MAX);
        assert_eq!(total_pages(i64::MAX, 1), i64::MAX);
        assert_eq!(total_pages(i64::MAX, 2), i64::MAX / 2 + 1);
    }

    #[test]
    fn test_resolve_lenient_parse() {
        assert_eq!(PageParams::new(Some("2"), Some("5")).resolve(10), PaginationSpec::new(2, 5));
        assert_eq!(PageParams::new(Some("3rd"), Some(" 7 ")).resolve(10), PaginationSpec::new(3, 7));
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }
}
