//! Resolves the `limit` and `skip` query parameters.
//!
//! A parameter that does not start with an integer is dropped, never defaulted,
//! so `skip=0` and a missing `skip` stay distinguishable.

use crate::models::TaskQuery;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

pub fn resolve_pagination(query: &TaskQuery) -> Pagination {
    Pagination {
        limit: query.limit.as_deref().and_then(parse_leading_int),
        skip: query.skip.as_deref().and_then(parse_leading_int),
    }
}

/// Parses the integer prefix of `raw`: optional leading whitespace, an optional
/// sign, then at least one ASCII digit. Anything after the digits is ignored.
/// Returns `None` when there are no digits; out-of-range values saturate.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let digits = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    let prefix = &trimmed[..sign_len + digits];
    match prefix.parse() {
        Ok(value) => Some(value),
        Err(_) if prefix.starts_with('-') => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>, skip: Option<&str>) -> TaskQuery {
        TaskQuery {
            limit: limit.map(String::from),
            skip: skip.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_unparsable_limit_is_omitted() {
        let p = resolve_pagination(&query(Some("abc"), None));
        assert_eq!(p.limit, None);
        assert_ne!(p, resolve_pagination(&query(Some("0"), None)));
    }

    #[test]
    fn test_explicit_zero_skip_is_kept() {
        assert_eq!(resolve_pagination(&query(None, Some("0"))).skip, Some(0));
        assert_eq!(resolve_pagination(&query(None, None)).skip, None);
    }

    #[test]
    fn test_leading_integer_prefix() {
        assert_eq!(parse_leading_int("10"), Some(10));
        assert_eq!(parse_leading_int("  7"), Some(7));
        assert_eq!(parse_leading_int("10abc"), Some(10));
        assert_eq!(parse_leading_int("3.9"), Some(3));
        assert_eq!(parse_leading_int("+4"), Some(4));
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("x10"), None);
    }

    #[test]
    fn test_out_of_range_values_saturate() {
        assert_eq!(parse_leading_int("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_leading_int("-99999999999999999999x"), Some(i64::MIN));

        let huge = Some("99999999999999999999");
        let p = resolve_pagination(&query(huge, huge));
        assert_eq!(p.limit, Some(i64::MAX));
        assert_eq!(p.skip, Some(i64::MAX));
    }

    #[test]
    fn test_negative_values_pass_through() {
        let p = resolve_pagination(&query(Some("-2"), Some("-1")));
        assert_eq!(p.limit, Some(-2));
        assert_eq!(p.skip, Some(-1));
    }
}
