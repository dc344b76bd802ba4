//! Shared handler helpers: path-id parsing, owner checks, and query
//! parameter extraction with clamp/drop semantics.

use std::collections::HashMap;

use axum::http::StatusCode;

use user_order_core::{PageRequest, UserFilter};

use crate::app::errors::json_error;
use crate::context::AuthContext;

/// Parse a path id as an unsigned 32-bit integer; anything else is a 400.
pub fn parse_id(raw: &str) -> Result<u32, axum::response::Response> {
    raw.parse::<u32>()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid id format"))
}

/// Owner-scoped routes: the path `:id` must equal the authenticated user.
pub fn require_owner(path_id: u32, auth: &AuthContext) -> Result<(), axum::response::Response> {
    if auth.user_id() != path_id {
        return Err(json_error(StatusCode::FORBIDDEN, "forbidden"));
    }
    Ok(())
}

/// `page` (default 1) and `limit` (default 10) with clamping into
/// `page >= 1`, `limit in [1, 100]`. Unparsable values fall back to the
/// defaults rather than failing the request.
pub fn parse_page(params: &HashMap<String, String>) -> PageRequest {
    let page = parse_param::<i64>(params, "page").unwrap_or(1);
    let limit = parse_param::<i64>(params, "limit").unwrap_or(10);
    PageRequest::clamped(page, limit)
}

/// Optional user-list filters. Malformed or non-positive age bounds and an
/// empty `name` are dropped with a warning, not rejected.
pub fn parse_user_filter(params: &HashMap<String, String>) -> UserFilter {
    UserFilter {
        min_age: parse_param::<u32>(params, "min_age").filter(|&v| v > 0),
        max_age: parse_param::<u32>(params, "max_age").filter(|&v| v > 0),
        name: params
            .get("name")
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string),
    }
}

fn parse_param<T: std::str::FromStr>(params: &HashMap<String, String>, key: &str) -> Option<T> {
    let raw = params.get(key)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(param = key, value = %raw, "dropping unparsable query parameter");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn page_defaults_and_clamps() {
        let p = parse_page(&params(&[]));
        assert_eq!((p.page(), p.limit()), (1, 10));

        let p = parse_page(&params(&[("page", "0"), ("limit", "0")]));
        assert_eq!((p.page(), p.limit()), (1, 10));

        let p = parse_page(&params(&[("page", "-1"), ("limit", "150")]));
        assert_eq!((p.page(), p.limit()), (1, 100));

        let p = parse_page(&params(&[("page", "abc"), ("limit", "oops")]));
        assert_eq!((p.page(), p.limit()), (1, 10));
    }

    #[test]
    fn malformed_filters_are_dropped() {
        let f = parse_user_filter(&params(&[("min_age", "abc"), ("max_age", "0"), ("name", "  ")]));
        assert_eq!(f, UserFilter::default());
    }

    #[test]
    fn well_formed_filters_pass_through() {
        let f = parse_user_filter(&params(&[("min_age", "18"), ("max_age", "65"), ("name", "ann")]));
        assert_eq!(f.min_age, Some(18));
        assert_eq!(f.max_age, Some(65));
        assert_eq!(f.name.as_deref(), Some("ann"));
    }

    #[test]
    fn path_ids_must_be_u32() {
        assert!(parse_id("17").is_ok());
        assert!(parse_id("abc").is_err());
        assert!(parse_id("-1").is_err());
        assert!(parse_id("4294967296").is_err());
    }
}
