//! Caller identity resolution.
//!
//! The gateway terminates at the cluster boundary, so an `x-username`
//! header is only ever set by trusted intra-cluster callers and wins over
//! the cookie. Browser traffic carries the session cookie instead.

use axum::http::HeaderMap;

use super::{cookies, token};

/// Trusted identity override header for service-to-service calls.
pub const IDENTITY_HEADER: &str = "x-username";

/// Resolve the caller's user id from the request headers.
///
/// Order: `x-username` header first (trimmed, non-empty), then a verified
/// session cookie. Returns `None` for anonymous requests.
#[must_use]
pub fn resolve(headers: &HeaderMap, secret: &str) -> Option<String> {
    if let Some(value) = headers.get(IDENTITY_HEADER) {
        let username = value.to_str().ok()?.trim();
        if !username.is_empty() {
            return Some(username.to_string());
        }
        return None;
    }

    let cookie = cookie_session(headers)?;
    token::verify(&cookie, secret).map(|payload| payload.sub)
}

fn cookie_session(headers: &HeaderMap) -> Option<String> {
    cookies::cookie_value(headers, cookies::SESSION_COOKIE_NAME).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header::COOKIE};

    const SECRET: &str = "test-secret";

    fn headers_with_cookie(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("session={token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn header_wins_over_cookie() {
        let token = token::issue("cookie-user", SECRET, 3600);
        let mut headers = headers_with_cookie(&token);
        headers.insert(IDENTITY_HEADER, HeaderValue::from_static("header-user"));
        assert_eq!(resolve(&headers, SECRET).as_deref(), Some("header-user"));
    }

    #[test]
    fn header_value_is_trimmed() {
        let mut headers = HeaderMap::new();
        headers.insert(IDENTITY_HEADER, HeaderValue::from_static("  alice  "));
        assert_eq!(resolve(&headers, SECRET).as_deref(), Some("alice"));
    }

    #[test]
    fn blank_header_does_not_fall_back_to_cookie() {
        let token = token::issue("cookie-user", SECRET, 3600);
        let mut headers = headers_with_cookie(&token);
        headers.insert(IDENTITY_HEADER, HeaderValue::from_static("   "));
        assert_eq!(resolve(&headers, SECRET), None);
    }

    #[test]
    fn valid_cookie_resolves_subject() {
        let token = token::issue("alice", SECRET, 3600);
        let headers = headers_with_cookie(&token);
        assert_eq!(resolve(&headers, SECRET).as_deref(), Some("alice"));
    }

    #[test]
    fn tampered_cookie_is_anonymous() {
        let token = token::issue("alice", "other-secret", 3600);
        let headers = headers_with_cookie(&token);
        assert_eq!(resolve(&headers, SECRET), None);
    }

    #[test]
    fn no_headers_is_anonymous() {
        assert_eq!(resolve(&HeaderMap::new(), SECRET), None);
    }
}
