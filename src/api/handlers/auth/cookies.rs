//! Cookie construction and parsing for the session and OAuth nonce cookies.
//!
//! Values are signed-token or base64url material, so they never need
//! percent-encoding. Clearing a cookie reissues it empty with `Max-Age=0`
//! and the exact same `Path`, otherwise browsers keep the old one.

use axum::http::{HeaderMap, HeaderValue, header::COOKIE};

/// Site-wide session cookie.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Double-submit nonce cookie for the Google OAuth flow.
pub const OAUTH_STATE_COOKIE_NAME: &str = "oauth_state";

/// The nonce cookie only travels to the OAuth start/callback endpoints.
pub const OAUTH_COOKIE_PATH: &str = "/api/auth/google";

fn build(name: &str, value: &str, path: &str, max_age: i64, secure: bool) -> HeaderValue {
    let mut cookie = format!("{name}={value}; Path={path}; Max-Age={max_age}; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).expect("cookie attributes are valid header characters")
}

/// `Set-Cookie` value installing the session token.
#[must_use]
pub fn session_cookie(token: &str, max_age: i64, secure: bool) -> HeaderValue {
    build(SESSION_COOKIE_NAME, token, "/", max_age, secure)
}

/// `Set-Cookie` value clearing the session.
#[must_use]
pub fn clear_session_cookie(secure: bool) -> HeaderValue {
    build(SESSION_COOKIE_NAME, "", "/", 0, secure)
}

/// `Set-Cookie` value installing the OAuth nonce, scoped to the callback path.
#[must_use]
pub fn oauth_state_cookie(nonce: &str, max_age: i64, secure: bool) -> HeaderValue {
    build(OAUTH_STATE_COOKIE_NAME, nonce, OAUTH_COOKIE_PATH, max_age, secure)
}

/// `Set-Cookie` value clearing the OAuth nonce.
#[must_use]
pub fn clear_oauth_state_cookie(secure: bool) -> HeaderValue {
    build(OAUTH_STATE_COOKIE_NAME, "", OAUTH_COOKIE_PATH, 0, secure)
}

/// First value of `name` in the request `Cookie` header(s), if any.
///
/// Tolerates missing `=` pairs and surrounding whitespace; an empty value
/// is returned as `Some("")` and left for the caller to reject.
#[must_use]
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|header| header.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key.trim() == name).then(|| value.trim().to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("abc.def", 2_592_000, false);
        assert_eq!(
            cookie.to_str().unwrap(),
            "session=abc.def; Path=/; Max-Age=2592000; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn session_cookie_secure_in_production() {
        let cookie = session_cookie("abc.def", 60, true);
        assert!(cookie.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn clear_session_cookie_expires_immediately() {
        let cookie = clear_session_cookie(false);
        assert_eq!(
            cookie.to_str().unwrap(),
            "session=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn oauth_cookie_scoped_to_callback_path() {
        let cookie = oauth_state_cookie("nonce123", 600, false);
        assert_eq!(
            cookie.to_str().unwrap(),
            "oauth_state=nonce123; Path=/api/auth/google; Max-Age=600; HttpOnly; SameSite=Lax"
        );
        let cleared = clear_oauth_state_cookie(false);
        assert!(cleared.to_str().unwrap().contains("Path=/api/auth/google"));
        assert!(cleared.to_str().unwrap().contains("Max-Age=0"));
    }

    #[test]
    fn cookie_value_parses_multiple_pairs() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; session=tok.sig; oauth_state=n1"),
        );
        assert_eq!(cookie_value(&headers, "session").as_deref(), Some("tok.sig"));
        assert_eq!(cookie_value(&headers, "oauth_state").as_deref(), Some("n1"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn cookie_value_spans_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("session=tok.sig"));
        assert_eq!(cookie_value(&headers, "session").as_deref(), Some("tok.sig"));
    }

    #[test]
    fn cookie_value_ignores_malformed_pairs() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("junk; session=tok"));
        assert_eq!(cookie_value(&headers, "session").as_deref(), Some("tok"));
    }

    #[test]
    fn cookie_value_keeps_empty_values() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("session="));
        assert_eq!(cookie_value(&headers, "session").as_deref(), Some(""));
    }
}
