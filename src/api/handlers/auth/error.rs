//! Error taxonomy for the OAuth flow.
//!
//! Browser-facing failures become an opaque `error=<code>` redirect back
//! to the login page; the detail behind an upstream failure is only ever
//! logged server-side.

use thiserror::Error;
use url::form_urlencoded;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("google oauth is not configured")]
    GoogleNotConfigured,
    #[error("session secret is not configured")]
    SessionNotConfigured,
    /// Provider sent `error=<code>` to the callback.
    #[error("provider returned error: {0}")]
    Provider(String),
    #[error("callback is missing the authorization code")]
    MissingCode,
    /// State signature, freshness, or nonce check failed.
    #[error("oauth state rejected")]
    StateRejected,
    #[error("token response carried no access token")]
    MissingAccessToken,
    #[error("userinfo response carried no subject")]
    MissingSubject,
    /// The provider subject sanitized down to nothing usable.
    #[error("derived user id is too short")]
    IdentityTooShort,
    #[error("{operation} failed with status {status}: {detail}")]
    Upstream {
        operation: &'static str,
        status: u16,
        detail: String,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl AuthError {
    /// Stable code shown to the browser. Never leaks upstream detail.
    #[must_use]
    pub fn error_code(&self) -> String {
        match self {
            Self::GoogleNotConfigured => "google_not_configured".to_string(),
            Self::SessionNotConfigured => "session_not_configured".to_string(),
            Self::Provider(code) => format!("google_{code}"),
            Self::MissingCode => "google_missing_code".to_string(),
            Self::StateRejected => "google_invalid_state".to_string(),
            Self::MissingAccessToken => "google_missing_access_token".to_string(),
            Self::MissingSubject => "google_missing_sub".to_string(),
            Self::IdentityTooShort => "google_invalid_user_id".to_string(),
            Self::Upstream { .. } | Self::Http(_) => "google_oauth_error".to_string(),
        }
    }
}

/// Login-page redirect target carrying the error code and, when the user
/// was headed somewhere specific, the original return path.
#[must_use]
pub fn login_redirect(code: &str, from: &str) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("error", code);
    if !from.is_empty() && from != "/" {
        query.append_pair("from", from);
    }
    format!("/login?{}", query.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            AuthError::GoogleNotConfigured.error_code(),
            "google_not_configured"
        );
        assert_eq!(
            AuthError::SessionNotConfigured.error_code(),
            "session_not_configured"
        );
        assert_eq!(
            AuthError::Provider("access_denied".to_string()).error_code(),
            "google_access_denied"
        );
        assert_eq!(AuthError::MissingCode.error_code(), "google_missing_code");
        assert_eq!(AuthError::StateRejected.error_code(), "google_invalid_state");
        assert_eq!(
            AuthError::MissingAccessToken.error_code(),
            "google_missing_access_token"
        );
        assert_eq!(AuthError::MissingSubject.error_code(), "google_missing_sub");
        assert_eq!(
            AuthError::IdentityTooShort.error_code(),
            "google_invalid_user_id"
        );
    }

    #[test]
    fn upstream_detail_never_reaches_the_code() {
        let err = AuthError::Upstream {
            operation: "token exchange",
            status: 502,
            detail: "internal secret stuff".to_string(),
        };
        assert_eq!(err.error_code(), "google_oauth_error");
    }

    #[test]
    fn redirect_keeps_from_when_meaningful() {
        assert_eq!(
            login_redirect("google_missing_code", "/books/42"),
            "/login?error=google_missing_code&from=%2Fbooks%2F42"
        );
        assert_eq!(
            login_redirect("google_missing_code", "/"),
            "/login?error=google_missing_code"
        );
        assert_eq!(
            login_redirect("google_missing_code", ""),
            "/login?error=google_missing_code"
        );
    }
}
