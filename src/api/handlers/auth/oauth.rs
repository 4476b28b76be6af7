//! Google OAuth2 login flow handlers.
//!
//! `google_start` mints the signed state plus nonce cookie and bounces the
//! browser to the consent screen; `google_callback` validates the
//! round-trip, exchanges the code, ensures a user record exists, and
//! installs the session cookie. Every callback outcome, success or not,
//! clears the nonce cookie so a stale nonce can never be replayed.

use axum::{
    extract::{Extension, Query},
    http::{HeaderMap, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, LazyLock};
use tracing::{error, info, warn};
use utoipa::IntoParams;

use super::{AuthState, cookies, error::AuthError, error::login_redirect, oauth_state, token, users::ProfileUpdate};

const USER_ID_PREFIX: &str = "g_";
const USER_ID_MAX_LEN: usize = 32;
const USER_ID_MIN_LEN: usize = 3;

static USER_ID_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^A-Za-z0-9_]").expect("valid pattern"));

#[derive(Debug, Deserialize, IntoParams)]
pub struct StartQuery {
    /// Post-login return path; anything unsafe collapses to `/`.
    pub from: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Internal user id derived from the provider subject.
fn derive_user_id(sub: &str) -> Result<String, AuthError> {
    let cleaned = USER_ID_STRIP.replace_all(sub, "");
    let cleaned: String = cleaned.chars().take(USER_ID_MAX_LEN).collect();
    if cleaned.len() < USER_ID_MIN_LEN {
        return Err(AuthError::IdentityTooShort);
    }
    Ok(format!("{USER_ID_PREFIX}{cleaned}"))
}

#[utoipa::path(
    get,
    path = "/api/auth/google/start",
    params(StartQuery),
    responses (
        (status = 303, description = "Redirect to the Google consent screen, or back to the login page with an error code")
    ),
    tag = "auth",
)]
/// Begin the Google login round-trip.
pub async fn google_start(
    state: Extension<Arc<AuthState>>,
    Query(query): Query<StartQuery>,
) -> Response {
    let config = state.config();
    let from = oauth_state::sanitize_return_path(query.from.as_deref());

    if !state.google().config().configured() {
        return Redirect::to(&login_redirect(
            &AuthError::GoogleNotConfigured.error_code(),
            &from,
        ))
        .into_response();
    }

    if !config.session_configured() {
        return Redirect::to(&login_redirect(
            &AuthError::SessionNotConfigured.error_code(),
            &from,
        ))
        .into_response();
    }

    let (signed_state, nonce) = match oauth_state::begin(&from, config.session_secret()) {
        Ok(pair) => pair,
        Err(err) => {
            error!("failed to mint oauth state: {}", err);
            return Redirect::to(&login_redirect("google_oauth_error", &from)).into_response();
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        cookies::oauth_state_cookie(
            &nonce,
            oauth_state::STATE_COOKIE_TTL_SECONDS,
            config.session_cookie_secure(),
        ),
    );

    (
        headers,
        Redirect::to(&state.google().authorization_url(&signed_state)),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/api/auth/google/callback",
    params(CallbackQuery),
    responses (
        (status = 303, description = "Redirect to the original page with a session cookie, or back to the login page with an error code")
    ),
    tag = "auth",
)]
/// Complete the Google login round-trip.
pub async fn google_callback(
    state: Extension<Arc<AuthState>>,
    Query(query): Query<CallbackQuery>,
    request_headers: HeaderMap,
) -> Response {
    let secure = state.config().session_cookie_secure();

    // The nonce is single-use; clear it on every outcome.
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookies::clear_oauth_state_cookie(secure));

    match run_callback(&state, &query, &request_headers).await {
        Ok((from, session)) => {
            headers.append(
                SET_COOKIE,
                cookies::session_cookie(
                    &session,
                    state.config().session_ttl_seconds(),
                    secure,
                ),
            );
            (headers, Redirect::to(&from)).into_response()
        }
        Err((err, from)) => {
            warn!("google callback rejected: {}", err);
            (
                headers,
                Redirect::to(&login_redirect(&err.error_code(), &from)),
            )
                .into_response()
        }
    }
}

/// Validate the callback and produce `(return path, session token)`.
///
/// Errors carry the best-known return path so the login page can offer a
/// retry that lands where the user was headed. Before the state claim is
/// verified the path in it cannot be trusted, so those errors fall back
/// to `/`.
async fn run_callback(
    state: &AuthState,
    query: &CallbackQuery,
    headers: &HeaderMap,
) -> Result<(String, String), (AuthError, String)> {
    let config = state.config();
    let root = || "/".to_string();

    if !state.google().config().configured() {
        return Err((AuthError::GoogleNotConfigured, root()));
    }
    if !config.session_configured() {
        return Err((AuthError::SessionNotConfigured, root()));
    }

    if let Some(code) = &query.error {
        return Err((AuthError::Provider(code.clone()), root()));
    }

    let code = query
        .code
        .as_deref()
        .filter(|code| !code.is_empty())
        .ok_or_else(|| (AuthError::MissingCode, root()))?;

    let nonce = cookies::cookie_value(headers, cookies::OAUTH_STATE_COOKIE_NAME)
        .unwrap_or_default();
    let from = query
        .state
        .as_deref()
        .and_then(|signed| oauth_state::complete(signed, &nonce, config.session_secret()))
        .ok_or_else(|| (AuthError::StateRejected, root()))?;

    match finish_login(state, code).await {
        Ok(session) => Ok((from, session)),
        Err(err) => Err((err, from)),
    }
}

/// Exchange the code, ensure the user record, and issue the session.
async fn finish_login(state: &AuthState, code: &str) -> Result<String, AuthError> {
    let config = state.config();

    let tokens = state.google().exchange_code(code).await?;
    let access_token = tokens.access_token.ok_or(AuthError::MissingAccessToken)?;

    let info = state.google().fetch_userinfo(&access_token).await?;
    let sub = info.sub.as_deref().ok_or(AuthError::MissingSubject)?;
    let user_id = derive_user_id(sub)?;

    ensure_user(state, &user_id, &info).await?;

    let session = token::issue(
        &user_id,
        config.session_secret(),
        config.session_ttl_seconds(),
    );

    info!(user = %user_id, "google login");

    Ok(session)
}

/// Create or enrich the user record, never clobbering existing profile
/// fields with empty provider data.
async fn ensure_user(
    state: &AuthState,
    user_id: &str,
    info: &super::google::GoogleUserInfo,
) -> Result<(), AuthError> {
    let existing = state.users().fetch_user(user_id).await?.unwrap_or_default();

    let update = ProfileUpdate {
        name: info
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| existing.name.clone().filter(|name| !name.is_empty()))
            .unwrap_or_else(|| user_id.to_string()),
        avatar_url: info
            .picture
            .clone()
            .filter(|url| !url.is_empty())
            .or_else(|| existing.avatar_url.clone())
            .unwrap_or_default(),
        bio: existing.bio.clone().unwrap_or_default(),
    };

    state.users().update_profile(user_id, &update).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_user_id_strips_and_prefixes() {
        assert_eq!(derive_user_id("1234567890").unwrap(), "g_1234567890");
        assert_eq!(derive_user_id("ab-c.d!e").unwrap(), "g_abcde");
        assert_eq!(derive_user_id("under_score").unwrap(), "g_under_score");
    }

    #[test]
    fn derive_user_id_truncates_to_limit() {
        let sub = "a".repeat(64);
        let id = derive_user_id(&sub).unwrap();
        assert_eq!(id.len(), USER_ID_PREFIX.len() + USER_ID_MAX_LEN);
    }

    #[test]
    fn derive_user_id_rejects_too_short() {
        assert!(matches!(
            derive_user_id("a!"),
            Err(AuthError::IdentityTooShort)
        ));
        assert!(matches!(
            derive_user_id("!!!"),
            Err(AuthError::IdentityTooShort)
        ));
        assert!(matches!(derive_user_id(""), Err(AuthError::IdentityTooShort)));
    }
}
