//! Development login, user listing, and logout.
//!
//! The dev endpoints exist so the frontend can log in with a bare
//! username against the local users service. In production they answer a
//! plain 404, indistinguishable from a route that does not exist.

use axum::{
    extract::{Extension, Query},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::IntoParams;

use super::{AuthState, cookies, token};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub username: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DevUsersQuery {
    /// Substring filter on username.
    pub q: Option<String>,
    /// Maximum number of results.
    pub limit: Option<String>,
}

fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Logged in; session cookie set"),
        (status = 404, description = "Dev login is disabled"),
        (status = 502, description = "Users service rejected the login")
    ),
    tag = "auth",
)]
/// Username-only login for local development.
///
/// Delegates user creation to the users service, then issues a session
/// for the returned user id.
pub async fn login(
    state: Extension<Arc<AuthState>>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    let config = state.config();
    if !config.dev_login_enabled() {
        return not_found().into_response();
    }

    if !config.session_configured() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "session not configured" })),
        )
            .into_response();
    }

    let out = match state.users().login(&request.username).await {
        Ok(out) => out,
        Err(err) => {
            error!("users login failed: {}", err);
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "users service unavailable" })),
            )
                .into_response();
        }
    };

    // The users service reports the canonical id in `token`.
    let Some(subject) = out.get("token").and_then(|t| t.as_str()) else {
        error!("users login response carried no token");
        return (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": "users service unavailable" })),
        )
            .into_response();
    };

    let session = token::issue(subject, config.session_secret(), config.session_ttl_seconds());

    info!(user = subject, "dev login");

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        cookies::session_cookie(
            &session,
            config.session_ttl_seconds(),
            config.session_cookie_secure(),
        ),
    );

    (StatusCode::OK, headers, Json(out)).into_response()
}

#[utoipa::path(
    get,
    path = "/api/dev/users",
    params(DevUsersQuery),
    responses (
        (status = 200, description = "Known users, for the dev login picker"),
        (status = 404, description = "Dev login is disabled")
    ),
    tag = "auth",
)]
/// List known users so the dev login page can offer a picker.
pub async fn dev_users(
    state: Extension<Arc<AuthState>>,
    Query(query): Query<DevUsersQuery>,
) -> impl IntoResponse {
    if !state.config().dev_login_enabled() {
        return not_found().into_response();
    }

    match state
        .users()
        .list_users(query.q.as_deref(), query.limit.as_deref())
        .await
    {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(err) => {
            error!("users list failed: {}", err);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "users service unavailable" })),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/logout",
    responses (
        (status = 200, description = "Session cookie cleared")
    ),
    tag = "auth",
)]
/// Clear the session cookie. Tokens are stateless, so there is nothing
/// to revoke server-side.
pub async fn logout(state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        cookies::clear_session_cookie(state.config().session_cookie_secure()),
    );
    (StatusCode::OK, headers, Json(json!({ "ok": true })))
}
