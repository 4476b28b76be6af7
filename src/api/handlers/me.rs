//! Authenticated profile passthrough.
//!
//! Resolves the caller's identity at the gateway, then proxies to the
//! users service with the trusted `x-username` header so downstream never
//! sees raw cookies.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use super::auth::{AuthState, identity};

#[utoipa::path(
    get,
    path = "/api/me",
    responses (
        (status = 200, description = "Profile of the authenticated caller"),
        (status = 401, description = "No valid session"),
        (status = 502, description = "Users service unavailable")
    ),
    tag = "gateway",
)]
/// Return the caller's profile from the users service.
pub async fn me(state: Extension<Arc<AuthState>>, headers: HeaderMap) -> impl IntoResponse {
    let Some(user_id) = identity::resolve(&headers, state.config().session_secret()) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "unauthorized" })),
        )
            .into_response();
    };

    match state.users().me(&user_id).await {
        Ok((status, body)) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, Json(body)).into_response()
        }
        Err(err) => {
            error!("users me failed: {}", err);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "users service unavailable" })),
            )
                .into_response()
        }
    }
}
