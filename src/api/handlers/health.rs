//! Health endpoint for the gateway.
//!
//! The gateway holds no database; health reports build metadata plus
//! whether Google login and dev login are switched on.

use crate::GIT_COMMIT_HASH;
use axum::{
    extract::Extension,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;

use super::auth::AuthState;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    google: bool,
    dev_login: bool,
}

#[utoipa::path(
    get,
    path = "/health",
    responses (
        (status = 200, description = "Service is healthy", body = Health)
    ),
    tag = "gateway",
)]
/// Report gateway health and which login modes are enabled.
pub async fn health(state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        google: state.google().config().configured(),
        dev_login: state.config().dev_login_enabled(),
    };

    let short_hash = if health.commit.len() > 7 {
        &health.commit[0..7]
    } else {
        ""
    };

    let headers = format!("{}:{}:{}", health.name, health.version, short_hash)
        .parse::<HeaderValue>()
        .map(|x_app_header_value| {
            debug!("X-App header: {:?}", x_app_header_value);

            let mut headers = HeaderMap::new();
            headers.insert("X-App", x_app_header_value);
            headers
        })
        .map_err(|err| {
            debug!("Failed to parse X-App header: {}", err);
        })
        .unwrap_or_else(|()| HeaderMap::new());

    (StatusCode::OK, headers, Json(health))
}
