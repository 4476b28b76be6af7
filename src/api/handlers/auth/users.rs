//! HTTP client for the internal users service.
//!
//! The gateway never stores user records itself; it asks the users
//! service to create and read them, asserting identity with the trusted
//! `x-username` header on authenticated calls.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::AuthError;
use super::identity::IDENTITY_HEADER;

/// User record as the users service returns it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Profile fields pushed on `PUT /me`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: String,
    pub avatar_url: String,
    pub bio: String,
}

pub struct UsersClient {
    base_url: String,
    http: Client,
}

impl UsersClient {
    #[must_use]
    pub fn new(base_url: &str, http: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Username login; creates the user on first sight and returns
    /// `{token, user}` as the users service shapes it.
    ///
    /// # Errors
    /// `Upstream` on a non-2xx response, `Http` on transport failure.
    pub async fn login(&self, username: &str) -> Result<Value, AuthError> {
        let response = self
            .http
            .post(self.url("/login"))
            .json(&serde_json::json!({ "username": username }))
            .send()
            .await?;
        let response = ensure_success("users login", response).await?;
        Ok(response.json().await?)
    }

    /// Fetch a user by id; `None` when the users service has no record.
    ///
    /// # Errors
    /// `Upstream` on any non-2xx response other than 404.
    pub async fn fetch_user(&self, id: &str) -> Result<Option<UserRecord>, AuthError> {
        let response = self.http.get(self.url(&format!("/users/{id}"))).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success("users fetch", response).await?;
        Ok(Some(response.json().await?))
    }

    /// Update the caller's profile, asserting identity via header.
    ///
    /// # Errors
    /// `Upstream` on a non-2xx response, `Http` on transport failure.
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<(), AuthError> {
        let response = self
            .http
            .put(self.url("/me"))
            .header(IDENTITY_HEADER, user_id)
            .json(update)
            .send()
            .await?;
        ensure_success("users profile update", response).await?;
        Ok(())
    }

    /// List users, passing the search and limit parameters through.
    ///
    /// # Errors
    /// `Upstream` on a non-2xx response, `Http` on transport failure.
    pub async fn list_users(
        &self,
        q: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Value, AuthError> {
        let mut request = self.http.get(self.url("/users"));
        if let Some(q) = q {
            request = request.query(&[("q", q)]);
        }
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        let response = request.send().await?;
        let response = ensure_success("users list", response).await?;
        Ok(response.json().await?)
    }

    /// `GET /me` passthrough; returns the upstream status and JSON body.
    ///
    /// # Errors
    /// `Http` on transport failure only; non-2xx statuses pass through.
    pub async fn me(&self, user_id: &str) -> Result<(u16, Value), AuthError> {
        let response = self
            .http
            .get(self.url("/me"))
            .header(IDENTITY_HEADER, user_id)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.json().await.unwrap_or(Value::Null);
        Ok((status, body))
    }
}

async fn ensure_success(
    operation: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, AuthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = response.text().await.unwrap_or_default();
    Err(AuthError::Upstream {
        operation,
        status: status.as_u16(),
        detail,
    })
}
