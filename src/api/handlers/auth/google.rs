//! Google OAuth2 provider client.
//!
//! Implements the three provider touchpoints of the authorization-code
//! flow: building the consent URL, exchanging the code for tokens, and
//! fetching the OpenID userinfo document. Endpoint URLs are configurable
//! so tests can point the client at a local mock server.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::warn;
use url::Url;

use super::error::AuthError;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Google OAuth client credentials and endpoints.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    client_id: String,
    client_secret: SecretString,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
}

impl GoogleConfig {
    #[must_use]
    pub fn new(client_id: String, client_secret: SecretString, redirect_uri: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            auth_url: AUTH_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            userinfo_url: USERINFO_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_auth_url(mut self, url: String) -> Self {
        self.auth_url = url;
        self
    }

    #[must_use]
    pub fn with_token_url(mut self, url: String) -> Self {
        self.token_url = url;
        self
    }

    #[must_use]
    pub fn with_userinfo_url(mut self, url: String) -> Self {
        self.userinfo_url = url;
        self
    }

    /// All three credentials must be present for the flow to run.
    #[must_use]
    pub fn configured(&self) -> bool {
        !self.client_id.is_empty()
            && !self.client_secret.expose_secret().is_empty()
            && !self.redirect_uri.is_empty()
    }
}

/// Token endpoint response; only the access token matters here.
#[derive(Debug, Deserialize)]
pub struct GoogleTokens {
    pub access_token: Option<String>,
}

/// OpenID Connect userinfo document, all fields optional on the wire.
#[derive(Debug, Default, Deserialize)]
pub struct GoogleUserInfo {
    pub sub: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: Option<String>,
    error_description: Option<String>,
}

pub struct GoogleClient {
    config: GoogleConfig,
    http: Client,
}

impl GoogleClient {
    #[must_use]
    pub const fn new(config: GoogleConfig, http: Client) -> Self {
        Self { config, http }
    }

    #[must_use]
    pub const fn config(&self) -> &GoogleConfig {
        &self.config
    }

    /// Consent-screen URL carrying the signed state parameter.
    ///
    /// # Panics
    /// Panics if the configured auth URL is not parseable, which the CLI
    /// validates at startup.
    #[must_use]
    pub fn authorization_url(&self, state: &str) -> String {
        let mut url = Url::parse(&self.config.auth_url).expect("auth url is valid");
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", "openid email profile")
            .append_pair("prompt", "select_account")
            .append_pair("state", state);
        url.to_string()
    }

    /// Exchange the authorization code for tokens.
    ///
    /// # Errors
    /// `Upstream` on a non-2xx provider response, `Http` on transport
    /// failure.
    pub async fn exchange_code(&self, code: &str) -> Result<GoogleTokens, AuthError> {
        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("code", code),
                ("client_id", &self.config.client_id),
                ("client_secret", self.config.client_secret.expose_secret()),
                ("redirect_uri", &self.config.redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let response = ensure_success("token exchange", response).await?;
        Ok(response.json().await?)
    }

    /// Fetch the userinfo document with the access token.
    ///
    /// # Errors
    /// `Upstream` on a non-2xx provider response, `Http` on transport
    /// failure.
    pub async fn fetch_userinfo(&self, access_token: &str) -> Result<GoogleUserInfo, AuthError> {
        let response = self
            .http
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let response = ensure_success("userinfo fetch", response).await?;
        Ok(response.json().await?)
    }
}

/// Map a non-2xx response to `Upstream`, pulling the provider's own error
/// description out of the body when it has one.
async fn ensure_success(
    operation: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, AuthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ProviderError>(&body)
        .ok()
        .and_then(|err| err.error_description.or(err.error))
        .unwrap_or(body);

    warn!(operation, status = status.as_u16(), %detail, "provider call failed");

    Err(AuthError::Upstream {
        operation,
        status: status.as_u16(),
        detail,
    })
}
