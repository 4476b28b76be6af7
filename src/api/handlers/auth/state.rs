//! Shared handler state and gateway configuration.
//!
//! Configuration is resolved once at startup from CLI flags and
//! environment variables and then frozen; handlers never re-read the
//! environment per request.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use super::{google::GoogleClient, users::UsersClient};
use crate::APP_USER_AGENT;

/// Session and login policy, frozen at boot.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    session_secret: SecretString,
    session_ttl_seconds: i64,
    production: bool,
    allow_dev_login: bool,
}

impl GatewayConfig {
    /// 30 days.
    pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 2_592_000;

    #[must_use]
    pub fn new(session_secret: SecretString) -> Self {
        Self {
            session_secret,
            session_ttl_seconds: Self::DEFAULT_SESSION_TTL_SECONDS,
            production: false,
            allow_dev_login: true,
        }
    }

    #[must_use]
    pub const fn with_session_ttl_seconds(mut self, ttl_seconds: i64) -> Self {
        self.session_ttl_seconds = ttl_seconds;
        self
    }

    #[must_use]
    pub const fn with_production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    #[must_use]
    pub const fn with_allow_dev_login(mut self, allow: bool) -> Self {
        self.allow_dev_login = allow;
        self
    }

    #[must_use]
    pub fn session_secret(&self) -> &str {
        self.session_secret.expose_secret()
    }

    #[must_use]
    pub fn session_configured(&self) -> bool {
        !self.session_secret.expose_secret().is_empty()
    }

    #[must_use]
    pub const fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub const fn production(&self) -> bool {
        self.production
    }

    /// The `Secure` cookie attribute tracks the production flag.
    #[must_use]
    pub const fn session_cookie_secure(&self) -> bool {
        self.production
    }

    /// Dev login is hard-disabled in production regardless of the flag.
    #[must_use]
    pub const fn dev_login_enabled(&self) -> bool {
        !self.production && self.allow_dev_login
    }
}

/// State shared by every auth handler via `Extension<Arc<AuthState>>`.
pub struct AuthState {
    config: GatewayConfig,
    google: GoogleClient,
    users: UsersClient,
}

impl AuthState {
    /// # Panics
    /// Panics if the shared HTTP client cannot be constructed, which only
    /// happens with a broken TLS backend at startup.
    #[must_use]
    pub fn new(config: GatewayConfig, google: super::GoogleConfig, users_url: &str) -> Self {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .expect("reqwest client");

        Self {
            config,
            google: GoogleClient::new(google, http.clone()),
            users: UsersClient::new(users_url, http),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    #[must_use]
    pub const fn google(&self) -> &GoogleClient {
        &self.google
    }

    #[must_use]
    pub const fn users(&self) -> &UsersClient {
        &self.users
    }
}
