use crate::api::{
    self,
    handlers::auth::{AuthState, GatewayConfig, GoogleConfig},
};
use anyhow::Result;
use secrecy::SecretString;
use std::sync::Arc;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub users_url: String,
    pub production: bool,
    pub allow_dev_login: bool,
    pub session_secret: SecretString,
    pub session_ttl_seconds: i64,
    pub google_client_id: String,
    pub google_client_secret: SecretString,
    pub google_redirect_uri: String,
    pub google_auth_url: String,
    pub google_token_url: String,
    pub google_userinfo_url: String,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the listener cannot bind or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let config = GatewayConfig::new(args.session_secret)
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_production(args.production)
        .with_allow_dev_login(args.allow_dev_login);

    let mut google = GoogleConfig::new(
        args.google_client_id,
        args.google_client_secret,
        args.google_redirect_uri,
    );
    if !args.google_auth_url.is_empty() {
        google = google.with_auth_url(args.google_auth_url);
    }
    if !args.google_token_url.is_empty() {
        google = google.with_token_url(args.google_token_url);
    }
    if !args.google_userinfo_url.is_empty() {
        google = google.with_userinfo_url(args.google_userinfo_url);
    }

    let state = Arc::new(AuthState::new(config, google, &args.users_url));

    api::new(args.port, state).await
}
