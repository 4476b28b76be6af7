//! Command-line argument dispatch and server initialization.
//!
//! Parses validated CLI arguments and maps them to the server action with
//! its full configuration state. The session secret is resolved here: an
//! unset secret outside production falls back to a development default so
//! local setups work out of the box, while production keeps it empty and
//! the login handlers soft-fail until one is provided.

use crate::cli::actions::{Action, server::Args};
use anyhow::{Context, Result};
use secrecy::SecretString;

const DEV_SESSION_SECRET: &str = "dev-session-secret-change-me";

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let users_url = matches
        .get_one::<String>("users-url")
        .cloned()
        .context("missing required argument: --users-url")?;

    let production = matches.get_flag("production");
    let allow_dev_login = matches
        .get_one::<bool>("allow-dev-login")
        .copied()
        .unwrap_or(true);

    let session_secret = matches
        .get_one::<String>("session-secret")
        .cloned()
        .unwrap_or_default();
    let session_secret = if session_secret.is_empty() && !production {
        DEV_SESSION_SECRET.to_string()
    } else {
        session_secret
    };

    let arg = |name: &str| matches.get_one::<String>(name).cloned().unwrap_or_default();

    Ok(Action::Server(Args {
        port,
        users_url,
        production,
        allow_dev_login,
        session_secret: SecretString::from(session_secret),
        session_ttl_seconds: matches
            .get_one::<i64>("session-ttl-seconds")
            .copied()
            .unwrap_or(60 * 60 * 24 * 30),
        google_client_id: arg("google-client-id"),
        google_client_secret: SecretString::from(arg("google-client-secret")),
        google_redirect_uri: arg("google-redirect-uri"),
        google_auth_url: arg("google-auth-url"),
        google_token_url: arg("google-token-url"),
        google_userinfo_url: arg("google-userinfo-url"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn matches_from(args: Vec<&str>) -> clap::ArgMatches {
        crate::cli::commands::new().get_matches_from(args)
    }

    #[test]
    fn dev_secret_defaults_outside_production() {
        temp_env::with_vars(
            [
                ("CLUBE_GATEWAY_SESSION_SECRET", None::<&str>),
                ("CLUBE_GATEWAY_PRODUCTION", None::<&str>),
            ],
            || {
                let matches = matches_from(vec!["clube-gateway"]);
                let Ok(Action::Server(args)) = handler(&matches) else {
                    panic!("expected server action");
                };
                assert_eq!(args.session_secret.expose_secret(), DEV_SESSION_SECRET);
                assert!(args.allow_dev_login);
                assert!(!args.production);
            },
        );
    }

    #[test]
    fn production_keeps_secret_empty_when_unset() {
        temp_env::with_vars([("CLUBE_GATEWAY_SESSION_SECRET", None::<&str>)], || {
            let matches = matches_from(vec!["clube-gateway", "--production"]);
            let Ok(Action::Server(args)) = handler(&matches) else {
                panic!("expected server action");
            };
            assert_eq!(args.session_secret.expose_secret(), "");
            assert!(args.production);
        });
    }

    #[test]
    fn explicit_secret_wins() {
        temp_env::with_vars([("CLUBE_GATEWAY_SESSION_SECRET", None::<&str>)], || {
            let matches = matches_from(vec!["clube-gateway", "--session-secret", "s3cret"]);
            let Ok(Action::Server(args)) = handler(&matches) else {
                panic!("expected server action");
            };
            assert_eq!(args.session_secret.expose_secret(), "s3cret");
        });
    }
}
