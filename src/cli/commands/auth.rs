use clap::{Arg, ArgAction, Command};

pub fn with_args(command: Command) -> Command {
    let command = with_session_args(command);
    with_google_args(command)
}

fn with_session_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("session-secret")
                .long("session-secret")
                .help("Secret used to sign session and OAuth state tokens")
                .long_help(
                    "Secret used to sign session and OAuth state tokens. Outside production an \
                     unset secret falls back to a well-known development value; in production it \
                     stays empty and login soft-fails until one is configured.",
                )
                .env("CLUBE_GATEWAY_SESSION_SECRET"),
        )
        .arg(
            Arg::new("session-ttl-seconds")
                .long("session-ttl-seconds")
                .help("Session cookie TTL in seconds")
                .env("CLUBE_GATEWAY_SESSION_TTL_SECONDS")
                .default_value("2592000")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("production")
                .long("production")
                .help("Production deployment mode: Secure cookies, dev login disabled")
                .env("CLUBE_GATEWAY_PRODUCTION")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("allow-dev-login")
                .long("allow-dev-login")
                .help("Allow the dev username login outside production")
                .env("CLUBE_GATEWAY_ALLOW_DEV_LOGIN")
                .default_value("true")
                .value_parser(clap::value_parser!(bool)),
        )
}

fn with_google_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("google-client-id")
                .long("google-client-id")
                .help("Google OAuth2 client id")
                .env("CLUBE_GATEWAY_GOOGLE_CLIENT_ID"),
        )
        .arg(
            Arg::new("google-client-secret")
                .long("google-client-secret")
                .help("Google OAuth2 client secret")
                .env("CLUBE_GATEWAY_GOOGLE_CLIENT_SECRET"),
        )
        .arg(
            Arg::new("google-redirect-uri")
                .long("google-redirect-uri")
                .help("Redirect URI registered for the OAuth2 callback")
                .env("CLUBE_GATEWAY_GOOGLE_REDIRECT_URI"),
        )
        .arg(
            Arg::new("google-auth-url")
                .long("google-auth-url")
                .help("Authorization endpoint (override for local stubs)")
                .env("CLUBE_GATEWAY_GOOGLE_AUTH_URL")
                .default_value("https://accounts.google.com/o/oauth2/v2/auth"),
        )
        .arg(
            Arg::new("google-token-url")
                .long("google-token-url")
                .help("Token endpoint (override for local stubs)")
                .env("CLUBE_GATEWAY_GOOGLE_TOKEN_URL")
                .default_value("https://oauth2.googleapis.com/token"),
        )
        .arg(
            Arg::new("google-userinfo-url")
                .long("google-userinfo-url")
                .help("Userinfo endpoint (override for local stubs)")
                .env("CLUBE_GATEWAY_GOOGLE_USERINFO_URL")
                .default_value("https://openidconnect.googleapis.com/v1/userinfo"),
        )
}

#[cfg(test)]
mod tests {
    #[test]
    fn google_endpoint_defaults() {
        temp_env::with_vars(
            [
                ("CLUBE_GATEWAY_GOOGLE_AUTH_URL", None::<&str>),
                ("CLUBE_GATEWAY_GOOGLE_TOKEN_URL", None::<&str>),
                ("CLUBE_GATEWAY_GOOGLE_USERINFO_URL", None::<&str>),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec!["clube-gateway"]);
                assert_eq!(
                    matches.get_one::<String>("google-auth-url").cloned(),
                    Some("https://accounts.google.com/o/oauth2/v2/auth".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>("google-token-url").cloned(),
                    Some("https://oauth2.googleapis.com/token".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>("google-userinfo-url").cloned(),
                    Some("https://openidconnect.googleapis.com/v1/userinfo".to_string())
                );
            },
        );
    }

    #[test]
    fn dev_login_enabled_by_default_and_disableable() {
        temp_env::with_vars([("CLUBE_GATEWAY_ALLOW_DEV_LOGIN", None::<&str>)], || {
            let command = crate::cli::commands::new();
            let matches = command.get_matches_from(vec!["clube-gateway"]);
            assert_eq!(matches.get_one::<bool>("allow-dev-login").copied(), Some(true));
        });

        temp_env::with_vars([("CLUBE_GATEWAY_ALLOW_DEV_LOGIN", Some("false"))], || {
            let command = crate::cli::commands::new();
            let matches = command.get_matches_from(vec!["clube-gateway"]);
            assert_eq!(
                matches.get_one::<bool>("allow-dev-login").copied(),
                Some(false)
            );
        });
    }
}
