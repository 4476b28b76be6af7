pub mod auth;
pub mod logging;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("clube-gateway")
        .about("Reading club API gateway")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("CLUBE_GATEWAY_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("users-url")
                .long("users-url")
                .help("Base URL of the users (profile) service")
                .env("CLUBE_GATEWAY_USERS_URL")
                .default_value("http://localhost:3001"),
        );

    let command = auth::with_args(command);
    logging::with_args(command)
}
