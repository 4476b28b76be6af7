//! Logging setup for the gateway.
//!
//! Structured logs only: an fmt layer filtered by `RUST_LOG` or the `-v`
//! verbosity count. The gateway talks to Google and the users service on
//! every login, so the outbound HTTP crates are capped at `error` to keep
//! debug runs readable.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

const QUIET_CRATES: [&str; 4] = ["hyper", "hyper_util", "reqwest", "tokio"];

const fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialize the tracing subscriber from the `-v` count.
///
/// # Errors
///
/// Returns an error if a filter directive fails to parse or the global
/// subscriber is already set.
pub fn init(verbosity: u8) -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false);

    let mut filter = EnvFilter::builder()
        .with_default_directive(level_for(verbosity).into())
        .from_env_lossy();
    for krate in QUIET_CRATES {
        filter = filter.add_directive(format!("{krate}=error").parse()?);
    }

    let subscriber = Registry::default().with(fmt_layer).with(filter);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0), Level::ERROR);
        assert_eq!(level_for(1), Level::WARN);
        assert_eq!(level_for(2), Level::INFO);
        assert_eq!(level_for(3), Level::DEBUG);
        assert_eq!(level_for(4), Level::TRACE);
        assert_eq!(level_for(9), Level::TRACE);
    }
}
