//! Core library for the bwauth Alfred workflow step
//!
//! This crate provides the unlock/login flow against the Bitwarden CLI,
//! the dialog and keychain collaborators it drives, and configuration.

pub mod error;
pub mod types;

pub mod auth;
pub mod bw;
pub mod config;
pub mod process;

/// Initialize logging infrastructure
///
/// Logs go to stderr, which Alfred shows in its workflow debugger; stdout is
/// reserved for the status message. Under systemd the journal is used instead.
/// `debug` raises the level from INFO to DEBUG.
pub fn init_logging(debug: bool) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    #[cfg(target_os = "linux")]
    {
        if std::env::var("JOURNAL_STREAM").is_ok() {
            let journal_layer = tracing_journald::layer()?;
            tracing_subscriber::registry()
                .with(journal_layer)
                .with(level)
                .try_init()?;
            return Ok(());
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(level)
        .try_init()?;

    Ok(())
}
