//! Diagnostic logging
//!
//! Diagnostics go to stderr through `tracing`, leaving stdout to the command's
//! progress output. `RUST_LOG` takes precedence over the `-v` flags.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for a `-v` count
#[must_use]
pub const fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "lucid_scaffold=info,warn",
        2 => "lucid_scaffold=debug,info",
        _ => "lucid_scaffold=trace,debug",
    }
}

/// Initialize the global subscriber
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
///
/// # Example
///
/// ```rust,no_run
/// # fn main() -> anyhow::Result<()> {
/// lucid_scaffold::observability::init(1)?;
/// tracing::info!("ready");
/// # Ok(())
/// # }
/// ```
pub fn init(verbosity: u8) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .without_time()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()?;

    Ok(())
}
