//! Logging setup for the `skywatch` binary.
//!
//! Logs go to stderr so the panels printed on stdout stay readable.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows the `-v` count:
/// warnings only, then info, then debug for skywatch crates.
pub fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time();

    tracing_subscriber::registry().with(filter).with(fmt_layer).try_init()?;

    Ok(())
}

fn default_directives(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "skywatch=info,skywatch_core=info,warn",
        _ => "skywatch=debug,skywatch_core=debug,info",
    }
}
