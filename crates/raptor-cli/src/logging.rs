//! Subscriber setup. Logs go to stderr so stdout stays parseable.

use tracing_subscriber::EnvFilter;

use raptor_core::config::ObservabilityConfig;

/// Environment variable holding a full filter directive, e.g.
/// `RAPTOR_LOG=raptor_tree=debug,raptor_ingest=info`.
pub const LOG_ENV: &str = "RAPTOR_LOG";

pub fn init(config: &ObservabilityConfig, verbose: u8) {
    let level = match verbose {
        0 => config.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
