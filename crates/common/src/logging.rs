//! Logging and tracing initialization.
//!
//! Logs go to stderr so that commands emitting frame data on stdout stay
//! machine-readable.

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber with the given configuration.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish()).ok();
    } else {
        let subscriber = builder
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}

/// Initialize logging for a command-line run. `verbose` raises the level
/// to `debug` regardless of the configured filter.
pub fn init_cli_logging(config: &LoggingConfig, verbose: bool) {
    if verbose {
        let verbose_config = LoggingConfig {
            level: "debug".to_string(),
            ..config.clone()
        };
        init_logging(&verbose_config);
    } else {
        init_logging(config);
    }
}
