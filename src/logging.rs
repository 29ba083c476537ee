use std::io;
use tracing_appender::rolling;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Default stdout filter; `RUST_LOG` replaces it when set.
const STDOUT_FILTER: &str = "info,clustering=info,synthesis=info,config=warn";
const FILE_FILTER: &str = "debug";

/// Installs the global subscriber: a stdout layer for operators and a daily rolling
/// file layer under `logs/` with full debug detail.
///
/// Binaries that write data to stdout should use [`configure_stderr_logging`] instead.
pub fn configure_logging() {
    let stdout_log = fmt::layer()
        .with_writer(io::stdout)
        .with_filter(stdout_filter());

    let file_appender = rolling::daily("logs", "newsfuse.log");
    let file_log = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(EnvFilter::new(FILE_FILTER));

    tracing_subscriber::Registry::default()
        .with(stdout_log)
        .with(file_log)
        .init();
}

/// Same as [`configure_logging`] but the console layer writes to stderr.
pub fn configure_stderr_logging() {
    let stderr_log = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(stdout_filter());

    let file_appender = rolling::daily("logs", "newsfuse.log");
    let file_log = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(EnvFilter::new(FILE_FILTER));

    tracing_subscriber::Registry::default()
        .with(stderr_log)
        .with(file_log)
        .init();
}

fn stdout_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(STDOUT_FILTER))
}
