//! Structured logging for parsing runs.
//!
//! Events are written to stderr by default, leaving stdout to callers that
//! stream wire messages.

use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::ParserConfig;

/// Crate targets whose events pass the filter.
const TARGETS: [&str; 2] = ["specmark", "specmark_patterns"];

fn parser_filter(level: LevelFilter) -> EnvFilter {
    let directives = TARGETS.map(|target| format!("{target}={level}")).join(",");
    EnvFilter::builder()
        .with_default_directive(LevelFilter::OFF.into())
        .parse_lossy(directives)
}

/// Build a subscriber that writes parser events to `writer`.
///
/// Thread ids are recorded because batches parse each file on its own
/// thread.
#[must_use]
pub fn parser_subscriber<W>(
    config: &ParserConfig,
    writer: W,
) -> impl Subscriber + Send + Sync + use<W>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(parser_filter(config.log_level.level_filter()))
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_ids(true)
        .finish()
}

/// Install the stderr parser subscriber as the process-wide default.
///
/// # Errors
/// Fails when another subscriber has already been installed.
pub fn try_init_logging(config: &ParserConfig) -> Result<(), SetGlobalDefaultError> {
    tracing::subscriber::set_global_default(parser_subscriber(config, std::io::stderr))
}

/// Install the stderr parser subscriber unless one is already installed.
pub fn init_logging(config: &ParserConfig) {
    if try_init_logging(config).is_err() {
        tracing::debug!("keeping the subscriber that is already installed");
    }
}
