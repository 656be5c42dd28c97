//! Tracing setup.
//!
//! `RUST_LOG` overrides the filter; the default is `info`. With a configured
//! directory a plain-text copy of every line also goes to a log file.

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

/// Install the global subscriber.
///
/// Hold the returned guard until exit so buffered file output is flushed.
/// A log directory that cannot be created is reported and skipped.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false);

    let mut dir_error = None;
    let (file_layer, guard) = match &config.directory {
        Some(dir) => match std::fs::create_dir_all(dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::never(dir, &config.file_name);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(writer);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                dir_error = Some((dir.clone(), e));
                (None, None)
            }
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .ok();

    if let Some((dir, e)) = dir_error {
        warn!(
            dir = %dir.display(),
            error = %e,
            "could not create log directory, logging to stdout only"
        );
    } else if let Some(dir) = &config.directory {
        info!(file = %dir.join(&config.file_name).display(), "logging to file");
    }
    guard
}
