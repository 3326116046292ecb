//! Tracing subscriber setup
//!
//! Events always go to stdout in the configured format. With a log directory
//! configured they are also written to daily-rotated files: `app.*.log` with
//! every enabled event and `error.*.log` with errors only.

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use sv_shared::{LogFormat, LoggingConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Install the global subscriber described by `config`
///
/// `RUST_LOG`, when set, replaces the configured level. The returned guards
/// flush the file writers and must live until shutdown.
pub fn init(config: &LoggingConfig) -> anyhow::Result<Vec<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.filter_directive()))
        .map_err(|e| anyhow::anyhow!("invalid log level '{}': {}", config.level, e))?;

    let mut layers = vec![stdout_layer(config)];
    let mut guards = Vec::new();

    if let Some(directory) = &config.directory {
        let (writer, guard) =
            tracing_appender::non_blocking(rolling_file(directory, "app", config.max_files)?);
        guards.push(guard);
        layers.push(file_layer(config, writer));

        let (writer, guard) =
            tracing_appender::non_blocking(rolling_file(directory, "error", config.max_files)?);
        guards.push(guard);
        layers.push(
            file_layer(config, writer)
                .with_filter(LevelFilter::ERROR)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;

    if let Some(directory) = &config.directory {
        tracing::info!(directory = %directory, max_files = config.max_files, "Writing log files");
    }
    Ok(guards)
}

fn stdout_layer(config: &LoggingConfig) -> BoxedLayer {
    let layer = fmt::layer()
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_target(true);

    match config.format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

/// File output: no colours, always with source locations
fn file_layer<W>(config: &LoggingConfig, writer: W) -> BoxedLayer
where
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_target(true);

    match config.format {
        LogFormat::Json => layer.json().boxed(),
        _ => layer.boxed(),
    }
}

/// Daily-rotated `<prefix>.<date>.log` keeping at most `max_files` files
fn rolling_file(
    directory: &str,
    prefix: &str,
    max_files: usize,
) -> anyhow::Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .max_log_files(max_files)
        .build(directory)
        .with_context(|| format!("failed to open log directory {}", directory))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_rolling_file_writes_into_directory() {
        let directory = std::env::temp_dir().join(format!("sv-logs-{}", uuid::Uuid::new_v4()));
        let directory = directory.to_str().unwrap().to_string();

        let mut appender = rolling_file(&directory, "error", 5).unwrap();
        appender.write_all(b"boom\n").unwrap();
        appender.flush().unwrap();

        let names: Vec<String> = std::fs::read_dir(&directory)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("error."));
        assert!(names[0].ends_with(".log"));

        std::fs::remove_dir_all(&directory).unwrap();
    }
}
