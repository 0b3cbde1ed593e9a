//! Logging system initialization

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

use crate::config::LoggingConfig;

const DEFAULT_LOG_FILE_NAME: &str = "shortener.log";

/// Destination chosen from `logging.file` / `logging.enable_rotation`
#[derive(Debug, PartialEq, Eq)]
enum LogTarget<'a> {
    Stdout,
    Rolling { dir: &'a Path, prefix: &'a str },
    File(&'a str),
}

fn log_target(config: &LoggingConfig) -> LogTarget<'_> {
    match config.file.as_deref() {
        Some(file) if !file.is_empty() && config.enable_rotation => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let prefix = path
                .file_name()
                .and_then(|f| f.to_str())
                .unwrap_or(DEFAULT_LOG_FILE_NAME)
                .trim_end_matches(".log");
            LogTarget::Rolling { dir, prefix }
        }
        Some(file) if !file.is_empty() => LogTarget::File(file),
        _ => LogTarget::Stdout,
    }
}

/// Initialize logging system based on configuration
///
/// Must be called once, after the configuration is loaded. The returned
/// guard has to stay alive for the whole program so buffered lines are
/// flushed on exit.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let target = log_target(config);
    let to_console = target == LogTarget::Stdout;

    let writer: Box<dyn std::io::Write + Send + Sync> = match target {
        LogTarget::Stdout => Box::new(std::io::stdout()),
        LogTarget::Rolling { dir, prefix } => Box::new(
            rolling::Builder::new()
                .rotation(rolling::Rotation::DAILY)
                .filename_prefix(prefix)
                .filename_suffix("log")
                .max_log_files(config.max_backups.max(1) as usize)
                .build(dir)
                .context("Failed to create rolling log appender")?,
        ),
        LogTarget::File(file) => Box::new(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .with_context(|| format!("Failed to open log file {}", file))?,
        ),
    };

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .with_context(|| format!("Invalid log level filter: {}", config.level))?;

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(to_console);

    let installed = if config.format == "json" {
        subscriber_builder.json().try_init()
    } else {
        subscriber_builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_file(file: Option<&str>, enable_rotation: bool) -> LoggingConfig {
        LoggingConfig {
            file: file.map(str::to_string),
            enable_rotation,
            ..Default::default()
        }
    }

    #[test]
    fn test_log_target_stdout() {
        assert_eq!(log_target(&config_with_file(None, true)), LogTarget::Stdout);
        assert_eq!(log_target(&config_with_file(Some(""), true)), LogTarget::Stdout);
    }

    #[test]
    fn test_log_target_rolling() {
        let config = config_with_file(Some("logs/app.log"), true);
        assert_eq!(
            log_target(&config),
            LogTarget::Rolling {
                dir: Path::new("logs"),
                prefix: "app"
            }
        );

        let config = config_with_file(Some("app.log"), true);
        assert_eq!(
            log_target(&config),
            LogTarget::Rolling {
                dir: Path::new("."),
                prefix: "app"
            }
        );
    }

    #[test]
    fn test_log_target_plain_file() {
        let config = config_with_file(Some("app.log"), false);
        assert_eq!(log_target(&config), LogTarget::File("app.log"));
    }
}
