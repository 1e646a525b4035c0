use std::path::Path;

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::EnvFilter;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

/// Sends logs to the configured file through a background writer.
///
/// The returned guard flushes pending lines on drop; keep it alive for the
/// lifetime of the program.
pub fn init(config: &AppConfig) -> Result<WorkerGuard> {
    let (dir, file_name) = split_log_path(&config.log_file)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)
        .map_err(|err| AppError::Logging(err.to_string()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter(&config.level)?)
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))?;

    Ok(guard)
}

fn filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(format!("idcard_tui={level},registration={level}"))
        .map_err(|err| AppError::Logging(err.to_string()))
}

/// Directory and file name of the log file; a bare name lands in `.`.
fn split_log_path(log_file: &str) -> Result<(&Path, &str)> {
    let path = Path::new(log_file);
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| AppError::Logging(format!("log file {log_file:?} has no file name")))?;
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok((dir, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_nested_log_path() {
        let (dir, name) = split_log_path("config/idcard_tui.log").unwrap();
        assert_eq!(dir, Path::new("config"));
        assert_eq!(name, "idcard_tui.log");
    }

    #[test]
    fn bare_log_name_goes_to_current_dir() {
        let (dir, name) = split_log_path("tui.log").unwrap();
        assert_eq!(dir, Path::new("."));
        assert_eq!(name, "tui.log");
    }

    #[test]
    fn rejects_path_without_file_name() {
        assert!(split_log_path("logs/..").is_err());
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(filter("loud").is_err());
        assert!(filter("debug").is_ok());
    }
}
