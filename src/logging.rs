use crate::config::Config;
use simplelog::WriteLogger;
use std::path::Path;
use thiserror::Error;

/// Start logging to the file named in the configuration.  The terminal is
/// taken over by the interface, so nothing is ever logged to stderr.
pub(crate) fn init(config: &Config) -> Result<(), LoggingError> {
    let path = config.log_file().ok_or(LoggingError::NoPath)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent).map_err(LoggingError::Open)?;
    }
    let file = open_log(&path)?;
    WriteLogger::init(config.logging.level, log_config(), file)?;
    log::info!(
        "{} {} starting; logging to {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        path.display()
    );
    Ok(())
}

fn open_log(path: &Path) -> Result<fs_err::File, LoggingError> {
    fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(LoggingError::Open)
}

fn log_config() -> simplelog::Config {
    simplelog::ConfigBuilder::new()
        .set_target_level(simplelog::LevelFilter::Error)
        .set_thread_level(simplelog::LevelFilter::Off)
        .build()
}

#[derive(Debug, Error)]
pub(crate) enum LoggingError {
    #[error("failed to determine path to local data directory for log file")]
    NoPath,
    #[error("failed to open log file")]
    Open(#[source] std::io::Error),
    #[error("failed to install logger")]
    Install(#[from] log::SetLoggerError),
}
