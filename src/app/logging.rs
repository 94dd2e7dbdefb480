use std::path::{Path, PathBuf};

use chrono::Local;
use colored::Colorize;
use log::{Level, LevelFilter};
use thiserror::Error;
use tokio::fs;

const LOG_DIR: &str = "log";
const LOG_FILE: &str = "output.ans";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S.%3f";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {path}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open log file {path}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Installs the process logger: colored glyphs on stdout, plain glyphs in
/// `log/output.ans`.
pub async fn init_logging(level_filter: LevelFilter) -> Result<(), LoggingError> {
    let log_dir = PathBuf::from(LOG_DIR);
    fs::create_dir_all(&log_dir)
        .await
        .map_err(|source| LoggingError::CreateDirectory {
            path: log_dir.clone(),
            source,
        })?;

    let log_path = log_dir.join(LOG_FILE);
    let log_file = open_log_file(&log_path)?;

    let console = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [ {} ] > {}",
                Local::now().format(TIMESTAMP_FORMAT),
                colored_level(record.level()),
                message
            ));
        })
        .chain(std::io::stdout());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [ {} ] > {}",
                Local::now().format(TIMESTAMP_FORMAT),
                plain_level(record.level()),
                message
            ));
        })
        .chain(log_file);

    if let Err(_error) = fern::Dispatch::new()
        .level(level_filter)
        .chain(console)
        .chain(file)
        .apply()
    {
        // Logger may already be initialized in process lifecycle.
        log::set_max_level(level_filter);
    }

    Ok(())
}

pub fn resolve_level_filter(value: Option<&str>) -> LevelFilter {
    match value.unwrap_or("info").trim().to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

fn open_log_file(path: &Path) -> Result<std::fs::File, LoggingError> {
    fern::log_file(path).map_err(|source| LoggingError::OpenFile {
        path: path.to_path_buf(),
        source,
    })
}

fn colored_level(level: Level) -> String {
    match level {
        Level::Info => "+".green().to_string(),
        Level::Error => "-".red().to_string(),
        Level::Warn => "!".yellow().to_string(),
        Level::Debug => "*".blue().to_string(),
        Level::Trace => "~".purple().to_string(),
    }
}

const fn plain_level(level: Level) -> &'static str {
    match level {
        Level::Info => "+",
        Level::Error => "-",
        Level::Warn => "!",
        Level::Debug => "*",
        Level::Trace => "~",
    }
}
