use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unknown {quantity} unit: '{unit}'")]
    UnknownUnit { quantity: String, unit: String },

    #[error("Unknown source: '{0}'")]
    UnknownSource(String),

    #[error("Unknown staging encoding: '{0}'")]
    UnknownEncoding(String),

    #[error("Invalid civil timezone: '{0}'")]
    InvalidTimezone(String),

    #[error("Cannot write partition {path}: {source}")]
    Partition {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot access staging file {path}: {source}")]
    Staging {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}
