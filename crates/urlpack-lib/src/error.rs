use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UrlPackError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Input error: {0}")]
    Parse(#[from] crate::input::ParseError),

    #[error("Failed to read input from {path}: {reason}")]
    InputRead { path: PathBuf, reason: String },

    #[error("Failed to download any files. Error for first file: {reason}")]
    BatchFailed { reason: String },

    #[error("Archive error: {0}")]
    Archive(#[from] crate::archive::ArchiveError),

    #[error("Failed to write archive to {path}: {reason}")]
    ArchiveWrite { path: PathBuf, reason: String },

    #[error("Failed to write report to {path}: {reason}")]
    ReportWrite { path: PathBuf, reason: String },

    #[error("Invalid access path {name}: {reason}")]
    AccessPath { name: String, reason: String },

    #[error("Invalid CLI arguments: {details}")]
    CliArgumentValidation { details: String },

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] eyre::Report),
}
