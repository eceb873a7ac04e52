use crate::batch::{FailureRecord, ProcessedFile};
use crate::error::UrlPackError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedEntry {
    /// Entry name inside the archive
    pub filename: String,
    pub original_url: String,
    /// Content type declared by the server
    pub content_type: String,
    pub size: u64,
    /// Hex SHA-256 of the archived bytes
    pub sha256: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedEntry {
    pub url: String,
    pub filename: String,
    pub reason: String,
}

/// Summary of a batch run, written next to the archive on request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub requested: usize,
    pub processed_count: usize,
    pub failed_count: usize,
    pub processed: Vec<ProcessedEntry>,
    pub failures: Vec<FailedEntry>,
}

impl BatchReport {
    pub fn new(requested: usize, processed: &[ProcessedFile], failures: &[FailureRecord]) -> Self {
        let processed: Vec<_> = processed
            .iter()
            .map(|file| ProcessedEntry {
                filename: file.filename.clone(),
                original_url: file.original_url.to_string(),
                content_type: file.content_type.clone(),
                size: file.size,
                sha256: hex::encode(Sha256::digest(&file.bytes)),
                timestamp: file.timestamp,
            })
            .collect();
        let failures: Vec<_> = failures
            .iter()
            .map(|failure| FailedEntry {
                url: failure.item.url.to_string(),
                filename: failure.item.filename.clone(),
                reason: failure.reason.clone(),
            })
            .collect();

        Self {
            requested,
            processed_count: processed.len(),
            failed_count: failures.len(),
            processed,
            failures,
        }
    }

    pub async fn save_to_file(&self, path: &Path) -> Result<(), UrlPackError> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content)
            .await
            .map_err(|e| UrlPackError::ReportWrite {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }
}
