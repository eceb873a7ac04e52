use crate::input::RequestedItem;
use crate::report::BatchReport;
use chrono::{DateTime, Utc};
use url::Url;

/// One fetched, normalized and named file, ready to become an archive entry.
#[derive(Clone, Debug)]
pub struct ProcessedFile {
    pub bytes: Vec<u8>,
    /// Unique within the batch.
    pub filename: String,
    pub original_url: Url,
    /// Content type declared by the server, before any conversion.
    pub content_type: String,
    pub size: u64,
    pub timestamp: DateTime<Utc>,
}

impl ProcessedFile {
    pub fn new(bytes: Vec<u8>, filename: String, original_url: Url, content_type: String) -> Self {
        Self {
            size: bytes.len() as u64,
            bytes,
            filename,
            original_url,
            content_type,
            timestamp: Utc::now(),
        }
    }
}

/// An item whose fetch failed on every route and every retry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureRecord {
    pub item: RequestedItem,
    pub reason: String,
}

#[derive(Debug)]
pub struct BatchResult {
    /// ZIP archive bytes.
    pub archive: Vec<u8>,
    pub report: BatchReport,
}

impl BatchResult {
    pub fn processed_count(&self) -> usize {
        self.report.processed_count
    }

    pub fn failed_count(&self) -> usize {
        self.report.failed_count
    }
}
