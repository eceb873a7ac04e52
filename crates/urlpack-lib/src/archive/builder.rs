use crate::batch::ProcessedFile;
use std::io::{Cursor, Write};
use thiserror::Error;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("No files to archive. All downloads may have failed.")]
    EmptyInput,

    #[error("Failed to add {filename} to archive: {source}")]
    Entry {
        filename: String,
        #[source]
        source: ZipError,
    },

    #[error("Failed to write {filename} to archive: {source}")]
    Write {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to finalize archive: {0}")]
    Finish(#[source] ZipError),
}

/// Packs every file into an in-memory ZIP, one entry per file, named by its final filename.
///
/// Takes ownership of the buffers; each is released as soon as its entry is written.
pub fn build_archive(files: Vec<ProcessedFile>) -> Result<Vec<u8>, ArchiveError> {
    if files.is_empty() {
        return Err(ArchiveError::EmptyInput);
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for file in files {
        // Images are already compressed.
        let method = if file.content_type.to_ascii_lowercase().starts_with("image/") {
            CompressionMethod::Stored
        } else {
            CompressionMethod::Deflated
        };
        let options = SimpleFileOptions::default().compression_method(method);

        writer
            .start_file(file.filename.as_str(), options)
            .map_err(|source| ArchiveError::Entry {
                filename: file.filename.clone(),
                source,
            })?;
        writer
            .write_all(&file.bytes)
            .map_err(|source| ArchiveError::Write {
                filename: file.filename.clone(),
                source,
            })?;
        tracing::debug!(filename = %file.filename, size = file.size, "Added archive entry");
    }

    let cursor = writer.finish().map_err(ArchiveError::Finish)?;
    Ok(cursor.into_inner())
}
