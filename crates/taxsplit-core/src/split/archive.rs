//! ZIP packaging of output pages.

use std::io::{Cursor, Write};

use tracing::trace;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::error::ArchiveError;

/// One file destined for the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEntry {
    /// Entry name inside the archive.
    pub filename: String,
    /// Single-page PDF content.
    pub content: Vec<u8>,
}

/// Builds a DEFLATE-compressed ZIP in memory.
pub struct ArchiveWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    entries: usize,
}

impl ArchiveWriter {
    /// Start an empty archive.
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            entries: 0,
        }
    }

    /// Append one entry.
    pub fn add(&mut self, entry: &OutputEntry) -> Result<(), ArchiveError> {
        let options =
            FileOptions::<'_, ()>::default().compression_method(CompressionMethod::Deflated);

        self.zip.start_file(entry.filename.as_str(), options)?;
        self.zip
            .write_all(&entry.content)
            .map_err(|source| ArchiveError::Entry {
                name: entry.filename.clone(),
                source,
            })?;

        self.entries += 1;
        trace!("Added {} ({} bytes) to archive", entry.filename, entry.content.len());
        Ok(())
    }

    /// Number of entries written so far.
    pub fn len(&self) -> usize {
        self.entries
    }

    /// True when no entry has been written.
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Write the central directory and return the archive bytes.
    pub fn finish(self) -> Result<Vec<u8>, ArchiveError> {
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for ArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}
