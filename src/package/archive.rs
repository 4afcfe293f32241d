//! Per-record zip archive carried after the thumbnail PNG.

use std::{
    io::{Cursor, Write as _},
    path::Path,
};

use anyhow::Context;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::foundation::error::{VrcPngError, VrcPngResult};

/// Archive entry holding the rendered thumbnail.
pub const THUMBNAIL_ENTRY_NAME: &str = "image.png";

/// In-memory zip archive built entry by entry.
pub struct RecordArchive {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    names: Vec<String>,
}

impl std::fmt::Debug for RecordArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordArchive")
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

impl Default for RecordArchive {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordArchive {
    /// Empty archive.
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            names: Vec::new(),
        }
    }

    /// Entry names added so far, in order.
    pub fn entry_names(&self) -> &[String] {
        &self.names
    }

    /// Add `bytes` under `name`.
    pub fn add_bytes(&mut self, name: &str, bytes: &[u8]) -> VrcPngResult<()> {
        self.start_entry(name, bytes.len() as u64)?;
        self.writer
            .write_all(bytes)
            .with_context(|| format!("write archive entry '{name}'"))?;
        Ok(())
    }

    /// Copy the file at `path` into the archive under `name`.
    pub fn add_file(&mut self, name: &str, path: &Path) -> VrcPngResult<()> {
        let mut src = std::fs::File::open(path)
            .with_context(|| format!("open '{}' for archiving", path.display()))?;
        let len = src
            .metadata()
            .with_context(|| format!("stat '{}'", path.display()))?
            .len();
        self.start_entry(name, len)?;
        let n = std::io::copy(&mut src, &mut self.writer)
            .with_context(|| format!("archive '{}'", path.display()))?;
        tracing::debug!(entry = name, bytes = n, "archived file");
        Ok(())
    }

    /// Finish the central directory and return the archive bytes.
    pub fn finish(self) -> VrcPngResult<Vec<u8>> {
        let cursor = self.writer.finish().context("finish zip archive")?;
        Ok(cursor.into_inner())
    }

    fn start_entry(&mut self, name: &str, len: u64) -> VrcPngResult<()> {
        if name.is_empty() || self.names.iter().any(|n| n == name) {
            return Err(VrcPngError::validation(format!(
                "archive entry name '{name}' is empty or repeated"
            )));
        }
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .large_file(len >= u64::from(u32::MAX));
        self.writer
            .start_file(name, options)
            .with_context(|| format!("start archive entry '{name}'"))?;
        self.names.push(name.to_owned());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/package/archive.rs"]
mod tests;
