use std::io::{Cursor, Write};

use anyhow::Context as _;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::foundation::error::{CarouselError, CarouselResult};

/// In-memory zip archive of exported images.
///
/// Entry names must be unique; a repeated name is rejected instead of producing an archive with
/// shadowed entries.
pub struct ZipBundle {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    names: Vec<String>,
}

impl Default for ZipBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl ZipBundle {
    /// Empty archive.
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            names: Vec::new(),
        }
    }

    /// Add one deflated entry.
    pub fn add(&mut self, name: &str, bytes: &[u8]) -> CarouselResult<()> {
        if self.names.iter().any(|n| n == name) {
            return Err(CarouselError::export(format!(
                "duplicate archive entry '{name}'"
            )));
        }
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.writer
            .start_file(name, options)
            .with_context(|| format!("failed to start archive entry '{name}'"))?;
        self.writer
            .write_all(bytes)
            .with_context(|| format!("failed to write archive entry '{name}'"))?;
        self.names.push(name.to_owned());
        Ok(())
    }

    /// Entry names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Finish the central directory and return the archive bytes.
    pub fn finish(self) -> CarouselResult<Vec<u8>> {
        let cursor = self.writer.finish().context("failed to finish archive")?;
        Ok(cursor.into_inner())
    }
}
