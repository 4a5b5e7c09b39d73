//! Chunked, compressed persistence of the exported document stream.
//!
//! Documents accumulate in a bounded in-memory buffer; each full buffer
//! is flushed as one compressed archive chunk. A chunk is visible on
//! disk only once fully serialized and compressed: the JSON temp file is
//! removed only after the archive is closed, so an interrupted dump
//! leaves complete chunks and nothing half-written.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::{CompressionMethod, ZipWriter, write::FileOptions};

use crate::error::Result;
use crate::utils::{chunk, fs};

use super::streaming::Document;

/// Default number of documents per chunk archive.
pub const DEFAULT_DOCS_PER_CHUNK: usize = 10_000;

/// Writes the document stream to disk as numbered archive chunks.
pub struct ChunkWriter {
    data_dir: PathBuf,
    docs_per_chunk: usize,
    buffer: Vec<Document>,
    chunks_written: u32,
    documents_written: u64,
}

impl ChunkWriter {
    /// Create a writer rooted at `dump_path`, creating the dump
    /// directory and its `data` subdirectory if absent.
    pub fn create(dump_path: &Path, docs_per_chunk: usize) -> Result<Self> {
        let data_dir = dump_path.join("data");
        fs::ensure_dir(&data_dir)?;

        debug!("Created chunk writer for {}", data_dir.display());

        Ok(Self {
            data_dir,
            docs_per_chunk,
            buffer: Vec::with_capacity(docs_per_chunk.min(DEFAULT_DOCS_PER_CHUNK)),
            chunks_written: 0,
            documents_written: 0,
        })
    }

    /// Buffer one document, flushing a chunk when the buffer is full.
    pub fn push(&mut self, document: Document) -> Result<()> {
        self.buffer.push(document);
        if self.buffer.len() >= self.docs_per_chunk {
            self.flush_chunk()?;
        }
        Ok(())
    }

    /// Flush any remaining partial chunk and return the totals as
    /// `(documents, chunks)`.
    pub fn finish(mut self) -> Result<(u64, u32)> {
        if !self.buffer.is_empty() {
            self.flush_chunk()?;
        }
        info!(
            "Dump data complete: {} documents in {} chunks",
            self.documents_written, self.chunks_written
        );
        Ok((self.documents_written, self.chunks_written))
    }

    /// Serialize the buffer as one JSON array, compress it into the next
    /// numbered archive, then delete the temp file. The archive is the
    /// only durable artifact.
    fn flush_chunk(&mut self) -> Result<()> {
        let seq = self.chunks_written + 1;
        let json_name = chunk::json_name(seq);
        let json_path = self.data_dir.join(&json_name);
        let archive_path = self.data_dir.join(chunk::archive_name(seq));

        let mut writer = BufWriter::new(File::create(&json_path)?);
        serde_json::to_writer(&mut writer, &self.buffer)?;
        writer.flush()?;

        let mut zip = ZipWriter::new(File::create(&archive_path)?);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(json_name.as_str(), options)?;
        let mut source = File::open(&json_path)?;
        io::copy(&mut source, &mut zip)?;
        zip.finish()?;

        std::fs::remove_file(&json_path)?;

        self.documents_written += self.buffer.len() as u64;
        self.chunks_written = seq;
        info!(
            "Stored chunk {}: {} documents",
            archive_path.display(),
            self.buffer.len()
        );
        self.buffer.clear();
        Ok(())
    }
}
