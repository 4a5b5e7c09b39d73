//! Chunk discovery and decompression for restore operations.
//!
//! Archives are processed in filename order, which matches numeric chunk
//! order thanks to the fixed-width zero padding. Each archive is
//! extracted in place; the extracted JSON is loaded as one document
//! array and deleted immediately after, leaving the archive itself
//! untouched.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};
use zip::ZipArchive;

use crate::error::{RestoreError, Result};

/// Reads chunk archives back as document batches, in sequence order.
pub struct ChunkReader {
    data_dir: PathBuf,
    archives: Vec<PathBuf>,
    next: usize,
}

impl ChunkReader {
    /// Open a dump directory for reading.
    ///
    /// Fails with a missing-path error when the dump directory or its
    /// `data` subdirectory does not exist, and with a no-data error when
    /// the data directory holds zero chunk archives.
    pub fn open(dump_path: &Path) -> Result<Self> {
        if !dump_path.exists() {
            return Err(RestoreError::MissingPath(dump_path.display().to_string()).into());
        }
        let data_dir = dump_path.join("data");
        if !data_dir.exists() {
            return Err(RestoreError::MissingPath(data_dir.display().to_string()).into());
        }

        let mut archives: Vec<PathBuf> = fs::read_dir(&data_dir)?
            .collect::<io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().is_some_and(|ext| ext == "zip")
            })
            .collect();
        archives.sort();

        if archives.is_empty() {
            return Err(RestoreError::NoData(data_dir.display().to_string()).into());
        }

        info!("Found {} chunk archives in {}", archives.len(), data_dir.display());

        Ok(Self {
            data_dir,
            archives,
            next: 0,
        })
    }

    /// Number of archives discovered.
    pub fn chunk_count(&self) -> usize {
        self.archives.len()
    }

    /// Read the next chunk, returning its archive path and document
    /// batch, or `None` once every archive has been consumed.
    pub fn next_chunk(&mut self) -> Result<Option<(PathBuf, Vec<Value>)>> {
        let Some(path) = self.archives.get(self.next).cloned() else {
            return Ok(None);
        };
        self.next += 1;

        let documents = self.read_archive(&path)?;
        debug!("Read {} documents from {}", documents.len(), path.display());
        Ok(Some((path, documents)))
    }

    /// Extract one archive in place, load its JSON files (sorted) as
    /// document arrays and delete each extracted file after loading.
    fn read_archive(&self, path: &Path) -> Result<Vec<Value>> {
        let mut archive = ZipArchive::new(File::open(path)?)?;

        let mut extracted: Vec<PathBuf> = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            // Reject entries that would escape the data directory.
            let Some(name) = entry.enclosed_name().and_then(|p| p.file_name().map(PathBuf::from))
            else {
                return Err(RestoreError::MalformedChunk {
                    archive: path.display().to_string(),
                    reason: format!("unsafe entry name: {}", entry.name()),
                }
                .into());
            };
            if name.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            let target = self.data_dir.join(name);
            let mut out = File::create(&target)?;
            io::copy(&mut entry, &mut out)?;
            extracted.push(target);
        }
        extracted.sort();

        let mut documents = Vec::new();
        for json_path in extracted {
            let batch: Vec<Value> =
                serde_json::from_reader(io::BufReader::new(File::open(&json_path)?)).map_err(
                    |e| RestoreError::MalformedChunk {
                        archive: path.display().to_string(),
                        reason: e.to_string(),
                    },
                )?;
            fs::remove_file(&json_path)?;
            documents.extend(batch);
        }

        Ok(documents)
    }
}
