//! One encoded object per file
//!
//! A payload file holds exactly one frame: the six-byte header followed by
//! the payload. Writes are atomic.

use crate::atomic::write_atomic;
use crate::format::payload::{frame, unframe, PayloadHeader};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use verscodec_core::Result;

/// A framed payload stored at a fixed path
#[derive(Debug, Clone)]
pub struct PayloadFile {
    path: PathBuf,
}

impl PayloadFile {
    /// Payload file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PayloadFile { path: path.into() }
    }

    /// File path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if the file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Frame `payload` under `schema_version` and write it atomically
    pub fn write(&self, schema_version: u16, payload: &[u8]) -> Result<()> {
        let framed = frame(schema_version, payload)?;
        write_atomic(&self.path, &framed)?;
        debug!(
            path = %self.path.display(),
            schema_version,
            payload_len = payload.len(),
            "Wrote payload file"
        );
        Ok(())
    }

    /// Read the whole frame, checking that the header and payload are intact
    ///
    /// A missing file is an I/O error.
    pub fn read(&self) -> Result<Vec<u8>> {
        let bytes = fs::read(&self.path)?;
        let (header, _) = unframe(&bytes)?;
        debug!(
            path = %self.path.display(),
            schema_version = header.schema_version,
            payload_len = header.payload_len,
            "Read payload file"
        );
        Ok(bytes)
    }

    /// Read only the header
    pub fn read_header(&self) -> Result<PayloadHeader> {
        let bytes = fs::read(&self.path)?;
        PayloadHeader::from_bytes(&bytes)
    }
}
