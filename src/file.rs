//! In-memory file handles and derived cache keys
//!
//! A [`FileHandle`] is the native analogue of a file picked in a browser:
//! a name, the file bytes, and a last-modified timestamp. Handles are cheap
//! to clone; the byte payload is shared, not copied.

use crate::error::{Result, UploaderError};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::path::Path;

/// An in-memory reference to selected file content plus metadata
#[derive(Debug, Clone)]
pub struct FileHandle {
    name: String,
    data: Bytes,
    last_modified: DateTime<Utc>,
}

impl FileHandle {
    /// Create a file handle from raw bytes
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>, last_modified: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            last_modified,
        }
    }

    /// Load a file handle from the filesystem, taking the OS modification time
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                UploaderError::invalid_parameter("path", "path has no valid file name")
            })?
            .to_string();

        let metadata = std::fs::metadata(path)?;
        let last_modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        let data = Bytes::from(std::fs::read(path)?);

        Ok(Self {
            name,
            data,
            last_modified,
        })
    }

    /// The file name, without any directory component
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file content
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// The file size in bytes
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// The last-modified timestamp
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// The lowercase file extension, if any
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    /// Derive the cache key from name, size, and last-modified time.
    ///
    /// Deterministic: reselecting an identical file yields the same key, so
    /// the new selection overwrites the old cache entry. Not globally unique,
    /// but sufficient for session-scoped lookup.
    pub fn key(&self) -> String {
        format!(
            "{}-{}-{}",
            self.name,
            self.size(),
            self.last_modified.timestamp_millis()
        )
    }
}
