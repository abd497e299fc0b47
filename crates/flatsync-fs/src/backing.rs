//! Backing files: the physical files records are synchronized against.
//!
//! The engine only ever reads a whole file and replaces a whole file, so
//! the contract is two methods. [`FileType`] picks the implementation the
//! target registry opens for a newly referenced path.

use crate::{NormalizedPath, Result, io};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One physical file holding line-oriented records.
///
/// # Invariants
///
/// - `read` returns an empty string when the file does not exist yet
/// - `write` replaces the whole content; readers never observe a partial write
pub trait BackingFile: fmt::Debug + Send {
    /// Path this file was opened for.
    fn path(&self) -> &NormalizedPath;

    /// Read the entire content.
    fn read(&self) -> Result<String>;

    /// Replace the entire content.
    fn write(&mut self, text: &str) -> Result<()>;
}

/// Which [`BackingFile`] implementation to open for new targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Regular file on disk, replaced atomically.
    #[default]
    Flat,
    /// In-memory buffer; nothing touches the disk.
    Ram,
}

impl FileType {
    /// Open a backing file of this type for `path`.
    pub fn open(self, path: &NormalizedPath) -> Box<dyn BackingFile> {
        match self {
            Self::Flat => Box::new(FlatFile::new(path.clone())),
            Self::Ram => Box::new(RamFile::new(path.clone())),
        }
    }
}

impl std::str::FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "flat" => Ok(Self::Flat),
            "ram" => Ok(Self::Ram),
            other => Err(format!("invalid filetype: {other}")),
        }
    }
}

/// A regular file on disk.
#[derive(Debug, Clone)]
pub struct FlatFile {
    path: NormalizedPath,
}

impl FlatFile {
    pub fn new(path: NormalizedPath) -> Self {
        Self { path }
    }
}

impl BackingFile for FlatFile {
    fn path(&self) -> &NormalizedPath {
        &self.path
    }

    fn read(&self) -> Result<String> {
        io::read_text_or_empty(&self.path)
    }

    fn write(&mut self, text: &str) -> Result<()> {
        tracing::debug!(path = %self.path, bytes = text.len(), "Replacing flat file");
        io::write_text(&self.path, text)
    }
}

/// An in-memory file.
///
/// Clones share the same buffer, so a test can keep one handle and hand
/// another to the engine.
///
/// ```rust
/// use flatsync_fs::{BackingFile, NormalizedPath, RamFile};
///
/// let file = RamFile::with_content(NormalizedPath::new("/etc/passwd"), "root:x:0:0::/root:/bin/sh\n");
/// let mut handle = file.clone();
/// handle.write("").unwrap();
/// assert_eq!(file.content(), "");
/// ```
#[derive(Debug, Clone)]
pub struct RamFile {
    path: NormalizedPath,
    content: Arc<Mutex<String>>,
}

impl RamFile {
    pub fn new(path: NormalizedPath) -> Self {
        Self::with_content(path, "")
    }

    pub fn with_content(path: NormalizedPath, content: impl Into<String>) -> Self {
        Self {
            path,
            content: Arc::new(Mutex::new(content.into())),
        }
    }

    /// Current content of the shared buffer.
    pub fn content(&self) -> String {
        self.content.lock().clone()
    }
}

impl BackingFile for RamFile {
    fn path(&self) -> &NormalizedPath {
        &self.path
    }

    fn read(&self) -> Result<String> {
        Ok(self.content())
    }

    fn write(&mut self, text: &str) -> Result<()> {
        *self.content.lock() = text.to_string();
        Ok(())
    }
}
