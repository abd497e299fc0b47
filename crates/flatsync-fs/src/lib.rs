//! Filesystem layer for flatsync
//!
//! Provides normalized paths, atomic writes, and the [`BackingFile`]
//! abstraction the synchronization engine reads and writes through.

pub mod backing;
pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use backing::{BackingFile, FileType, FlatFile, RamFile};
pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
