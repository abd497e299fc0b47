//! Per-kind configuration
//!
//! One [`KindConfig`] describes one record kind: which format parses it, the
//! file it lives in by default, and how its files are opened.

use crate::Result;
use flatsync_fs::{ConfigStore, FileType, NormalizedPath};
use serde::{Deserialize, Serialize};

fn default_header() -> bool {
    true
}

/// Configuration for one record kind.
///
/// ```
/// use flatsync_core::KindConfig;
///
/// let config: KindConfig = toml::from_str(r#"
/// kind = "passwd"
/// default_target = "/etc/passwd"
/// "#).unwrap();
///
/// assert_eq!(config.kind, "passwd");
/// assert!(config.header);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindConfig {
    /// Record kind, also the name of the format that parses it
    pub kind: String,

    /// File used when an instance does not name its own target
    #[serde(default)]
    pub default_target: Option<NormalizedPath>,

    /// Backing file implementation for newly referenced targets
    #[serde(default)]
    pub filetype: FileType,

    /// Prepend the generated header on every write
    #[serde(default = "default_header")]
    pub header: bool,
}

impl KindConfig {
    pub fn new(kind: impl Into<String>, default_target: impl Into<NormalizedPath>) -> Self {
        Self {
            kind: kind.into(),
            default_target: Some(default_target.into()),
            filetype: FileType::default(),
            header: default_header(),
        }
    }

    /// Load a kind configuration from a TOML, JSON or YAML file.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    pub fn with_filetype(mut self, filetype: FileType) -> Self {
        self.filetype = filetype;
        self
    }

    pub fn without_header(mut self) -> Self {
        self.header = false;
        self
    }
}
