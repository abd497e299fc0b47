//! Records: one parsed or pending line of a backing file

use crate::target::Target;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Attribute values of a record, keyed by attribute name.
pub type Fields = BTreeMap<String, String>;

/// Name of the attribute that carries [`Ensure`].
pub const ENSURE: &str = "ensure";

/// Whether a record should exist in its backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    Present,
    Absent,
}

impl Ensure {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

impl fmt::Display for Ensure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ensure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(Error::InvalidEnsure {
                value: other.to_string(),
            }),
        }
    }
}

/// One line-item of configuration state.
///
/// Records of the store's own kind carry a name; comment and blank lines
/// are records of another kind with an empty name, kept so they can be
/// written back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: String,
    pub record_kind: String,
    pub fields: Fields,
    pub ensure: Option<Ensure>,
    /// Set once the record was parsed from disk or included in a flush
    pub on_disk: bool,
    pub target: Option<Target>,
}

impl Record {
    pub fn new(record_kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_kind: record_kind.into(),
            fields: Fields::new(),
            ensure: None,
            on_disk: false,
            target: None,
        }
    }

    /// Placeholder bound to an instance that has no on-disk record yet.
    pub(crate) fn unbound(record_kind: &str) -> Self {
        Self {
            ensure: Some(Ensure::Absent),
            ..Self::new(record_kind, "")
        }
    }

    pub fn with_field(mut self, attr: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(attr.into(), value.into());
        self
    }

    pub fn field(&self, attr: &str) -> Option<&str> {
        self.fields.get(attr).map(String::as_str)
    }

    pub fn is_absent(&self) -> bool {
        self.ensure == Some(Ensure::Absent)
    }

    /// Copy without the engine's bookkeeping fields.
    pub fn clean(&self) -> CleanRecord {
        CleanRecord {
            name: self.name.clone(),
            fields: self.fields.clone(),
            ensure: self.ensure,
            target: self.target.as_ref().map(|t| t.path().to_string()),
        }
    }
}

/// A record as reported to callers of `list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub name: String,
    pub fields: Fields,
    pub ensure: Option<Ensure>,
    pub target: Option<String>,
}
