//! The per-kind parse and serialize contract

use crate::instance::InstanceRegistry;
use crate::record::Record;
use crate::Result;

/// Converts between backing-file text and records of one kind.
///
/// `parse` returns records with `name`, `record_kind` and `fields` set; the
/// engine fills in target, ensure and on-disk state. Non-data lines should
/// come back as records of another kind so `to_text` can reproduce them.
pub trait RecordFormat: Send + Sync {
    /// Record kind produced for data lines.
    fn kind(&self) -> &str;

    /// Parse the full content of one backing file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Parse`] for malformed content.
    fn parse(&self, text: &str) -> Result<Vec<Record>>;

    /// Render records back to file content, inverse of `parse`.
    fn to_text(&self, records: &[&Record]) -> Result<String>;

    /// Whether `attr` is a field this format stores.
    fn valid_attr(&self, attr: &str) -> bool;

    /// Attribute that carries the record name rather than a field value.
    fn name_attr(&self) -> &str {
        "name"
    }

    /// Name of the instance an unmatched record belongs to, if any.
    ///
    /// Called only for records no instance claimed by name. Errors are
    /// treated as "no match".
    fn match_record(&self, _record: &Record, _instances: &InstanceRegistry) -> Result<Option<String>> {
        Ok(None)
    }
}
