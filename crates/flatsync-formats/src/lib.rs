//! Line-oriented record formats
//!
//! Every format here is a [`DelimitedFormat`]: one record per line, fields
//! split on a separator, `#` comments and blank lines carried through
//! unchanged.

pub mod delimited;

pub use delimited::{BLANK_KIND, COMMENT_KIND, DelimitedFormat, LINE_FIELD, Separator};

/// Names of the built-in formats.
pub const KINDS: &[&str] = &["passwd", "group", "hosts"];

/// Built-in format for a record kind.
pub fn by_kind(kind: &str) -> Option<DelimitedFormat> {
    match kind {
        "passwd" => Some(DelimitedFormat::passwd()),
        "group" => Some(DelimitedFormat::group()),
        "hosts" => Some(DelimitedFormat::hosts()),
        _ => None,
    }
}
