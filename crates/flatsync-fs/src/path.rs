//! Normalized path handling for target identity
//!
//! Two targets are the same file exactly when their normalized paths are
//! equal, so every path entering the engine goes through [`NormalizedPath`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A path normalized to forward slashes with redundant separators removed.
///
/// Ordering is lexicographic on the normalized string, which is the order
/// targets are flushed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Backslashes become forward slashes, `.` components and repeated
    /// separators are dropped. A leading `//` (network share) is kept.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy().replace('\\', "/");
        Self { inner: clean(&raw) }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        if self.inner.is_empty() {
            return Self::new(segment);
        }
        Self::new(format!("{}/{}", self.inner, segment))
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            Some(0) if self.inner.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) if idx > 0 => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

fn clean(raw: &str) -> String {
    let network = raw.starts_with("//") && !raw.starts_with("///");
    let absolute = raw.starts_with('/');
    let body = raw
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/");

    if network {
        format!("//{body}")
    } else if absolute {
        format!("/{body}")
    } else if body.is_empty() && !raw.is_empty() {
        ".".to_string()
    } else {
        body
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

impl From<NormalizedPath> for String {
    fn from(p: NormalizedPath) -> Self {
        p.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/etc/passwd", "/etc/passwd")]
    #[case("/etc//passwd", "/etc/passwd")]
    #[case("/etc/./passwd", "/etc/passwd")]
    #[case("C:\\etc\\hosts", "C:/etc/hosts")]
    #[case("/etc/cron.d/", "/etc/cron.d")]
    #[case("//server/share/hosts", "//server/share/hosts")]
    #[case("./hosts", "hosts")]
    #[case(".", ".")]
    #[case("/", "/")]
    fn normalizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(NormalizedPath::new(input).as_str(), expected);
    }

    #[test]
    fn equal_after_normalization() {
        assert_eq!(
            NormalizedPath::new("/etc//group"),
            NormalizedPath::new("/etc/./group")
        );
    }

    #[test]
    fn orders_lexicographically() {
        let mut paths = vec![
            NormalizedPath::new("/etc/shadow"),
            NormalizedPath::new("/etc/group"),
            NormalizedPath::new("/etc/passwd"),
        ];
        paths.sort();
        let names: Vec<_> = paths.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, vec!["/etc/group", "/etc/passwd", "/etc/shadow"]);
    }

    #[test]
    fn parent_and_file_name() {
        let path = NormalizedPath::new("/etc/cron.d/backup");
        assert_eq!(path.parent().unwrap().as_str(), "/etc/cron.d");
        assert_eq!(path.file_name(), Some("backup"));
        assert_eq!(NormalizedPath::new("/etc").parent().unwrap().as_str(), "/");
        assert_eq!(NormalizedPath::new("/").parent(), None);
    }

    #[test]
    fn extension_ignores_dotfiles() {
        assert_eq!(NormalizedPath::new("/cfg/passwd.toml").extension(), Some("toml"));
        assert_eq!(NormalizedPath::new("/home/alice/.profile").extension(), None);
    }

    #[test]
    fn join_on_empty_path() {
        assert_eq!(NormalizedPath::new("").join("hosts").as_str(), "hosts");
        assert_eq!(NormalizedPath::new("/etc").join("hosts").as_str(), "/etc/hosts");
    }
}
