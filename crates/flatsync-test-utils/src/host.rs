//! [`TestHost`]: a scratch directory laid out like a host's config files.

use flatsync_core::flush::strip_header;
use flatsync_fs::NormalizedPath;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A temporary directory with helpers for writing and inspecting backing
/// files.
///
/// # Example
///
/// ```rust,no_run
/// use flatsync_test_utils::TestHost;
///
/// let host = TestHost::new();
/// host.write("passwd", "alice:x:1000:1000::/home/alice:/bin/bash\n");
/// assert!(host.body("passwd").starts_with("alice:"));
/// ```
pub struct TestHost {
    temp_dir: TempDir,
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHost {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Normalized path of `relative` inside the host directory.
    pub fn path(&self, relative: &str) -> NormalizedPath {
        NormalizedPath::new(self.root().join(relative))
    }

    /// Write a file, creating parent directories.
    ///
    /// # Panics
    /// Panics if the filesystem operations fail.
    pub fn write(&self, relative: &str, content: &str) -> NormalizedPath {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("TestHost::write: failed to create {}: {e}", parent.display()));
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("TestHost::write: failed to write {}: {e}", path.display()));
        NormalizedPath::new(path)
    }

    /// Raw content of a file.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, relative: &str) -> String {
        let path = self.root().join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("TestHost::read: failed to read {}: {e}", path.display()))
    }

    /// Content of a file without the generated header.
    pub fn body(&self, relative: &str) -> String {
        strip_header(&self.read(relative))
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.root().join(relative).exists()
    }

    /// Assert that a file's body contains `needle`.
    pub fn assert_contains(&self, relative: &str, needle: &str) {
        let body = self.body(relative);
        assert!(
            body.contains(needle),
            "{relative} should contain {needle:?}, got:\n{body}"
        );
    }

    /// Assert that a file's body does not contain `needle`.
    pub fn assert_not_contains(&self, relative: &str, needle: &str) {
        let body = self.body(relative);
        assert!(
            !body.contains(needle),
            "{relative} should not contain {needle:?}, got:\n{body}"
        );
    }
}
