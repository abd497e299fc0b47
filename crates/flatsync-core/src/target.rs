//! Targets and the registry of their backing files

use flatsync_fs::{BackingFile, FileType, NormalizedPath};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One logical backing file, identified by its normalized path.
///
/// Equality, hashing and ordering consider the path only.
#[derive(Debug, Clone, Serialize)]
pub struct Target {
    path: NormalizedPath,
    is_default: bool,
}

impl Target {
    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Whether this is the record kind's default target.
    pub fn is_default(&self) -> bool {
        self.is_default
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Target {}

impl Hash for Target {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl PartialOrd for Target {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Target {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path.cmp(&other.path)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Resolves paths to targets and caches one backing file per target.
///
/// Handles survive prefetch cycles; only [`TargetRegistry::clear`] drops them.
#[derive(Debug)]
pub struct TargetRegistry {
    default_target: Target,
    filetype: FileType,
    files: BTreeMap<NormalizedPath, Box<dyn BackingFile>>,
}

impl TargetRegistry {
    pub fn new(default_path: NormalizedPath, filetype: FileType) -> Self {
        Self {
            default_target: Target {
                path: default_path,
                is_default: true,
            },
            filetype,
            files: BTreeMap::new(),
        }
    }

    pub fn default_target(&self) -> &Target {
        &self.default_target
    }

    /// The target for `path`.
    pub fn target(&self, path: impl Into<NormalizedPath>) -> Target {
        let path = path.into();
        let is_default = path == self.default_target.path;
        Target { path, is_default }
    }

    /// Targets whose backing file has been opened or attached.
    pub fn known(&self) -> Vec<Target> {
        self.files.keys().map(|path| self.target(path.clone())).collect()
    }

    /// Backing file for `target`, opened with the configured filetype on first use.
    pub fn file(&mut self, target: &Target) -> &mut dyn BackingFile {
        let filetype = self.filetype;
        self.files
            .entry(target.path.clone())
            .or_insert_with(|| {
                tracing::debug!(path = %target.path, ?filetype, "Opening backing file");
                filetype.open(&target.path)
            })
            .as_mut()
    }

    /// Use `file` as the backing file for its path, replacing any cached handle.
    pub fn attach(&mut self, file: Box<dyn BackingFile>) -> Target {
        let target = self.target(file.path().clone());
        self.files.insert(target.path.clone(), file);
        target
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatsync_fs::RamFile;

    fn registry() -> TargetRegistry {
        TargetRegistry::new(NormalizedPath::new("/etc/passwd"), FileType::Ram)
    }

    #[test]
    fn equal_paths_are_the_same_target() {
        let registry = registry();
        let a = registry.target("/etc//passwd");
        let b = registry.target("/etc/passwd");
        assert_eq!(a, b);
        assert!(a.is_default());
        assert!(!registry.target("/etc/passwd.local").is_default());
    }

    #[test]
    fn file_is_cached_per_target() {
        let mut registry = registry();
        let target = registry.target("/srv/passwd");
        registry.file(&target).write("bob:x:1001:1001::/home/bob:/bin/sh\n").unwrap();

        assert_eq!(
            registry.file(&target).read().unwrap(),
            "bob:x:1001:1001::/home/bob:/bin/sh\n"
        );
        assert_eq!(registry.known(), vec![target]);
    }

    #[test]
    fn attach_replaces_handle() {
        let mut registry = registry();
        let file = RamFile::with_content(NormalizedPath::new("/etc/passwd"), "root:x:0:0::/root:/bin/sh\n");
        let target = registry.attach(Box::new(file));

        assert!(target.is_default());
        assert_eq!(
            registry.file(&target).read().unwrap(),
            "root:x:0:0::/root:/bin/sh\n"
        );
    }

    #[test]
    fn clear_drops_handles() {
        let mut registry = registry();
        let target = registry.target("/etc/passwd");
        registry.file(&target).write("changed\n").unwrap();
        registry.clear();

        assert!(registry.known().is_empty());
        assert_eq!(registry.file(&target).read().unwrap(), "");
    }
}
