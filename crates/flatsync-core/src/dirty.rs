//! Targets with pending writes

use crate::target::Target;
use std::collections::BTreeSet;

/// Ordered set of targets awaiting flush.
///
/// Iteration is in lexicographic path order. A target leaves the set only
/// once its write has succeeded.
#[derive(Debug, Clone, Default)]
pub struct DirtySet {
    targets: BTreeSet<Target>,
}

impl DirtySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the target was not already dirty.
    pub fn mark(&mut self, target: Target) -> bool {
        self.targets.insert(target)
    }

    pub fn clean(&mut self, target: &Target) -> bool {
        self.targets.remove(target)
    }

    pub fn contains(&self, target: &Target) -> bool {
        self.targets.contains(target)
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Sorted copy of the current members.
    pub fn snapshot(&self) -> Vec<Target> {
        self.targets.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::TargetRegistry;
    use flatsync_fs::{FileType, NormalizedPath};

    #[test]
    fn marks_deduplicate_and_sort() {
        let registry = TargetRegistry::new(NormalizedPath::new("/etc/passwd"), FileType::Ram);
        let mut dirty = DirtySet::new();

        assert!(dirty.mark(registry.target("/etc/passwd")));
        assert!(dirty.mark(registry.target("/etc/group")));
        assert!(!dirty.mark(registry.target("/etc//passwd")));

        let order: Vec<_> = dirty.snapshot().iter().map(|t| t.to_string()).collect();
        assert_eq!(order, vec!["/etc/group", "/etc/passwd"]);

        assert!(dirty.clean(&registry.target("/etc/group")));
        assert_eq!(dirty.len(), 1);
        assert!(dirty.contains(&registry.target("/etc/passwd")));
    }
}
