//! Visited-directory tracking for traversal loop protection.

use std::fs::Metadata;

use dashmap::DashSet;

/// On-disk identity of a directory: (device, inode) on Unix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirIdentity {
    /// Device ID.
    pub device: u64,
    /// Inode number.
    pub inode: u64,
}

impl DirIdentity {
    /// Extract the identity from metadata, where the platform exposes one.
    #[cfg(unix)]
    pub fn of(metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        Some(Self {
            device: metadata.dev(),
            inode: metadata.ino(),
        })
    }

    #[cfg(not(unix))]
    pub fn of(_metadata: &Metadata) -> Option<Self> {
        None
    }
}

/// Tracks directories already reached during one build, so cycles
/// (bind mounts, looping links) are walked at most once.
#[derive(Debug, Default)]
pub struct DirVisits {
    seen: DashSet<DirIdentity>,
}

impl DirVisits {
    /// Create a new empty tracker.
    pub fn new() -> Self {
        Self {
            seen: DashSet::new(),
        }
    }

    /// Track a directory. Returns `true` if this is the first visit.
    ///
    /// Where the platform exposes no identity, every call reports a first
    /// visit; loop protection then rests on symlinks never being followed.
    pub fn track(&self, metadata: &Metadata) -> bool {
        match DirIdentity::of(metadata) {
            Some(identity) => self.seen.insert(identity),
            None => true,
        }
    }

    /// Get the number of unique directories tracked.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Check if no directories have been tracked.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    #[cfg(unix)]
    fn test_track_same_directory_once() {
        let temp = TempDir::new().unwrap();
        let metadata = std::fs::metadata(temp.path()).unwrap();

        let visits = DirVisits::new();
        assert!(visits.track(&metadata));
        assert!(!visits.track(&metadata));
        assert_eq!(visits.len(), 1);
    }

    #[test]
    #[cfg(unix)]
    fn test_distinct_directories_are_distinct() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("a")).unwrap();

        let visits = DirVisits::new();
        assert!(visits.track(&std::fs::metadata(temp.path()).unwrap()));
        assert!(visits.track(&std::fs::metadata(temp.path().join("a")).unwrap()));
        assert_eq!(visits.len(), 2);
    }
}
