//! Depth- and size-bounded aggregation tree builder.

use std::fs;
use std::path::Path;

use compact_str::CompactString;
use diskmap_core::{DiskNode, FOLDER_BUCKET_LABEL, MISC_BUCKET_LABEL, ScanConfig, ScanError};

use crate::probe;
use crate::visited::DirVisits;

/// Builds a [`DiskNode`] tree for one scan request.
///
/// Directories are expanded only while depth budget remains and their
/// exact probed size clears the small-folder threshold; everything else
/// folds into per-directory bucket nodes so a tree over millions of
/// files stays small enough to visualize.
pub struct TreeBuilder<'a> {
    config: &'a ScanConfig,
    visited: DirVisits,
}

impl<'a> TreeBuilder<'a> {
    /// Create a builder for one invocation.
    pub fn new(config: &'a ScanConfig) -> Self {
        Self {
            config,
            visited: DirVisits::new(),
        }
    }

    /// Build the aggregation tree rooted at the configured path.
    ///
    /// Only a failure to stat the root aborts the build; every failure
    /// below the root is absorbed as zero contribution.
    pub fn build(&self) -> Result<DiskNode, ScanError> {
        let root = &self.config.root;
        let metadata = fs::symlink_metadata(root).map_err(|e| ScanError::io(root, e))?;
        let label = display_name(root);

        if !metadata.is_dir() {
            return Ok(DiskNode::file(label, metadata.len(), root.clone()));
        }

        self.visited.track(&metadata);
        Ok(self.build_dir(root, label, self.config.max_depth))
    }

    /// Expand one directory into a node with children.
    fn build_dir(&self, path: &Path, label: CompactString, remaining_depth: u32) -> DiskNode {
        let mut children = Vec::new();
        let mut misc_total: u64 = 0;
        let mut folded_total: u64 = 0;

        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "readdir failed");
                // Inaccessible directories render as empty rather than failing.
                return DiskNode::directory(label, path, children);
            }
        };

        for entry in entries {
            let Ok(entry) = entry else { continue };
            let entry_path = entry.path();
            let metadata = match fs::symlink_metadata(&entry_path) {
                Ok(m) => m,
                Err(err) => {
                    tracing::debug!(path = %entry_path.display(), error = %err, "stat failed");
                    continue;
                }
            };

            if metadata.is_dir() {
                // A directory reached twice (bind mount, cycle) counts only
                // at its first appearance.
                if !self.visited.track(&metadata) {
                    continue;
                }

                let exact = probe::compute_size(&entry_path);
                if remaining_depth == 0 || exact < self.config.small_dir_threshold {
                    folded_total += exact;
                } else {
                    let name = CompactString::new(entry.file_name().to_string_lossy());
                    children.push(self.build_dir(&entry_path, name, remaining_depth - 1));
                }
            } else {
                // Symlinks count their own link size, never the target's.
                let size = metadata.len();
                if size < self.config.small_file_threshold {
                    misc_total += size;
                } else {
                    let name = CompactString::new(entry.file_name().to_string_lossy());
                    children.push(DiskNode::file(name, size, entry_path));
                }
            }
        }

        if misc_total > 0 {
            children.push(DiskNode::bucket(MISC_BUCKET_LABEL, misc_total));
        }
        if folded_total > 0 {
            children.push(DiskNode::bucket(FOLDER_BUCKET_LABEL, folded_total));
        }

        DiskNode::directory(label, path, children)
    }
}

/// Display label for a path: its file name, or the whole path for roots
/// like `/`.
fn display_name(path: &Path) -> CompactString {
    path.file_name()
        .map(|n| CompactString::new(n.to_string_lossy()))
        .unwrap_or_else(|| CompactString::new(path.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_small_files_fold_into_one_bucket() {
        let temp = TempDir::new().unwrap();
        for i in 0..10 {
            fs::write(temp.path().join(format!("f{i}.txt")), vec![0u8; 1024]).unwrap();
        }

        let config = ScanConfig::new(temp.path()).with_max_depth(2);
        let tree = TreeBuilder::new(&config).build().unwrap();

        let children = tree.children.as_ref().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id.as_str(), MISC_BUCKET_LABEL);
        assert_eq!(children[0].value, 10 * 1024);
        assert_eq!(tree.value, 10 * 1024);
    }

    #[test]
    fn test_file_root_yields_leaf() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("standalone.log");
        fs::write(&file, vec![0u8; 77]).unwrap();

        let config = ScanConfig::new(&file);
        let tree = TreeBuilder::new(&config).build().unwrap();

        assert!(tree.children.is_none());
        assert_eq!(tree.value, 77);
        assert_eq!(tree.id.as_str(), "standalone.log");
    }

    #[test]
    fn test_missing_root_fails() {
        let config = ScanConfig::new("/no/such/path/at/all");
        let result = TreeBuilder::new(&config).build();
        assert!(matches!(result, Err(ScanError::NotFound { .. })));
    }
}
