//! The persisted trash manifest.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entry::TrashEntry;
use crate::error::TrashError;

/// Current manifest document version.
pub const MANIFEST_VERSION: u32 = 1;

/// Ordered journal of app-owned trashed items; the sole source of truth
/// for them. Items in the OS-native trash are never recorded here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashManifest {
    /// Document format version.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Journal entries, in soft-delete order.
    #[serde(default)]
    pub entries: Vec<TrashEntry>,
}

fn default_version() -> u32 {
    MANIFEST_VERSION
}

impl Default for TrashManifest {
    fn default() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: Vec::new(),
        }
    }
}

impl TrashManifest {
    /// Load the manifest document at `path`.
    ///
    /// A missing file is an empty manifest, and so is an unparsable one:
    /// corruption is logged and treated as empty rather than blocking
    /// every subsequent trash operation.
    pub fn load(path: &Path) -> Self {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(_) => return Self::default(),
        };

        match serde_json::from_slice::<Self>(&bytes) {
            Ok(manifest) => manifest,
            // Pre-versioning manifests were a bare entry array.
            Err(_) => match serde_json::from_slice::<Vec<TrashEntry>>(&bytes) {
                Ok(entries) => Self {
                    version: MANIFEST_VERSION,
                    entries,
                },
                Err(err) => {
                    let corrupt = TrashError::ManifestCorrupt { source: err };
                    tracing::warn!(
                        path = %path.display(),
                        error = %corrupt,
                        "manifest unreadable, starting empty"
                    );
                    Self::default()
                }
            },
        }
    }

    /// Persist atomically: serialize to a temp file beside the manifest,
    /// then rename it into place.
    pub fn persist(&self, path: &Path) -> Result<(), TrashError> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| TrashError::ManifestCorrupt { source: e })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &json).map_err(|e| TrashError::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| TrashError::io(path, e))?;
        Ok(())
    }

    /// Look up an entry by id.
    pub fn find(&self, id: &str) -> Option<&TrashEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Append an entry.
    pub fn push(&mut self, entry: TrashEntry) {
        self.entries.push(entry);
    }

    /// Remove an entry by id, returning it if present.
    pub fn remove(&mut self, id: &str) -> Option<TrashEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Get the number of journaled entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the journal is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn sample_entry(id: &str) -> TrashEntry {
        TrashEntry {
            id: id.to_string(),
            name: "f.txt".to_string(),
            original_path: PathBuf::from("/home/u/f.txt"),
            stored_name: format!("{id}_f.txt"),
            trashed_at: 1_700_000_000_000,
            size: 10,
            is_directory: false,
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let manifest = TrashManifest::load(&temp.path().join("manifest.json"));
        assert!(manifest.is_empty());
        assert_eq!(manifest.version, MANIFEST_VERSION);
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manifest.json");
        fs::write(&path, b"{not json at all").unwrap();

        let manifest = TrashManifest::load(&path);
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_legacy_bare_array_loads() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manifest.json");
        let legacy = serde_json::to_vec(&vec![sample_entry("legacy-1")]).unwrap();
        fs::write(&path, legacy).unwrap();

        let manifest = TrashManifest::load(&path);
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.version, MANIFEST_VERSION);
        assert!(manifest.find("legacy-1").is_some());
    }

    #[test]
    fn test_persist_round_trip_is_atomic() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manifest.json");

        let mut manifest = TrashManifest::default();
        manifest.push(sample_entry("a"));
        manifest.push(sample_entry("b"));
        manifest.persist(&path).unwrap();

        // No temp file left behind.
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = TrashManifest::load(&path);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.find("b").unwrap().stored_name, "b_f.txt");
    }

    #[test]
    fn test_remove_by_id() {
        let mut manifest = TrashManifest::default();
        manifest.push(sample_entry("a"));
        manifest.push(sample_entry("b"));

        let removed = manifest.remove("a").unwrap();
        assert_eq!(removed.id, "a");
        assert!(manifest.find("a").is_none());
        assert_eq!(manifest.len(), 1);
        assert!(manifest.remove("a").is_none());
    }
}
