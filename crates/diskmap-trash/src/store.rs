//! Journaled trash store: soft delete, restore, permanent delete.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::entry::{TrashEntry, TrashItem};
use crate::error::TrashError;
use crate::manifest::TrashManifest;
use crate::system;

/// Name of the payload directory under the trash root.
const FILES_DIR: &str = "files";

/// Name of the manifest document at the trash root.
const MANIFEST_FILE: &str = "manifest.json";

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// App-owned trash store backed by a persisted manifest.
///
/// Layout: `<root>/files/` holds payloads named by `storedName`, and
/// `<root>/manifest.json` journals them. Every manifest
/// read-modify-write runs behind one mutex, so overlapping operations
/// cannot interleave on the persisted document.
pub struct TrashStore {
    root: PathBuf,
    files_dir: PathBuf,
    manifest_path: PathBuf,
    manifest: Mutex<TrashManifest>,
    /// OS-native trash payload directory merged into listings; `None`
    /// where the platform has none.
    system_trash_dir: Option<PathBuf>,
}

impl TrashStore {
    /// Open the trash store at `root`, creating its layout if needed.
    ///
    /// Listings merge in the platform's native trash where one exists.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, TrashError> {
        Self::open_with_system_trash(root, system::system_trash_dir())
    }

    /// Open the trash store with an explicit system-trash payload
    /// directory (or none at all).
    pub fn open_with_system_trash(
        root: impl Into<PathBuf>,
        system_trash_dir: Option<PathBuf>,
    ) -> Result<Self, TrashError> {
        let root = root.into();
        let files_dir = root.join(FILES_DIR);
        fs::create_dir_all(&files_dir).map_err(|e| TrashError::io(&files_dir, e))?;

        let manifest_path = root.join(MANIFEST_FILE);
        let manifest = TrashManifest::load(&manifest_path);
        Ok(Self {
            root,
            files_dir,
            manifest_path,
            manifest: Mutex::new(manifest),
            system_trash_dir,
        })
    }

    /// Default app-owned trash root: `~/.diskmap/trash`, or a temp
    /// directory fallback when no home is known.
    pub fn default_root() -> PathBuf {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".diskmap").join("trash"))
            .unwrap_or_else(|| std::env::temp_dir().join("diskmap-trash"))
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Soft-delete: move `path` into the trash and journal it.
    ///
    /// A stat failure aborts the whole operation with no state change.
    /// The physical move happens before the journal write (write-ahead
    /// ordering): a crash between the two leaves an orphaned payload the
    /// journal does not know about, but never a journaled entry without
    /// a payload.
    pub fn move_to_trash(&self, path: &Path) -> Result<TrashEntry, TrashError> {
        let metadata = fs::symlink_metadata(path).map_err(|e| TrashError::io(path, e))?;

        let id = next_id();
        let name = base_name(path);
        let stored_name = format!("{id}_{name}");
        let stored_path = self.files_dir.join(&stored_name);

        move_path(path, &stored_path)?;

        let entry = TrashEntry {
            id,
            name,
            original_path: path.to_path_buf(),
            stored_name,
            trashed_at: Utc::now().timestamp_millis(),
            size: metadata.len(),
            is_directory: metadata.is_dir(),
        };

        let mut manifest = self.lock_manifest();
        manifest.push(entry.clone());
        manifest.persist(&self.manifest_path)?;

        tracing::debug!(id = %entry.id, from = %path.display(), "moved to trash");
        Ok(entry)
    }

    /// Restore a soft-deleted item to its original path.
    ///
    /// System-trash ids are rejected outright; only app-owned entries
    /// may come back through this path. An occupied destination fails
    /// with a collision and the entry stays trashed.
    pub fn restore(&self, id: &str) -> Result<PathBuf, TrashError> {
        if system::is_system_id(id) {
            return Err(TrashError::SystemItemRestore { id: id.to_string() });
        }

        let mut manifest = self.lock_manifest();
        let entry = manifest
            .find(id)
            .cloned()
            .ok_or_else(|| TrashError::EntryNotFound { id: id.to_string() })?;

        let destination = entry.original_path.clone();
        if destination.exists() {
            return Err(TrashError::RestoreCollision { path: destination });
        }
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| TrashError::io(parent, e))?;
        }

        let stored_path = self.files_dir.join(&entry.stored_name);
        move_path(&stored_path, &destination)?;

        manifest.remove(id);
        manifest.persist(&self.manifest_path)?;

        tracing::debug!(id, to = %destination.display(), "restored from trash");
        Ok(destination)
    }

    /// Permanently delete a trashed item.
    ///
    /// App-owned ids drop both the payload and the journal entry. A
    /// system id decodes to a path that must be strictly contained in
    /// the OS-native trash; anything else is rejected so a crafted id
    /// cannot delete arbitrary paths.
    pub fn permanently_delete(&self, id: &str) -> Result<(), TrashError> {
        if system::is_system_id(id) {
            let path = system::decode_system_id(id)?;
            let trash_dir = self
                .system_trash_dir
                .as_deref()
                .ok_or_else(|| TrashError::OutsideSystemTrash { path: path.clone() })?;
            if !system::contained_in_system_trash(&path, trash_dir) {
                return Err(TrashError::OutsideSystemTrash { path });
            }
            return remove_path(&path);
        }

        let mut manifest = self.lock_manifest();
        let entry = manifest
            .find(id)
            .cloned()
            .ok_or_else(|| TrashError::EntryNotFound { id: id.to_string() })?;

        remove_path(&self.files_dir.join(&entry.stored_name))?;
        manifest.remove(id);
        manifest.persist(&self.manifest_path)?;

        tracing::debug!(id, "permanently deleted");
        Ok(())
    }

    /// Best-effort removal of everything in the trash.
    ///
    /// A failure on any single item is swallowed so the rest still get
    /// processed; the manifest is reset to empty regardless of
    /// individual outcomes.
    pub fn empty_trash(&self) -> Result<(), TrashError> {
        let mut manifest = self.lock_manifest();

        for entry in &manifest.entries {
            let stored_path = self.files_dir.join(&entry.stored_name);
            if let Err(err) = remove_path(&stored_path) {
                tracing::warn!(id = %entry.id, error = %err, "failed to remove trash payload");
            }
        }

        for item in self.system_items() {
            let Ok(path) = system::decode_system_id(&item.id) else {
                continue;
            };
            if let Err(err) = remove_path(&path) {
                tracing::warn!(path = %path.display(), error = %err, "failed to remove system trash item");
            }
        }

        manifest.entries.clear();
        manifest.persist(&self.manifest_path)
    }

    /// Unified trash listing: journal entries merged with the
    /// live-enumerated OS-native trash, newest first.
    pub fn list_items(&self) -> Vec<TrashItem> {
        let mut items: Vec<TrashItem> = {
            let manifest = self.lock_manifest();
            manifest.entries.iter().map(TrashItem::from_entry).collect()
        };

        items.extend(self.system_items());
        items.sort_by(|a, b| b.trashed_at.cmp(&a.trashed_at));
        items
    }

    /// Live enumeration of the OS-native trash; empty where unsupported.
    fn system_items(&self) -> Vec<TrashItem> {
        match self.system_trash_dir.as_deref() {
            Some(files_dir) => system::list_items_in(files_dir),
            None => Vec::new(),
        }
    }

    fn lock_manifest(&self) -> std::sync::MutexGuard<'_, TrashManifest> {
        // A poisoned lock means another operation panicked mid-way; the
        // in-memory manifest is still the best state available.
        self.manifest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Generate an id unique across runs: wall-clock milliseconds plus a
/// process-local sequence number, both hex.
fn next_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{millis:x}-{seq:04x}")
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Move a path, falling back to copy-then-remove when rename fails
/// (cross-device moves).
fn move_path(from: &Path, to: &Path) -> Result<(), TrashError> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            let metadata =
                fs::symlink_metadata(from).map_err(|_| TrashError::io(from, rename_err))?;
            copy_recursive(from, to, &metadata)?;
            remove_path(from)
        }
    }
}

fn copy_recursive(from: &Path, to: &Path, metadata: &fs::Metadata) -> Result<(), TrashError> {
    if metadata.is_dir() {
        fs::create_dir_all(to).map_err(|e| TrashError::io(to, e))?;
        let entries = fs::read_dir(from).map_err(|e| TrashError::io(from, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| TrashError::io(from, e))?;
            let child_path = entry.path();
            let child_metadata =
                fs::symlink_metadata(&child_path).map_err(|e| TrashError::io(&child_path, e))?;
            copy_recursive(&child_path, &to.join(entry.file_name()), &child_metadata)?;
        }
    } else {
        fs::copy(from, to).map_err(|e| TrashError::io(to, e))?;
    }
    Ok(())
}

/// Remove a file or a whole directory tree.
fn remove_path(path: &Path) -> Result<(), TrashError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| TrashError::io(path, e))?;
    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| TrashError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ids_are_unique() {
        let a = next_id();
        let b = next_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_open_creates_layout() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("trash");
        let store = TrashStore::open(&root).unwrap();

        assert!(root.join("files").is_dir());
        assert_eq!(store.root(), root.as_path());
    }

    #[test]
    fn test_move_path_falls_back_to_copy() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("dir");
        fs::create_dir(&from).unwrap();
        fs::write(from.join("f.txt"), b"data").unwrap();

        let to = temp.path().join("moved");
        move_path(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read(to.join("f.txt")).unwrap(), b"data");
    }
}
