//! Trash journal records and listing items.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One record in the app-owned trash journal.
///
/// Created at soft-delete time, never mutated afterwards, and removed on
/// restore or permanent delete. `stored_name` is unique and maps 1:1 to a
/// physical payload under the trash root's `files/` directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashEntry {
    /// Unique identifier assigned at soft-delete time.
    pub id: String,
    /// Original file or directory name.
    pub name: String,
    /// Absolute path the item was trashed from.
    pub original_path: PathBuf,
    /// Payload location under the trash `files/` directory.
    pub stored_name: String,
    /// Soft-delete time, epoch milliseconds.
    pub trashed_at: i64,
    /// Stat size recorded at soft-delete time.
    pub size: u64,
    /// Whether the item is a directory.
    pub is_directory: bool,
}

/// Where a listed trash item lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrashSource {
    /// App-owned, journaled in the manifest.
    App,
    /// Enumerated live from the OS-native trash.
    System,
}

/// One item of the unified trash listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashItem {
    pub id: String,
    pub name: String,
    pub original_path: PathBuf,
    pub trashed_at: i64,
    pub size: u64,
    pub is_directory: bool,
    pub source: TrashSource,
}

impl TrashItem {
    /// Build a listing item from an app-owned journal entry.
    pub fn from_entry(entry: &TrashEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            original_path: entry.original_path.clone(),
            trashed_at: entry.trashed_at,
            size: entry.size,
            is_directory: entry.is_directory,
            source: TrashSource::App,
        }
    }
}
