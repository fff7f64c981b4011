//! Read-only integration with the OS-native trash.
//!
//! System-trash items carry no journal entry; they are addressed by a
//! reversible encoding of their absolute path so a listing id can be
//! turned back into a deletable path without any persisted state.

use std::fs;
use std::path::{Component, Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::entry::{TrashItem, TrashSource};
use crate::error::TrashError;

/// Prefix marking an id as a system-trash path encoding.
pub const SYSTEM_ID_PREFIX: &str = "sys-";

/// Check whether an id addresses a system-trash item.
pub fn is_system_id(id: &str) -> bool {
    id.starts_with(SYSTEM_ID_PREFIX)
}

/// Encode an absolute path as a system-trash id.
pub fn encode_system_id(path: &Path) -> String {
    let encoded = URL_SAFE_NO_PAD.encode(path.to_string_lossy().as_bytes());
    format!("{SYSTEM_ID_PREFIX}{encoded}")
}

/// Decode a system-trash id back into the path it names.
pub fn decode_system_id(id: &str) -> Result<PathBuf, TrashError> {
    let invalid = || TrashError::InvalidId { id: id.to_string() };

    let encoded = id.strip_prefix(SYSTEM_ID_PREFIX).ok_or_else(invalid)?;
    let bytes = URL_SAFE_NO_PAD.decode(encoded).map_err(|_| invalid())?;
    let text = String::from_utf8(bytes).map_err(|_| invalid())?;
    Ok(PathBuf::from(text))
}

/// The OS-native trash payload directory for the current user.
#[cfg(target_os = "macos")]
pub fn system_trash_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".Trash"))
}

/// The OS-native trash payload directory for the current user
/// (XDG `Trash/files`).
#[cfg(target_os = "linux")]
pub fn system_trash_dir() -> Option<PathBuf> {
    let data_home = std::env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/share")))?;
    Some(data_home.join("Trash").join("files"))
}

/// System trash is unsupported on this platform.
#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub fn system_trash_dir() -> Option<PathBuf> {
    None
}

/// Check that `path` is strictly contained within the trash payload
/// directory: inside it, not equal to it, and free of parent-directory
/// components that could escape after the prefix check.
pub fn contained_in_system_trash(path: &Path, trash_dir: &Path) -> bool {
    !path.components().any(|c| matches!(c, Component::ParentDir))
        && path.starts_with(trash_dir)
        && path != trash_dir
}

/// Enumerate one system-trash payload directory. Empty where unreadable.
pub(crate) fn list_items_in(files_dir: &Path) -> Vec<TrashItem> {
    let entries = match fs::read_dir(files_dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut items = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(metadata) = fs::symlink_metadata(&path) else {
            continue;
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        let sidecar = read_trash_info(files_dir, &name);
        let trashed_at = sidecar
            .as_ref()
            .and_then(|info| info.deleted_at)
            .unwrap_or_else(|| mtime_millis(&metadata));
        let original_path = sidecar
            .and_then(|info| info.original_path)
            .unwrap_or_else(|| path.clone());

        items.push(TrashItem {
            id: encode_system_id(&path),
            name,
            original_path,
            trashed_at,
            size: metadata.len(),
            is_directory: metadata.is_dir(),
            source: TrashSource::System,
        });
    }
    items
}

/// Fields recovered from an XDG `.trashinfo` sidecar.
struct TrashInfo {
    original_path: Option<PathBuf>,
    deleted_at: Option<i64>,
}

/// Read the `info/<name>.trashinfo` sidecar next to an XDG `files/`
/// directory. macOS has no sidecars, so this simply finds nothing there.
fn read_trash_info(files_dir: &Path, name: &str) -> Option<TrashInfo> {
    let info_path = files_dir
        .parent()?
        .join("info")
        .join(format!("{name}.trashinfo"));
    let content = fs::read_to_string(info_path).ok()?;

    let mut original_path = None;
    let mut deleted_at = None;
    for line in content.lines() {
        if let Some(value) = line.strip_prefix("Path=") {
            original_path = Some(PathBuf::from(value));
        } else if let Some(value) = line.strip_prefix("DeletionDate=") {
            deleted_at = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.and_utc().timestamp_millis());
        }
    }

    Some(TrashInfo {
        original_path,
        deleted_at,
    })
}

fn mtime_millis(metadata: &fs::Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .map(|t| DateTime::<Utc>::from(t).timestamp_millis())
        .unwrap_or(0)
}
