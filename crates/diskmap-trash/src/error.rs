//! Error types for trash operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the trash store.
#[derive(Debug, Error)]
pub enum TrashError {
    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// No journal entry with the given id.
    #[error("No trash entry with id {id}")]
    EntryNotFound { id: String },

    /// Restore destination is already occupied.
    #[error("Restore destination already occupied: {path}")]
    RestoreCollision { path: PathBuf },

    /// System-trash items can only be listed or deleted, never restored.
    #[error("System trash items cannot be restored: {id}")]
    SystemItemRestore { id: String },

    /// The id is neither a journal id nor a valid system-trash encoding.
    #[error("Invalid trash id: {id}")]
    InvalidId { id: String },

    /// A decoded system id pointed outside the OS-native trash.
    #[error("Path is outside the system trash: {path}")]
    OutsideSystemTrash { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted manifest could not be parsed or serialized.
    #[error("Manifest unreadable: {source}")]
    ManifestCorrupt {
        #[source]
        source: serde_json::Error,
    },
}

impl TrashError {
    /// Create an I/O error with path context, mapping well-known kinds
    /// onto their taxonomy variants.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}
