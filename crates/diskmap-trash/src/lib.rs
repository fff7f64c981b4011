//! Journaled trash store for diskmap.
//!
//! Implements the soft-delete → restore / permanent-delete workflow
//! backed by a persisted manifest, merged read-only with the OS-native
//! trash at listing time.

mod entry;
mod error;
mod manifest;
mod store;
mod system;

pub use entry::{TrashEntry, TrashItem, TrashSource};
pub use error::TrashError;
pub use manifest::{MANIFEST_VERSION, TrashManifest};
pub use store::TrashStore;
pub use system::{
    SYSTEM_ID_PREFIX, decode_system_id, encode_system_id, is_system_id, system_trash_dir,
};
