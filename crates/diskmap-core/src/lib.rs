//! Core types for diskmap.
//!
//! This crate provides the fundamental data structures shared by the
//! scanning and trash subsystems: the size-aggregation tree node, scan
//! configuration, and the scan error taxonomy.

mod config;
mod error;
mod node;

pub use config::{
    DEFAULT_SMALL_DIR_THRESHOLD, DEFAULT_SMALL_FILE_THRESHOLD, ScanConfig, ScanConfigBuilder,
};
pub use error::ScanError;
pub use node::{Category, DiskNode, FOLDER_BUCKET_LABEL, MISC_BUCKET_LABEL};
