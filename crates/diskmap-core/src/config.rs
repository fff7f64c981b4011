//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Files below this size fold into the "Misc / Other" bucket (5 MiB).
pub const DEFAULT_SMALL_FILE_THRESHOLD: u64 = 5 * 1024 * 1024;

/// Directories below this probed size fold into the "Other Folders"
/// bucket (1 MiB).
pub const DEFAULT_SMALL_DIR_THRESHOLD: u64 = 1024 * 1024;

/// Configuration for building a size-aggregation tree.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// Depth budget: how many directory levels below the root may be
    /// expanded into child nodes.
    #[builder(default = "default_max_depth()")]
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Files smaller than this accumulate into the per-directory
    /// "Misc / Other" bucket instead of becoming their own node.
    #[builder(default = "DEFAULT_SMALL_FILE_THRESHOLD")]
    #[serde(default = "default_small_file_threshold")]
    pub small_file_threshold: u64,

    /// Directories whose exact recursive size is smaller than this fold
    /// into the "Other Folders" bucket even when depth budget remains.
    #[builder(default = "DEFAULT_SMALL_DIR_THRESHOLD")]
    #[serde(default = "default_small_dir_threshold")]
    pub small_dir_threshold: u64,
}

fn default_max_depth() -> u32 {
    4
}

fn default_small_file_threshold() -> u64 {
    DEFAULT_SMALL_FILE_THRESHOLD
}

fn default_small_dir_threshold() -> u64 {
    DEFAULT_SMALL_DIR_THRESHOLD
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a config with default thresholds for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_depth: default_max_depth(),
            small_file_threshold: DEFAULT_SMALL_FILE_THRESHOLD,
            small_dir_threshold: DEFAULT_SMALL_DIR_THRESHOLD,
        }
    }

    /// Set the depth budget.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
