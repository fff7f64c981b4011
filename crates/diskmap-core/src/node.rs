//! Size-aggregation tree node types.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Label used for the bucket that folds small files together.
pub const MISC_BUCKET_LABEL: &str = "Misc / Other";

/// Label used for the bucket that folds small or depth-exhausted folders.
pub const FOLDER_BUCKET_LABEL: &str = "Other Folders";

/// Coarse content category, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Source code and markup.
    Code,
    /// Images, audio and video.
    Media,
    /// Documents and plain text.
    Docs,
    /// Binaries, libraries and other machine artifacts.
    System,
    /// Directories.
    Folder,
    /// Everything else, including synthetic bucket nodes.
    Other,
}

impl Category {
    /// Map a file extension (without the dot) to a category.
    ///
    /// Unlisted extensions map to [`Category::Other`].
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "rs" | "c" | "h" | "cpp" | "hpp" | "cc" | "py" | "js" | "mjs" | "ts" | "tsx"
            | "jsx" | "java" | "go" | "rb" | "php" | "swift" | "kt" | "sh" | "bash" | "pl"
            | "lua" | "html" | "htm" | "css" | "scss" | "json" | "toml" | "yaml" | "yml"
            | "xml" | "sql" => Self::Code,
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "svg" | "ico" | "heic" | "mp3"
            | "wav" | "flac" | "ogg" | "m4a" | "mp4" | "mkv" | "mov" | "avi" | "webm" => {
                Self::Media
            }
            "pdf" | "doc" | "docx" | "xls" | "xlsx" | "ppt" | "pptx" | "odt" | "ods" | "txt"
            | "md" | "rtf" | "csv" | "epub" => Self::Docs,
            "dll" | "so" | "dylib" | "exe" | "bin" | "sys" | "o" | "a" | "lib" | "iso"
            | "img" | "dmg" | "msi" | "deb" | "rpm" | "lock" | "log" | "tmp" | "dat" => {
                Self::System
            }
            _ => Self::Other,
        }
    }

    /// Derive the category for a file path from its extension.
    pub fn for_file(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Other)
    }
}

/// One node of the size-aggregation tree: a file, a directory, or a
/// synthetic bucket folding many small items together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskNode {
    /// Display label: file/directory name, or a bucket label.
    pub id: CompactString,

    /// Aggregate size in bytes.
    pub value: u64,

    /// Absolute filesystem path. Absent for bucket nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Content category.
    pub category: Category,

    /// Children, present only on expanded directories. Listing order,
    /// with bucket nodes appended last.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DiskNode>>,
}

impl DiskNode {
    /// Create a leaf node for a regular file.
    pub fn file(name: impl Into<CompactString>, size: u64, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            id: name.into(),
            value: size,
            category: Category::for_file(&path),
            path: Some(path),
            children: None,
        }
    }

    /// Create an expanded directory node. `value` is the sum of the
    /// children's values.
    pub fn directory(
        name: impl Into<CompactString>,
        path: impl Into<PathBuf>,
        children: Vec<DiskNode>,
    ) -> Self {
        let value = children.iter().map(|c| c.value).sum();
        Self {
            id: name.into(),
            value,
            path: Some(path.into()),
            category: Category::Folder,
            children: Some(children),
        }
    }

    /// Create a synthetic bucket node. Buckets have no path and no children.
    pub fn bucket(label: &'static str, value: u64) -> Self {
        Self {
            id: CompactString::const_new(label),
            value,
            path: None,
            category: Category::Other,
            children: None,
        }
    }

    /// Check if this node is a synthetic bucket.
    pub fn is_bucket(&self) -> bool {
        self.path.is_none()
    }

    /// Check if this node is an expanded directory.
    pub fn is_dir(&self) -> bool {
        self.children.is_some()
    }

    /// Sum of all leaf and bucket values in this subtree.
    ///
    /// For a well-formed tree this equals `value` at every node.
    pub fn leaf_total(&self) -> u64 {
        match &self.children {
            Some(children) => children.iter().map(DiskNode::leaf_total).sum(),
            None => self.value,
        }
    }
}
