//! Size probing and aggregation-tree building for diskmap.
//!
//! The tree builder walks a directory sequentially, probing each child
//! directory's exact size to decide between expanding it and folding it
//! into a bucket node. The executor runs one build per request on an
//! isolated tokio task and delivers the result through a one-shot
//! channel, keeping the caller's context free of filesystem I/O.

mod builder;
mod executor;
mod probe;
mod visited;

pub use builder::TreeBuilder;
pub use executor::{scan, submit};
pub use probe::compute_size;
pub use visited::{DirIdentity, DirVisits};

// Re-export core types commonly needed alongside the scanner.
pub use diskmap_core::{DiskNode, ScanConfig, ScanConfigBuilder, ScanError};
