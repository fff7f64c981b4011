//! Exact recursive size probing.

use std::fs;
use std::path::Path;

use jwalk::WalkDir;

/// Compute the exact recursive byte size of a path.
///
/// Files report their metadata length. Directories are walked in parallel
/// and every reachable file's size is summed. Symlinks are never followed.
/// A probe never fails outright: any stat or readdir failure is swallowed
/// and the affected entry contributes zero.
pub fn compute_size(path: &Path) -> u64 {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "size probe: stat failed");
            return 0;
        }
    };

    if !metadata.is_dir() {
        return metadata.len();
    }

    WalkDir::new(path)
        .skip_hidden(false)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|m| m.len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_probe_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f.bin");
        fs::write(&file, vec![0u8; 1234]).unwrap();
        assert_eq!(compute_size(&file), 1234);
    }

    #[test]
    fn test_probe_directory_sums_recursively() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("a"), vec![0u8; 100]).unwrap();
        fs::write(root.join("sub/b"), vec![0u8; 200]).unwrap();
        fs::write(root.join(".hidden"), vec![0u8; 50]).unwrap();

        assert_eq!(compute_size(root), 350);
    }

    #[test]
    fn test_probe_missing_path_is_zero() {
        assert_eq!(compute_size(Path::new("/does/not/exist/anywhere")), 0);
    }
}
