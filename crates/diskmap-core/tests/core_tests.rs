use diskmap_core::{
    Category, DiskNode, FOLDER_BUCKET_LABEL, MISC_BUCKET_LABEL, ScanConfig, ScanError,
};
use std::path::PathBuf;

#[test]
fn test_category_table_covers_all_groups() {
    assert_eq!(Category::from_extension("ts"), Category::Code);
    assert_eq!(Category::from_extension("toml"), Category::Code);
    assert_eq!(Category::from_extension("webm"), Category::Media);
    assert_eq!(Category::from_extension("docx"), Category::Docs);
    assert_eq!(Category::from_extension("so"), Category::System);
    assert_eq!(Category::from_extension(""), Category::Other);
    assert_eq!(Category::from_extension("weird"), Category::Other);
}

#[test]
fn test_disk_node_invariant_holds_for_nested_tree() {
    let sub = DiskNode::directory(
        "sub",
        "/root/sub",
        vec![
            DiskNode::file("big.mp4", 10_000_000, "/root/sub/big.mp4"),
            DiskNode::bucket(MISC_BUCKET_LABEL, 2_048),
        ],
    );
    let root = DiskNode::directory(
        "root",
        "/root",
        vec![sub, DiskNode::bucket(FOLDER_BUCKET_LABEL, 500_000)],
    );

    assert_eq!(root.value, 10_000_000 + 2_048 + 500_000);
    assert_eq!(root.value, root.leaf_total());

    // Every expanded directory sums its children.
    let children = root.children.as_ref().unwrap();
    for child in children {
        if let Some(grandchildren) = &child.children {
            let sum: u64 = grandchildren.iter().map(|c| c.value).sum();
            assert_eq!(child.value, sum);
        }
    }
}

#[test]
fn test_disk_node_serializes_camel_case() {
    let node = DiskNode::directory(
        "root",
        "/root",
        vec![DiskNode::file("a.rs", 6_000_000, "/root/a.rs")],
    );

    let json = serde_json::to_value(&node).unwrap();
    assert_eq!(json["id"], "root");
    assert_eq!(json["category"], "folder");
    assert_eq!(json["children"][0]["category"], "code");
    assert_eq!(json["children"][0]["value"], 6_000_000);

    // Bucket nodes omit the path entirely.
    let bucket = DiskNode::bucket(MISC_BUCKET_LABEL, 7);
    let json = serde_json::to_value(&bucket).unwrap();
    assert!(json.get("path").is_none());
    assert!(json.get("children").is_none());
}

#[test]
fn test_scan_config_defaults_and_builder() {
    let config = ScanConfig::new("/data");
    assert_eq!(config.root, PathBuf::from("/data"));
    assert_eq!(config.small_file_threshold, 5 * 1024 * 1024);
    assert_eq!(config.small_dir_threshold, 1024 * 1024);

    let config = ScanConfig::builder()
        .root("/data")
        .max_depth(1u32)
        .small_dir_threshold(10u64)
        .build()
        .unwrap();
    assert_eq!(config.max_depth, 1);
    assert_eq!(config.small_dir_threshold, 10);
}

#[test]
fn test_scan_error_display() {
    let err = ScanError::NotADirectory {
        path: PathBuf::from("/tmp/file.txt"),
    };
    assert!(err.to_string().contains("/tmp/file.txt"));

    let err = ScanError::WorkerFailed {
        message: "panicked".to_string(),
    };
    assert!(err.to_string().contains("panicked"));
}
