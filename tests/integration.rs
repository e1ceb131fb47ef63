use std::fs;
use tempfile::tempdir;
use textsnap::{SnapshotBuilder, snapshot};

const SEPARATOR: &str =
    "================================================================================";

/// End-to-end artifact check over a mixed tree: text sources, one binary
/// file, and an ignored VCS directory.
#[test]
fn integration_full_artifact() {
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::write(root.join("a.py"), "print('hi')\n").unwrap();
    fs::write(root.join("b.bin"), [0u8, 0, 0, 0]).unwrap();
    fs::create_dir_all(root.join("sub/.git")).unwrap();
    fs::write(root.join("sub/.git/config"), "[core]\n").unwrap();
    fs::write(root.join("sub/c.md"), "# notes\n").unwrap();

    let output = root.join("snap.out");
    let options = SnapshotBuilder::new(&root, &output).build();
    let summary = snapshot(&options).unwrap();

    assert_eq!(summary.text_files, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.total, 3);

    let artifact = fs::read_to_string(&output).unwrap();

    // Records appear in case-insensitive relative-path order.
    let a = artifact.find("FILE: a.py").unwrap();
    let b = artifact.find("FILE: b.bin").unwrap();
    let c = artifact.find("FILE: sub/c.md").unwrap();
    assert!(a < b && b < c);

    assert!(artifact.contains("FILE: a.py  (size: 12 bytes)\n"));
    assert!(artifact.contains("print('hi')\n"));
    assert!(artifact.contains("FILE: b.bin  (size: 4 bytes)  [UNSUPPORTED/NON-TEXT]\n"));
    assert!(artifact.contains("(contents omitted)\n"));
    assert!(artifact.contains("# notes\n"));

    // The ignored directory appears nowhere, including the tree block.
    assert!(!artifact.contains(".git"));

    let tree_start = artifact.find("PROJECT TREE").unwrap();
    let tree_block = &artifact[tree_start..];
    assert!(tree_block.contains("├── sub/"));
    assert!(tree_block.contains("│   └── c.md"));
    assert!(tree_block.contains("├── a.py"));
    assert!(tree_block.contains("└── b.bin"));

    let expected_summary = format!(
        "{SEPARATOR}\nSUMMARY\n{SEPARATOR}\nText files written : 2\nNon-text/omitted   : 1\nTotal files seen   : 3\n"
    );
    assert!(artifact.ends_with(&expected_summary));
}

/// The artifact never lists itself, so the header/record structure stays
/// stable across reruns.
#[test]
fn integration_artifact_excludes_itself() {
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::write(root.join("only.md"), "content\n").unwrap();
    let output = root.join("snap.out");
    let options = SnapshotBuilder::new(&root, &output).build();

    snapshot(&options).unwrap();
    let summary = snapshot(&options).unwrap();
    assert_eq!(summary.total, 1);
    let artifact = fs::read_to_string(&output).unwrap();
    assert!(!artifact.contains("FILE: snap.out"));
}
