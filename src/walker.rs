//! Depth-first file collection with in-place directory pruning.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::filter::ExclusionConfig;

/// One file surviving the walk: absolute path, root-relative path, and a
/// best-effort size in bytes.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub relative: PathBuf,
    pub size: Option<u64>,
}

impl FileEntry {
    /// Relative path with `/` separators, as written to the artifact.
    pub fn display_path(&self) -> String {
        let parts: Vec<String> = self
            .relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        parts.join("/")
    }
}

/// Walks `root` depth-first, pruning excluded directories before descending
/// into them, and returns the surviving files sorted case-insensitively by
/// relative path. Hidden files are included; symlinked directories are only
/// followed when `follow_links` is set, while symlinks to anything else are
/// listed like regular files. Unreadable subtrees are skipped, not fatal.
pub fn collect_files(root: &Path, config: &ExclusionConfig, follow_links: bool) -> Vec<FileEntry> {
    let mut builder = WalkBuilder::new(root);
    builder
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .hidden(false)
        .follow_links(follow_links);
    let filter = config.clone();
    builder.filter_entry(move |entry| {
        let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
        !filter.skips(entry.path(), is_dir)
    });

    let mut files = Vec::new();
    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            // Unreadable directories and symlink loops lose their subtree
            // but never abort the run.
            Err(_e) => {
                #[cfg(feature = "logging")]
                tracing::debug!("walk error skipped: {_e}");
                continue;
            }
        };
        let is_file = match entry.file_type() {
            // Non-followed symlinks count as files unless they point at a
            // directory, matching what the tree renders.
            Some(ft) if ft.is_symlink() => !entry.path().is_dir(),
            Some(ft) => ft.is_file(),
            None => false,
        };
        if !is_file {
            continue;
        }
        let path = entry.path().to_path_buf();
        let relative = path
            .strip_prefix(root)
            .unwrap_or(path.as_path())
            .to_path_buf();
        let size = entry.metadata().ok().map(|m| m.len());
        files.push(FileEntry {
            path,
            relative,
            size,
        });
    }
    files.sort_by_key(|entry| entry.display_path().to_lowercase());
    #[cfg(feature = "logging")]
    tracing::debug!("collected {} files under {}", files.len(), root.display());
    files
}
