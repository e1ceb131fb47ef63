//! End-to-end snapshot run: validate, filter, walk, render, serialize.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::SnapshotError;
use crate::filter::ExclusionConfig;
use crate::options::SnapshotOptions;
use crate::tree;
use crate::walker;
use crate::writer::{self, Summary};

fn resolve_output(path: &Path) -> Result<PathBuf, SnapshotError> {
    if let Ok(resolved) = fs::canonicalize(path) {
        return Ok(resolved);
    }
    // The artifact usually does not exist yet. Canonicalize the parent when
    // possible so self-exclusion still matches walker paths under a
    // symlinked root.
    let abs = std::path::absolute(path).map_err(|e| SnapshotError::io(path, e))?;
    match (abs.parent(), abs.file_name()) {
        (Some(parent), Some(name)) => match fs::canonicalize(parent) {
            Ok(parent) => Ok(parent.join(name)),
            Err(_) => Ok(abs),
        },
        _ => Ok(abs),
    }
}

/// Runs one snapshot: walks `options.root`, streams every record into
/// `options.output`, appends the tree and summary blocks, and returns the
/// final counts.
///
/// Nothing is written when the root is invalid or the walk produces no files,
/// so the failing exit paths leave any previous artifact untouched.
pub fn snapshot(options: &SnapshotOptions) -> Result<Summary, SnapshotError> {
    if !options.root.is_dir() {
        return Err(SnapshotError::RootNotADirectory(options.root.clone()));
    }
    let root = fs::canonicalize(&options.root).map_err(|e| SnapshotError::io(&options.root, e))?;
    let output = resolve_output(&options.output)?;

    let config = ExclusionConfig::build(options, &root, Some(&output))?;
    let files = walker::collect_files(&root, &config, options.follow_links);
    if files.is_empty() {
        return Err(SnapshotError::NoFilesFound);
    }
    #[cfg(feature = "logging")]
    tracing::debug!("writing {} records to {}", files.len(), output.display());

    let tree_lines = tree::render(&root, &config, options.follow_links);

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| SnapshotError::io(parent, e))?;
        }
    }
    let file = File::create(&output).map_err(|e| SnapshotError::io(&output, e))?;
    let mut out = BufWriter::new(file);
    let (text_files, skipped) = writer::write_snapshot(&mut out, &files, &tree_lines)?;
    out.flush()?;

    Ok(Summary {
        text_files,
        skipped,
        total: files.len(),
        output,
    })
}
