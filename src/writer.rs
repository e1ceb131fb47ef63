//! Artifact serialization.
//!
//! The output layout is a wire contract for downstream consumers: per-file
//! records delimited by 80-character `=` lines, then a `PROJECT TREE` block,
//! then a `SUMMARY` block. Field ordering and label text are fixed.

use std::io::Write;

use crate::classify;
use crate::content;
use crate::error::SnapshotError;
use crate::walker::FileEntry;

pub(crate) const SEPARATOR: &str =
    "================================================================================";

const OMITTED_MARKER: &str = "UNSUPPORTED/NON-TEXT";
const ERROR_MARKER: &str = "READ_ERROR";

/// Counts reported at the end of a run.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Files whose decoded contents were written.
    pub text_files: usize,
    /// Binary, omitted, or unreadable files.
    pub skipped: usize,
    /// All files the walker produced.
    pub total: usize,
    /// Resolved path of the artifact.
    pub output: std::path::PathBuf,
}

fn write_record_header<W: Write>(
    out: &mut W,
    rel_path: &str,
    size: Option<u64>,
    marker: Option<&str>,
) -> Result<(), SnapshotError> {
    writeln!(out, "{SEPARATOR}")?;
    write!(out, "FILE: {rel_path}")?;
    if let Some(size) = size {
        write!(out, "  (size: {size} bytes)")?;
    }
    if let Some(marker) = marker {
        write!(out, "  [{marker}]")?;
    }
    writeln!(out)?;
    writeln!(out, "{SEPARATOR}")?;
    Ok(())
}

/// Writes every file record, the tree block, and the summary block to `out`.
/// Classification and reading happen here, per file; a failed read becomes an
/// inline `[ERROR]` record and the loop continues.
pub fn write_snapshot<W: Write>(
    out: &mut W,
    files: &[FileEntry],
    tree_lines: &[String],
) -> Result<(usize, usize), SnapshotError> {
    let mut text_count = 0usize;
    let mut skipped = 0usize;

    for entry in files {
        let rel_path = entry.display_path();
        if classify::is_text(&entry.path) {
            match content::read_text(&entry.path) {
                Ok(text) => {
                    write_record_header(out, &rel_path, entry.size, None)?;
                    out.write_all(text.as_bytes())?;
                    if !text.ends_with('\n') {
                        out.write_all(b"\n")?;
                    }
                    out.write_all(b"\n")?;
                    text_count += 1;
                }
                Err(e) => {
                    #[cfg(feature = "logging")]
                    tracing::debug!("read failed for {}: {e}", entry.path.display());
                    write_record_header(out, &rel_path, entry.size, Some(ERROR_MARKER))?;
                    writeln!(out, "[ERROR] {e}\n")?;
                    skipped += 1;
                }
            }
        } else {
            write_record_header(out, &rel_path, entry.size, Some(OMITTED_MARKER))?;
            out.write_all(b"(contents omitted)\n\n")?;
            skipped += 1;
        }
    }

    writeln!(out, "{SEPARATOR}\nPROJECT TREE\n{SEPARATOR}")?;
    for line in tree_lines {
        writeln!(out, "{line}")?;
    }

    writeln!(out)?;
    writeln!(out, "{SEPARATOR}\nSUMMARY\n{SEPARATOR}")?;
    writeln!(out, "Text files written : {text_count}")?;
    writeln!(out, "Non-text/omitted   : {skipped}")?;
    writeln!(out, "Total files seen   : {}", files.len())?;

    Ok((text_count, skipped))
}
