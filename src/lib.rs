//! # Textsnap
//!
//! `textsnap` walks a directory tree and writes a single plain-text artifact:
//! the full contents of every detected text file, a placeholder record for
//! binary files, an ASCII rendering of the filtered tree, and a summary of
//! counts. The artifact is meant to be read by humans or ingested by LLMs as
//! a one-file view of a source tree.
//!
//! Exclusion rules (built-in directory/file tables, user globs, and optional
//! simplified `.gitignore` patterns) are compiled once into an immutable
//! configuration shared by the file walk and the tree rendering, so the two
//! sections of the artifact always agree.
//!
//! # Features
//!
//! - `logging`: Enables debug logging via the `tracing` crate.
//!
//! # Example
//!
//! ```no_run
//! use textsnap::{SnapshotBuilder, snapshot};
//!
//! let options = SnapshotBuilder::new(".", "project.snapshot")
//!     .respect_gitignore(true)
//!     .follow_links(false)
//!     .build();
//!
//! let summary = snapshot(&options).expect("snapshot failed");
//! println!(
//!     "wrote {} text files, skipped {}",
//!     summary.text_files, summary.skipped
//! );
//! ```

mod classify;
mod content;
mod error;
mod filter;
mod options;
mod snapshot;
mod tree;
mod walker;
mod writer;

pub use classify::{Bom, is_text};
pub use content::read_text;
pub use error::SnapshotError;
pub use filter::ExclusionConfig;
pub use options::{SnapshotBuilder, SnapshotOptions};
pub use snapshot::snapshot;
pub use tree::render as render_tree;
pub use walker::{FileEntry, collect_files};
pub use writer::Summary;
