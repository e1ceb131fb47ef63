//! ASCII tree rendering of the filtered directory structure.

use std::fs;
use std::path::{Path, PathBuf};

use crate::filter::ExclusionConfig;

/// Renders the tree block for `root`: one line per surviving entry,
/// directories first and suffixed with `/`, sorted case-insensitively within
/// each directory. Applies the same exclusion predicate as the walker, so the
/// tree and the content records always agree. Unreadable directories render
/// as empty subtrees.
pub fn render(root: &Path, config: &ExclusionConfig, follow_links: bool) -> Vec<String> {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());
    let mut lines = vec![format!("{name}/")];
    render_into(root, "", config, follow_links, &mut lines);
    lines
}

fn render_into(
    dir: &Path,
    prefix: &str,
    config: &ExclusionConfig,
    follow_links: bool,
    lines: &mut Vec<String>,
) {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return;
    };

    let mut entries: Vec<(String, bool, PathBuf)> = Vec::new();
    for entry in read_dir.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = match entry.file_type() {
            // Symlinks to directories only appear when followed; any other
            // symlink is a file leaf, which is exactly what the walker
            // records. Keeps both artifact sections in agreement.
            Ok(ft) if ft.is_symlink() => {
                if path.is_dir() {
                    if !follow_links {
                        continue;
                    }
                    true
                } else {
                    false
                }
            }
            Ok(ft) => ft.is_dir(),
            Err(_) => continue,
        };
        if config.skips(&path, is_dir) {
            continue;
        }
        entries.push((name, is_dir, path));
    }
    entries.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| a.0.to_lowercase().cmp(&b.0.to_lowercase()))
    });

    let count = entries.len();
    for (i, (name, is_dir, path)) in entries.into_iter().enumerate() {
        let last = i + 1 == count;
        let connector = if last { "└── " } else { "├── " };
        if is_dir {
            lines.push(format!("{prefix}{connector}{name}/"));
            let continuation = if last { "    " } else { "│   " };
            render_into(
                &path,
                &format!("{prefix}{continuation}"),
                config,
                follow_links,
                lines,
            );
        } else {
            lines.push(format!("{prefix}{connector}{name}"));
        }
    }
}
