//! Exclusion filtering shared by the walker and the tree renderer.
//!
//! An [`ExclusionConfig`] is assembled once at startup from the built-in
//! tables, user-supplied glob patterns, and (optionally) patterns derived
//! from every `.gitignore` under the root. It is never mutated afterwards;
//! both traversal passes evaluate the same [`ExclusionConfig::skips`]
//! predicate so the content records and the tree block cannot disagree.
//!
//! The `.gitignore` handling is a deliberate approximation: each non-blank,
//! non-comment, non-negated line becomes a basename glob. Negation (`!`),
//! path anchoring (`/prefix`), and `**` semantics are not supported.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use regex::Regex;

use crate::error::SnapshotError;
use crate::options::SnapshotOptions;

/// Directory names pruned by default: VCS internals, editor state, build
/// output, caches, and dependency trees.
const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    // VCS
    ".git", ".hg", ".svn", ".bzr",
    // Editors / IDEs
    ".idea", ".vscode", ".vs",
    // Python
    "__pycache__", ".pytest_cache", ".mypy_cache", ".ruff_cache", ".tox",
    ".venv", "venv", ".eggs",
    // JavaScript / TypeScript
    "node_modules", "bower_components", ".npm", ".yarn", ".pnpm-store",
    ".next", ".nuxt", ".output", "coverage", ".nyc_output",
    // Build output
    "target", "dist", "build", "out",
    // Caches and site generators
    ".cache", ".sass-cache", ".gradle", ".m2", ".terraform",
    "_site", ".jekyll-cache", ".docusaurus",
    // Mobile
    "Pods", "xcuserdata", ".expo",
];

/// Directory name regexes applied on top of the static set.
const DEFAULT_DIR_REGEXES: &[&str] = &[r"\.egg-info$"];

/// File basenames skipped by default: lockfiles, OS metadata, coverage data.
const DEFAULT_EXCLUDED_FILES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Cargo.lock",
    "composer.lock",
    "Gemfile.lock",
    "poetry.lock",
    "Pipfile.lock",
    ".DS_Store",
    "Thumbs.db",
    "desktop.ini",
    "ehthumbs.db",
    ".coverage",
];

/// File basename globs skipped by default: compiled artifacts, minified map
/// files, local env files, and generic `.txt` (so earlier snapshot artifacts
/// are not re-ingested).
const DEFAULT_FILE_GLOBS: &[&str] = &[
    "*.pyc", "*.pyo", "*.pyd",
    "*.class", "*.o", "*.so", "*.dylib", "*.dll", "*.exe",
    "*.min.js.map", "*.min.css.map",
    ".env.*",
    "*.txt",
];

/// Immutable exclusion rules, built once per run.
#[derive(Debug, Clone)]
pub struct ExclusionConfig {
    use_defaults: bool,
    dir_regexes: Vec<Regex>,
    dir_globs: GlobSet,
    file_globs: GlobSet,
    output_path: Option<PathBuf>,
}

impl ExclusionConfig {
    /// Assembles the config from options, scanning for `.gitignore` files
    /// under `root` when requested. `output` is the resolved artifact path,
    /// excluded from its own listing.
    pub fn build(
        options: &SnapshotOptions,
        root: &Path,
        output: Option<&Path>,
    ) -> Result<Self, SnapshotError> {
        let mut dir_patterns = options.exclude_dirs.clone();
        let mut file_patterns = options.exclude_files.clone();
        if options.use_default_excludes {
            file_patterns.extend(DEFAULT_FILE_GLOBS.iter().map(|s| s.to_string()));
        }
        let dir_regexes = if options.use_default_excludes {
            DEFAULT_DIR_REGEXES
                .iter()
                .map(|pattern| {
                    Regex::new(pattern).map_err(|e| SnapshotError::Pattern {
                        pattern: pattern.to_string(),
                        message: e.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?
        } else {
            Vec::new()
        };

        let mut config = Self {
            use_defaults: options.use_default_excludes,
            dir_regexes,
            dir_globs: compile_globs(&dir_patterns)?,
            file_globs: compile_globs(&file_patterns)?,
            output_path: output.map(Path::to_path_buf),
        };

        if options.respect_gitignore {
            let (extra_dirs, extra_files) = gitignore_patterns(root, &config);
            if !extra_dirs.is_empty() || !extra_files.is_empty() {
                dir_patterns.extend(extra_dirs);
                file_patterns.extend(extra_files);
                config.dir_globs = compile_globs(&dir_patterns)?;
                config.file_globs = compile_globs(&file_patterns)?;
            }
        }

        Ok(config)
    }

    /// Whether a directory with this basename is pruned from traversal.
    pub fn dir_excluded(&self, name: &str) -> bool {
        if self.use_defaults && DEFAULT_EXCLUDED_DIRS.contains(&name) {
            return true;
        }
        if self.dir_regexes.iter().any(|re| re.is_match(name)) {
            return true;
        }
        self.dir_globs.is_match(name)
    }

    /// Whether a file with this basename is skipped.
    pub fn file_excluded(&self, name: &str) -> bool {
        if self.use_defaults && DEFAULT_EXCLUDED_FILES.contains(&name) {
            return true;
        }
        self.file_globs.is_match(name)
    }

    /// The single pruning predicate shared by the walker and tree renderer.
    pub fn skips(&self, path: &Path, is_dir: bool) -> bool {
        let Some(name) = path.file_name().and_then(OsStr::to_str) else {
            return false;
        };
        if is_dir {
            self.dir_excluded(name)
        } else {
            self.file_excluded(name) || self.output_path.as_deref() == Some(path)
        }
    }
}

fn compile_globs(patterns: &[String]) -> Result<GlobSet, SnapshotError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| SnapshotError::Pattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| SnapshotError::Pattern {
        pattern: String::new(),
        message: e.to_string(),
    })
}

/// Finds every `.gitignore` under `root` (pruning already-excluded
/// directories) and turns its lines into directory and file globs.
/// Unparseable lines are dropped rather than failing the run.
fn gitignore_patterns(root: &Path, base: &ExclusionConfig) -> (Vec<String>, Vec<String>) {
    let mut gitignore_files: Vec<PathBuf> = Vec::new();
    let mut builder = WalkBuilder::new(root);
    builder
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .hidden(false)
        .follow_links(false);
    let filter = base.clone();
    builder.filter_entry(move |entry| {
        match entry.file_type() {
            Some(ft) if ft.is_dir() => entry
                .path()
                .file_name()
                .and_then(OsStr::to_str)
                .is_none_or(|name| !filter.dir_excluded(name)),
            _ => true,
        }
    });
    for result in builder.build() {
        let Ok(entry) = result else { continue };
        if entry.file_type().is_some_and(|ft| ft.is_file())
            && entry.file_name() == OsStr::new(".gitignore")
        {
            gitignore_files.push(entry.path().to_path_buf());
        }
    }
    gitignore_files.sort();

    let mut dir_patterns = Vec::new();
    let mut file_patterns = Vec::new();
    let mut seen: HashSet<(String, bool)> = HashSet::new();
    for path in gitignore_files {
        let Ok(text) = fs::read_to_string(&path) else {
            continue;
        };
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let dir_only = line.ends_with('/');
            let pattern = line.trim_end_matches('/').trim_start_matches('/');
            if pattern.is_empty() || Glob::new(pattern).is_err() {
                continue;
            }
            if seen.insert((pattern.to_string(), dir_only)) {
                dir_patterns.push(pattern.to_string());
                if !dir_only {
                    file_patterns.push(pattern.to_string());
                }
            }
        }
    }
    (dir_patterns, file_patterns)
}
