use std::path::PathBuf;
#[derive(Debug, Clone)]
pub struct SnapshotOptions {
    pub root: PathBuf,
    pub output: PathBuf,
    pub exclude_dirs: Vec<String>,
    pub exclude_files: Vec<String>,
    pub follow_links: bool,
    pub use_default_excludes: bool,
    pub respect_gitignore: bool,
}
impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            output: PathBuf::from("snapshot.txt"),
            exclude_dirs: Vec::new(),
            exclude_files: Vec::new(),
            follow_links: false,
            use_default_excludes: true,
            respect_gitignore: false,
        }
    }
}
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    options: SnapshotOptions,
}
impl SnapshotBuilder {
    pub fn new(root: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            options: SnapshotOptions {
                root: root.into(),
                output: output.into(),
                ..Default::default()
            },
        }
    }
    pub fn exclude_dirs(mut self, patterns: Vec<String>) -> Self {
        self.options.exclude_dirs = patterns;
        self
    }
    pub fn exclude_files(mut self, patterns: Vec<String>) -> Self {
        self.options.exclude_files = patterns;
        self
    }
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.options.follow_links = yes;
        self
    }
    pub fn use_default_excludes(mut self, yes: bool) -> Self {
        self.options.use_default_excludes = yes;
        self
    }
    pub fn respect_gitignore(mut self, yes: bool) -> Self {
        self.options.respect_gitignore = yes;
        self
    }
    pub fn build(self) -> SnapshotOptions {
        self.options
    }
}
