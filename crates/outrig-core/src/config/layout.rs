//! Resolved suite layout

use std::path::{Path, PathBuf};

use super::types::SuiteSection;

/// Absolute suite paths shared by every project descriptor.
///
/// Built once from the configuration and handed to each descriptor, so the
/// shared output root is an explicit value rather than a global lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteLayout {
    /// Suite root
    pub root: PathBuf,
    /// Conventional module subdirectory name
    pub module_dir: String,
    /// Shared build output root
    pub output_root: PathBuf,
    /// Directory the tool's clean phase runs in
    pub clean_root: PathBuf,
}

impl SuiteLayout {
    /// Create a layout rooted at `root` with conventional defaults
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_section(&SuiteSection::default(), &root.into())
    }

    /// Resolve a config section against the directory holding the config file
    pub fn from_section(section: &SuiteSection, base: &Path) -> Self {
        let root = join_relative(base, &section.root);
        Self {
            output_root: join_relative(&root, &section.output_root),
            clean_root: join_relative(&root, &section.clean_root),
            module_dir: section.module_dir.clone(),
            root,
        }
    }

    /// Resolve a path relative to the suite root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        join_relative(&self.root, path)
    }
}

fn join_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    if path == Path::new(".") {
        return base.to_path_buf();
    }
    base.join(path)
}
