//! Library reference resolution

use std::fmt;
use std::path::PathBuf;

use crate::config::{LibraryConfig, SuiteLayout};

/// An opaque library handle that can be resolved to a filesystem path.
///
/// Resolution carries no build logic; the path may or may not exist yet.
pub trait LibraryRef: fmt::Debug + Send + Sync {
    /// Library name
    fn name(&self) -> &str;

    /// Filesystem location of the library
    fn path(&self) -> PathBuf;
}

/// A library whose location is fixed in configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLibrary {
    name: String,
    path: PathBuf,
}

impl PathLibrary {
    /// Create a library at an explicit path
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Create a library from configuration, resolving relative paths against the suite root
    pub fn from_config(config: &LibraryConfig, layout: &SuiteLayout) -> Self {
        Self::new(config.name.clone(), layout.resolve(&config.path))
    }
}

impl LibraryRef for PathLibrary {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }
}
