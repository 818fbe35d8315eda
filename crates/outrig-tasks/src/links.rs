//! Library symlinks inside a module's `lib/` directory
//!
//! The set of links is never recorded anywhere. Both creation and removal
//! derive it from the current library list through [`library_links`], so
//! the two phases always agree on which paths they touch.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use outrig_core::{BuildError, LibraryRef};

/// A resolved library and the link that exposes it to the module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryLink {
    /// Resolved library path
    pub target: PathBuf,
    /// `<lib_dir>/<basename(target)>`
    pub link: PathBuf,
}

impl LibraryLink {
    /// Link target expressed relative to the link's parent directory
    pub fn relative_target(&self) -> PathBuf {
        let parent = self.link.parent().unwrap_or_else(|| Path::new("."));
        relative_path(parent, &self.target)
    }
}

/// Map each library to the link path it occupies under `lib_dir`
pub fn library_links(lib_dir: &Path, libraries: &[Arc<dyn LibraryRef>]) -> Vec<LibraryLink> {
    libraries
        .iter()
        .map(|lib| {
            let target = lib.path();
            let file_name = target
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| lib.name().into());
            LibraryLink {
                link: lib_dir.join(file_name),
                target,
            }
        })
        .collect()
}

/// Create every link, creating `lib_dir` first if needed.
///
/// An existing entry at a link path is an error; stale links from an
/// earlier run must be removed by a clean first.
pub fn create_links(lib_dir: &Path, links: &[LibraryLink]) -> Result<(), BuildError> {
    if links.is_empty() {
        return Ok(());
    }

    fs::create_dir_all(lib_dir).map_err(|source| BuildError::LinkFailed {
        link: lib_dir.to_path_buf(),
        target: lib_dir.to_path_buf(),
        source,
    })?;

    for entry in links {
        let relative = entry.relative_target();
        info!(
            from = %relative.display(),
            link = %entry.link.display(),
            "symlink library"
        );
        symlink(&relative, &entry.target, &entry.link).map_err(|source| {
            BuildError::LinkFailed {
                link: entry.link.clone(),
                target: relative.clone(),
                source,
            }
        })?;
    }

    Ok(())
}

/// Remove every link that is present. Missing links are skipped.
///
/// Returns the number of links removed.
pub fn remove_links(links: &[LibraryLink]) -> Result<usize, BuildError> {
    let mut removed = 0;
    for entry in links {
        // symlink_metadata sees dangling links that exists() would miss
        if fs::symlink_metadata(&entry.link).is_err() {
            debug!(link = %entry.link.display(), "link already absent");
            continue;
        }
        remove_link(&entry.link).map_err(|source| BuildError::UnlinkFailed {
            link: entry.link.clone(),
            source,
        })?;
        debug!(link = %entry.link.display(), "removed library link");
        removed += 1;
    }
    Ok(removed)
}

#[cfg(unix)]
fn symlink(relative: &Path, _target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(relative, link)
}

#[cfg(windows)]
fn symlink(relative: &Path, target: &Path, link: &Path) -> io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(relative, link)
    } else {
        std::os::windows::fs::symlink_file(relative, link)
    }
}

#[cfg(unix)]
fn remove_link(link: &Path) -> io::Result<()> {
    fs::remove_file(link)
}

#[cfg(windows)]
fn remove_link(link: &Path) -> io::Result<()> {
    // Directory symlinks are removed as directories on Windows
    fs::remove_file(link).or_else(|_| fs::remove_dir(link))
}

/// Compute the path of `to` relative to the directory `from`.
///
/// Both paths are made absolute against the current directory and
/// normalised lexically, without touching the filesystem.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from = normalize(&absolute(from));
    let to = normalize(&absolute(to));

    let from_parts: Vec<Component<'_>> = from.components().collect();
    let to_parts: Vec<Component<'_>> = to.components().collect();

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..from_parts.len() {
        result.push("..");
    }
    for part in &to_parts[common..] {
        result.push(part.as_os_str());
    }

    if result.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        result
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
