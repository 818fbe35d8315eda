//! Canonical/mirror tree verification
//!
//! Every regular file under the canonical root must have a byte-identical
//! counterpart at the same relative path under the mirror root. Files that
//! exist only in the mirror are not checked.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info};
use walkdir::WalkDir;

use outrig_core::{MismatchKind, SyncError};

use crate::compare::files_equal;

/// What to do when a mirrored file diverges
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Stop at the first divergent file
    #[default]
    Verify,
    /// Overwrite divergent mirror files from the canonical tree
    Sync,
}

/// Options for a verification run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Verify or sync
    pub mode: SyncMode,
    /// Suppress the confirmation line on success
    pub quiet: bool,
}

impl VerifyOptions {
    /// Fail-fast verification
    pub fn verify() -> Self {
        Self::default()
    }

    /// Overwrite-sync
    pub fn sync() -> Self {
        Self {
            mode: SyncMode::Sync,
            quiet: false,
        }
    }

    /// Set quiet mode
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    /// Mode the run used
    pub mode: SyncMode,
    /// Canonical files visited
    pub verified: usize,
    /// Relative paths overwritten in the mirror, in traversal order
    pub synced: Vec<PathBuf>,
}

impl VerifyReport {
    /// Whether the mirror already matched
    pub fn is_unchanged(&self) -> bool {
        self.synced.is_empty()
    }
}

/// Compares a canonical tree against its mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeVerifier {
    canonical: PathBuf,
    mirror: PathBuf,
}

impl TreeVerifier {
    /// Create a verifier for a canonical/mirror pair
    pub fn new(canonical: impl Into<PathBuf>, mirror: impl Into<PathBuf>) -> Self {
        Self {
            canonical: canonical.into(),
            mirror: mirror.into(),
        }
    }

    /// Vendored root
    pub fn mirror(&self) -> &Path {
        &self.mirror
    }

    /// Walk the canonical tree and check or heal every file.
    ///
    /// Traversal is sorted by file name so logs are reproducible. In verify
    /// mode the first mismatch aborts the run; in sync mode each mismatch is
    /// overwritten and the walk continues.
    pub fn run(&self, options: VerifyOptions) -> Result<VerifyReport, SyncError> {
        require_dir("canonical", &self.canonical)?;
        require_dir("mirror", &self.mirror)?;

        info!(
            canonical = %self.canonical.display(),
            mirror = %self.mirror.display(),
            mode = ?options.mode,
            "verifying tree"
        );

        let mut report = VerifyReport {
            mode: options.mode,
            ..VerifyReport::default()
        };

        for entry in WalkDir::new(&self.canonical).sort_by_file_name() {
            let entry = entry.map_err(|e| SyncError::Walk {
                path: self.canonical.clone(),
                message: e.to_string(),
            })?;
            // Follows symlinked files, skips directories and dangling links
            if entry.file_type().is_dir() || !entry.path().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.canonical)
                .unwrap_or(entry.path())
                .to_path_buf();
            let canonical_file = entry.path();
            let mirror_file = self.mirror.join(&relative);

            match compare(canonical_file, &mirror_file)? {
                None => {
                    debug!(
                        file = %common_suffix(canonical_file, &mirror_file).display(),
                        "file matches"
                    );
                }
                Some(kind) => {
                    self.handle_mismatch(options.mode, kind, canonical_file, &mirror_file)?;
                    report.synced.push(relative);
                }
            }
            report.verified += 1;
        }

        if report.verified == 0 {
            error!(canonical = %self.canonical.display(), "no files were found to verify");
            return Err(SyncError::NoFiles(self.canonical.clone()));
        }

        if options.mode == SyncMode::Verify && !options.quiet {
            info!(
                mirror = %self.mirror.display(),
                files = report.verified,
                "mirror is unchanged"
            );
        }

        Ok(report)
    }

    fn handle_mismatch(
        &self,
        mode: SyncMode,
        kind: MismatchKind,
        canonical_file: &Path,
        mirror_file: &Path,
    ) -> Result<(), SyncError> {
        match mode {
            SyncMode::Sync => {
                info!(
                    mirror = %mirror_file.display(),
                    canonical = %canonical_file.display(),
                    reason = %kind,
                    "overriding mirror file from canonical"
                );
                overwrite(canonical_file, mirror_file)
            }
            SyncMode::Verify => {
                error!(
                    reason = %kind,
                    canonical = %canonical_file.display(),
                    mirror = %mirror_file.display(),
                    "mirror differs from canonical tree; synchronize the pair or re-run with --sync"
                );
                Err(SyncError::Mismatch {
                    kind,
                    canonical: canonical_file.to_path_buf(),
                    mirror: mirror_file.to_path_buf(),
                })
            }
        }
    }
}

fn require_dir(role: &'static str, path: &Path) -> Result<(), SyncError> {
    if path.is_dir() {
        Ok(())
    } else {
        error!(role, path = %path.display(), "verification root doesn't exist");
        Err(SyncError::RootMissing {
            role,
            path: path.to_path_buf(),
        })
    }
}

/// `None` when the pair is identical, otherwise how it differs
fn compare(canonical: &Path, mirror: &Path) -> Result<Option<MismatchKind>, SyncError> {
    if !canonical.is_file() || !mirror.is_file() {
        return Ok(Some(MismatchKind::Missing));
    }
    let equal = files_equal(canonical, mirror).map_err(|source| SyncError::Read {
        path: canonical.to_path_buf(),
        source,
    })?;
    Ok((!equal).then_some(MismatchKind::Content))
}

fn overwrite(from: &Path, to: &Path) -> Result<(), SyncError> {
    let copy_err = |source| SyncError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(copy_err)?;
    }
    fs::copy(from, to).map_err(copy_err)?;
    Ok(())
}

/// Longest run of trailing path components the two paths share
fn common_suffix(a: &Path, b: &Path) -> PathBuf {
    let a: Vec<_> = a.components().collect();
    let b: Vec<_> = b.components().collect();
    let shared = a
        .iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    a[a.len() - shared..].iter().collect()
}
