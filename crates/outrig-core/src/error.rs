//! Error types for Outrig

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using OutrigError
pub type Result<T> = std::result::Result<T, OutrigError>;

/// Main error type for Outrig operations
#[derive(Debug, Error)]
pub enum OutrigError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Build task errors
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Tree verification errors
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Unknown project requested by name
    #[error("Unknown project: {0}")]
    UnknownProject(String),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building or cleaning an externally-built project
#[derive(Debug, Error)]
pub enum BuildError {
    /// The conventional source directory is absent
    #[error("Cannot find {0}")]
    SourceRootMissing(PathBuf),

    /// External tool exited with a nonzero status
    #[error("Command failed in {cwd}: {command} (exit code {})", display_code(.code))]
    ToolFailed {
        command: String,
        cwd: PathBuf,
        code: Option<i32>,
    },

    /// External tool could not be started
    #[error("Failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Library symlink could not be created
    #[error("Failed to symlink {link} -> {target}: {source}")]
    LinkFailed {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Library symlink could not be removed
    #[error("Failed to remove symlink {link}: {source}")]
    UnlinkFailed {
        link: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Permission bits could not be applied
    #[error("Failed to set permissions on {path}: {source}")]
    Permissions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output directory walk failed
    #[error("Failed to list build artifacts under {path}: {message}")]
    ArtifactWalk { path: PathBuf, message: String },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "terminated by signal".to_string(),
    }
}

/// How a mirrored file diverges from its canonical counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    /// One of the two files does not exist
    Missing,
    /// Both exist but their bytes differ
    Content,
}

impl MismatchKind {
    /// Short label used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "file not found",
            Self::Content => "file mismatch",
        }
    }
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tree verification errors
#[derive(Debug, Error)]
pub enum SyncError {
    /// A verification root does not exist
    #[error("{role} directory {path} doesn't exist")]
    RootMissing { role: &'static str, path: PathBuf },

    /// First divergent file pair found in verify mode
    #[error("{kind}: {mirror}")]
    Mismatch {
        kind: MismatchKind,
        canonical: PathBuf,
        mirror: PathBuf,
    },

    /// Canonical tree yielded nothing to verify
    #[error("No files were found to verify under {0}")]
    NoFiles(PathBuf),

    /// Reading a file for comparison failed
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Overwriting a mirror file failed
    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed
    #[error("Failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },
}
