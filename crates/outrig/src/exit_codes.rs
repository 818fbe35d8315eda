//! Exit codes for the CLI

use outrig_core::{BuildError, ConfigError, OutrigError, SyncError};

/// General error
pub const ERROR: u8 = 1;

/// Configuration error
pub const CONFIG_ERROR: u8 = 2;

/// Missing directory or nothing to verify
pub const PRECONDITION_ERROR: u8 = 3;

/// External tool exited nonzero or could not start
pub const TOOL_ERROR: u8 = 4;

/// Mirror tree differs from the canonical tree
pub const MISMATCH_ERROR: u8 = 5;

/// Map an error to the exit code of the first recognised cause
pub fn for_error(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| {
            if let Some(e) = cause.downcast_ref::<OutrigError>() {
                return Some(match e {
                    OutrigError::Config(_) => CONFIG_ERROR,
                    OutrigError::Build(b) => for_build(b),
                    OutrigError::Sync(s) => for_sync(s),
                    OutrigError::Io(_) => ERROR,
                });
            }
            if cause.downcast_ref::<ConfigError>().is_some() {
                return Some(CONFIG_ERROR);
            }
            if let Some(e) = cause.downcast_ref::<BuildError>() {
                return Some(for_build(e));
            }
            cause.downcast_ref::<SyncError>().map(for_sync)
        })
        .unwrap_or(ERROR)
}

fn for_build(err: &BuildError) -> u8 {
    match err {
        BuildError::SourceRootMissing(_) => PRECONDITION_ERROR,
        BuildError::ToolFailed { .. } | BuildError::Spawn { .. } => TOOL_ERROR,
        _ => ERROR,
    }
}

fn for_sync(err: &SyncError) -> u8 {
    match err {
        SyncError::RootMissing { .. } | SyncError::NoFiles(_) => PRECONDITION_ERROR,
        SyncError::Mismatch { .. } => MISMATCH_ERROR,
        _ => ERROR,
    }
}
