//! Outrig Core - shared types for externally-built suite modules
//!
//! This crate provides the error types, suite configuration and library
//! reference resolution used by the task and tree-sync crates.

pub mod config;
pub mod error;
pub mod library;

pub use config::{SuiteConfig, SuiteLayout};
pub use error::{BuildError, ConfigError, MismatchKind, OutrigError, Result, SyncError};
pub use library::{LibraryRef, PathLibrary};
