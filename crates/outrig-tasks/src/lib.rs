//! Outrig Tasks - build tasks for externally-built projects
//!
//! This crate models modules whose compilation is delegated to an external
//! build tool: their descriptors, the library symlinks they need, and the
//! stateless build task that drives the tool.

pub mod links;
pub mod project;
pub mod runner;
pub mod suite;
pub mod task;
pub mod toolchain;

pub use links::{library_links, LibraryLink};
pub use project::ExternalProject;
pub use runner::{Invocation, ProcessRunner, ToolExit, ToolRunner};
pub use suite::Suite;
pub use task::{BuildDecision, BuildTask};
pub use toolchain::Toolchain;
