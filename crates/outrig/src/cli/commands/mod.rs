//! CLI commands

mod artifacts;
mod build;
mod clean;
mod init;
mod run;
mod verify;

pub use artifacts::ArtifactsCommand;
pub use build::BuildCommand;
pub use clean::CleanCommand;
pub use init::InitCommand;
pub use run::RunCommand;
pub use test::TestCommand;
pub use verify::VerifyCommand;
