//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use outrig_core::config::{load_config, load_config_or_default};
use outrig_core::SuiteConfig;
use outrig_tasks::Suite;

use commands::{
    ArtifactsCommand, BuildCommand, CleanCommand, InitCommand, RunCommand, TestCommand,
    VerifyCommand,
};

/// Outrig - build orchestration for externally-built suite modules
#[derive(Debug, Parser)]
#[command(name = "outrig")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Suite configuration file (defaults to searching for outrig.toml)
    #[arg(long, global = true, env = "OUTRIG_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a starter suite configuration
    Init(InitCommand),

    /// Build externally-built projects
    Build(BuildCommand),

    /// Remove library links and run the build tool's clean phase
    Clean(CleanCommand),

    /// List build artifacts of distributable projects
    Artifacts(ArtifactsCommand),

    /// Run the packaged product
    Run(RunCommand),

    /// Run the build tool's unit tests
    Test(TestCommand),

    /// Verify the mirrored source tree matches the canonical tree
    Verify(VerifyCommand),
}

/// Loaded configuration and the projects it describes
pub struct Workspace {
    pub config: SuiteConfig,
    pub suite: Suite,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)
                .with_context(|| format!("cannot change directory to {}", dir.display()))?;
        }

        match self.command {
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Build(ref cmd) => cmd.execute(&self),
            Commands::Clean(ref cmd) => cmd.execute(&self),
            Commands::Artifacts(ref cmd) => cmd.execute(&self),
            Commands::Run(ref cmd) => cmd.execute(&self),
            Commands::Test(ref cmd) => cmd.execute(&self),
            Commands::Verify(ref cmd) => cmd.execute(&self),
        }
    }

    /// Load the suite configuration and build its projects
    pub fn workspace(&self) -> anyhow::Result<Workspace> {
        let cwd = std::env::current_dir()?;
        let (config, base) = match &self.config {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.clone()
                } else {
                    cwd.join(path)
                };
                let config = load_config(&path)?;
                let base = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                (config, base)
            }
            None => load_config_or_default(&cwd)?,
        };
        let suite = Suite::from_config(&config, &base);
        Ok(Workspace { config, suite })
    }
}
