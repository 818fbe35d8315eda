//! Init command

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use outrig_core::config::{DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_TOML};

use crate::cli::{output, Cli};

/// Write a starter suite configuration
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Overwrite an existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, "executing init command");
        let cwd = std::env::current_dir()?;
        let config_path = self
            .output
            .as_ref()
            .map(|path| cwd.join(path))
            .unwrap_or_else(|| cwd.join(DEFAULT_CONFIG_TOML));

        write_template(&config_path, self.force)?;

        if !cli.quiet {
            output::success(&format!(
                "Created {}",
                output::path_style().apply_to(config_path.display())
            ));
        }
        Ok(())
    }
}

fn write_template(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
    info!(path = %path.display(), "wrote configuration template");
    Ok(())
}
