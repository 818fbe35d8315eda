//! Artifacts command - list what distributable projects produced

use std::collections::BTreeMap;

use clap::Args;
use console::style;

use crate::cli::{Cli, OutputFormat};

/// List build artifacts of distributable projects
#[derive(Debug, Args)]
pub struct ArtifactsCommand {
    /// Projects to inspect (all configured projects when omitted)
    pub projects: Vec<String>,
}

impl ArtifactsCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let workspace = cli.workspace()?;
        let projects = workspace.suite.select(&self.projects)?;

        let mut listing = BTreeMap::new();
        for project in projects {
            let artifacts: Vec<String> = project
                .build_artifacts()?
                .into_iter()
                .map(|p| p.display().to_string())
                .collect();
            listing.insert(project.name().to_string(), artifacts);
        }

        if cli.format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&listing)?);
            return Ok(());
        }

        for (name, artifacts) in &listing {
            println!("{} ({} files)", style(name).bold(), artifacts.len());
            for artifact in artifacts {
                println!("  {}", style(artifact).cyan());
            }
        }

        Ok(())
    }
}
