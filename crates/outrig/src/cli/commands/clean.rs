//! Clean command - remove library links and build outputs

use anyhow::Context;
use clap::Args;
use tracing::info;

use outrig_tasks::ProcessRunner;

use crate::cli::{output, Cli};

/// Remove library links and run the build tool's clean phase
#[derive(Debug, Args)]
pub struct CleanCommand {
    /// Projects to clean (all configured projects when omitted)
    pub projects: Vec<String>,

    /// Only remove library links; leave build outputs for the coming build
    #[arg(long)]
    pub for_build: bool,
}

impl CleanCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(projects = ?self.projects, for_build = self.for_build, "executing clean command");
        let workspace = cli.workspace()?;
        let projects = workspace.suite.select(&self.projects)?;
        let runner = ProcessRunner::new();

        for project in &projects {
            project
                .build_task()
                .clean(&runner, self.for_build)
                .with_context(|| format!("failed to clean {}", project.name()))?;
        }

        if !cli.quiet {
            output::success(&format!("Cleaned {} project(s)", projects.len()));
        }

        Ok(())
    }
}
