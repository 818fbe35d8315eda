//! Build command - drive the build task of each external project

use anyhow::Context;
use clap::Args;
use console::style;
use tracing::info;

use outrig_tasks::ProcessRunner;

use crate::cli::{output, Cli, OutputFormat};

/// Build externally-built projects
#[derive(Debug, Args)]
pub struct BuildCommand {
    /// Projects to build (all configured projects when omitted)
    pub projects: Vec<String>,

    /// Check that each project's source directory exists before building
    #[arg(long)]
    pub check_sources: bool,
}

impl BuildCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(projects = ?self.projects, "executing build command");
        let workspace = cli.workspace()?;
        let projects = workspace.suite.select(&self.projects)?;

        if projects.is_empty() {
            if !cli.quiet {
                output::warning("No projects configured.");
            }
            return Ok(());
        }

        let runner = ProcessRunner::new();
        let mut built = Vec::new();

        for project in projects {
            if self.check_sources {
                project.source_root()?;
            }

            let task = project.build_task();
            let decision = task.needs_build(None);
            info!(project = %project.name(), required = decision.required, reason = decision.reason, "build decision");
            if !decision.required {
                continue;
            }

            if !cli.quiet {
                output::info(&task.to_string());
            }

            // Drop stale library links from a previous run before relinking
            task.clean(&runner, true)
                .with_context(|| format!("failed to prepare {}", project.name()))?;
            task.build(&runner)
                .with_context(|| format!("failed to build {}", project.name()))?;
            built.push(project.name().to_string());

            if !cli.quiet && cli.format == OutputFormat::Text {
                println!("  {} finished build of {}", style("✓").green(), style(project.name()).bold());
            }
        }

        if cli.format == OutputFormat::Json {
            let result = serde_json::json!({ "built": built });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else if !cli.quiet {
            output::success(&format!("Built {} project(s)", built.len()));
        }

        Ok(())
    }
}
