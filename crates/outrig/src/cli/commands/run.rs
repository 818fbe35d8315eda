//! Run command - launch the packaged product

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use outrig_core::SuiteConfig;
use outrig_tasks::{Invocation, ProcessRunner, ToolRunner};

use crate::cli::Cli;

/// Run the packaged product, passing remaining arguments through
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Arguments passed to the product launcher
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl RunCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let workspace = cli.workspace()?;
        let layout = workspace.suite.layout();
        let launcher = launcher_path(&workspace.config, &layout.output_root);
        if !launcher.is_file() {
            anyhow::bail!(
                "Product launcher not found at {} (run `outrig build` first)",
                launcher.display()
            );
        }

        let invocation = Invocation::new(launcher.display().to_string(), &layout.root)
            .with_args(launcher_args(&workspace.config, &self.args, cli.verbose));
        info!(command = %invocation, "launching product");
        ProcessRunner::new().run_checked(&invocation)?;
        Ok(())
    }
}

/// `<output_root>/<output_dir>/bin/<executable>`, with `.exe` on Windows
fn launcher_path(config: &SuiteConfig, output_root: &Path) -> PathBuf {
    let name = if cfg!(windows) {
        format!("{}.exe", config.product.executable)
    } else {
        config.product.executable.clone()
    };
    output_root
        .join(&config.product.output_dir)
        .join("bin")
        .join(name)
}

/// Runtime home first, then passthrough arguments, then the quiet-logger flag unless verbose
fn launcher_args(config: &SuiteConfig, passthrough: &[String], verbose: bool) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(home) = &config.runtime.home {
        args.push("--jdkhome".to_string());
        args.push(home.display().to_string());
    }
    args.extend(passthrough.iter().cloned());
    if !verbose && !config.product.quiet_logger_arg.is_empty() {
        args.push(config.product.quiet_logger_arg.clone());
    }
    args
}
