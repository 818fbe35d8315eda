//! Verify command - check the mirrored source tree against the canonical one

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use outrig_core::SyncError;
use outrig_sync::{SyncMode, TreeVerifier, VerifyOptions, VerifyReport};

use crate::cli::{output, Cli, OutputFormat};

/// Verify the mirrored source tree is byte-identical to the canonical tree
#[derive(Debug, Args)]
pub struct VerifyCommand {
    /// Overwrite divergent mirror files from the canonical tree
    #[arg(short, long)]
    pub sync: bool,

    /// Canonical tree (defaults to `verify.canonical` in the suite config)
    #[arg(long)]
    pub canonical: Option<PathBuf>,

    /// Mirror tree (defaults to `verify.mirror` in the suite config)
    #[arg(long)]
    pub mirror: Option<PathBuf>,
}

impl VerifyCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let (canonical, mirror) = self.roots(cli)?;

        let options = VerifyOptions {
            mode: if self.sync {
                SyncMode::Sync
            } else {
                SyncMode::Verify
            },
            quiet: cli.quiet,
        };
        info!(sync = self.sync, quiet = cli.quiet, "executing verify command");

        let verifier = TreeVerifier::new(canonical, mirror);
        let report = match verifier.run(options) {
            Ok(report) => report,
            Err(err) => {
                if let SyncError::Mismatch {
                    canonical, mirror, ..
                } = &err
                {
                    let hint = sync_hint(canonical, mirror);
                    info!(%hint, "mirror out of sync");
                    eprintln!("{hint}");
                }
                return Err(err.into());
            }
        };

        if cli.format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        // Overwrites are reported even when quiet
        for relative in &report.synced {
            output::info(&override_line(verifier.mirror(), relative));
        }

        if let Some(line) = summary(&report, verifier.mirror(), cli.quiet) {
            output::success(&line);
        }

        Ok(())
    }

    /// Explicit roots skip config loading; otherwise fall back to the suite's `verify` section
    fn roots(&self, cli: &Cli) -> anyhow::Result<(PathBuf, PathBuf)> {
        let cwd = std::env::current_dir()?;
        if let (Some(canonical), Some(mirror)) = (&self.canonical, &self.mirror) {
            return Ok((cwd.join(canonical), cwd.join(mirror)));
        }

        let workspace = cli.workspace()?;
        let layout = workspace.suite.layout();
        let canonical = match &self.canonical {
            Some(path) => cwd.join(path),
            None => layout.resolve(&workspace.config.verify.canonical),
        };
        let mirror = match &self.mirror {
            Some(path) => cwd.join(path),
            None => layout.resolve(&workspace.config.verify.mirror),
        };
        Ok((canonical, mirror))
    }
}

fn override_line(mirror: &Path, relative: &Path) -> String {
    format!("Overriding {}", mirror.join(relative).display())
}

fn sync_hint(canonical: &Path, mirror: &Path) -> String {
    format!(
        "Try synchronizing:\n  {}\n  {}\nOr execute 'outrig verify' with the '--sync' option.",
        canonical.display(),
        mirror.display()
    )
}

/// Closing line; `None` when quiet
fn summary(report: &VerifyReport, mirror: &Path, quiet: bool) -> Option<String> {
    if quiet {
        return None;
    }
    Some(match report.mode {
        SyncMode::Verify => format!(
            "{} is unchanged ({} files verified)",
            mirror.display(),
            report.verified
        ),
        SyncMode::Sync => format!(
            "{} synchronized: {} of {} files overridden",
            mirror.display(),
            report.synced.len(),
            report.verified
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(mode: SyncMode, verified: usize, synced: &[&str]) -> VerifyReport {
        VerifyReport {
            mode,
            verified,
            synced: synced.iter().map(PathBuf::from).collect(),
        }
    }

    #[test]
    fn test_confirmation_on_success() {
        let line = summary(&report(SyncMode::Verify, 2, &[]), Path::new("mirror"), false).unwrap();
        assert_eq!(line, "mirror is unchanged (2 files verified)");
    }

    #[test]
    fn test_quiet_suppresses_confirmation() {
        assert!(summary(&report(SyncMode::Verify, 2, &[]), Path::new("mirror"), true).is_none());
        assert!(summary(&report(SyncMode::Sync, 2, &["a"]), Path::new("mirror"), true).is_none());
    }

    #[test]
    fn test_sync_summary_counts_overwrites() {
        let line = summary(
            &report(SyncMode::Sync, 2, &["a/b/y.txt"]),
            Path::new("mirror"),
            false,
        )
        .unwrap();
        assert_eq!(line, "mirror synchronized: 1 of 2 files overridden");
    }

    #[test]
    fn test_sync_hint_names_both_paths() {
        let hint = sync_hint(Path::new("canonical/a/x.txt"), Path::new("mirror/a/x.txt"));
        let lines: Vec<&str> = hint.lines().collect();
        assert_eq!(lines[0], "Try synchronizing:");
        assert_eq!(lines[1].trim(), "canonical/a/x.txt");
        assert_eq!(lines[2].trim(), "mirror/a/x.txt");
        assert!(lines[3].contains("--sync"));
    }

    #[test]
    fn test_override_line_names_mirror_file() {
        let line = override_line(Path::new("m"), Path::new("a/b/y.txt"));
        assert_eq!(line, format!("Overriding {}", Path::new("m/a/b/y.txt").display()));
    }

    #[test]
    fn test_quiet_sync_reports_overwrites_end_to_end() {
        let temp = tempfile::TempDir::new().unwrap();
        let canonical = temp.path().join("c");
        let mirror = temp.path().join("m");
        std::fs::create_dir_all(canonical.join("a/b")).unwrap();
        std::fs::create_dir_all(mirror.join("a/b")).unwrap();
        std::fs::write(canonical.join("a/x.txt"), "1").unwrap();
        std::fs::write(canonical.join("a/b/y.txt"), "2").unwrap();
        std::fs::write(mirror.join("a/x.txt"), "1").unwrap();
        std::fs::write(mirror.join("a/b/y.txt"), "9").unwrap();

        let report = TreeVerifier::new(&canonical, &mirror)
            .run(VerifyOptions::sync().quiet(true))
            .unwrap();
        let lines: Vec<String> = report
            .synced
            .iter()
            .map(|relative| override_line(&mirror, relative))
            .collect();

        assert_eq!(
            lines,
            vec![format!("Overriding {}", mirror.join("a/b/y.txt").display())]
        );
        assert!(summary(&report, &mirror, true).is_none());
        assert_eq!(std::fs::read_to_string(mirror.join("a/b/y.txt")).unwrap(), "2");
    }

    #[test]
    fn test_explicit_roots_skip_config() {
        let cli = <Cli as clap::Parser>::try_parse_from([
            "outrig",
            "--config",
            "/nonexistent/outrig.toml",
            "verify",
            "--canonical",
            "c",
            "--mirror",
            "m",
        ])
        .unwrap();
        let crate::cli::Commands::Verify(cmd) = &cli.command else {
            panic!("expected verify command");
        };
        let (canonical, mirror) = cmd.roots(&cli).unwrap();
        assert!(canonical.ends_with("c"));
        assert!(mirror.ends_with("m"));
    }
}
