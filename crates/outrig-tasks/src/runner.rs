//! External tool invocation

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use outrig_core::BuildError;

/// A single blocking invocation of an external program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
    /// Working directory
    pub cwd: PathBuf,
    /// Overrides applied on top of the inherited environment
    pub env: BTreeMap<String, String>,
}

impl Invocation {
    /// Create an invocation with no arguments
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            env: BTreeMap::new(),
        }
    }

    /// Append arguments
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add environment overrides
    pub fn with_env(mut self, env: &BTreeMap<String, String>) -> Self {
        self.env
            .extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Program and arguments joined for display
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Exit status of an external program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolExit {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl ToolExit {
    /// A successful exit
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    /// An exit with the given code
    pub fn with_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Whether the program exited with code 0
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external programs to completion.
///
/// Only the exit status is consulted; output passes straight through.
pub trait ToolRunner {
    /// Run the invocation, blocking until it exits
    fn run(&self, invocation: &Invocation) -> Result<ToolExit, BuildError>;

    /// Run the invocation and treat any nonzero exit as a failure
    fn run_checked(&self, invocation: &Invocation) -> Result<(), BuildError> {
        let exit = self.run(invocation)?;
        if exit.is_success() {
            Ok(())
        } else {
            Err(BuildError::ToolFailed {
                command: invocation.command_line(),
                cwd: invocation.cwd.clone(),
                code: exit.code,
            })
        }
    }
}

/// Runs invocations as real subprocesses with inherited stdio
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a new process runner
    pub fn new() -> Self {
        Self
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<ToolExit, BuildError> {
        let program = resolve_program(&invocation.program, &invocation.cwd);
        debug!(
            program = %program.display(),
            args = ?invocation.args,
            cwd = %invocation.cwd.display(),
            env = ?invocation.env,
            "running external command"
        );

        let status = Command::new(&program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .envs(&invocation.env)
            .status()
            .map_err(|source| BuildError::Spawn {
                command: invocation.command_line(),
                source,
            })?;

        debug!(code = ?status.code(), "external command exited");
        Ok(ToolExit {
            code: status.code(),
        })
    }
}

/// Resolve bare program names on PATH so wrappers like `mvn.cmd` are found
fn resolve_program(program: &str, cwd: &Path) -> PathBuf {
    if program.contains('/') || program.contains('\\') {
        return PathBuf::from(program);
    }
    which::which_in(program, std::env::var_os("PATH"), cwd)
        .unwrap_or_else(|_| PathBuf::from(program))
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingRunner;
    use super::*;

    #[test]
    fn test_command_line() {
        let inv = Invocation::new("mvn", "/suite").with_args(["package", "-DskipTests"]);
        assert_eq!(inv.command_line(), "mvn package -DskipTests");
        assert_eq!(inv.to_string(), "mvn package -DskipTests");
    }

    #[test]
    fn test_with_env_overrides_later_values() {
        let first = BTreeMap::from([("A".to_string(), "1".to_string())]);
        let second = BTreeMap::from([("A".to_string(), "2".to_string())]);
        let inv = Invocation::new("mvn", "/").with_env(&first).with_env(&second);
        assert_eq!(inv.env["A"], "2");
    }

    #[test]
    fn test_run_checked_nonzero_is_failure() {
        let runner = RecordingRunner::with_exits([ToolExit::with_code(3)]);
        let inv = Invocation::new("mvn", "/suite").with_args(["clean"]);
        let err = runner.run_checked(&inv).unwrap_err();
        match err {
            BuildError::ToolFailed { command, code, .. } => {
                assert_eq!(command, "mvn clean");
                assert_eq!(code, Some(3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_run_checked_signal_is_failure() {
        let runner = RecordingRunner::with_exits([ToolExit { code: None }]);
        let inv = Invocation::new("mvn", "/suite");
        assert!(runner.run_checked(&inv).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_reports_exit_code() {
        let temp = tempfile::TempDir::new().unwrap();
        let runner = ProcessRunner::new();

        let ok = Invocation::new("sh", temp.path()).with_args(["-c", "exit 0"]);
        assert!(runner.run(&ok).unwrap().is_success());

        let failing = Invocation::new("sh", temp.path()).with_args(["-c", "exit 7"]);
        assert_eq!(runner.run(&failing).unwrap(), ToolExit::with_code(7));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_applies_env_and_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let env = BTreeMap::from([("OUTRIG_TEST_VALUE".to_string(), "headless".to_string())]);
        let inv = Invocation::new("sh", temp.path())
            .with_args(["-c", "printf %s \"$OUTRIG_TEST_VALUE\" > out.txt"])
            .with_env(&env);

        ProcessRunner::new().run_checked(&inv).unwrap();
        let written = std::fs::read_to_string(temp.path().join("out.txt")).unwrap();
        assert_eq!(written, "headless");
    }

    #[test]
    fn test_process_runner_missing_program() {
        let temp = tempfile::TempDir::new().unwrap();
        let inv = Invocation::new("outrig-definitely-missing-program", temp.path());
        assert!(matches!(
            ProcessRunner::new().run(&inv),
            Err(BuildError::Spawn { .. })
        ));
    }
}
