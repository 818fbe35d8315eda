//! Build task for an externally-built project
//!
//! A task holds no state of its own. It is created on demand from its
//! project, runs `build` or `clean`, and is dropped.

use std::fmt;
use std::path::Path;
use std::time::SystemTime;

use tracing::{debug, info, warn};

use outrig_core::BuildError;

use crate::links::{create_links, remove_links};
use crate::project::ExternalProject;
use crate::runner::ToolRunner;

/// Outcome of the staleness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildDecision {
    /// Whether a build must run
    pub required: bool,
    /// Human-readable reason
    pub reason: &'static str,
}

/// Drives the external build tool for one project
#[derive(Debug, Clone, Copy)]
pub struct BuildTask<'a> {
    project: &'a ExternalProject,
}

impl<'a> BuildTask<'a> {
    /// Bind a task to a project
    pub fn new(project: &'a ExternalProject) -> Self {
        Self { project }
    }

    /// The project this task builds
    pub fn project(&self) -> &'a ExternalProject {
        self.project
    }

    /// Always requires a build.
    ///
    /// The external tool tracks its own staleness, so the newest input
    /// timestamp is ignored and the tool is re-invoked every time.
    pub fn needs_build(&self, _newest_input: Option<SystemTime>) -> BuildDecision {
        BuildDecision {
            required: true,
            reason: "external projects are rebuilt every time",
        }
    }

    /// Outputs are not timestamped
    pub fn newest_output(&self) -> Option<SystemTime> {
        None
    }

    /// Link libraries, run the build tool, then fix launcher permissions
    pub fn build(&self, runner: &dyn ToolRunner) -> Result<(), BuildError> {
        let project = self.project;
        let toolchain = project.toolchain();

        if !project.libraries().is_empty() {
            create_links(&project.lib_dir(), &project.library_links())?;
        }

        if let Some(path) = std::env::var_os("PATH") {
            debug!(path = %path.to_string_lossy(), "inherited PATH");
        }

        let base_dir = project.base_dir();
        let version = toolchain.version_invocation(&base_dir);
        debug!(command = %version, "checking runtime version");
        match runner.run(&version) {
            Ok(exit) if exit.is_success() => {}
            Ok(exit) => warn!(command = %version, code = ?exit.code, "runtime version check failed"),
            Err(e) => warn!(command = %version, error = %e, "runtime version check failed"),
        }

        let invocation = toolchain.build_invocation(project.build_commands(), &base_dir);
        info!(
            commands = %project.build_commands().join(" "),
            project = %project.name(),
            dir = %base_dir.display(),
            "invoking build tool"
        );
        runner.run_checked(&invocation)?;

        for subdir in project.output_subdirs() {
            let launcher = project
                .output_root()
                .join(subdir)
                .join("bin")
                .join(&toolchain.executable);
            make_executable(&launcher)?;
        }

        info!(project = %project.name(), "finished build");
        Ok(())
    }

    /// Remove library links and, unless preparing a build, run the tool's clean phase.
    ///
    /// The clean phase runs in the suite clean root, not the project's base directory.
    pub fn clean(&self, runner: &dyn ToolRunner, for_build: bool) -> Result<(), BuildError> {
        let project = self.project;

        if !project.libraries().is_empty() {
            let removed = remove_links(&project.library_links())?;
            debug!(project = %project.name(), removed, "removed library links");
        }

        if for_build {
            return Ok(());
        }

        let invocation = project
            .toolchain()
            .clean_invocation(&project.layout().clean_root);
        info!(project = %project.name(), command = %invocation, "cleaning");
        runner.run_checked(&invocation)
    }
}

impl fmt::Display for BuildTask<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Building {} project for {}",
            self.project.toolchain().program,
            self.project.name()
        )
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), BuildError> {
    use std::os::unix::fs::PermissionsExt;

    debug!(path = %path.display(), "setting mode 0755");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).map_err(|source| {
        BuildError::Permissions {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn make_executable(path: &Path) -> Result<(), BuildError> {
    // No executable bit to set; the launcher still has to exist
    std::fs::metadata(path)
        .map(|_| ())
        .map_err(|source| BuildError::Permissions {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    use tempfile::TempDir;

    use outrig_core::config::TOOL_OPTS_VAR;
    use outrig_core::{LibraryRef, PathLibrary, SuiteLayout};

    use super::*;
    use crate::runner::testing::RecordingRunner;
    use crate::runner::ToolExit;
    use crate::toolchain::Toolchain;

    fn project(root: &Path) -> ExternalProject {
        ExternalProject::new(
            "Graph",
            Arc::new(SuiteLayout::new(root)),
            Arc::new(Toolchain::default()),
        )
    }

    fn with_libraries(root: &Path, names: &[&str]) -> ExternalProject {
        let dists = root.join("dists");
        fs::create_dir_all(&dists).unwrap();
        let libs = names
            .iter()
            .map(|name| {
                let path = dists.join(format!("{name}.jar"));
                fs::write(&path, name).unwrap();
                Arc::new(PathLibrary::new(*name, path)) as Arc<dyn LibraryRef>
            })
            .collect();
        project(root).with_libraries(libs)
    }

    #[test]
    fn test_needs_build_always_true() {
        let temp = TempDir::new().unwrap();
        let p = project(temp.path());
        let task = p.build_task();

        assert!(task.needs_build(None).required);
        assert!(task.needs_build(Some(SystemTime::now())).required);
        let future = SystemTime::now() + Duration::from_secs(3600);
        assert!(task.needs_build(Some(future)).required);
        assert!(task.newest_output().is_none());
    }

    #[test]
    fn test_display() {
        let p = project(Path::new("/suite"));
        assert_eq!(p.build_task().to_string(), "Building mvn project for Graph");
    }

    #[test]
    fn test_build_invokes_version_check_then_tool() {
        let temp = TempDir::new().unwrap();
        let p = project(temp.path());
        let runner = RecordingRunner::new();

        p.build_task().build(&runner).unwrap();

        assert_eq!(runner.programs(), vec!["java", "mvn"]);
        let invocations = runner.invocations.borrow();
        let build = &invocations[1];
        assert_eq!(build.args, vec!["package", "-DskipTests"]);
        assert_eq!(build.cwd, temp.path().join("IdealGraphVisualizer"));
        assert!(build.env[TOOL_OPTS_VAR].contains("-Djava.awt.headless=true"));
    }

    #[test]
    fn test_build_tolerates_failed_version_check() {
        let temp = TempDir::new().unwrap();
        let p = project(temp.path());
        let runner = RecordingRunner::with_exits([ToolExit::with_code(1)]);

        p.build_task().build(&runner).unwrap();
        assert_eq!(runner.invocations.borrow().len(), 2);
    }

    #[test]
    fn test_build_tool_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        let p = project(temp.path()).with_output_subdir("igv");
        let runner = RecordingRunner::with_exits([ToolExit::success(), ToolExit::with_code(1)]);

        let err = p.build_task().build(&runner).unwrap_err();
        assert!(matches!(err, BuildError::ToolFailed { code: Some(1), .. }));
        // No retry
        assert_eq!(runner.invocations.borrow().len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_build_creates_one_link_per_library() {
        let temp = TempDir::new().unwrap();
        let p = with_libraries(temp.path(), &["graphio", "truffle", "util"]);

        p.build_task().build(&RecordingRunner::new()).unwrap();

        let entries: Vec<_> = fs::read_dir(p.lib_dir()).unwrap().flatten().collect();
        assert_eq!(entries.len(), 3);
        for (link, lib) in p.library_links().iter().zip(p.libraries()) {
            assert!(fs::symlink_metadata(&link.link).unwrap().file_type().is_symlink());
            assert_eq!(
                fs::canonicalize(&link.link).unwrap(),
                fs::canonicalize(lib.path()).unwrap()
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_rebuild_without_clean_fails_on_existing_links() {
        let temp = TempDir::new().unwrap();
        let p = with_libraries(temp.path(), &["graphio"]);
        let runner = RecordingRunner::new();

        p.build_task().build(&runner).unwrap();
        let err = p.build_task().build(&runner).unwrap_err();
        assert!(matches!(err, BuildError::LinkFailed { .. }));

        p.build_task().clean(&runner, true).unwrap();
        p.build_task().build(&runner).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_build_sets_launcher_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let p = project(temp.path()).with_output_subdir("idealgraphvisualizer");
        let bin = p.output_root().join("idealgraphvisualizer").join("bin");
        fs::create_dir_all(&bin).unwrap();
        let launcher = bin.join("idealgraphvisualizer");
        fs::write(&launcher, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&launcher, fs::Permissions::from_mode(0o600)).unwrap();

        p.build_task().build(&RecordingRunner::new()).unwrap();

        let mode = fs::metadata(&launcher).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
    }

    #[test]
    fn test_build_missing_launcher_is_error() {
        let temp = TempDir::new().unwrap();
        let p = project(temp.path()).with_output_subdir("idealgraphvisualizer");

        let err = p.build_task().build(&RecordingRunner::new()).unwrap_err();
        assert!(matches!(err, BuildError::Permissions { .. }));
    }

    #[test]
    fn test_clean_runs_tool_in_clean_root() {
        let temp = TempDir::new().unwrap();
        let p = project(temp.path()).with_sub_dir("elsewhere");
        let runner = RecordingRunner::new();

        p.build_task().clean(&runner, false).unwrap();

        let invocations = runner.invocations.borrow();
        assert_eq!(invocations.len(), 1);
        assert_eq!(invocations[0].command_line(), "mvn clean --quiet");
        assert_eq!(invocations[0].cwd, temp.path().join("IdealGraphVisualizer"));
        assert_eq!(invocations[0].env[TOOL_OPTS_VAR], "-Djava.awt.headless=true");
    }

    #[test]
    fn test_clean_for_build_skips_tool() {
        let temp = TempDir::new().unwrap();
        let p = project(temp.path());
        let runner = RecordingRunner::new();

        p.build_task().clean(&runner, true).unwrap();
        assert!(runner.invocations.borrow().is_empty());
    }

    #[test]
    fn test_clean_tool_failure_is_fatal() {
        let temp = TempDir::new().unwrap();
        let p = project(temp.path());
        let runner = RecordingRunner::with_exits([ToolExit::with_code(2)]);

        assert!(p.build_task().clean(&runner, false).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_clean_twice_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let p = with_libraries(temp.path(), &["graphio", "truffle"]);
        let runner = RecordingRunner::new();
        p.build_task().build(&runner).unwrap();

        p.build_task().clean(&runner, false).unwrap();
        p.build_task().clean(&runner, false).unwrap();

        for link in p.library_links() {
            assert!(fs::symlink_metadata(&link.link).is_err());
        }
        let lib_dir: PathBuf = p.lib_dir();
        assert_eq!(fs::read_dir(lib_dir).unwrap().count(), 0);
    }
}
