//! Externally-built project descriptors

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;
use walkdir::WalkDir;

use outrig_core::config::{ProjectConfig, DEFAULT_ARCHIVE_PREFIX, DEFAULT_BUILD_COMMANDS};
use outrig_core::{BuildError, LibraryRef, PathLibrary, SuiteLayout};

use crate::links::{library_links, LibraryLink};
use crate::task::BuildTask;
use crate::toolchain::Toolchain;

/// A module whose compilation is delegated to an external build tool
#[derive(Clone)]
pub struct ExternalProject {
    name: String,
    layout: Arc<SuiteLayout>,
    toolchain: Arc<Toolchain>,
    sub_dir: Option<String>,
    dependencies: Vec<String>,
    libraries: Vec<Arc<dyn LibraryRef>>,
    output_subdirs: Vec<String>,
    build_commands: Vec<String>,
    archive_prefix: String,
}

impl ExternalProject {
    /// Create a descriptor with default commands and no dependencies
    pub fn new(name: impl Into<String>, layout: Arc<SuiteLayout>, toolchain: Arc<Toolchain>) -> Self {
        Self {
            name: name.into(),
            layout,
            toolchain,
            sub_dir: None,
            dependencies: Vec::new(),
            libraries: Vec::new(),
            output_subdirs: Vec::new(),
            build_commands: DEFAULT_BUILD_COMMANDS.iter().map(|s| s.to_string()).collect(),
            archive_prefix: DEFAULT_ARCHIVE_PREFIX.to_string(),
        }
    }

    /// Create a descriptor from its configuration entry.
    ///
    /// Distributable projects get `dist_output` as their single output subdirectory.
    pub fn from_config(
        config: &ProjectConfig,
        layout: Arc<SuiteLayout>,
        toolchain: Arc<Toolchain>,
        dist_output: &str,
        archive_prefix: &str,
    ) -> Self {
        let libraries = config
            .libraries
            .iter()
            .map(|lib| Arc::new(PathLibrary::from_config(lib, &layout)) as Arc<dyn LibraryRef>)
            .collect();

        let mut project = Self::new(config.name.clone(), layout, toolchain)
            .with_build_commands(config.build_commands.clone())
            .with_dependencies(config.dependencies.clone())
            .with_libraries(libraries)
            .with_archive_prefix(archive_prefix);
        if let Some(sub_dir) = &config.sub_dir {
            project = project.with_sub_dir(sub_dir.clone());
        }
        if config.dist {
            project = project.with_output_subdir(dist_output);
        }
        project
    }

    /// Set the module subdirectory
    pub fn with_sub_dir(mut self, sub_dir: impl Into<String>) -> Self {
        self.sub_dir = Some(sub_dir.into());
        self
    }

    /// Set ordinary project dependencies
    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Set library dependencies
    pub fn with_libraries(mut self, libraries: Vec<Arc<dyn LibraryRef>>) -> Self {
        self.libraries = libraries;
        self
    }

    /// Add an output subdirectory
    pub fn with_output_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.output_subdirs.push(subdir.into());
        self
    }

    /// Set the build tool commands
    pub fn with_build_commands(mut self, commands: Vec<String>) -> Self {
        self.build_commands = commands;
        self
    }

    /// Set the archive prefix
    pub fn with_archive_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.archive_prefix = prefix.into();
        self
    }

    /// Project name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Suite layout this project lives in
    pub fn layout(&self) -> &SuiteLayout {
        &self.layout
    }

    /// Tool settings
    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// Library dependencies in declaration order
    pub fn libraries(&self) -> &[Arc<dyn LibraryRef>] {
        &self.libraries
    }

    /// Output subdirectories; empty unless the project is distributable
    pub fn output_subdirs(&self) -> &[String] {
        &self.output_subdirs
    }

    /// Commands passed to the build tool
    pub fn build_commands(&self) -> &[String] {
        &self.build_commands
    }

    /// Prefix the orchestrator uses when archiving outputs
    pub fn archive_prefix(&self) -> &str {
        &self.archive_prefix
    }

    /// Externally-built projects never hold tests of their own
    pub fn is_test_project(&self) -> bool {
        false
    }

    /// Ordinary dependencies followed by library names, without duplicates
    pub fn build_dependencies(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.dependencies
            .iter()
            .cloned()
            .chain(self.libraries.iter().map(|lib| lib.name().to_string()))
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }

    /// Working directory for the build tool: `<root>/<sub_dir or module_dir>`
    pub fn base_dir(&self) -> PathBuf {
        let sub_dir = self.sub_dir.as_deref().unwrap_or(&self.layout.module_dir);
        self.layout.root.join(sub_dir)
    }

    /// Directory holding library symlinks: `<base_dir>/<name>/lib`
    pub fn lib_dir(&self) -> PathBuf {
        self.base_dir().join(&self.name).join("lib")
    }

    /// Library links derived from the current library list
    pub fn library_links(&self) -> Vec<LibraryLink> {
        library_links(&self.lib_dir(), &self.libraries)
    }

    /// The module's single source directory.
    ///
    /// Fails when `<root>/<module_dir>/<name>/src` does not exist.
    pub fn source_root(&self) -> Result<PathBuf, BuildError> {
        let src = self
            .layout
            .root
            .join(&self.layout.module_dir)
            .join(&self.name)
            .join("src");
        if !src.exists() {
            return Err(BuildError::SourceRootMissing(src));
        }
        Ok(src)
    }

    /// Build output root, shared by every project in the suite
    pub fn output_root(&self) -> &Path {
        &self.layout.output_root
    }

    /// Every regular file below each output subdirectory.
    ///
    /// Output subdirectories that do not exist yet contribute nothing.
    pub fn build_artifacts(&self) -> Result<BTreeSet<PathBuf>, BuildError> {
        let mut artifacts = BTreeSet::new();

        for subdir in &self.output_subdirs {
            let dir = self.output_root().join(subdir);
            if !dir.exists() {
                debug!(project = %self.name, dir = %dir.display(), "output directory absent");
                continue;
            }

            for entry in WalkDir::new(&dir).sort_by_file_name() {
                let entry = entry.map_err(|e| BuildError::ArtifactWalk {
                    path: dir.clone(),
                    message: e.to_string(),
                })?;
                // Symlinked files count; directories and dangling links do not
                if !entry.file_type().is_dir() && entry.path().is_file() {
                    artifacts.insert(entry.into_path());
                }
            }
        }

        debug!(project = %self.name, count = artifacts.len(), "collected build artifacts");
        Ok(artifacts)
    }

    /// Create a build task bound to this project
    pub fn build_task(&self) -> BuildTask<'_> {
        BuildTask::new(self)
    }
}

impl fmt::Debug for ExternalProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalProject")
            .field("name", &self.name)
            .field("base_dir", &self.base_dir())
            .field("libraries", &self.libraries)
            .field("output_subdirs", &self.output_subdirs)
            .field("build_commands", &self.build_commands)
            .finish()
    }
}

impl fmt::Display for ExternalProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outrig_core::config::LibraryConfig;
    use std::fs;
    use tempfile::TempDir;

    fn project(root: &Path, name: &str) -> ExternalProject {
        ExternalProject::new(
            name,
            Arc::new(SuiteLayout::new(root)),
            Arc::new(Toolchain::default()),
        )
    }

    #[test]
    fn test_base_dir_defaults_to_module_dir() {
        let p = project(Path::new("/suite"), "Graph");
        assert_eq!(p.base_dir(), PathBuf::from("/suite/IdealGraphVisualizer"));
        assert_eq!(
            p.lib_dir(),
            PathBuf::from("/suite/IdealGraphVisualizer/Graph/lib")
        );
    }

    #[test]
    fn test_base_dir_uses_sub_dir() {
        let p = project(Path::new("/suite"), "Graph").with_sub_dir("Other");
        assert_eq!(p.base_dir(), PathBuf::from("/suite/Other"));
    }

    #[test]
    fn test_default_build_commands() {
        let p = project(Path::new("/suite"), "Graph");
        assert_eq!(p.build_commands(), ["package", "-DskipTests"]);
        assert!(!p.is_test_project());
        assert_eq!(p.archive_prefix(), "igv");
    }

    #[test]
    fn test_source_root_missing_is_error() {
        let temp = TempDir::new().unwrap();
        let p = project(temp.path(), "Graph");
        let err = p.source_root().unwrap_err();
        assert!(matches!(err, BuildError::SourceRootMissing(_)));
        assert!(err.to_string().starts_with("Cannot find"));
    }

    #[test]
    fn test_source_root_exists() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("IdealGraphVisualizer").join("Graph").join("src");
        fs::create_dir_all(&src).unwrap();
        assert_eq!(project(temp.path(), "Graph").source_root().unwrap(), src);
    }

    #[test]
    fn test_output_root_shared_between_projects() {
        let layout = Arc::new(SuiteLayout::new("/suite"));
        let toolchain = Arc::new(Toolchain::default());
        let a = ExternalProject::new("A", layout.clone(), toolchain.clone());
        let b = ExternalProject::new("B", layout, toolchain).with_sub_dir("elsewhere");
        assert_eq!(a.output_root(), b.output_root());
    }

    #[test]
    fn test_build_artifacts_lists_nested_files() {
        let temp = TempDir::new().unwrap();
        let p = project(temp.path(), "Graph").with_output_subdir("igv");
        let out = p.output_root().join("igv");
        fs::create_dir_all(out.join("bin")).unwrap();
        fs::create_dir_all(out.join("etc")).unwrap();
        fs::write(out.join("bin").join("igv"), "#!/bin/sh").unwrap();
        fs::write(out.join("etc").join("igv.conf"), "").unwrap();
        fs::create_dir_all(p.output_root().join("other")).unwrap();
        fs::write(p.output_root().join("other").join("skip.txt"), "").unwrap();

        let artifacts = p.build_artifacts().unwrap();
        assert_eq!(artifacts.len(), 2);
        assert!(artifacts.contains(&out.join("bin").join("igv")));
        assert!(artifacts.contains(&out.join("etc").join("igv.conf")));
    }

    #[test]
    fn test_build_artifacts_dedupes_repeated_subdirs() {
        let temp = TempDir::new().unwrap();
        let p = project(temp.path(), "Graph")
            .with_output_subdir("igv")
            .with_output_subdir("igv");
        let out = p.output_root().join("igv");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("a"), "").unwrap();

        assert_eq!(p.build_artifacts().unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_build_artifacts_include_symlinked_files() {
        let temp = TempDir::new().unwrap();
        let p = project(temp.path(), "Graph").with_output_subdir("igv");
        let out = p.output_root().join("igv");
        fs::create_dir_all(&out).unwrap();
        let real = temp.path().join("real.jar");
        fs::write(&real, "jar").unwrap();
        std::os::unix::fs::symlink(&real, out.join("linked.jar")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("gone"), out.join("dangling")).unwrap();

        let artifacts = p.build_artifacts().unwrap();
        assert_eq!(artifacts.len(), 1);
        assert!(artifacts.contains(&out.join("linked.jar")));
    }

    #[test]
    fn test_build_artifacts_empty_without_outputs() {
        let temp = TempDir::new().unwrap();
        assert!(project(temp.path(), "Graph").build_artifacts().unwrap().is_empty());
    }

    #[test]
    fn test_from_config() {
        let layout = Arc::new(SuiteLayout::new("/suite"));
        let mut config = ProjectConfig::new("Graph");
        config.dist = true;
        config.dependencies = vec!["Data".to_string(), "graphio".to_string()];
        config.libraries.push(LibraryConfig {
            name: "graphio".to_string(),
            path: PathBuf::from("dists/graphio.jar"),
        });

        let p = ExternalProject::from_config(
            &config,
            layout,
            Arc::new(Toolchain::default()),
            "idealgraphvisualizer",
            "igv",
        );
        assert_eq!(p.output_subdirs(), ["idealgraphvisualizer"]);
        assert_eq!(p.libraries()[0].path(), PathBuf::from("/suite/dists/graphio.jar"));
        assert_eq!(p.build_dependencies(), vec!["Data", "graphio"]);
        assert_eq!(
            p.library_links()[0].link,
            PathBuf::from("/suite/IdealGraphVisualizer/Graph/lib/graphio.jar")
        );
    }
}
