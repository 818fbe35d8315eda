//! Configuration types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::defaults;

/// Main configuration for an Outrig suite
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Suite layout
    pub suite: SuiteSection,

    /// External build tool
    pub tool: ToolConfig,

    /// Runtime used for diagnostics and launching the product
    pub runtime: RuntimeConfig,

    /// Packaged product produced by distributable projects
    pub product: ProductConfig,

    /// Externally-built projects
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,

    /// Canonical/mirror tree pair
    pub verify: VerifyConfig,
}

/// Filesystem layout of the suite
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteSection {
    /// Suite root; relative values resolve against the config file directory
    pub root: PathBuf,

    /// Conventional subdirectory holding externally-built modules
    pub module_dir: String,

    /// Build output root shared by every project in the suite
    pub output_root: PathBuf,

    /// Directory the tool's clean phase runs in
    pub clean_root: PathBuf,
}

impl Default for SuiteSection {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            module_dir: defaults::DEFAULT_MODULE_DIR.to_string(),
            output_root: PathBuf::from(defaults::DEFAULT_OUTPUT_ROOT),
            clean_root: PathBuf::from(defaults::DEFAULT_MODULE_DIR),
        }
    }
}

/// External build tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Executable name or path
    pub program: String,

    /// Arguments for the clean phase
    pub clean_args: Vec<String>,

    /// Arguments for the unit test run
    pub test_args: Vec<String>,

    /// Environment overrides applied to build invocations
    pub env: BTreeMap<String, String>,

    /// Environment overrides applied to clean invocations
    pub clean_env: BTreeMap<String, String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: defaults::DEFAULT_TOOL.to_string(),
            clean_args: defaults::strings(defaults::DEFAULT_CLEAN_ARGS),
            test_args: defaults::strings(defaults::DEFAULT_TEST_ARGS),
            env: defaults::build_env(),
            clean_env: defaults::clean_env(),
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Runtime executable queried for its version
    pub program: String,

    /// Arguments for the version query
    pub version_args: Vec<String>,

    /// Runtime home handed to the product launcher
    pub home: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            program: defaults::DEFAULT_RUNTIME.to_string(),
            version_args: defaults::strings(defaults::DEFAULT_VERSION_ARGS),
            home: None,
        }
    }
}

/// Packaged product configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    /// Launcher name under `bin/`
    pub executable: String,

    /// Output subdirectory produced by distributable projects
    pub output_dir: String,

    /// Prefix used when the orchestrator archives outputs
    pub archive_prefix: String,

    /// Launcher argument that silences console logging
    pub quiet_logger_arg: String,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            executable: defaults::DEFAULT_EXECUTABLE.to_string(),
            output_dir: defaults::DEFAULT_EXECUTABLE.to_string(),
            archive_prefix: defaults::DEFAULT_ARCHIVE_PREFIX.to_string(),
            quiet_logger_arg: defaults::DEFAULT_QUIET_LOGGER_ARG.to_string(),
        }
    }
}

/// One externally-built project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Unique project name
    pub name: String,

    /// Subdirectory containing the module (defaults to `suite.module_dir`)
    #[serde(default)]
    pub sub_dir: Option<String>,

    /// Whether this project produces the distributable product
    #[serde(default)]
    pub dist: bool,

    /// Commands passed to the build tool
    #[serde(default = "default_build_commands")]
    pub build_commands: Vec<String>,

    /// Ordinary project dependencies
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Libraries linked into the module's `lib/` directory
    #[serde(default)]
    pub libraries: Vec<LibraryConfig>,
}

impl ProjectConfig {
    /// Create a project entry with default commands
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sub_dir: None,
            dist: false,
            build_commands: default_build_commands(),
            dependencies: Vec::new(),
            libraries: Vec::new(),
        }
    }
}

fn default_build_commands() -> Vec<String> {
    defaults::strings(defaults::DEFAULT_BUILD_COMMANDS)
}

/// A library dependency with a known location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Library name
    pub name: String,

    /// Path to the library; relative values resolve against the suite root
    pub path: PathBuf,
}

/// Canonical and mirror roots for tree verification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Source-of-truth tree
    pub canonical: PathBuf,

    /// Vendored copy
    pub mirror: PathBuf,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            canonical: PathBuf::from(defaults::DEFAULT_CANONICAL_TREE),
            mirror: PathBuf::from(defaults::DEFAULT_MIRROR_TREE),
        }
    }
}
