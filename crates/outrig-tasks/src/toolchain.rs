//! External build tool and runtime settings shared by a suite

use std::collections::BTreeMap;
use std::path::Path;

use outrig_core::SuiteConfig;

use crate::runner::Invocation;

/// How the external build tool and runtime are invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Build tool program
    pub program: String,
    /// Environment overrides for builds
    pub build_env: BTreeMap<String, String>,
    /// Arguments for the clean phase
    pub clean_args: Vec<String>,
    /// Environment overrides for the clean phase
    pub clean_env: BTreeMap<String, String>,
    /// Arguments for the unit test run
    pub test_args: Vec<String>,
    /// Runtime program queried for diagnostics
    pub runtime_program: String,
    /// Version query arguments
    pub runtime_args: Vec<String>,
    /// Product launcher name under `bin/`
    pub executable: String,
}

impl Toolchain {
    /// Build from suite configuration
    pub fn from_config(config: &SuiteConfig) -> Self {
        Self {
            program: config.tool.program.clone(),
            build_env: config.tool.env.clone(),
            clean_args: config.tool.clean_args.clone(),
            clean_env: config.tool.clean_env.clone(),
            test_args: config.tool.test_args.clone(),
            runtime_program: config.runtime.program.clone(),
            runtime_args: config.runtime.version_args.clone(),
            executable: config.product.executable.clone(),
        }
    }

    /// `<tool> <commands...>` with the build environment
    pub fn build_invocation(&self, commands: &[String], cwd: &Path) -> Invocation {
        Invocation::new(&self.program, cwd)
            .with_args(commands.iter().cloned())
            .with_env(&self.build_env)
    }

    /// `<tool> <clean_args...>` with the clean environment
    pub fn clean_invocation(&self, cwd: &Path) -> Invocation {
        Invocation::new(&self.program, cwd)
            .with_args(self.clean_args.iter().cloned())
            .with_env(&self.clean_env)
    }

    /// `<tool> <test_args...>` with the inherited environment
    pub fn test_invocation(&self, cwd: &Path) -> Invocation {
        Invocation::new(&self.program, cwd).with_args(self.test_args.iter().cloned())
    }

    /// Runtime version query
    pub fn version_invocation(&self, cwd: &Path) -> Invocation {
        Invocation::new(&self.runtime_program, cwd).with_args(self.runtime_args.iter().cloned())
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::from_config(&SuiteConfig::default())
    }
}
