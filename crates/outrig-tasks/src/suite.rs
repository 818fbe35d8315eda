//! All externally-built projects of one suite

use std::path::Path;
use std::sync::Arc;

use outrig_core::{ConfigError, SuiteConfig, SuiteLayout};

use crate::project::ExternalProject;
use crate::toolchain::Toolchain;

/// Projects sharing one layout and toolchain, in configuration order
#[derive(Debug, Clone)]
pub struct Suite {
    layout: Arc<SuiteLayout>,
    toolchain: Arc<Toolchain>,
    projects: Vec<ExternalProject>,
}

impl Suite {
    /// Build every project described by `config`, resolving paths against `base`
    pub fn from_config(config: &SuiteConfig, base: &Path) -> Self {
        let layout = Arc::new(SuiteLayout::from_section(&config.suite, base));
        let toolchain = Arc::new(Toolchain::from_config(config));
        let projects = config
            .projects
            .iter()
            .map(|project| {
                ExternalProject::from_config(
                    project,
                    layout.clone(),
                    toolchain.clone(),
                    &config.product.output_dir,
                    &config.product.archive_prefix,
                )
            })
            .collect();

        Self {
            layout,
            toolchain,
            projects,
        }
    }

    /// Resolved suite layout
    pub fn layout(&self) -> &SuiteLayout {
        &self.layout
    }

    /// Tool settings
    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// All projects in configuration order
    pub fn projects(&self) -> &[ExternalProject] {
        &self.projects
    }

    /// Find a project by name
    pub fn project(&self, name: &str) -> Option<&ExternalProject> {
        self.projects.iter().find(|p| p.name() == name)
    }

    /// Projects named in `names`, or every project when `names` is empty
    pub fn select(&self, names: &[String]) -> Result<Vec<&ExternalProject>, ConfigError> {
        if names.is_empty() {
            return Ok(self.projects.iter().collect());
        }
        names
            .iter()
            .map(|name| {
                self.project(name)
                    .ok_or_else(|| ConfigError::UnknownProject(name.clone()))
            })
            .collect()
    }
}
