//! Configuration validation

use std::collections::HashSet;

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::SuiteConfig;

/// Validate configuration
pub fn validate_config(config: &SuiteConfig) -> Result<()> {
    debug!("validating configuration");
    validate_tool(config)?;
    validate_projects(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_tool(config: &SuiteConfig) -> Result<()> {
    if config.tool.program.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "tool.program".to_string(),
            message: "program cannot be empty".to_string(),
        }
        .into());
    }

    if config.product.executable.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "product.executable".to_string(),
            message: "executable cannot be empty".to_string(),
        }
        .into());
    }

    Ok(())
}

fn validate_projects(config: &SuiteConfig) -> Result<()> {
    let mut seen = HashSet::new();

    for (i, project) in config.projects.iter().enumerate() {
        if project.name.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("projects[{}].name", i),
                message: "project name cannot be empty".to_string(),
            }
            .into());
        }

        if !seen.insert(project.name.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: format!("projects[{}].name", i),
                message: format!("duplicate project name '{}'", project.name),
            }
            .into());
        }

        if project.build_commands.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("projects[{}].build_commands", i),
                message: "at least one build command is required".to_string(),
            }
            .into());
        }

        for (j, library) in project.libraries.iter().enumerate() {
            if library.name.is_empty() {
                return Err(ConfigError::MissingField(format!(
                    "projects[{}].libraries[{}].name",
                    i, j
                ))
                .into());
            }
        }
    }

    Ok(())
}
