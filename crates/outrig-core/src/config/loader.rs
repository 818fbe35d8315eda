//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, Result};

use super::defaults::config_file_names;
use super::types::SuiteConfig;
use super::validation::validate_config;

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<SuiteConfig> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading config");

    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()).into());
    }

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let config: SuiteConfig = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    validate_config(&config)?;
    debug!(path = %path.display(), projects = config.projects.len(), "config loaded and validated");
    Ok(config)
}

/// Find configuration file in directory or parent directories.
///
/// The first match wins. Parents are walked until the filesystem root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.is_file() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration or use defaults.
///
/// Returns the directory relative suite paths resolve against: the config
/// file's directory when one was found, `dir` otherwise. A config file that
/// exists but fails to parse or validate is still an error.
pub fn load_config_or_default(dir: &Path) -> Result<(SuiteConfig, PathBuf)> {
    match find_config(dir) {
        Some(path) => {
            let config = load_config(&path)?;
            let base = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dir.to_path_buf());
            Ok((config, base))
        }
        None => {
            info!(dir = %dir.display(), "no config found, using defaults");
            Ok((SuiteConfig::default(), dir.to_path_buf()))
        }
    }
}
