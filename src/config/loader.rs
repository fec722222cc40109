//! Configuration loading functionality
//!
//! This module contains functions for locating and reading the configuration
//! file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use directories::ProjectDirs;
use log::{debug, info};

use crate::constants::{APPLICATION, DEFAULT_CONFIG_PATH, ORGANIZATION, QUALIFIER};

use super::model::Config;

/// Loads and validates a configuration from a file
///
/// # Arguments
/// * `file` - Path to the configuration file
///
/// # Returns
/// * `Result<Config>` - The loaded configuration or an error
///
/// # Errors
/// Returns an error if the file cannot be read or if the configuration is invalid
pub fn load_config(file: &Path) -> Result<Config> {
    let file_content = fs::read(file).map_err(|e| {
        anyhow!(
            "Failed to read configuration file {}: {}",
            file.display(),
            e
        )
    })?;

    let content_str = String::from_utf8(file_content).map_err(|e| {
        anyhow!(
            "Configuration file {} contains invalid UTF-8 characters: {}",
            file.display(),
            e
        )
    })?;

    let config = Config::from_yaml_str(&content_str).map_err(|e| {
        anyhow!(
            "Failed to parse configuration file {}: {}\nPlease check the YAML syntax.",
            file.display(),
            e
        )
    })?;

    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration file {}: {}", file.display(), e))?;

    info!("Loaded configuration from {}", file.display());
    Ok(config)
}

/// Works out which configuration file to read
///
/// An explicit path wins and has `~` expanded. Otherwise `naming.yaml` in the
/// working directory is used if present, then the one in the per-user
/// configuration directory.
///
/// # Errors
/// Returns an error if no explicit path is given and the user configuration
/// directory cannot be determined
pub fn resolve_config_path(explicit: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        let expanded = shellexpand::tilde(path).to_string();
        debug!("Using configuration file {}", expanded);
        return Ok(PathBuf::from(expanded));
    }

    let local = PathBuf::from(DEFAULT_CONFIG_PATH);
    if local.exists() {
        debug!("Using configuration file {} in working directory", DEFAULT_CONFIG_PATH);
        return Ok(local);
    }

    let folder = find_project_folder()?;
    Ok(folder.config_dir().join(DEFAULT_CONFIG_PATH))
}

/// Finds the per-user project directories for the application
///
/// # Errors
/// Returns an error if the home directory cannot be determined
pub fn find_project_folder() -> Result<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .ok_or_else(|| anyhow!("Project folder not found"))
}
