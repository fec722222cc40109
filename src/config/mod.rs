//! Configuration module
//!
//! This module contains components for loading and compiling template and
//! profile configuration.

mod loader;
mod model;

pub use loader::{find_project_folder, load_config, resolve_config_path};
pub use model::{AssetFilterDefinition, Catalog, Config, ProfileDefinition, TemplateDefinition};
