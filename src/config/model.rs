//! Configuration data structures
//!
//! This module contains the serialised shape of a template and profile
//! configuration, and the compiled catalogue built from it.

use std::collections::HashSet;

use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, generic_error};
use crate::filter::StringFilter;
use crate::profile::{AssetFilter, ImportProfile};
use crate::resolver::TemplateResolver;
use crate::template::{Template, TemplateOptions};

fn enabled() -> bool {
    true
}

/// A named template as written in the configuration
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TemplateDefinition {
    pub name: String,
    pub pattern: String,
    #[serde(flatten)]
    pub options: TemplateOptions,
}

/// An asset filter as written in the configuration
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AssetFilterDefinition {
    #[serde(default = "enabled")]
    pub enabled: bool,
    /// Pattern the file name without extension has to parse against
    pub file: String,
    /// Options of the file pattern
    #[serde(flatten)]
    pub options: TemplateOptions,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub file_exclusions: Vec<StringFilter>,
    #[serde(default)]
    pub sub_paths: Vec<String>,
}

/// An import profile as written in the configuration
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ProfileDefinition {
    pub name: String,
    #[serde(default = "enabled")]
    pub enabled: bool,
    /// Pattern the asset path has to parse against
    pub path: String,
    /// Options of the path pattern
    #[serde(flatten)]
    pub options: TemplateOptions,
    #[serde(default)]
    pub path_exclusions: Vec<StringFilter>,
    #[serde(default)]
    pub filters: Vec<AssetFilterDefinition>,
}

/// Templates and profiles loaded from a YAML document
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub templates: Vec<TemplateDefinition>,
    #[serde(default)]
    pub profiles: Vec<ProfileDefinition>,
}

/// Compiled templates and profiles, ready for parsing and matching
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub templates: TemplateResolver,
    pub profiles: Vec<ImportProfile>,
}

impl Catalog {
    /// Looks a profile up by name
    pub fn profile(&self, name: &str) -> Option<&ImportProfile> {
        self.profiles.iter().find(|profile| profile.name == name)
    }
}

impl Config {
    /// Parses a configuration from a YAML string
    ///
    /// # Errors
    /// Returns an error if the document is not valid YAML or does not have the
    /// expected shape
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        debug!(
            "Read {} templates and {} profiles",
            config.templates.len(),
            config.profiles.len()
        );
        Ok(config)
    }

    /// Checks names before anything is compiled
    ///
    /// # Errors
    /// * Returns an error if a template or profile has an empty name
    /// * Returns an error if a template or profile name is used twice
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (index, template) in self.templates.iter().enumerate() {
            if template.name.trim().is_empty() {
                return Err(generic_error(&format!(
                    "Template #{} with pattern '{}' has no name",
                    index + 1,
                    template.pattern
                )));
            }
            if !seen.insert(template.name.as_str()) {
                return Err(generic_error(&format!(
                    "Template '{}' is defined more than once",
                    template.name
                )));
            }
        }

        let mut seen = HashSet::new();
        for (index, profile) in self.profiles.iter().enumerate() {
            if profile.name.trim().is_empty() {
                return Err(generic_error(&format!(
                    "Profile #{} with path '{}' has no name",
                    index + 1,
                    profile.path
                )));
            }
            if !seen.insert(profile.name.as_str()) {
                return Err(generic_error(&format!(
                    "Profile '{}' is defined more than once",
                    profile.name
                )));
            }
        }

        Ok(())
    }

    /// Compiles every template and profile
    ///
    /// Templates are compiled in document order, each against the templates
    /// listed before it, so a reference can only point backwards. Profile
    /// path templates may reference any template.
    ///
    /// # Returns
    /// * `Result<Catalog>` - The compiled templates and profiles
    ///
    /// # Errors
    /// Returns the first compilation error, logged with the name of the
    /// offending template or profile
    pub fn compile(&self) -> Result<Catalog> {
        self.validate()?;

        let mut templates = TemplateResolver::new();
        for definition in &self.templates {
            let template = Template::builder(&definition.name, &definition.pattern)
                .options(definition.options)
                .resolver(&templates)
                .build()
                .map_err(|e| report("template", &definition.name, e))?;
            templates.register(template);
        }

        let profiles = self
            .profiles
            .iter()
            .map(|definition| compile_profile(definition, &templates))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Configuration compiled with {} templates and {} profiles",
            templates.len(),
            profiles.len()
        );

        Ok(Catalog {
            templates,
            profiles,
        })
    }
}

fn compile_profile(
    definition: &ProfileDefinition,
    templates: &TemplateResolver,
) -> Result<ImportProfile> {
    let path = Template::builder(&definition.name, &definition.path)
        .options(definition.options)
        .resolver(templates)
        .build()
        .map_err(|e| report("profile", &definition.name, e))?;

    let mut profile = ImportProfile::new(&definition.name, path);
    profile.enabled = definition.enabled;
    profile.path_exclusions = definition.path_exclusions.clone();

    for (index, filter) in definition.filters.iter().enumerate() {
        let name = format!("{}#{}", definition.name, index + 1);
        let file = Template::builder(&name, &filter.file)
            .options(filter.options)
            .resolver(templates)
            .build()
            .map_err(|e| report("asset filter", &name, e))?;

        let mut asset_filter = AssetFilter::new(file);
        asset_filter.enabled = filter.enabled;
        asset_filter.extensions = filter.extensions.clone();
        asset_filter.file_exclusions = filter.file_exclusions.clone();
        asset_filter.sub_paths = filter.sub_paths.clone();
        profile.filters.push(asset_filter);
    }

    debug!(
        "Prepared profile '{}' with {} filters",
        profile.name,
        profile.filters.len()
    );
    Ok(profile)
}

fn report(what: &str, name: &str, e: Error) -> Error {
    error!("Failed to compile {} '{}': {}", what, name, e);
    e
}
