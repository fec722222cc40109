//! Import profiles
//!
//! This module contains the path filtering layer built on top of templates: a
//! profile claims asset paths whose directory parses against its path
//! template, and its asset filters narrow that down by file name, extension
//! and sub folder.

use std::path::Path;

use log::{debug, trace};
use rayon::prelude::*;

use crate::filter::StringFilter;
use crate::template::Template;

/// Narrows the assets of an [`ImportProfile`] down by file
#[derive(Debug, Clone)]
pub struct AssetFilter {
    /// Disabled filters match nothing
    pub enabled: bool,
    /// Template the file name without extension has to parse against fully
    pub file: Template,
    /// Accepted extensions with their leading dot; empty accepts any
    pub extensions: Vec<String>,
    /// File names without extension matching any of these are rejected
    pub file_exclusions: Vec<StringFilter>,
    /// Folders below the profile path the file has to live in; empty accepts any
    pub sub_paths: Vec<String>,
}

impl AssetFilter {
    pub fn new(file: Template) -> Self {
        AssetFilter {
            enabled: true,
            file,
            extensions: Vec::new(),
            file_exclusions: Vec::new(),
            sub_paths: Vec::new(),
        }
    }

    /// Checks whether an asset path belongs to this filter
    ///
    /// # Arguments
    /// * `profile` - The profile the filter belongs to
    /// * `asset_path` - The `/` separated asset path
    ///
    /// # Returns
    /// * `bool` - True if the profile claims the path and the file passes every check
    pub fn is_match(&self, profile: &ImportProfile, asset_path: &str) -> bool {
        if !self.enabled {
            return false;
        }

        let Some(prefix_end) = profile.matched_prefix(asset_path) else {
            return false;
        };

        let path = Path::new(asset_path);
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");

        if !self.extensions.is_empty() {
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            let accepted = self.extensions.iter().any(|candidate| {
                candidate
                    .trim_start_matches('.')
                    .eq_ignore_ascii_case(extension)
            });
            if !accepted {
                trace!("'{}' has an unlisted extension", asset_path);
                return false;
            }
        }

        if self.file.parse_strict(stem).is_err() {
            return false;
        }

        if self.file_exclusions.iter().any(|filter| filter.is_match(stem)) {
            trace!("'{}' is excluded by a file filter", asset_path);
            return false;
        }

        if !self.sub_paths.is_empty() {
            let directory = asset_path
                .rfind('/')
                .map_or("", |index| &asset_path[..index]);
            let remainder = directory
                .get(prefix_end..)
                .unwrap_or("")
                .trim_start_matches('/');

            let inside = self.sub_paths.iter().any(|sub_path| {
                let sub_path = sub_path.trim_matches('/');
                remainder == sub_path
                    || remainder
                        .strip_prefix(sub_path)
                        .is_some_and(|rest| rest.starts_with('/'))
            });
            if !inside {
                trace!("'{}' is outside the filter's sub paths", asset_path);
                return false;
            }
        }

        true
    }
}

/// A set of asset paths described by a path template
#[derive(Debug, Clone)]
pub struct ImportProfile {
    pub name: String,
    /// Disabled profiles match nothing
    pub enabled: bool,
    /// Template the asset path has to parse against, honouring its anchor
    pub path: Template,
    /// Asset paths matching any of these are rejected
    pub path_exclusions: Vec<StringFilter>,
    pub filters: Vec<AssetFilter>,
}

impl ImportProfile {
    pub fn new(name: &str, path: Template) -> Self {
        ImportProfile {
            name: name.to_string(),
            enabled: true,
            path,
            path_exclusions: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Checks whether the profile claims an asset path
    pub fn is_match(&self, asset_path: &str) -> bool {
        self.matched_prefix(asset_path).is_some()
    }

    /// The first enabled filter accepting the asset path
    pub fn matching_filter(&self, asset_path: &str) -> Option<&AssetFilter> {
        let found = self
            .filters
            .iter()
            .find(|filter| filter.is_match(self, asset_path));
        if found.is_some() {
            debug!("{} found! Applying setup for {}.", asset_path, self.name);
        }
        found
    }

    /// Keeps the paths the profile claims, in input order
    ///
    /// Paths are checked in parallel.
    pub fn matching<'a, S>(&self, paths: &'a [S]) -> Vec<&'a str>
    where
        S: AsRef<str> + Sync,
    {
        let matched: Vec<&str> = paths
            .par_iter()
            .map(|path| AsRef::<str>::as_ref(path))
            .filter(|path| self.is_match(path))
            .collect();

        debug!(
            "Profile '{}' claimed {} of {} paths",
            self.name,
            matched.len(),
            paths.len()
        );
        matched
    }

    /// End of the part of the asset path matched by the path template
    fn matched_prefix(&self, asset_path: &str) -> Option<usize> {
        if !self.enabled {
            return None;
        }

        if self
            .path_exclusions
            .iter()
            .any(|filter| filter.is_match(asset_path))
        {
            trace!("'{}' is excluded from profile '{}'", asset_path, self.name);
            return None;
        }

        self.path
            .parse_span(asset_path, false)
            .ok()
            .map(|(_, span)| span.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::StringMatchType;

    fn profile() -> ImportProfile {
        ImportProfile::new(
            "Test Profile",
            Template::new("Test Pattern", "Assets/Test/{varName}/").unwrap(),
        )
    }

    fn filter() -> AssetFilter {
        let mut filter = AssetFilter::new(Template::new("Test Pattern", "{varFile}_001").unwrap());
        filter.extensions = vec![".png".to_string()];
        filter
    }

    #[test]
    fn test_profile_without_trailing_separator() {
        let mut profile = profile();
        profile.path = Template::new("Test Pattern", "Assets/Test/{varName}").unwrap();

        assert!(profile.is_match("Assets/Test/SomeAsset/SomeAsset.png"));
        assert!(!profile.is_match("Assets/Test2/SomeAsset/SomeAsset.png"));
    }

    #[test]
    fn test_sub_path_must_be_whole_segment() {
        let profile = profile();
        let mut filter = filter();
        filter.sub_paths = vec!["VFX".to_string()];

        assert!(filter.is_match(&profile, "Assets/Test/SomeAsset/VFX/Deep/SomeAsset_001.png"));
        assert!(!filter.is_match(&profile, "Assets/Test/SomeAsset/VFXtra/SomeAsset_001.png"));
    }

    #[test]
    fn test_extension_comparison_ignores_case_and_dot() {
        let profile = profile();
        let mut filter = filter();
        filter.extensions = vec!["PNG".to_string()];

        assert!(filter.is_match(&profile, "Assets/Test/SomeAsset/SomeAsset_001.png"));
    }

    #[test]
    fn test_matching_filter() {
        let mut profile = profile();
        let mut excluded = filter();
        excluded.file_exclusions =
            vec![StringFilter::new(StringMatchType::StartsWith, "Some", false).unwrap()];
        profile.filters = vec![excluded, filter()];

        let found = profile.matching_filter("Assets/Test/SomeAsset/SomeAsset_001.png");
        assert!(found.is_some_and(|f| f.file_exclusions.is_empty()));
        assert!(profile.matching_filter("Assets/Test/SomeAsset/SomeAsset_002.png").is_none());
    }
}
