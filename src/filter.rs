//! String filters
//!
//! This module contains the simple string predicates used to include or
//! exclude paths: contains, starts with, ends with, equals, wildcard and
//! regular expression matching, each optionally case-insensitive.

use log::trace;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::errors::{invalid_expression_error, Error, Result};

/// Strategy a [`StringFilter`] uses to compare its pattern with a candidate
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StringMatchType {
    /// The candidate contains the pattern
    #[default]
    Contains,
    /// The candidate starts with the pattern
    StartsWith,
    /// The candidate ends with the pattern
    EndsWith,
    /// The candidate is the pattern
    Equals,
    /// `*` matches any run of characters and `?` a single character,
    /// anchored at the start of the candidate
    Wildcard,
    /// Unanchored regular expression search
    Regex,
}

/// Serialised shape of a [`StringFilter`]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FilterDefinition {
    /// How the pattern is compared
    #[serde(default)]
    pub match_type: StringMatchType,
    /// The pattern to compare with
    pub pattern: String,
    /// Whether letter case is ignored
    #[serde(default)]
    pub ignore_case: bool,
}

/// A stateless string predicate
///
/// # Examples
///
/// ```
/// use naming_convention::{StringFilter, StringMatchType};
///
/// let filter = StringFilter::new(StringMatchType::Wildcard, "T*t", true).unwrap();
/// assert!(filter.is_match("testSomeString"));
/// assert!(!filter.is_match("SomeTestString"));
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(try_from = "FilterDefinition", into = "FilterDefinition")]
pub struct StringFilter {
    match_type: StringMatchType,
    pattern: String,
    ignore_case: bool,
    folded_pattern: String,
    regex: Option<Regex>,
}

impl StringFilter {
    /// Creates a new filter
    ///
    /// # Arguments
    /// * `match_type` - How the pattern is compared with candidates
    /// * `pattern` - The pattern to compare with
    /// * `ignore_case` - Whether letter case is ignored
    ///
    /// # Returns
    /// * `Result<StringFilter>` - The filter, or an error
    ///
    /// # Errors
    /// Returns an error if a `Regex` pattern is not a valid regular expression
    pub fn new(match_type: StringMatchType, pattern: &str, ignore_case: bool) -> Result<Self> {
        let regex = match match_type {
            StringMatchType::Regex => Some(build_regex(pattern, pattern, ignore_case)?),
            StringMatchType::Wildcard => {
                Some(build_regex(&wildcard_to_regex(pattern), pattern, ignore_case)?)
            }
            _ => None,
        };

        let folded_pattern = if ignore_case {
            pattern.to_lowercase()
        } else {
            pattern.to_string()
        };

        Ok(StringFilter {
            match_type,
            pattern: pattern.to_string(),
            ignore_case,
            folded_pattern,
            regex,
        })
    }

    pub fn match_type(&self) -> StringMatchType {
        self.match_type
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Checks whether the candidate satisfies the filter
    pub fn is_match(&self, candidate: &str) -> bool {
        let result = match &self.regex {
            Some(regex) => regex.is_match(candidate),
            None => {
                let folded;
                let candidate = if self.ignore_case {
                    folded = candidate.to_lowercase();
                    folded.as_str()
                } else {
                    candidate
                };
                let pattern = self.folded_pattern.as_str();

                match self.match_type {
                    StringMatchType::Contains => candidate.contains(pattern),
                    StringMatchType::StartsWith => candidate.starts_with(pattern),
                    StringMatchType::EndsWith => candidate.ends_with(pattern),
                    StringMatchType::Equals => candidate == pattern,
                    StringMatchType::Wildcard | StringMatchType::Regex => false,
                }
            }
        };

        trace!(
            "{:?} filter '{}' on '{}': {}",
            self.match_type, self.pattern, candidate, result
        );
        result
    }
}

impl PartialEq for StringFilter {
    fn eq(&self, other: &Self) -> bool {
        self.match_type == other.match_type
            && self.pattern == other.pattern
            && self.ignore_case == other.ignore_case
    }
}

impl TryFrom<FilterDefinition> for StringFilter {
    type Error = Error;

    fn try_from(definition: FilterDefinition) -> Result<Self> {
        StringFilter::new(
            definition.match_type,
            &definition.pattern,
            definition.ignore_case,
        )
    }
}

impl From<StringFilter> for FilterDefinition {
    fn from(filter: StringFilter) -> Self {
        FilterDefinition {
            match_type: filter.match_type,
            pattern: filter.pattern,
            ignore_case: filter.ignore_case,
        }
    }
}

fn build_regex(expression: &str, pattern: &str, ignore_case: bool) -> Result<Regex> {
    RegexBuilder::new(expression)
        .case_insensitive(ignore_case)
        .build()
        .map_err(|e| invalid_expression_error(e, pattern))
}

/// Translates a wildcard pattern into a start-anchored regular expression
fn wildcard_to_regex(pattern: &str) -> String {
    let mut expression = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => expression.push_str(".*"),
            '?' => expression.push('.'),
            _ => expression.push_str(&regex::escape(&c.to_string())),
        }
    }
    expression
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_to_regex() {
        assert_eq!(wildcard_to_regex("T*t"), "^T.*t");
        assert_eq!(wildcard_to_regex("a?.png"), r"^a.\.png");
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let result = StringFilter::new(StringMatchType::Regex, "(unclosed", false);
        assert!(result.is_err(), "Invalid regex should fail to build");
        assert!(result.unwrap_err().is_compile_error());
    }

    #[test]
    fn test_non_regex_filters_accept_regex_metacharacters() {
        let filter = StringFilter::new(StringMatchType::Contains, "(unclosed", false).unwrap();
        assert!(filter.is_match("some(unclosed"));
    }

    #[test]
    fn test_equality_ignores_compiled_state() {
        let a = StringFilter::new(StringMatchType::Regex, "(test)+", true).unwrap();
        let b = StringFilter::new(StringMatchType::Regex, "(test)+", true).unwrap();
        let c = StringFilter::new(StringMatchType::Regex, "(test)+", false).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_deserialize() {
        let yaml = "match_type: ends_with\npattern: _001\nignore_case: true\n";
        let filter: StringFilter = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(filter.match_type(), StringMatchType::EndsWith);
        assert!(filter.is_match("SomeAsset_001"));

        let invalid = "match_type: regex\npattern: \"(\"\n";
        assert!(serde_yaml::from_str::<StringFilter>(invalid).is_err());
    }
}
