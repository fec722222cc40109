//! Templates
//!
//! This module contains the template pattern engine: patterns are tokenized,
//! their references expanded through a resolver, and the result compiled into
//! a matcher used to parse strings into [`TemplateData`] and to format data
//! back into strings.

mod compiler;
mod data;
mod token;

use std::ops::Range;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::convention::StringConvention;
use crate::errors::{duplicate_mismatch_error, missing_keys_error, no_match_error, Result};
use crate::resolver::ResolveTemplate;

use compiler::Matcher;

pub use data::{FormatSource, KeyMap, ParsedValue, TemplateData, TemplateKeys};
pub use token::{tokenize, Placeholder, Token};

/// Where in the input a template match has to occur
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    /// The match must begin at the start of the input
    #[default]
    Start,
    /// The match must finish at the end of the input
    End,
    /// The match must span the whole input
    Exact,
    /// The match may occur anywhere in the input
    Contains,
}

/// How repeated occurrences of the same placeholder key are reconciled
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePlaceholderMode {
    /// The value captured last wins
    #[default]
    Lenient,
    /// Every occurrence must capture the same text
    Strict,
}

/// Options fixed when a template is compiled
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TemplateOptions {
    #[serde(default)]
    pub anchor: Anchor,
    /// Convention of placeholders without a marker or custom expression
    #[serde(default, rename = "convention")]
    pub default_convention: StringConvention,
    #[serde(default, rename = "duplicates")]
    pub duplicate_mode: DuplicatePlaceholderMode,
}

/// A compiled, immutable pattern matcher and formatter
///
/// A `Template` is only ever handed out fully compiled: tokenizing, reference
/// expansion and regex compilation all happen in the constructor, so parse and
/// format can only fail because of their input.
///
/// # Examples
///
/// ```
/// use naming_convention::{Template, TemplateResolver};
///
/// let mut resolver = TemplateResolver::new();
/// resolver.register(Template::new("reference", "{variable}").unwrap());
///
/// let template = Template::builder("test", "/single/{@reference}")
///     .resolver(&resolver)
///     .build()
///     .unwrap();
///
/// let data = template.parse("/single/value").unwrap();
/// assert_eq!(data.value("variable"), Some("value"));
/// assert_eq!(template.format(&data).unwrap(), "/single/value");
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    pattern: String,
    options: TemplateOptions,
    tokens: Vec<Token>,
    expanded: Vec<Token>,
    matcher: Matcher,
}

impl Template {
    /// Compiles a template with default options and no resolver
    ///
    /// # Errors
    /// Returns an error if the pattern is invalid or contains references
    pub fn new(name: &str, pattern: &str) -> Result<Self> {
        Self::with_options(name, pattern, TemplateOptions::default(), None)
    }

    /// Starts building a template with non-default options
    pub fn builder<'r>(name: &str, pattern: &str) -> TemplateBuilder<'r> {
        TemplateBuilder::new(name, pattern)
    }

    /// Compiles a template
    ///
    /// # Arguments
    /// * `name` - The name the template is registered and referenced under
    /// * `pattern` - The pattern string
    /// * `options` - Anchor, default convention and duplicate placeholder mode
    /// * `resolver` - Resolves `{@name}` references; only consulted here
    ///
    /// # Returns
    /// * `Result<Template>` - The compiled template, or an error
    ///
    /// # Errors
    /// * Returns an error if a placeholder or reference token is malformed
    /// * Returns an error if a custom expression is not a valid regular expression
    /// * Returns an error if a reference cannot be resolved or references form a cycle
    pub fn with_options(
        name: &str,
        pattern: &str,
        options: TemplateOptions,
        resolver: Option<&dyn ResolveTemplate>,
    ) -> Result<Self> {
        let tokens = tokenize(pattern)?;
        let mut stack = vec![name.to_string()];
        let expanded = compiler::expand(pattern, &tokens, resolver, &mut stack)?;
        let matcher = compiler::compile(
            pattern,
            &expanded,
            options.anchor,
            options.default_convention,
        )?;

        debug!(
            "Compiled template '{}' from '{}' as '{}'",
            name,
            pattern,
            matcher.anchored.as_str()
        );

        Ok(Template {
            name: name.to_string(),
            pattern: pattern.to_string(),
            options,
            tokens,
            expanded,
            matcher,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn options(&self) -> TemplateOptions {
        self.options
    }

    pub fn anchor(&self) -> Anchor {
        self.options.anchor
    }

    pub fn default_convention(&self) -> StringConvention {
        self.options.default_convention
    }

    pub fn duplicate_mode(&self) -> DuplicatePlaceholderMode {
        self.options.duplicate_mode
    }

    /// Tokens of the pattern as written, references included
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Placeholders of the reference-expanded pattern, in pattern order
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        compiler::placeholders(&self.expanded)
    }

    /// Names of the templates referenced directly by this pattern
    pub fn references(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for token in &self.tokens {
            if let Token::Reference(name) = token
                && !names.contains(&name.as_str())
            {
                names.push(name);
            }
        }
        names
    }

    /// The pattern with every reference replaced by the pattern it names
    pub fn expanded_pattern(&self) -> String {
        self.expanded.iter().map(ToString::to_string).collect()
    }

    /// Distinct placeholder keys in order of first appearance
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for placeholder in self.placeholders() {
            if !keys.contains(&placeholder.key()) {
                keys.push(placeholder.key());
            }
        }
        keys
    }

    /// Each placeholder key with the convention its values are held to
    ///
    /// When a key occurs more than once the last occurrence decides, the same
    /// way [`Template::parse`] reports it.
    pub fn key_conventions(&self) -> TemplateKeys {
        let default = self.options.default_convention;
        self.placeholders()
            .map(|placeholder| (placeholder.key(), placeholder.effective_convention(default)))
            .collect()
    }

    /// Parses `input`, honouring the template's anchor
    ///
    /// # Errors
    /// * Returns an error if the input does not match the template
    /// * Returns an error if duplicate placeholders captured different values
    ///   in strict duplicate mode
    pub fn parse(&self, input: &str) -> Result<TemplateData> {
        self.parse_with(input, false)
    }

    /// Parses `input`, requiring the template to span all of it
    ///
    /// # Errors
    /// Same as [`Template::parse`]
    pub fn parse_strict(&self, input: &str) -> Result<TemplateData> {
        self.parse_with(input, true)
    }

    /// Parses `input`
    ///
    /// # Arguments
    /// * `input` - The string to parse
    /// * `strict` - Whether the match must span the whole input regardless of
    ///   the template's anchor
    ///
    /// # Returns
    /// * `Result<TemplateData>` - One entry per distinct placeholder key, or an error
    ///
    /// # Errors
    /// * Returns an error if the input does not match the template
    /// * Returns an error if duplicate placeholders captured different values
    ///   in strict duplicate mode
    pub fn parse_with(&self, input: &str, strict: bool) -> Result<TemplateData> {
        self.parse_span(input, strict).map(|(data, _)| data)
    }

    /// Parses `input` and reports which part of it the template matched
    ///
    /// # Returns
    /// * `Result<(TemplateData, Range<usize>)>` - The data and the byte range of
    ///   the match, or an error
    ///
    /// # Errors
    /// Same as [`Template::parse_with`]
    pub fn parse_span(&self, input: &str, strict: bool) -> Result<(TemplateData, Range<usize>)> {
        let regex = if strict {
            &self.matcher.exact
        } else {
            &self.matcher.anchored
        };

        let captures = regex.captures(input).ok_or_else(|| {
            trace!("'{}' did not match template '{}'", input, self.name);
            no_match_error(&self.name, input)
        })?;

        let default = self.options.default_convention;
        let mut data = TemplateData::new();

        for (placeholder, group) in self.placeholders().zip(&self.matcher.groups) {
            let value = captures.name(group).map_or("", |m| m.as_str());

            if self.options.duplicate_mode == DuplicatePlaceholderMode::Strict
                && let Some(existing) = data.value(placeholder.key())
                && existing != value
            {
                return Err(duplicate_mismatch_error(
                    &self.name,
                    placeholder.key(),
                    existing,
                    value,
                ));
            }

            data.insert(
                placeholder.key(),
                ParsedValue::new(value, placeholder.effective_convention(default)),
            );
        }

        let span = captures.get(0).map_or(0..0, |m| m.range());
        trace!("Parsed '{}' with template '{}'", input, self.name);

        Ok((data, span))
    }

    /// Substitutes `data` into the pattern
    ///
    /// Every occurrence of a key receives the same value, referenced templates
    /// included.
    ///
    /// # Errors
    /// Returns an error listing every placeholder key missing from `data`
    pub fn format<D: FormatSource + ?Sized>(&self, data: &D) -> Result<String> {
        let mut formatted = String::new();
        let mut missing: Vec<String> = Vec::new();

        for token in &self.expanded {
            match token {
                Token::Literal(text) => formatted.push_str(text),
                Token::Placeholder(placeholder) => match data.lookup(placeholder.key()) {
                    Some(value) => formatted.push_str(value),
                    None => {
                        if !missing.iter().any(|key| key == placeholder.key()) {
                            missing.push(placeholder.key().to_string());
                        }
                    }
                },
                // expanded tokens hold no references
                Token::Reference(_) => {}
            }
        }

        if !missing.is_empty() {
            return Err(missing_keys_error(&self.name, missing));
        }

        Ok(formatted)
    }

    /// Checks whether `input` parses, discarding the data
    pub fn is_match(&self, input: &str) -> bool {
        self.parse(input).is_ok()
    }
}

/// Builder for [`Template`]
///
/// # Examples
///
/// ```
/// use naming_convention::{Anchor, DuplicatePlaceholderMode, StringConvention, Template};
///
/// let template = Template::builder("test", "/{variable}/{variable}")
///     .anchor(Anchor::Exact)
///     .convention(StringConvention::SnakeCase)
///     .duplicate_mode(DuplicatePlaceholderMode::Strict)
///     .build()
///     .unwrap();
///
/// assert!(template.parse("/value/value").is_ok());
/// assert!(template.parse("/a/b").is_err());
/// ```
pub struct TemplateBuilder<'r> {
    name: String,
    pattern: String,
    options: TemplateOptions,
    resolver: Option<&'r dyn ResolveTemplate>,
}

impl<'r> TemplateBuilder<'r> {
    pub fn new(name: &str, pattern: &str) -> Self {
        TemplateBuilder {
            name: name.to_string(),
            pattern: pattern.to_string(),
            options: TemplateOptions::default(),
            resolver: None,
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.options.anchor = anchor;
        self
    }

    pub fn convention(mut self, convention: StringConvention) -> Self {
        self.options.default_convention = convention;
        self
    }

    pub fn duplicate_mode(mut self, mode: DuplicatePlaceholderMode) -> Self {
        self.options.duplicate_mode = mode;
        self
    }

    pub fn options(mut self, options: TemplateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn resolver(mut self, resolver: &'r dyn ResolveTemplate) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Compiles the template
    ///
    /// # Errors
    /// Same as [`Template::with_options`]
    pub fn build(self) -> Result<Template> {
        Template::with_options(&self.name, &self.pattern, self.options, self.resolver)
    }
}
