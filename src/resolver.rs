//! Template resolver
//!
//! This module contains the registry used to resolve `{@name}` references and
//! to look templates up by name.

use std::collections::{BTreeMap, HashMap};

use log::{debug, trace};

use crate::template::{FormatSource, Template, TemplateData};

/// Anything that can hand out compiled templates by name
///
/// Only consulted while a referencing template is being compiled.
pub trait ResolveTemplate {
    /// Looks a template up by name
    fn resolve_template(&self, name: &str) -> Option<&Template>;
}

impl ResolveTemplate for HashMap<String, Template> {
    fn resolve_template(&self, name: &str) -> Option<&Template> {
        self.get(name)
    }
}

impl ResolveTemplate for BTreeMap<String, Template> {
    fn resolve_template(&self, name: &str) -> Option<&Template> {
        self.get(name)
    }
}

impl ResolveTemplate for [Template] {
    fn resolve_template(&self, name: &str) -> Option<&Template> {
        self.iter().find(|template| template.name() == name)
    }
}

/// Ordered registry of named templates
///
/// Templates are kept in registration order, which is also the order
/// [`TemplateResolver::parse_first`] tries them in. Registering a template
/// under a name already in use replaces the earlier one in place.
///
/// The registry has no interior mutability: populate it before compiling the
/// templates that reference it, then share it read-only.
#[derive(Debug, Clone, Default)]
pub struct TemplateResolver {
    templates: Vec<Template>,
}

impl TemplateResolver {
    pub fn new() -> Self {
        TemplateResolver::default()
    }

    /// Registers a template under its own name
    ///
    /// # Returns
    /// * `Option<Template>` - The template previously registered under that name
    pub fn register(&mut self, template: Template) -> Option<Template> {
        debug!("Registering template '{}'", template.name());
        match self
            .templates
            .iter_mut()
            .find(|existing| existing.name() == template.name())
        {
            Some(existing) => Some(std::mem::replace(existing, template)),
            None => {
                self.templates.push(template);
                None
            }
        }
    }

    /// Looks a template up by name
    pub fn resolve(&self, name: &str) -> Option<&Template> {
        self.templates.resolve_template(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(Template::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Parses `input` with the first registered template that accepts it
    ///
    /// # Returns
    /// * `Option<(&Template, TemplateData)>` - The matching template and its data,
    ///   or `None` if no template matches
    pub fn parse_first(&self, input: &str) -> Option<(&Template, TemplateData)> {
        self.parse_first_with(input, false)
    }

    /// Like [`TemplateResolver::parse_first`], optionally requiring an exact
    /// match of the whole input as [`Template::parse_with`] does
    pub fn parse_first_with(&self, input: &str, strict: bool) -> Option<(&Template, TemplateData)> {
        let found = self.templates.iter().find_map(|template| {
            template
                .parse_with(input, strict)
                .ok()
                .map(|data| (template, data))
        });

        match &found {
            Some((template, _)) => trace!("'{}' matched template '{}'", input, template.name()),
            None => trace!("'{}' matched no registered template", input),
        }
        found
    }

    /// Formats `data` with the first registered template it has every key for
    pub fn format_first<D: FormatSource + ?Sized>(&self, data: &D) -> Option<(&Template, String)> {
        self.templates
            .iter()
            .find_map(|template| template.format(data).ok().map(|path| (template, path)))
    }
}

impl ResolveTemplate for TemplateResolver {
    fn resolve_template(&self, name: &str) -> Option<&Template> {
        self.resolve(name)
    }
}

impl FromIterator<Template> for TemplateResolver {
    fn from_iter<I: IntoIterator<Item = Template>>(iter: I) -> Self {
        let mut resolver = TemplateResolver::new();
        for template in iter {
            resolver.register(template);
        }
        resolver
    }
}
