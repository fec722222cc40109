//! Reference expansion and matcher compilation
//!
//! This module holds the second and third build phases of a template: every
//! `{@name}` reference is replaced by the tokens of the template it names, and
//! the resulting flat token sequence is compiled into regular expressions.

use log::trace;
use regex::Regex;

use crate::convention::StringConvention;
use crate::errors::{invalid_expression_error, reference_cycle_error, unresolved_reference_error, Result};
use crate::resolver::ResolveTemplate;

use super::token::{Placeholder, Token};
use super::Anchor;

/// Regular expressions compiled from an expanded token sequence
#[derive(Debug, Clone)]
pub(crate) struct Matcher {
    /// Honours the template's anchor
    pub anchored: Regex,
    /// Must span the whole input
    pub exact: Regex,
    /// Capture group name of each placeholder, in token order
    pub groups: Vec<String>,
}

/// Replaces references with the tokens of the templates they name
///
/// References inside referenced templates are expanded recursively against the
/// same resolver. `stack` holds the names currently being expanded and is
/// used to detect cycles.
///
/// # Errors
/// * Returns an error if a reference is used without a resolver
/// * Returns an error if a reference names an unknown template
/// * Returns an error if references form a cycle
pub(crate) fn expand(
    pattern: &str,
    tokens: &[Token],
    resolver: Option<&dyn ResolveTemplate>,
    stack: &mut Vec<String>,
) -> Result<Vec<Token>> {
    let mut expanded = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token {
            Token::Reference(name) => {
                if stack.iter().any(|visited| visited == name) {
                    let mut chain = stack.clone();
                    chain.push(name.clone());
                    return Err(reference_cycle_error(chain));
                }

                let referenced = resolver
                    .and_then(|r| r.resolve_template(name))
                    .ok_or_else(|| unresolved_reference_error(pattern, name))?;

                trace!("Expanding reference '{}' in pattern '{}'", name, pattern);
                stack.push(name.clone());
                let nested = expand(referenced.pattern(), referenced.tokens(), resolver, stack)?;
                stack.pop();

                expanded.extend(nested);
            }
            other => expanded.push(other.clone()),
        }
    }

    Ok(expanded)
}

/// Compiles an expanded token sequence into a [`Matcher`]
///
/// Literals are escaped, each placeholder becomes a named capture group
/// wrapping its expression or convention shape.
///
/// # Errors
/// Returns an error if the combined expression is rejected by the regex engine
pub(crate) fn compile(
    pattern: &str,
    tokens: &[Token],
    anchor: Anchor,
    default_convention: StringConvention,
) -> Result<Matcher> {
    let mut body = String::new();
    let mut groups = Vec::new();

    for token in tokens {
        match token {
            Token::Literal(text) => body.push_str(&regex::escape(text)),
            Token::Placeholder(placeholder) => {
                let group = format!("p{}", groups.len());
                body.push_str(&format!(
                    "(?P<{group}>{})",
                    placeholder.match_expression(default_convention)
                ));
                groups.push(group);
            }
            Token::Reference(name) => {
                return Err(unresolved_reference_error(pattern, name));
            }
        }
    }

    let anchored_expression = match anchor {
        Anchor::Start => format!("^(?:{body})"),
        Anchor::End => format!("(?:{body})$"),
        Anchor::Exact => format!("^(?:{body})$"),
        Anchor::Contains => body.clone(),
    };
    let exact_expression = format!("^(?:{body})$");

    let anchored =
        Regex::new(&anchored_expression).map_err(|e| invalid_expression_error(e, pattern))?;
    let exact = Regex::new(&exact_expression).map_err(|e| invalid_expression_error(e, pattern))?;

    Ok(Matcher {
        anchored,
        exact,
        groups,
    })
}

/// Iterates the placeholders of an expanded token sequence
pub(crate) fn placeholders(tokens: &[Token]) -> impl Iterator<Item = &Placeholder> {
    tokens.iter().filter_map(|token| match token {
        Token::Placeholder(placeholder) => Some(placeholder),
        _ => None,
    })
}
