//! Pattern tokenizer
//!
//! This module splits a raw pattern string into literal text, placeholders and
//! template references. Nothing is resolved or compiled here; the tokens are
//! the first of the two build phases of a [`Template`](super::Template).

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{EXPRESSION_SEPARATOR, REFERENCE_PREFIX, TOKEN_CLOSE, TOKEN_OPEN};
use crate::convention::StringConvention;
use crate::errors::{invalid_expression_error, invalid_placeholder_error, Result};

static KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*$").expect("Failed to compile placeholder key regex")
});

/// A named capture slot in a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    key: String,
    expression: Option<String>,
    convention: Option<StringConvention>,
}

impl Placeholder {
    /// The key the captured value is stored under, possibly dotted (`a.b.c`)
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The custom expression, with `\{` and `\}` already unescaped
    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    /// The convention requested through a `\marker`, if any
    pub fn convention(&self) -> Option<StringConvention> {
        self.convention
    }

    /// The convention the captured value is held to
    ///
    /// A custom expression is its own shape, so such placeholders report
    /// [`StringConvention::None`]; otherwise the explicit marker wins over the
    /// template default.
    pub fn effective_convention(&self, default: StringConvention) -> StringConvention {
        match (&self.expression, self.convention) {
            (Some(_), _) => StringConvention::None,
            (None, Some(convention)) => convention,
            (None, None) => default,
        }
    }

    /// The regular expression the placeholder's value must match
    pub(crate) fn match_expression(&self, default: StringConvention) -> &str {
        match &self.expression {
            Some(expression) => expression,
            None => self.effective_convention(default).shape(),
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.expression, self.convention.and_then(|c| c.marker())) {
            (Some(expression), _) => {
                let escaped = expression.replace('{', r"\{").replace('}', r"\}");
                write!(f, "{{{}:{}}}", self.key, escaped)
            }
            (None, Some(marker)) => write!(f, "{{{}:{}}}", self.key, marker),
            (None, None) => write!(f, "{{{}}}", self.key),
        }
    }
}

/// One element of a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Text matched verbatim
    Literal(String),
    /// A `{key}` or `{key:expression}` capture slot
    Placeholder(Placeholder),
    /// A `{@name}` reference to another template
    Reference(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal(text) => f.write_str(text),
            Token::Placeholder(placeholder) => write!(f, "{placeholder}"),
            Token::Reference(name) => write!(f, "{{@{name}}}"),
        }
    }
}

/// Splits a pattern into tokens
///
/// # Arguments
/// * `pattern` - The raw pattern string
///
/// # Returns
/// * `Result<Vec<Token>>` - The tokens in pattern order, or an error
///
/// # Errors
/// * Returns an error if a token is not terminated
/// * Returns an error if a placeholder key is empty or contains invalid characters
/// * Returns an error if a reference name is empty
/// * Returns an error if a custom expression is not a valid regular expression
pub fn tokenize(pattern: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        if c != TOKEN_OPEN {
            literal.push(c);
            continue;
        }

        let mut content = String::new();
        let mut terminated = false;
        while let Some(inner) = chars.next() {
            match inner {
                '\\' => {
                    content.push(inner);
                    if let Some(escaped) = chars.next() {
                        content.push(escaped);
                    }
                }
                TOKEN_CLOSE => {
                    terminated = true;
                    break;
                }
                _ => content.push(inner),
            }
        }

        if !terminated {
            return Err(invalid_placeholder_error(
                pattern,
                &format!("unterminated token '{TOKEN_OPEN}{content}'"),
            ));
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }
        tokens.push(parse_token(pattern, &content)?);
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }

    Ok(tokens)
}

fn parse_token(pattern: &str, content: &str) -> Result<Token> {
    if let Some(name) = content.strip_prefix(REFERENCE_PREFIX) {
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid_placeholder_error(pattern, "reference name is empty"));
        }
        return Ok(Token::Reference(name.to_string()));
    }

    let (key, expression) = match content.split_once(EXPRESSION_SEPARATOR) {
        Some((key, expression)) => (key, Some(expression)),
        None => (content, None),
    };

    if key.is_empty() {
        return Err(invalid_placeholder_error(pattern, "placeholder key is empty"));
    }
    if !KEY_RE.is_match(key) {
        return Err(invalid_placeholder_error(
            pattern,
            &format!("placeholder key '{key}' may only contain letters, digits, '_' and '.'"),
        ));
    }

    let placeholder = match expression {
        None => Placeholder {
            key: key.to_string(),
            expression: None,
            convention: None,
        },
        Some("") => {
            return Err(invalid_placeholder_error(
                pattern,
                &format!("placeholder '{key}' has an empty expression"),
            ));
        }
        Some(expression) => match StringConvention::from_marker(expression) {
            Some(convention) => Placeholder {
                key: key.to_string(),
                expression: None,
                convention: Some(convention),
            },
            None => {
                let expression = unescape_braces(expression);
                Regex::new(&expression).map_err(|e| invalid_expression_error(e, pattern))?;
                Placeholder {
                    key: key.to_string(),
                    expression: Some(expression),
                    convention: None,
                }
            }
        },
    };

    Ok(Token::Placeholder(placeholder))
}

fn unescape_braces(expression: &str) -> String {
    expression.replace(r"\{", "{").replace(r"\}", "}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder(token: &Token) -> &Placeholder {
        match token {
            Token::Placeholder(placeholder) => placeholder,
            other => panic!("Expected a placeholder, got {other:?}"),
        }
    }

    #[test]
    fn test_tokenize_literals_and_placeholders() {
        let tokens = tokenize("/{a}/static/{b.c}").unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0], Token::Literal("/".to_string()));
        assert_eq!(placeholder(&tokens[1]).key(), "a");
        assert_eq!(tokens[2], Token::Literal("/static/".to_string()));
        assert_eq!(placeholder(&tokens[3]).key(), "b.c");
    }

    #[test]
    fn test_tokenize_empty_pattern() {
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_escaped_expression() {
        let tokens = tokenize(r"{filename}.{index:\d\{4\}}.{ext}").unwrap();
        let index = placeholder(&tokens[2]);
        assert_eq!(index.key(), "index");
        assert_eq!(index.expression(), Some(r"\d{4}"));
        assert_eq!(index.convention(), None);
    }

    #[test]
    fn test_tokenize_convention_marker() {
        let tokens = tokenize(r"{name:\kebab}").unwrap();
        let name = placeholder(&tokens[0]);
        assert_eq!(name.expression(), None);
        assert_eq!(name.convention(), Some(StringConvention::KebabCase));
        assert_eq!(
            name.effective_convention(StringConvention::SnakeCase),
            StringConvention::KebabCase
        );
    }

    #[test]
    fn test_tokenize_reference() {
        let tokens = tokenize("/root/{@reference}").unwrap();
        assert_eq!(tokens[1], Token::Reference("reference".to_string()));
    }

    #[test]
    fn test_closing_brace_outside_token_is_literal() {
        let tokens = tokenize("a}b").unwrap();
        assert_eq!(tokens, vec![Token::Literal("a}b".to_string())]);
    }

    #[test]
    fn test_tokenize_errors() {
        for pattern in ["{}", "{variable-dashed}", "{1abc}", "{abc", "{@}", "{key:}", "{key:(}"] {
            let result = tokenize(pattern);
            assert!(result.is_err(), "Pattern '{pattern}' should be rejected");
            assert!(result.unwrap_err().is_compile_error());
        }
    }

    #[test]
    fn test_display_round_trip() {
        let pattern = r"/{a}/{b:\snake}/{c:\d\{2\}}/{@ref}";
        let rendered: String = tokenize(pattern)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered, pattern);
    }
}
