use regex::Error as RegexError;
use std::error::Error as StdError;
use std::fmt;

/// Broad classification of an [`Error`]
///
/// Callers mostly care whether a failure came from a badly authored pattern
/// (`Compile`), from an input that does not fit a template (`Parse`), or from
/// incomplete data handed to `format` (`Format`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The pattern could not be compiled
    Compile,
    /// The input did not satisfy the compiled template
    Parse,
    /// The data supplied for formatting was incomplete
    Format,
    /// The configuration could not be read or validated
    Config,
}

/// Custom error type for the naming convention library
#[derive(Debug)]
pub enum Error {
    /// A placeholder or reference token is malformed
    InvalidPlaceholder { pattern: String, detail: String },
    /// A custom placeholder expression was rejected by the regex engine
    InvalidExpression { source: RegexError, pattern: String },
    /// A `{@name}` reference could not be resolved
    UnresolvedReference { pattern: String, reference: String },
    /// Template references form a cycle
    ReferenceCycle { chain: Vec<String> },
    /// The input does not match the template
    NoMatch { template: String, value: String },
    /// Two occurrences of the same placeholder captured different text
    DuplicateMismatch {
        template: String,
        key: String,
        first: String,
        second: String,
    },
    /// Keys required by the template are missing from the format data
    MissingKeys { template: String, keys: Vec<String> },
    /// Error related to configuration parsing
    ConfigParsing {
        source: Box<dyn StdError + Send + Sync>,
        detail: String,
    },
    /// Generic error with a message
    Generic { message: String },
}

impl Error {
    /// Classifies the error into one of the [`ErrorKind`] families
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidPlaceholder { .. }
            | Error::InvalidExpression { .. }
            | Error::UnresolvedReference { .. }
            | Error::ReferenceCycle { .. } => ErrorKind::Compile,
            Error::NoMatch { .. } | Error::DuplicateMismatch { .. } => ErrorKind::Parse,
            Error::MissingKeys { .. } => ErrorKind::Format,
            Error::ConfigParsing { .. } | Error::Generic { .. } => ErrorKind::Config,
        }
    }

    pub fn is_compile_error(&self) -> bool {
        self.kind() == ErrorKind::Compile
    }

    pub fn is_parse_error(&self) -> bool {
        self.kind() == ErrorKind::Parse
    }

    pub fn is_format_error(&self) -> bool {
        self.kind() == ErrorKind::Format
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPlaceholder { pattern, detail } => {
                write!(f, "Invalid placeholder in pattern '{pattern}': {detail}")
            }
            Error::InvalidExpression { source, pattern } => {
                write!(f, "Invalid pattern '{pattern}': {source}")
            }
            Error::UnresolvedReference { pattern, reference } => {
                write!(
                    f,
                    "Unable to resolve reference '{reference}' in pattern '{pattern}'"
                )
            }
            Error::ReferenceCycle { chain } => {
                write!(f, "Template references form a cycle: {}", chain.join(" -> "))
            }
            Error::NoMatch { template, value } => {
                write!(f, "Path '{value}' did not match template '{template}'")
            }
            Error::DuplicateMismatch {
                template,
                key,
                first,
                second,
            } => {
                write!(
                    f,
                    "Different extracted values for placeholder '{key}' detected in template '{template}': '{first}' != '{second}'"
                )
            }
            Error::MissingKeys { template, keys } => {
                write!(
                    f,
                    "Missing data for template '{template}': {}",
                    keys.join(", ")
                )
            }
            Error::ConfigParsing { detail, .. } => {
                write!(f, "Configuration parsing error: {detail}")
            }
            Error::Generic { message } => {
                write!(f, "{message}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::InvalidExpression { source, .. } => Some(source),
            Error::ConfigParsing { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<RegexError> for Error {
    fn from(err: RegexError) -> Self {
        Error::InvalidExpression {
            source: err,
            pattern: String::new(),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::ConfigParsing {
            detail: err.to_string(),
            source: Box::new(err),
        }
    }
}

/// Custom Result type for the naming convention library
///
/// # Examples
/// ```
/// use naming_convention::prelude::{Result, generic_error};
///
/// fn example_function(ok: bool) -> Result<String> {
///     if ok {
///         Ok("success".to_string())
///     } else {
///         Err(generic_error("Something went wrong"))
///     }
/// }
///
/// assert!(example_function(true).is_ok());
/// assert!(example_function(false).is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Helper function to create an invalid placeholder error
pub fn invalid_placeholder_error(pattern: &str, detail: &str) -> Error {
    Error::InvalidPlaceholder {
        pattern: pattern.to_string(),
        detail: detail.to_string(),
    }
}

/// Helper function to create an invalid expression error
pub fn invalid_expression_error(err: RegexError, pattern: &str) -> Error {
    Error::InvalidExpression {
        source: err,
        pattern: pattern.to_string(),
    }
}

/// Helper function to create an unresolved reference error
pub fn unresolved_reference_error(pattern: &str, reference: &str) -> Error {
    Error::UnresolvedReference {
        pattern: pattern.to_string(),
        reference: reference.to_string(),
    }
}

/// Helper function to create a reference cycle error
pub fn reference_cycle_error(chain: Vec<String>) -> Error {
    Error::ReferenceCycle { chain }
}

/// Helper function to create a no-match error
pub fn no_match_error(template: &str, value: &str) -> Error {
    Error::NoMatch {
        template: template.to_string(),
        value: value.to_string(),
    }
}

/// Helper function to create a duplicate mismatch error
pub fn duplicate_mismatch_error(template: &str, key: &str, first: &str, second: &str) -> Error {
    Error::DuplicateMismatch {
        template: template.to_string(),
        key: key.to_string(),
        first: first.to_string(),
        second: second.to_string(),
    }
}

/// Helper function to create a missing keys error
pub fn missing_keys_error(template: &str, keys: Vec<String>) -> Error {
    Error::MissingKeys {
        template: template.to_string(),
        keys,
    }
}

/// Helper function to create a config parsing error
pub fn config_parsing_error<E: StdError + Send + Sync + 'static>(err: E, detail: &str) -> Error {
    Error::ConfigParsing {
        source: Box::new(err),
        detail: detail.to_string(),
    }
}

/// Helper function to create a generic error
pub fn generic_error(message: &str) -> Error {
    Error::Generic {
        message: message.to_string(),
    }
}
