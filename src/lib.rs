//! Naming convention templates
//!
//! Parses strings such as asset paths against patterns like
//! `Assets/{project}/{category:\snake}/{name}.png` and formats data back into
//! them. Templates can reference each other by name, constrain placeholders
//! to a naming convention and are grouped into import profiles that claim
//! asset paths.

pub use convention::StringConvention;
pub use errors::{Error, ErrorKind, Result};
pub use filter::{FilterDefinition, StringFilter, StringMatchType};
pub use profile::{AssetFilter, ImportProfile};
pub use resolver::{ResolveTemplate, TemplateResolver};
pub use template::{
    Anchor, DuplicatePlaceholderMode, FormatSource, KeyMap, ParsedValue, Placeholder, Template,
    TemplateBuilder, TemplateData, TemplateKeys, TemplateOptions, Token,
};

pub mod cli;
pub mod config;
pub mod constants;
pub mod convention;
mod errors;
pub mod filter;
pub mod logging;
pub mod profile;
pub mod resolver;
pub mod template;

pub mod prelude {
    pub use crate::errors::{
        config_parsing_error, duplicate_mismatch_error, generic_error, invalid_expression_error,
        invalid_placeholder_error, missing_keys_error, no_match_error, reference_cycle_error,
        unresolved_reference_error,
    };
    pub use crate::errors::{Error, ErrorKind, Result};
    pub use crate::logging::{format_message, init_default_logger, init_logger, LogLevel};
    pub use crate::{
        Anchor, DuplicatePlaceholderMode, StringConvention, Template, TemplateData,
        TemplateResolver,
    };
}
