//! Constants used throughout the application
//!
//! This module centralises all constants used in the application to make
//! them easier to manage and update.

/// Expression used by placeholders without a custom expression or convention
///
/// Word characters, dots and dashes. A path separator is never captured
/// implicitly.
pub const DEFAULT_PLACEHOLDER_EXPRESSION: &str = r"[\w.\-]+";

/// Opening character of a placeholder or reference token
pub const TOKEN_OPEN: char = '{';

/// Closing character of a placeholder or reference token
pub const TOKEN_CLOSE: char = '}';

/// Separator between a placeholder key and its expression
pub const EXPRESSION_SEPARATOR: char = ':';

/// Prefix marking a token as a template reference
pub const REFERENCE_PREFIX: char = '@';

/// Qualifier string used for application identification
///
/// This is used as part of the application's unique identifier.
pub const QUALIFIER: &str = "com";

/// Organisation name used for application identification
///
/// This is used as part of the application's unique identifier.
pub const ORGANIZATION: &str = "Ondřej Vágner";

/// Application name used for identification
///
/// This is the name of the application used in various contexts like
/// configuration file paths and application identification.
pub const APPLICATION: &str = "naming_convention";

/// Help text for the config command-line option
pub const CONFIG_HELP: &str = "Read templates from a specific config file";

/// Help text for the verbose command-line option
pub const VERBOSE_HELP: &str = "Increase verbosity level (can be used multiple times)";

/// Help text for the log file command-line option
pub const LOG_FILE_HELP: &str = "Also write log messages to this file";

/// Help text for the strict parsing flag
pub const STRICT_HELP: &str = "Require the template to span the whole input";

/// Default path for the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "naming.yaml";

/// Default log file, empty meaning console output only
pub const LOG_FILE_DEFAULT: &str = "";
