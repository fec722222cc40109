//! String conventions
//!
//! This module contains the casing and character-class rules a placeholder
//! value can be held to, together with conversions between them.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PLACEHOLDER_EXPRESSION;

const SNAKE_CASE_SHAPE: &str = r"[a-z0-9]+(?:_[a-z0-9]+)*";
const UPPER_SNAKE_CASE_SHAPE: &str = r"[A-Z0-9]+(?:_[A-Z0-9]+)*";
const CAMEL_CASE_SHAPE: &str = r"[a-z][a-z0-9]*(?:[A-Z][a-z0-9]*)*";
const KEBAB_CASE_SHAPE: &str = r"[a-z0-9]+(?:-[a-z0-9]+)*";
const PASCAL_CASE_SHAPE: &str = r"(?:[A-Z][a-z0-9]*)+";
const UPPER_CASE_SHAPE: &str = r"[A-Z0-9_.\-]+";
const LOWER_CASE_SHAPE: &str = r"[a-z0-9_.\-]+";

fn full_match(shape: &str) -> Regex {
    Regex::new(&format!("^(?:{shape})$")).expect("Failed to compile string convention shape")
}

static SNAKE_CASE_RE: Lazy<Regex> = Lazy::new(|| full_match(SNAKE_CASE_SHAPE));
static UPPER_SNAKE_CASE_RE: Lazy<Regex> = Lazy::new(|| full_match(UPPER_SNAKE_CASE_SHAPE));
static CAMEL_CASE_RE: Lazy<Regex> = Lazy::new(|| full_match(CAMEL_CASE_SHAPE));
static KEBAB_CASE_RE: Lazy<Regex> = Lazy::new(|| full_match(KEBAB_CASE_SHAPE));
static PASCAL_CASE_RE: Lazy<Regex> = Lazy::new(|| full_match(PASCAL_CASE_SHAPE));
static UPPER_CASE_RE: Lazy<Regex> = Lazy::new(|| full_match(UPPER_CASE_SHAPE));
static LOWER_CASE_RE: Lazy<Regex> = Lazy::new(|| full_match(LOWER_CASE_SHAPE));

/// A naming convention a captured value can be validated against
///
/// Every convention knows the regular expression shape a value must have, so
/// the template compiler can embed it directly into the matcher, and the same
/// shape doubles as a standalone recogniser through [`StringConvention::matches`].
///
/// # Examples
///
/// ```
/// use naming_convention::StringConvention;
///
/// assert!(StringConvention::SnakeCase.matches("single_test"));
/// assert!(!StringConvention::SnakeCase.matches("singleTest"));
/// assert_eq!(StringConvention::PascalCase.convert("single_test"), "SingleTest");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum StringConvention {
    /// No constraint
    #[default]
    #[serde(rename = "none")]
    None,
    /// `snake_case`
    #[serde(rename = "snake", alias = "snake_case")]
    SnakeCase,
    /// `UPPER_SNAKE_CASE`
    #[serde(rename = "upper_snake", alias = "usnake", alias = "upper_snake_case")]
    UpperSnakeCase,
    /// `camelCase`
    #[serde(rename = "camel", alias = "camel_case")]
    CamelCase,
    /// `kebab-case`
    #[serde(rename = "kebab", alias = "kebab_case")]
    KebabCase,
    /// `PascalCase`
    #[serde(rename = "pascal", alias = "pascal_case")]
    PascalCase,
    /// No lowercase letters
    #[serde(rename = "upper", alias = "upper_case")]
    UpperCase,
    /// No uppercase letters
    #[serde(rename = "lower", alias = "lower_case")]
    LowerCase,
}

impl StringConvention {
    /// All conventions, in declaration order
    pub const ALL: [StringConvention; 8] = [
        StringConvention::None,
        StringConvention::SnakeCase,
        StringConvention::UpperSnakeCase,
        StringConvention::CamelCase,
        StringConvention::KebabCase,
        StringConvention::PascalCase,
        StringConvention::UpperCase,
        StringConvention::LowerCase,
    ];

    /// Regular expression shape a value of this convention must have
    ///
    /// `None` yields the default placeholder expression, which accepts word
    /// characters, dots and dashes but never a path separator.
    pub fn shape(&self) -> &'static str {
        match self {
            StringConvention::None => DEFAULT_PLACEHOLDER_EXPRESSION,
            StringConvention::SnakeCase => SNAKE_CASE_SHAPE,
            StringConvention::UpperSnakeCase => UPPER_SNAKE_CASE_SHAPE,
            StringConvention::CamelCase => CAMEL_CASE_SHAPE,
            StringConvention::KebabCase => KEBAB_CASE_SHAPE,
            StringConvention::PascalCase => PASCAL_CASE_SHAPE,
            StringConvention::UpperCase => UPPER_CASE_SHAPE,
            StringConvention::LowerCase => LOWER_CASE_SHAPE,
        }
    }

    /// Checks whether the whole of `value` conforms to the convention
    ///
    /// `None` accepts any string.
    pub fn matches(&self, value: &str) -> bool {
        let recogniser: &Regex = match self {
            StringConvention::None => return true,
            StringConvention::SnakeCase => &SNAKE_CASE_RE,
            StringConvention::UpperSnakeCase => &UPPER_SNAKE_CASE_RE,
            StringConvention::CamelCase => &CAMEL_CASE_RE,
            StringConvention::KebabCase => &KEBAB_CASE_RE,
            StringConvention::PascalCase => &PASCAL_CASE_RE,
            StringConvention::UpperCase => &UPPER_CASE_RE,
            StringConvention::LowerCase => &LOWER_CASE_RE,
        };
        recogniser.is_match(value)
    }

    /// The `\marker` used inside a placeholder to request this convention
    ///
    /// Returns `None` for [`StringConvention::None`], which has no marker.
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            StringConvention::None => None,
            StringConvention::SnakeCase => Some(r"\snake"),
            StringConvention::UpperSnakeCase => Some(r"\usnake"),
            StringConvention::CamelCase => Some(r"\camel"),
            StringConvention::KebabCase => Some(r"\kebab"),
            StringConvention::PascalCase => Some(r"\pascal"),
            StringConvention::UpperCase => Some(r"\upper"),
            StringConvention::LowerCase => Some(r"\lower"),
        }
    }

    /// Looks up the convention a placeholder expression marker stands for
    pub fn from_marker(expression: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|convention| convention.marker() == Some(expression))
    }

    /// Converts `value` into this convention
    ///
    /// The value is split into words on anything that is not an ASCII letter
    /// or digit as well as on case changes (`singleTest`, `HTTPServer`), then
    /// joined again the way the convention expects. Camel and Pascal case
    /// cannot start with a digit, so leading digits are dropped. `UpperCase`
    /// and `LowerCase` keep `_`, `.` and `-`, change case, and turn any other
    /// character into `_`. `None` returns the value untouched.
    ///
    /// A value without letters or digits converts to an empty string, which
    /// only `None` accepts. So does a value without letters for Camel and
    /// Pascal case.
    pub fn convert(&self, value: &str) -> String {
        match self {
            StringConvention::None => value.to_string(),
            StringConvention::UpperCase => map_chars(value, char::to_ascii_uppercase),
            StringConvention::LowerCase => map_chars(value, char::to_ascii_lowercase),
            StringConvention::SnakeCase => join_words(value, "_", str::to_ascii_lowercase),
            StringConvention::UpperSnakeCase => join_words(value, "_", str::to_ascii_uppercase),
            StringConvention::KebabCase => join_words(value, "-", str::to_ascii_lowercase),
            StringConvention::PascalCase => {
                letter_first_words(value).iter().map(|word| capitalise(word)).collect()
            }
            StringConvention::CamelCase => {
                let words = letter_first_words(value);
                let mut result = String::with_capacity(value.len());
                for (index, word) in words.iter().enumerate() {
                    if index == 0 {
                        result.push_str(&word.to_ascii_lowercase());
                    } else {
                        result.push_str(&capitalise(word));
                    }
                }
                result
            }
        }
    }
}

impl fmt::Display for StringConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StringConvention::None => "none",
            StringConvention::SnakeCase => "snake",
            StringConvention::UpperSnakeCase => "upper_snake",
            StringConvention::CamelCase => "camel",
            StringConvention::KebabCase => "kebab",
            StringConvention::PascalCase => "pascal",
            StringConvention::UpperCase => "upper",
            StringConvention::LowerCase => "lower",
        };
        f.write_str(name)
    }
}

impl FromStr for StringConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('\\').to_lowercase();
        match trimmed.as_str() {
            "none" | "" => Ok(StringConvention::None),
            "snake" | "snake_case" => Ok(StringConvention::SnakeCase),
            "usnake" | "upper_snake" | "upper_snake_case" => Ok(StringConvention::UpperSnakeCase),
            "camel" | "camel_case" => Ok(StringConvention::CamelCase),
            "kebab" | "kebab_case" => Ok(StringConvention::KebabCase),
            "pascal" | "pascal_case" => Ok(StringConvention::PascalCase),
            "upper" | "upper_case" => Ok(StringConvention::UpperCase),
            "lower" | "lower_case" => Ok(StringConvention::LowerCase),
            _ => Err(format!("Unknown string convention: {s}")),
        }
    }
}

/// Splits a value into its words
///
/// Characters other than ASCII letters and digits separate words and are
/// dropped. A new word also starts where a lowercase letter or digit is
/// followed by an uppercase letter, and before the last capital of an acronym
/// that is followed by a lowercase letter.
pub fn split_words(value: &str) -> Vec<String> {
    let chars: Vec<char> = value.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (index, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_ascii_uppercase() && !current.is_empty() {
            let previous = chars[index - 1];
            let next_is_lower = chars
                .get(index + 1)
                .is_some_and(|next| next.is_ascii_lowercase());
            if previous.is_ascii_lowercase()
                || previous.is_ascii_digit()
                || (previous.is_ascii_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn join_words(value: &str, separator: &str, transform: fn(&str) -> String) -> String {
    split_words(value)
        .iter()
        .map(|word| transform(word))
        .collect::<Vec<_>>()
        .join(separator)
}

// Words of `value` with the digits in front of the first letter removed
fn letter_first_words(value: &str) -> Vec<String> {
    let mut words = split_words(value);
    while let Some(first) = words.first_mut() {
        let trimmed = first.trim_start_matches(|c: char| c.is_ascii_digit());
        if trimmed.is_empty() {
            words.remove(0);
        } else {
            *first = trimmed.to_string();
            break;
        }
    }
    words
}

fn map_chars(value: &str, transform: fn(&char) -> char) -> String {
    value
        .chars()
        .map(|c| match c {
            '_' | '.' | '-' => c,
            c if c.is_ascii_alphanumeric() => transform(&c),
            _ => '_',
        })
        .collect()
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut result = first.to_ascii_uppercase().to_string();
            result.push_str(&chars.as_str().to_ascii_lowercase());
            result
        }
        None => String::new(),
    }
}
