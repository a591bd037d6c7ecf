//! Property naming strategies of the JSON binding libraries.

use crate::error::{Error, Result};
use crate::index::local_name;
use log::warn;

/// Translates bean property names into serialized names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingStrategy {
    #[default]
    Identity,
    /// `firstName` -> `first-name`
    LowerCaseWithDashes,
    /// `firstName` -> `first_name`
    LowerCaseWithUnderscores,
    /// `firstName` -> `FirstName`
    UpperCamelCase,
    /// `firstName` -> `First Name`
    UpperCamelCaseWithSpaces,
    /// Jackson `SnakeCaseStrategy`
    SnakeCase,
    /// Jackson `UpperSnakeCaseStrategy`
    UpperSnakeCase,
    /// Jackson `KebabCaseStrategy`
    KebabCase,
    /// Jackson `LowerCaseStrategy`
    LowerCase,
    /// Jackson `LowerDotCaseStrategy`
    LowerDotCase,
}

impl NamingStrategy {
    /// Resolves a strategy from a JSON-B constant or a Jackson strategy class name
    pub fn from_name(name: &str) -> Option<Self> {
        let strategy = match name {
            "IDENTITY" | "CASE_INSENSITIVE" => NamingStrategy::Identity,
            "LOWER_CASE_WITH_DASHES" => NamingStrategy::LowerCaseWithDashes,
            "LOWER_CASE_WITH_UNDERSCORES" => NamingStrategy::LowerCaseWithUnderscores,
            "UPPER_CAMEL_CASE" => NamingStrategy::UpperCamelCase,
            "UPPER_CAMEL_CASE_WITH_SPACES" => NamingStrategy::UpperCamelCaseWithSpaces,
            _ => match local_name(name) {
                "SnakeCaseStrategy" | "SNAKE_CASE" => NamingStrategy::SnakeCase,
                "UpperSnakeCaseStrategy" | "UPPER_SNAKE_CASE" => NamingStrategy::UpperSnakeCase,
                "KebabCaseStrategy" | "KEBAB_CASE" => NamingStrategy::KebabCase,
                "LowerCaseStrategy" | "LOWER_CASE" => NamingStrategy::LowerCase,
                "LowerDotCaseStrategy" | "LOWER_DOT_CASE" => NamingStrategy::LowerDotCase,
                "UpperCamelCaseStrategy" | "UPPER_CAMEL_CASE" => NamingStrategy::UpperCamelCase,
                "LowerCamelCaseStrategy" | "LOWER_CAMEL_CASE" => NamingStrategy::Identity,
                _ => return None,
            },
        };
        Some(strategy)
    }

    /// Resolves the configured global strategy; unknown names are a configuration error
    pub fn from_config(value: &str) -> Result<Self> {
        Self::from_name(value).ok_or_else(|| {
            Error::InvalidConfig(format!("unknown property naming strategy `{}`", value))
        })
    }

    /// Resolves a class-level `@JsonNaming` value, falling back to identity
    pub fn from_annotation(value: &str) -> Self {
        Self::from_name(value).unwrap_or_else(|| {
            warn!("Unknown naming strategy {}, using property names as declared", value);
            NamingStrategy::Identity
        })
    }

    pub fn translate(&self, name: &str) -> String {
        match self {
            NamingStrategy::Identity => name.to_string(),
            NamingStrategy::LowerCaseWithDashes => split_words(name, true, '-'),
            NamingStrategy::LowerCaseWithUnderscores => split_words(name, true, '_'),
            NamingStrategy::UpperCamelCase => capitalize(name),
            NamingStrategy::UpperCamelCaseWithSpaces => capitalize(&split_words(name, false, ' ')),
            NamingStrategy::SnakeCase => jackson_separated(name, '_'),
            NamingStrategy::UpperSnakeCase => jackson_separated(name, '_').to_uppercase(),
            NamingStrategy::KebabCase => jackson_separated(name, '-'),
            NamingStrategy::LowerCase => name.to_lowercase(),
            NamingStrategy::LowerDotCase => jackson_separated(name, '.'),
        }
    }
}

/// Starts a new word at every uppercase character
fn split_words(name: &str, lowercase: bool, separator: char) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in name.chars() {
        if c.is_uppercase() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            if lowercase {
                current.extend(c.to_lowercase());
            } else {
                current.push(c);
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.join(&separator.to_string())
}

/// Runs of uppercase characters stay in one word
fn jackson_separated(name: &str, separator: char) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    let mut previous_upper = false;

    for c in name.chars() {
        if c.is_uppercase() {
            if !previous_upper && !result.is_empty() && !result.ends_with(separator) {
                result.push(separator);
            }
            result.extend(c.to_lowercase());
            previous_upper = true;
        } else {
            result.push(c);
            previous_upper = false;
        }
    }

    result
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Translates an enum constant with a Jackson `@EnumNaming` strategy
pub fn translate_enum_constant(strategy: &str, constant: &str) -> String {
    match local_name(strategy) {
        "CamelCaseStrategy" => {
            let mut words = constant.split('_').filter(|w| !w.is_empty());
            let mut result = words.next().map(str::to_lowercase).unwrap_or_default();
            for word in words {
                result.push_str(&capitalize(&word.to_lowercase()));
            }
            result
        }
        other => {
            warn!("Unknown enum naming strategy {}, using constants as declared", other);
            constant.to_string()
        }
    }
}
