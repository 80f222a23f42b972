//! Validation of fixer options against their declared schema

use std::collections::HashMap;

use thiserror::Error;

use crate::fixers::{ConfigValue, FixerOption, OptionType};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Unknown fixer: {0}")]
    UnknownFixer(String),

    #[error("[{fixer}] Invalid configuration: unknown option \"{option}\"")]
    UnknownOption { fixer: String, option: String },

    #[error("[{fixer}] Invalid configuration: option \"{option}\" expects {expected}, got {actual}")]
    InvalidOptionType {
        fixer: String,
        option: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("[{fixer}] Invalid configuration: option \"{option}\" has invalid value \"{value}\", allowed: {allowed}")]
    InvalidOptionValue {
        fixer: String,
        option: String,
        value: String,
        allowed: String,
    },
}

/// Options after validation, defaults filled in
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedOptions {
    values: HashMap<String, ConfigValue>,
}

impl ResolvedOptions {
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.values.get(name)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name)? {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn get_string_array(&self, name: &str) -> Option<&[String]> {
        match self.values.get(name)? {
            ConfigValue::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Option names and values as `name=value` strings, sorted by name
    pub fn describe(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .values
            .iter()
            .map(|(name, value)| format!("{}={}", name, format_value(value)))
            .collect();
        lines.sort();
        lines
    }
}

fn format_value(value: &ConfigValue) -> String {
    match value {
        ConfigValue::Bool(b) => b.to_string(),
        ConfigValue::String(s) => s.clone(),
        ConfigValue::Number(n) => n.to_string(),
        ConfigValue::Array(values) => format!("[{}]", values.join(", ")),
    }
}

/// Check `options` against `schema` for the fixer named `fixer`
pub fn resolve_options(
    fixer: &str,
    schema: &[FixerOption],
    options: &HashMap<String, ConfigValue>,
) -> Result<ResolvedOptions, ConfigError> {
    let mut names: Vec<&String> = options.keys().collect();
    names.sort();
    for name in names {
        if !schema.iter().any(|option| option.name == name.as_str()) {
            return Err(ConfigError::UnknownOption {
                fixer: fixer.to_string(),
                option: name.clone(),
            });
        }
    }

    let mut values = HashMap::new();

    for option in schema {
        let value = match options.get(option.name) {
            Some(value) => {
                validate(fixer, option, value)?;
                value.clone()
            }
            None => match &option.default {
                Some(default) => default.clone(),
                None => continue,
            },
        };
        values.insert(option.name.to_string(), value);
    }

    Ok(ResolvedOptions { values })
}

fn validate(fixer: &str, option: &FixerOption, value: &ConfigValue) -> Result<(), ConfigError> {
    let invalid_type = |expected: &'static str| ConfigError::InvalidOptionType {
        fixer: fixer.to_string(),
        option: option.name.to_string(),
        expected,
        actual: value.type_name(),
    };
    let invalid_value = |bad: &str, allowed: &[&'static str]| ConfigError::InvalidOptionValue {
        fixer: fixer.to_string(),
        option: option.name.to_string(),
        value: bad.to_string(),
        allowed: allowed.join(", "),
    };

    match (&option.option_type, value) {
        (OptionType::Bool, ConfigValue::Bool(_)) => Ok(()),
        (OptionType::Bool, _) => Err(invalid_type("bool")),
        (OptionType::Subset(allowed), ConfigValue::Array(values)) => {
            match values.iter().find(|v| !allowed.iter().any(|a| a == v)) {
                Some(bad) => Err(invalid_value(bad.as_str(), allowed.as_slice())),
                None => Ok(()),
            }
        }
        (OptionType::Subset(_), _) => Err(invalid_type("array")),
    }
}
