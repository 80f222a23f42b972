//! Parser for .php-cs-fixer.php configuration files
//!
//! Extracts configuration using regex patterns and bracket matching on the
//! PHP source directly; the file is never executed.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use thiserror::Error;

use super::presets::Preset;
use crate::fixers::ConfigValue;
use crate::logging;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid PHP config format: {0}")]
    InvalidFormat(String),
    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),
}

/// Configuration for a single fixer rule
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleConfig {
    /// Whether the rule is enabled
    pub enabled: bool,
    /// Rule-specific options
    pub options: HashMap<String, ConfigValue>,
}

/// Parsed PHP-CS-Fixer configuration
#[derive(Debug, Clone, Default)]
pub struct PhpCsFixerConfig {
    /// Rules with their configurations, presets already expanded
    pub rules: HashMap<String, RuleConfig>,
    /// Whether risky rules are allowed
    pub risky_allowed: bool,
}

impl PhpCsFixerConfig {
    /// Parse a .php-cs-fixer.php file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        logging::log_config_load(path);

        let content = std::fs::read_to_string(path)?;
        let config = parse_php_cs_fixer_config(&content)?;

        let enabled = config.rules.values().filter(|r| r.enabled).count();
        logging::log_config_summary(enabled, config.rules.len() - enabled, config.risky_allowed);

        Ok(config)
    }

    /// Check if a specific rule is enabled
    pub fn is_rule_enabled(&self, name: &str) -> bool {
        self.rules.get(name).map(|r| r.enabled).unwrap_or(false)
    }

    /// Get configuration for a specific rule
    pub fn get_rule_config(&self, name: &str) -> Option<&RuleConfig> {
        self.rules.get(name)
    }

    /// Names of enabled rules, sorted
    pub fn enabled_rules(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .rules
            .iter()
            .filter(|(_, rule)| rule.enabled)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

/// Parse PHP-CS-Fixer configuration from a string
pub fn parse_php_cs_fixer_config(content: &str) -> Result<PhpCsFixerConfig, ParseError> {
    Ok(PhpCsFixerConfig {
        risky_allowed: parse_risky_allowed(content)?,
        rules: parse_rules(content)?,
    })
}

/// Parse risky allowed setting
fn parse_risky_allowed(content: &str) -> Result<bool, ParseError> {
    let content = blank_comments(content);
    // Match ->setRiskyAllowed(true) or ->setRiskyAllowed(false)
    let re = Regex::new(r"(?i)->setRiskyAllowed\s*\(\s*(true|false)\s*\)")?;

    Ok(re
        .captures(&content)
        .is_some_and(|caps| caps[1].eq_ignore_ascii_case("true")))
}

/// Parse the `->setRules([...])` array
fn parse_rules(content: &str) -> Result<HashMap<String, RuleConfig>, ParseError> {
    let mut rules = HashMap::new();
    let content = blank_comments(content);
    let content = content.as_str();

    let rules_re = Regex::new(r"->setRules\s*\(\s*\[")?;
    let Some(found) = rules_re.find(content) else {
        return Ok(rules);
    };

    let open = found.end() - 1;
    let close = find_closing_bracket(content, open)
        .ok_or_else(|| ParseError::InvalidFormat("unterminated rules array".to_string()))?;

    let entry_re = Regex::new(r#"^['"]([^'"]+)['"]\s*=>\s*([\s\S]+)$"#)?;
    let mut presets = Vec::new();
    let mut explicit = Vec::new();

    for entry in split_top_level(&content[open + 1..close]) {
        let Some(caps) = entry_re.captures(&entry) else {
            return Err(ParseError::InvalidFormat(format!("unexpected rules entry: {}", entry)));
        };
        let key = caps[1].to_string();
        let value = caps[2].trim().to_string();

        if key.starts_with('@') {
            presets.push((key, value));
        } else {
            explicit.push((key, value));
        }
    }

    for (key, value) in presets {
        if !parse_bool(&value).ok_or_else(|| invalid_value(&key, &value))? {
            continue;
        }
        let Some(preset) = Preset::from_name(&key) else {
            logging::log(&format!("Ignoring unknown preset: {}", key));
            continue;
        };
        for rule in preset.rules() {
            let options = rule
                .options
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_config_value()))
                .collect();
            rules.insert(
                rule.name.to_string(),
                RuleConfig {
                    enabled: true,
                    options,
                },
            );
        }
    }

    for (key, value) in explicit {
        let rule = if let Some(enabled) = parse_bool(&value) {
            RuleConfig {
                enabled,
                options: HashMap::new(),
            }
        } else if value.starts_with('[') {
            RuleConfig {
                enabled: true,
                options: parse_options(&key, &value)?,
            }
        } else {
            return Err(invalid_value(&key, &value));
        };
        rules.insert(key, rule);
    }

    Ok(rules)
}

/// Parse `['option' => value, ...]`
fn parse_options(rule: &str, array: &str) -> Result<HashMap<String, ConfigValue>, ParseError> {
    let mut options = HashMap::new();
    let inner = strip_brackets(array).ok_or_else(|| invalid_value(rule, array))?;
    let option_re = Regex::new(r#"^['"]([A-Za-z0-9_]+)['"]\s*=>\s*([\s\S]+)$"#)?;

    for entry in split_top_level(inner) {
        let caps = option_re
            .captures(&entry)
            .ok_or_else(|| invalid_value(rule, &entry))?;
        let value = parse_value(caps[2].trim()).ok_or_else(|| invalid_value(rule, &entry))?;
        options.insert(caps[1].to_string(), value);
    }

    Ok(options)
}

/// Parse a scalar or a list of strings
fn parse_value(value: &str) -> Option<ConfigValue> {
    if let Some(b) = parse_bool(value) {
        return Some(ConfigValue::Bool(b));
    }
    if let Some(s) = unquote(value) {
        return Some(ConfigValue::String(s.to_string()));
    }
    if let Ok(n) = value.parse::<i64>() {
        return Some(ConfigValue::Number(n));
    }

    let inner = strip_brackets(value)?;
    split_top_level(inner)
        .into_iter()
        .map(|item| unquote(&item).map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .map(ConfigValue::Array)
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn invalid_value(key: &str, value: &str) -> ParseError {
    ParseError::InvalidFormat(format!("unsupported value for '{}': {}", key, value))
}

fn unquote(value: &str) -> Option<&str> {
    let value = value.trim();
    let quote = value.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    if value.len() >= 2 && value.ends_with(quote) {
        Some(&value[1..value.len() - 1])
    } else {
        None
    }
}

fn strip_brackets(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.starts_with('[') && find_closing_bracket(value, 0) == Some(value.len() - 1) {
        Some(&value[1..value.len() - 1])
    } else {
        None
    }
}

/// Copy of `content` with every `//`, `#` and `/* */` comment blanked
/// out. Byte offsets and line breaks are preserved; `#[` is not a comment.
fn blank_comments(content: &str) -> String {
    let bytes = content.as_bytes();
    let mut blanked = bytes.to_vec();
    let mut quote: Option<u8> = None;
    let mut escaped = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        let comment_end = match (b, bytes.get(i + 1)) {
            (b'/', Some(b'/')) => Some(line_end(bytes, i)),
            (b'#', next) if next != Some(&b'[') => Some(line_end(bytes, i)),
            (b'/', Some(b'*')) => Some(
                content[i + 2..]
                    .find("*/")
                    .map_or(bytes.len(), |at| i + 2 + at + 2),
            ),
            _ => None,
        };

        match comment_end {
            Some(end) => {
                for byte in &mut blanked[i..end] {
                    if !matches!(*byte, b'\n' | b'\r') {
                        *byte = b' ';
                    }
                }
                i = end;
            }
            None => {
                if b == b'\'' || b == b'"' {
                    quote = Some(b);
                }
                i += 1;
            }
        }
    }

    // Only whole comments were replaced, so the bytes are still UTF-8
    String::from_utf8(blanked).unwrap_or_else(|_| content.to_string())
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n' || b == b'\r')
        .map_or(bytes.len(), |at| from + at)
}

/// Index of the `]` matching the `[` at `open`, skipping quoted strings
fn find_closing_bracket(content: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for (i, &b) in content.as_bytes().iter().enumerate().skip(open) {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            continue;
        }

        match b {
            b'\'' | b'"' => quote = Some(b),
            b'[' => depth += 1,
            b']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}

/// Split on commas that are outside brackets and quotes. Parts are
/// trimmed and empty parts (a trailing comma) dropped.
fn split_top_level(content: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, &b) in content.as_bytes().iter().enumerate() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            continue;
        }

        match b {
            b'\'' | b'"' => quote = Some(b),
            b'[' | b'(' => depth += 1,
            b']' | b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(content[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(content[start..].trim().to_string());

    parts.retain(|part| !part.is_empty());
    parts
}
