//! Fixer implementations for PHP-CS-Fixer compatibility
//!
//! Every fixer works on a shared token stream: the registry tokenizes a file
//! once, hands the stream to each enabled fixer in priority order and
//! regenerates the source afterwards.

mod registry;
pub mod alias;
pub mod class;
pub mod risky;

pub use registry::{FixerInfo, FixerRegistry};

use std::collections::HashMap;
use std::path::Path;

use phpfix_core::{diff_to_edit, Edit, Tokens};

use crate::config::{resolve_options, ConfigError, PhpCsFixerConfig};

/// Run-wide settings passed to the registry
#[derive(Debug, Clone, Default)]
pub struct FixerConfig {
    /// Whether fixers that may change behavior are allowed to run
    pub risky_allowed: bool,
}

impl From<&PhpCsFixerConfig> for FixerConfig {
    fn from(config: &PhpCsFixerConfig) -> Self {
        Self {
            risky_allowed: config.risky_allowed,
        }
    }
}

/// Configuration value types for fixer options
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    String(String),
    Number(i64),
    Array(Vec<String>),
}

impl ConfigValue {
    /// Human-readable name of the value's type
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "bool",
            ConfigValue::String(_) => "string",
            ConfigValue::Number(_) => "int",
            ConfigValue::Array(_) => "array",
        }
    }
}

/// An input/output example of a fixer
#[derive(Debug, Clone)]
pub struct CodeSample {
    pub code: &'static str,
    /// Options the sample is run with, empty for defaults
    pub options: Vec<(&'static str, ConfigValue)>,
}

impl CodeSample {
    pub fn new(code: &'static str) -> Self {
        Self {
            code,
            options: Vec::new(),
        }
    }

    pub fn with_option(mut self, name: &'static str, value: ConfigValue) -> Self {
        self.options.push((name, value));
        self
    }
}

/// Documentation of a fixer
#[derive(Debug, Clone)]
pub struct FixerDefinition {
    pub summary: &'static str,
    pub samples: Vec<CodeSample>,
    /// Longer explanation, if the summary is not enough
    pub description: Option<&'static str>,
    /// Why the fixer is risky, for risky fixers
    pub risky_description: Option<&'static str>,
}

/// A fixer that rewrites PHP tokens in place
pub trait Fixer: Send + Sync {
    /// Name used in configuration files
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Description, samples and risk explanation
    fn definition(&self) -> FixerDefinition;

    /// Execution priority (higher = runs first)
    /// PHP-CS-Fixer values are kept so that relative order matches:
    /// - 56: single_class_element_per_statement
    /// - 38: strict_comparison
    /// - 37: modernize_strpos
    fn priority(&self) -> i32;

    /// Whether this fixer makes risky changes
    fn is_risky(&self) -> bool {
        false
    }

    /// Cheap pre-check: can this stream contain anything to fix
    fn is_candidate(&self, tokens: &Tokens) -> bool;

    /// Rewrite `tokens` in place
    fn apply_fix(&self, file: &Path, tokens: &mut Tokens);

    /// Get configurable options for this fixer
    fn options(&self) -> Vec<FixerOption> {
        vec![]
    }

    /// Validate and apply options; missing options fall back to defaults
    fn configure(&mut self, options: &HashMap<String, ConfigValue>) -> Result<(), ConfigError> {
        resolve_options(self.name(), &self.options(), options)?;
        Ok(())
    }

    /// Run the fixer alone over `source` and report the change as one edit
    fn check(&self, source: &str) -> Vec<Edit> {
        let mut tokens = Tokens::from_code(source);
        if !self.is_candidate(&tokens) {
            return vec![];
        }

        self.apply_fix(Path::new(""), &mut tokens);
        if !tokens.is_changed() {
            return vec![];
        }

        diff_to_edit(source, &tokens.generate_code(), self.description())
            .map(|edit| edit.with_rule(self.name()))
            .into_iter()
            .collect()
    }
}

/// A configurable option for a fixer
#[derive(Debug, Clone)]
pub struct FixerOption {
    pub name: &'static str,
    pub description: &'static str,
    pub option_type: OptionType,
    pub default: Option<ConfigValue>,
}

/// Type of a fixer option
#[derive(Debug, Clone)]
pub enum OptionType {
    Bool,
    /// Any subset of a fixed set of strings
    Subset(Vec<&'static str>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixers::risky::StrictComparisonFixer;

    #[test]
    fn test_default_check_reports_single_edit() {
        let source = "<?php\nif ($a == $b) {}\n";
        let edits = StrictComparisonFixer.check(source);

        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].rule.as_deref(), Some("strict_comparison"));
        assert_eq!(
            phpfix_core::apply_edits(source, &edits).unwrap(),
            "<?php\nif ($a === $b) {}\n"
        );
    }

    #[test]
    fn test_default_check_without_candidate() {
        assert!(StrictComparisonFixer.check("<?php echo 1;").is_empty());
    }

    #[test]
    fn test_config_from_php_cs_fixer_config() {
        let parsed = PhpCsFixerConfig {
            risky_allowed: true,
            ..Default::default()
        };
        assert!(FixerConfig::from(&parsed).risky_allowed);
        assert!(!FixerConfig::default().risky_allowed);
    }

    #[test]
    fn test_code_sample_options() {
        let sample = CodeSample::new("<?php\n").with_option("elements", ConfigValue::Array(vec![]));
        assert_eq!(sample.options.len(), 1);
        assert_eq!(sample.options[0].1.type_name(), "array");
    }
}
