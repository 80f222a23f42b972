//! Fixer registry for managing available fixers
//!
//! The registry collects all available fixers and provides methods
//! to look them up by name, configure them and apply them in priority order.

use std::collections::HashMap;
use std::path::Path;

use phpfix_core::{diff_to_edit, Edit, Tokens};

use super::alias::ModernizeStrposFixer;
use super::class::SingleClassElementPerStatementFixer;
use super::risky::StrictComparisonFixer;
use super::{ConfigValue, Fixer, FixerConfig};
use crate::config::{ConfigError, PhpCsFixerConfig};
use crate::logging;

/// Information about a registered fixer
#[derive(Debug, Clone)]
pub struct FixerInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub priority: i32,
    pub is_risky: bool,
}

/// Registry of all available fixers
pub struct FixerRegistry {
    fixers: Vec<Box<dyn Fixer>>,
    by_name: HashMap<&'static str, usize>,
}

impl FixerRegistry {
    /// Create a new registry with all built-in fixers
    pub fn new() -> Self {
        let mut registry = Self {
            fixers: Vec::new(),
            by_name: HashMap::new(),
        };

        registry.register(Box::new(SingleClassElementPerStatementFixer::default()));
        registry.register(Box::new(StrictComparisonFixer));
        registry.register(Box::new(ModernizeStrposFixer::default()));

        // Sort by priority (descending - higher priority runs first)
        registry.fixers.sort_by(|a, b| b.priority().cmp(&a.priority()));

        // Rebuild indices after sorting
        registry.by_name.clear();
        for (idx, fixer) in registry.fixers.iter().enumerate() {
            registry.by_name.insert(fixer.name(), idx);
        }

        registry
    }

    /// Build a registry configured from a parsed `.php-cs-fixer.php`.
    ///
    /// Returns the registry and the enabled rule names it implements.
    /// Rules this crate does not provide are skipped.
    pub fn from_config(config: &PhpCsFixerConfig) -> Result<(Self, Vec<String>), ConfigError> {
        let mut registry = Self::new();
        let mut enabled = Vec::new();

        for name in config.enabled_rules() {
            if registry.get(name).is_none() {
                logging::log_fixer_skipped(name, "not implemented");
                continue;
            }
            if let Some(rule) = config.get_rule_config(name) {
                registry.configure(name, &rule.options)?;
            }
            enabled.push(name.to_string());
        }

        Ok((registry, enabled))
    }

    /// Register a fixer
    fn register(&mut self, fixer: Box<dyn Fixer>) {
        let idx = self.fixers.len();
        self.by_name.insert(fixer.name(), idx);
        self.fixers.push(fixer);
    }

    /// Get a fixer by name
    pub fn get(&self, name: &str) -> Option<&dyn Fixer> {
        self.by_name.get(name).map(|&idx| self.fixers[idx].as_ref())
    }

    /// Validate and apply options to the named fixer
    pub fn configure(
        &mut self,
        name: &str,
        options: &HashMap<String, ConfigValue>,
    ) -> Result<(), ConfigError> {
        let idx = *self
            .by_name
            .get(name)
            .ok_or_else(|| ConfigError::UnknownFixer(name.to_string()))?;

        self.fixers[idx].configure(options)?;

        let mut described: Vec<String> = options
            .iter()
            .map(|(key, value)| format!("{}={:?}", key, value))
            .collect();
        described.sort();
        logging::log_fixer_configured(name, &described);

        Ok(())
    }

    /// Get all fixers in priority order
    pub fn all(&self) -> impl Iterator<Item = &dyn Fixer> {
        self.fixers.iter().map(|f| f.as_ref())
    }

    /// Get information about all fixers
    pub fn list(&self) -> Vec<FixerInfo> {
        self.fixers
            .iter()
            .map(|f| FixerInfo {
                name: f.name(),
                description: f.description(),
                priority: f.priority(),
                is_risky: f.is_risky(),
            })
            .collect()
    }

    /// Check source with specified fixers
    ///
    /// Tokenizes once and runs the fixers in priority order over the shared
    /// token stream, so each fixer sees the tokens the previous ones left.
    /// Risky fixers only run when `config.risky_allowed` is set.
    ///
    /// Returns (fixed_source, edits). There is one edit per fixer that
    /// changed something, expressed against the source as it was before
    /// that fixer ran.
    pub fn check(
        &self,
        source: &str,
        fixer_names: &[&str],
        config: &FixerConfig,
    ) -> (String, Vec<Edit>) {
        self.check_file(Path::new(""), source, fixer_names, config)
    }

    /// Same as [`FixerRegistry::check`], passing `file` on to the fixers
    pub fn check_file(
        &self,
        file: &Path,
        source: &str,
        fixer_names: &[&str],
        config: &FixerConfig,
    ) -> (String, Vec<Edit>) {
        let mut all_edits = Vec::new();
        let mut tokens = Tokens::from_code(source);
        let mut current_source = source.to_string();

        // Registry order is already descending priority
        let fixers_to_run = self
            .fixers
            .iter()
            .filter(|f| fixer_names.contains(&f.name()));

        for fixer in fixers_to_run {
            if fixer.is_risky() && !config.risky_allowed {
                logging::log_fixer_skipped(fixer.name(), "risky fixers are not allowed");
                continue;
            }
            if !fixer.is_candidate(&tokens) {
                logging::log_fixer_skipped(fixer.name(), "not a candidate");
                continue;
            }

            fixer.apply_fix(file, &mut tokens);
            tokens.clear_empty_tokens();

            let new_source = tokens.generate_code();
            let edit = diff_to_edit(&current_source, &new_source, fixer.description());
            logging::log_fixer_result(fixer.name(), edit.is_some());

            if let Some(edit) = edit {
                all_edits.push(edit.with_rule(fixer.name()));
                current_source = new_source;
            }
        }

        (current_source, all_edits)
    }

    /// Check source with all fixers
    pub fn check_all(&self, source: &str, config: &FixerConfig) -> (String, Vec<Edit>) {
        let names: Vec<&str> = self.fixers.iter().map(|f| f.name()).collect();
        self.check(source, &names, config)
    }

    /// Number of registered fixers
    pub fn len(&self) -> usize {
        self.fixers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.fixers.is_empty()
    }
}

impl Default for FixerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn risky() -> FixerConfig {
        FixerConfig {
            risky_allowed: true,
        }
    }

    #[test]
    fn test_registry_has_fixers() {
        let registry = FixerRegistry::new();
        assert_eq!(registry.len(), 3);
        assert!(registry.get("modernize_strpos").is_some());
        assert!(registry.get("single_class_element_per_statement").is_some());
        assert!(registry.get("strict_comparison").is_some());
        assert!(registry.get("no_such_fixer").is_none());
    }

    #[test]
    fn test_priority_order() {
        let registry = FixerRegistry::new();
        let names: Vec<&str> = registry.all().map(|f| f.name()).collect();
        assert_eq!(
            names,
            vec![
                "single_class_element_per_statement",
                "strict_comparison",
                "modernize_strpos"
            ]
        );
    }

    #[test]
    fn test_list_fixers() {
        let list = FixerRegistry::new().list();
        for info in &list {
            assert!(!info.name.is_empty());
            assert!(!info.description.is_empty());
        }
        assert!(list.iter().any(|i| i.name == "modernize_strpos" && i.is_risky));
        assert!(list
            .iter()
            .any(|i| i.name == "single_class_element_per_statement" && !i.is_risky));
    }

    #[test]
    fn test_strict_comparison_runs_before_modernize_strpos() {
        let registry = FixerRegistry::new();
        let source = "<?php\n$r = strpos($a, $b) != false;\n";

        let (fixed, edits) = registry.check(
            source,
            &["modernize_strpos", "strict_comparison"],
            &risky(),
        );

        assert_eq!(fixed, "<?php\n$r = str_contains($a, $b)  ;\n");
        let rules: Vec<_> = edits.iter().map(|e| e.rule.as_deref()).collect();
        assert_eq!(rules, vec![Some("strict_comparison"), Some("modernize_strpos")]);
    }

    #[test]
    fn test_risky_fixers_skipped_by_default() {
        let registry = FixerRegistry::new();
        let source = "<?php\n$r = strpos($a, $b) !== false;\n";

        let (fixed, edits) = registry.check(source, &["modernize_strpos"], &FixerConfig::default());
        assert_eq!(fixed, source);
        assert!(edits.is_empty());
    }

    #[test]
    fn test_configure_unknown_fixer() {
        let mut registry = FixerRegistry::new();
        let err = registry.configure("nope", &HashMap::new()).unwrap_err();
        assert_eq!(err, ConfigError::UnknownFixer("nope".to_string()));
    }

    #[test]
    fn test_configure_stripos() {
        let mut registry = FixerRegistry::new();
        let source = "<?php\n$r = stripos($a, $b) === 0;\n";

        let (unchanged, _) = registry.check(source, &["modernize_strpos"], &risky());
        assert_eq!(unchanged, source);

        let options = HashMap::from([("modernize_stripos".to_string(), ConfigValue::Bool(true))]);
        registry.configure("modernize_strpos", &options).unwrap();

        let (fixed, _) = registry.check(source, &["modernize_strpos"], &risky());
        assert_eq!(
            fixed,
            "<?php\n$r = str_starts_with(strtolower($a), strtolower($b))  ;\n"
        );
    }

    #[test]
    fn test_check_all_edits_replay() {
        let registry = FixerRegistry::new();
        let source = "<?php\nclass A {\n    public $a, $b;\n}\nif ($x == 1) {}\n";

        let (fixed, edits) = registry.check_all(source, &risky());
        assert_eq!(
            fixed,
            "<?php\nclass A {\n    public $a;\n    public $b;\n}\nif ($x === 1) {}\n"
        );

        let mut replayed = source.to_string();
        for edit in &edits {
            replayed = phpfix_core::apply_edits(&replayed, std::slice::from_ref(edit)).unwrap();
        }
        assert_eq!(replayed, fixed);
    }
}
