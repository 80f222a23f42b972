//! Fixer presets (PSR-12, Symfony, migration sets)
//!
//! Maps PHP-CS-Fixer preset names to the rules of this crate they enable,
//! together with the options each preset sets for them.

use crate::fixers::ConfigValue;

/// Available presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Psr2,
    Psr12,
    Symfony,
    PhpCsFixer,
    Php80MigrationRisky,
    PhpCsFixerRisky,
}

/// Option value set by a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetOptionValue {
    Bool(bool),
    List(&'static [&'static str]),
}

impl PresetOptionValue {
    pub fn to_config_value(self) -> ConfigValue {
        match self {
            PresetOptionValue::Bool(b) => ConfigValue::Bool(b),
            PresetOptionValue::List(items) => {
                ConfigValue::Array(items.iter().map(|s| s.to_string()).collect())
            }
        }
    }
}

/// A rule enabled by a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetRule {
    pub name: &'static str,
    pub options: &'static [(&'static str, PresetOptionValue)],
}

impl Preset {
    /// Look up a preset by its configuration key, with or without `@`
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim_start_matches('@').to_lowercase().replace('-', "");
        match normalized.as_str() {
            "psr2" => Some(Preset::Psr2),
            "psr12" => Some(Preset::Psr12),
            "symfony" => Some(Preset::Symfony),
            "phpcsfixer" => Some(Preset::PhpCsFixer),
            "php80migration:risky" => Some(Preset::Php80MigrationRisky),
            "phpcsfixer:risky" => Some(Preset::PhpCsFixerRisky),
            _ => None,
        }
    }

    /// Configuration key of the preset
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Psr2 => "@PSR2",
            Preset::Psr12 => "@PSR12",
            Preset::Symfony => "@Symfony",
            Preset::PhpCsFixer => "@PhpCsFixer",
            Preset::Php80MigrationRisky => "@PHP80Migration:risky",
            Preset::PhpCsFixerRisky => "@PhpCsFixer:risky",
        }
    }

    pub fn is_risky(&self) -> bool {
        matches!(self, Preset::Php80MigrationRisky | Preset::PhpCsFixerRisky)
    }

    /// Rules enabled by the preset
    pub fn rules(&self) -> &'static [PresetRule] {
        match self {
            Preset::Psr2 => PSR2_RULES,
            Preset::Psr12 => PSR12_RULES,
            Preset::Symfony => SYMFONY_RULES,
            Preset::PhpCsFixer => PHPCSFIXER_RULES,
            Preset::Php80MigrationRisky => PHP80_MIGRATION_RISKY_RULES,
            Preset::PhpCsFixerRisky => PHPCSFIXER_RISKY_RULES,
        }
    }
}

const PROPERTY_ONLY: &[(&str, PresetOptionValue)] =
    &[("elements", PresetOptionValue::List(&["property"]))];

/// PSR-2 preset rules
pub const PSR2_RULES: &[PresetRule] = &[PresetRule {
    name: "single_class_element_per_statement",
    options: PROPERTY_ONLY,
}];

/// PSR-12 preset rules
pub const PSR12_RULES: &[PresetRule] = &[PresetRule {
    name: "single_class_element_per_statement",
    options: PROPERTY_ONLY,
}];

/// Symfony preset rules (overrides PSR-12 to split constants too)
pub const SYMFONY_RULES: &[PresetRule] = &[PresetRule {
    name: "single_class_element_per_statement",
    options: &[],
}];

pub const PHPCSFIXER_RULES: &[PresetRule] = SYMFONY_RULES;

pub const PHP80_MIGRATION_RISKY_RULES: &[PresetRule] = &[PresetRule {
    name: "modernize_strpos",
    options: &[],
}];

pub const PHPCSFIXER_RISKY_RULES: &[PresetRule] = &[
    PresetRule {
        name: "modernize_strpos",
        options: &[],
    },
    PresetRule {
        name: "strict_comparison",
        options: &[],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_from_name() {
        assert_eq!(Preset::from_name("@PSR12"), Some(Preset::Psr12));
        assert_eq!(Preset::from_name("@PSR-12"), Some(Preset::Psr12));
        assert_eq!(Preset::from_name("psr2"), Some(Preset::Psr2));
        assert_eq!(
            Preset::from_name("@PHP80Migration:risky"),
            Some(Preset::Php80MigrationRisky)
        );
        assert_eq!(Preset::from_name("@PhpCsFixer:risky"), Some(Preset::PhpCsFixerRisky));
        assert_eq!(Preset::from_name("@Unknown"), None);
    }

    #[test]
    fn test_name_round_trip() {
        for preset in [
            Preset::Psr2,
            Preset::Psr12,
            Preset::Symfony,
            Preset::PhpCsFixer,
            Preset::Php80MigrationRisky,
            Preset::PhpCsFixerRisky,
        ] {
            assert_eq!(Preset::from_name(preset.name()), Some(preset));
        }
    }

    #[test]
    fn test_psr12_restricts_elements_to_properties() {
        let rule = &Preset::Psr12.rules()[0];
        assert_eq!(rule.name, "single_class_element_per_statement");
        assert_eq!(
            rule.options[0].1.to_config_value(),
            ConfigValue::Array(vec!["property".to_string()])
        );
        assert!(Preset::Symfony.rules()[0].options.is_empty());
    }

    #[test]
    fn test_risky_presets() {
        assert!(Preset::Php80MigrationRisky.is_risky());
        assert!(!Preset::Psr12.is_risky());
        assert!(Preset::PhpCsFixerRisky
            .rules()
            .iter()
            .any(|r| r.name == "strict_comparison"));
    }
}
