//! Configuration parsing for PHP-CS-Fixer compatibility
//!
//! This module handles parsing `.php-cs-fixer.php` configuration files,
//! expanding presets and validating per-fixer options.

mod php_parser;
mod presets;
mod resolver;

pub use php_parser::{parse_php_cs_fixer_config, ParseError, PhpCsFixerConfig, RuleConfig};
pub use presets::{Preset, PresetOptionValue, PresetRule};
pub use resolver::{resolve_options, ConfigError, ResolvedOptions};
