//! phpfix-fixer: PHP-CS-Fixer compatible token fixers
//!
//! Fixers run over a shared [`phpfix_core::Tokens`] stream in priority
//! order and rewrite it in place. The registry reports the outcome as
//! edits against the original source.
//!
//! # Features
//!
//! - `modernize_strpos`: `strpos(...) !== false` and friends become
//!   `str_contains`/`str_starts_with`
//! - `single_class_element_per_statement`: one property or constant per statement
//! - `strict_comparison`: `==`/`!=` become `===`/`!==`
//! - Parse `.php-cs-fixer.php` configuration files, presets included
//!
//! # Example
//!
//! ```ignore
//! use phpfix_fixer::config::PhpCsFixerConfig;
//! use phpfix_fixer::fixers::{FixerConfig, FixerRegistry};
//!
//! let config = PhpCsFixerConfig::from_file(".php-cs-fixer.php")?;
//! let (registry, rules) = FixerRegistry::from_config(&config)?;
//! let names: Vec<&str> = rules.iter().map(String::as_str).collect();
//! let (fixed, edits) = registry.check(source, &names, &FixerConfig::from(&config));
//! ```

pub mod config;
pub mod fixers;
pub mod logging;

pub use config::{ConfigError, PhpCsFixerConfig};
pub use fixers::{Fixer, FixerConfig, FixerRegistry};
