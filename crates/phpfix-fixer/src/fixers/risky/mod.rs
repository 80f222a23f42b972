//! Risky fixers
//!
//! These rewrites can change runtime behavior and only run when the
//! configuration allows risky rules.

mod strict_comparison;

pub use strict_comparison::StrictComparisonFixer;
