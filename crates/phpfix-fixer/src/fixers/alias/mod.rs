//! Fixers replacing function calls with their modern equivalents

mod modernize_strpos;

pub use modernize_strpos::ModernizeStrposFixer;
