//! Class structure fixers

mod single_class_element_per_statement;

pub use single_class_element_per_statement::SingleClassElementPerStatementFixer;
