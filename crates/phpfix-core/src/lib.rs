//! phpfix-core: Core abstractions for PHP fixers
//!
//! This crate provides:
//! - `Edit`: A span-based code modification
//! - `apply_edits()` and `diff_to_edit()`: Edit application and construction
//! - `Tokens`: An editable PHP token stream
//! - `analyzer`: Function call, argument, namespace and class element queries

mod edit;
pub mod analyzer;
pub mod tokenizer;

pub use edit::{apply_edits, diff_to_edit, Edit, EditError};
pub use tokenizer::{Token, TokenKind, Tokens};
