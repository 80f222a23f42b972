//! Structural queries over a token stream

mod arguments;
mod classy;
mod functions;
mod namespaces;

pub use arguments::{Argument, ArgumentsAnalyzer};
pub use classy::{ClassyAnalyzer, ClassyDefinition, ClassyElement, ElementKind};
pub use functions::FunctionsAnalyzer;
pub use namespaces::{FunctionImport, NamespaceAnalysis, NamespacesAnalyzer};
