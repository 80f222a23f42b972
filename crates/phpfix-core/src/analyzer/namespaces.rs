//! Namespace declarations and `use function` imports

use crate::tokenizer::{TokenKind, Tokens};

/// One namespace scope of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceAnalysis {
    /// Fully qualified name without leading separator, empty for the global namespace
    pub name: String,
    /// Index of the `namespace` keyword, 0 for an implicit global namespace
    pub start: usize,
    pub scope_start: usize,
    pub scope_end: usize,
}

impl NamespaceAnalysis {
    pub fn is_global(&self) -> bool {
        self.name.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.scope_start <= index && index <= self.scope_end
    }
}

/// A single function imported by `use function`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionImport {
    /// Imported name as written, group prefix included
    pub full_name: String,
    /// Name the function is callable by in this scope (alias if present)
    pub short_name: String,
    /// Index of the `use` keyword
    pub start: usize,
    /// Index of the terminating `;`
    pub end: usize,
}

pub struct NamespacesAnalyzer;

impl NamespacesAnalyzer {
    /// All namespace scopes in source order. Files without any declaration
    /// get one global namespace spanning the whole stream.
    pub fn declarations(tokens: &Tokens) -> Vec<NamespaceAnalysis> {
        let mut namespaces: Vec<NamespaceAnalysis> = Vec::new();
        let last = tokens.len().saturating_sub(1);

        for index in 0..tokens.len() {
            if !tokens[index].is(TokenKind::Namespace) {
                continue;
            }
            let Some(next) = tokens.next_meaningful(index) else {
                continue;
            };
            // `namespace\foo()` is the namespace operator, not a declaration
            if tokens[next].is(TokenKind::NsSeparator) {
                continue;
            }

            let mut name = String::new();
            let mut cursor = next;
            while cursor < tokens.len() {
                let token = &tokens[cursor];
                if token.is_any_char(&[';', '{']) {
                    break;
                }
                if token.is_any(&[TokenKind::String, TokenKind::NsSeparator]) {
                    name.push_str(token.content());
                }
                cursor += 1;
            }
            if cursor >= tokens.len() {
                continue;
            }

            let scope_end = if tokens[cursor].is_char('{') {
                tokens.find_block_end(cursor).unwrap_or(last)
            } else {
                last
            };

            if let Some(previous) = namespaces.last_mut() {
                if previous.scope_end >= index {
                    previous.scope_end = index.saturating_sub(1);
                }
            }

            namespaces.push(NamespaceAnalysis {
                name: name.trim_start_matches('\\').to_string(),
                start: index,
                scope_start: index,
                scope_end,
            });
        }

        if namespaces.is_empty() {
            namespaces.push(NamespaceAnalysis {
                name: String::new(),
                start: 0,
                scope_start: 0,
                scope_end: last,
            });
        }

        namespaces
    }

    /// Namespace scope the token at `index` belongs to
    pub fn namespace_at(tokens: &Tokens, index: usize) -> NamespaceAnalysis {
        let namespaces = Self::declarations(tokens);
        let mut current = namespaces[0].clone();
        for namespace in namespaces {
            if namespace.scope_start > index {
                break;
            }
            current = namespace;
        }
        current
    }

    /// Every `use function` import at the top level of the file
    pub fn function_imports(tokens: &Tokens) -> Vec<FunctionImport> {
        let mut imports = Vec::new();

        for index in 0..tokens.len() {
            if !tokens[index].is(TokenKind::Use) || !is_top_level_use(tokens, index) {
                continue;
            }
            let Some(keyword) = tokens.next_meaningful(index) else {
                continue;
            };
            if !tokens[keyword].is(TokenKind::Function) {
                continue;
            }
            let Some(end) = (keyword + 1..tokens.len()).find(|&i| tokens[i].is_char(';')) else {
                continue;
            };

            parse_import_list(tokens, index, keyword + 1, end, &mut imports);
        }

        imports
    }
}

/// Import `use` as opposed to a closure `use (...)` or a trait `use`
fn is_top_level_use(tokens: &Tokens, index: usize) -> bool {
    match tokens.prev_meaningful(index) {
        None => true,
        Some(prev) => {
            let token = &tokens[prev];
            if token.is(TokenKind::OpenTag) || token.is_char(';') || token.is_char('}') {
                return true;
            }
            // `namespace Foo { use ... }`
            token.is_char('{')
                && tokens
                    .prev_meaningful(prev)
                    .is_some_and(|i| tokens[i].is_any(&[TokenKind::String, TokenKind::Namespace]))
                && is_namespace_block(tokens, prev)
        }
    }
}

fn is_namespace_block(tokens: &Tokens, open: usize) -> bool {
    let mut cursor = open;
    while let Some(prev) = tokens.prev_meaningful(cursor) {
        let token = &tokens[prev];
        if token.is(TokenKind::Namespace) {
            return true;
        }
        if !token.is_any(&[TokenKind::String, TokenKind::NsSeparator]) {
            return false;
        }
        cursor = prev;
    }
    false
}

fn parse_import_list(
    tokens: &Tokens,
    use_index: usize,
    from: usize,
    end: usize,
    imports: &mut Vec<FunctionImport>,
) {
    let mut prefix = String::new();
    let mut current = String::new();
    let mut alias: Option<String> = None;
    let mut expecting_alias = false;

    let mut flush = |current: &mut String, alias: &mut Option<String>, prefix: &str| {
        if current.is_empty() {
            return;
        }
        let full_name = format!("{prefix}{current}");
        let short_name = alias
            .take()
            .unwrap_or_else(|| full_name.rsplit('\\').next().unwrap_or_default().to_string());
        imports.push(FunctionImport {
            full_name,
            short_name,
            start: use_index,
            end,
        });
        current.clear();
    };

    for index in from..end {
        let token = &tokens[index];
        if !token.is_meaningful() {
            continue;
        }

        if token.is_any(&[TokenKind::String, TokenKind::NsSeparator]) {
            if expecting_alias {
                alias = Some(token.content().to_string());
                expecting_alias = false;
            } else {
                current.push_str(token.content());
            }
        } else if token.is(TokenKind::As) {
            expecting_alias = true;
        } else if token.is_char('{') {
            prefix = std::mem::take(&mut current);
        } else if token.is_any_char(&[',', '}']) {
            flush(&mut current, &mut alias, &prefix);
        }
    }

    flush(&mut current, &mut alias, &prefix);
}
