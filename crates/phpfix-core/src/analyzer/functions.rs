//! Function call classification

use super::classy::ClassyAnalyzer;
use super::namespaces::NamespacesAnalyzer;
use crate::tokenizer::{TokenKind, Tokens};

/// Tokens that make a following `name(` something other than a call of a
/// free function: method or static calls, declarations, instantiation
const NON_CALL_PREFIXES: [TokenKind; 8] = [
    TokenKind::DoubleColon,
    TokenKind::Function,
    TokenKind::Namespace,
    TokenKind::New,
    TokenKind::String,
    TokenKind::ObjectOperator,
    TokenKind::NullsafeObjectOperator,
    TokenKind::AttributeStart,
];

pub struct FunctionsAnalyzer;

impl FunctionsAnalyzer {
    /// Whether the identifier at `index` is a call that resolves to the
    /// global function of that name.
    ///
    /// Unqualified calls inside a namespace only count when the namespace
    /// does not declare a function of the same name and no `use function`
    /// import redirects the name elsewhere.
    pub fn is_global_function_call(tokens: &Tokens, index: usize) -> bool {
        let Some(token) = tokens.get(index) else {
            return false;
        };
        if !token.is(TokenKind::String) {
            return false;
        }

        let Some(open) = tokens.next_meaningful(index) else {
            return false;
        };
        if !tokens[open].is_char('(') {
            return false;
        }

        let mut prev = tokens.prev_meaningful(index);
        let mut fully_qualified = false;
        if let Some(separator) = prev {
            if tokens[separator].is(TokenKind::NsSeparator) {
                fully_qualified = true;
                prev = tokens.prev_meaningful(separator);
            }
        }

        if let Some(prev) = prev {
            let prev_token = &tokens[prev];
            if prev_token.is_any(&NON_CALL_PREFIXES) {
                return false;
            }
            // `function &name(`
            if prev_token.is_char('&')
                && tokens
                    .prev_meaningful(prev)
                    .is_some_and(|i| tokens[i].is(TokenKind::Function))
            {
                return false;
            }
        }

        if Self::is_first_class_callable(tokens, open) || Self::is_inside_attribute(tokens, index) {
            return false;
        }

        if fully_qualified {
            return true;
        }

        let namespace = NamespacesAnalyzer::namespace_at(tokens, index);
        let name = token.content();

        if !namespace.is_global()
            && Self::declared_function_names(tokens, namespace.scope_start, namespace.scope_end)
                .iter()
                .any(|declared| declared.eq_ignore_ascii_case(name))
        {
            return false;
        }

        for import in NamespacesAnalyzer::function_imports(tokens) {
            if import.start < namespace.scope_start {
                continue;
            }
            if import.end > index {
                break;
            }
            if import.short_name.eq_ignore_ascii_case(name) {
                return import
                    .full_name
                    .trim_start_matches('\\')
                    .eq_ignore_ascii_case(name);
            }
        }

        true
    }

    /// `name(...)` creates a closure instead of calling
    fn is_first_class_callable(tokens: &Tokens, open: usize) -> bool {
        let Some(ellipsis) = tokens.next_meaningful(open) else {
            return false;
        };
        tokens[ellipsis].is(TokenKind::Ellipsis)
            && tokens
                .next_meaningful(ellipsis)
                .is_some_and(|close| tokens[close].is_char(')'))
    }

    /// Names of functions declared with `function name(` within `start..=end`,
    /// ignoring methods of classy bodies
    pub fn declared_function_names(tokens: &Tokens, start: usize, end: usize) -> Vec<String> {
        let end = end.min(tokens.len().saturating_sub(1));
        let bodies: Vec<(usize, usize)> = ClassyAnalyzer::definitions(tokens)
            .iter()
            .map(|d| (d.body_start, d.body_end))
            .collect();

        let mut names = Vec::new();
        for index in start..=end {
            if !tokens[index].is(TokenKind::Function) {
                continue;
            }
            if bodies.iter().any(|&(open, close)| open < index && index < close) {
                continue;
            }
            let Some(mut next) = tokens.next_meaningful(index) else {
                continue;
            };
            if tokens[next].is_char('&') {
                match tokens.next_meaningful(next) {
                    Some(after) => next = after,
                    None => continue,
                }
            }
            if tokens[next].is(TokenKind::String) {
                names.push(tokens[next].content().to_string());
            }
        }

        names
    }

    /// Whether `index` sits inside a `#[...]` attribute group
    fn is_inside_attribute(tokens: &Tokens, index: usize) -> bool {
        let mut depth = 0usize;

        for i in (0..index).rev() {
            let token = &tokens[i];
            if token.is_char(']') {
                depth += 1;
            } else if token.is_char('[') {
                depth = depth.saturating_sub(1);
            } else if token.is(TokenKind::AttributeStart) {
                if depth == 0 {
                    return true;
                }
                depth -= 1;
            } else if token.is_any_char(&[';', '{', '}']) {
                return false;
            }
        }

        false
    }
}
