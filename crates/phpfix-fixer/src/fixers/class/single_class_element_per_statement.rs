//! Split multiple property/constant declarations into separate statements

use std::collections::HashMap;
use std::path::Path;

use phpfix_core::analyzer::{ClassyAnalyzer, ElementKind};
use phpfix_core::{Token, TokenKind, Tokens};

use crate::config::{resolve_options, ConfigError};
use crate::fixers::{CodeSample, ConfigValue, Fixer, FixerDefinition, FixerOption, OptionType};

const ELEMENT_NAMES: [&str; 2] = ["const", "property"];

/// Splits `public $a, $b;` and `const A = 1, B = 2;` into one statement
/// per element
#[derive(Debug, Clone)]
pub struct SingleClassElementPerStatementFixer {
    elements: Vec<ElementKind>,
}

impl Default for SingleClassElementPerStatementFixer {
    fn default() -> Self {
        Self {
            elements: vec![ElementKind::Const, ElementKind::Property],
        }
    }
}

impl SingleClassElementPerStatementFixer {
    pub fn new(elements: Vec<ElementKind>) -> Self {
        Self { elements }
    }

    /// Expand the statement holding `index` when it declares several elements
    fn fix_element(&self, tokens: &mut Tokens, kind: ElementKind, index: usize) {
        let mut cursor = index;
        loop {
            let Some(next) = tokens.next_meaningful(cursor) else {
                return;
            };
            let token = &tokens[next];

            if token.is_char(';') {
                return;
            }
            if token.is_char(',') {
                break;
            }
            // property hooks
            if token.is_char('{') {
                return;
            }
            if token.is_any_char(&['(', '[']) {
                match tokens.find_block_end(next) {
                    Some(end) => cursor = end,
                    None => return,
                }
                continue;
            }
            cursor = next;
        }

        let Some(boundary) = (0..index).rev().find(|&i| tokens[i].is_any_char(&[';', '{', '}'])) else {
            return;
        };
        let Some(start) = tokens.next_meaningful(boundary) else {
            return;
        };
        let Some(end) = (index..tokens.len()).find(|&i| tokens[i].is_char(';')) else {
            return;
        };

        expand_element(tokens, kind, start, end);
    }
}

/// Turn every top-level `,` of the statement `start..=end` into `;` and
/// repeat the declaration prefix for the following element
fn expand_element(tokens: &mut Tokens, kind: ElementKind, start: usize, end: usize) {
    let division = division_whitespace(tokens, start);
    let Some(prefix) = declaration_prefix(tokens, kind, start, end) else {
        return;
    };

    let mut i = end;
    while i > start + 1 {
        i -= 1;

        if tokens[i].is_any_char(&[')', ']']) {
            if let Some(open) = tokens.find_block_start(i) {
                i = open;
            }
            continue;
        }
        if !tokens[i].is_char(',') {
            continue;
        }

        tokens.set(i, Token::punct(';'));

        let at = skip_trailing_comments(tokens, i + 1);
        if tokens.get(at).is_some_and(Token::is_whitespace) {
            tokens.clear_at(at);
        }

        let mut inserted = Vec::with_capacity(prefix.len() + 1);
        if let Some(division) = &division {
            inserted.push(Token::whitespace(division.clone()));
        }
        inserted.extend(prefix.iter().cloned());
        tokens.insert_at(at, inserted);
    }
}

/// Index after the comments on the same line as `from`, so they stay
/// behind the element they annotate
fn skip_trailing_comments(tokens: &Tokens, from: usize) -> usize {
    let mut at = from;
    loop {
        match tokens.get(at) {
            Some(token) if token.is_comment() => at += 1,
            Some(token)
                if token.is_whitespace()
                    && !token.content().contains('\n')
                    && tokens.get(at + 1).is_some_and(Token::is_comment) =>
            {
                at += 2
            }
            _ => return at,
        }
    }
}

/// Whitespace before the statement, reduced to one line break plus the
/// indentation when it spans lines
fn division_whitespace(tokens: &Tokens, start: usize) -> Option<String> {
    let previous = tokens.get(start.checked_sub(1)?)?;
    if !previous.is_whitespace() || previous.is_empty() {
        return None;
    }

    let content = previous.content();
    let Some(newline_at) = content.find('\n') else {
        return Some(content.to_string());
    };
    let line_break = if content[..newline_at].ends_with('\r') {
        "\r\n"
    } else {
        "\n"
    };

    Some(format!(
        "{}{}",
        line_break,
        content.trim_matches(|c| c == '\r' || c == '\n')
    ))
}

/// Tokens from `start` up to the first declared name, comments excluded
fn declaration_prefix(tokens: &Tokens, kind: ElementKind, start: usize, end: usize) -> Option<Vec<Token>> {
    let first_name = (start..end).find(|&i| match kind {
        ElementKind::Property => tokens[i].is(TokenKind::Variable),
        _ => {
            tokens[i].is(TokenKind::String)
                && tokens
                    .next_meaningful(i)
                    .is_some_and(|next| tokens[next].is_char('='))
        }
    })?;

    Some(
        (start..first_name)
            .map(|i| &tokens[i])
            .filter(|token| !token.is_comment() && !token.is_empty())
            .cloned()
            .collect(),
    )
}

impl Fixer for SingleClassElementPerStatementFixer {
    fn name(&self) -> &'static str {
        "single_class_element_per_statement"
    }

    fn description(&self) -> &'static str {
        "Split multiple property and constant declarations into separate statements"
    }

    fn definition(&self) -> FixerDefinition {
        FixerDefinition {
            summary: "There MUST NOT be more than one property or constant declared per statement.",
            samples: vec![
                CodeSample::new(
                    "<?php\nfinal class Example\n{\n    const FOO_1 = 1, FOO_2 = 2;\n    private static $bar1 = array(1,2,3), $bar2 = [1,2,3];\n}\n",
                ),
                CodeSample::new(
                    "<?php\nfinal class Example\n{\n    const FOO_1 = 1, FOO_2 = 2;\n    private static $bar1 = array(1,2,3), $bar2 = [1,2,3];\n}\n",
                )
                .with_option("elements", ConfigValue::Array(vec!["property".to_string()])),
            ],
            description: None,
            risky_description: None,
        }
    }

    fn priority(&self) -> i32 {
        // Must run before class_attributes_separation and ordered_class_elements
        56
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.is_any_token_kind_found(&TokenKind::CLASSY)
    }

    fn apply_fix(&self, _file: &Path, tokens: &mut Tokens) {
        let elements = ClassyAnalyzer::elements(tokens);

        for element in elements.iter().rev() {
            if self.elements.contains(&element.kind) {
                self.fix_element(tokens, element.kind, element.index);
            }
        }
    }

    fn options(&self) -> Vec<FixerOption> {
        vec![FixerOption {
            name: "elements",
            description: "List of strings which element should be modified.",
            option_type: OptionType::Subset(ELEMENT_NAMES.to_vec()),
            default: Some(ConfigValue::Array(
                ELEMENT_NAMES.iter().map(|s| s.to_string()).collect(),
            )),
        }]
    }

    fn configure(&mut self, options: &HashMap<String, ConfigValue>) -> Result<(), ConfigError> {
        let resolved = resolve_options(self.name(), &self.options(), options)?;

        self.elements = resolved
            .get_string_array("elements")
            .unwrap_or_default()
            .iter()
            .filter_map(|name| match name.as_str() {
                "const" => Some(ElementKind::Const),
                "property" => Some(ElementKind::Property),
                _ => None,
            })
            .collect();

        Ok(())
    }
}
