//! Class-like declarations and their elements

use crate::tokenizer::{TokenKind, Tokens};

/// A class, interface, trait or enum with a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassyDefinition {
    /// Index of the `class`/`interface`/`trait`/`enum` keyword
    pub index: usize,
    pub body_start: usize,
    pub body_end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Const,
    Property,
    Method,
    TraitImport,
    Case,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Const => "const",
            ElementKind::Property => "property",
            ElementKind::Method => "method",
            ElementKind::TraitImport => "trait_import",
            ElementKind::Case => "case",
        }
    }
}

/// Element declared directly in a classy body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassyElement {
    /// `const`/`case`/`function`/`use` keyword, or the property variable
    pub index: usize,
    pub kind: ElementKind,
    /// Index of the owning classy keyword
    pub class_index: usize,
}

pub struct ClassyAnalyzer;

impl ClassyAnalyzer {
    /// All class-like definitions, anonymous classes included
    pub fn definitions(tokens: &Tokens) -> Vec<ClassyDefinition> {
        let mut definitions = Vec::new();

        for index in 0..tokens.len() {
            if !tokens[index].is_classy() {
                continue;
            }
            // `Foo::class`
            if tokens
                .prev_meaningful(index)
                .is_some_and(|prev| tokens[prev].is(TokenKind::DoubleColon))
            {
                continue;
            }

            if let Some((body_start, body_end)) = find_body(tokens, index) {
                definitions.push(ClassyDefinition {
                    index,
                    body_start,
                    body_end,
                });
            }
        }

        definitions
    }

    /// Elements of every classy body, ordered by index
    pub fn elements(tokens: &Tokens) -> Vec<ClassyElement> {
        let mut elements = Vec::new();

        for definition in Self::definitions(tokens) {
            collect_elements(tokens, &definition, &mut elements);
        }

        elements.sort_by_key(|element| element.index);
        elements
    }

    /// Whether `index` falls inside the body of any classy definition
    pub fn is_inside_classy_body(tokens: &Tokens, index: usize) -> bool {
        Self::definitions(tokens)
            .iter()
            .any(|d| d.body_start < index && index < d.body_end)
    }
}

fn find_body(tokens: &Tokens, classy: usize) -> Option<(usize, usize)> {
    let mut index = classy + 1;

    while index < tokens.len() {
        let token = &tokens[index];
        if token.is_char('(') {
            // anonymous class constructor arguments
            index = tokens.find_block_end(index)? + 1;
            continue;
        }
        if token.is_char('{') {
            return Some((index, tokens.find_block_end(index)?));
        }
        if token.is_char(';') {
            return None;
        }
        index += 1;
    }

    None
}

fn collect_elements(tokens: &Tokens, definition: &ClassyDefinition, out: &mut Vec<ClassyElement>) {
    let mut index = definition.body_start + 1;
    let push = |out: &mut Vec<ClassyElement>, index: usize, kind: ElementKind| {
        out.push(ClassyElement {
            index,
            kind,
            class_index: definition.index,
        })
    };

    while index < definition.body_end {
        let token = &tokens[index];

        match token.kind() {
            TokenKind::AttributeStart => {
                index = skip_block(tokens, index);
                continue;
            }
            TokenKind::Function => {
                push(out, index, ElementKind::Method);
                index = skip_method(tokens, index, definition.body_end);
                continue;
            }
            TokenKind::Use => {
                push(out, index, ElementKind::TraitImport);
                index = skip_statement(tokens, index, definition.body_end);
                continue;
            }
            TokenKind::Const => {
                push(out, index, ElementKind::Const);
                index = skip_statement(tokens, index, definition.body_end);
                continue;
            }
            TokenKind::Case => {
                push(out, index, ElementKind::Case);
                index = skip_statement(tokens, index, definition.body_end);
                continue;
            }
            TokenKind::Variable => push(out, index, ElementKind::Property),
            _ if token.is_char('{') => {
                // property hooks
                index = skip_block(tokens, index);
                continue;
            }
            _ => {}
        }

        index += 1;
    }
}

fn skip_block(tokens: &Tokens, open: usize) -> usize {
    tokens.find_block_end(open).map_or(open + 1, |end| end + 1)
}

/// Index just past a `;` terminated statement, or past its `{}` block
fn skip_statement(tokens: &Tokens, start: usize, limit: usize) -> usize {
    let mut index = start + 1;
    while index < limit {
        let token = &tokens[index];
        if token.is_char(';') {
            return index + 1;
        }
        if token.is_char('{') {
            return skip_block(tokens, index);
        }
        if token.is_any_char(&['(', '[']) || token.is(TokenKind::AttributeStart) {
            index = skip_block(tokens, index);
            continue;
        }
        index += 1;
    }
    limit
}

/// Index just past a method's body, or its `;` when abstract
fn skip_method(tokens: &Tokens, function: usize, limit: usize) -> usize {
    let Some(open) = (function + 1..limit).find(|&i| tokens[i].is_char('(')) else {
        return limit;
    };
    let Some(close) = tokens.find_block_end(open) else {
        return limit;
    };
    skip_statement(tokens, close, limit)
}
