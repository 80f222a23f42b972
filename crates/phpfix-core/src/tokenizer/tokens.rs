//! Editable token stream
//!
//! `Tokens` owns the token sequence of one file while fixers run over it.
//! Clearing a token leaves an empty placeholder in its slot so indices of
//! other tokens stay valid; `clear_empty_tokens` compacts the stream once
//! a fixer is done.

use std::ops::Index;

use super::lexer::tokenize;
use super::token::{Token, TokenKind};

/// Navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

/// Kinds of bracketed blocks that can be matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    /// `(` ... `)`
    Parenthesis,
    /// `{` ... `}`
    CurlyBrace,
    /// `[` ... `]`, also `#[` ... `]`
    SquareBrace,
}

impl BlockType {
    /// Block type opened by `token`, if any
    pub fn opened_by(token: &Token) -> Option<Self> {
        if token.is_char('(') {
            Some(BlockType::Parenthesis)
        } else if token.is_char('{') {
            Some(BlockType::CurlyBrace)
        } else if token.is_char('[') || token.is(TokenKind::AttributeStart) {
            Some(BlockType::SquareBrace)
        } else {
            None
        }
    }

    /// Block type closed by `token`, if any
    pub fn closed_by(token: &Token) -> Option<Self> {
        if token.is_char(')') {
            Some(BlockType::Parenthesis)
        } else if token.is_char('}') {
            Some(BlockType::CurlyBrace)
        } else if token.is_char(']') {
            Some(BlockType::SquareBrace)
        } else {
            None
        }
    }
}

/// Ordered, mutable sequence of tokens for one file
#[derive(Debug, Clone, Default)]
pub struct Tokens {
    tokens: Vec<Token>,
    changed: bool,
}

impl Tokens {
    /// Tokenize `code`
    pub fn from_code(code: &str) -> Self {
        Self::from_tokens(tokenize(code))
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            changed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Whether any mutation happened since construction
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn is_token_kind_found(&self, kind: TokenKind) -> bool {
        self.tokens.iter().any(|t| t.is(kind))
    }

    pub fn is_any_token_kind_found(&self, kinds: &[TokenKind]) -> bool {
        self.tokens.iter().any(|t| t.is_any(kinds))
    }

    /// Nearest token in `direction` that is neither whitespace nor comment
    pub fn meaningful_sibling(&self, index: usize, direction: Direction) -> Option<usize> {
        self.find_sibling(index, direction, Token::is_meaningful)
    }

    pub fn next_meaningful(&self, index: usize) -> Option<usize> {
        self.meaningful_sibling(index, Direction::Forward)
    }

    pub fn prev_meaningful(&self, index: usize) -> Option<usize> {
        self.meaningful_sibling(index, Direction::Backward)
    }

    /// Nearest token in `direction` that is not a cleared placeholder
    pub fn non_empty_sibling(&self, index: usize, direction: Direction) -> Option<usize> {
        self.find_sibling(index, direction, |t| !t.is_empty())
    }

    /// Nearest token in `direction` satisfying `predicate`
    pub fn find_sibling(
        &self,
        index: usize,
        direction: Direction,
        predicate: impl Fn(&Token) -> bool,
    ) -> Option<usize> {
        match direction {
            Direction::Forward => (index + 1..self.tokens.len()).find(|&i| predicate(&self.tokens[i])),
            Direction::Backward => (0..index.min(self.tokens.len())).rev().find(|&i| predicate(&self.tokens[i])),
        }
    }

    /// Index of the token closing the block opened at `open`
    pub fn find_block_end(&self, open: usize) -> Option<usize> {
        let block = BlockType::opened_by(self.tokens.get(open)?)?;
        let mut depth = 0usize;

        for (i, token) in self.tokens.iter().enumerate().skip(open) {
            if BlockType::opened_by(token) == Some(block) {
                depth += 1;
            } else if BlockType::closed_by(token) == Some(block) {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }

        None
    }

    /// Index of the token opening the block closed at `close`
    pub fn find_block_start(&self, close: usize) -> Option<usize> {
        let block = BlockType::closed_by(self.tokens.get(close)?)?;
        let mut depth = 0usize;

        for i in (0..=close).rev() {
            let token = &self.tokens[i];
            if BlockType::closed_by(token) == Some(block) {
                depth += 1;
            } else if BlockType::opened_by(token) == Some(block) {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }

        None
    }

    /// Replace the token at `index`
    pub fn set(&mut self, index: usize, token: Token) {
        self.tokens[index] = token;
        self.changed = true;
    }

    /// Insert `tokens` so that the first of them lands at `index`
    pub fn insert_at(&mut self, index: usize, tokens: impl IntoIterator<Item = Token>) {
        let index = index.min(self.tokens.len());
        self.tokens.splice(index..index, tokens);
        self.changed = true;
    }

    /// Replace the token at `index` with an empty placeholder
    pub fn clear_at(&mut self, index: usize) {
        if !self.tokens[index].is_empty() {
            self.set(index, Token::empty());
        }
    }

    /// Clear the token at `index`; if whitespace follows it, fold that
    /// whitespace into the whitespace before it (or move it into the
    /// cleared slot) so a single run remains
    pub fn clear_token_and_merge_surrounding_whitespace(&mut self, index: usize) {
        let count = self.tokens.len();
        self.clear_at(index);

        if index + 1 >= count {
            return;
        }

        let Some(next) = self.non_empty_sibling(index, Direction::Forward) else {
            return;
        };
        if !self.tokens[next].is_whitespace() {
            return;
        }

        let next_content = self.tokens[next].content().to_string();

        match self.non_empty_sibling(index, Direction::Backward) {
            Some(prev) if self.tokens[prev].is_whitespace() => {
                let merged = format!("{}{}", self.tokens[prev].content(), next_content);
                self.set(prev, Token::whitespace(merged));
            }
            Some(prev) => self.set(prev + 1, Token::whitespace(next_content)),
            None => self.set(index, Token::whitespace(next_content)),
        }

        self.clear_at(next);
    }

    /// Drop every cleared placeholder
    pub fn clear_empty_tokens(&mut self) {
        self.tokens.retain(|t| !t.is_empty());
    }

    /// Source code of the current stream
    pub fn generate_code(&self) -> String {
        self.tokens.iter().map(Token::content).collect()
    }
}

impl Index<usize> for Tokens {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
