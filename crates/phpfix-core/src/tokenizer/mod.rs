//! Tokenization of PHP source into an editable token stream

mod lexer;
mod token;
mod tokens;

pub use lexer::tokenize;
pub use token::{Token, TokenKind};
pub use tokens::{BlockType, Direction, Tokens};
