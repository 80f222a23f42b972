//! Call argument splitting

use crate::tokenizer::{BlockType, Tokens};

/// Token range `start..=end` of one argument, surrounding trivia included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argument {
    pub start: usize,
    pub end: usize,
}

impl Argument {
    /// Narrow the range to its first and last meaningful tokens
    pub fn trimmed(&self, tokens: &Tokens) -> Option<Argument> {
        let start = (self.start..=self.end).find(|&i| tokens[i].is_meaningful())?;
        let end = (start..=self.end).rev().find(|&i| tokens[i].is_meaningful())?;
        Some(Argument { start, end })
    }
}

pub struct ArgumentsAnalyzer;

impl ArgumentsAnalyzer {
    /// Split the contents of the parenthesis pair `open`/`close` into
    /// top-level arguments. A trailing comma does not open an extra
    /// argument and empty parentheses yield none.
    pub fn arguments(tokens: &Tokens, open: usize, close: usize) -> Vec<Argument> {
        let mut arguments = Vec::new();

        match tokens.next_meaningful(open) {
            Some(first) if first < close => {}
            _ => return arguments,
        }

        let mut start = open + 1;
        let mut index = open + 1;

        while index < close {
            let token = &tokens[index];

            if BlockType::opened_by(token).is_some() {
                match tokens.find_block_end(index) {
                    Some(end) if end < close => {
                        index = end + 1;
                        continue;
                    }
                    _ => {
                        index = close;
                        break;
                    }
                }
            }

            if token.is_char(',') {
                if tokens.next_meaningful(index) == Some(close) {
                    break;
                }
                arguments.push(Argument {
                    start,
                    end: index - 1,
                });
                start = index + 1;
            }

            index += 1;
        }

        arguments.push(Argument {
            start,
            end: index - 1,
        });

        arguments
    }

    pub fn count(tokens: &Tokens, open: usize, close: usize) -> usize {
        Self::arguments(tokens, open, close).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(code: &str) -> (Tokens, usize, usize) {
        let tokens = Tokens::from_code(code);
        let open = tokens.iter().position(|t| t.is_char('(')).unwrap();
        let close = tokens.find_block_end(open).unwrap();
        (tokens, open, close)
    }

    fn texts(code: &str) -> Vec<String> {
        let (tokens, open, close) = call(code);
        ArgumentsAnalyzer::arguments(&tokens, open, close)
            .iter()
            .map(|a| (a.start..=a.end).map(|i| tokens[i].content()).collect())
            .collect()
    }

    #[test]
    fn test_simple_arguments() {
        assert_eq!(texts("<?php strpos($a, $b);"), vec!["$a", " $b"]);
    }

    #[test]
    fn test_nested_blocks_are_not_split() {
        assert_eq!(
            texts("<?php f(g($a, $b), [1, 2], $c);"),
            vec!["g($a, $b)", " [1, 2]", " $c"]
        );
    }

    #[test]
    fn test_empty_call() {
        assert!(texts("<?php f();").is_empty());
        assert!(texts("<?php f( /* none */ );").is_empty());
    }

    #[test]
    fn test_trailing_comma() {
        assert_eq!(texts("<?php f($a, $b, );"), vec!["$a", " $b"]);

        let (tokens, open, close) = call("<?php f($a,);");
        assert_eq!(ArgumentsAnalyzer::count(&tokens, open, close), 1);
    }

    #[test]
    fn test_trimmed() {
        let (tokens, open, close) = call("<?php f( $a /* x */ , $b );");
        let args = ArgumentsAnalyzer::arguments(&tokens, open, close);
        let first = args[0].trimmed(&tokens).unwrap();
        assert_eq!(first.start, first.end);
        assert_eq!(tokens[first.start].content(), "$a");
        let second = args[1].trimmed(&tokens).unwrap();
        assert_eq!(tokens[second.start].content(), "$b");
    }
}
