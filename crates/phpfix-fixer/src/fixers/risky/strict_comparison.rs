//! Replace loose comparisons with strict ones

use std::path::Path;

use phpfix_core::{Token, TokenKind, Tokens};

use crate::fixers::{CodeSample, Fixer, FixerDefinition};
use crate::logging;

/// `==` becomes `===`, `!=` and `<>` become `!==`
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictComparisonFixer;

impl Fixer for StrictComparisonFixer {
    fn name(&self) -> &'static str {
        "strict_comparison"
    }

    fn description(&self) -> &'static str {
        "Comparisons should be strict"
    }

    fn definition(&self) -> FixerDefinition {
        FixerDefinition {
            summary: "Comparisons should be strict.",
            samples: vec![CodeSample::new("<?php\n$a = 1== $b;\n")],
            description: None,
            risky_description: Some(
                "Changing comparisons to strict might change code behavior.",
            ),
        }
    }

    fn priority(&self) -> i32 {
        // Must run before binary_operator_spaces and modernize_strpos
        38
    }

    fn is_risky(&self) -> bool {
        true
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.is_any_token_kind_found(&[TokenKind::IsEqual, TokenKind::IsNotEqual])
    }

    fn apply_fix(&self, _file: &Path, tokens: &mut Tokens) {
        for index in (0..tokens.len()).rev() {
            let replacement = match tokens[index].kind() {
                TokenKind::IsEqual => Token::new(TokenKind::IsIdentical, "==="),
                TokenKind::IsNotEqual => Token::new(TokenKind::IsNotIdentical, "!=="),
                _ => continue,
            };

            logging::log_rewrite(self.name(), tokens[index].content(), replacement.content());
            tokens.set(index, replacement);
        }
    }
}
