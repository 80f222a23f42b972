//! Replace `strpos()` comparisons with `str_starts_with()` / `str_contains()`
//!
//! `strpos($h, $n) === 0` asks whether `$h` starts with `$n` and
//! `strpos($h, $n) !== false` whether it contains it. PHP 8 has dedicated
//! functions for both. The rewrite is risky because it assumes the global
//! functions are not overridden.

use std::collections::HashMap;
use std::path::Path;

use phpfix_core::analyzer::{ArgumentsAnalyzer, FunctionsAnalyzer};
use phpfix_core::tokenizer::Direction;
use phpfix_core::{Token, TokenKind, Tokens};

use crate::config::{resolve_options, ConfigError};
use crate::fixers::{CodeSample, ConfigValue, Fixer, FixerDefinition, FixerOption, OptionType};
use crate::logging;

/// Sentinel operand a comparison is made against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    /// Integer literal `0`
    Zero,
    /// `false`, any case
    False,
}

impl Operand {
    fn of(token: &Token) -> Option<Self> {
        if token.equals(TokenKind::LNumber, "0") {
            Some(Operand::Zero)
        } else if token.equals_ignore_case(TokenKind::String, "false") {
            Some(Operand::False)
        } else {
            None
        }
    }
}

struct Replacement {
    operator: TokenKind,
    operand: Operand,
    function: &'static str,
    negate: bool,
}

const REPLACEMENTS: &[Replacement] = &[
    Replacement {
        operator: TokenKind::IsIdentical,
        operand: Operand::Zero,
        function: "str_starts_with",
        negate: false,
    },
    Replacement {
        operator: TokenKind::IsNotIdentical,
        operand: Operand::Zero,
        function: "str_starts_with",
        negate: true,
    },
    Replacement {
        operator: TokenKind::IsIdentical,
        operand: Operand::False,
        function: "str_contains",
        negate: true,
    },
    Replacement {
        operator: TokenKind::IsNotIdentical,
        operand: Operand::False,
        function: "str_contains",
        negate: false,
    },
];

/// Operators binding tighter than `===`; a sentinel next to one of them
/// belongs to that operation, not to the comparison
const HIGHER_PRECEDENCE_KINDS: [TokenKind; 8] = [
    TokenKind::Dec,
    TokenKind::Inc,
    TokenKind::Instanceof,
    TokenKind::IsGreaterOrEqual,
    TokenKind::IsSmallerOrEqual,
    TokenKind::Pow,
    TokenKind::Sl,
    TokenKind::Sr,
];

const HIGHER_PRECEDENCE_CHARS: [char; 10] = ['!', '%', '*', '+', '-', '.', '/', '<', '>', '~'];

/// Operator and sentinel found next to a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ComparisonMatch {
    operator_index: usize,
    operand_index: usize,
    /// `\` in front of a fully qualified `\false`
    operand_separator: Option<usize>,
}

/// Replaces `strpos()` (and optionally `stripos()`) comparisons with
/// `str_starts_with()` or `str_contains()`
#[derive(Debug, Clone, Default)]
pub struct ModernizeStrposFixer {
    modernize_stripos: bool,
}

impl ModernizeStrposFixer {
    pub fn new(modernize_stripos: bool) -> Self {
        Self { modernize_stripos }
    }

    fn is_target(&self, lowercase_name: &str) -> bool {
        lowercase_name == "strpos" || (self.modernize_stripos && lowercase_name == "stripos")
    }

    /// Rewrite the call at `function_index` according to the matching
    /// replacement, if any
    fn fix_call(&self, tokens: &mut Tokens, function_index: usize, matched: ComparisonMatch) -> bool {
        let Some(operand) = Operand::of(&tokens[matched.operand_index]) else {
            return false;
        };
        let operator = tokens[matched.operator_index].kind();
        let Some(replacement) = REPLACEMENTS
            .iter()
            .find(|r| r.operator == operator && r.operand == operand)
        else {
            return false;
        };

        let original = tokens[function_index].content().to_string();
        let is_stripos = original.eq_ignore_ascii_case("stripos");

        tokens.clear_token_and_merge_surrounding_whitespace(matched.operator_index);
        tokens.clear_token_and_merge_surrounding_whitespace(matched.operand_index);
        if let Some(separator) = matched.operand_separator {
            tokens.clear_token_and_merge_surrounding_whitespace(separator);
        }
        tokens.clear_token_and_merge_surrounding_whitespace(function_index);

        let qualified = tokens
            .prev_meaningful(function_index)
            .filter(|&prev| tokens[prev].is(TokenKind::NsSeparator));

        let mut name_index = function_index;
        if replacement.negate {
            tokens.insert_at(qualified.unwrap_or(function_index), [Token::punct('!')]);
            name_index += 1;
        }
        tokens.insert_at(name_index, [Token::name(replacement.function)]);

        if is_stripos {
            wrap_arguments_with_strtolower(tokens, name_index, qualified.is_some());
        }

        logging::log_rewrite(
            self.name(),
            &original,
            &format!(
                "{}{}",
                if replacement.negate { "!" } else { "" },
                replacement.function
            ),
        );

        true
    }
}

/// Operator and sentinel on the `direction` side of `offset_index`
fn find_comparison(tokens: &Tokens, offset_index: usize, direction: Direction) -> Option<ComparisonMatch> {
    let mut operator_index = tokens.meaningful_sibling(offset_index, direction)?;
    if tokens[operator_index].is(TokenKind::NsSeparator) {
        operator_index = tokens.meaningful_sibling(operator_index, direction)?;
    }
    if !tokens[operator_index].is_any(&[TokenKind::IsIdentical, TokenKind::IsNotIdentical]) {
        return None;
    }

    let mut operand_index = tokens.meaningful_sibling(operator_index, direction)?;
    let mut operand_separator = None;
    match direction {
        Direction::Forward if tokens[operand_index].is(TokenKind::NsSeparator) => {
            operand_separator = Some(operand_index);
            operand_index = tokens.meaningful_sibling(operand_index, direction)?;
        }
        Direction::Backward => {
            operand_separator = tokens
                .prev_meaningful(operand_index)
                .filter(|&prev| tokens[prev].is(TokenKind::NsSeparator));
        }
        Direction::Forward => {}
    }
    let operand = Operand::of(&tokens[operand_index])?;
    if operand_separator.is_some() && operand != Operand::False {
        return None;
    }

    let outer = match direction {
        Direction::Backward => operand_separator.unwrap_or(operand_index),
        Direction::Forward => operand_index,
    };
    if let Some(beyond) = tokens.meaningful_sibling(outer, direction) {
        let beyond = &tokens[beyond];
        // `Foo\false` and `false\Foo` are names, not the constant
        if beyond.is(TokenKind::NsSeparator)
            || (operand_separator.is_some() && beyond.is_any(&[TokenKind::String, TokenKind::Namespace]))
        {
            return None;
        }
        if is_of_higher_precedence(beyond) {
            return None;
        }
    }

    Some(ComparisonMatch {
        operator_index,
        operand_index,
        operand_separator,
    })
}

fn is_of_higher_precedence(token: &Token) -> bool {
    token.is_any(&HIGHER_PRECEDENCE_KINDS) || token.is_any_char(&HIGHER_PRECEDENCE_CHARS)
}

/// Wrap both arguments of the call named at `name_index` in `strtolower()`
fn wrap_arguments_with_strtolower(tokens: &mut Tokens, name_index: usize, qualified: bool) {
    let Some(open) = tokens.next_meaningful(name_index) else {
        return;
    };
    let Some(close) = tokens.find_block_end(open) else {
        return;
    };

    let arguments: Option<Vec<_>> = ArgumentsAnalyzer::arguments(tokens, open, close)
        .iter()
        .map(|argument| argument.trimmed(tokens))
        .collect();
    let Some(arguments) = arguments else {
        return;
    };

    // Right to left so earlier indices stay valid
    for argument in arguments.iter().rev() {
        tokens.insert_at(argument.end + 1, [Token::punct(')')]);

        let mut opening = Vec::with_capacity(3);
        if qualified {
            opening.push(Token::ns_separator());
        }
        opening.push(Token::name("strtolower"));
        opening.push(Token::punct('('));
        tokens.insert_at(argument.start, opening);
    }
}

impl Fixer for ModernizeStrposFixer {
    fn name(&self) -> &'static str {
        "modernize_strpos"
    }

    fn description(&self) -> &'static str {
        "Replace `strpos()` and `stripos()` comparisons with `str_starts_with()` or `str_contains()`"
    }

    fn definition(&self) -> FixerDefinition {
        FixerDefinition {
            summary: "Replace `strpos()` and `stripos()` calls with `str_starts_with()` or `str_contains()` if possible.",
            samples: vec![
                CodeSample::new(
                    "<?php\nif (strpos($haystack, $needle) === 0) {}\nif (strpos($haystack, $needle) !== 0) {}\nif (strpos($haystack, $needle) !== false) {}\nif (strpos($haystack, $needle) === false) {}\n",
                ),
                CodeSample::new(
                    "<?php\nif (strpos($haystack, $needle) === 0) {}\nif (stripos($haystack, $needle) !== false) {}\n",
                )
                .with_option("modernize_stripos", ConfigValue::Bool(true)),
            ],
            description: None,
            risky_description: Some(
                "Risky if `strpos`, `stripos`, `str_starts_with`, `str_contains` or `strtolower` functions are overridden.",
            ),
        }
    }

    fn priority(&self) -> i32 {
        // Must run after strict_comparison (38)
        37
    }

    fn is_risky(&self) -> bool {
        true
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.is_token_kind_found(TokenKind::String)
            && tokens.is_any_token_kind_found(&[TokenKind::IsIdentical, TokenKind::IsNotIdentical])
    }

    fn apply_fix(&self, _file: &Path, tokens: &mut Tokens) {
        let mut index = tokens.len();

        while index > 0 {
            index -= 1;

            let token = &tokens[index];
            if !token.is(TokenKind::String) || !self.is_target(&token.content().to_ascii_lowercase()) {
                continue;
            }
            if !FunctionsAnalyzer::is_global_function_call(tokens, index) {
                continue;
            }

            let Some(open) = tokens.next_meaningful(index) else {
                continue;
            };
            let Some(close) = tokens.find_block_end(open) else {
                continue;
            };
            if ArgumentsAnalyzer::count(tokens, open, close) != 2 {
                continue;
            }

            let matched = find_comparison(tokens, index, Direction::Backward)
                .or_else(|| find_comparison(tokens, close, Direction::Forward));

            if let Some(matched) = matched {
                self.fix_call(tokens, index, matched);
            }
        }
    }

    fn options(&self) -> Vec<FixerOption> {
        vec![FixerOption {
            name: "modernize_stripos",
            description: "Whether to modernize `stripos` calls as well.",
            option_type: OptionType::Bool,
            default: Some(ConfigValue::Bool(false)),
        }]
    }

    fn configure(&mut self, options: &HashMap<String, ConfigValue>) -> Result<(), ConfigError> {
        let resolved = resolve_options(self.name(), &self.options(), options)?;
        self.modernize_stripos = resolved.get_bool("modernize_stripos").unwrap_or(false);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix_with(fixer: &ModernizeStrposFixer, source: &str) -> String {
        let mut tokens = Tokens::from_code(source);
        if fixer.is_candidate(&tokens) {
            fixer.apply_fix(Path::new(""), &mut tokens);
        }
        tokens.generate_code()
    }

    fn fix(source: &str) -> String {
        fix_with(&ModernizeStrposFixer::default(), source)
    }

    fn fix_stripos(source: &str) -> String {
        fix_with(&ModernizeStrposFixer::new(true), source)
    }

    #[test]
    fn test_yoda_starts_with() {
        assert_eq!(
            fix("<?php if (0 === strpos($h, $n)) {}"),
            "<?php if (  str_starts_with($h, $n)) {}"
        );
    }

    #[test]
    fn test_contains_after_call() {
        assert_eq!(
            fix("<?php if (strpos($h, $n) !== false) {}"),
            "<?php if (str_contains($h, $n)  ) {}"
        );
    }

    #[test]
    fn test_all_replacements() {
        assert_eq!(
            fix("<?php $a = strpos($h, $n) === 0;"),
            "<?php $a = str_starts_with($h, $n)  ;"
        );
        assert_eq!(
            fix("<?php $a = strpos($h, $n) !== 0;"),
            "<?php $a = !str_starts_with($h, $n)  ;"
        );
        assert_eq!(
            fix("<?php $a = strpos($h, $n) === false;"),
            "<?php $a = !str_contains($h, $n)  ;"
        );
        assert_eq!(
            fix("<?php $a = strpos($h, $n) !== false;"),
            "<?php $a = str_contains($h, $n)  ;"
        );
    }

    #[test]
    fn test_false_is_case_insensitive() {
        assert_eq!(
            fix("<?php $a = FALSE !== strpos($h, $n);"),
            "<?php $a =   str_contains($h, $n);"
        );
    }

    #[test]
    fn test_function_name_is_case_insensitive() {
        assert_eq!(
            fix("<?php $a = STRPOS($h, $n) !== false;"),
            "<?php $a = str_contains($h, $n)  ;"
        );
    }

    #[test]
    fn test_fully_qualified_call() {
        assert_eq!(
            fix("<?php $a = \\strpos($h, $n) === false;"),
            "<?php $a = !\\str_contains($h, $n)  ;"
        );
        assert_eq!(
            fix("<?php $a = 0 === \\strpos($h, $n);"),
            "<?php $a =   \\str_starts_with($h, $n);"
        );
    }

    #[test]
    fn test_fully_qualified_false() {
        assert_eq!(
            fix("<?php $a = \\false === \\strpos($h, $n);"),
            "<?php $a =   !\\str_contains($h, $n);"
        );
        assert_eq!(
            fix("<?php $a = \\strpos($h, $n) !== \\FALSE;"),
            "<?php $a = \\str_contains($h, $n)  ;"
        );
    }

    #[test]
    fn test_namespaced_false_is_not_a_sentinel() {
        let source = "<?php $a = Foo\\false === strpos($h, $n);";
        assert_eq!(fix(source), source);
        let source = "<?php $a = strpos($h, $n) === \\Foo\\false;";
        assert_eq!(fix(source), source);
    }

    #[test]
    fn test_stripos_requires_option() {
        let source = "<?php if (false === stripos($h, $n)) {}";
        assert_eq!(fix(source), source);
        assert_eq!(
            fix_stripos(source),
            "<?php if (  !str_contains(strtolower($h), strtolower($n))) {}"
        );
    }

    #[test]
    fn test_stripos_wraps_complex_arguments() {
        assert_eq!(
            fix_stripos("<?php $a = stripos( $obj->name , 'x' ) === 0;"),
            "<?php $a = str_starts_with( strtolower($obj->name) , strtolower('x') )  ;"
        );
        assert_eq!(
            fix_stripos("<?php $a = \\stripos(trim($h), $n) !== false;"),
            "<?php $a = \\str_contains(\\strtolower(trim($h)), \\strtolower($n))  ;"
        );
    }

    #[test]
    fn test_multiple_calls_in_one_file() {
        assert_eq!(
            fix("<?php\n$a = strpos($x, 'a') === 0 && strpos($x, 'b') !== false;\n"),
            "<?php\n$a = str_starts_with($x, 'a')   && str_contains($x, 'b')  ;\n"
        );
    }

    #[test]
    fn test_nested_call_argument() {
        assert_eq!(
            fix("<?php $a = strpos(substr($h, 1), $n) === 0;"),
            "<?php $a = str_starts_with(substr($h, 1), $n)  ;"
        );
    }

    #[test]
    fn test_argument_count_must_be_two() {
        for source in [
            "<?php $a = strpos($h, $n, 3) === 0;",
            "<?php $a = strpos($h) === 0;",
            "<?php $a = strpos() === 0;",
        ] {
            assert_eq!(fix(source), source);
        }
    }

    #[test]
    fn test_not_a_global_call() {
        for source in [
            "<?php $a = $o->strpos($h, $n) === 0;",
            "<?php $a = $o?->strpos($h, $n) === 0;",
            "<?php $a = Foo::strpos($h, $n) === 0;",
            "<?php $a = new strpos($h, $n) === 0;",
            "<?php $a = Foo\\strpos($h, $n) === 0;",
            "<?php $a = namespace\\strpos($h, $n) === 0;",
            "<?php namespace Foo; function strpos($a, $b) {} $a = strpos($h, $n) === 0;",
            "<?php namespace Foo; use function Bar\\strpos; $a = strpos($h, $n) === 0;",
        ] {
            assert_eq!(fix(source), source);
        }
    }

    #[test]
    fn test_namespaced_file_still_fixes_global_calls() {
        assert_eq!(
            fix("<?php namespace Foo; $a = strpos($h, $n) === 0;"),
            "<?php namespace Foo; $a = str_starts_with($h, $n)  ;"
        );
    }

    #[test]
    fn test_operand_must_be_sentinel() {
        for source in [
            "<?php $a = strpos($h, $n) === 1;",
            "<?php $a = strpos($h, $n) === null;",
            "<?php $a = strpos($h, $n) === true;",
            "<?php $a = strpos($h, $n) == false;",
            "<?php $a = strpos($h, $n) > 0;",
            "<?php $a = strpos($h, $n);",
        ] {
            assert_eq!(fix(source), source);
        }
    }

    #[test]
    fn test_higher_precedence_neighbor() {
        for source in [
            "<?php $a = 4 + 0 !== strpos($h, $n);",
            "<?php $a = strpos($h, $n) === 0 . $x;",
            "<?php $a = strpos($h, $n) !== false instanceof Foo;",
            "<?php $a = $b < 0 === strpos($h, $n);",
            "<?php $a = -0 === strpos($h, $n);",
            "<?php $a = !false === strpos($h, $n);",
        ] {
            assert_eq!(fix(source), source);
        }
    }

    #[test]
    fn test_lower_precedence_neighbor_is_fine() {
        assert_eq!(
            fix("<?php $a = $b && 0 === strpos($h, $n);"),
            "<?php $a = $b &&   str_starts_with($h, $n);"
        );
    }

    #[test]
    fn test_strings_and_comments_untouched() {
        for source in [
            "<?php $a = 'strpos($h, $n) === 0';",
            "<?php // strpos($h, $n) === 0\n$b = 1 === 1;",
            "<?php /** strpos($h, $n) !== false */ $b = 1 === 1;",
            "<?php $a = \"strpos($h, $n) === 0\";",
        ] {
            assert_eq!(fix(source), source);
        }
    }

    #[test]
    fn test_comments_between_tokens() {
        assert_eq!(
            fix("<?php $a = strpos($h, $n) /* x */ !== false;"),
            "<?php $a = str_contains($h, $n) /* x */  ;"
        );
    }

    #[test]
    fn test_candidate() {
        let fixer = ModernizeStrposFixer::default();
        assert!(fixer.is_candidate(&Tokens::from_code("<?php strpos($a, $b) === 0;")));
        assert!(!fixer.is_candidate(&Tokens::from_code("<?php strpos($a, $b) == 0;")));
        assert!(!fixer.is_candidate(&Tokens::from_code("<?php $a === $b;")));
    }

    #[test]
    fn test_configure() {
        let mut fixer = ModernizeStrposFixer::default();
        let options = HashMap::from([("modernize_stripos".to_string(), ConfigValue::Bool(true))]);
        fixer.configure(&options).unwrap();
        assert!(fixer.modernize_stripos);

        fixer.configure(&HashMap::new()).unwrap();
        assert!(!fixer.modernize_stripos);

        let bad = HashMap::from([("modernize_stripos".to_string(), ConfigValue::Number(1))]);
        assert!(matches!(
            fixer.configure(&bad),
            Err(ConfigError::InvalidOptionType { .. })
        ));
    }

    #[test]
    fn test_definition() {
        let fixer = ModernizeStrposFixer::default();
        let definition = fixer.definition();
        assert_eq!(definition.samples.len(), 2);
        assert!(definition.risky_description.is_some());
        assert!(fixer.is_risky());
        assert_eq!(fixer.priority(), 37);
    }

    #[test]
    fn test_check_produces_edit() {
        let source = "<?php\nreturn strpos($haystack, $needle) !== false;\n";
        let edits = ModernizeStrposFixer::default().check(source);
        assert_eq!(edits.len(), 1);
        assert_eq!(
            phpfix_core::apply_edits(source, &edits).unwrap(),
            "<?php\nreturn str_contains($haystack, $needle)  ;\n"
        );
    }
}
