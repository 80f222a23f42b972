//! PHP lexer
//!
//! Wraps the `mago-syntax` lexer and reshapes its output into the token
//! model the fixers work on: qualified names are split into name and
//! `\` parts, interpolated strings and heredocs are folded back into one
//! token, and keywords are resolved with the surrounding context.
//!
//! The result is lossless: concatenating the content of every token
//! yields the input. Input the lexer rejects is kept as a trailing token
//! rather than dropped.

use mago_database::file::FileId;
use mago_syntax::lexer::Lexer;
use mago_syntax::settings::LexerSettings;
use mago_syntax::token::TokenKind as MagoKind;
use mago_syntax_core::input::Input;

use super::token::{Token, TokenKind};

/// Tokenize PHP source code
pub fn tokenize(source: &str) -> Vec<Token> {
    let pieces = split_names(merge_strings(source, scan(source)));
    classify(&pieces)
}

/// Origin of a piece of source before classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    /// Straight from the lexer
    Raw(MagoKind),
    /// Already resolved, such as a folded string
    Resolved(TokenKind),
}

#[derive(Debug, Clone, Copy)]
struct Piece<'src> {
    lexeme: Lexeme,
    start: usize,
    text: &'src str,
}

impl Piece<'_> {
    fn end(&self) -> usize {
        self.start + self.text.len()
    }

    fn is_trivia(&self) -> bool {
        matches!(
            self.lexeme,
            Lexeme::Raw(
                MagoKind::Whitespace
                    | MagoKind::SingleLineComment
                    | MagoKind::HashComment
                    | MagoKind::MultiLineComment
                    | MagoKind::DocBlockComment
            )
        )
    }

    /// Identifier or keyword, as opposed to punctuation or literals
    fn is_word(&self) -> bool {
        matches!(self.lexeme, Lexeme::Raw(kind) if base_kind(kind).is_none()) && is_word(self.text)
    }
}

/// Run the lexer to completion, keeping whatever it could not lex as one
/// trailing piece
fn scan(source: &str) -> Vec<Piece<'_>> {
    let input = Input::new(FileId::zero(), source.as_bytes());
    let settings = LexerSettings {
        enable_short_tags: false,
    };
    let mut lexer = Lexer::new(input, settings);

    let mut pieces = Vec::new();
    let mut consumed = 0;

    while let Some(Ok(token)) = lexer.advance() {
        let start = token.start.offset as usize;
        let end = start + token.value.len();
        if start != consumed || !source.is_char_boundary(end) {
            break;
        }

        pieces.push(Piece {
            lexeme: Lexeme::Raw(token.kind),
            start,
            text: &source[start..end],
        });
        consumed = end;
    }

    if consumed < source.len() {
        let rest = &source[consumed..];
        let kind = if rest.starts_with("/**") {
            TokenKind::DocComment
        } else if rest.starts_with("/*") {
            TokenKind::Comment
        } else {
            TokenKind::InlineHtml
        };
        pieces.push(Piece {
            lexeme: Lexeme::Resolved(kind),
            start: consumed,
            text: rest,
        });
    }

    pieces
}

/// Closing kind and folded kind for a token that opens an interpolated
/// string
fn string_context(kind: MagoKind) -> Option<(MagoKind, TokenKind)> {
    match kind {
        MagoKind::DoubleQuote => Some((MagoKind::DoubleQuote, TokenKind::ConstantEncapsedString)),
        MagoKind::Backtick => Some((MagoKind::Backtick, TokenKind::Backtick)),
        MagoKind::DocumentStart(_) => Some((MagoKind::DocumentEnd, TokenKind::Heredoc)),
        _ => None,
    }
}

/// Fold every interpolated string, backtick command and heredoc into a
/// single piece
fn merge_strings<'src>(source: &'src str, pieces: Vec<Piece<'src>>) -> Vec<Piece<'src>> {
    let mut merged = Vec::with_capacity(pieces.len());
    // Closing kind and `{`-depth of each string being folded, innermost last
    let mut stack: Vec<(MagoKind, usize)> = Vec::new();
    let mut open = (0, TokenKind::ConstantEncapsedString);

    for piece in pieces {
        let Lexeme::Raw(kind) = piece.lexeme else {
            if stack.is_empty() {
                merged.push(piece);
            }
            continue;
        };

        let Some(&(closer, depth)) = stack.last() else {
            match string_context(kind) {
                Some((closer, folded)) => {
                    stack.push((closer, 0));
                    open = (piece.start, folded);
                }
                None => merged.push(piece),
            }
            continue;
        };

        match kind {
            MagoKind::LeftBrace | MagoKind::DollarLeftBrace => set_depth(&mut stack, depth + 1),
            MagoKind::RightBrace if depth > 0 => set_depth(&mut stack, depth - 1),
            _ if depth == 0 && kind == closer => {
                stack.pop();
            }
            _ if depth > 0 => {
                if let Some((nested, _)) = string_context(kind) {
                    stack.push((nested, 0));
                }
            }
            _ => {}
        }

        if stack.is_empty() {
            merged.push(Piece {
                lexeme: Lexeme::Resolved(open.1),
                start: open.0,
                text: &source[open.0..piece.end()],
            });
        }
    }

    // Unterminated string runs to the end of the source
    if !stack.is_empty() {
        merged.push(Piece {
            lexeme: Lexeme::Resolved(open.1),
            start: open.0,
            text: &source[open.0..],
        });
    }

    merged
}

fn set_depth(stack: &mut [(MagoKind, usize)], depth: usize) {
    if let Some(top) = stack.last_mut() {
        top.1 = depth;
    }
}

/// Split `Foo\Bar` and `\strpos` into name and separator pieces
fn split_names(pieces: Vec<Piece<'_>>) -> Vec<Piece<'_>> {
    let mut split = Vec::with_capacity(pieces.len());

    for piece in pieces {
        if !matches!(
            piece.lexeme,
            Lexeme::Raw(MagoKind::QualifiedIdentifier | MagoKind::FullyQualifiedIdentifier)
        ) {
            split.push(piece);
            continue;
        }

        let mut offset = 0;
        for (i, segment) in piece.text.split('\\').enumerate() {
            if i > 0 {
                split.push(Piece {
                    lexeme: Lexeme::Raw(MagoKind::NamespaceSeparator),
                    start: piece.start + offset,
                    text: &piece.text[offset..offset + 1],
                });
                offset += 1;
            }
            if !segment.is_empty() {
                split.push(Piece {
                    lexeme: Lexeme::Raw(MagoKind::Identifier),
                    start: piece.start + offset,
                    text: segment,
                });
            }
            offset += segment.len();
        }
    }

    split
}

fn classify(pieces: &[Piece<'_>]) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pieces.len());
    let mut prev = None;

    for (i, piece) in pieces.iter().enumerate() {
        let kind = match piece.lexeme {
            Lexeme::Resolved(kind) => kind,
            Lexeme::Raw(MagoKind::DollarLeftBrace) => {
                tokens.push(Token::punct('$'));
                tokens.push(Token::punct('{'));
                prev = Some(TokenKind::Punct);
                continue;
            }
            Lexeme::Raw(raw) => match base_kind(raw) {
                Some(kind) => kind,
                None if piece.is_word() => word_kind(piece.text, prev, || {
                    pieces[i + 1..]
                        .iter()
                        .find(|p| !p.is_trivia())
                        .is_some_and(Piece::is_word)
                }),
                None => TokenKind::Punct,
            },
        };

        let token = Token::new(kind, piece.text);
        if token.is_meaningful() {
            prev = Some(kind);
        }
        tokens.push(token);
    }

    tokens
}

/// Keyword or `String` for an identifier, given the previous meaningful
/// kind; `enum` is only a keyword when a name follows
fn word_kind(text: &str, prev: Option<TokenKind>, followed_by_name: impl FnOnce() -> bool) -> TokenKind {
    let lower = text.to_ascii_lowercase();

    match prev {
        Some(TokenKind::ObjectOperator | TokenKind::NullsafeObjectOperator) => TokenKind::String,
        Some(TokenKind::DoubleColon) if lower != "class" => TokenKind::String,
        Some(TokenKind::Function | TokenKind::NsSeparator) => TokenKind::String,
        _ => match TokenKind::keyword(&lower) {
            Some(TokenKind::Enum) if !followed_by_name() => TokenKind::String,
            Some(kind) => kind,
            None => TokenKind::String,
        },
    }
}

fn is_word(text: &str) -> bool {
    let mut bytes = text.bytes();
    bytes
        .next()
        .is_some_and(|b| b.is_ascii_alphabetic() || b == b'_' || b >= 0x80)
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80)
}

/// Kind for every lexer token that is neither a word nor a plain
/// single-character punctuation
fn base_kind(kind: MagoKind) -> Option<TokenKind> {
    let mapped = match kind {
        MagoKind::OpenTag | MagoKind::ShortOpenTag => TokenKind::OpenTag,
        MagoKind::EchoTag => TokenKind::OpenTagWithEcho,
        MagoKind::CloseTag => TokenKind::CloseTag,
        MagoKind::InlineText | MagoKind::InlineShebang => TokenKind::InlineHtml,

        MagoKind::Whitespace => TokenKind::Whitespace,
        MagoKind::SingleLineComment | MagoKind::HashComment | MagoKind::MultiLineComment => {
            TokenKind::Comment
        }
        MagoKind::DocBlockComment => TokenKind::DocComment,

        MagoKind::Variable => TokenKind::Variable,
        MagoKind::NamespaceSeparator => TokenKind::NsSeparator,
        MagoKind::LiteralInteger => TokenKind::LNumber,
        MagoKind::LiteralFloat => TokenKind::DNumber,
        MagoKind::LiteralString | MagoKind::PartialLiteralString | MagoKind::StringPart => {
            TokenKind::ConstantEncapsedString
        }

        MagoKind::ArrayCast
        | MagoKind::BinaryCast
        | MagoKind::BoolCast
        | MagoKind::BooleanCast
        | MagoKind::DoubleCast
        | MagoKind::FloatCast
        | MagoKind::IntCast
        | MagoKind::IntegerCast
        | MagoKind::ObjectCast
        | MagoKind::RealCast
        | MagoKind::StringCast
        | MagoKind::UnsetCast
        | MagoKind::VoidCast => TokenKind::Cast,

        // Asymmetric visibility keeps the `(set)` inside the modifier
        MagoKind::PublicSet => TokenKind::Public,
        MagoKind::ProtectedSet => TokenKind::Protected,
        MagoKind::PrivateSet => TokenKind::Private,

        MagoKind::EqualEqual => TokenKind::IsEqual,
        MagoKind::BangEqual | MagoKind::LessThanGreaterThan => TokenKind::IsNotEqual,
        MagoKind::EqualEqualEqual => TokenKind::IsIdentical,
        MagoKind::BangEqualEqual => TokenKind::IsNotIdentical,
        MagoKind::LessThanEqual => TokenKind::IsSmallerOrEqual,
        MagoKind::GreaterThanEqual => TokenKind::IsGreaterOrEqual,
        MagoKind::LessThanEqualGreaterThan => TokenKind::Spaceship,

        MagoKind::PlusPlus => TokenKind::Inc,
        MagoKind::MinusMinus => TokenKind::Dec,
        MagoKind::AsteriskAsterisk => TokenKind::Pow,
        MagoKind::LeftShift => TokenKind::Sl,
        MagoKind::RightShift => TokenKind::Sr,
        MagoKind::AmpersandAmpersand => TokenKind::BooleanAnd,
        MagoKind::PipePipe => TokenKind::BooleanOr,
        MagoKind::QuestionQuestion => TokenKind::Coalesce,

        MagoKind::PlusEqual => TokenKind::PlusEqual,
        MagoKind::MinusEqual => TokenKind::MinusEqual,
        MagoKind::AsteriskEqual => TokenKind::MulEqual,
        MagoKind::SlashEqual => TokenKind::DivEqual,
        MagoKind::DotEqual => TokenKind::ConcatEqual,
        MagoKind::PercentEqual => TokenKind::ModEqual,
        MagoKind::AmpersandEqual => TokenKind::AndEqual,
        MagoKind::PipeEqual => TokenKind::OrEqual,
        MagoKind::CaretEqual => TokenKind::XorEqual,
        MagoKind::AsteriskAsteriskEqual => TokenKind::PowEqual,
        MagoKind::LeftShiftEqual => TokenKind::SlEqual,
        MagoKind::RightShiftEqual => TokenKind::SrEqual,
        MagoKind::QuestionQuestionEqual => TokenKind::CoalesceEqual,

        MagoKind::MinusGreaterThan => TokenKind::ObjectOperator,
        MagoKind::QuestionMinusGreaterThan => TokenKind::NullsafeObjectOperator,
        MagoKind::ColonColon => TokenKind::DoubleColon,
        MagoKind::EqualGreaterThan => TokenKind::DoubleArrow,
        MagoKind::DotDotDot => TokenKind::Ellipsis,
        MagoKind::HashLeftBracket => TokenKind::AttributeStart,

        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .into_iter()
            .filter(|t| t.is_meaningful())
            .map(|t| t.kind())
            .collect()
    }

    fn round_trip(source: &str) {
        let joined: String = tokenize(source).iter().map(Token::content).collect();
        assert_eq!(joined, source);
    }

    #[test]
    fn test_open_tag_and_following_whitespace() {
        let tokens = tokenize("<?php echo 1;");
        assert_eq!(tokens[0], Token::new(TokenKind::OpenTag, "<?php"));
        assert_eq!(tokens[1], Token::whitespace(" "));
        assert_eq!(tokens[2], Token::new(TokenKind::Echo, "echo"));
    }

    #[test]
    fn test_inline_html_before_tag() {
        let tokens = tokenize("<p>hi</p>\n<?php\n$a;");
        assert_eq!(tokens[0].kind(), TokenKind::InlineHtml);
        assert_eq!(tokens[0].content(), "<p>hi</p>\n");
        assert_eq!(tokens[1], Token::new(TokenKind::OpenTag, "<?php"));
        assert_eq!(tokens[2], Token::whitespace("\n"));
    }

    #[test]
    fn test_short_tag_is_html() {
        let tokens = tokenize("<?xml version=\"1.0\"?>");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::InlineHtml);
    }

    #[test]
    fn test_comparison_operators() {
        assert_eq!(
            kinds("<?php 0 === strpos($a, $b) !== false;"),
            vec![
                TokenKind::OpenTag,
                TokenKind::LNumber,
                TokenKind::IsIdentical,
                TokenKind::String,
                TokenKind::Punct,
                TokenKind::Variable,
                TokenKind::Punct,
                TokenKind::Variable,
                TokenKind::Punct,
                TokenKind::IsNotIdentical,
                TokenKind::String,
                TokenKind::Punct,
            ]
        );
        assert_eq!(
            kinds("<?php $a == $b; $a != $b; $a <> $b;"),
            vec![
                TokenKind::OpenTag,
                TokenKind::Variable,
                TokenKind::IsEqual,
                TokenKind::Variable,
                TokenKind::Punct,
                TokenKind::Variable,
                TokenKind::IsNotEqual,
                TokenKind::Variable,
                TokenKind::Punct,
                TokenKind::Variable,
                TokenKind::IsNotEqual,
                TokenKind::Variable,
                TokenKind::Punct,
            ]
        );
    }

    #[test]
    fn test_qualified_name_is_split() {
        let tokens: Vec<Token> = tokenize("<?php \\Foo\\strpos();")
            .into_iter()
            .filter(|t| t.is_meaningful())
            .skip(1)
            .collect();
        assert_eq!(tokens[0], Token::ns_separator());
        assert_eq!(tokens[1], Token::name("Foo"));
        assert_eq!(tokens[2], Token::ns_separator());
        assert_eq!(tokens[3], Token::name("strpos"));
        assert!(tokens[4].is_char('('));
    }

    #[test]
    fn test_relative_name_starts_with_namespace() {
        assert_eq!(
            kinds("<?php namespace\\Foo\\bar();"),
            vec![
                TokenKind::OpenTag,
                TokenKind::Namespace,
                TokenKind::NsSeparator,
                TokenKind::String,
                TokenKind::NsSeparator,
                TokenKind::String,
                TokenKind::Punct,
                TokenKind::Punct,
                TokenKind::Punct,
            ]
        );
    }

    #[test]
    fn test_qualified_constant_is_a_name() {
        let tokens = tokenize("<?php \\false;");
        assert_eq!(tokens[2], Token::ns_separator());
        assert_eq!(tokens[3], Token::name("false"));
    }

    #[test]
    fn test_keywords_and_member_names() {
        assert_eq!(
            kinds("<?php $a->class; Foo::new(); Foo::class;"),
            vec![
                TokenKind::OpenTag,
                TokenKind::Variable,
                TokenKind::ObjectOperator,
                TokenKind::String,
                TokenKind::Punct,
                TokenKind::String,
                TokenKind::DoubleColon,
                TokenKind::String,
                TokenKind::Punct,
                TokenKind::Punct,
                TokenKind::Punct,
                TokenKind::String,
                TokenKind::DoubleColon,
                TokenKind::Class,
                TokenKind::Punct,
            ]
        );
    }

    #[test]
    fn test_enum_needs_a_name() {
        assert!(kinds("<?php enum Suit {}").contains(&TokenKind::Enum));
        assert!(!kinds("<?php enum(1);").contains(&TokenKind::Enum));
    }

    #[test]
    fn test_true_false_null_are_names() {
        assert_eq!(
            kinds("<?php true; FALSE; null;"),
            vec![
                TokenKind::OpenTag,
                TokenKind::String,
                TokenKind::Punct,
                TokenKind::String,
                TokenKind::Punct,
                TokenKind::String,
                TokenKind::Punct,
            ]
        );
    }

    #[test]
    fn test_strings_hide_code() {
        let tokens = tokenize("<?php $a = 'strpos($a, $b) === 0'; $b = \"x {$c[\"k\"]} y\";");
        let strings: Vec<&str> = tokens
            .iter()
            .filter(|t| t.is(TokenKind::ConstantEncapsedString))
            .map(Token::content)
            .collect();
        assert_eq!(strings, vec!["'strpos($a, $b) === 0'", "\"x {$c[\"k\"]} y\""]);
    }

    #[test]
    fn test_interpolated_string_is_one_token() {
        let source = "<?php $s = \"a $b ${c} {$d->e(\"{$f}\")} g\"; $h == $i;";
        let tokens = tokenize(source);
        let strings: Vec<&str> = tokens
            .iter()
            .filter(|t| t.is(TokenKind::ConstantEncapsedString))
            .map(Token::content)
            .collect();
        assert_eq!(strings, vec!["\"a $b ${c} {$d->e(\"{$f}\")} g\""]);
        assert!(tokens.iter().any(|t| t.is(TokenKind::IsEqual)));
        round_trip(source);
    }

    #[test]
    fn test_backtick_is_one_token() {
        let tokens = tokenize("<?php $out = `ls {$dir}`;");
        let command = tokens.iter().find(|t| t.is(TokenKind::Backtick)).unwrap();
        assert_eq!(command.content(), "`ls {$dir}`");
    }

    #[test]
    fn test_comments() {
        let tokens = tokenize("<?php // strpos($a, $b) === 0\n/** doc */ /* block */ # hash\n");
        let comments: Vec<(TokenKind, &str)> = tokens
            .iter()
            .filter(|t| t.is_comment())
            .map(|t| (t.kind(), t.content()))
            .collect();
        assert_eq!(
            comments,
            vec![
                (TokenKind::Comment, "// strpos($a, $b) === 0"),
                (TokenKind::DocComment, "/** doc */"),
                (TokenKind::Comment, "/* block */"),
                (TokenKind::Comment, "# hash"),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("<?php 0 1_000 0x1F 1.5 .5 1e3 0b101;");
        let numbers: Vec<(TokenKind, &str)> = tokens
            .iter()
            .filter(|t| t.is_any(&[TokenKind::LNumber, TokenKind::DNumber]))
            .map(|t| (t.kind(), t.content()))
            .collect();
        assert_eq!(
            numbers,
            vec![
                (TokenKind::LNumber, "0"),
                (TokenKind::LNumber, "1_000"),
                (TokenKind::LNumber, "0x1F"),
                (TokenKind::DNumber, "1.5"),
                (TokenKind::DNumber, ".5"),
                (TokenKind::DNumber, "1e3"),
                (TokenKind::LNumber, "0b101"),
            ]
        );
    }

    #[test]
    fn test_casts() {
        let tokens = tokenize("<?php (int) $a; (string)$b;");
        let casts: Vec<&str> = tokens
            .iter()
            .filter(|t| t.is(TokenKind::Cast))
            .map(Token::content)
            .collect();
        assert_eq!(casts, vec!["(int)", "(string)"]);
    }

    #[test]
    fn test_heredoc_is_one_token() {
        let source = "<?php $a = <<<EOT\n  strpos($a, $b) === 0 {$c}\n  EOT;\n";
        let tokens = tokenize(source);
        let heredoc = tokens.iter().find(|t| t.is(TokenKind::Heredoc)).unwrap();
        assert_eq!(heredoc.content(), "<<<EOT\n  strpos($a, $b) === 0 {$c}\n  EOT");
        assert!(!tokens.iter().any(|t| t.is(TokenKind::IsIdentical)));
        round_trip(source);
    }

    #[test]
    fn test_nowdoc_is_one_token() {
        let source = "<?php $a = <<<'EOT'\n$a == $b\nEOT;\n";
        let tokens = tokenize(source);
        let nowdoc = tokens.iter().find(|t| t.is(TokenKind::Heredoc)).unwrap();
        assert_eq!(nowdoc.content(), "<<<'EOT'\n$a == $b\nEOT");
        assert!(!tokens.iter().any(|t| t.is(TokenKind::IsEqual)));
    }

    #[test]
    fn test_shift_is_not_heredoc() {
        assert!(kinds("<?php $a << 2;").contains(&TokenKind::Sl));
    }

    #[test]
    fn test_close_tag_returns_to_html() {
        let tokens = tokenize("<?php echo 1; ?>\n<b>x</b>");
        let close = tokens.iter().position(|t| t.is(TokenKind::CloseTag)).unwrap();
        assert_eq!(tokens[close].content(), "?>");
        assert_eq!(tokens[close + 1], Token::new(TokenKind::InlineHtml, "\n<b>x</b>"));
    }

    #[test]
    fn test_attribute_start() {
        assert!(kinds("<?php #[Attr] function f() {}").contains(&TokenKind::AttributeStart));
    }

    #[test]
    fn test_asymmetric_visibility() {
        let tokens = tokenize("<?php class A { public private(set) int $a; }");
        let private = tokens.iter().find(|t| t.is(TokenKind::Private)).unwrap();
        assert_eq!(private.content(), "private(set)");
    }

    #[test]
    fn test_unterminated_comment_is_kept() {
        let tokens = tokenize("<?php $a; /* never closed");
        let last = tokens.last().unwrap();
        assert_eq!(last.kind(), TokenKind::Comment);
        assert_eq!(last.content(), "/* never closed");
    }

    #[test]
    fn test_round_trip_unterminated() {
        round_trip("<?php $a = 'never closed");
        round_trip("<?php /* never closed");
        round_trip("<?php $a = \"never {$closed");
        round_trip("<?php $a = <<<EOT\nnever closed");
        round_trip("<?php $a = \"é {$b['x']} \\\" ü\"; // ünïcode");
        round_trip("");
        round_trip("plain html only");
    }
}
