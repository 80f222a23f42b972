//! Token kinds and the token value type

use std::fmt;

/// Kind tag of a PHP token
///
/// Mirrors the token ids PHP's own tokenizer reports, except that names
/// are always split into `String` and `NsSeparator` parts, interpolated
/// strings are kept whole and `true`/`false`/`null` are plain names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Tags and raw output
    OpenTag,         // <?php
    OpenTagWithEcho, // <?=
    CloseTag,        // ?>
    InlineHtml,

    // Trivia
    Whitespace,
    Comment,
    DocComment,

    // Names and literals
    String,   // identifiers, including true/false/null
    Variable, // $name
    NsSeparator,
    LNumber,                // integer literal
    DNumber,                // float literal
    ConstantEncapsedString, // '...' or "..."
    Backtick,               // `...`
    Heredoc,                // <<<ID ... ID
    Cast,                   // (int), (string), ...

    // Keywords
    Abstract,
    Array,
    As,
    Break,
    Callable,
    Case,
    Catch,
    Class,
    Clone,
    Const,
    Continue,
    Declare,
    Default,
    Do,
    Echo,
    Else,
    Elseif,
    Empty,
    Enddeclare,
    Endfor,
    Endforeach,
    Endif,
    Endswitch,
    Endwhile,
    Enum,
    Eval,
    Extends,
    Final,
    Finally,
    Fn,
    For,
    Foreach,
    Function,
    Global,
    Goto,
    If,
    Implements,
    Include,
    IncludeOnce,
    Instanceof,
    Insteadof,
    Interface,
    Isset,
    List,
    Match,
    Namespace,
    New,
    Print,
    Private,
    Protected,
    Public,
    Readonly,
    Require,
    RequireOnce,
    Return,
    Static,
    Switch,
    Throw,
    Trait,
    Try,
    Unset,
    Use,
    Var,
    While,
    Yield,
    Exit,       // exit or die
    HaltCompiler, // __halt_compiler
    LogicalAnd, // and
    LogicalOr,  // or
    LogicalXor, // xor

    // Comparison
    IsEqual,           // ==
    IsNotEqual,        // != or <>
    IsIdentical,       // ===
    IsNotIdentical,    // !==
    IsSmallerOrEqual,  // <=
    IsGreaterOrEqual,  // >=
    Spaceship,         // <=>

    // Arithmetic, bitwise and logical
    Inc,        // ++
    Dec,        // --
    Pow,        // **
    Sl,         // <<
    Sr,         // >>
    BooleanAnd, // &&
    BooleanOr,  // ||
    Coalesce,   // ??

    // Assignment
    PlusEqual,     // +=
    MinusEqual,    // -=
    MulEqual,      // *=
    DivEqual,      // /=
    ConcatEqual,   // .=
    ModEqual,      // %=
    AndEqual,      // &=
    OrEqual,       // |=
    XorEqual,      // ^=
    PowEqual,      // **=
    SlEqual,       // <<=
    SrEqual,       // >>=
    CoalesceEqual, // ??=

    // Access and structure
    ObjectOperator,         // ->
    NullsafeObjectOperator, // ?->
    DoubleColon,            // ::
    DoubleArrow,            // =>
    Ellipsis,               // ...
    AttributeStart,         // #[

    /// Any other single character such as `(`, `;`, `!` or `=`
    Punct,
}

impl TokenKind {
    /// Keyword kind for a lowercased identifier
    pub fn keyword(lowercase: &str) -> Option<TokenKind> {
        let kind = match lowercase {
            "__halt_compiler" => TokenKind::HaltCompiler,
            "abstract" => TokenKind::Abstract,
            "and" => TokenKind::LogicalAnd,
            "array" => TokenKind::Array,
            "as" => TokenKind::As,
            "break" => TokenKind::Break,
            "callable" => TokenKind::Callable,
            "case" => TokenKind::Case,
            "catch" => TokenKind::Catch,
            "class" => TokenKind::Class,
            "clone" => TokenKind::Clone,
            "const" => TokenKind::Const,
            "continue" => TokenKind::Continue,
            "declare" => TokenKind::Declare,
            "default" => TokenKind::Default,
            "die" => TokenKind::Exit,
            "do" => TokenKind::Do,
            "echo" => TokenKind::Echo,
            "else" => TokenKind::Else,
            "elseif" => TokenKind::Elseif,
            "empty" => TokenKind::Empty,
            "enddeclare" => TokenKind::Enddeclare,
            "endfor" => TokenKind::Endfor,
            "endforeach" => TokenKind::Endforeach,
            "endif" => TokenKind::Endif,
            "endswitch" => TokenKind::Endswitch,
            "endwhile" => TokenKind::Endwhile,
            "enum" => TokenKind::Enum,
            "eval" => TokenKind::Eval,
            "exit" => TokenKind::Exit,
            "extends" => TokenKind::Extends,
            "final" => TokenKind::Final,
            "finally" => TokenKind::Finally,
            "fn" => TokenKind::Fn,
            "for" => TokenKind::For,
            "foreach" => TokenKind::Foreach,
            "function" => TokenKind::Function,
            "global" => TokenKind::Global,
            "goto" => TokenKind::Goto,
            "if" => TokenKind::If,
            "implements" => TokenKind::Implements,
            "include" => TokenKind::Include,
            "include_once" => TokenKind::IncludeOnce,
            "instanceof" => TokenKind::Instanceof,
            "insteadof" => TokenKind::Insteadof,
            "interface" => TokenKind::Interface,
            "isset" => TokenKind::Isset,
            "list" => TokenKind::List,
            "match" => TokenKind::Match,
            "namespace" => TokenKind::Namespace,
            "new" => TokenKind::New,
            "or" => TokenKind::LogicalOr,
            "print" => TokenKind::Print,
            "private" => TokenKind::Private,
            "protected" => TokenKind::Protected,
            "public" => TokenKind::Public,
            "readonly" => TokenKind::Readonly,
            "require" => TokenKind::Require,
            "require_once" => TokenKind::RequireOnce,
            "return" => TokenKind::Return,
            "static" => TokenKind::Static,
            "switch" => TokenKind::Switch,
            "throw" => TokenKind::Throw,
            "trait" => TokenKind::Trait,
            "try" => TokenKind::Try,
            "unset" => TokenKind::Unset,
            "use" => TokenKind::Use,
            "var" => TokenKind::Var,
            "while" => TokenKind::While,
            "xor" => TokenKind::LogicalXor,
            "yield" => TokenKind::Yield,
            _ => return None,
        };
        Some(kind)
    }

    /// Kinds that open a class-like declaration
    pub const CLASSY: [TokenKind; 4] = [
        TokenKind::Class,
        TokenKind::Interface,
        TokenKind::Trait,
        TokenKind::Enum,
    ];
}

/// A single token: kind tag plus its exact source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    content: String,
}

impl Token {
    pub fn new(kind: TokenKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    /// Single-character token such as `(` or `!`
    pub fn punct(c: char) -> Self {
        Self::new(TokenKind::Punct, c.to_string())
    }

    pub fn whitespace(content: impl Into<String>) -> Self {
        Self::new(TokenKind::Whitespace, content)
    }

    /// Identifier token (`T_STRING`)
    pub fn name(content: impl Into<String>) -> Self {
        Self::new(TokenKind::String, content)
    }

    pub fn ns_separator() -> Self {
        Self::new(TokenKind::NsSeparator, "\\")
    }

    /// Placeholder left behind by clearing a token
    pub fn empty() -> Self {
        Self::whitespace("")
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// Single-character token with the given content
    pub fn is_char(&self, c: char) -> bool {
        self.kind == TokenKind::Punct && self.content.len() == c.len_utf8() && self.content.starts_with(c)
    }

    pub fn is_any_char(&self, chars: &[char]) -> bool {
        chars.iter().any(|&c| self.is_char(c))
    }

    /// Same kind and same content
    pub fn equals(&self, kind: TokenKind, content: &str) -> bool {
        self.kind == kind && self.content == content
    }

    /// Same kind, content compared ASCII case-insensitively
    pub fn equals_ignore_case(&self, kind: TokenKind, content: &str) -> bool {
        self.kind == kind && self.content.eq_ignore_ascii_case(content)
    }

    /// Whitespace, including cleared placeholders
    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::Comment | TokenKind::DocComment)
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Neither whitespace nor a comment
    pub fn is_meaningful(&self) -> bool {
        !self.is_whitespace() && !self.is_comment()
    }

    pub fn is_classy(&self) -> bool {
        self.is_any(&TokenKind::CLASSY)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(TokenKind::keyword("function"), Some(TokenKind::Function));
        assert_eq!(TokenKind::keyword("instanceof"), Some(TokenKind::Instanceof));
        assert_eq!(TokenKind::keyword("false"), None);
        assert_eq!(TokenKind::keyword("strpos"), None);
    }

    #[test]
    fn test_equals_ignore_case() {
        let token = Token::name("FALSE");
        assert!(token.equals_ignore_case(TokenKind::String, "false"));
        assert!(!token.equals(TokenKind::String, "false"));
        assert!(!token.equals_ignore_case(TokenKind::LNumber, "false"));
    }

    #[test]
    fn test_is_char() {
        assert!(Token::punct('(').is_char('('));
        assert!(!Token::punct('(').is_char(')'));
        assert!(!Token::new(TokenKind::IsIdentical, "===").is_char('='));
        assert!(Token::punct('!').is_any_char(&['~', '!']));
    }

    #[test]
    fn test_meaningful() {
        assert!(!Token::whitespace(" ").is_meaningful());
        assert!(!Token::empty().is_meaningful());
        assert!(!Token::new(TokenKind::DocComment, "/** x */").is_meaningful());
        assert!(Token::name("strpos").is_meaningful());
    }
}
