use serde::Serialize;

use crate::span::Span;

/// A token produced by the Classy lexer.
///
/// Carries only a kind and a span; the lexeme text is recovered by slicing
/// the source buffer with the span, so tokens never own a copy of their text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Create a new token from a kind and byte offsets.
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }

    /// Recover this token's exact source text.
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        &source[self.span.start as usize..self.span.end as usize]
    }
}

/// Every kind of token in Classy.
///
/// This enum is the complete vocabulary for the lexer: keywords, type
/// names, punctuation, operators, literals, identifiers, and the two
/// special markers `Eof` and `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    // ── Keywords (14) ──────────────────────────────────────────────────
    Class,
    Method,
    Init,
    Super,
    /// The `this` keyword.
    This,
    New,
    Vardec,
    While,
    Break,
    If,
    Return,
    Println,
    Call,
    True,
    False,

    // ── Type names (3) ────────────────────────────────────────────────
    IntType,
    BooleanType,
    VoidType,

    // ── Punctuation (5) ────────────────────────────────────────────────
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `.`
    Dot,
    /// `;`
    Semicolon,

    // ── Operators (7) ──────────────────────────────────────────────────
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `<`
    Lt,
    /// `==`
    EqEq,
    /// `=`
    Eq,

    // ── Literals and identifiers (2) ──────────────────────────────────
    Ident,
    IntLiteral,

    // ── Special (2) ────────────────────────────────────────────────────
    /// End of input.
    Eof,
    /// A byte that does not start any valid token.
    Unknown,
}

/// Look up a keyword (including the three type names) from its string form.
///
/// Returns `Some(TokenKind)` if `s` is a Classy keyword, `None` otherwise.
/// The lexer calls this to distinguish keywords/type names from plain
/// identifiers after scanning a word-shaped token.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    match s {
        "class" => Some(TokenKind::Class),
        "method" => Some(TokenKind::Method),
        "init" => Some(TokenKind::Init),
        "super" => Some(TokenKind::Super),
        "this" => Some(TokenKind::This),
        "new" => Some(TokenKind::New),
        "vardec" => Some(TokenKind::Vardec),
        "while" => Some(TokenKind::While),
        "break" => Some(TokenKind::Break),
        "if" => Some(TokenKind::If),
        "return" => Some(TokenKind::Return),
        "println" => Some(TokenKind::Println),
        "call" => Some(TokenKind::Call),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "Int" => Some(TokenKind::IntType),
        "Boolean" => Some(TokenKind::BooleanType),
        "Void" => Some(TokenKind::VoidType),
        _ => None,
    }
}

impl TokenKind {
    /// A human-readable form used in diagnostics, matching the lexeme a user
    /// would type for fixed-text kinds (punctuation, operators, keywords).
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Class => "class",
            TokenKind::Method => "method",
            TokenKind::Init => "init",
            TokenKind::Super => "super",
            TokenKind::This => "this",
            TokenKind::New => "new",
            TokenKind::Vardec => "vardec",
            TokenKind::While => "while",
            TokenKind::Break => "break",
            TokenKind::If => "if",
            TokenKind::Return => "return",
            TokenKind::Println => "println",
            TokenKind::Call => "call",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::IntType => "Int",
            TokenKind::BooleanType => "Boolean",
            TokenKind::VoidType => "Void",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Dot => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Lt => "<",
            TokenKind::EqEq => "==",
            TokenKind::Eq => "=",
            TokenKind::Ident => "identifier",
            TokenKind::IntLiteral => "integer literal",
            TokenKind::Eof => "end of input",
            TokenKind::Unknown => "unknown token",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_from_str_recognizes_keywords_and_types() {
        let cases = [
            ("class", TokenKind::Class),
            ("method", TokenKind::Method),
            ("init", TokenKind::Init),
            ("super", TokenKind::Super),
            ("this", TokenKind::This),
            ("new", TokenKind::New),
            ("vardec", TokenKind::Vardec),
            ("while", TokenKind::While),
            ("break", TokenKind::Break),
            ("if", TokenKind::If),
            ("return", TokenKind::Return),
            ("println", TokenKind::Println),
            ("call", TokenKind::Call),
            ("true", TokenKind::True),
            ("false", TokenKind::False),
            ("Int", TokenKind::IntType),
            ("Boolean", TokenKind::BooleanType),
            ("Void", TokenKind::VoidType),
        ];
        for (s, expected) in cases {
            assert_eq!(keyword_from_str(s), Some(expected));
        }
    }

    #[test]
    fn keyword_from_str_rejects_non_keywords() {
        assert_eq!(keyword_from_str("foo"), None);
        assert_eq!(keyword_from_str("Class"), None); // case-sensitive
        assert_eq!(keyword_from_str(""), None);
    }

    #[test]
    fn token_text_slices_source() {
        let tok = Token::new(TokenKind::Ident, 2, 5);
        assert_eq!(tok.text("ab foo"), "foo");
    }
}
