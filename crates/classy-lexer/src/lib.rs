//! Classy lexer -- tokenizer for the Classy programming language.

mod cursor;

use cursor::Cursor;
use classy_common::token::{keyword_from_str, Token, TokenKind};

/// The Classy lexer. Converts source text into a stream of tokens.
///
/// Wraps a [`Cursor`] for byte-level iteration and implements
/// `Iterator<Item = Token>` so callers can consume tokens lazily or collect
/// them into a `Vec`. Whitespace (space, tab, newline, carriage return) is
/// skipped uniformly; Classy has no comment syntax.
pub struct Lexer<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
    /// Whether we have already emitted the `Eof` token.
    emitted_eof: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            cursor: Cursor::new(source),
            emitted_eof: false,
        }
    }

    /// Convenience: tokenize the entire source into a `Vec<Token>`.
    ///
    /// The returned vector includes the final `Eof` token.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    /// Advance past whitespace, then classify and return the next token.
    fn produce_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.cursor.pos();

        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, start, start);
        };

        match c {
            '(' => self.single_char_token(TokenKind::LParen, start),
            ')' => self.single_char_token(TokenKind::RParen, start),
            '{' => self.single_char_token(TokenKind::LBrace, start),
            '}' => self.single_char_token(TokenKind::RBrace, start),
            '.' => self.single_char_token(TokenKind::Dot, start),
            ';' => self.single_char_token(TokenKind::Semicolon, start),
            '+' => self.single_char_token(TokenKind::Plus, start),
            '-' => self.single_char_token(TokenKind::Minus, start),
            '*' => self.single_char_token(TokenKind::Star, start),
            '/' => self.single_char_token(TokenKind::Slash, start),
            '<' => self.single_char_token(TokenKind::Lt, start),

            '=' => self.lex_eq(start),

            '0'..='9' => self.lex_number(start),

            c if is_ident_start(c) => self.lex_ident(start),

            // Unknown byte -- the parser will reject this.
            _ => {
                self.cursor.advance();
                Token::new(TokenKind::Unknown, start, self.cursor.pos())
            }
        }
    }

    /// Skip whitespace characters (space, tab, newline, carriage return).
    fn skip_whitespace(&mut self) {
        self.cursor
            .eat_while(|c| c == ' ' || c == '\t' || c == '\n' || c == '\r');
    }

    /// Consume one character and return a token of the given kind.
    fn single_char_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        Token::new(kind, start, self.cursor.pos())
    }

    /// `=` -> `Eq`, `==` -> `EqEq`.
    fn lex_eq(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume '='
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            Token::new(TokenKind::EqEq, start, self.cursor.pos())
        } else {
            Token::new(TokenKind::Eq, start, self.cursor.pos())
        }
    }

    /// Lex a maximal run of ASCII digits as an integer literal.
    fn lex_number(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume first digit
        self.cursor.eat_while(|c| c.is_ascii_digit());
        Token::new(TokenKind::IntLiteral, start, self.cursor.pos())
    }

    /// Lex an identifier, keyword, or type name.
    fn lex_ident(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume first char
        self.cursor.eat_while(is_ident_continue);
        let end = self.cursor.pos();
        let word = &self.source[start as usize..end as usize];
        let kind = keyword_from_str(word).unwrap_or(TokenKind::Ident);
        Token::new(kind, start, end)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = self.produce_token();
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        Some(token)
    }
}

/// Whether a character can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic()
}

/// Whether a character can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_simple_program() {
        let tokens = Lexer::tokenize("(println 3)");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::LParen,
                TokenKind::Println,
                TokenKind::IntLiteral,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_eq_vs_eqeq() {
        let tokens = Lexer::tokenize("= ==");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::Eq, TokenKind::EqEq, TokenKind::Eof]);
    }

    #[test]
    fn lex_spans_accurate() {
        let tokens = Lexer::tokenize("(vardec Int x)");
        assert_eq!(tokens[0].span.start, 0); // (
        assert_eq!(tokens[1].span.start, 1); // vardec
        assert_eq!(tokens[1].span.end, 7);
        assert_eq!(tokens[2].span.start, 8); // Int
        assert_eq!(tokens[3].span.start, 12); // x
    }

    #[test]
    fn lex_classifies_keywords_and_types() {
        let tokens = Lexer::tokenize("class method init super this new vardec while break if return println call true false Int Boolean Void foo");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Class,
                TokenKind::Method,
                TokenKind::Init,
                TokenKind::Super,
                TokenKind::This,
                TokenKind::New,
                TokenKind::Vardec,
                TokenKind::While,
                TokenKind::Break,
                TokenKind::If,
                TokenKind::Return,
                TokenKind::Println,
                TokenKind::Call,
                TokenKind::True,
                TokenKind::False,
                TokenKind::IntType,
                TokenKind::BooleanType,
                TokenKind::VoidType,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_unknown_byte() {
        let tokens = Lexer::tokenize("@");
        assert_eq!(tokens[0].kind, TokenKind::Unknown);
    }

    #[test]
    fn lex_totality_on_empty_input() {
        let tokens = Lexer::tokenize("");
        assert_eq!(tokens, vec![Token::new(TokenKind::Eof, 0, 0)]);
    }

    #[test]
    fn lex_skips_all_whitespace_forms() {
        let tokens = Lexer::tokenize("  \t\n\r 42 \t\n");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::IntLiteral, TokenKind::Eof]);
    }
}
