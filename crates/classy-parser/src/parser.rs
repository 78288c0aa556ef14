//! Recursive-descent parser for the Classy grammar.

use std::iter::Peekable;

use classy_common::{Span, Token, TokenKind};
use classy_lexer::Lexer;

use crate::ast::*;
use crate::error::ParseError;

type ParseResult<T> = Result<T, ParseError>;

/// Parse a complete source buffer into a [`Program`].
pub fn parse(source: &str) -> ParseResult<Program> {
    Parser::new(source).parse_program()
}

/// Holds the current token plus a one-slot lookahead, fed by the lexer's
/// own `Iterator` implementation via `Peekable`. The grammar never needs to
/// see further than one token past `current`.
struct Parser<'src> {
    source: &'src str,
    tokens: Peekable<Lexer<'src>>,
    current: Token,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        let mut tokens = Lexer::new(source).peekable();
        let current = tokens.next().expect("lexer always yields at least Eof");
        Self {
            source,
            tokens,
            current,
        }
    }

    fn text(&self, tok: Token) -> &'src str {
        tok.text(self.source)
    }

    fn current_text(&self) -> &'src str {
        self.text(self.current)
    }

    /// Lexeme text for diagnostics. `Eof` has an empty span, so it is
    /// rendered with its human-readable description instead.
    fn current_display_text(&self) -> &'src str {
        if self.current.kind == TokenKind::Eof {
            self.current.kind.describe()
        } else {
            self.current_text()
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn peek_kind(&mut self) -> TokenKind {
        self.tokens.peek().map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    /// Consume and return the current token, advancing to the next one.
    /// Once `Eof` is reached it is returned forever rather than advancing.
    fn bump(&mut self) -> Token {
        if self.current.kind == TokenKind::Eof {
            return self.current;
        }
        let next = self.tokens.next().expect("lexer must terminate with Eof");
        std::mem::replace(&mut self.current, next)
    }

    fn error_expected(&self, expected: &str) -> ParseError {
        ParseError::expected_token(expected, self.current_display_text(), self.current.span)
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.bump())
        } else {
            Err(self.error_expected(kind.describe()))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<Ident> {
        if self.check(TokenKind::Ident) {
            let tok = self.bump();
            Ok(Ident {
                name: self.text(tok).to_string(),
                span: tok.span,
            })
        } else {
            Err(self.error_expected("identifier"))
        }
    }

    // ── program ::= classdef* stmt+ ─────────────────────────────────────

    fn parse_program(&mut self) -> ParseResult<Program> {
        let start = self.current.span.start;
        let mut classes = Vec::new();
        while self.check(TokenKind::LParen) && self.peek_kind() == TokenKind::Class {
            classes.push(self.parse_classdef()?);
        }

        let mut stmts = Vec::new();
        while !self.check(TokenKind::Eof) {
            stmts.push(self.parse_stmt()?);
        }
        if stmts.is_empty() {
            return Err(ParseError::malformed(
                self.current_display_text(),
                "a program needs at least one top-level statement",
                self.current.span,
            ));
        }

        let end = stmts.last().map(|s| s.span().end).unwrap_or(start);
        Ok(Program {
            classes,
            stmts,
            span: Span::new(start, end),
        })
    }

    // ── classdef ::= '(' 'class' IDENT IDENT? '(' vardec* ')' ctor methoddef* ')'

    fn parse_classdef(&mut self) -> ParseResult<ClassDef> {
        let open = self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::Class)?;
        let name = self.expect_ident()?;

        let superclass = if self.check(TokenKind::Ident) {
            Some(self.expect_ident()?)
        } else {
            None
        };

        self.expect(TokenKind::LParen)?;
        let mut fields = Vec::new();
        while self.check(TokenKind::LParen) && self.peek_kind() == TokenKind::Vardec {
            fields.push(self.parse_vardec()?);
        }
        self.expect(TokenKind::RParen)?;

        let ctor = self.parse_constructor()?;

        let mut methods = Vec::new();
        while self.check(TokenKind::LParen) && self.peek_kind() == TokenKind::Method {
            methods.push(self.parse_methoddef()?);
        }

        let close = self.expect(TokenKind::RParen)?;
        Ok(ClassDef {
            name,
            superclass,
            fields,
            ctor,
            methods,
            span: Span::new(open.span.start, close.span.end),
        })
    }

    // ── ctor ::= '(' 'init' '(' vardec* ')' supercall? stmt* ')'

    fn parse_constructor(&mut self) -> ParseResult<Constructor> {
        let open = self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::Init)?;

        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while self.check(TokenKind::LParen) && self.peek_kind() == TokenKind::Vardec {
            params.push(self.parse_vardec()?);
        }
        self.expect(TokenKind::RParen)?;

        let super_call = if self.check(TokenKind::LParen) && self.peek_kind() == TokenKind::Super {
            Some(self.parse_supercall()?)
        } else {
            None
        };

        let mut body = Vec::new();
        while !self.check(TokenKind::RParen) {
            body.push(self.parse_stmt()?);
        }
        let close = self.expect(TokenKind::RParen)?;

        Ok(Constructor {
            params,
            super_call,
            body,
            span: Span::new(open.span.start, close.span.end),
        })
    }

    // ── supercall ::= '(' 'super' exp* ')'

    fn parse_supercall(&mut self) -> ParseResult<SuperCall> {
        let open = self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::Super)?;
        let mut args = Vec::new();
        while !self.check(TokenKind::RParen) {
            args.push(self.parse_expr()?);
        }
        let close = self.expect(TokenKind::RParen)?;
        Ok(SuperCall {
            args,
            span: Span::new(open.span.start, close.span.end),
        })
    }

    // ── methoddef ::= '(' 'method' IDENT '(' vardec* ')' type stmt* ')'

    fn parse_methoddef(&mut self) -> ParseResult<MethodDef> {
        let open = self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::Method)?;
        let name = self.expect_ident()?;

        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while self.check(TokenKind::LParen) && self.peek_kind() == TokenKind::Vardec {
            params.push(self.parse_vardec()?);
        }
        self.expect(TokenKind::RParen)?;

        let return_type = self.parse_type()?;

        let mut body = Vec::new();
        while !self.check(TokenKind::RParen) {
            body.push(self.parse_stmt()?);
        }
        let close = self.expect(TokenKind::RParen)?;

        Ok(MethodDef {
            name,
            params,
            return_type,
            body,
            span: Span::new(open.span.start, close.span.end),
        })
    }

    // ── vardec ::= '(' 'vardec' type IDENT ')'

    fn parse_vardec(&mut self) -> ParseResult<VarDec> {
        let open = self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::Vardec)?;
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;
        let close = self.expect(TokenKind::RParen)?;
        Ok(VarDec {
            ty,
            name,
            span: Span::new(open.span.start, close.span.end),
        })
    }

    // ── type ::= 'Int' | 'Boolean' | 'Void' | IDENT

    fn parse_type(&mut self) -> ParseResult<TypeRef> {
        let name = match self.current.kind {
            TokenKind::IntType => "Int",
            TokenKind::BooleanType => "Boolean",
            TokenKind::VoidType => "Void",
            TokenKind::Ident => self.current_text(),
            _ => return Err(self.error_expected("type")),
        };
        let tok = self.bump();
        Ok(TypeRef {
            name: name.to_string(),
            span: tok.span,
        })
    }

    // ── stmt ::= vardec | 'break' | assign | while | if | return | call | println

    fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        if self.check(TokenKind::Break) {
            let tok = self.bump();
            return Ok(Stmt::Break(tok.span));
        }

        if !self.check(TokenKind::LParen) {
            return Err(self.error_expected("'(' or 'break'"));
        }

        match self.peek_kind() {
            TokenKind::Vardec => Ok(Stmt::VarDec(self.parse_vardec()?)),
            TokenKind::Eq => self.parse_assign(),
            TokenKind::While => self.parse_while(),
            TokenKind::If => self.parse_if(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Call => Ok(Stmt::ExprStmt(Expr::Call(self.parse_call()?))),
            TokenKind::Println => Ok(Stmt::ExprStmt(Expr::Println(self.parse_println()?))),
            _ => Err(ParseError::malformed(
                self.current_text(),
                "not a valid statement form",
                self.current.span,
            )),
        }
    }

    fn parse_assign(&mut self) -> ParseResult<Stmt> {
        let open = self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::Eq)?;
        let target = self.expect_ident()?;
        let value = self.parse_expr()?;
        let close = self.expect(TokenKind::RParen)?;
        Ok(Stmt::Assign(Assign {
            target,
            value,
            span: Span::new(open.span.start, close.span.end),
        }))
    }

    fn parse_while(&mut self) -> ParseResult<Stmt> {
        let open = self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::While)?;
        let cond = self.parse_expr()?;
        let mut body = Vec::new();
        while !self.check(TokenKind::RParen) {
            body.push(self.parse_stmt()?);
        }
        let close = self.expect(TokenKind::RParen)?;
        Ok(Stmt::While(While {
            cond,
            body,
            span: Span::new(open.span.start, close.span.end),
        }))
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let open = self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::If)?;
        let cond = self.parse_expr()?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(Box::new(self.parse_stmt()?))
        };
        let close = self.expect(TokenKind::RParen)?;
        Ok(Stmt::If(If {
            cond,
            then_branch,
            else_branch,
            span: Span::new(open.span.start, close.span.end),
        }))
    }

    fn parse_return(&mut self) -> ParseResult<Stmt> {
        let open = self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::Return)?;
        let value = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let close = self.expect(TokenKind::RParen)?;
        Ok(Stmt::Return(Return {
            value,
            span: Span::new(open.span.start, close.span.end),
        }))
    }

    // ── exp ::= IDENT | 'this' | 'true' | 'false' | INT
    //         | '(' 'println' exp ')' | '(' op exp exp ')'
    //         | '(' 'call' exp IDENT exp* ')' | '(' 'new' IDENT exp* ')'

    fn parse_expr(&mut self) -> ParseResult<Expr> {
        match self.current.kind {
            TokenKind::Ident => {
                let tok = self.bump();
                Ok(Expr::Ident(Ident {
                    name: self.text(tok).to_string(),
                    span: tok.span,
                }))
            }
            TokenKind::This => Ok(Expr::This(self.bump().span)),
            TokenKind::True => Ok(Expr::True(self.bump().span)),
            TokenKind::False => Ok(Expr::False(self.bump().span)),
            TokenKind::IntLiteral => {
                let tok = self.bump();
                let text = self.text(tok);
                let value = text.parse::<i64>().map_err(|_| {
                    ParseError::malformed(text, "integer literal out of range", tok.span)
                })?;
                Ok(Expr::IntLiteral(IntLiteral {
                    value,
                    span: tok.span,
                }))
            }
            TokenKind::LParen => match self.peek_kind() {
                TokenKind::Println => Ok(Expr::Println(self.parse_println()?)),
                TokenKind::Call => Ok(Expr::Call(self.parse_call()?)),
                TokenKind::New => Ok(Expr::New(self.parse_new()?)),
                TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Lt
                | TokenKind::EqEq => self.parse_binop(),
                _ => Err(ParseError::malformed(
                    self.current_text(),
                    "not a valid expression form",
                    self.current.span,
                )),
            },
            _ => Err(self.error_expected("expression")),
        }
    }

    fn parse_println(&mut self) -> ParseResult<Println> {
        let open = self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::Println)?;
        let value = Box::new(self.parse_expr()?);
        let close = self.expect(TokenKind::RParen)?;
        Ok(Println {
            value,
            span: Span::new(open.span.start, close.span.end),
        })
    }

    fn parse_binop(&mut self) -> ParseResult<Expr> {
        let open = self.expect(TokenKind::LParen)?;
        let op = match self.bump().kind {
            TokenKind::Plus => BinOpKind::Add,
            TokenKind::Minus => BinOpKind::Sub,
            TokenKind::Star => BinOpKind::Mul,
            TokenKind::Slash => BinOpKind::Div,
            TokenKind::Lt => BinOpKind::Lt,
            TokenKind::EqEq => BinOpKind::EqEq,
            _ => unreachable!("parse_binop only called on an operator lookahead"),
        };
        let lhs = Box::new(self.parse_expr()?);
        let rhs = Box::new(self.parse_expr()?);
        let close = self.expect(TokenKind::RParen)?;
        Ok(Expr::BinOp(BinOp {
            op,
            lhs,
            rhs,
            span: Span::new(open.span.start, close.span.end),
        }))
    }

    fn parse_call(&mut self) -> ParseResult<Call> {
        let open = self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::Call)?;
        let receiver = Box::new(self.parse_expr()?);
        let method = self.expect_ident()?;
        let mut args = Vec::new();
        while !self.check(TokenKind::RParen) {
            args.push(self.parse_expr()?);
        }
        let close = self.expect(TokenKind::RParen)?;
        Ok(Call {
            receiver,
            method,
            args,
            span: Span::new(open.span.start, close.span.end),
        })
    }

    fn parse_new(&mut self) -> ParseResult<New> {
        let open = self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::New)?;
        let class_name = self.expect_ident()?;
        let mut args = Vec::new();
        while !self.check(TokenKind::RParen) {
            args.push(self.parse_expr()?);
        }
        let close = self.expect(TokenKind::RParen)?;
        Ok(New {
            class_name,
            args,
            span: Span::new(open.span.start, close.span.end),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_past_eof_keeps_returning_eof() {
        let mut parser = Parser::new("");
        assert_eq!(parser.current.kind, TokenKind::Eof);
        assert_eq!(parser.bump().kind, TokenKind::Eof);
        assert_eq!(parser.current.kind, TokenKind::Eof);
    }

    #[test]
    fn peek_kind_does_not_consume() {
        let mut parser = Parser::new("(class");
        assert_eq!(parser.current.kind, TokenKind::LParen);
        assert_eq!(parser.peek_kind(), TokenKind::Class);
        assert_eq!(parser.current.kind, TokenKind::LParen);
    }

    #[test]
    fn program_span_covers_whole_input() {
        let program = parse("(println 3)").unwrap();
        assert_eq!(program.span.start, 0);
        assert_eq!(program.span.end, 11);
    }

    #[test]
    fn expression_as_statement_only_accepts_call_and_println() {
        // A bare binop at statement position is not a valid statement form.
        let err = parse("(+ 1 2)").unwrap_err();
        assert!(matches!(err, ParseError::Malformed { .. }));
    }
}
