//! Typed AST for the Classy language.
//!
//! Each syntactic category gets its own struct or enum with positional
//! fields, rather than a single uniformly shaped node carrying a string
//! label and a child array. This keeps the type checker's `match` over
//! `Stmt`/`Expr` exhaustive by construction instead of relying on runtime
//! tag dispatch.

use classy_common::Span;

/// The root of a compiled program: zero or more class definitions followed
/// by one or more top-level statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub classes: Vec<ClassDef>,
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// `(class Name Super? (field*) ctor method*)`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: Ident,
    pub superclass: Option<Ident>,
    pub fields: Vec<VarDec>,
    pub ctor: Constructor,
    pub methods: Vec<MethodDef>,
    pub span: Span,
}

/// `(init (param*) supercall? stmt*)`
#[derive(Debug, Clone, PartialEq)]
pub struct Constructor {
    pub params: Vec<VarDec>,
    pub super_call: Option<SuperCall>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `(super exp*)`, legal only as the first element of a constructor body.
#[derive(Debug, Clone, PartialEq)]
pub struct SuperCall {
    pub args: Vec<Expr>,
    pub span: Span,
}

/// `(method Name (param*) ReturnType stmt*)`
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    pub name: Ident,
    pub params: Vec<VarDec>,
    pub return_type: TypeRef,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `(vardec Type Name)`, used for fields, parameters, and local declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDec {
    pub ty: TypeRef,
    pub name: Ident,
    pub span: Span,
}

/// A type reference: one of the three primitives, or a class name.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub name: String,
    pub span: Span,
}

/// An identifier occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// A statement. `Break` and expression-valued statements (`call`, `println`)
/// carry no extra wrapper: their value is synthesized and discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDec(VarDec),
    Break(Span),
    Assign(Assign),
    While(While),
    If(If),
    Return(Return),
    /// An expression used as a statement. The parser only constructs this
    /// variant for `call` and `println` forms, per the grammar.
    ExprStmt(Expr),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::VarDec(v) => v.span,
            Stmt::Break(s) => *s,
            Stmt::Assign(a) => a.span,
            Stmt::While(w) => w.span,
            Stmt::If(i) => i.span,
            Stmt::Return(r) => r.span,
            Stmt::ExprStmt(e) => e.span(),
        }
    }
}

/// `(= Name exp)`
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub target: Ident,
    pub value: Expr,
    pub span: Span,
}

/// `(while exp stmt*)`
#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub cond: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `(if exp stmt stmt?)`
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub cond: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

/// `(return exp?)`
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub value: Option<Expr>,
    pub span: Span,
}

/// An expression. `Call` and `Println` double as statement forms.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    This(Span),
    True(Span),
    False(Span),
    IntLiteral(IntLiteral),
    BinOp(BinOp),
    Call(Call),
    Println(Println),
    New(New),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Ident(i) => i.span,
            Expr::This(s) => *s,
            Expr::True(s) => *s,
            Expr::False(s) => *s,
            Expr::IntLiteral(lit) => lit.span,
            Expr::BinOp(b) => b.span,
            Expr::Call(c) => c.span,
            Expr::Println(p) => p.span,
            Expr::New(n) => n.span,
        }
    }
}

/// An integer literal. The original lexeme text is reparsed into `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct IntLiteral {
    pub value: i64,
    pub span: Span,
}

/// `(op a b)`, op ∈ { +, -, *, /, <, == }.
#[derive(Debug, Clone, PartialEq)]
pub struct BinOp {
    pub op: BinOpKind,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub span: Span,
}

/// The operator of a [`BinOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    EqEq,
}

impl BinOpKind {
    /// Whether this operator yields `Boolean` (`<`, `==`) rather than `Int`.
    pub fn yields_boolean(&self) -> bool {
        matches!(self, BinOpKind::Lt | BinOpKind::EqEq)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::Lt => "<",
            BinOpKind::EqEq => "==",
        }
    }
}

/// `(call recv Method exp*)`
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub receiver: Box<Expr>,
    pub method: Ident,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// `(println exp)`
#[derive(Debug, Clone, PartialEq)]
pub struct Println {
    pub value: Box<Expr>,
    pub span: Span,
}

/// `(new Class exp*)`
#[derive(Debug, Clone, PartialEq)]
pub struct New {
    pub class_name: Ident,
    pub args: Vec<Expr>,
    pub span: Span,
}
