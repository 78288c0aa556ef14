//! AST pretty-printer, a debugging aid kept outside the core pipeline.
//!
//! Each node is printed as its kind name, optionally followed by
//! `(<label>)`, then its children on subsequent lines indented two spaces
//! per level.

use std::fmt::Write as _;

use crate::ast::*;

/// Pretty-print a whole program.
pub fn print_program(program: &Program) -> String {
    let mut out = String::new();
    line(&mut out, 0, "Program");
    for class in &program.classes {
        print_classdef(&mut out, 1, class);
    }
    for stmt in &program.stmts {
        print_stmt(&mut out, 1, stmt);
    }
    out
}

fn line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(text);
    out.push('\n');
}

fn labeled(out: &mut String, depth: usize, kind: &str, label: &str) {
    let mut text = String::new();
    let _ = write!(text, "{kind}({label})");
    line(out, depth, &text);
}

fn print_classdef(out: &mut String, depth: usize, class: &ClassDef) {
    labeled(out, depth, "ClassDef", &class.name.name);
    if let Some(super_name) = &class.superclass {
        labeled(out, depth + 1, "TypeRef", &super_name.name);
    }
    for field in &class.fields {
        print_vardec(out, depth + 1, field);
    }
    print_constructor(out, depth + 1, &class.ctor);
    for method in &class.methods {
        print_methoddef(out, depth + 1, method);
    }
}

fn print_constructor(out: &mut String, depth: usize, ctor: &Constructor) {
    line(out, depth, "Constructor");
    for param in &ctor.params {
        print_vardec(out, depth + 1, param);
    }
    if let Some(super_call) = &ctor.super_call {
        line(out, depth + 1, "SuperCall");
        for arg in &super_call.args {
            print_expr(out, depth + 2, arg);
        }
    }
    for stmt in &ctor.body {
        print_stmt(out, depth + 1, stmt);
    }
}

fn print_methoddef(out: &mut String, depth: usize, method: &MethodDef) {
    labeled(out, depth, "MethodDef", &method.name.name);
    for param in &method.params {
        print_vardec(out, depth + 1, param);
    }
    labeled(out, depth + 1, "TypeRef", &method.return_type.name);
    for stmt in &method.body {
        print_stmt(out, depth + 1, stmt);
    }
}

fn print_vardec(out: &mut String, depth: usize, vardec: &VarDec) {
    labeled(out, depth, "VarDec", &vardec.name.name);
    labeled(out, depth + 1, "TypeRef", &vardec.ty.name);
}

fn print_stmt(out: &mut String, depth: usize, stmt: &Stmt) {
    match stmt {
        Stmt::VarDec(v) => print_vardec(out, depth, v),
        Stmt::Break(_) => line(out, depth, "Break"),
        Stmt::Assign(a) => {
            labeled(out, depth, "Assign", &a.target.name);
            print_expr(out, depth + 1, &a.value);
        }
        Stmt::While(w) => {
            line(out, depth, "While");
            print_expr(out, depth + 1, &w.cond);
            for s in &w.body {
                print_stmt(out, depth + 1, s);
            }
        }
        Stmt::If(i) => {
            line(out, depth, "If");
            print_expr(out, depth + 1, &i.cond);
            print_stmt(out, depth + 1, &i.then_branch);
            if let Some(else_branch) = &i.else_branch {
                print_stmt(out, depth + 1, else_branch);
            }
        }
        Stmt::Return(r) => {
            line(out, depth, "Return");
            if let Some(value) = &r.value {
                print_expr(out, depth + 1, value);
            }
        }
        Stmt::ExprStmt(e) => print_expr(out, depth, e),
    }
}

fn print_expr(out: &mut String, depth: usize, expr: &Expr) {
    match expr {
        Expr::Ident(i) => labeled(out, depth, "Ident", &i.name),
        Expr::This(_) => line(out, depth, "This"),
        Expr::True(_) => line(out, depth, "Literal(true)"),
        Expr::False(_) => line(out, depth, "Literal(false)"),
        Expr::IntLiteral(lit) => labeled(out, depth, "Literal", &lit.value.to_string()),
        Expr::BinOp(b) => {
            labeled(out, depth, "BinOp", b.op.symbol());
            print_expr(out, depth + 1, &b.lhs);
            print_expr(out, depth + 1, &b.rhs);
        }
        Expr::Call(c) => {
            labeled(out, depth, "Call", &c.method.name);
            print_expr(out, depth + 1, &c.receiver);
            for arg in &c.args {
                print_expr(out, depth + 1, arg);
            }
        }
        Expr::Println(p) => {
            line(out, depth, "Println");
            print_expr(out, depth + 1, &p.value);
        }
        Expr::New(n) => {
            labeled(out, depth, "New", &n.class_name.name);
            for arg in &n.args {
                print_expr(out, depth + 1, arg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn prints_println_program() {
        let program = parse("(println 3)").expect("parses");
        let printed = print_program(&program);
        assert_eq!(printed, "Program\n  Println\n    Literal(3)\n");
    }

    #[test]
    fn prints_class_with_field_and_method() {
        let src = "(class Counter ((vardec Int n)) (init ((vardec Int start)) (= n start)) (method get () Int (return n))) (vardec Counter c) (= c (new Counter 0)) (println 0)";
        let program = parse(src).expect("parses");
        let printed = print_program(&program);
        assert!(printed.starts_with("Program\n  ClassDef(Counter)\n"));
        assert!(printed.contains("    VarDec(n)\n"));
        assert!(printed.contains("    Constructor\n"));
        assert!(printed.contains("    MethodDef(get)\n"));
    }
}
