//! Parser integration tests covering grammar forms and failure modes.

use classy_parser::printer::print_program;
use classy_parser::{parse, ParseError};

fn parse_and_print(source: &str) -> String {
    match parse(source) {
        Ok(program) => print_program(&program),
        Err(err) => format!("error: {err}"),
    }
}

#[test]
fn println_literal() {
    assert_eq!(
        parse_and_print("(println 3)"),
        "Program\n  Println\n    Literal(3)\n"
    );
}

#[test]
fn vardec_assign_println() {
    let expected = "\
Program
  VarDec(x)
    TypeRef(Int)
  Assign(x)
    BinOp(+)
      Literal(1)
      Literal(2)
  Println
    Ident(x)
";
    assert_eq!(
        parse_and_print("(vardec Int x) (= x (+ 1 2)) (println x)"),
        expected
    );
}

#[test]
fn class_with_field_ctor_method() {
    let src = "(class Counter ((vardec Int n)) (init ((vardec Int start)) (= n start)) (method get () Int (return n))) (vardec Counter c) (= c (new Counter 0)) (println 0)";
    let expected = "\
Program
  ClassDef(Counter)
    VarDec(n)
      TypeRef(Int)
    Constructor
      VarDec(start)
        TypeRef(Int)
      Assign(n)
        Ident(start)
    MethodDef(get)
      TypeRef(Int)
      Return
        Ident(n)
  VarDec(c)
    TypeRef(Counter)
  Assign(c)
    New(Counter)
      Literal(0)
  Println
    Literal(0)
";
    assert_eq!(parse_and_print(src), expected);
}

#[test]
fn class_with_superclass_and_supercall() {
    let src = "(class A () (init ())) (class B A () (init () (super))) (println 0)";
    let expected = "\
Program
  ClassDef(A)
    Constructor
  ClassDef(B)
    TypeRef(A)
    Constructor
      SuperCall
  Println
    Literal(0)
";
    assert_eq!(parse_and_print(src), expected);
}

#[test]
fn if_without_else_has_two_children() {
    let expected = "\
Program
  If
    Literal(true)
    Println
      Literal(1)
";
    assert_eq!(parse_and_print("(if true (println 1))"), expected);
}

#[test]
fn while_with_break() {
    let expected = "\
Program
  While
    Literal(true)
    Break
  Println
    Literal(0)
";
    assert_eq!(
        parse_and_print("(while true break) (println 0)"),
        expected
    );
}

#[test]
fn return_with_no_expression() {
    let src = "(class A () (init ()) (method m () Void (return))) (println 0)";
    let expected = "\
Program
  ClassDef(A)
    Constructor
    MethodDef(m)
      TypeRef(Void)
      Return
  Println
    Literal(0)
";
    assert_eq!(parse_and_print(src), expected);
}

#[test]
fn call_expression_and_statement() {
    let src = "(class A () (init ()) (method m () Int (return 1))) (vardec A a) (= a (new A)) (call a m) (println (call a m))";
    let expected = "\
Program
  ClassDef(A)
    Constructor
    MethodDef(m)
      TypeRef(Int)
      Return
        Literal(1)
  VarDec(a)
    TypeRef(A)
  Assign(a)
    New(A)
  Call(m)
    Ident(a)
  Println
    Call(m)
      Ident(a)
";
    assert_eq!(parse_and_print(src), expected);
}

#[test]
fn empty_program_is_rejected() {
    let err = parse("").unwrap_err();
    assert!(matches!(err, ParseError::Malformed { .. }));
}

#[test]
fn program_with_only_class_no_statement_is_rejected() {
    let src = "(class A () (init ()))";
    let err = parse(src).unwrap_err();
    assert!(matches!(err, ParseError::Malformed { .. }));
}

#[test]
fn mismatched_token_reports_expected_and_found() {
    let err = parse("(vardec Int x").unwrap_err();
    match err {
        ParseError::ExpectedToken {
            expected,
            found_lexeme,
            ..
        } => {
            assert_eq!(expected, ")");
            assert_eq!(found_lexeme, "end of input"); // Eof has an empty span, rendered via describe()
        }
        other => panic!("expected ExpectedToken, got {other:?}"),
    }
}

#[test]
fn unknown_byte_surfaces_as_parse_error() {
    let err = parse("(println @)").unwrap_err();
    assert!(matches!(err, ParseError::ExpectedToken { .. }));
}
