//! The three-pass type checker.
//!
//! Pass 1 registers classes, pass 2 registers constructor/method signatures
//! and validates overrides, pass 3 checks every constructor/method body and
//! finally the top-level statements. State lives in a single [`Checker`]
//! value threaded through the recursion rather than process-wide globals.

use classy_parser::ast::{
    BinOp, Call, ClassDef, Expr, MethodDef, New, Println, Program, Stmt, SuperCall, TypeRef,
    VarDec,
};

use crate::env::{ClassEnv, MethodEnv, Signature, SymbolTable};
use crate::error::TypeError;
use crate::ty::Type;

type CheckResult<T = ()> = Result<T, TypeError>;

/// Per-constructor/method/top-level-block checking context: the active
/// symbol table, the expected return type, and loop nesting depth.
struct BodyCtx {
    symbols: SymbolTable,
    return_type: Type,
    loop_depth: u32,
}

/// Class and method environments, built in passes 1-2 and read-only during
/// pass 3.
pub struct Checker {
    classes: ClassEnv,
    methods: MethodEnv,
}

impl Checker {
    /// Type-check a whole program. Returns `Ok(())` if every class and the
    /// top-level statement block are well-typed.
    pub fn check_program(program: &Program) -> CheckResult {
        let mut checker = Checker {
            classes: ClassEnv::default(),
            methods: MethodEnv::default(),
        };
        checker.register_classes(&program.classes)?;
        checker.register_signatures(&program.classes)?;
        checker.check_overrides(&program.classes)?;
        checker.check_bodies(&program.classes)?;
        checker.check_top_level(&program.stmts)?;
        Ok(())
    }

    // ── Pass 1: class registration ───────────────────────────────────────

    fn register_classes(&mut self, classes: &[ClassDef]) -> CheckResult {
        for class in classes {
            if self.classes.contains(&class.name.name) {
                return Err(TypeError::new(
                    "ClassDef",
                    format!("duplicate class '{}'", class.name.name),
                ));
            }
            self.classes.register(
                class.name.name.clone(),
                class.superclass.as_ref().map(|s| s.name.clone()),
            );
        }
        Ok(())
    }

    // ── Pass 2: signature registration + override validation ───────────

    fn resolve_type(&self, type_ref: &TypeRef, label: &str) -> CheckResult<Type> {
        if let Some(primitive) = Type::primitive(&type_ref.name) {
            return Ok(primitive);
        }
        if self.classes.contains(&type_ref.name) {
            return Ok(Type::Class(type_ref.name.clone()));
        }
        Err(TypeError::new(
            label,
            format!("unknown class '{}'", type_ref.name),
        ))
    }

    fn signature_for(&self, params: &[VarDec], label: &str) -> CheckResult<Vec<Type>> {
        params
            .iter()
            .map(|p| self.resolve_type(&p.ty, label))
            .collect()
    }

    fn register_signatures(&mut self, classes: &[ClassDef]) -> CheckResult {
        for class in classes {
            if let Some(super_name) = &class.superclass {
                if !self.classes.contains(&super_name.name) {
                    return Err(TypeError::new(
                        "ClassDef",
                        format!("unknown class '{}'", super_name.name),
                    ));
                }
            }

            // Field types are validated for well-formedness even though
            // fields are never bound into a body's symbol table (see
            // check_constructor/check_method).
            for field in &class.fields {
                self.resolve_type(&field.ty, "VarDec")?;
            }

            let ctor_params = self.signature_for(&class.ctor.params, "Constructor")?;
            self.methods.register_ctor(
                class.name.name.clone(),
                Signature {
                    params: ctor_params,
                    return_type: Type::Void,
                },
            );

            for method in &class.methods {
                let params = self.signature_for(&method.params, "MethodDef")?;
                let return_type = self.resolve_type(&method.return_type, "MethodDef")?;
                self.methods.register_method(
                    class.name.name.clone(),
                    method.name.name.clone(),
                    Signature {
                        params,
                        return_type,
                    },
                );
            }
        }
        Ok(())
    }

    fn check_overrides(&self, classes: &[ClassDef]) -> CheckResult {
        for class in classes {
            let Some(super_name) = &class.superclass else {
                continue;
            };
            for method in &class.methods {
                let Some(ancestor_sig) =
                    self.methods
                        .resolve_method(&self.classes, &super_name.name, &method.name.name)
                else {
                    continue;
                };
                let params = self.signature_for(&method.params, "MethodDef")?;
                let return_type = self.resolve_type(&method.return_type, "MethodDef")?;
                let this_sig = Signature {
                    params,
                    return_type,
                };
                if &this_sig != ancestor_sig {
                    return Err(TypeError::new(
                        "MethodDef",
                        format!(
                            "overriding method '{}' must match its ancestor's signature exactly",
                            method.name.name
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    // ── Pass 3: body checking ────────────────────────────────────────────

    fn check_bodies(&self, classes: &[ClassDef]) -> CheckResult {
        for class in classes {
            self.check_constructor(class)?;
            for method in &class.methods {
                self.check_method(class, method)?;
            }
        }
        Ok(())
    }

    fn declare_vardec(&self, symbols: &mut SymbolTable, vardec: &VarDec) -> CheckResult {
        let ty = self.resolve_type(&vardec.ty, "VarDec")?;
        if ty == Type::Void {
            return Err(TypeError::new("VarDec", "Void is not a legal variable type"));
        }
        if !symbols.declare(vardec.name.name.clone(), ty) {
            return Err(TypeError::new(
                "VarDec",
                format!("'{}' is already declared in this scope", vardec.name.name),
            ));
        }
        Ok(())
    }

    fn check_constructor(&self, class: &ClassDef) -> CheckResult {
        let mut symbols = SymbolTable::new();
        symbols.declare("this", Type::Class(class.name.name.clone()));
        for field in &class.fields {
            self.declare_vardec(&mut symbols, field)?;
        }
        for param in &class.ctor.params {
            self.declare_vardec(&mut symbols, param)?;
        }
        if let Some(super_call) = &class.ctor.super_call {
            self.check_super_call(class, super_call, &symbols)?;
        }

        let mut ctx = BodyCtx {
            symbols,
            return_type: Type::Void,
            loop_depth: 0,
        };
        for stmt in &class.ctor.body {
            self.check_stmt(&mut ctx, stmt)?;
        }
        Ok(())
    }

    fn check_super_call(
        &self,
        class: &ClassDef,
        super_call: &SuperCall,
        symbols: &SymbolTable,
    ) -> CheckResult {
        let super_name = class.superclass.as_ref().ok_or_else(|| {
            TypeError::new("SuperCall", "super call in a class with no superclass")
        })?;
        let super_ctor = self
            .methods
            .ctor(&super_name.name)
            .expect("every registered class has a constructor signature");

        if super_call.args.len() != super_ctor.params.len() {
            return Err(TypeError::new(
                "SuperCall",
                format!(
                    "expected {} arguments but got {}",
                    super_ctor.params.len(),
                    super_call.args.len()
                ),
            ));
        }
        for (i, (arg, expected)) in super_call.args.iter().zip(&super_ctor.params).enumerate() {
            let actual = self.infer_expr(symbols, arg)?;
            if !self.classes.is_subtype(&actual, expected) {
                return Err(TypeError::new(
                    "SuperCall",
                    format!("argument {} has type {actual} but expected {expected}", i + 1),
                ));
            }
        }
        Ok(())
    }

    fn check_method(&self, class: &ClassDef, method: &MethodDef) -> CheckResult {
        let mut symbols = SymbolTable::new();
        symbols.declare("this", Type::Class(class.name.name.clone()));
        for field in &class.fields {
            self.declare_vardec(&mut symbols, field)?;
        }
        for param in &method.params {
            self.declare_vardec(&mut symbols, param)?;
        }
        let return_type = self.resolve_type(&method.return_type, "MethodDef")?;

        let mut ctx = BodyCtx {
            symbols,
            return_type,
            loop_depth: 0,
        };
        for stmt in &method.body {
            self.check_stmt(&mut ctx, stmt)?;
        }
        Ok(())
    }

    fn check_top_level(&self, stmts: &[Stmt]) -> CheckResult {
        let mut ctx = BodyCtx {
            symbols: SymbolTable::new(),
            return_type: Type::Void,
            loop_depth: 0,
        };
        for stmt in stmts {
            self.check_stmt(&mut ctx, stmt)?;
        }
        Ok(())
    }

    // ── Statement checking ───────────────────────────────────────────────

    fn check_stmt(&self, ctx: &mut BodyCtx, stmt: &Stmt) -> CheckResult {
        match stmt {
            Stmt::VarDec(v) => self.declare_vardec(&mut ctx.symbols, v),
            Stmt::Break(_) => {
                if ctx.loop_depth == 0 {
                    Err(TypeError::new("Break", "Break outside loop"))
                } else {
                    Ok(())
                }
            }
            Stmt::Assign(a) => {
                let target_ty = ctx.symbols.lookup(&a.target.name).cloned().ok_or_else(|| {
                    TypeError::new(
                        "Assign",
                        format!("assignment to undeclared variable '{}'", a.target.name),
                    )
                })?;
                let value_ty = self.infer_expr(&ctx.symbols, &a.value)?;
                if !self.classes.is_subtype(&value_ty, &target_ty) {
                    return Err(TypeError::new(
                        "Assign",
                        format!("value has type {value_ty} but target has type {target_ty}"),
                    ));
                }
                Ok(())
            }
            Stmt::If(i) => {
                let cond_ty = self.infer_expr(&ctx.symbols, &i.cond)?;
                if cond_ty != Type::Boolean {
                    return Err(TypeError::new(
                        "If",
                        format!("condition must be Boolean but found {cond_ty}"),
                    ));
                }
                self.check_stmt(ctx, &i.then_branch)?;
                if let Some(else_branch) = &i.else_branch {
                    self.check_stmt(ctx, else_branch)?;
                }
                Ok(())
            }
            Stmt::While(w) => {
                let cond_ty = self.infer_expr(&ctx.symbols, &w.cond)?;
                if cond_ty != Type::Boolean {
                    return Err(TypeError::new(
                        "While",
                        format!("condition must be Boolean but found {cond_ty}"),
                    ));
                }
                ctx.loop_depth += 1;
                for s in &w.body {
                    if let Err(err) = self.check_stmt(ctx, s) {
                        ctx.loop_depth -= 1;
                        return Err(err);
                    }
                }
                ctx.loop_depth -= 1;
                Ok(())
            }
            Stmt::Return(r) => match &r.value {
                Some(value) => {
                    let value_ty = self.infer_expr(&ctx.symbols, value)?;
                    if !self.classes.is_subtype(&value_ty, &ctx.return_type) {
                        return Err(TypeError::new(
                            "Return",
                            format!("returned {value_ty} but expected {}", ctx.return_type),
                        ));
                    }
                    Ok(())
                }
                None => {
                    if ctx.return_type != Type::Void {
                        return Err(TypeError::new(
                            "Return",
                            format!("missing return value; expected {}", ctx.return_type),
                        ));
                    }
                    Ok(())
                }
            },
            Stmt::ExprStmt(e) => self.infer_expr(&ctx.symbols, e).map(|_| ()),
        }
    }

    // ── Expression synthesis ─────────────────────────────────────────────

    fn infer_expr(&self, symbols: &SymbolTable, expr: &Expr) -> CheckResult<Type> {
        match expr {
            Expr::IntLiteral(_) => Ok(Type::Int),
            Expr::True(_) | Expr::False(_) => Ok(Type::Boolean),
            Expr::This(_) => symbols
                .lookup("this")
                .cloned()
                .ok_or_else(|| TypeError::new("this", "'this' used outside a class body")),
            Expr::Ident(ident) => symbols
                .lookup(&ident.name)
                .cloned()
                .ok_or_else(|| TypeError::new(ident.name.as_str(), "undefined variable")),
            Expr::BinOp(bin) => self.infer_binop(symbols, bin),
            Expr::Println(p) => self.infer_println(symbols, p),
            Expr::Call(call) => self.infer_call(symbols, call),
            Expr::New(new_expr) => self.infer_new(symbols, new_expr),
        }
    }

    fn infer_binop(&self, symbols: &SymbolTable, bin: &BinOp) -> CheckResult<Type> {
        let lhs = self.infer_expr(symbols, &bin.lhs)?;
        let rhs = self.infer_expr(symbols, &bin.rhs)?;
        if lhs != Type::Int || rhs != Type::Int {
            let cause = if bin.op.yields_boolean() {
                "comparison requires Int operands"
            } else {
                "arithmetic requires Int operands"
            };
            return Err(TypeError::new(bin.op.symbol(), cause));
        }
        Ok(if bin.op.yields_boolean() {
            Type::Boolean
        } else {
            Type::Int
        })
    }

    fn infer_println(&self, symbols: &SymbolTable, println: &Println) -> CheckResult<Type> {
        let arg_ty = self.infer_expr(symbols, &println.value)?;
        if arg_ty != Type::Int {
            return Err(TypeError::new(
                "Println",
                format!("argument must be Int but found {arg_ty}"),
            ));
        }
        Ok(Type::Void)
    }

    fn infer_call(&self, symbols: &SymbolTable, call: &Call) -> CheckResult<Type> {
        let recv_ty = self.infer_expr(symbols, &call.receiver)?;
        let class_name = match &recv_ty {
            Type::Class(name) => name,
            other => {
                return Err(TypeError::new(
                    "Call",
                    format!("method call receiver must be a class type but found {other}"),
                ))
            }
        };
        let sig = self
            .methods
            .resolve_method(&self.classes, class_name, &call.method.name)
            .ok_or_else(|| {
                TypeError::new(
                    "Call",
                    format!("unknown method '{}' on class '{class_name}'", call.method.name),
                )
            })?;
        if call.args.len() != sig.params.len() {
            return Err(TypeError::new(
                "Call",
                format!(
                    "expected {} arguments but got {}",
                    sig.params.len(),
                    call.args.len()
                ),
            ));
        }
        for (i, (arg, expected)) in call.args.iter().zip(&sig.params).enumerate() {
            let actual = self.infer_expr(symbols, arg)?;
            if !self.classes.is_subtype(&actual, expected) {
                return Err(TypeError::new(
                    "Call",
                    format!("argument {} has type {actual} but expected {expected}", i + 1),
                ));
            }
        }
        Ok(sig.return_type.clone())
    }

    fn infer_new(&self, symbols: &SymbolTable, new_expr: &New) -> CheckResult<Type> {
        let class_name = &new_expr.class_name.name;
        if !self.classes.contains(class_name) {
            return Err(TypeError::new("New", format!("unknown class '{class_name}'")));
        }
        let ctor = self
            .methods
            .ctor(class_name)
            .expect("every registered class has a constructor signature");
        if new_expr.args.len() != ctor.params.len() {
            return Err(TypeError::new(
                "New",
                format!(
                    "expected {} constructor arguments but got {}",
                    ctor.params.len(),
                    new_expr.args.len()
                ),
            ));
        }
        for (i, (arg, expected)) in new_expr.args.iter().zip(&ctor.params).enumerate() {
            let actual = self.infer_expr(symbols, arg)?;
            if !self.classes.is_subtype(&actual, expected) {
                return Err(TypeError::new(
                    "New",
                    format!("argument {} has type {actual} but expected {expected}", i + 1),
                ));
            }
        }
        Ok(Type::Class(class_name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classy_parser::parse;

    fn check(src: &str) -> CheckResult {
        let program = parse(src).expect("test program must parse");
        Checker::check_program(&program)
    }

    #[test]
    fn println_int_passes() {
        assert!(check("(println 3)").is_ok());
    }

    #[test]
    fn println_boolean_fails() {
        let err = check("(println true)").unwrap_err();
        assert_eq!(err.label, "Println");
    }

    #[test]
    fn vardec_assign_println_passes() {
        assert!(check("(vardec Int x) (= x (+ 1 2)) (println x)").is_ok());
    }

    #[test]
    fn new_with_matching_constructor_args_passes() {
        let src = "(class A ((vardec Int n)) (init ((vardec Int v)))) (vardec A a) (= a (new A 5)) (println 0)";
        assert!(check(src).is_ok());
    }

    #[test]
    fn new_with_wrong_arg_type_fails() {
        let src = "(class A ((vardec Int n)) (init ((vardec Int v)))) (vardec A a) (= a (new A true)) (println 0)";
        let err = check(src).unwrap_err();
        assert_eq!(err.label, "New");
    }

    #[test]
    fn unknown_superclass_fails_at_signature_registration() {
        let src = "(class B A () (init ())) (println 0)";
        let err = check(src).unwrap_err();
        assert_eq!(err.label, "ClassDef");
        assert!(err.cause.contains("unknown class"));
    }

    #[test]
    fn break_outside_loop_fails() {
        let src = "(class A () (init ()) (method m () Void break)) (vardec A a) (= a (new A)) (println 0)";
        let err = check(src).unwrap_err();
        assert_eq!(err.label, "Break");
    }

    #[test]
    fn break_inside_while_passes() {
        let src = "(while true break) (println 0)";
        assert!(check(src).is_ok());
    }

    #[test]
    fn field_is_bound_and_assignable_in_constructor_scope() {
        let src = "(class A ((vardec Int n)) (init ((vardec Int v)) (= n v))) \
                   (vardec A a) (= a (new A 5)) (println 0)";
        assert!(check(src).is_ok());
    }

    #[test]
    fn field_is_bound_and_assignable_in_method_scope() {
        let src = "\
(class A ((vardec Int n)) (init ((vardec Int v)) (= n v))
  (method bump () Void (= n (+ n 1))))
(vardec A a) (= a (new A 5)) (println 0)";
        assert!(check(src).is_ok());
    }

    #[test]
    fn field_with_undeclared_class_type_fails_at_signature_registration() {
        let src = "(class A ((vardec Ghost n)) (init ())) (println 0)";
        let err = check(src).unwrap_err();
        assert!(err.cause.contains("unknown class"));
    }

    #[test]
    fn duplicate_class_name_fails() {
        let src = "(class A () (init ())) (class A () (init ())) (println 0)";
        let err = check(src).unwrap_err();
        assert_eq!(err.label, "ClassDef");
        assert!(err.cause.contains("duplicate"));
    }

    #[test]
    fn exact_override_passes() {
        let src = "\
(class A () (init ()) (method m () Int (return 1)))
(class B A () (init ()) (method m () Int (return 2)))
(vardec B b) (= b (new B)) (println (call b m))";
        assert!(check(src).is_ok());
    }

    #[test]
    fn mismatched_override_fails() {
        let src = "\
(class A () (init ()) (method m () Int (return 1)))
(class B A () (init ()) (method m () Boolean (return true)))
(println 0)";
        let err = check(src).unwrap_err();
        assert_eq!(err.label, "MethodDef");
    }

    #[test]
    fn super_call_without_superclass_fails() {
        let src = "(class A () (init () (super))) (println 0)";
        let err = check(src).unwrap_err();
        assert_eq!(err.label, "SuperCall");
    }

    #[test]
    fn this_outside_class_body_fails() {
        let err = check("(println this)").unwrap_err();
        assert_eq!(err.label, "this");
    }

    #[test]
    fn return_value_in_void_method_fails() {
        let src = "(class A () (init ()) (method m () Void (return 1))) (println 0)";
        let err = check(src).unwrap_err();
        assert_eq!(err.label, "Return");
    }

    #[test]
    fn missing_return_value_in_non_void_method_fails() {
        let src = "(class A () (init ()) (method m () Int (return))) (println 0)";
        let err = check(src).unwrap_err();
        assert_eq!(err.label, "Return");
    }

    #[test]
    fn redeclaration_in_same_scope_fails() {
        let src = "(vardec Int x) (vardec Int x) (println 0)";
        let err = check(src).unwrap_err();
        assert_eq!(err.label, "VarDec");
    }

    #[test]
    fn subtyping_through_two_level_chain() {
        let src = "\
(class A () (init ()))
(class B A () (init ()))
(class C B () (init ()))
(vardec A a) (= a (new C)) (println 0)";
        assert!(check(src).is_ok());
    }

    #[test]
    fn void_variable_declaration_is_rejected() {
        let err = check("(vardec Void x) (println 0)").unwrap_err();
        assert_eq!(err.label, "VarDec");
    }

    #[test]
    fn call_on_non_class_receiver_fails() {
        let err = check("(println (call 5 m))").unwrap_err();
        assert_eq!(err.label, "Call");
    }
}
