#![cfg(test)]

use crate::sema::resolver::{resolve, Resolution};
use crate::sema::sema_error::SemanticError;
use crate::sema::symbol::Symbol;
use crate::syntax::ast::*;
use crate::syntax::parser::parser_tests::parse_program;

fn resolve_src(src: &str) -> (Program, Resolution, Vec<SemanticError>) {
    let program = parse_program(src);
    let (resolution, errors) = resolve(&program);
    (program, resolution, errors)
}

fn messages(errors: &[SemanticError]) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}

/// The function declaration at `decls[idx]`.
fn fn_decl(program: &Program, idx: usize) -> &FnDecl {
    match &program.decls[idx] {
        Decl::Fn(fun) => fun,
        other => panic!("expected a function declaration, got {:?}", other),
    }
}

#[test]
fn undeclared_identifier_reports_line_and_column() {
    let (_, _, errors) = resolve_src("int f(){ x = 1; }");
    assert!(messages(&errors).contains(&"1:10 Undeclared identifier".to_string()));
}

#[test]
fn missing_main_is_reported_at_origin() {
    let (_, resolution, errors) = resolve_src("int g(){ return 0; }");
    assert!(resolution.no_main);
    assert!(messages(&errors).contains(&"0:0 No main function".to_string()));
}

#[test]
fn declaring_main_satisfies_the_driver() {
    let (_, resolution, errors) = resolve_src("void main(){}");
    assert!(!resolution.no_main);
    assert!(errors.is_empty());
}

#[test]
fn multiply_declared_variable() {
    let (_, _, errors) = resolve_src("int x; bool x; void main(){}");
    assert!(errors
        .iter()
        .any(|e| matches!(e, SemanticError::MultiplyDeclared { .. })));
}

#[test]
fn multiply_declared_function_still_analyzes_its_body() {
    let (_, _, errors) = resolve_src("void f(){} void f(){ y = 1; } void main(){}");
    assert!(errors
        .iter()
        .any(|e| matches!(e, SemanticError::MultiplyDeclared { .. })));
    assert!(errors
        .iter()
        .any(|e| matches!(e, SemanticError::Undeclared { .. })));
}

#[test]
fn non_function_declared_void() {
    let (_, _, errors) = resolve_src("void x; void main(){}");
    assert!(messages(&errors).contains(&"1:6 Non-function declared void".to_string()));
}

#[test]
fn undeclared_struct_type_name() {
    let (_, _, errors) = resolve_src("struct T x; void main(){}");
    assert!(errors
        .iter()
        .any(|e| matches!(e, SemanticError::InvalidStructType { .. })));
}

#[test]
fn duplicate_formals_are_rejected() {
    let (_, _, errors) = resolve_src("void main(int a, int a){}");
    assert!(errors
        .iter()
        .any(|e| matches!(e, SemanticError::MultiplyDeclared { .. })));
}

#[test]
fn shadowing_in_a_nested_scope_is_allowed() {
    let (_, _, errors) = resolve_src("void main(){ int x; if (true) { int x; } }");
    assert!(errors.is_empty());
}

#[test]
fn sibling_scopes_do_not_leak() {
    let (_, _, errors) =
        resolve_src("void main(){ if (true) { int x; } else { x = 1; } }");
    assert!(errors
        .iter()
        .any(|e| matches!(e, SemanticError::Undeclared { .. })));
}

#[test]
fn frame_layout_of_formals_and_locals() {
    let (program, resolution, errors) =
        resolve_src("void main(int a, bool b){ int x; int y; }");
    assert!(errors.is_empty());

    let main = fn_decl(&program, 0);
    let offset_of = |id| {
        let sid = resolution.sym_of(id).expect("unresolved declaration");
        resolution.symbols.offset_of(sid)
    };

    // Formals from 0 downward, then 8 bytes for $ra/$fp, then locals.
    assert_eq!(offset_of(main.formals[0].name.id), 0);
    assert_eq!(offset_of(main.formals[1].name.id), -4);
    assert_eq!(offset_of(main.body.decls[0].name.id), -16);
    assert_eq!(offset_of(main.body.decls[1].name.id), -20);

    let fn_sym = resolution.sym_of(main.name.id).expect("unresolved function");
    let Symbol::Fn {
        param_size,
        local_size,
        params,
        ..
    } = resolution.symbols.get(fn_sym)
    else {
        panic!("expected a function symbol");
    };
    assert_eq!(*param_size, 8);
    assert_eq!(*local_size, 8);
    assert_eq!(params.len(), 2);
}

#[test]
fn globals_carry_no_offset() {
    let (program, resolution, errors) = resolve_src("int g; void main(){}");
    assert!(errors.is_empty());

    let Decl::Var(ref var) = program.decls[0] else {
        panic!("expected a global variable");
    };
    let sid = resolution.sym_of(var.name.id).expect("unresolved global");
    let Symbol::Var {
        offset, is_global, ..
    } = resolution.symbols.get(sid)
    else {
        panic!("expected a variable symbol");
    };
    assert!(*is_global);
    assert_eq!(*offset, -1);
}

#[test]
fn struct_fields_resolve_through_dot_access() {
    let (program, resolution, errors) = resolve_src(
        "struct S { int a; int b; };\n\
         void main(){ struct S s; s.a = 1; }",
    );
    assert!(errors.is_empty());

    let main = fn_decl(&program, 1);
    let Stmt::Assign(ref assign) = main.body.stmts[0] else {
        panic!("expected an assignment");
    };
    let Expr::Assign { ref lhs, .. } = assign.target else {
        panic!("expected assign expr");
    };
    let Expr::Dot { ref field, .. } = lhs.target else {
        panic!("expected dot access on the left");
    };
    assert!(resolution.sym_of(field.id).is_some());
}

#[test]
fn invalid_struct_field_name() {
    let (_, _, errors) = resolve_src(
        "struct S { int a; };\n\
         void main(){ struct S s; s.z = 1; }",
    );
    assert!(errors
        .iter()
        .any(|e| matches!(e, SemanticError::InvalidStructField { .. })));
}

#[test]
fn dot_access_of_non_struct() {
    let (_, _, errors) = resolve_src("void main(){ int x; x.a = 1; }");
    assert!(errors
        .iter()
        .any(|e| matches!(e, SemanticError::DotAccessOfNonStruct { .. })));
}

#[test]
fn chained_dot_access_resolves() {
    let (_, _, errors) = resolve_src(
        "struct Inner { int v; };\n\
         struct Outer { struct Inner i; };\n\
         void main(){ struct Outer o; o.i.v = 3; }",
    );
    assert!(errors.is_empty());
}

#[test]
fn struct_fields_may_shadow_outer_names() {
    // A field named like a global is a distinct symbol in the field table.
    let (_, _, errors) = resolve_src(
        "int a;\n\
         struct S { int a; };\n\
         void main(){ struct S s; s.a = 1; a = 2; }",
    );
    assert!(errors.is_empty());
}

#[test]
fn resolution_is_deterministic() {
    let src = "int g; struct S { int a; }; void main(int n){ struct S s; s.a = n; g = n; }";
    let (_, _, first) = resolve_src(src);
    let (_, _, second) = resolve_src(src);
    assert_eq!(first, second);
}
