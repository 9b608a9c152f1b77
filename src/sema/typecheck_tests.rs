#![cfg(test)]

use crate::sema::resolver::resolve;
use crate::sema::sema_error::SemanticError;
use crate::sema::typecheck::{check, TypeMap};
use crate::sema::types::Ty;
use crate::syntax::ast::*;
use crate::syntax::parser::parser_tests::parse_program;

fn check_src(src: &str) -> Vec<SemanticError> {
    let (_, _, errors) = check_src_full(src);
    errors
}

fn check_src_full(src: &str) -> (Program, TypeMap, Vec<SemanticError>) {
    let program = parse_program(src);
    let (resolution, errors) = resolve(&program);
    assert!(errors.is_empty(), "unexpected name errors: {:?}", errors);
    let (types, errors) = check(&program, &resolution);
    (program, types, errors)
}

fn messages(errors: &[SemanticError]) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}

#[test]
fn well_typed_program_has_no_diagnostics() {
    let errors = check_src(
        "int counter;\n\
         int add(int a, int b) { return a + b; }\n\
         void main() {\n\
             int x;\n\
             bool done;\n\
             x = add(2, 3) * 4;\n\
             done = x >= 20 || !true;\n\
             while (!done) {\n\
                 x--;\n\
                 done = x == 0;\n\
             }\n\
             cout << x;\n\
             cout << \"done\";\n\
         }\n",
    );
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
}

#[test]
fn type_mismatch_is_reported_at_the_assignment() {
    let errors = check_src("int main(){ int x; x = true; }");
    assert_eq!(messages(&errors), vec!["1:20 Type mismatch".to_string()]);
}

#[test]
fn arithmetic_on_non_numeric_operand() {
    let errors = check_src("void main(){ int x; x = 1 + true; }");
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0],
        SemanticError::ArithmeticOnNonNumeric { .. }
    ));
}

#[test]
fn logical_on_non_bool_operand() {
    let errors = check_src("void main(){ bool b; b = 1 && true; }");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SemanticError::LogicalOnNonBool { .. }));
}

#[test]
fn relational_on_non_numeric_operand() {
    let errors = check_src("void main(){ bool b; b = true < 3; }");
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0],
        SemanticError::RelationalOnNonNumeric { .. }
    ));
}

#[test]
fn error_operands_do_not_cascade() {
    // `true + 1` is diagnosed once; the enclosing addition and assignment
    // both see `Error` and stay quiet.
    let errors = check_src("void main(){ int x; x = (true + 1) + 2; }");
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0],
        SemanticError::ArithmeticOnNonNumeric { .. }
    ));
}

#[test]
fn unary_operators_check_their_operand() {
    let errors = check_src("void main(){ int x; bool b; x = -true; b = !3; }");
    assert_eq!(errors.len(), 2);
    assert!(matches!(
        errors[0],
        SemanticError::ArithmeticOnNonNumeric { .. }
    ));
    assert!(matches!(errors[1], SemanticError::LogicalOnNonBool { .. }));
}

#[test]
fn condition_types_are_enforced() {
    let errors = check_src(
        "void main(){\n\
             if (3) { }\n\
             while (4) { }\n\
             repeat (true) { }\n\
         }",
    );
    assert_eq!(errors.len(), 3);
    assert!(matches!(errors[0], SemanticError::NonBoolIfCond { .. }));
    assert!(matches!(errors[1], SemanticError::NonBoolWhileCond { .. }));
    assert!(matches!(errors[2], SemanticError::NonIntRepeatClause { .. }));
}

#[test]
fn equality_on_void_function_results() {
    let errors = check_src("void f(){} void main(){ bool b; b = f() == f(); }");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SemanticError::EqualityOnVoid { .. }));
}

#[test]
fn equality_on_mismatched_types() {
    let errors = check_src("void main(){ bool b; b = 1 == true; }");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SemanticError::TypeMismatch { .. }));
}

#[test]
fn struct_variable_assignment_is_rejected() {
    let errors = check_src(
        "struct S { int a; };\n\
         void main(){ struct S s; struct S t; s = t; }",
    );
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0],
        SemanticError::StructVarAssignment { .. }
    ));
}

#[test]
fn io_statement_restrictions() {
    let errors = check_src(
        "void f(){}\n\
         struct S { int a; };\n\
         void main(){ struct S s; cin >> f; cout << s; cout << f(); }",
    );
    assert_eq!(errors.len(), 3);
    assert!(matches!(errors[0], SemanticError::ReadFn { .. }));
    assert!(matches!(errors[1], SemanticError::WriteStructVar { .. }));
    assert!(matches!(errors[2], SemanticError::WriteVoid { .. }));
}

#[test]
fn calling_a_non_function() {
    let errors = check_src("void main(){ int x; x(); }");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SemanticError::CallNonFn { .. }));
}

#[test]
fn call_arity_is_checked() {
    let errors = check_src(
        "int add(int a, int b){ return a + b; }\n\
         void main(){ int x; x = add(1); }",
    );
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SemanticError::WrongArgCount { .. }));
}

#[test]
fn call_argument_types_are_checked() {
    let errors = check_src(
        "int add(int a, int b){ return a + b; }\n\
         void main(){ int x; x = add(1, true); }",
    );
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0],
        SemanticError::ActualFormalMismatch { .. }
    ));
}

#[test]
fn return_value_in_void_function() {
    let errors = check_src("void main(){ return 3; }");
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0],
        SemanticError::ReturnValueInVoidFn { .. }
    ));
}

#[test]
fn missing_return_value_is_reported_at_origin() {
    let errors = check_src("int f(){ return; } void main(){}");
    assert_eq!(
        messages(&errors),
        vec!["0:0 Missing return value".to_string()]
    );
}

#[test]
fn bad_return_value() {
    let errors = check_src("int f(){ return true; } void main(){}");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SemanticError::BadReturnValue { .. }));
}

#[test]
fn increment_requires_an_int() {
    let errors = check_src("void main(){ bool b; b++; }");
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0],
        SemanticError::ArithmeticOnNonNumeric { .. }
    ));
}

#[test]
fn write_operand_type_is_recorded_for_codegen() {
    let (program, types, errors) = check_src_full("void main(){ cout << \"hi\"; cout << 3; }");
    assert!(errors.is_empty());

    let Decl::Fn(ref main) = program.decls[0] else {
        panic!("expected a function");
    };
    let Stmt::Write(ref string_operand) = main.body.stmts[0] else {
        panic!("expected a write statement");
    };
    let Stmt::Write(ref int_operand) = main.body.stmts[1] else {
        panic!("expected a write statement");
    };
    assert_eq!(types.ty_of(string_operand.id), Some(&Ty::Str));
    assert_eq!(types.ty_of(int_operand.id), Some(&Ty::Int));
}

#[test]
fn dot_access_takes_the_field_type() {
    let errors = check_src(
        "struct S { int a; bool flag; };\n\
         void main(){ struct S s; int x; x = s.a; s.flag = true; }",
    );
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
}

#[test]
fn struct_fields_type_check_like_variables() {
    let errors = check_src(
        "struct S { int a; };\n\
         void main(){ struct S s; s.a = true; }",
    );
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SemanticError::TypeMismatch { .. }));
}
