//! Type checker pass for the compiler.
//!
//! Reads the symbol links produced by name analysis and computes the type of
//! every expression, recording it in a [`TypeMap`] side table (code
//! generation consults it to pick the right output syscall). Each violation
//! is diagnosed exactly once at the offending operand; once a subexpression
//! has type `Error`, enclosing expressions stay quiet and propagate it.

use std::collections::HashMap;

use log::debug;

use crate::sema::resolver::Resolution;
use crate::sema::sema_error::SemanticError;
use crate::sema::symbol::Symbol;
use crate::sema::types::Ty;
use crate::syntax::ast::*;
use crate::syntax::lexer::BinOp::{self, *};
use crate::syntax::lexer::UnOp;
use crate::syntax::span::{NodeId, Spanned};

/// The inferred type of every expression node, keyed by node identity.
#[derive(Debug, Clone, Default)]
pub struct TypeMap {
    types: HashMap<NodeId, Ty>,
}

impl TypeMap {
    pub fn ty_of(&self, node: NodeId) -> Option<&Ty> {
        self.types.get(&node)
    }
}

pub struct Typechecker<'r> {
    resolution: &'r Resolution,
    types: TypeMap,
    errors: Vec<SemanticError>,
}

/// Run the type checker over a name-analyzed program.
pub fn check(program: &Program, resolution: &Resolution) -> (TypeMap, Vec<SemanticError>) {
    let mut checker = Typechecker {
        resolution,
        types: TypeMap::default(),
        errors: Vec::new(),
    };

    checker.check_program(program);

    debug!(
        "type check: {} expression types, {} errors",
        checker.types.types.len(),
        checker.errors.len()
    );

    (checker.types, checker.errors)
}

impl<'r> Typechecker<'r> {
    fn check_program(&mut self, program: &Program) {
        for decl in &program.decls {
            if let Decl::Fn(fun) = decl {
                self.check_fn_decl(fun);
            }
        }
    }

    /// The checked type of a written type. A struct name is only meaningful
    /// if name analysis linked it; an unlinked one becomes `Error`, which
    /// mutes any dependent diagnostics.
    fn type_spec_ty(&self, spec: &TypeSpec) -> Ty {
        match spec {
            TypeSpec::Int => Ty::Int,
            TypeSpec::Bool => Ty::Bool,
            TypeSpec::Void => Ty::Void,
            TypeSpec::Struct(name) => match self.resolution.sym_of(name.id) {
                Some(sid) => Ty::Struct(sid),
                None => Ty::Error,
            },
        }
    }

    fn check_fn_decl(&mut self, decl: &FnDecl) {
        let ret = self.type_spec_ty(&decl.ret);
        self.check_block(&decl.body, &ret);
    }

    fn check_block(&mut self, block: &Block, ret: &Ty) {
        for stmt in &block.stmts {
            self.check_stmt(stmt, ret);
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt, ret: &Ty) {
        match stmt {
            Stmt::Assign(expr) | Stmt::Call(expr) => {
                self.check_expr(expr);
            }
            Stmt::PostInc(expr) | Stmt::PostDec(expr) => {
                let ty = self.check_expr(expr);
                if !ty.is_error() && !ty.is_int() {
                    self.errors.push(SemanticError::ArithmeticOnNonNumeric {
                        location: expr.location,
                    });
                }
            }
            Stmt::Read(expr) => {
                let ty = self.check_expr(expr);
                if ty.is_fn() {
                    self.errors.push(SemanticError::ReadFn {
                        location: expr.location,
                    });
                }
                if ty.is_struct_def() {
                    self.errors.push(SemanticError::ReadStructName {
                        location: expr.location,
                    });
                }
                if ty.is_struct() {
                    self.errors.push(SemanticError::ReadStructVar {
                        location: expr.location,
                    });
                }
            }
            Stmt::Write(expr) => {
                let ty = self.check_expr(expr);
                if ty.is_fn() {
                    self.errors.push(SemanticError::WriteFn {
                        location: expr.location,
                    });
                }
                if ty.is_struct_def() {
                    self.errors.push(SemanticError::WriteStructName {
                        location: expr.location,
                    });
                }
                if ty.is_struct() {
                    self.errors.push(SemanticError::WriteStructVar {
                        location: expr.location,
                    });
                }
                if ty.is_void() {
                    self.errors.push(SemanticError::WriteVoid {
                        location: expr.location,
                    });
                }
            }
            Stmt::If { cond, body } => {
                let ty = self.check_expr(cond);
                if !ty.is_error() && !ty.is_bool() {
                    self.errors.push(SemanticError::NonBoolIfCond {
                        location: cond.location,
                    });
                }
                self.check_block(body, ret);
            }
            Stmt::IfElse {
                cond,
                then_body,
                else_body,
            } => {
                let ty = self.check_expr(cond);
                if !ty.is_error() && !ty.is_bool() {
                    self.errors.push(SemanticError::NonBoolIfCond {
                        location: cond.location,
                    });
                }
                self.check_block(then_body, ret);
                self.check_block(else_body, ret);
            }
            Stmt::While { cond, body } => {
                let ty = self.check_expr(cond);
                if !ty.is_error() && !ty.is_bool() {
                    self.errors.push(SemanticError::NonBoolWhileCond {
                        location: cond.location,
                    });
                }
                self.check_block(body, ret);
            }
            Stmt::Repeat { count, body } => {
                let ty = self.check_expr(count);
                if !ty.is_error() && !ty.is_int() {
                    self.errors.push(SemanticError::NonIntRepeatClause {
                        location: count.location,
                    });
                }
                self.check_block(body, ret);
            }
            Stmt::Return { value, .. } => match value {
                Some(expr) => {
                    let ty = self.check_expr(expr);
                    if ret.is_void() {
                        self.errors.push(SemanticError::ReturnValueInVoidFn {
                            location: expr.location,
                        });
                    } else if !ret.is_error() && !ty.is_error() && *ret != ty {
                        self.errors.push(SemanticError::BadReturnValue {
                            location: expr.location,
                        });
                    }
                }
                None => {
                    if !ret.is_void() {
                        self.errors.push(SemanticError::MissingReturnValue {
                            location: Default::default(),
                        });
                    }
                }
            },
        }
    }

    /// Compute, record and return the type of an expression.
    fn check_expr(&mut self, expr: &Spanned<Expr>) -> Ty {
        let ty = match &expr.target {
            Expr::IntLit(_) => Ty::Int,
            Expr::StrLit(_) => Ty::Str,
            Expr::True | Expr::False => Ty::Bool,
            Expr::Id(_) => match self.resolution.sym_of(expr.id) {
                Some(sid) => self.resolution.symbols.ty_of(sid),
                None => Ty::Error,
            },
            Expr::Dot { field, .. } => match self.resolution.sym_of(field.id) {
                Some(sid) => self.resolution.symbols.ty_of(sid),
                None => Ty::Error,
            },
            Expr::Assign { lhs, rhs } => self.check_assign(expr, lhs, rhs),
            Expr::Call { callee, args } => self.check_call(callee, args),
            Expr::Unary(op, operand) => self.check_unary(*op, operand),
            Expr::Binary(op, lhs, rhs) => self.check_binary(*op, expr, lhs, rhs),
        };

        self.types.types.insert(expr.id, ty.clone());
        ty
    }

    fn check_assign(
        &mut self,
        node: &Spanned<Expr>,
        lhs: &Spanned<Expr>,
        rhs: &Spanned<Expr>,
    ) -> Ty {
        let lhs_ty = self.check_expr(lhs);
        let rhs_ty = self.check_expr(rhs);
        let mut result = lhs_ty.clone();

        if lhs_ty.is_fn() && rhs_ty.is_fn() {
            self.errors.push(SemanticError::FnAssignment {
                location: node.location,
            });
            result = Ty::Error;
        }

        if lhs_ty.is_struct_def() && rhs_ty.is_struct_def() {
            self.errors.push(SemanticError::StructNameAssignment {
                location: node.location,
            });
            result = Ty::Error;
        }

        if lhs_ty.is_struct() && rhs_ty.is_struct() {
            self.errors.push(SemanticError::StructVarAssignment {
                location: node.location,
            });
            result = Ty::Error;
        }

        if lhs_ty != rhs_ty && !lhs_ty.is_error() && !rhs_ty.is_error() {
            self.errors.push(SemanticError::TypeMismatch {
                location: node.location,
            });
            result = Ty::Error;
        }

        if lhs_ty.is_error() || rhs_ty.is_error() {
            result = Ty::Error;
        }

        result
    }

    fn check_call(&mut self, callee: &Ident, args: &[Spanned<Expr>]) -> Ty {
        let fn_sym = self.resolution.sym_of(callee.id);

        let (params, ret) = match fn_sym.map(|sid| self.resolution.symbols.get(sid)) {
            Some(Symbol::Fn { ret, params, .. }) => (params.clone(), ret.clone()),
            // Unresolved callee: already reported, stay quiet.
            None => return Ty::Error,
            Some(_) => {
                self.errors.push(SemanticError::CallNonFn {
                    location: callee.location,
                });
                return Ty::Error;
            }
        };

        if args.len() != params.len() {
            self.errors.push(SemanticError::WrongArgCount {
                location: callee.location,
            });
            return ret;
        }

        for (arg, formal) in args.iter().zip(params.iter()) {
            let actual = self.check_expr(arg);
            if !actual.is_error() && *formal != actual {
                self.errors.push(SemanticError::ActualFormalMismatch {
                    location: arg.location,
                });
            }
        }

        ret
    }

    fn check_unary(&mut self, op: UnOp, operand: &Spanned<Expr>) -> Ty {
        let ty = self.check_expr(operand);
        match op {
            UnOp::Neg => {
                if ty.is_error() {
                    Ty::Error
                } else if !ty.is_int() {
                    self.errors.push(SemanticError::ArithmeticOnNonNumeric {
                        location: operand.location,
                    });
                    Ty::Error
                } else {
                    Ty::Int
                }
            }
            UnOp::Not => {
                if ty.is_error() {
                    Ty::Error
                } else if !ty.is_bool() {
                    self.errors.push(SemanticError::LogicalOnNonBool {
                        location: operand.location,
                    });
                    Ty::Error
                } else {
                    Ty::Bool
                }
            }
        }
    }

    fn check_binary(
        &mut self,
        op: BinOp,
        node: &Spanned<Expr>,
        lhs: &Spanned<Expr>,
        rhs: &Spanned<Expr>,
    ) -> Ty {
        let lhs_ty = self.check_expr(lhs);
        let rhs_ty = self.check_expr(rhs);

        match op {
            Add | Sub | Mul | Div => {
                let mut result = Ty::Int;
                if !lhs_ty.is_error() && !lhs_ty.is_int() {
                    self.errors.push(SemanticError::ArithmeticOnNonNumeric {
                        location: lhs.location,
                    });
                    result = Ty::Error;
                }
                if !rhs_ty.is_error() && !rhs_ty.is_int() {
                    self.errors.push(SemanticError::ArithmeticOnNonNumeric {
                        location: rhs.location,
                    });
                    result = Ty::Error;
                }
                if lhs_ty.is_error() || rhs_ty.is_error() {
                    result = Ty::Error;
                }
                result
            }
            And | Or => {
                let mut result = Ty::Bool;
                if !lhs_ty.is_error() && !lhs_ty.is_bool() {
                    self.errors.push(SemanticError::LogicalOnNonBool {
                        location: lhs.location,
                    });
                    result = Ty::Error;
                }
                if !rhs_ty.is_error() && !rhs_ty.is_bool() {
                    self.errors.push(SemanticError::LogicalOnNonBool {
                        location: rhs.location,
                    });
                    result = Ty::Error;
                }
                if lhs_ty.is_error() || rhs_ty.is_error() {
                    result = Ty::Error;
                }
                result
            }
            Less | LessEq | Greater | GreaterEq => {
                let mut result = Ty::Bool;
                if !lhs_ty.is_error() && !lhs_ty.is_int() {
                    self.errors.push(SemanticError::RelationalOnNonNumeric {
                        location: lhs.location,
                    });
                    result = Ty::Error;
                }
                if !rhs_ty.is_error() && !rhs_ty.is_int() {
                    self.errors.push(SemanticError::RelationalOnNonNumeric {
                        location: rhs.location,
                    });
                    result = Ty::Error;
                }
                if lhs_ty.is_error() || rhs_ty.is_error() {
                    result = Ty::Error;
                }
                result
            }
            Eq | NotEq => {
                let mut result = Ty::Bool;
                if lhs_ty.is_void() && rhs_ty.is_void() {
                    self.errors.push(SemanticError::EqualityOnVoid {
                        location: node.location,
                    });
                    result = Ty::Error;
                }
                if lhs_ty.is_fn() && rhs_ty.is_fn() {
                    self.errors.push(SemanticError::EqualityOnFns {
                        location: node.location,
                    });
                    result = Ty::Error;
                }
                if lhs_ty.is_struct_def() && rhs_ty.is_struct_def() {
                    self.errors.push(SemanticError::EqualityOnStructNames {
                        location: node.location,
                    });
                    result = Ty::Error;
                }
                if lhs_ty.is_struct() && rhs_ty.is_struct() {
                    self.errors.push(SemanticError::EqualityOnStructVars {
                        location: node.location,
                    });
                    result = Ty::Error;
                }
                if lhs_ty != rhs_ty && !lhs_ty.is_error() && !rhs_ty.is_error() {
                    self.errors.push(SemanticError::TypeMismatch {
                        location: node.location,
                    });
                    result = Ty::Error;
                }
                if lhs_ty.is_error() || rhs_ty.is_error() {
                    result = Ty::Error;
                }
                result
            }
        }
    }
}
