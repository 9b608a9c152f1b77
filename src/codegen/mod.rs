//! Code generation: lower the analyzed AST into SPIM/MIPS assembly text.
//!
//! The generator is a stack machine: every expression leaves its one-word
//! result on top of the stack, and every statement consumes what it pushes.
//! Functions follow the standard activation-record protocol: the caller
//! pushes arguments, the callee saves `$ra`/`$fp`, reserves its locals and
//! anchors `$fp` at the first formal.
//!
//! Struct dot-accesses are analyzed and type checked but emit no code.

use log::debug;

use crate::sema::resolver::Resolution;
use crate::sema::symbol::{SymId, Symbol};
use crate::sema::typecheck::TypeMap;
use crate::sema::types::Ty;
use crate::syntax::ast::*;
use crate::syntax::lexer::{BinOp, UnOp};
use crate::syntax::span::Spanned;

use emitter::Reg::*;
use emitter::{Emitter, FALSE, TRUE};

pub mod emitter;


pub struct CodeGenerator<'r> {
    resolution: &'r Resolution,
    types: &'r TypeMap,
    em: Emitter,
}

/// Generate assembly for a fully analyzed, error-free program.
pub fn generate(program: &Program, resolution: &Resolution, types: &TypeMap) -> String {
    let mut gen = CodeGenerator {
        resolution,
        types,
        em: Emitter::new(),
    };

    for decl in &program.decls {
        match decl {
            Decl::Var(var) => gen.gen_global_var(var),
            Decl::Fn(fun) => gen.gen_fn(fun),
            // Struct definitions occupy no storage.
            Decl::Struct(_) => {}
        }
    }

    gen.em.finish()
}

impl<'r> CodeGenerator<'r> {
    fn sym_of(&self, node: crate::syntax::span::NodeId) -> Option<SymId> {
        self.resolution.sym_of(node)
    }

    fn gen_global_var(&mut self, decl: &VarDecl) {
        let Some(sid) = self.sym_of(decl.name.id) else {
            return;
        };
        if self.resolution.symbols.is_global(sid) {
            self.em.directive(".data");
            self.em.directive(".align 2");
            self.em
                .labeled_directive(&format!("_{}", decl.name.name), ".space 4", "");
        }
    }

    fn gen_fn(&mut self, decl: &FnDecl) {
        let Some(sid) = self.sym_of(decl.name.id) else {
            return;
        };
        let (param_size, local_size) = match self.resolution.symbols.get(sid) {
            Symbol::Fn {
                param_size,
                local_size,
                ..
            } => (*param_size, *local_size),
            _ => return,
        };

        let name = &decl.name.name;
        let is_main = name == "main";
        debug!("generating function {}", name);

        self.em.directive(".text");
        if is_main {
            self.em.directive(".globl main");
            self.em.label("main");
            self.em.label("__start");
        } else {
            self.em.label(&format!("_{}", name));
        }

        // Save the return address and the caller's frame pointer, reserve
        // the locals, then anchor $fp at the first formal.
        self.em.push(Ra);
        self.em.push(Fp);
        self.em.op3("subu", Sp, Sp, local_size);
        self.em.op3("addu", Fp, Sp, local_size + 8 + param_size);

        let exit_label = format!("_{}_Exit", name);
        self.gen_block(&decl.body, &exit_label);

        self.em.comment("FUNCTION EXIT");
        self.em.label(&exit_label);
        self.em.indexed("lw", Ra, Fp, -param_size);
        self.em.op3_note("subu", T0, Fp, param_size, "caller SP");
        self.em
            .indexed_note("lw", Fp, Fp, -4 - param_size, "restore FP");
        self.em.op2_note("move", Sp, T0, "restore SP");

        if is_main {
            self.em.op2_note("li", V0, 10, "load exit code for syscall");
            self.em.op0_note("syscall", "only do this for main");
        } else {
            self.em.op1("jr", Ra);
        }
    }

    /// Local declarations need no code; their slots were reserved wholesale
    /// in the prologue.
    fn gen_block(&mut self, block: &Block, exit_label: &str) {
        for stmt in &block.stmts {
            self.gen_stmt(stmt, exit_label);
        }
    }

    fn gen_stmt(&mut self, stmt: &Stmt, exit_label: &str) {
        match stmt {
            Stmt::Assign(expr) => self.gen_expr(expr),
            Stmt::PostInc(expr) => {
                self.gen_expr(expr);
                self.em.pop(T0);
                self.em.op3("addi", T0, T0, 1);
                self.gen_store(expr, T0);
            }
            Stmt::PostDec(expr) => {
                self.gen_expr(expr);
                self.em.pop(T0);
                self.em.op3("addi", T0, T0, -1);
                self.gen_store(expr, T0);
            }
            Stmt::Read(expr) => {
                self.em.op2("li", V0, 5);
                self.em.op0("syscall");
                self.gen_store(expr, V0);
            }
            Stmt::Write(expr) => {
                self.em.comment("WRITE");
                self.gen_expr(expr);
                self.em.pop(A0);
                // Syscall 1 prints a word (ints and bools), 4 a string.
                let is_string = matches!(self.types.ty_of(expr.id), Some(Ty::Str));
                self.em.op2("li", V0, if is_string { 4 } else { 1 });
                self.em.op0("syscall");
            }
            Stmt::If { cond, body } => {
                let done = self.em.next_label();

                self.gen_expr(cond);
                self.em.pop(T0);
                self.em.op3("beq", T0, 0, &done);
                self.gen_block(body, exit_label);
                self.em.label(&done);
            }
            Stmt::IfElse {
                cond,
                then_body,
                else_body,
            } => {
                let else_label = self.em.next_label();
                let done = self.em.next_label();

                self.gen_expr(cond);
                self.em.pop(T0);
                self.em.op3("beq", T0, 0, &else_label);
                self.gen_block(then_body, exit_label);
                self.em.op1("j", &done);
                self.em.label(&else_label);
                self.gen_block(else_body, exit_label);
                self.em.label(&done);
            }
            Stmt::While { cond, body } => {
                let loop_label = self.em.next_label();
                let done = self.em.next_label();

                self.em.label(&loop_label);
                self.gen_expr(cond);
                self.em.pop(T0);
                self.em.op3("beq", T0, 0, &done);
                self.gen_block(body, exit_label);
                self.em.op1("j", &loop_label);
                self.em.label(&done);
            }
            Stmt::Repeat { count, body } => {
                // The remaining count lives in its stack slot across the
                // body, so nothing the body does can clobber it.
                let loop_label = self.em.next_label();
                let done = self.em.next_label();

                self.gen_expr(count);
                self.em.label(&loop_label);
                self.em.indexed("lw", T0, Sp, 4);
                self.em.op3("ble", T0, 0, &done);
                self.gen_block(body, exit_label);
                self.em.indexed("lw", T0, Sp, 4);
                self.em.op3("addi", T0, T0, -1);
                self.em.indexed("sw", T0, Sp, 4);
                self.em.op1("j", &loop_label);
                self.em.label(&done);
                self.em.pop(T0);
            }
            Stmt::Call(expr) => {
                self.gen_expr(expr);
                self.em.pop(T0);
            }
            Stmt::Return { value, .. } => {
                if let Some(value) = value {
                    self.gen_expr(value);
                    self.em.pop(V0);
                }
                self.em.op1("j", exit_label);
            }
        }
    }

    /// Store `reg` into the location named by an assignment/read/increment
    /// target. Struct dot-accesses are unsupported and store nothing.
    fn gen_store(&mut self, target: &Spanned<Expr>, reg: emitter::Reg) {
        if let Expr::Id(name) = &target.target {
            let Some(sid) = self.sym_of(target.id) else {
                return;
            };
            if self.resolution.symbols.is_global(sid) {
                self.em.op2("sw", reg, format!("_{}", name));
            } else {
                self.em
                    .indexed("sw", reg, Fp, self.resolution.symbols.offset_of(sid));
            }
        }
    }

    /// Emit code leaving the expression's value on top of the stack.
    fn gen_expr(&mut self, expr: &Spanned<Expr>) {
        match &expr.target {
            Expr::IntLit(value) => {
                self.em.op2("li", T0, *value);
                self.em.push(T0);
            }
            Expr::StrLit(raw) => {
                // Strings are emitted inline where used, each under a fresh
                // label; duplicates are not merged.
                self.em.directive(".data");
                let label = self.em.next_label();
                self.em.labeled_directive(&label, ".asciiz", raw);
                self.em.directive(".text");
                self.em.op2("la", T0, &label);
                self.em.push(T0);
            }
            Expr::True => {
                self.em.op2("li", T0, TRUE);
                self.em.push(T0);
            }
            Expr::False => {
                self.em.op2("li", T0, FALSE);
                self.em.push(T0);
            }
            Expr::Id(name) => {
                let Some(sid) = self.sym_of(expr.id) else {
                    return;
                };
                if self.resolution.symbols.is_global(sid) {
                    self.em.op2("lw", T0, format!("_{}", name));
                } else {
                    self.em
                        .indexed("lw", T0, Fp, self.resolution.symbols.offset_of(sid));
                }
                self.em.push(T0);
            }
            // Struct access generates nothing observable.
            Expr::Dot { .. } => {}
            Expr::Assign { lhs, rhs } => {
                self.gen_expr(rhs);
                self.em.pop(T0);
                self.gen_store(lhs, T0);
            }
            Expr::Call { callee, args } => {
                for arg in args {
                    self.gen_expr(arg);
                }
                if callee.name == "main" {
                    self.em.op1("jal", "main");
                } else {
                    self.em.op1("jal", format!("_{}", callee.name));
                }
                self.em.push(V0);
            }
            Expr::Unary(UnOp::Neg, operand) => {
                self.gen_expr(operand);
                self.em.pop(T0);
                self.em.op2("li", T1, 0);
                self.em.op3("sub", T0, T1, T0);
                self.em.push(T0);
            }
            Expr::Unary(UnOp::Not, operand) => {
                self.gen_expr(operand);
                self.em.pop(T0);
                self.em.op3("xor", T0, T0, TRUE);
                self.em.push(T0);
            }
            Expr::Binary(op, lhs, rhs) => self.gen_binary(*op, lhs, rhs),
        }
    }

    fn gen_binary(&mut self, op: BinOp, lhs: &Spanned<Expr>, rhs: &Spanned<Expr>) {
        match op {
            BinOp::Add | BinOp::Mul => {
                self.gen_expr(lhs);
                self.gen_expr(rhs);
                self.em.pop(T0);
                self.em.pop(T1);
                let inst = if op == BinOp::Add { "add" } else { "mul" };
                self.em.op3(inst, T0, T0, T1);
                self.em.push(T0);
            }
            BinOp::Sub | BinOp::Div => {
                // The right operand is generated first so the pops put the
                // left operand in $t0.
                self.gen_expr(rhs);
                self.gen_expr(lhs);
                self.em.pop(T0);
                self.em.pop(T1);
                let inst = if op == BinOp::Sub { "sub" } else { "div" };
                self.em.op3(inst, T0, T0, T1);
                self.em.push(T0);
            }
            BinOp::And => {
                let rhs_label = self.em.next_label();
                let done = self.em.next_label();

                self.gen_expr(lhs);
                self.em.pop(T0);
                self.em.op3("beq", T0, TRUE, &rhs_label);
                // Left operand was false and decides the result.
                self.em.push(T0);
                self.em.op1("j", &done);
                self.em.label(&rhs_label);
                self.gen_expr(rhs);
                self.em.label(&done);
            }
            BinOp::Or => {
                let rhs_label = self.em.next_label();
                let done = self.em.next_label();

                self.gen_expr(lhs);
                self.em.pop(T0);
                self.em.op3("beq", T0, FALSE, &rhs_label);
                // Left operand was true and decides the result.
                self.em.push(T0);
                self.em.op1("j", &done);
                self.em.label(&rhs_label);
                self.gen_expr(rhs);
                self.em.label(&done);
            }
            BinOp::Eq
            | BinOp::NotEq
            | BinOp::Less
            | BinOp::LessEq
            | BinOp::Greater
            | BinOp::GreaterEq => {
                let false_label = self.em.next_label();
                let done = self.em.next_label();

                self.gen_expr(lhs);
                self.gen_expr(rhs);
                self.em.pop(T1);
                self.em.pop(T0);

                // Branch to the false arm on the negated comparison.
                let branch = match op {
                    BinOp::Eq => "bne",
                    BinOp::NotEq => "beq",
                    BinOp::Less => "bge",
                    BinOp::LessEq => "bgt",
                    BinOp::Greater => "ble",
                    BinOp::GreaterEq => "blt",
                    _ => unreachable!(),
                };
                self.em.op3(branch, T0, T1, &false_label);

                self.em.op2("li", T0, TRUE);
                self.em.push(T0);
                self.em.op1("b", &done);

                self.em.label(&false_label);
                self.em.op2("li", T0, FALSE);
                self.em.push(T0);
                self.em.label(&done);
            }
        }
    }
}
