//! Name analysis pass for the compiler.
//!
//! Walks the whole program once, building scopes, linking every identifier
//! to a symbol in the arena and laying out stack frames: formals from offset
//! 0 downward, 8 bytes reserved for the saved `$ra`/`$fp` pair, then locals.
//! The results are returned as a [`Resolution`]; the AST is not touched.

use std::collections::HashMap;

use log::debug;

use crate::sema::sema_error::SemanticError;
use crate::sema::symbol::{SymId, Symbol, Symbols};
use crate::sema::table::SymTable;
use crate::sema::types::Ty;
use crate::syntax::ast::*;
use crate::syntax::span::{NodeId, Spanned};

/// Word size of the target in bytes; every value occupies one word.
const WORD: i32 = 4;

/// Everything later passes need to know about names: the symbol arena, the
/// node-to-symbol links, and whether a `main` function was declared.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub symbols: Symbols,
    uses: HashMap<NodeId, SymId>,
    pub no_main: bool,
}

impl Resolution {
    /// The symbol a resolved identifier node is linked to.
    pub fn sym_of(&self, node: NodeId) -> Option<SymId> {
        self.uses.get(&node).copied()
    }
}

#[derive(Debug)]
pub struct Resolver {
    table: SymTable,
    symbols: Symbols,
    uses: HashMap<NodeId, SymId>,
    errors: Vec<SemanticError>,
    no_main: bool,
}

/// Chaining state for nested dot-accesses: whether an error was already
/// reported below, and the struct definition the access resolves to (if the
/// field is itself of struct type).
struct DotLink {
    bad: bool,
    def: Option<SymId>,
}

/// Run name analysis over a program.
pub fn resolve(program: &Program) -> (Resolution, Vec<SemanticError>) {
    let mut resolver = Resolver {
        table: SymTable::new(),
        symbols: Symbols::new(),
        uses: HashMap::new(),
        errors: Vec::new(),
        no_main: true,
    };

    resolver.resolve_program(program);

    let Resolver {
        symbols,
        uses,
        errors,
        no_main,
        ..
    } = resolver;

    debug!(
        "name analysis: {} links, {} errors",
        uses.len(),
        errors.len()
    );

    (
        Resolution {
            symbols,
            uses,
            no_main,
        },
        errors,
    )
}

impl Resolver {
    fn resolve_program(&mut self, program: &Program) {
        for decl in &program.decls {
            match decl {
                Decl::Var(var) => self.resolve_var_decl(var),
                Decl::Fn(fun) => self.resolve_fn_decl(fun),
                Decl::Struct(st) => self.resolve_struct_decl(st),
            }
        }

        if self.no_main {
            self.errors.push(SemanticError::NoMain {
                location: Default::default(),
            });
        }
    }

    /// The checked type a written type denotes, for function returns and
    /// formals. An unknown struct name silently maps to `Error`; variable
    /// declarations diagnose it separately.
    fn type_spec_ty(&self, spec: &TypeSpec) -> Ty {
        match spec {
            TypeSpec::Int => Ty::Int,
            TypeSpec::Bool => Ty::Bool,
            TypeSpec::Void => Ty::Void,
            TypeSpec::Struct(name) => match self.table.lookup_global(&name.name) {
                Some(sid) if matches!(self.symbols.get(sid), Symbol::StructDef { .. }) => {
                    Ty::Struct(sid)
                }
                _ => Ty::Error,
            },
        }
    }

    fn resolve_var_decl(&mut self, decl: &VarDecl) {
        let mut bad = false;
        let mut struct_def: Option<SymId> = None;

        match &decl.ty {
            TypeSpec::Void => {
                self.errors.push(SemanticError::NonFnDeclaredVoid {
                    location: decl.name.location,
                });
                bad = true;
            }
            TypeSpec::Struct(ty_name) => match self.table.lookup_global(&ty_name.name) {
                Some(sid) if matches!(self.symbols.get(sid), Symbol::StructDef { .. }) => {
                    self.uses.insert(ty_name.id, sid);
                    struct_def = Some(sid);
                }
                _ => {
                    self.errors.push(SemanticError::InvalidStructType {
                        location: ty_name.location,
                    });
                    bad = true;
                }
            },
            _ => {}
        }

        if self.table.lookup_local(&decl.name.name).is_some() {
            self.errors.push(SemanticError::MultiplyDeclared {
                location: decl.name.location,
            });
            bad = true;
        }

        if bad {
            return;
        }

        let symbol = match struct_def {
            Some(def) => Symbol::StructInstance {
                def,
                is_global: self.table.is_global_scope(),
            },
            None => {
                let is_global = self.table.is_global_scope();
                let mut offset = -1;
                if !is_global {
                    offset = self.table.offset();
                    self.table.set_offset(offset - WORD);
                }
                Symbol::Var {
                    ty: self.type_spec_ty(&decl.ty),
                    offset,
                    is_global,
                }
            }
        };

        let sid = self.symbols.alloc(symbol);
        self.table.add_decl(&decl.name.name, sid);
        self.uses.insert(decl.name.id, sid);
    }

    /// A struct field declaration: duplicates and struct types are checked
    /// against the field table and the enclosing table respectively, and no
    /// offset is assigned.
    fn resolve_field_decl(&mut self, decl: &VarDecl, fields: &mut HashMap<String, SymId>) {
        let mut bad = false;
        let mut struct_def: Option<SymId> = None;

        match &decl.ty {
            TypeSpec::Void => {
                self.errors.push(SemanticError::NonFnDeclaredVoid {
                    location: decl.name.location,
                });
                bad = true;
            }
            TypeSpec::Struct(ty_name) => match self.table.lookup_global(&ty_name.name) {
                Some(sid) if matches!(self.symbols.get(sid), Symbol::StructDef { .. }) => {
                    self.uses.insert(ty_name.id, sid);
                    struct_def = Some(sid);
                }
                _ => {
                    self.errors.push(SemanticError::InvalidStructType {
                        location: ty_name.location,
                    });
                    bad = true;
                }
            },
            _ => {}
        }

        if fields.contains_key(&decl.name.name) {
            self.errors.push(SemanticError::MultiplyDeclared {
                location: decl.name.location,
            });
            bad = true;
        }

        if bad {
            return;
        }

        let symbol = match struct_def {
            Some(def) => Symbol::StructInstance {
                def,
                is_global: true,
            },
            None => Symbol::Var {
                ty: self.type_spec_ty(&decl.ty),
                offset: -1,
                is_global: true,
            },
        };

        let sid = self.symbols.alloc(symbol);
        fields.insert(decl.name.name.clone(), sid);
        self.uses.insert(decl.name.id, sid);
    }

    fn resolve_formal(&mut self, decl: &FormalDecl) -> Option<Ty> {
        let mut bad = false;

        if matches!(decl.ty, TypeSpec::Void) {
            self.errors.push(SemanticError::NonFnDeclaredVoid {
                location: decl.name.location,
            });
            bad = true;
        }

        if self.table.lookup_local(&decl.name.name).is_some() {
            self.errors.push(SemanticError::MultiplyDeclared {
                location: decl.name.location,
            });
            bad = true;
        }

        if bad {
            return None;
        }

        let ty = self.type_spec_ty(&decl.ty);
        let offset = self.table.offset();
        self.table.set_offset(offset - WORD);

        let sid = self.symbols.alloc(Symbol::Var {
            ty: ty.clone(),
            offset,
            is_global: false,
        });
        self.table.add_decl(&decl.name.name, sid);
        self.uses.insert(decl.name.id, sid);

        Some(ty)
    }

    fn resolve_fn_decl(&mut self, decl: &FnDecl) {
        let name = &decl.name.name;
        let mut fn_sym: Option<SymId> = None;

        if self.table.lookup_local(name).is_some() {
            self.errors.push(SemanticError::MultiplyDeclared {
                location: decl.name.location,
            });
        } else {
            if name == "main" {
                self.no_main = false;
            }

            let ret = self.type_spec_ty(&decl.ret);
            let sid = self.symbols.alloc(Symbol::Fn {
                ret,
                params: Vec::new(),
                param_size: 0,
                local_size: 0,
            });
            self.table.add_decl(name, sid);
            self.uses.insert(decl.name.id, sid);
            fn_sym = Some(sid);
        }

        // Analyze formals and body even for a multiply-declared function, so
        // its internals are still diagnosed.
        self.table.set_global_scope(false);
        self.table.set_offset(0);
        self.table.add_scope();

        let mut param_tys = Vec::new();
        for formal in &decl.formals {
            if let Some(ty) = self.resolve_formal(formal) {
                param_tys.push(ty);
            }
        }

        if let Some(sid) = fn_sym {
            let size = -self.table.offset();
            if let Symbol::Fn {
                params, param_size, ..
            } = self.symbols.get_mut(sid)
            {
                *params = param_tys;
                *param_size = size;
            }
        }

        // Reserve the two words for the saved return address and frame
        // pointer before laying out locals.
        self.table.set_offset(self.table.offset() - 2 * WORD);
        let pre_body = self.table.offset();

        self.resolve_block_items(&decl.body);

        if let Some(sid) = fn_sym {
            let size = -(self.table.offset() - pre_body);
            if let Symbol::Fn { local_size, .. } = self.symbols.get_mut(sid) {
                *local_size = size;
            }
            debug!("fn {}: frame laid out", name);
        }

        self.table.set_global_scope(true);
        self.table.remove_scope();
    }

    fn resolve_struct_decl(&mut self, decl: &StructDecl) {
        let mut bad = false;

        if self.table.lookup_local(&decl.name.name).is_some() {
            self.errors.push(SemanticError::MultiplyDeclared {
                location: decl.name.location,
            });
            bad = true;
        }

        // The fields get their own table; struct types they mention are
        // still looked up in the enclosing scopes.
        let mut fields = HashMap::new();
        for field in &decl.fields {
            self.resolve_field_decl(field, &mut fields);
        }

        if bad {
            return;
        }

        let sid = self.symbols.alloc(Symbol::StructDef { fields });
        self.table.add_decl(&decl.name.name, sid);
        self.uses.insert(decl.name.id, sid);
    }

    /// Declarations then statements, in the already-open scope.
    fn resolve_block_items(&mut self, block: &Block) {
        for decl in &block.decls {
            self.resolve_var_decl(decl);
        }
        for stmt in &block.stmts {
            self.resolve_stmt(stmt);
        }
    }

    /// A nested block opens its own scope for its declarations.
    fn resolve_scoped_block(&mut self, block: &Block) {
        self.table.add_scope();
        self.resolve_block_items(block);
        self.table.remove_scope();
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign(expr)
            | Stmt::PostInc(expr)
            | Stmt::PostDec(expr)
            | Stmt::Read(expr)
            | Stmt::Write(expr)
            | Stmt::Call(expr) => self.resolve_expr(expr),
            Stmt::If { cond, body } => {
                self.resolve_expr(cond);
                self.resolve_scoped_block(body);
            }
            Stmt::IfElse {
                cond,
                then_body,
                else_body,
            } => {
                self.resolve_expr(cond);
                self.resolve_scoped_block(then_body);
                self.resolve_scoped_block(else_body);
            }
            Stmt::While { cond, body } => {
                self.resolve_expr(cond);
                self.resolve_scoped_block(body);
            }
            Stmt::Repeat { count, body } => {
                self.resolve_expr(count);
                self.resolve_scoped_block(body);
            }
            Stmt::Return { value, .. } => {
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            }
        }
    }

    fn resolve_expr(&mut self, expr: &Spanned<Expr>) {
        match &expr.target {
            Expr::IntLit(_) | Expr::StrLit(_) | Expr::True | Expr::False => {}
            Expr::Id(name) => match self.table.lookup_global(name) {
                Some(sid) => {
                    self.uses.insert(expr.id, sid);
                }
                None => {
                    self.errors.push(SemanticError::Undeclared {
                        location: expr.location,
                    });
                }
            },
            Expr::Dot { target, field } => {
                self.resolve_dot(target, field);
            }
            Expr::Assign { lhs, rhs } => {
                self.resolve_expr(lhs);
                self.resolve_expr(rhs);
            }
            Expr::Call { callee, args } => {
                match self.table.lookup_global(&callee.name) {
                    Some(sid) => {
                        self.uses.insert(callee.id, sid);
                    }
                    None => {
                        self.errors.push(SemanticError::Undeclared {
                            location: callee.location,
                        });
                    }
                }
                for arg in args {
                    self.resolve_expr(arg);
                }
            }
            Expr::Unary(_, operand) => self.resolve_expr(operand),
            Expr::Binary(_, lhs, rhs) => {
                self.resolve_expr(lhs);
                self.resolve_expr(rhs);
            }
        }
    }

    /// Resolve `target.field`, returning the chaining state so an enclosing
    /// dot-access can look its own field up in the right struct.
    fn resolve_dot(&mut self, target: &Spanned<Expr>, field: &Ident) -> DotLink {
        let mut bad = false;
        let mut field_table: Option<SymId> = None;

        match &target.target {
            Expr::Id(_) => {
                self.resolve_expr(target);
                match self.uses.get(&target.id).copied() {
                    // Undeclared; already reported, don't cascade.
                    None => bad = true,
                    Some(sid) => match self.symbols.get(sid) {
                        Symbol::StructInstance { def, .. } => field_table = Some(*def),
                        _ => {
                            self.errors.push(SemanticError::DotAccessOfNonStruct {
                                location: target.location,
                            });
                            bad = true;
                        }
                    },
                }
            }
            Expr::Dot {
                target: inner,
                field: inner_field,
            } => {
                let link = self.resolve_dot(inner, inner_field);
                if link.bad {
                    bad = true;
                } else {
                    match link.def {
                        Some(def) => field_table = Some(def),
                        None => {
                            self.errors.push(SemanticError::DotAccessOfNonStruct {
                                location: target.location,
                            });
                            bad = true;
                        }
                    }
                }
            }
            _ => {
                self.resolve_expr(target);
                self.errors.push(SemanticError::DotAccessOfNonStruct {
                    location: target.location,
                });
                bad = true;
            }
        }

        let mut def = None;
        if !bad {
            let field_sym = field_table.and_then(|def_sid| match self.symbols.get(def_sid) {
                Symbol::StructDef { fields } => fields.get(&field.name).copied(),
                _ => None,
            });

            match field_sym {
                None => {
                    self.errors.push(SemanticError::InvalidStructField {
                        location: field.location,
                    });
                    bad = true;
                }
                Some(fsid) => {
                    self.uses.insert(field.id, fsid);
                    if let Symbol::StructInstance { def: fdef, .. } = self.symbols.get(fsid) {
                        def = Some(*fdef);
                    }
                }
            }
        }

        DotLink { bad, def }
    }
}
