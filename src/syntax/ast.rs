//! The abstract syntax tree for cflat programs.
//!
//! The tree is immutable after parsing: name analysis and type checking
//! record their results in side tables keyed by [`NodeId`] rather than
//! writing into the nodes.

use serde::{Deserialize, Serialize};

use super::lexer::{BinOp, SourceLoc, UnOp};
use super::span::{NodeId, Spanned};

/// An identifier occurrence, either declaring or using a name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Ident {
    pub id: NodeId,
    pub name: String,
    pub location: SourceLoc,
}

/// A type written in the source, as opposed to the checker's computed
/// [`crate::sema::types::Ty`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum TypeSpec {
    Int,
    Bool,
    Void,
    Struct(Ident),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Program {
    pub decls: Vec<Decl>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Decl {
    Var(VarDecl),
    Fn(FnDecl),
    Struct(StructDecl),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub ty: TypeSpec,
    pub name: Ident,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FormalDecl {
    pub ty: TypeSpec,
    pub name: Ident,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub ret: TypeSpec,
    pub name: Ident,
    pub formals: Vec<FormalDecl>,
    pub body: Block,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: Ident,
    pub fields: Vec<VarDecl>,
}

/// A declaration list followed by a statement list; function bodies and the
/// bodies of `if`/`else`/`while`/`repeat` all have this shape.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Block {
    pub decls: Vec<VarDecl>,
    pub stmts: Vec<Stmt>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Stmt {
    /// An assignment expression in statement position.
    Assign(Spanned<Expr>),
    PostInc(Spanned<Expr>),
    PostDec(Spanned<Expr>),
    /// `cin >> target;`
    Read(Spanned<Expr>),
    /// `cout << value;`
    Write(Spanned<Expr>),
    If {
        cond: Spanned<Expr>,
        body: Block,
    },
    IfElse {
        cond: Spanned<Expr>,
        then_body: Block,
        else_body: Block,
    },
    While {
        cond: Spanned<Expr>,
        body: Block,
    },
    Repeat {
        count: Spanned<Expr>,
        body: Block,
    },
    /// A call expression in statement position; the result is discarded.
    Call(Spanned<Expr>),
    Return {
        value: Option<Spanned<Expr>>,
        location: SourceLoc,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Expr {
    IntLit(i32),
    /// The source lexeme including its quotes, emitted verbatim as the
    /// argument of `.asciiz`.
    StrLit(String),
    True,
    False,
    Id(String),
    Dot {
        target: Box<Spanned<Expr>>,
        field: Ident,
    },
    Assign {
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    Call {
        callee: Ident,
        args: Vec<Spanned<Expr>>,
    },
    Unary(UnOp, Box<Spanned<Expr>>),
    Binary(BinOp, Box<Spanned<Expr>>, Box<Spanned<Expr>>),
}

impl Expr {
    /// Locations and assignment targets only make sense for names and
    /// dot-accesses.
    pub fn is_location(&self) -> bool {
        matches!(self, Expr::Id(_) | Expr::Dot { .. })
    }
}
