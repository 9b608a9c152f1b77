//! Parsing of declarations, statements and blocks.
//! The expression parser is split into another file to keep the codebase
//! clean and organized.

use crate::syntax::ast::*;
use crate::syntax::errors::SyntaxError;
use crate::syntax::lexer::TokenKind;
use crate::syntax::parser::Return;
use crate::syntax::span::{spanned, Spanned};

use super::Parser;

impl<'cx> Parser<'cx> {
    pub(crate) fn parse_ident(&mut self) -> Return<Ident> {
        let token = self.expect(TokenKind::Ident)?;
        Ok(Ident {
            id: self.fresh_id(),
            name: token.literal.to_string(),
            location: token.location,
        })
    }

    pub(crate) fn parse_type_spec(&mut self) -> Return<TypeSpec> {
        let token = self.advance().ok_or(SyntaxError::UnexpectedEof)?;
        match token.kind {
            TokenKind::KwInt => Ok(TypeSpec::Int),
            TokenKind::KwBool => Ok(TypeSpec::Bool),
            TokenKind::KwVoid => Ok(TypeSpec::Void),
            TokenKind::KwStruct => Ok(TypeSpec::Struct(self.parse_ident()?)),
            _ => Err(SyntaxError::ExpectedType {
                location: token.location,
            }),
        }
    }

    /// Could the upcoming tokens begin a variable declaration?
    fn at_var_decl(&mut self) -> bool {
        match self.peek().map(|t| t.kind) {
            Some(TokenKind::KwInt | TokenKind::KwBool | TokenKind::KwVoid) => true,
            // `struct S x` declares a variable; `struct S {` opens a type
            Some(TokenKind::KwStruct) => {
                matches!(self.peek_nth(2).map(|t| t.kind), Some(TokenKind::Ident))
            }
            _ => false,
        }
    }

    pub(crate) fn parse_decl(&mut self) -> Return<Decl> {
        if let Some(token) = self.peek() {
            if token.kind == TokenKind::KwStruct && !self.at_var_decl() {
                return self.parse_struct_decl().map(Decl::Struct);
            }
        }

        let ty = self.parse_type_spec()?;
        let name = self.parse_ident()?;

        match self.peek().map(|t| t.kind) {
            Some(TokenKind::LParen) => self.parse_fn_decl(ty, name).map(Decl::Fn),
            _ => {
                self.expect(TokenKind::Semicolon)?;
                Ok(Decl::Var(VarDecl { ty, name }))
            }
        }
    }

    fn parse_struct_decl(&mut self) -> Return<StructDecl> {
        self.expect(TokenKind::KwStruct)?;
        let name = self.parse_ident()?;
        self.expect(TokenKind::LCurly)?;

        let mut fields = Vec::new();
        while !matches!(self.peek().map(|t| t.kind), Some(TokenKind::RCurly)) {
            fields.push(self.parse_var_decl()?);
        }
        self.expect(TokenKind::RCurly)?;
        self.expect(TokenKind::Semicolon)?;

        Ok(StructDecl { name, fields })
    }

    fn parse_var_decl(&mut self) -> Return<VarDecl> {
        let ty = self.parse_type_spec()?;
        let name = self.parse_ident()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(VarDecl { ty, name })
    }

    fn parse_fn_decl(&mut self, ret: TypeSpec, name: Ident) -> Return<FnDecl> {
        self.expect(TokenKind::LParen)?;

        let mut formals = Vec::new();
        if !matches!(self.peek().map(|t| t.kind), Some(TokenKind::RParen)) {
            loop {
                let ty = self.parse_type_spec()?;
                let formal_name = self.parse_ident()?;
                formals.push(FormalDecl {
                    ty,
                    name: formal_name,
                });
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        let body = self.parse_block()?;

        Ok(FnDecl {
            ret,
            name,
            formals,
            body,
        })
    }

    /// `{ varDecl* stmt* }` — declarations first, then statements.
    pub(crate) fn parse_block(&mut self) -> Return<Block> {
        self.expect(TokenKind::LCurly)?;

        let mut decls = Vec::new();
        while self.at_var_decl() {
            decls.push(self.parse_var_decl()?);
        }

        let mut stmts = Vec::new();
        while !matches!(self.peek().map(|t| t.kind), Some(TokenKind::RCurly)) {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RCurly)?;

        Ok(Block { decls, stmts })
    }

    pub(crate) fn parse_stmt(&mut self) -> Return<Stmt> {
        let token = self.peek().ok_or(SyntaxError::UnexpectedEof)?;
        match token.kind {
            TokenKind::KwCin => {
                self.advance();
                self.expect(TokenKind::ReadOp)?;
                let target = self.parse_loc()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Read(target))
            }
            TokenKind::KwCout => {
                self.advance();
                self.expect(TokenKind::WriteOp)?;
                let value = self.parse_expr()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Write(value))
            }
            TokenKind::KwIf => {
                self.advance();
                self.expect(TokenKind::LParen)?;
                let cond = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                let then_body = self.parse_block()?;

                if self.eat(TokenKind::KwElse) {
                    let else_body = self.parse_block()?;
                    Ok(Stmt::IfElse {
                        cond,
                        then_body,
                        else_body,
                    })
                } else {
                    Ok(Stmt::If {
                        cond,
                        body: then_body,
                    })
                }
            }
            TokenKind::KwWhile => {
                self.advance();
                self.expect(TokenKind::LParen)?;
                let cond = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                let body = self.parse_block()?;
                Ok(Stmt::While { cond, body })
            }
            TokenKind::KwRepeat => {
                self.advance();
                self.expect(TokenKind::LParen)?;
                let count = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                let body = self.parse_block()?;
                Ok(Stmt::Repeat { count, body })
            }
            TokenKind::KwReturn => {
                let location = token.location;
                self.advance();
                let value = if matches!(self.peek().map(|t| t.kind), Some(TokenKind::Semicolon)) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(TokenKind::Semicolon)?;
                Ok(Stmt::Return { value, location })
            }
            TokenKind::Ident => self.parse_loc_stmt(),
            _ => Err(SyntaxError::ExpectedStmt {
                location: token.location,
            }),
        }
    }

    /// Statements that open with a name: assignment, increment, decrement,
    /// or a call.
    fn parse_loc_stmt(&mut self) -> Return<Stmt> {
        let loc = self.parse_loc()?;

        let token = self.peek().ok_or(SyntaxError::UnexpectedEof)?;
        let stmt = match token.kind {
            TokenKind::PlusPlus => {
                self.advance();
                Stmt::PostInc(loc)
            }
            TokenKind::MinusMinus => {
                self.advance();
                Stmt::PostDec(loc)
            }
            TokenKind::Equal => {
                self.advance();
                let rhs = self.parse_expr()?;
                let location = loc.location;
                let id = self.fresh_id();
                Stmt::Assign(spanned(
                    id,
                    Expr::Assign {
                        lhs: Box::new(loc),
                        rhs: Box::new(rhs),
                    },
                    location,
                ))
            }
            TokenKind::LParen => {
                let callee = match loc.target {
                    Expr::Id(name) => Ident {
                        id: loc.id,
                        name,
                        location: loc.location,
                    },
                    _ => {
                        return Err(SyntaxError::CalleeNotAName {
                            location: loc.location,
                        })
                    }
                };
                Stmt::Call(self.parse_call(callee)?)
            }
            _ => {
                return Err(SyntaxError::UnexpectedToken {
                    token: token.kind,
                    location: token.location,
                })
            }
        };

        self.expect(TokenKind::Semicolon)?;
        Ok(stmt)
    }

    /// `id (. id)*` — the only assignable locations in the language.
    pub(crate) fn parse_loc(&mut self) -> Return<Spanned<Expr>> {
        let name = self.parse_ident()?;
        // The name node and its Spanned wrapper share one identity
        let mut loc = spanned(name.id, Expr::Id(name.name.clone()), name.location);

        while self.eat(TokenKind::Dot) {
            let field = self.parse_ident()?;
            let location = field.location;
            let id = self.fresh_id();
            loc = spanned(
                id,
                Expr::Dot {
                    target: Box::new(loc),
                    field,
                },
                location,
            );
        }
        Ok(loc)
    }
}
