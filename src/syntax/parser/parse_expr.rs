//! Parsing of expressions with C precedence:
//! `=` right-associative at the bottom, then `||`, `&&`, equality,
//! relational, additive, multiplicative, unary, postfix.

use crate::syntax::ast::{Expr, Ident};
use crate::syntax::errors::SyntaxError;
use crate::syntax::lexer::{BinOp, TokenKind, UnOp};
use crate::syntax::parser::Return;
use crate::syntax::span::{spanned, Spanned};

use super::Parser;

impl<'cx> Parser<'cx> {
    pub(crate) fn parse_expr(&mut self) -> Return<Spanned<Expr>> {
        let lhs = self.parse_or()?;

        // `loc = exp`, right-associative
        if lhs.target.is_location()
            && matches!(self.peek().map(|t| t.kind), Some(TokenKind::Equal))
        {
            self.advance();
            let rhs = self.parse_expr()?;
            let location = lhs.location;
            let id = self.fresh_id();
            return Ok(spanned(
                id,
                Expr::Assign {
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                location,
            ));
        }

        Ok(lhs)
    }

    /// Build a left-associative binary level from `next` and an operator
    /// table.
    fn parse_binary(
        &mut self,
        ops: &[(TokenKind, BinOp)],
        next: fn(&mut Self) -> Return<Spanned<Expr>>,
    ) -> Return<Spanned<Expr>> {
        let mut lhs = next(self)?;

        'outer: loop {
            let Some(token) = self.peek() else {
                break;
            };
            for (kind, op) in ops {
                if token.kind == *kind {
                    self.advance();
                    let rhs = next(self)?;
                    let location = lhs.location;
                    let id = self.fresh_id();
                    lhs = spanned(
                        id,
                        Expr::Binary(*op, Box::new(lhs), Box::new(rhs)),
                        location,
                    );
                    continue 'outer;
                }
            }
            break;
        }

        Ok(lhs)
    }

    fn parse_or(&mut self) -> Return<Spanned<Expr>> {
        self.parse_binary(&[(TokenKind::DoubleOr, BinOp::Or)], Self::parse_and)
    }

    fn parse_and(&mut self) -> Return<Spanned<Expr>> {
        self.parse_binary(&[(TokenKind::DoubleAnd, BinOp::And)], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Return<Spanned<Expr>> {
        self.parse_binary(
            &[
                (TokenKind::DoubleEq, BinOp::Eq),
                (TokenKind::BangEq, BinOp::NotEq),
            ],
            Self::parse_relational,
        )
    }

    fn parse_relational(&mut self) -> Return<Spanned<Expr>> {
        self.parse_binary(
            &[
                (TokenKind::Less, BinOp::Less),
                (TokenKind::LessEq, BinOp::LessEq),
                (TokenKind::Greater, BinOp::Greater),
                (TokenKind::GreaterEq, BinOp::GreaterEq),
            ],
            Self::parse_additive,
        )
    }

    fn parse_additive(&mut self) -> Return<Spanned<Expr>> {
        self.parse_binary(
            &[
                (TokenKind::Plus, BinOp::Add),
                (TokenKind::Minus, BinOp::Sub),
            ],
            Self::parse_term,
        )
    }

    fn parse_term(&mut self) -> Return<Spanned<Expr>> {
        self.parse_binary(
            &[
                (TokenKind::Star, BinOp::Mul),
                (TokenKind::Slash, BinOp::Div),
            ],
            Self::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> Return<Spanned<Expr>> {
        let op = match self.peek().map(|t| t.kind) {
            Some(TokenKind::Minus) => Some(UnOp::Neg),
            Some(TokenKind::Bang) => Some(UnOp::Not),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            let location = operand.location;
            let id = self.fresh_id();
            return Ok(spanned(id, Expr::Unary(op, Box::new(operand)), location));
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Return<Spanned<Expr>> {
        let mut expr = self.parse_primary()?;

        // Dot-access chains are left-associative; a dot node carries the
        // location of its field name.
        while self.eat(TokenKind::Dot) {
            let field = self.parse_ident()?;
            let location = field.location;
            let id = self.fresh_id();
            expr = spanned(
                id,
                Expr::Dot {
                    target: Box::new(expr),
                    field,
                },
                location,
            );
        }

        Ok(expr)
    }

    pub(crate) fn parse_call(&mut self, callee: Ident) -> Return<Spanned<Expr>> {
        self.expect(TokenKind::LParen)?;

        let mut args = Vec::new();
        if !matches!(self.peek().map(|t| t.kind), Some(TokenKind::RParen)) {
            loop {
                args.push(self.parse_expr()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        let location = callee.location;
        let id = self.fresh_id();
        Ok(spanned(id, Expr::Call { callee, args }, location))
    }

    fn parse_primary(&mut self) -> Return<Spanned<Expr>> {
        let token = self.advance().ok_or(SyntaxError::UnexpectedEof)?;
        let location = token.location;

        match token.kind {
            TokenKind::IntLit => {
                let value: i32 = token
                    .literal
                    .parse()
                    .map_err(|_| SyntaxError::IntLiteralTooLarge { location })?;
                let id = self.fresh_id();
                Ok(spanned(id, Expr::IntLit(value), location))
            }
            TokenKind::StrLit => {
                let id = self.fresh_id();
                Ok(spanned(
                    id,
                    Expr::StrLit(token.literal.to_string()),
                    location,
                ))
            }
            TokenKind::KwTrue => {
                let id = self.fresh_id();
                Ok(spanned(id, Expr::True, location))
            }
            TokenKind::KwFalse => {
                let id = self.fresh_id();
                Ok(spanned(id, Expr::False, location))
            }
            TokenKind::LParen => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Ident => {
                let name = Ident {
                    id: self.fresh_id(),
                    name: token.literal.to_string(),
                    location,
                };

                if matches!(self.peek().map(|t| t.kind), Some(TokenKind::LParen)) {
                    self.parse_call(name)
                } else {
                    Ok(spanned(name.id, Expr::Id(name.name), location))
                }
            }
            _ => Err(SyntaxError::ExpectedExpr { location }),
        }
    }
}
