//! Shared parser module that contains common parsing utilities
//! used in both the expression and statement parsers.

use crate::syntax::ast::{Decl, Program};
use crate::syntax::errors::SyntaxError;
use crate::syntax::lexer::{LexerIter, Token, TokenKind};
use crate::syntax::span::NodeId;

mod parse_expr;
mod parse_stmt;


#[derive(Clone)]
pub struct Parser<'cx> {
    tokens: Vec<Token<'cx>>,
    pos: usize,
    errors: Vec<SyntaxError>,
    node_count: NodeId,
}

/// Result type for parsing
pub(crate) type Return<T> = Result<T, SyntaxError>;
pub(crate) type ReturnMany<T> = Result<T, Vec<SyntaxError>>;

impl<'cx> Parser<'cx> {
    pub fn new(tokens: LexerIter<'cx>) -> Self {
        Parser {
            tokens: tokens.collect(),
            pos: 0,
            errors: Vec::new(),
            node_count: 0,
        }
    }

    pub fn errors(&self) -> &Vec<SyntaxError> {
        &self.errors
    }

    /// Hand out the identity for a new AST node.
    pub(crate) fn fresh_id(&mut self) -> NodeId {
        let id = self.node_count;
        self.node_count += 1;
        id
    }

    /// Peek at the next token
    pub(crate) fn peek(&self) -> Option<Token<'cx>> {
        self.tokens.get(self.pos).cloned()
    }

    /// Peek `n` tokens ahead without advancing (`peek_nth(0)` == `peek`)
    pub(crate) fn peek_nth(&self, n: usize) -> Option<Token<'cx>> {
        self.tokens.get(self.pos + n).cloned()
    }

    /// Advance the parser by one token
    pub(crate) fn advance(&mut self) -> Option<Token<'cx>> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consume the next token and return it if it matches the expected kind
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Return<Token<'cx>> {
        let token = self.advance().ok_or(SyntaxError::UnexpectedEof)?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(SyntaxError::UnexpectedToken {
                token: token.kind,
                location: token.location,
            })
        }
    }

    /// Consume the next token if it matches, without failing otherwise
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        match self.peek() {
            Some(token) if token.kind == kind => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    /// Skip to just past the next `;` or `}` so parsing can continue with the
    /// next declaration after an error.
    fn synchronize(&mut self) {
        while let Some(token) = self.advance() {
            if matches!(token.kind, TokenKind::Semicolon | TokenKind::RCurly) {
                break;
            }
        }
    }

    pub fn parse(src: &'cx str) -> ReturnMany<Program> {
        let mut parser = Parser::new(crate::syntax::lexer::lex_tokens(src));
        let mut decls: Vec<Decl> = Vec::new();

        while parser.peek().is_some() {
            match parser.parse_decl() {
                Ok(decl) => decls.push(decl),
                Err(err) => {
                    parser.errors.push(err);
                    parser.synchronize();
                }
            }
        }

        if parser.errors.is_empty() {
            Ok(Program { decls })
        } else {
            Err(parser.errors.clone())
        }
    }
}
