use thiserror::Error;

use crate::syntax::lexer::{SourceLoc, TokenKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("{location} Unexpected token '{token:?}'")]
    UnexpectedToken {
        token: TokenKind,
        location: SourceLoc,
    },

    #[error("Unexpected end of file")]
    UnexpectedEof,

    #[error("{location} Expected an expression")]
    ExpectedExpr { location: SourceLoc },

    #[error("{location} Expected a statement")]
    ExpectedStmt { location: SourceLoc },

    #[error("{location} Expected a type name")]
    ExpectedType { location: SourceLoc },

    #[error("{location} Integer literal too large")]
    IntLiteralTooLarge { location: SourceLoc },

    #[error("{location} Only a name can be called")]
    CalleeNotAName { location: SourceLoc },
}
