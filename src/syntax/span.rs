use serde::{Deserialize, Serialize};

use crate::syntax::lexer::SourceLoc;

/// Identity of an AST node. The parser hands out a fresh id per identifier
/// and expression node; later passes key their side tables on it instead of
/// mutating the tree.
pub type NodeId = u32;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub id: NodeId,
    pub target: T,
    pub location: SourceLoc,
}

pub fn spanned<T>(id: NodeId, target: T, location: SourceLoc) -> Spanned<T> {
    Spanned {
        id,
        target,
        location,
    }
}

impl<T> Spanned<T> {
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Spanned<U> {
        Spanned {
            id: self.id,
            target: f(self.target),
            location: self.location,
        }
    }
}
